//! Per-variant parser configuration builder
//!
//! Given a variant, produces the set of (message, signal) pairs the external
//! frame engine must decode on each bus, and the set of (message, expected
//! frequency) liveness checks it must run there. The rules compose: most are
//! independent conditionals on the variant's capability flags rather than one
//! lookup table, because the bus layout exceptions (secondary-bus body,
//! hybrid powertrain, pre-global signal family) cut across each other.
//!
//! Messages subscribed for the raw echo (counters, checksums, filler signals)
//! are requested in full even where the decoder itself only reads one field.

use crate::snapshot::{msg, sig};
use crate::variants::{VariantConfig, VehicleVariant};
use serde::Serialize;

/// A (message, signal) pair the frame engine must decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SignalRequest {
    pub message: &'static str,
    pub signal: &'static str,
}

/// A per-message liveness check the frame engine must run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LivenessCheck {
    pub message: &'static str,
    pub min_frequency_hz: u16,
}

/// Physical bus index as the frame engine numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bus {
    Primary = 0,
    Body = 1,
    Camera = 2,
}

/// Subscription and liveness spec for one bus
#[derive(Debug, Clone, Serialize)]
pub struct BusSpec {
    pub bus: Bus,
    pub signals: Vec<SignalRequest>,
    pub checks: Vec<LivenessCheck>,
}

impl BusSpec {
    fn new(bus: Bus) -> Self {
        Self {
            bus,
            signals: Vec::new(),
            checks: Vec::new(),
        }
    }

    fn add_signal(&mut self, signal: &'static str, message: &'static str) {
        self.signals.push(SignalRequest { message, signal });
    }

    fn add_signals(&mut self, message: &'static str, signals: &[&'static str]) {
        for signal in signals {
            self.add_signal(signal, message);
        }
    }

    fn add_check(&mut self, message: &'static str, min_frequency_hz: u16) {
        self.checks.push(LivenessCheck {
            message,
            min_frequency_hz,
        });
    }

    /// True if the spec subscribes to the given (message, signal) pair
    pub fn has_signal(&self, message: &str, signal: &str) -> bool {
        self.signals
            .iter()
            .any(|s| s.message == message && s.signal == signal)
    }

    /// True if the spec subscribes to any signal of the given message
    pub fn has_message(&self, message: &str) -> bool {
        self.signals.iter().any(|s| s.message == message)
    }

    /// Expected frequency of the liveness check on the given message
    pub fn check_hz(&self, message: &str) -> Option<u16> {
        self.checks
            .iter()
            .find(|c| c.message == message)
            .map(|c| c.min_frequency_hz)
    }
}

/// Complete per-bus parser configuration for one variant
#[derive(Debug, Clone, Serialize)]
pub struct ParserConfig {
    pub primary: BusSpec,
    /// Absent unless the variant routes powertrain or body signals over the
    /// secondary bus
    pub body: Option<BusSpec>,
    pub camera: BusSpec,
}

/// Builds the per-bus parser configuration for a variant
#[derive(Debug, Clone, Copy)]
pub struct ParserConfigBuilder {
    variant: VehicleVariant,
    enable_blind_spot_monitor: bool,
}

/// Throttle message signal set, pre-global dictionaries
const PREGLOBAL_THROTTLE_SIGNALS: &[&str] = &[
    "Throttle_Pedal",
    "Counter",
    "Signal1",
    "Not_Full_Throttle",
    "Signal2",
    "Engine_RPM",
    "Off_Throttle",
    "Signal3",
    "Throttle_Cruise",
    "Throttle_Combo",
    "Throttle_Body",
    "Off_Throttle_2",
    "Signal4",
];

/// Throttle message signal set, global dictionaries
const GLOBAL_THROTTLE_SIGNALS: &[&str] = &[
    "Counter",
    "Signal1",
    "Engine_RPM",
    "Signal2",
    "Throttle_Pedal",
    "Throttle_Cruise",
    "Throttle_Combo",
    "Off_Accel",
];

/// Brake pedal message signal set, global dictionaries
const GLOBAL_BRAKE_PEDAL_SIGNALS: &[&str] = &[
    "Counter",
    "Signal1",
    "Speed",
    "Signal2",
    "Brake_Lights",
    "Signal3",
    "Signal4",
];

/// Distance message signal set, pre-global dictionaries
const PREGLOBAL_ES_DISTANCE_SIGNALS: &[&str] = &[
    "Cruise_Throttle",
    "Signal1",
    "Car_Follow",
    "Signal2",
    "Brake_On",
    "Distance_Swap",
    "Standstill",
    "Signal3",
    "Close_Distance",
    "Signal4",
    "Standstill_2",
    "Cruise_Fault",
    "Signal5",
    "Counter",
    "Signal6",
    "Cruise_Button",
    "Signal7",
];

/// Dash status message signal set, global dictionaries
const GLOBAL_ES_DASH_STATUS_SIGNALS: &[&str] = &[
    "Counter",
    "PCB_Off",
    "LDW_Off",
    "Signal1",
    "Cruise_State_Msg",
    "LKAS_State_Msg",
    "Signal2",
    "Cruise_Soft_Disable",
    "EyeSight_Status_Msg",
    "Signal3",
    "Cruise_Distance",
    "Signal4",
    "Conventional_Cruise",
    "Signal5",
    "Cruise_Disengaged",
    "Cruise_Activated",
    "Signal6",
    "Cruise_Set_Speed",
    "Cruise_Fault",
    "Cruise_On",
    "Display_Own_Car",
    "Brake_Lights",
    "Car_Follow",
    "Signal7",
    "Far_Distance",
    "Cruise_State",
];

/// LKAS state message signal set, global dictionaries
const GLOBAL_ES_LKAS_STATE_SIGNALS: &[&str] = &[
    "Counter",
    "LKAS_Alert_Msg",
    "Signal1",
    "LKAS_ACTIVE",
    "LKAS_Dash_State",
    "Signal2",
    "Backward_Speed_Limit_Menu",
    "LKAS_Left_Line_Enable",
    "LKAS_Left_Line_Light_Blink",
    "LKAS_Right_Line_Enable",
    "LKAS_Right_Line_Light_Blink",
    "LKAS_Left_Line_Visible",
    "LKAS_Right_Line_Visible",
    "LKAS_Alert",
    "Signal3",
];

/// Distance message signal set, global dictionaries
const GLOBAL_ES_DISTANCE_SIGNALS: &[&str] = &[
    "Counter",
    "Signal1",
    "Cruise_Fault",
    "Cruise_Throttle",
    "Signal2",
    "Car_Follow",
    "Signal3",
    "Cruise_Brake_Active",
    "Distance_Swap",
    "Cruise_EPB",
    "Signal4",
    "Close_Distance",
    "Signal5",
    "Cruise_Cancel",
    "Cruise_Set",
    "Cruise_Resume",
    "Signal6",
];

impl ParserConfigBuilder {
    pub fn new(variant: VehicleVariant) -> Self {
        Self {
            variant,
            enable_blind_spot_monitor: false,
        }
    }

    /// Subscribe the blind-spot monitor signals regardless of variant
    pub fn with_blind_spot_monitor(mut self, enabled: bool) -> Self {
        self.enable_blind_spot_monitor = enabled;
        self
    }

    /// Build the per-bus subscription and liveness specs for the variant
    pub fn build(&self) -> ParserConfig {
        let cfg = self.variant.config();

        let config = ParserConfig {
            primary: self.primary_spec(cfg),
            body: self.body_spec(cfg),
            camera: self.camera_spec(cfg),
        };

        log::debug!(
            "Parser config for {}: {} primary, {} body, {} camera signals",
            self.variant,
            config.primary.signals.len(),
            config.body.as_ref().map_or(0, |b| b.signals.len()),
            config.camera.signals.len()
        );

        config
    }

    fn primary_spec(&self, cfg: &VariantConfig) -> BusSpec {
        let mut spec = BusSpec::new(Bus::Primary);

        spec.add_signal(sig::STEER_TORQUE_SENSOR, msg::STEERING_TORQUE);
        spec.add_signal(sig::STEERING_ANGLE, msg::STEERING_TORQUE);
        spec.add_signal(sig::STEER_ERROR_1, msg::STEERING_TORQUE);
        spec.add_signal(sig::BRAKE_PEDAL, msg::BRAKE_PEDAL);
        spec.add_signal(sig::LEFT_BLINKER, msg::DASHLIGHTS);
        spec.add_signal(sig::RIGHT_BLINKER, msg::DASHLIGHTS);
        spec.add_signal(sig::SEATBELT_FL, msg::DASHLIGHTS);
        spec.add_signal(sig::DOOR_OPEN_FR, msg::BODY_INFO);
        spec.add_signal(sig::DOOR_OPEN_FL, msg::BODY_INFO);
        spec.add_signal(sig::DOOR_OPEN_RR, msg::BODY_INFO);
        spec.add_signal(sig::DOOR_OPEN_RL, msg::BODY_INFO);

        spec.add_check(msg::THROTTLE, 100);
        spec.add_check(msg::BRAKE_PEDAL, 50);
        spec.add_check(msg::STEERING_TORQUE, 50);

        // Wheel speeds move to the body bus for the secondary-bus-body variants
        if !cfg.uses_secondary_bus_for_body {
            spec.add_signals(msg::WHEEL_SPEEDS, &[sig::FL, sig::FR, sig::RL, sig::RR]);
            spec.add_check(msg::WHEEL_SPEEDS, 50);
        }

        // Transmission moves to the body bus for the hybrid
        if !cfg.is_hybrid {
            spec.add_signal(sig::GEAR, msg::TRANSMISSION);
            spec.add_check(msg::TRANSMISSION, 100);
        }

        // Cruise control lives on the body bus for the secondary-bus-body
        // variants and does not exist at all on the hybrid
        let cruise_on_primary = cfg.supports_cruise_control_message
            && !cfg.uses_secondary_bus_for_body
            && !cfg.is_hybrid;
        if cruise_on_primary {
            spec.add_signal(sig::CRUISE_ON, msg::CRUISE_CONTROL);
            spec.add_signal(sig::CRUISE_ACTIVATED, msg::CRUISE_CONTROL);
        }

        if cfg.is_preglobal {
            spec.add_signals(msg::THROTTLE, PREGLOBAL_THROTTLE_SIGNALS);
            spec.add_signal(sig::UNITS, msg::DASH_STATE2);
            spec.add_signal(sig::STEERING_ANGLE, msg::STEERING);

            spec.add_check(msg::BODY_INFO, 1);
            spec.add_check(msg::CRUISE_CONTROL, 50);
            spec.add_check(msg::DASH_STATE2, 1);
            spec.add_check(msg::STEERING, 50);
            spec.add_check(msg::DASHLIGHTS, cfg.dashlights_hz);
        } else {
            spec.add_signals(msg::THROTTLE, GLOBAL_THROTTLE_SIGNALS);
            spec.add_signals(msg::BRAKE_PEDAL, GLOBAL_BRAKE_PEDAL_SIGNALS);
            spec.add_signal(sig::STEER_WARNING, msg::STEERING_TORQUE);
            spec.add_signal(sig::UNITS, msg::DASHLIGHTS);

            spec.add_check(msg::DASHLIGHTS, cfg.dashlights_hz);
            spec.add_check(msg::BODY_INFO, 10);

            // Brake status moves to the body bus with the other body signals
            if !cfg.uses_secondary_bus_for_body {
                spec.add_signal(sig::BRAKE, msg::BRAKE_STATUS);
                spec.add_check(msg::BRAKE_STATUS, 50);
            }

            if cruise_on_primary {
                spec.add_check(msg::CRUISE_CONTROL, 20);
            }
        }

        if self.enable_blind_spot_monitor {
            spec.add_signal(sig::L_ADJACENT, msg::BSD_RCTA);
            spec.add_signal(sig::R_ADJACENT, msg::BSD_RCTA);
            spec.add_signal(sig::L_APPROACHING, msg::BSD_RCTA);
            spec.add_signal(sig::R_APPROACHING, msg::BSD_RCTA);
            spec.add_check(msg::BSD_RCTA, 17);
        }

        spec
    }

    fn body_spec(&self, cfg: &VariantConfig) -> Option<BusSpec> {
        if cfg.is_hybrid {
            let mut spec = BusSpec::new(Bus::Body);
            spec.add_signal(sig::THROTTLE_PEDAL, msg::THROTTLE_HYBRID);
            spec.add_signal(sig::BRAKE, msg::BRAKE_HYBRID);
            spec.add_signal(sig::GEAR, msg::TRANSMISSION);

            spec.add_check(msg::THROTTLE_HYBRID, 50);
            spec.add_check(msg::BRAKE_HYBRID, 40);
            spec.add_check(msg::TRANSMISSION, 50);

            Some(spec)
        } else if cfg.uses_secondary_bus_for_body {
            let mut spec = BusSpec::new(Bus::Body);
            spec.add_signal(sig::CRUISE_ON, msg::CRUISE_CONTROL);
            spec.add_signal(sig::CRUISE_ACTIVATED, msg::CRUISE_CONTROL);
            spec.add_signals(msg::WHEEL_SPEEDS, &[sig::FL, sig::FR, sig::RL, sig::RR]);
            spec.add_signal(sig::BRAKE, msg::BRAKE_STATUS);
            spec.add_signal(sig::CAR_FOLLOW, msg::ES_DISTANCE);
            spec.add_signal(sig::CLOSE_DISTANCE, msg::ES_DISTANCE);

            spec.add_check(msg::CRUISE_CONTROL, 20);
            spec.add_check(msg::ES_DISTANCE, 20);
            spec.add_check(msg::WHEEL_SPEEDS, 50);
            spec.add_check(msg::BRAKE_STATUS, 50);

            Some(spec)
        } else {
            None
        }
    }

    fn camera_spec(&self, cfg: &VariantConfig) -> BusSpec {
        let mut spec = BusSpec::new(Bus::Camera);

        if cfg.is_preglobal {
            spec.add_signal(sig::CRUISE_SET_SPEED, msg::ES_DASH_STATUS);
            spec.add_signal(sig::NOT_READY_STARTUP, msg::ES_DASH_STATUS);
            spec.add_signal(sig::CAR_FOLLOW, msg::ES_DASH_STATUS);
            spec.add_signals(msg::ES_DISTANCE, PREGLOBAL_ES_DISTANCE_SIGNALS);

            spec.add_check(msg::ES_DASH_STATUS, 20);
            spec.add_check(msg::ES_DISTANCE, 20);
        } else {
            spec.add_signals(msg::ES_DASH_STATUS, GLOBAL_ES_DASH_STATUS_SIGNALS);
            spec.add_signals(msg::ES_LKAS_STATE, GLOBAL_ES_LKAS_STATE_SIGNALS);

            spec.add_check(msg::ES_DASH_STATUS, 10);
            spec.add_check(msg::ES_LKAS_STATE, 10);

            // The hybrid and the secondary-bus-body variants have no camera
            // distance message worth subscribing (the latter read it on the
            // body bus instead)
            if !cfg.is_hybrid && !cfg.uses_secondary_bus_for_body {
                spec.add_signals(msg::ES_DISTANCE, GLOBAL_ES_DISTANCE_SIGNALS);
                spec.add_check(msg::ES_DISTANCE, 20);
            }
        }

        spec
    }
}
