//! Per-bus signal snapshots and typed accessor views
//!
//! The external frame engine refreshes one [`BusSnapshot`] per physical bus
//! per receive cycle: a mapping (message name, signal name) -> physical value.
//! The engine also performs liveness/frequency/checksum validation; a missing
//! or stale entry simply reads as 0.0 here and the caller is expected to gate
//! on the engine's liveness report before trusting the decoded state.
//!
//! The decoder itself never touches the maps directly. The typed views at the
//! bottom of this module give every signal the decoder consumes a named
//! accessor, so the routing logic stays free of string lookups.

use crate::types::SignalMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Message names shared between the parser configuration and the bus views
pub mod msg {
    pub const THROTTLE: &str = "Throttle";
    pub const THROTTLE_HYBRID: &str = "Throttle_Hybrid";
    pub const BRAKE_PEDAL: &str = "Brake_Pedal";
    pub const BRAKE_STATUS: &str = "Brake_Status";
    pub const BRAKE_HYBRID: &str = "Brake_Hybrid";
    pub const WHEEL_SPEEDS: &str = "Wheel_Speeds";
    pub const TRANSMISSION: &str = "Transmission";
    pub const STEERING_TORQUE: &str = "Steering_Torque";
    pub const STEERING: &str = "Steering";
    pub const DASHLIGHTS: &str = "Dashlights";
    pub const DASH_STATE2: &str = "Dash_State2";
    pub const BODY_INFO: &str = "BodyInfo";
    pub const CRUISE_CONTROL: &str = "CruiseControl";
    pub const BSD_RCTA: &str = "BSD_RCTA";
    pub const ES_DASH_STATUS: &str = "ES_DashStatus";
    pub const ES_DISTANCE: &str = "ES_Distance";
    pub const ES_LKAS_STATE: &str = "ES_LKAS_State";
}

/// Signal names shared between the parser configuration and the bus views
pub mod sig {
    pub const THROTTLE_PEDAL: &str = "Throttle_Pedal";
    pub const BRAKE_PEDAL: &str = "Brake_Pedal";
    pub const BRAKE: &str = "Brake";
    pub const GEAR: &str = "Gear";
    pub const FL: &str = "FL";
    pub const FR: &str = "FR";
    pub const RL: &str = "RL";
    pub const RR: &str = "RR";
    pub const STEER_TORQUE_SENSOR: &str = "Steer_Torque_Sensor";
    pub const STEERING_ANGLE: &str = "Steering_Angle";
    pub const STEER_ERROR_1: &str = "Steer_Error_1";
    pub const STEER_WARNING: &str = "Steer_Warning";
    pub const LEFT_BLINKER: &str = "LEFT_BLINKER";
    pub const RIGHT_BLINKER: &str = "RIGHT_BLINKER";
    pub const SEATBELT_FL: &str = "SEATBELT_FL";
    pub const UNITS: &str = "UNITS";
    pub const DOOR_OPEN_FL: &str = "DOOR_OPEN_FL";
    pub const DOOR_OPEN_FR: &str = "DOOR_OPEN_FR";
    pub const DOOR_OPEN_RL: &str = "DOOR_OPEN_RL";
    pub const DOOR_OPEN_RR: &str = "DOOR_OPEN_RR";
    pub const CRUISE_ON: &str = "Cruise_On";
    pub const CRUISE_ACTIVATED: &str = "Cruise_Activated";
    pub const L_ADJACENT: &str = "L_ADJACENT";
    pub const R_ADJACENT: &str = "R_ADJACENT";
    pub const L_APPROACHING: &str = "L_APPROACHING";
    pub const R_APPROACHING: &str = "R_APPROACHING";
    pub const CRUISE_SET_SPEED: &str = "Cruise_Set_Speed";
    pub const CONVENTIONAL_CRUISE: &str = "Conventional_Cruise";
    pub const CRUISE_STATE: &str = "Cruise_State";
    pub const NOT_READY_STARTUP: &str = "Not_Ready_Startup";
    pub const CRUISE_BUTTON: &str = "Cruise_Button";
    pub const CAR_FOLLOW: &str = "Car_Follow";
    pub const CLOSE_DISTANCE: &str = "Close_Distance";
}

/// One bus worth of decoded signal values for the current receive cycle
///
/// Produced externally once per cycle. Absent messages/signals read as 0.0;
/// staleness is the external engine's responsibility to flag, not this
/// layer's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusSnapshot {
    messages: HashMap<String, SignalMap>,
}

impl BusSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a signal value, creating the message entry if needed.
    /// Intended for the external engine boundary and for tests.
    pub fn set(&mut self, message: &str, signal: &str, value: f64) {
        self.messages
            .entry(message.to_string())
            .or_default()
            .insert(signal.to_string(), value);
    }

    /// Read a signal value; absent message or signal reads as 0.0
    pub fn value(&self, message: &str, signal: &str) -> f64 {
        self.messages
            .get(message)
            .and_then(|signals| signals.get(signal))
            .copied()
            .unwrap_or(0.0)
    }

    /// Borrow the raw view of a message, if present this cycle
    pub fn message(&self, message: &str) -> Option<&SignalMap> {
        self.messages.get(message)
    }

    /// Clone the raw view of a message for the echo bundle.
    /// An absent message clones to an empty map.
    pub fn message_cloned(&self, message: &str) -> SignalMap {
        self.messages.get(message).cloned().unwrap_or_default()
    }
}

/// Typed view of the primary (powertrain) bus snapshot
#[derive(Debug, Clone, Copy)]
pub struct PrimaryView<'a> {
    snap: &'a BusSnapshot,
}

impl<'a> PrimaryView<'a> {
    pub fn new(snap: &'a BusSnapshot) -> Self {
        Self { snap }
    }

    pub fn throttle_pedal(&self) -> f64 {
        self.snap.value(msg::THROTTLE, sig::THROTTLE_PEDAL)
    }

    /// Raw brake pedal position, used by the pre-global brake predicate
    pub fn brake_pedal(&self) -> f64 {
        self.snap.value(msg::BRAKE_PEDAL, sig::BRAKE_PEDAL)
    }

    /// Brake flag from the global-generation brake status message
    pub fn brake_flag(&self) -> f64 {
        self.snap.value(msg::BRAKE_STATUS, sig::BRAKE)
    }

    pub fn wheel_speed_fl(&self) -> f64 {
        self.snap.value(msg::WHEEL_SPEEDS, sig::FL)
    }

    pub fn wheel_speed_fr(&self) -> f64 {
        self.snap.value(msg::WHEEL_SPEEDS, sig::FR)
    }

    pub fn wheel_speed_rl(&self) -> f64 {
        self.snap.value(msg::WHEEL_SPEEDS, sig::RL)
    }

    pub fn wheel_speed_rr(&self) -> f64 {
        self.snap.value(msg::WHEEL_SPEEDS, sig::RR)
    }

    pub fn gear_code(&self) -> f64 {
        self.snap.value(msg::TRANSMISSION, sig::GEAR)
    }

    /// Steering angle as reported by the torque sensor message
    pub fn steering_angle(&self) -> f64 {
        self.snap.value(msg::STEERING_TORQUE, sig::STEERING_ANGLE)
    }

    /// Steering angle from the dedicated steering message (WRX pre-global)
    pub fn steering_angle_dedicated(&self) -> f64 {
        self.snap.value(msg::STEERING, sig::STEERING_ANGLE)
    }

    pub fn steering_torque(&self) -> f64 {
        self.snap.value(msg::STEERING_TORQUE, sig::STEER_TORQUE_SENSOR)
    }

    pub fn steer_error_1(&self) -> f64 {
        self.snap.value(msg::STEERING_TORQUE, sig::STEER_ERROR_1)
    }

    pub fn steer_warning(&self) -> f64 {
        self.snap.value(msg::STEERING_TORQUE, sig::STEER_WARNING)
    }

    pub fn left_blinker_lamp(&self) -> f64 {
        self.snap.value(msg::DASHLIGHTS, sig::LEFT_BLINKER)
    }

    pub fn right_blinker_lamp(&self) -> f64 {
        self.snap.value(msg::DASHLIGHTS, sig::RIGHT_BLINKER)
    }

    pub fn seatbelt_fl(&self) -> f64 {
        self.snap.value(msg::DASHLIGHTS, sig::SEATBELT_FL)
    }

    /// Cluster units flag on the dashlights message (global generation)
    pub fn units_flag(&self) -> f64 {
        self.snap.value(msg::DASHLIGHTS, sig::UNITS)
    }

    /// Cluster units flag on the secondary dash state message (pre-global)
    pub fn units_flag_pre_global(&self) -> f64 {
        self.snap.value(msg::DASH_STATE2, sig::UNITS)
    }

    pub fn any_door_open(&self) -> bool {
        [
            sig::DOOR_OPEN_RR,
            sig::DOOR_OPEN_RL,
            sig::DOOR_OPEN_FR,
            sig::DOOR_OPEN_FL,
        ]
        .iter()
        .any(|door| self.snap.value(msg::BODY_INFO, door) != 0.0)
    }

    pub fn cruise_on(&self) -> f64 {
        self.snap.value(msg::CRUISE_CONTROL, sig::CRUISE_ON)
    }

    pub fn cruise_activated(&self) -> f64 {
        self.snap.value(msg::CRUISE_CONTROL, sig::CRUISE_ACTIVATED)
    }

    pub fn blind_spot_left_adjacent(&self) -> f64 {
        self.snap.value(msg::BSD_RCTA, sig::L_ADJACENT)
    }

    pub fn blind_spot_left_approaching(&self) -> f64 {
        self.snap.value(msg::BSD_RCTA, sig::L_APPROACHING)
    }

    pub fn blind_spot_right_adjacent(&self) -> f64 {
        self.snap.value(msg::BSD_RCTA, sig::R_ADJACENT)
    }

    pub fn blind_spot_right_approaching(&self) -> f64 {
        self.snap.value(msg::BSD_RCTA, sig::R_APPROACHING)
    }

    pub fn throttle_message(&self) -> SignalMap {
        self.snap.message_cloned(msg::THROTTLE)
    }

    pub fn brake_pedal_message(&self) -> SignalMap {
        self.snap.message_cloned(msg::BRAKE_PEDAL)
    }
}

/// Typed view of the secondary (body) bus snapshot
///
/// The body bus is only populated for the hybrid and the two
/// secondary-bus-body variants; for every other variant the snapshot is
/// absent and all accessors read 0.0.
#[derive(Debug, Clone, Copy)]
pub struct BodyView<'a> {
    snap: Option<&'a BusSnapshot>,
}

impl<'a> BodyView<'a> {
    pub fn new(snap: Option<&'a BusSnapshot>) -> Self {
        Self { snap }
    }

    fn value(&self, message: &str, signal: &str) -> f64 {
        self.snap.map_or(0.0, |s| s.value(message, signal))
    }

    /// Throttle pedal from the hybrid powertrain message
    pub fn throttle_pedal_hybrid(&self) -> f64 {
        self.value(msg::THROTTLE_HYBRID, sig::THROTTLE_PEDAL)
    }

    /// Brake flag from the hybrid brake message
    pub fn brake_flag_hybrid(&self) -> f64 {
        self.value(msg::BRAKE_HYBRID, sig::BRAKE)
    }

    /// Brake flag from the body-bus brake status message
    pub fn brake_flag(&self) -> f64 {
        self.value(msg::BRAKE_STATUS, sig::BRAKE)
    }

    pub fn gear_code(&self) -> f64 {
        self.value(msg::TRANSMISSION, sig::GEAR)
    }

    pub fn cruise_on(&self) -> f64 {
        self.value(msg::CRUISE_CONTROL, sig::CRUISE_ON)
    }

    pub fn cruise_activated(&self) -> f64 {
        self.value(msg::CRUISE_CONTROL, sig::CRUISE_ACTIVATED)
    }

    pub fn wheel_speed_fl(&self) -> f64 {
        self.value(msg::WHEEL_SPEEDS, sig::FL)
    }

    pub fn wheel_speed_fr(&self) -> f64 {
        self.value(msg::WHEEL_SPEEDS, sig::FR)
    }

    pub fn wheel_speed_rl(&self) -> f64 {
        self.value(msg::WHEEL_SPEEDS, sig::RL)
    }

    pub fn wheel_speed_rr(&self) -> f64 {
        self.value(msg::WHEEL_SPEEDS, sig::RR)
    }

    pub fn car_follow(&self) -> f64 {
        self.value(msg::ES_DISTANCE, sig::CAR_FOLLOW)
    }

    pub fn close_distance(&self) -> f64 {
        self.value(msg::ES_DISTANCE, sig::CLOSE_DISTANCE)
    }
}

/// Typed view of the camera-relay bus snapshot
#[derive(Debug, Clone, Copy)]
pub struct CameraView<'a> {
    snap: &'a BusSnapshot,
}

impl<'a> CameraView<'a> {
    pub fn new(snap: &'a BusSnapshot) -> Self {
        Self { snap }
    }

    pub fn cruise_set_speed(&self) -> f64 {
        self.snap.value(msg::ES_DASH_STATUS, sig::CRUISE_SET_SPEED)
    }

    pub fn cruise_on(&self) -> f64 {
        self.snap.value(msg::ES_DASH_STATUS, sig::CRUISE_ON)
    }

    pub fn cruise_activated(&self) -> f64 {
        self.snap.value(msg::ES_DASH_STATUS, sig::CRUISE_ACTIVATED)
    }

    pub fn conventional_cruise(&self) -> f64 {
        self.snap.value(msg::ES_DASH_STATUS, sig::CONVENTIONAL_CRUISE)
    }

    pub fn cruise_state(&self) -> f64 {
        self.snap.value(msg::ES_DASH_STATUS, sig::CRUISE_STATE)
    }

    pub fn not_ready_startup(&self) -> f64 {
        self.snap.value(msg::ES_DASH_STATUS, sig::NOT_READY_STARTUP)
    }

    pub fn cruise_button(&self) -> f64 {
        self.snap.value(msg::ES_DISTANCE, sig::CRUISE_BUTTON)
    }

    pub fn car_follow(&self) -> f64 {
        self.snap.value(msg::ES_DISTANCE, sig::CAR_FOLLOW)
    }

    pub fn close_distance(&self) -> f64 {
        self.snap.value(msg::ES_DISTANCE, sig::CLOSE_DISTANCE)
    }

    pub fn dash_status_message(&self) -> SignalMap {
        self.snap.message_cloned(msg::ES_DASH_STATUS)
    }

    pub fn lkas_state_message(&self) -> SignalMap {
        self.snap.message_cloned(msg::ES_LKAS_STATE)
    }

    pub fn distance_message(&self) -> SignalMap {
        self.snap.message_cloned(msg::ES_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entries_read_as_zero() {
        let snap = BusSnapshot::new();
        assert_eq!(snap.value(msg::THROTTLE, sig::THROTTLE_PEDAL), 0.0);
        assert!(snap.message(msg::THROTTLE).is_none());
        assert!(snap.message_cloned(msg::THROTTLE).is_empty());
    }

    #[test]
    fn test_set_then_read() {
        let mut snap = BusSnapshot::new();
        snap.set(msg::THROTTLE, sig::THROTTLE_PEDAL, 127.5);
        assert_eq!(snap.value(msg::THROTTLE, sig::THROTTLE_PEDAL), 127.5);
        // Other signals of the same message still default
        assert_eq!(snap.value(msg::THROTTLE, "Counter"), 0.0);
    }

    #[test]
    fn test_body_view_tolerates_absent_bus() {
        let view = BodyView::new(None);
        assert_eq!(view.throttle_pedal_hybrid(), 0.0);
        assert_eq!(view.wheel_speed_rr(), 0.0);
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let mut snap = BusSnapshot::new();
        snap.set(msg::WHEEL_SPEEDS, sig::FL, 10.25);
        snap.set(msg::DASHLIGHTS, sig::UNITS, 1.0);

        let json = serde_json::to_string(&snap).unwrap();
        let back: BusSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
        assert_eq!(back.value(msg::WHEEL_SPEEDS, sig::FL), 10.25);
    }
}
