//! State decoding
//!
//! Turns the three per-bus signal snapshots of one receive cycle into the
//! canonical vehicle state record plus the raw-message echo bundle. Runs on
//! the control-loop critical path at the cycle rate, so it is synchronous,
//! allocation-light and total over its inputs: a missing or stale signal
//! decodes to its default value and never fails the cycle (gating on the
//! frame engine's liveness report is the caller's job).

use crate::evaluators;
use crate::filters::{BlinkerHelper, SpeedFilter, BLINKER_PERSISTENCE_FRAMES};
use crate::gear::GearShifterMapper;
use crate::snapshot::{BodyView, BusSnapshot, CameraView, PrimaryView};
use crate::types::{NormalizedVehicleState, RawMessageEcho, WheelSpeeds};
use crate::units;
use crate::variants::{VariantConfig, VehicleVariant};

/// Decodes per-bus snapshots into the canonical vehicle state
///
/// Constructed once at startup after the external fingerprint matcher has
/// selected the variant; holds no per-cycle state. The longitudinal speed
/// filter and the blinker debounce helper are externally owned and passed
/// into every [`decode`](StateDecoder::decode) call.
pub struct StateDecoder {
    variant: VehicleVariant,
    config: &'static VariantConfig,
    gear_mapper: GearShifterMapper,
    enable_blind_spot_monitor: bool,
    /// Electronic parking brake capability, read once at construction from
    /// the caller's configuration store. Stored for downstream consumers;
    /// not consulted by any decoding rule.
    pub has_electronic_parking_brake: bool,
}

impl StateDecoder {
    /// Create a decoder for the selected variant
    ///
    /// `manual_parking_brake` is the operator-facing toggle from the external
    /// key-value store; the decoder records the derived capability.
    pub fn new(
        variant: VehicleVariant,
        enable_blind_spot_monitor: bool,
        manual_parking_brake: bool,
    ) -> Self {
        let config = variant.config();
        log::info!(
            "State decoder for {} (signal set {}, blind spot monitor {})",
            variant,
            config.signal_set.as_str(),
            if enable_blind_spot_monitor { "on" } else { "off" }
        );

        Self {
            variant,
            config,
            gear_mapper: GearShifterMapper::for_signal_set(config.signal_set),
            enable_blind_spot_monitor,
            has_electronic_parking_brake: !manual_parking_brake,
        }
    }

    pub fn variant(&self) -> VehicleVariant {
        self.variant
    }

    /// Decode one receive cycle
    ///
    /// `body` is `None` for variants without a secondary-bus subscription;
    /// passing `None` for a variant that routes signals there decodes those
    /// fields to their defaults, mirroring a not-yet-arrived message.
    pub fn decode(
        &self,
        primary: &BusSnapshot,
        body: Option<&BusSnapshot>,
        camera: &BusSnapshot,
        speed_filter: &mut dyn SpeedFilter,
        blinker: &mut dyn BlinkerHelper,
    ) -> (NormalizedVehicleState, RawMessageEcho) {
        let cfg = self.config;
        let primary = PrimaryView::new(primary);
        let body = BodyView::new(body);
        let camera = CameraView::new(camera);

        let mut state = NormalizedVehicleState::default();

        // Throttle: the hybrid powertrain reports the pedal on the body bus
        let throttle_raw = if cfg.is_hybrid {
            body.throttle_pedal_hybrid()
        } else {
            primary.throttle_pedal()
        };
        state.throttle = throttle_raw / 255.0;
        state.throttle_pressed = evaluators::throttle_pressed(state.throttle);

        state.brake_pressed = if cfg.is_preglobal {
            evaluators::brake_pressed_from_pedal(primary.brake_pedal())
        } else if cfg.uses_secondary_bus_for_body {
            evaluators::brake_pressed_from_flag(body.brake_flag())
        } else if cfg.is_hybrid {
            evaluators::brake_pressed_from_flag(body.brake_flag_hybrid())
        } else {
            evaluators::brake_pressed_from_flag(primary.brake_flag())
        };

        state.wheel_speeds = if cfg.uses_secondary_bus_for_body {
            WheelSpeeds {
                fl: body.wheel_speed_fl(),
                fr: body.wheel_speed_fr(),
                rl: body.wheel_speed_rl(),
                rr: body.wheel_speed_rr(),
            }
        } else {
            WheelSpeeds {
                fl: primary.wheel_speed_fl(),
                fr: primary.wheel_speed_fr(),
                rl: primary.wheel_speed_rl(),
                rr: primary.wheel_speed_rr(),
            }
        };
        state.speed_raw = evaluators::wheel_speed_average(&state.wheel_speeds);

        let estimate = speed_filter.update(state.speed_raw);
        state.speed = estimate.speed;
        state.accel = estimate.accel;
        state.standstill = evaluators::standstill(state.speed_raw);

        let (left, right) = blinker.update(
            BLINKER_PERSISTENCE_FRAMES,
            primary.left_blinker_lamp() != 0.0,
            primary.right_blinker_lamp() != 0.0,
        );
        state.left_blinker = left;
        state.right_blinker = right;

        if self.enable_blind_spot_monitor {
            state.left_blind_spot = Some(evaluators::blind_spot(
                primary.blind_spot_left_adjacent(),
                primary.blind_spot_left_approaching(),
            ));
            state.right_blind_spot = Some(evaluators::blind_spot(
                primary.blind_spot_right_adjacent(),
                primary.blind_spot_right_approaching(),
            ));
        }

        // Gear: the hybrid reports the transmission on the body bus
        let gear_code = if cfg.is_hybrid {
            body.gear_code()
        } else {
            primary.gear_code()
        };
        state.gear = self.gear_mapper.resolve(gear_code as i64);

        state.steering_angle_deg = if cfg.steering_angle_from_steering_message {
            primary.steering_angle_dedicated()
        } else {
            primary.steering_angle()
        };
        state.steering_torque = primary.steering_torque();
        state.steering_pressed =
            evaluators::steering_pressed(state.steering_torque, cfg.steer_fault_threshold);

        let (cruise_activated, cruise_on) = if cfg.uses_secondary_bus_for_body {
            (body.cruise_activated(), body.cruise_on())
        } else if cfg.cruise_from_camera {
            (camera.cruise_activated(), camera.cruise_on())
        } else {
            (primary.cruise_activated(), primary.cruise_on())
        };
        state.cruise.enabled = cruise_activated != 0.0;
        state.cruise.available = cruise_on != 0.0;

        // Set speed arrives in km/h, converted to m/s unconditionally, then
        // scaled once more when the cluster reports imperial units. The
        // two-stage conversion matches the deployed dash behavior; keep the
        // order as is.
        state.cruise.speed = camera.cruise_set_speed() * units::KPH_TO_MS;
        let units_flag = if cfg.is_preglobal {
            primary.units_flag_pre_global()
        } else {
            primary.units_flag()
        };
        if units_flag == 1.0 {
            state.cruise.speed *= units::MPH_TO_KPH;
        }

        state.seatbelt_unlatched = primary.seatbelt_fl() == 1.0;
        state.door_open = primary.any_door_open();
        state.steer_fault_permanent = evaluators::steer_fault(primary.steer_error_1());

        let mut echo = RawMessageEcho {
            throttle: primary.throttle_message(),
            ..RawMessageEcho::default()
        };

        if cfg.is_preglobal {
            echo.cruise_button = Some(camera.cruise_button());
            echo.ready = Some(camera.not_ready_startup() == 0.0);
            echo.distance = Some(camera.distance_message());
            echo.car_follow = Some(camera.car_follow());
            echo.close_distance = Some(camera.close_distance());
        } else {
            state.steer_fault_temporary =
                Some(evaluators::steer_fault(primary.steer_warning()));
            state.cruise.non_adaptive = Some(camera.conventional_cruise() == 1.0);

            echo.cruise_state = Some(camera.cruise_state());
            echo.brake_pedal = Some(primary.brake_pedal_message());
            echo.lkas_state = Some(camera.lkas_state_message());
            if cfg.uses_secondary_bus_for_body {
                echo.car_follow = Some(body.car_follow());
                echo.close_distance = Some(body.close_distance());
            } else if !cfg.is_hybrid {
                // No distance data is available for the hybrid
                echo.car_follow = Some(camera.car_follow());
                echo.close_distance = Some(camera.close_distance());
                echo.distance = Some(camera.distance_message());
            }
            echo.cruise_dash = Some(camera.dash_status_message());
        }

        (state, echo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::SpeedEstimate;
    use crate::snapshot::{msg, sig};
    use crate::types::GearPosition;

    /// Records the raw speed it was fed and returns a fixed estimate
    struct RecordingFilter {
        last_input: Option<f64>,
        estimate: SpeedEstimate,
    }

    impl RecordingFilter {
        fn new(speed: f64, accel: f64) -> Self {
            Self {
                last_input: None,
                estimate: SpeedEstimate { speed, accel },
            }
        }
    }

    impl SpeedFilter for RecordingFilter {
        fn update(&mut self, speed_raw: f64) -> SpeedEstimate {
            self.last_input = Some(speed_raw);
            self.estimate
        }
    }

    /// Passes the lamps straight through, recording the requested window
    struct RecordingBlinker {
        last_window: Option<u32>,
    }

    impl RecordingBlinker {
        fn new() -> Self {
            Self { last_window: None }
        }
    }

    impl BlinkerHelper for RecordingBlinker {
        fn update(&mut self, frames: u32, left: bool, right: bool) -> (bool, bool) {
            self.last_window = Some(frames);
            (left, right)
        }
    }

    fn decode_with(
        decoder: &StateDecoder,
        primary: &BusSnapshot,
        body: Option<&BusSnapshot>,
        camera: &BusSnapshot,
    ) -> (NormalizedVehicleState, RawMessageEcho) {
        let mut filter = RecordingFilter::new(0.0, 0.0);
        let mut blinker = RecordingBlinker::new();
        decoder.decode(primary, body, camera, &mut filter, &mut blinker)
    }

    #[test]
    fn test_speed_filter_receives_wheel_speed_mean() {
        let decoder = StateDecoder::new(VehicleVariant::Impreza2019, false, true);
        let mut primary = BusSnapshot::new();
        primary.set(msg::WHEEL_SPEEDS, sig::FL, 8.0);
        primary.set(msg::WHEEL_SPEEDS, sig::FR, 12.0);
        primary.set(msg::WHEEL_SPEEDS, sig::RL, 9.0);
        primary.set(msg::WHEEL_SPEEDS, sig::RR, 11.0);

        let mut filter = RecordingFilter::new(10.5, -0.25);
        let mut blinker = RecordingBlinker::new();
        let (state, _) =
            decoder.decode(&primary, None, &BusSnapshot::new(), &mut filter, &mut blinker);

        assert_eq!(filter.last_input, Some(10.0));
        assert_eq!(state.speed_raw, 10.0);
        assert_eq!(state.speed, 10.5);
        assert_eq!(state.accel, -0.25);
        assert!(!state.standstill);
    }

    #[test]
    fn test_blinker_helper_gets_fixed_window() {
        let decoder = StateDecoder::new(VehicleVariant::Impreza2019, false, true);
        let mut primary = BusSnapshot::new();
        primary.set(msg::DASHLIGHTS, sig::LEFT_BLINKER, 1.0);

        let mut filter = RecordingFilter::new(0.0, 0.0);
        let mut blinker = RecordingBlinker::new();
        let (state, _) =
            decoder.decode(&primary, None, &BusSnapshot::new(), &mut filter, &mut blinker);

        assert_eq!(blinker.last_window, Some(BLINKER_PERSISTENCE_FRAMES));
        assert!(state.left_blinker);
        assert!(!state.right_blinker);
    }

    #[test]
    fn test_cruise_speed_two_stage_conversion() {
        let decoder = StateDecoder::new(VehicleVariant::Impreza2019, false, true);
        let mut camera = BusSnapshot::new();
        camera.set(msg::ES_DASH_STATUS, sig::CRUISE_SET_SPEED, 100.0);

        // Metric cluster: single conversion
        let (state, _) = decode_with(&decoder, &BusSnapshot::new(), None, &camera);
        assert!((state.cruise.speed - 100.0 * units::KPH_TO_MS).abs() < 1e-9);

        // Imperial cluster: the mph constant is applied on top
        let mut primary = BusSnapshot::new();
        primary.set(msg::DASHLIGHTS, sig::UNITS, 1.0);
        let (state, _) = decode_with(&decoder, &primary, None, &camera);
        assert!(
            (state.cruise.speed - 100.0 * units::KPH_TO_MS * units::MPH_TO_KPH).abs() < 1e-9
        );
    }

    #[test]
    fn test_preglobal_units_flag_source() {
        let decoder = StateDecoder::new(VehicleVariant::ForesterPreglobal, false, true);
        let mut camera = BusSnapshot::new();
        camera.set(msg::ES_DASH_STATUS, sig::CRUISE_SET_SPEED, 100.0);

        // The dashlights units flag must be ignored for pre-global variants
        let mut primary = BusSnapshot::new();
        primary.set(msg::DASHLIGHTS, sig::UNITS, 1.0);
        let (state, _) = decode_with(&decoder, &primary, None, &camera);
        assert!((state.cruise.speed - 100.0 * units::KPH_TO_MS).abs() < 1e-9);

        primary.set(msg::DASH_STATE2, sig::UNITS, 1.0);
        let (state, _) = decode_with(&decoder, &primary, None, &camera);
        assert!(
            (state.cruise.speed - 100.0 * units::KPH_TO_MS * units::MPH_TO_KPH).abs() < 1e-9
        );
    }

    #[test]
    fn test_blind_spot_only_when_enabled() {
        let mut primary = BusSnapshot::new();
        primary.set(msg::BSD_RCTA, sig::L_ADJACENT, 1.0);
        primary.set(msg::BSD_RCTA, sig::R_APPROACHING, 1.0);

        let disabled = StateDecoder::new(VehicleVariant::Impreza2019, false, true);
        let (state, _) = decode_with(&disabled, &primary, None, &BusSnapshot::new());
        assert_eq!(state.left_blind_spot, None);
        assert_eq!(state.right_blind_spot, None);

        let enabled = StateDecoder::new(VehicleVariant::Impreza2019, true, true);
        let (state, _) = decode_with(&enabled, &primary, None, &BusSnapshot::new());
        assert_eq!(state.left_blind_spot, Some(true));
        assert_eq!(state.right_blind_spot, Some(true));
    }

    #[test]
    fn test_steering_angle_source_for_wrx() {
        let mut primary = BusSnapshot::new();
        primary.set(msg::STEERING_TORQUE, sig::STEERING_ANGLE, 12.0);
        primary.set(msg::STEERING, sig::STEERING_ANGLE, -3.5);

        let wrx = StateDecoder::new(VehicleVariant::WrxPreglobal, false, true);
        let (state, _) = decode_with(&wrx, &primary, None, &BusSnapshot::new());
        assert_eq!(state.steering_angle_deg, -3.5);

        let forester = StateDecoder::new(VehicleVariant::ForesterPreglobal, false, true);
        let (state, _) = decode_with(&forester, &primary, None, &BusSnapshot::new());
        assert_eq!(state.steering_angle_deg, 12.0);
    }

    #[test]
    fn test_steer_faults_by_generation() {
        let mut primary = BusSnapshot::new();
        primary.set(msg::STEERING_TORQUE, sig::STEER_ERROR_1, 1.0);
        primary.set(msg::STEERING_TORQUE, sig::STEER_WARNING, 1.0);

        let global = StateDecoder::new(VehicleVariant::Forester2019, false, true);
        let (state, _) = decode_with(&global, &primary, None, &BusSnapshot::new());
        assert!(state.steer_fault_permanent);
        assert_eq!(state.steer_fault_temporary, Some(true));

        let preglobal = StateDecoder::new(VehicleVariant::LegacyPreglobal, false, true);
        let (state, _) = decode_with(&preglobal, &primary, None, &BusSnapshot::new());
        assert!(state.steer_fault_permanent);
        assert_eq!(state.steer_fault_temporary, None);
    }

    #[test]
    fn test_gear_resolution_unknown_code() {
        let decoder = StateDecoder::new(VehicleVariant::Impreza2019, false, true);
        let mut primary = BusSnapshot::new();
        primary.set(msg::TRANSMISSION, sig::GEAR, 42.0);

        let (state, _) = decode_with(&decoder, &primary, None, &BusSnapshot::new());
        assert_eq!(state.gear, GearPosition::Unknown);
    }

    #[test]
    fn test_echo_branches_by_generation() {
        let mut primary = BusSnapshot::new();
        primary.set(msg::THROTTLE, "Counter", 7.0);
        primary.set(msg::BRAKE_PEDAL, "Counter", 3.0);
        let mut camera = BusSnapshot::new();
        camera.set(msg::ES_DISTANCE, sig::CRUISE_BUTTON, 2.0);
        camera.set(msg::ES_DISTANCE, sig::CLOSE_DISTANCE, 5.0);
        camera.set(msg::ES_DASH_STATUS, sig::CRUISE_STATE, 4.0);

        let preglobal = StateDecoder::new(VehicleVariant::OutbackPreglobal, false, true);
        let (_, echo) = decode_with(&preglobal, &primary, None, &camera);
        assert_eq!(echo.throttle.get("Counter"), Some(&7.0));
        assert_eq!(echo.cruise_button, Some(2.0));
        assert_eq!(echo.ready, Some(true));
        assert!(echo.distance.is_some());
        assert!(echo.brake_pedal.is_none());
        assert!(echo.lkas_state.is_none());
        assert!(echo.cruise_dash.is_none());
        assert!(echo.cruise_state.is_none());

        let global = StateDecoder::new(VehicleVariant::Impreza2019, false, true);
        let (_, echo) = decode_with(&global, &primary, None, &camera);
        assert_eq!(echo.brake_pedal.as_ref().unwrap().get("Counter"), Some(&3.0));
        assert!(echo.lkas_state.is_some());
        assert!(echo.cruise_dash.is_some());
        assert_eq!(echo.cruise_state, Some(4.0));
        assert_eq!(echo.close_distance, Some(5.0));
        assert!(echo.cruise_button.is_none());
        assert!(echo.ready.is_none());
    }

    #[test]
    fn test_echo_distance_omitted_for_hybrid() {
        let decoder = StateDecoder::new(VehicleVariant::CrosstrekHybrid2020, false, true);
        let mut camera = BusSnapshot::new();
        camera.set(msg::ES_DISTANCE, sig::CLOSE_DISTANCE, 5.0);

        let (_, echo) = decode_with(&decoder, &BusSnapshot::new(), None, &camera);
        assert!(echo.distance.is_none());
        assert!(echo.car_follow.is_none());
        assert!(echo.close_distance.is_none());
    }

    #[test]
    fn test_missing_buses_decode_to_defaults() {
        // Decode must be total even when every snapshot is empty
        for variant in VehicleVariant::ALL {
            let decoder = StateDecoder::new(variant, true, false);
            let (state, echo) =
                decode_with(&decoder, &BusSnapshot::new(), None, &BusSnapshot::new());
            assert_eq!(state.throttle, 0.0);
            assert!(!state.throttle_pressed);
            assert!(state.standstill);
            assert_eq!(state.gear, GearPosition::Unknown, "{}", variant);
            assert!(echo.throttle.is_empty());
        }
    }
}
