//! Fault and threshold evaluators
//!
//! Small stateless predicates used by the state decoder. Kept as free
//! functions so each variant-conditional rule can be tested on its own,
//! independent of bus routing.

use crate::types::WheelSpeeds;

/// Throttle-pressed threshold on the pedal fraction (strict)
pub const THROTTLE_PRESSED_MIN: f64 = 1e-5;

/// Standstill threshold on the raw mean wheel speed, m/s (strict)
pub const STANDSTILL_SPEED_MAX: f64 = 0.01;

/// Pre-global brake pedal position above which the pedal counts as pressed
pub const PREGLOBAL_BRAKE_PEDAL_MIN: f64 = 2.0;

/// Throttle pedal is pressed
pub fn throttle_pressed(throttle: f64) -> bool {
    throttle > THROTTLE_PRESSED_MIN
}

/// Vehicle is at standstill
pub fn standstill(speed_raw: f64) -> bool {
    speed_raw < STANDSTILL_SPEED_MAX
}

/// Driver is overriding the steering, judged against the variant threshold
pub fn steering_pressed(steering_torque: f64, threshold: f64) -> bool {
    steering_torque.abs() > threshold
}

/// Brake pressed, pre-global generation: raw pedal position
pub fn brake_pressed_from_pedal(brake_pedal: f64) -> bool {
    brake_pedal > PREGLOBAL_BRAKE_PEDAL_MIN
}

/// Brake pressed, global generation: brake status flag
pub fn brake_pressed_from_flag(brake_flag: f64) -> bool {
    brake_flag == 1.0
}

/// Steer fault flag raised (error or warning signal)
pub fn steer_fault(flag: f64) -> bool {
    flag == 1.0
}

/// One side of the blind-spot monitor reports a vehicle
pub fn blind_spot(adjacent: f64, approaching: f64) -> bool {
    adjacent == 1.0 || approaching == 1.0
}

/// Arithmetic mean of the four wheel speeds
pub fn wheel_speed_average(speeds: &WheelSpeeds) -> f64 {
    (speeds.fl + speeds.fr + speeds.rl + speeds.rr) / 4.0
}
