//! Core types for the vehicle state decoder library
//!
//! This module defines the fundamental types the decoder produces once per
//! receive cycle. The decoder is pure over its inputs and only outputs state
//! records - it does not track history or evaluate message liveness.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Raw decoded view of a single bus message, exactly as the external frame
/// engine produced it (signal name -> physical value)
///
/// Kept verbatim in [`RawMessageEcho`] so the downstream command encoder can
/// echo counters and checksums back onto the bus.
pub type SignalMap = HashMap<String, f64>;

/// Errors that can occur while configuring the decoder
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// An externally supplied variant identifier is not one of the closed set.
    /// Variant selection is validated upstream by the fingerprint matcher, so
    /// this only occurs when parsing untrusted configuration input.
    #[error("Unknown vehicle variant: {0}")]
    UnknownVariant(String),
}

/// Semantic gear position, resolved from the variant's raw gear code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearPosition {
    /// Raw code missing or not declared by the active signal set
    #[default]
    Unknown,
    Park,
    Reverse,
    Neutral,
    Drive,
    Sport,
    Low,
    Brake,
    Manumatic,
}

impl fmt::Display for GearPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GearPosition::Unknown => "unknown",
            GearPosition::Park => "park",
            GearPosition::Reverse => "reverse",
            GearPosition::Neutral => "neutral",
            GearPosition::Drive => "drive",
            GearPosition::Sport => "sport",
            GearPosition::Low => "low",
            GearPosition::Brake => "brake",
            GearPosition::Manumatic => "manumatic",
        };
        write!(f, "{}", name)
    }
}

/// Per-corner wheel speeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelSpeeds {
    pub fl: f64,
    pub fr: f64,
    pub rl: f64,
    pub rr: f64,
}

/// Cruise control status as shown to the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CruiseState {
    /// Cruise is actively controlling speed
    pub enabled: bool,
    /// Cruise is switched on and ready to engage
    pub available: bool,
    /// Set speed in internal units (m/s)
    pub speed: f64,
    /// Conventional (non-adaptive) cruise engaged. Only reported by the
    /// global-generation dash status message; `None` for pre-global variants.
    pub non_adaptive: Option<bool>,
}

/// The canonical vehicle state record, produced once per receive cycle
///
/// Created fresh each cycle and never mutated after being returned. A missing
/// or stale source signal decodes to its default value; gating on the external
/// engine's liveness checks is the caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVehicleState {
    /// Throttle pedal fraction in [0, 1]
    pub throttle: f64,
    pub throttle_pressed: bool,
    pub brake_pressed: bool,

    pub wheel_speeds: WheelSpeeds,
    /// Arithmetic mean of the four wheel speeds
    pub speed_raw: f64,
    /// Filtered longitudinal speed from the external estimator
    pub speed: f64,
    /// Longitudinal acceleration from the external estimator
    pub accel: f64,
    pub standstill: bool,

    pub left_blinker: bool,
    pub right_blinker: bool,
    /// Blind-spot flags are only populated when monitoring is enabled
    pub left_blind_spot: Option<bool>,
    pub right_blind_spot: Option<bool>,

    pub gear: GearPosition,

    pub steering_angle_deg: f64,
    pub steering_torque: f64,
    pub steering_pressed: bool,
    pub steer_fault_permanent: bool,
    /// Torque-sensor warning. Only defined for global-generation variants.
    pub steer_fault_temporary: Option<bool>,

    pub cruise: CruiseState,

    pub seatbelt_unlatched: bool,
    pub door_open: bool,
}

/// Raw messages retained verbatim for the downstream command encoder
///
/// The encoder must echo counters and checksums from these messages back onto
/// the bus, so they are kept exactly as decoded. Which entries are populated
/// depends on the variant's generation and bus routing. Owned by the decoding
/// cycle; overwritten on the next cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessageEcho {
    /// Primary-bus throttle message, captured for every variant
    pub throttle: SignalMap,
    /// Primary-bus brake pedal message (global generation only)
    pub brake_pedal: Option<SignalMap>,
    /// Camera-bus dash status message (global generation only)
    pub cruise_dash: Option<SignalMap>,
    /// Camera-bus LKAS state message (global generation only)
    pub lkas_state: Option<SignalMap>,
    /// Distance message; camera-bus sourced, absent for the hybrid and the
    /// secondary-bus-body variants of the global generation
    pub distance: Option<SignalMap>,

    /// Cruise button state from the camera distance message (pre-global only)
    pub cruise_button: Option<f64>,
    /// Camera ECU finished its startup sequence (pre-global only)
    pub ready: Option<bool>,
    /// Dash cruise state machine value (global generation only)
    pub cruise_state: Option<f64>,
    /// Lead-car-follow flag, bus routing per variant
    pub car_follow: Option<f64>,
    /// Close-distance reading, bus routing per variant
    pub close_distance: Option<f64>,
}
