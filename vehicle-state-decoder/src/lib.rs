//! Vehicle State Decoder Library
//!
//! Decodes per-bus signal snapshots into a single canonical vehicle state
//! record for a driver-assistance control stack, across a family of ~15
//! closely related but electrically divergent vehicle variants.
//!
//! # Architecture
//!
//! The hard problem is not signal decoding but variant-conditional routing:
//! the same logical quantity (throttle, brake, wheel speed, cruise status,
//! gear) arrives on different buses, in different messages and sometimes in
//! different units depending on the active variant. This library:
//! - Holds the per-variant capability table ([`VariantConfig`])
//! - Builds the per-bus subscription and liveness specs the external frame
//!   engine needs ([`ParserConfigBuilder`])
//! - Decodes the three per-bus snapshots of each receive cycle into one
//!   normalized state plus a raw-message echo bundle ([`StateDecoder`])
//!
//! The library does NOT:
//! - Decode raw frames bit-by-bit (the external frame engine does)
//! - Match firmware fingerprints to select the variant
//! - Filter the longitudinal speed or debounce the blinkers (externally
//!   owned collaborators behind the [`SpeedFilter`] and [`BlinkerHelper`]
//!   seams)
//! - Validate message liveness; a stale signal decodes to its default and
//!   the caller gates on the engine's liveness report
//!
//! # Example Usage
//!
//! ```no_run
//! use vehicle_state_decoder::{
//!     BlinkerHelper, BusSnapshot, ParserConfigBuilder, SpeedEstimate, SpeedFilter,
//!     StateDecoder, VehicleVariant,
//! };
//!
//! // Variant selection comes from the external fingerprint matcher
//! let variant: VehicleVariant = "impreza-2019".parse().unwrap();
//!
//! // Tell the frame engine what to decode and watch on each bus
//! let parser_config = ParserConfigBuilder::new(variant)
//!     .with_blind_spot_monitor(true)
//!     .build();
//!
//! // Collaborators owned by the control stack
//! struct Passthrough;
//! impl SpeedFilter for Passthrough {
//!     fn update(&mut self, speed_raw: f64) -> SpeedEstimate {
//!         SpeedEstimate { speed: speed_raw, accel: 0.0 }
//!     }
//! }
//! impl BlinkerHelper for Passthrough {
//!     fn update(&mut self, _frames: u32, left: bool, right: bool) -> (bool, bool) {
//!         (left, right)
//!     }
//! }
//! let mut filter = Passthrough;
//! let mut blinker = Passthrough;
//!
//! let decoder = StateDecoder::new(variant, true, false);
//! // Once per receive cycle, after the engine refreshed the snapshots:
//! let (primary, camera) = (BusSnapshot::new(), BusSnapshot::new());
//! let (state, echo) = decoder.decode(&primary, None, &camera, &mut filter, &mut blinker);
//! println!("throttle {:.2} gear {}", state.throttle, state.gear);
//! let _ = (parser_config, echo);
//! ```

// Public modules
pub mod decoder;
pub mod evaluators;
pub mod filters;
pub mod gear;
pub mod parser_config;
pub mod snapshot;
pub mod types;
pub mod units;
pub mod variants;

// Re-export main types for convenience
pub use decoder::StateDecoder;
pub use filters::{BlinkerHelper, SpeedEstimate, SpeedFilter, BLINKER_PERSISTENCE_FRAMES};
pub use gear::GearShifterMapper;
pub use parser_config::{Bus, BusSpec, LivenessCheck, ParserConfig, ParserConfigBuilder, SignalRequest};
pub use snapshot::BusSnapshot;
pub use types::{
    CruiseState, DecoderError, GearPosition, NormalizedVehicleState, RawMessageEcho, Result,
    SignalMap, WheelSpeeds,
};
pub use variants::{SignalSet, VariantConfig, VehicleVariant};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
