//! Vehicle variant registry
//!
//! The supported vehicle family spans ~15 closely related but electrically
//! divergent variants (model years, drivetrains, trim levels). The same
//! logical quantity can live on a different bus, in a different message, or in
//! different units depending on the active variant, so every routing decision
//! in this crate is driven by the capability table defined here rather than by
//! scattered identity comparisons.
//!
//! The variant itself is selected once at startup by the external firmware
//! fingerprint matcher; this module only supplies the per-variant attributes.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported vehicle variants
///
/// Never constructed dynamically by this crate; parsing an external identifier
/// goes through [`FromStr`] and fails with
/// [`DecoderError::UnknownVariant`](crate::DecoderError::UnknownVariant) for
/// anything outside the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleVariant {
    Ascent2019,
    Impreza2019,
    Impreza2020,
    CrosstrekHybrid2020,
    Forester2019,
    ForesterHybrid2020,
    ForesterPreglobal,
    Legacy2020,
    LegacyPreglobal,
    LegacyPreglobal2018,
    LevorgPreglobal,
    Outback2020,
    OutbackPreglobal,
    OutbackPreglobal2018,
    WrxPreglobal,
}

impl VehicleVariant {
    /// All supported variants, for exhaustive iteration in tests and tooling
    pub const ALL: [VehicleVariant; 15] = [
        VehicleVariant::Ascent2019,
        VehicleVariant::Impreza2019,
        VehicleVariant::Impreza2020,
        VehicleVariant::CrosstrekHybrid2020,
        VehicleVariant::Forester2019,
        VehicleVariant::ForesterHybrid2020,
        VehicleVariant::ForesterPreglobal,
        VehicleVariant::Legacy2020,
        VehicleVariant::LegacyPreglobal,
        VehicleVariant::LegacyPreglobal2018,
        VehicleVariant::LevorgPreglobal,
        VehicleVariant::Outback2020,
        VehicleVariant::OutbackPreglobal,
        VehicleVariant::OutbackPreglobal2018,
        VehicleVariant::WrxPreglobal,
    ];

    /// Stable identifier used in configuration files and CLI arguments
    pub fn ident(self) -> &'static str {
        match self {
            VehicleVariant::Ascent2019 => "ascent-2019",
            VehicleVariant::Impreza2019 => "impreza-2019",
            VehicleVariant::Impreza2020 => "impreza-2020",
            VehicleVariant::CrosstrekHybrid2020 => "crosstrek-hybrid-2020",
            VehicleVariant::Forester2019 => "forester-2019",
            VehicleVariant::ForesterHybrid2020 => "forester-hybrid-2020",
            VehicleVariant::ForesterPreglobal => "forester-preglobal",
            VehicleVariant::Legacy2020 => "legacy-2020",
            VehicleVariant::LegacyPreglobal => "legacy-preglobal",
            VehicleVariant::LegacyPreglobal2018 => "legacy-preglobal-2018",
            VehicleVariant::LevorgPreglobal => "levorg-preglobal",
            VehicleVariant::Outback2020 => "outback-2020",
            VehicleVariant::OutbackPreglobal => "outback-preglobal",
            VehicleVariant::OutbackPreglobal2018 => "outback-preglobal-2018",
            VehicleVariant::WrxPreglobal => "wrx-preglobal",
        }
    }

    /// Human-readable model-year range for listings and logs
    pub fn display_name(self) -> &'static str {
        match self {
            VehicleVariant::Ascent2019 => "Ascent 2019-21",
            VehicleVariant::Impreza2019 => "Impreza 2017-19",
            VehicleVariant::Impreza2020 => "Impreza 2020-22",
            VehicleVariant::CrosstrekHybrid2020 => "Crosstrek Hybrid 2020",
            VehicleVariant::Forester2019 => "Forester 2019-22",
            VehicleVariant::ForesterHybrid2020 => "Forester Hybrid 2020",
            VehicleVariant::ForesterPreglobal => "Forester 2017-18",
            VehicleVariant::Legacy2020 => "Legacy 2020",
            VehicleVariant::LegacyPreglobal => "Legacy 2015-17",
            VehicleVariant::LegacyPreglobal2018 => "Legacy 2018-19",
            VehicleVariant::LevorgPreglobal => "Levorg 2016",
            VehicleVariant::Outback2020 => "Outback 2020",
            VehicleVariant::OutbackPreglobal => "Outback 2015-17",
            VehicleVariant::OutbackPreglobal2018 => "Outback 2018-19",
            VehicleVariant::WrxPreglobal => "WRX 2016-18",
        }
    }

    /// Capability table row for this variant
    pub fn config(self) -> &'static VariantConfig {
        VariantConfig::for_variant(self)
    }
}

impl fmt::Display for VehicleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident())
    }
}

impl FromStr for VehicleVariant {
    type Err = DecoderError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept both kebab-case and snake_case spellings
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        VehicleVariant::ALL
            .iter()
            .copied()
            .find(|v| v.ident() == normalized)
            .ok_or_else(|| DecoderError::UnknownVariant(s.to_string()))
    }
}

/// Named signal dictionary (DBC variant) that applies to a vehicle variant
///
/// The dictionaries themselves belong to the external frame engine; this crate
/// only needs the name for engine configuration and the declared gear-code
/// enumeration (see [`crate::gear`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSet {
    Global2017,
    GlobalHybrid2020,
    Forester2017,
    Outback2015,
    Outback2019,
}

impl SignalSet {
    /// Dictionary name as the external frame engine knows it
    pub fn as_str(self) -> &'static str {
        match self {
            SignalSet::Global2017 => "global_2017",
            SignalSet::GlobalHybrid2020 => "global_2020_hybrid",
            SignalSet::Forester2017 => "forester_2017",
            SignalSet::Outback2015 => "outback_2015",
            SignalSet::Outback2019 => "outback_2019",
        }
    }
}

/// Per-variant capability table row
///
/// Every variant-conditional rule in the parser configuration builder and the
/// state decoder consults these fields. Invariants: `is_preglobal` and
/// `is_hybrid` are never both set; `uses_secondary_bus_for_body` and
/// `is_hybrid` are never both set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantConfig {
    /// Driver-override torque threshold for the steering-pressed predicate
    pub steer_fault_threshold: f64,
    /// Older signal layout family with its own throttle/brake/steering set
    pub is_preglobal: bool,
    /// Wheel speed, cruise and brake status move to the secondary (body) bus
    pub uses_secondary_bus_for_body: bool,
    /// Throttle, brake and transmission move to the secondary (body) bus
    pub is_hybrid: bool,
    /// The dedicated cruise-control message exists on this variant
    pub supports_cruise_control_message: bool,
    /// Cruise enabled/available are read from the camera-bus dash status
    pub cruise_from_camera: bool,
    /// Steering angle comes from the dedicated steering message instead of
    /// the torque sensor message
    pub steering_angle_from_steering_message: bool,
    /// Expected dashlights message frequency, sub-family dependent
    pub dashlights_hz: u16,
    /// Signal dictionary that applies to this variant
    pub signal_set: SignalSet,
}

/// Global-generation baseline row
const GLOBAL: VariantConfig = VariantConfig {
    steer_fault_threshold: 80.0,
    is_preglobal: false,
    uses_secondary_bus_for_body: false,
    is_hybrid: false,
    supports_cruise_control_message: true,
    cruise_from_camera: false,
    steering_angle_from_steering_message: false,
    dashlights_hz: 10,
    signal_set: SignalSet::Global2017,
};

/// Forester Hybrid keeps the global bus layout but reports cruise status
/// through the camera dash message
const GLOBAL_CAMERA_CRUISE: VariantConfig = VariantConfig {
    cruise_from_camera: true,
    ..GLOBAL
};

/// Outback/Legacy 2020: body signals move to the secondary bus
const SECONDARY_BODY: VariantConfig = VariantConfig {
    uses_secondary_bus_for_body: true,
    ..GLOBAL
};

/// Crosstrek Hybrid: powertrain signals move to the secondary bus and the
/// dedicated cruise-control message is absent
const HYBRID: VariantConfig = VariantConfig {
    is_hybrid: true,
    supports_cruise_control_message: false,
    cruise_from_camera: true,
    signal_set: SignalSet::GlobalHybrid2020,
    ..GLOBAL
};

/// Pre-global baseline row (Forester/Levorg/WRX sub-family, 20 Hz dashlights)
const PREGLOBAL_FAST_DASH: VariantConfig = VariantConfig {
    steer_fault_threshold: 75.0,
    is_preglobal: true,
    dashlights_hz: 20,
    signal_set: SignalSet::Forester2017,
    ..GLOBAL
};

/// WRX reads steering angle from the dedicated steering message
const PREGLOBAL_WRX: VariantConfig = VariantConfig {
    steering_angle_from_steering_message: true,
    ..PREGLOBAL_FAST_DASH
};

/// Legacy/Outback 2015-17 sub-family, 10 Hz dashlights
const PREGLOBAL_2015: VariantConfig = VariantConfig {
    dashlights_hz: 10,
    signal_set: SignalSet::Outback2015,
    ..PREGLOBAL_FAST_DASH
};

/// Legacy/Outback 2018-19 sub-family, 10 Hz dashlights
const PREGLOBAL_2018: VariantConfig = VariantConfig {
    signal_set: SignalSet::Outback2019,
    ..PREGLOBAL_2015
};

impl VariantConfig {
    /// Look up the capability row for a variant
    ///
    /// The match is exhaustive over the closed enum, so an unknown variant is
    /// statically unreachable here; the fallible path for externally supplied
    /// identifiers is [`VehicleVariant::from_str`].
    pub fn for_variant(variant: VehicleVariant) -> &'static VariantConfig {
        match variant {
            VehicleVariant::Ascent2019
            | VehicleVariant::Impreza2019
            | VehicleVariant::Impreza2020
            | VehicleVariant::Forester2019 => &GLOBAL,
            VehicleVariant::ForesterHybrid2020 => &GLOBAL_CAMERA_CRUISE,
            VehicleVariant::Legacy2020 | VehicleVariant::Outback2020 => &SECONDARY_BODY,
            VehicleVariant::CrosstrekHybrid2020 => &HYBRID,
            VehicleVariant::ForesterPreglobal | VehicleVariant::LevorgPreglobal => {
                &PREGLOBAL_FAST_DASH
            }
            VehicleVariant::WrxPreglobal => &PREGLOBAL_WRX,
            VehicleVariant::LegacyPreglobal | VehicleVariant::OutbackPreglobal => &PREGLOBAL_2015,
            VehicleVariant::LegacyPreglobal2018 | VehicleVariant::OutbackPreglobal2018 => {
                &PREGLOBAL_2018
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_ident_round_trip() {
        for variant in VehicleVariant::ALL {
            let parsed: VehicleVariant = variant.ident().parse().unwrap();
            assert_eq!(parsed, variant);
        }
    }

    #[test]
    fn test_variant_parse_accepts_snake_case() {
        let parsed: VehicleVariant = "crosstrek_hybrid_2020".parse().unwrap();
        assert_eq!(parsed, VehicleVariant::CrosstrekHybrid2020);
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let err = "tribeca-2007".parse::<VehicleVariant>().unwrap_err();
        assert!(matches!(err, DecoderError::UnknownVariant(_)));
    }

    #[test]
    fn test_special_case_flags_are_mutually_exclusive() {
        for variant in VehicleVariant::ALL {
            let cfg = variant.config();
            assert!(
                !(cfg.is_preglobal && cfg.is_hybrid),
                "{} is both pre-global and hybrid",
                variant
            );
            assert!(
                !(cfg.uses_secondary_bus_for_body && cfg.is_hybrid),
                "{} is both secondary-bus-body and hybrid",
                variant
            );
        }
    }

    #[test]
    fn test_exactly_two_secondary_body_variants() {
        let count = VehicleVariant::ALL
            .iter()
            .filter(|v| v.config().uses_secondary_bus_for_body)
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_exactly_one_hybrid_variant() {
        let hybrids: Vec<_> = VehicleVariant::ALL
            .iter()
            .copied()
            .filter(|v| v.config().is_hybrid)
            .collect();
        assert_eq!(hybrids, vec![VehicleVariant::CrosstrekHybrid2020]);
    }

    #[test]
    fn test_steer_thresholds_by_generation() {
        for variant in VehicleVariant::ALL {
            let cfg = variant.config();
            let expected = if cfg.is_preglobal { 75.0 } else { 80.0 };
            assert_eq!(cfg.steer_fault_threshold, expected, "{}", variant);
        }
    }

    #[test]
    fn test_dashlights_frequency_sub_families() {
        use VehicleVariant::*;
        for variant in [ForesterPreglobal, LevorgPreglobal, WrxPreglobal] {
            assert_eq!(variant.config().dashlights_hz, 20);
        }
        for variant in [
            LegacyPreglobal,
            LegacyPreglobal2018,
            OutbackPreglobal,
            OutbackPreglobal2018,
        ] {
            assert_eq!(variant.config().dashlights_hz, 10);
        }
        assert_eq!(Impreza2019.config().dashlights_hz, 10);
    }

    #[test]
    fn test_signal_set_names() {
        assert_eq!(
            VehicleVariant::Impreza2019.config().signal_set.as_str(),
            "global_2017"
        );
        assert_eq!(
            VehicleVariant::CrosstrekHybrid2020.config().signal_set.as_str(),
            "global_2020_hybrid"
        );
        assert_eq!(
            VehicleVariant::WrxPreglobal.config().signal_set.as_str(),
            "forester_2017"
        );
    }
}
