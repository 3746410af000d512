//! Gear shifter mapping
//!
//! Each signal dictionary declares its own enumeration of raw transmission
//! gear codes. The mapper is built once per variant from that declared
//! enumeration and resolves raw codes to semantic positions. Resolution never
//! fails: a code outside the declared table maps to
//! [`GearPosition::Unknown`], which downstream logic treats as a safe default.

use crate::types::GearPosition;
use crate::variants::SignalSet;

/// Declared gear-code table of the global-generation dictionaries
const GLOBAL_GEARS: &[(i64, &str)] = &[
    (1, "P"),
    (2, "R"),
    (3, "N"),
    (4, "D"),
    (5, "S"),
    (6, "L"),
    (7, "B"),
];

/// Declared gear-code table of the pre-global dictionaries
const PREGLOBAL_GEARS: &[(i64, &str)] = &[
    (1, "P"),
    (2, "R"),
    (3, "N"),
    (4, "D"),
    (5, "S"),
    (6, "L"),
    (7, "M"),
];

/// Maps variant-specific raw gear codes to semantic gear positions
#[derive(Debug, Clone, Copy)]
pub struct GearShifterMapper {
    table: &'static [(i64, &'static str)],
}

impl GearShifterMapper {
    /// Build the mapper from a signal set's declared gear enumeration
    pub fn for_signal_set(signal_set: SignalSet) -> Self {
        let table = match signal_set {
            SignalSet::Global2017 | SignalSet::GlobalHybrid2020 => GLOBAL_GEARS,
            SignalSet::Forester2017 | SignalSet::Outback2015 | SignalSet::Outback2019 => {
                PREGLOBAL_GEARS
            }
        };
        Self { table }
    }

    /// Resolve a raw gear code to its semantic position
    pub fn resolve(&self, raw_code: i64) -> GearPosition {
        self.table
            .iter()
            .find(|(code, _)| *code == raw_code)
            .map(|(_, name)| parse_gear_name(name))
            .unwrap_or(GearPosition::Unknown)
    }
}

/// Map a dictionary gear name to its semantic position
fn parse_gear_name(name: &str) -> GearPosition {
    match name.to_ascii_uppercase().as_str() {
        "P" | "PARK" => GearPosition::Park,
        "R" | "REVERSE" => GearPosition::Reverse,
        "N" | "NEUTRAL" => GearPosition::Neutral,
        "D" | "DRIVE" => GearPosition::Drive,
        "S" | "SPORT" => GearPosition::Sport,
        "L" | "LOW" => GearPosition::Low,
        "B" | "BRAKE" => GearPosition::Brake,
        "M" | "MANUMATIC" => GearPosition::Manumatic,
        _ => GearPosition::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::VehicleVariant;

    #[test]
    fn test_declared_codes_resolve_to_known_positions() {
        // Every declared code of every variant's dictionary must resolve
        for variant in VehicleVariant::ALL {
            let mapper = GearShifterMapper::for_signal_set(variant.config().signal_set);
            for (code, _) in mapper.table {
                assert_ne!(
                    mapper.resolve(*code),
                    GearPosition::Unknown,
                    "declared code {} of {} resolved to Unknown",
                    code,
                    variant
                );
            }
        }
    }

    #[test]
    fn test_undeclared_code_resolves_to_unknown() {
        let mapper = GearShifterMapper::for_signal_set(SignalSet::Global2017);
        assert_eq!(mapper.resolve(0), GearPosition::Unknown);
        assert_eq!(mapper.resolve(99), GearPosition::Unknown);
        assert_eq!(mapper.resolve(-1), GearPosition::Unknown);
    }

    #[test]
    fn test_global_table_mapping() {
        let mapper = GearShifterMapper::for_signal_set(SignalSet::Global2017);
        assert_eq!(mapper.resolve(1), GearPosition::Park);
        assert_eq!(mapper.resolve(2), GearPosition::Reverse);
        assert_eq!(mapper.resolve(3), GearPosition::Neutral);
        assert_eq!(mapper.resolve(4), GearPosition::Drive);
        assert_eq!(mapper.resolve(6), GearPosition::Low);
    }

    #[test]
    fn test_preglobal_table_mapping() {
        let mapper = GearShifterMapper::for_signal_set(SignalSet::Forester2017);
        assert_eq!(mapper.resolve(1), GearPosition::Park);
        assert_eq!(mapper.resolve(4), GearPosition::Drive);
        assert_eq!(mapper.resolve(7), GearPosition::Manumatic);
    }

    #[test]
    fn test_missing_signal_default_resolves_to_unknown() {
        // An absent gear signal reads as 0.0 upstream; no dictionary declares
        // code 0, so missing data resolves to Unknown rather than a gear
        for set in [SignalSet::Global2017, SignalSet::Forester2017] {
            let mapper = GearShifterMapper::for_signal_set(set);
            assert_eq!(mapper.resolve(0), GearPosition::Unknown);
        }
    }

    #[test]
    fn test_gear_name_parsing_is_case_insensitive() {
        assert_eq!(parse_gear_name("d"), GearPosition::Drive);
        assert_eq!(parse_gear_name("park"), GearPosition::Park);
        assert_eq!(parse_gear_name("???"), GearPosition::Unknown);
    }
}
