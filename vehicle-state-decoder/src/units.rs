//! Speed unit conversion constants
//!
//! The state record carries speeds in m/s. Dash set-speed arrives in km/h, or
//! in mph when the cluster units flag is set.

/// km/h to m/s
pub const KPH_TO_MS: f64 = 1.0 / 3.6;

/// m/s to km/h
pub const MS_TO_KPH: f64 = 3.6;

/// mph to km/h
pub const MPH_TO_KPH: f64 = 1.609344;

/// km/h to mph
pub const KPH_TO_MPH: f64 = 1.0 / MPH_TO_KPH;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips() {
        assert!((KPH_TO_MS * MS_TO_KPH - 1.0).abs() < 1e-12);
        assert!((MPH_TO_KPH * KPH_TO_MPH - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kph_to_ms() {
        assert!((36.0 * KPH_TO_MS - 10.0).abs() < 1e-12);
    }
}
