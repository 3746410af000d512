//! Configuration loading and parsing
//!
//! The CLI stands in for the startup-time external key-value store: the
//! variant selected by the fingerprint matcher and the feature toggles are
//! read once from a TOML file and handed to the decoder's constructor.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vehicle_state_decoder::VehicleVariant;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Variant identifier, e.g. "impreza-2019"
    pub variant: String,

    /// Subscribe and decode the blind-spot monitor signals
    #[serde(default)]
    pub enable_blind_spot_monitor: bool,

    /// Operator toggle for the manual parking brake; the decoder derives the
    /// electronic-parking-brake capability from it
    #[serde(default = "default_manual_parking_brake")]
    pub manual_parking_brake: bool,
}

fn default_manual_parking_brake() -> bool {
    true
}

impl AppConfig {
    /// Resolve the configured variant identifier against the closed set
    pub fn resolve_variant(&self) -> Result<VehicleVariant> {
        self.variant
            .parse()
            .with_context(|| format!("Invalid variant in config: {:?}", self.variant))
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            variant = "outback-2020"
            enable_blind_spot_monitor = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.variant, "outback-2020");
        assert!(config.enable_blind_spot_monitor);
        assert!(config.manual_parking_brake);
        assert_eq!(
            config.resolve_variant().unwrap(),
            VehicleVariant::Outback2020
        );
    }

    #[test]
    fn test_unknown_variant_in_config_is_rejected() {
        let config: AppConfig = toml::from_str(r#"variant = "baja-2006""#).unwrap();
        assert!(config.resolve_variant().is_err());
    }
}
