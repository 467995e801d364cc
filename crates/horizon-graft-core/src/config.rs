//! Bridge configuration.
//!
//! [`BridgeConfig`] decides how the bridge maps host coordinates onto the
//! toolkit and whether host input is forwarded. It can be built in code or
//! loaded from TOML; every key is optional.
//!
//! ```toml
//! host_origin = "top_left"
//! toolkit_origin = "bottom_left"
//! forward_input = true
//!
//! [scale]
//! fixed = 2.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coords::{validate_scale, CoordinateMapping, Origin};
use crate::error::{ConfigError, ConstraintViolation};

/// How the bridge derives the host-to-toolkit scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Use the window's current scale factor as reported by the host. This
    /// tracks display changes (moving the window to a HiDPI monitor).
    #[default]
    FollowHost,
    /// Always use this many host units per toolkit unit.
    Fixed(f64),
    /// Host and toolkit units are the same.
    Identity,
}

impl ScalePolicy {
    /// Resolve the policy against the host's current scale factor.
    pub fn resolve(&self, host_scale: f64) -> f64 {
        match self {
            Self::FollowHost => host_scale,
            Self::Fixed(scale) => *scale,
            Self::Identity => 1.0,
        }
    }
}

/// Configuration for an embedding bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Origin convention of the host platform.
    pub host_origin: Origin,
    /// Origin convention of the foreign toolkit.
    pub toolkit_origin: Origin,
    /// Scale derivation.
    pub scale: ScalePolicy,
    /// Forward host input events to the embedded surface.
    ///
    /// Leave this off when the toolkit's drawable is a real native child,
    /// since the OS already delivers input to it.
    pub forward_input: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host_origin: Origin::TopLeft,
            toolkit_origin: Origin::TopLeft,
            scale: ScalePolicy::FollowHost,
            forward_input: false,
        }
    }
}

impl BridgeConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both origin conventions.
    pub fn with_origins(mut self, host: Origin, toolkit: Origin) -> Self {
        self.host_origin = host;
        self.toolkit_origin = toolkit;
        self
    }

    /// Set the scale policy.
    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }

    /// Enable or disable input forwarding.
    pub fn with_forward_input(mut self, forward: bool) -> Self {
        self.forward_input = forward;
        self
    }

    /// Check the configuration for values the bridge cannot use.
    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        if let ScalePolicy::Fixed(scale) = self.scale {
            validate_scale(scale)?;
        }
        Ok(())
    }

    /// Build the coordinate mapping for a window with the given host scale.
    pub fn mapping(&self, host_scale: f64) -> Result<CoordinateMapping, ConstraintViolation> {
        CoordinateMapping::new(
            self.scale.resolve(host_scale),
            self.host_origin,
            self.toolkit_origin,
        )
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            target: crate::logging::targets::BRIDGE,
            path = %path.display(),
            ?config,
            "loaded bridge configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.host_origin, Origin::TopLeft);
        assert_eq!(config.toolkit_origin, Origin::TopLeft);
        assert_eq!(config.scale, ScalePolicy::FollowHost);
        assert!(!config.forward_input);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let text = r#"
            host_origin = "bottom_left"
            toolkit_origin = "top_left"
            forward_input = true

            [scale]
            fixed = 2.0
        "#;
        let config = BridgeConfig::from_toml_str(text).unwrap();
        assert_eq!(config.host_origin, Origin::BottomLeft);
        assert_eq!(config.scale, ScalePolicy::Fixed(2.0));
        assert!(config.forward_input);
    }

    #[test]
    fn test_unit_scale_policy_parses() {
        let config = BridgeConfig::from_toml_str(r#"scale = "identity""#).unwrap();
        assert_eq!(config.scale, ScalePolicy::Identity);
    }

    #[test]
    fn test_rejects_invalid_fixed_scale() {
        let err = BridgeConfig::from_toml_str("[scale]\nfixed = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = BridgeConfig::from_toml_str("host_origin = \"sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_scale_policy_resolution() {
        assert_eq!(ScalePolicy::FollowHost.resolve(1.5), 1.5);
        assert_eq!(ScalePolicy::Fixed(3.0).resolve(1.5), 3.0);
        assert_eq!(ScalePolicy::Identity.resolve(1.5), 1.0);
    }

    #[test]
    fn test_mapping_uses_policy() {
        let config = BridgeConfig::new()
            .with_origins(Origin::BottomLeft, Origin::TopLeft)
            .with_scale(ScalePolicy::Identity);
        let mapping = config.mapping(2.0).unwrap();
        assert_eq!(mapping.scale(), 1.0);
        assert_eq!(mapping.host_origin(), Origin::BottomLeft);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "forward_input = true").unwrap();
        let config = BridgeConfig::load(file.path()).unwrap();
        assert!(config.forward_input);
    }

    #[test]
    fn test_load_missing_file() {
        let err = BridgeConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
