//! Reflector configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use lumen_math::Vec3;

/// Largest accepted bounce count. Larger requests are clamped.
pub const MAX_BOUNCE: u32 = 1024;

/// Errors that can occur when reading a reflector configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid reflector config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid reflector config: expected a JSON object")]
    NotAnObject,
}

/// Construction parameters of a [`Reflector`](crate::Reflector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectorConfig {
    /// Maximum number of bounces; 0 is treated as 1, anything above
    /// [`MAX_BOUNCE`] as `MAX_BOUNCE`
    pub bounce: u32,
    /// Length of the final segment that leaves into open space
    pub far: f32,
    /// Initial ray origin
    pub start: [f32; 3],
    /// Initial ray target
    pub end: [f32; 3],
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            bounce: 10,
            far: 100.0,
            start: [0.0; 3],
            end: [0.0; 3],
        }
    }
}

impl ReflectorConfig {
    /// This configuration with the fields present in `json` replaced.
    ///
    /// Keys that are not reflector fields are ignored, so the same document
    /// can carry settings for other consumers.
    pub fn with_overrides(&self, json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(overrides) = value else {
            return Err(ConfigError::NotAnObject);
        };

        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        Ok(serde_json::from_value(merged)?)
    }

    pub fn start(&self) -> Vec3 {
        Vec3::from_array(self.start)
    }

    pub fn end(&self) -> Vec3 {
        Vec3::from_array(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReflectorConfig::default();
        assert_eq!(config.bounce, 10);
        assert_eq!(config.far, 100.0);
        assert_eq!(config.start(), Vec3::ZERO);
    }

    #[test]
    fn test_partial_json() {
        let config = ReflectorConfig::default().with_overrides(r#"{ "far": 10, "start": [10, 5, 0] }"#).unwrap();

        assert_eq!(config.bounce, 10);
        assert_eq!(config.far, 10.0);
        assert_eq!(config.start(), Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(config.end(), Vec3::ZERO);
    }

    #[test]
    fn test_overrides_keep_base_and_skip_foreign_keys() {
        let base = ReflectorConfig {
            far: 20.0,
            ..ReflectorConfig::default()
        };
        let config = base.with_overrides(r#"{ "bounce": 3, "frames": 12 }"#).unwrap();

        assert_eq!(config.bounce, 3);
        assert_eq!(config.far, 20.0);
    }

    #[test]
    fn test_invalid_json() {
        let err = ReflectorConfig::default().with_overrides(r#"{ "bounce": -1 }"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid reflector config"));

        let err = ReflectorConfig::default().with_overrides("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject));
    }
}
