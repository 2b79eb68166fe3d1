//! Demo settings: per-scene defaults with optional JSON overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use lumen_fx::BeamStyle;
use lumen_tracer::ReflectorConfig;

use crate::cli::SceneKind;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub reflector: ReflectorConfig,
    pub frames: u32,
    pub stride: f32,
    pub width: f32,
}

/// Demo-only keys of a config file. Reflector keys in the same document are
/// read by [`ReflectorConfig::with_overrides`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoOverrides {
    frames: Option<u32>,
    stride: Option<f32>,
    width: Option<f32>,
}

impl DemoConfig {
    pub fn for_scene(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Blocks => Self {
                reflector: ReflectorConfig {
                    bounce: 10,
                    far: 10.0,
                    start: [10.0, 5.0, 0.0],
                    end: [0.0; 3],
                },
                frames: 240,
                stride: 3.0,
                width: 6.0,
            },
            SceneKind::Prism => Self {
                reflector: ReflectorConfig {
                    bounce: 10,
                    far: 20.0,
                    ..ReflectorConfig::default()
                },
                frames: 240,
                stride: 4.0,
                width: 8.0,
            },
        }
    }

    /// Scene defaults with the keys present in `json` laid on top.
    pub fn with_overrides(kind: SceneKind, json: &str) -> Result<Self> {
        let defaults = Self::for_scene(kind);
        let reflector = defaults.reflector.with_overrides(json)?;
        let demo: DemoOverrides = serde_json::from_str(json).context("Config has invalid demo values")?;

        Ok(Self {
            reflector,
            frames: demo.frames.unwrap_or(defaults.frames),
            stride: demo.stride.unwrap_or(defaults.stride),
            width: demo.width.unwrap_or(defaults.width),
        })
    }

    pub fn load(kind: SceneKind, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::with_overrides(kind, &json).with_context(|| format!("Failed to load config {}", path.display()))
    }

    pub fn style(&self) -> BeamStyle {
        BeamStyle {
            stride: self.stride,
            width: self.width,
        }
    }
}
