//! Stage configuration.
//!
//! Every struct uses `#[serde(default)]`, so a JSON file only needs the
//! fields it overrides:
//!
//! ```json
//! { "camera": { "fov_degrees": 50.0 }, "framing": { "padding": 1.5 } }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{FramingSettings, GlideSettings};
use crate::errors::{Result, StageError};
use crate::tween::Ease;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Attach orbit controls to the stage camera.
    pub orbit_controls: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 10000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
            orbit_controls: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FramingConfig {
    pub padding: f32,
    pub flatness_threshold: f32,
    /// Seconds for `frame_object` and `move_camera_to_mesh`.
    pub duration: f32,
    /// Seconds for the return leg of a camera path.
    pub return_duration: f32,
    pub frame_ease: Ease,
    pub reframe_ease: Ease,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            padding: 1.2,
            flatness_threshold: 0.1,
            duration: 2.0,
            return_duration: 2.0,
            frame_ease: Ease::default(),
            reframe_ease: Ease::Power2Out,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlideConfig {
    pub rate: f32,
    pub epsilon: f32,
    pub timeout: f32,
}

impl Default for GlideConfig {
    fn default() -> Self {
        let defaults = GlideSettings::default();
        Self {
            rate: defaults.rate,
            epsilon: defaults.epsilon,
            timeout: defaults.timeout,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageConfig {
    pub camera: CameraConfig,
    pub framing: FramingConfig,
    pub glide: GlideConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Upper bound for one frame's delta in seconds.
    pub max_frame_delta: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { max_frame_delta: 0.1 }
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StageError::InvalidConfig(format!("{name} must be positive, got {value}")))
    }
}

impl StageConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading stage config from {}", path.as_ref().display());
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(StageError::InvalidConfig(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        positive("camera.aspect", camera.aspect)?;
        positive("camera.near", camera.near)?;
        if camera.far.is_nan() || camera.far <= camera.near {
            return Err(StageError::InvalidConfig(format!(
                "camera.far ({}) must exceed camera.near ({})",
                camera.far, camera.near
            )));
        }
        if !camera.position.is_finite() {
            return Err(StageError::InvalidConfig("camera.position must be finite".to_owned()));
        }

        positive("framing.padding", self.framing.padding)?;
        positive("framing.flatness_threshold", self.framing.flatness_threshold)?;
        positive("framing.duration", self.framing.duration)?;
        positive("framing.return_duration", self.framing.return_duration)?;

        positive("glide.rate", self.glide.rate)?;
        positive("glide.epsilon", self.glide.epsilon)?;
        positive("glide.timeout", self.glide.timeout)?;

        positive("timing.max_frame_delta", self.timing.max_frame_delta)
    }

    #[must_use]
    pub fn framing_settings(&self) -> FramingSettings {
        FramingSettings {
            padding: self.framing.padding,
            flatness_threshold: self.framing.flatness_threshold,
        }
    }

    #[must_use]
    pub fn glide_settings(&self) -> GlideSettings {
        GlideSettings {
            rate: self.glide.rate,
            epsilon: self.glide.epsilon,
            timeout: self.glide.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = StageConfig::from_json_str(r#"{ "camera": { "fov_degrees": 50.0 } }"#).unwrap();
        assert_eq!(config.camera.fov_degrees, 50.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.framing, FramingConfig::default());
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let config = StageConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(StageConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = StageConfig::from_json_str(r#"{ "glide": { "rate": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, StageError::InvalidConfig(_)));

        let err = StageConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, StageError::ConfigParse(_)));
    }
}
