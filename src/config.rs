//! Session configuration with TOML support.
//!
//! Every section uses `#[serde(default)]`, so a partial file (for example
//! one that only sets `[scene] seed`) fills the rest from defaults.
//!
//! ```toml
//! [scene]
//! shape_count = 50
//! seed = 42
//!
//! [interaction]
//! default_ray_length = 5.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GrabError, Result};

/// Top-level configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub scene: SceneConfig,
    pub interaction: InteractionConfig,
    pub viewer: ViewerConfig,
}

/// Shape pool generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of shapes placed at startup.
    pub shape_count: usize,
    /// Lower corner of the placement volume (inclusive).
    pub volume_min: [f32; 3],
    /// Upper corner of the placement volume (exclusive).
    pub volume_max: [f32; 3],
    /// Uniform scale range `[min, max)`.
    pub scale_range: [f32; 2],
    /// Fixed RNG seed; a random one is drawn and logged when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shape_count: 50,
            volume_min: [-2.0, 0.0, -2.0],
            volume_max: [2.0, 2.0, 2.0],
            scale_range: [0.5, 1.5],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Ray visual length when nothing is under the ray.
    pub default_ray_length: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            default_ray_length: 5.0,
        }
    }
}

/// Desktop viewer window and camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    /// Clear color (linear RGB).
    pub background: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Camera eye position; the camera looks along -Z.
    pub eye: [f32; 3],
    /// Sideways distance of each emulated device from the eye.
    pub device_offset: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            // 0x7fbfff
            background: [127.0 / 255.0, 191.0 / 255.0, 1.0],
            fov_degrees: 50.0,
            eye: [0.0, 1.6, 3.0],
            device_offset: 0.15,
        }
    }
}

impl SceneConfig {
    /// Checks the placement volume and scale range can be sampled.
    pub fn validate(&self) -> Result<()> {
        for axis in 0..3 {
            let (min, max) = (self.volume_min[axis], self.volume_max[axis]);
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(GrabError::InvalidConfig(format!(
                    "scene.volume_min[{axis}] must be finite and below scene.volume_max[{axis}]"
                )));
            }
        }
        let [scale_min, scale_max] = self.scale_range;
        if !(scale_min > 0.0 && scale_min < scale_max && scale_max.is_finite()) {
            return Err(GrabError::InvalidConfig(
                "scene.scale_range must be positive with min below max".to_string(),
            ));
        }
        Ok(())
    }
}

impl InteractionConfig {
    pub fn validate(&self) -> Result<()> {
        let ray = self.default_ray_length;
        if !(ray > 0.0 && ray.is_finite()) {
            return Err(GrabError::InvalidConfig(
                "interaction.default_ray_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GrabError::InvalidConfig(
                "viewer.width and viewer.height must be positive".to_string(),
            ));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(GrabError::InvalidConfig(
                "viewer.fov_degrees must be within (0, 180)".to_string(),
            ));
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|source| GrabError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| GrabError::Config {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed TOML for this configuration.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GrabError::InvalidConfig(e.to_string()))
    }

    /// Checks value ranges the session depends on.
    pub fn validate(&self) -> Result<()> {
        self.scene.validate()?;
        self.interaction.validate()?;
        self.viewer.validate()
    }

    pub fn with_shape_count(mut self, shape_count: usize) -> Self {
        self.scene.shape_count = shape_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.scene.seed = Some(seed);
        self
    }

    pub fn with_volume(mut self, min: [f32; 3], max: [f32; 3]) -> Self {
        self.scene.volume_min = min;
        self.scene.volume_max = max;
        self
    }

    pub fn with_default_ray_length(mut self, length: f32) -> Self {
        self.interaction.default_ray_length = length;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.viewer.width = width;
        self.viewer.height = height;
        self
    }
}
