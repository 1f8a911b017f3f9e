//=========================================================================
// World Configuration
//=========================================================================
//
// Content configuration (bodies and their landed content) and tuning
// values for every subsystem.
//
// Content is loaded once at startup from JSON and is immutable afterwards.
// Settings carry defaults for every field so a partial JSON document (or
// none at all) yields a complete configuration.
//
// Example content document:
// ```text
// {
//   "sun": { "title": "Sol", "texture": "sun" },
//   "planets": [
//     {
//       "title": "Projects",
//       "texturePath": "planetTexture2",
//       "sizeFactor": 0.25,
//       "positionFactor": 3.0,
//       "revolutionSpeedFactor": 0.0002,
//       "rotationSpeedFactor": 0.0005,
//       "contentSections": [
//         { "sectionTitle": "Rust", "description": "...", "items": ["a", "b"] }
//       ]
//     }
//   ]
// }
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== ConfigError =========================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("a body has an empty title")]
    EmptyTitle,

    #[error("body title {0:?} is used more than once")]
    DuplicateTitle(String),

    #[error("body {title:?} has invalid {field}: {value}")]
    InvalidFactor {
        title: String,
        field: &'static str,
        value: f32,
    },

    #[error("setting {field} is out of range: {value}")]
    InvalidSetting { field: &'static str, value: f32 },
}

//=== TextureRef ==========================================================

/// Opaque texture reference resolved by the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureRef(String);

impl TextureRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//=== Content =============================================================

/// One titled block of landed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub section_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Describes one orbiting body and the content shown when landing on it.
///
/// All factors are relative to [`WorldSettings::sun_radius`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyDescriptor {
    pub title: String,
    #[serde(rename = "texturePath", alias = "textureRef")]
    pub texture: TextureRef,
    pub size_factor: f32,
    pub position_factor: f32,
    pub revolution_speed_factor: f32,
    pub rotation_speed_factor: f32,
    #[serde(default)]
    pub content_sections: Vec<ContentSection>,
}

/// The central star of the space scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunDescriptor {
    pub title: String,
    pub texture: TextureRef,
}

impl Default for SunDescriptor {
    fn default() -> Self {
        Self {
            title: "Sun".to_string(),
            texture: TextureRef::new("sun"),
        }
    }
}

/// Content handed to the landed mode for one body.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetContent {
    pub title: String,
    pub texture: TextureRef,
    pub sections: Vec<ContentSection>,
}

/// The full content configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub sun: SunDescriptor,
    pub planets: Vec<BodyDescriptor>,
}

impl ContentConfig {
    //--- Loading ----------------------------------------------------------

    /// Reads and validates a content document from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json_str(&raw)?;
        info!(
            "Loaded {} body descriptors from {}",
            config.planets.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates a content document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    //--- Validation -------------------------------------------------------

    /// Checks that titles are unique and every factor is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut titles = HashSet::with_capacity(self.planets.len());

        for body in &self.planets {
            if body.title.trim().is_empty() {
                return Err(ConfigError::EmptyTitle);
            }
            if !titles.insert(body.title.as_str()) {
                return Err(ConfigError::DuplicateTitle(body.title.clone()));
            }

            let factors = [
                ("sizeFactor", body.size_factor),
                ("positionFactor", body.position_factor),
                ("revolutionSpeedFactor", body.revolution_speed_factor),
                ("rotationSpeedFactor", body.rotation_speed_factor),
            ];
            for (field, value) in factors {
                if !value.is_finite() {
                    return Err(ConfigError::InvalidFactor {
                        title: body.title.clone(),
                        field,
                        value,
                    });
                }
            }

            if body.size_factor <= 0.0 {
                return Err(ConfigError::InvalidFactor {
                    title: body.title.clone(),
                    field: "sizeFactor",
                    value: body.size_factor,
                });
            }
        }

        Ok(())
    }

    //--- Lookup -----------------------------------------------------------

    /// Landed content for the body titled `title`.
    pub fn planet_content(&self, title: &str) -> Option<PlanetContent> {
        self.planets
            .iter()
            .find(|body| body.title == title)
            .map(|body| PlanetContent {
                title: body.title.clone(),
                texture: body.texture.clone(),
                sections: body.content_sections.clone(),
            })
    }
}

//=== Settings ============================================================

/// Ship flight tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Per-axis thrust. `z` drives forward/backward, `y` scales yaw rate.
    pub acceleration: Vec3,
    /// Per-axis damping factors (negative values oppose velocity).
    pub deceleration: Vec3,
    pub spawn: Vec3,
    pub model_scale: f32,
    pub model_source: String,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            acceleration: Vec3::new(1.0, 0.1, 10.0),
            deceleration: Vec3::new(-0.0005, -0.0001, -5.0),
            spawn: Vec3::new(56.0, 0.0, -80.0),
            model_scale: 0.5,
            model_source: "spaceship.glb".to_string(),
        }
    }
}

/// Third-person follow camera tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Camera position relative to the ship, in ship space.
    pub offset: Vec3,
    /// Look target relative to the ship, in ship space.
    pub look_ahead: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of the remaining distance left after one second.
    pub smoothing: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            offset: Vec3::new(-15.0, 20.0, -30.0),
            look_ahead: Vec3::new(0.0, 10.0, 50.0),
            fov_degrees: 60.0,
            near: 1.0,
            far: 100_000.0,
            smoothing: 0.001,
        }
    }
}

/// Landed mode tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandedTuning {
    pub camera_position: Vec3,
    /// Pitch applied to the camera, in radians.
    pub camera_tilt: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub ground_size: f32,
    pub ground_segments: u32,
    pub ground_displacement: f32,
    pub ambient_intensity: f32,
}

impl Default for LandedTuning {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(25.0, 20.0, 25.0),
            camera_tilt: std::f32::consts::PI / 12.0,
            fov_degrees: 60.0,
            near: 1.0,
            far: 1000.0,
            ground_size: 1000.0,
            ground_segments: 100,
            ground_displacement: 5.0,
            ambient_intensity: 0.25,
        }
    }
}

/// Tuning values for the whole world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Scale unit every body factor is multiplied by.
    pub sun_radius: f32,
    /// Sun self-spin, radians per tick.
    pub sun_spin: f32,
    pub ambient_intensity: f32,
    pub flight: FlightTuning,
    pub camera: CameraTuning,
    pub landed: LandedTuning,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            sun_radius: 20.0,
            sun_spin: 0.01,
            ambient_intensity: 0.5,
            flight: FlightTuning::default(),
            camera: CameraTuning::default(),
            landed: LandedTuning::default(),
        }
    }
}

impl WorldSettings {
    /// Reads tuning overrides from disk. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: Self = serde_json::from_str(&raw)?;
        settings.validate()?;
        info!("Loaded world settings from {}", path.display());
        Ok(settings)
    }

    /// Rejects tuning that would make the simulation produce NaN or
    /// degenerate geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        let landed = &self.landed;
        let flight = &self.flight;

        let positive = [
            ("sun_radius", self.sun_radius),
            ("flight.model_scale", flight.model_scale),
            ("camera.near", camera.near),
            ("landed.near", landed.near),
            ("landed.ground_size", landed.ground_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSetting { field, value });
            }
        }

        let finite = [
            ("sun_spin", self.sun_spin),
            ("ambient_intensity", self.ambient_intensity),
            ("landed.camera_tilt", landed.camera_tilt),
            ("landed.ground_displacement", landed.ground_displacement),
            ("landed.ambient_intensity", landed.ambient_intensity),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidSetting { field, value });
            }
        }

        let vectors = [
            ("flight.acceleration", flight.acceleration),
            ("flight.deceleration", flight.deceleration),
            ("flight.spawn", flight.spawn),
            ("camera.offset", camera.offset),
            ("camera.look_ahead", camera.look_ahead),
            ("landed.camera_position", landed.camera_position),
        ];
        for (field, value) in vectors {
            if !value.is_finite() {
                let bad = value.to_array().into_iter().find(|c| !c.is_finite());
                return Err(ConfigError::InvalidSetting {
                    field,
                    value: bad.unwrap_or(f32::NAN),
                });
            }
        }

        // Lerp factor is 1 - smoothing^dt
        if !(camera.smoothing > 0.0 && camera.smoothing <= 1.0) {
            return Err(ConfigError::InvalidSetting {
                field: "camera.smoothing",
                value: camera.smoothing,
            });
        }

        let fovs = [
            ("camera.fov_degrees", camera.fov_degrees),
            ("landed.fov_degrees", landed.fov_degrees),
        ];
        for (field, fov) in fovs {
            if !(fov > 0.0 && fov < 180.0) {
                return Err(ConfigError::InvalidSetting { field, value: fov });
            }
        }

        let planes = [
            ("camera.far", camera.near, camera.far),
            ("landed.far", landed.near, landed.far),
        ];
        for (field, near, far) in planes {
            if !(far.is_finite() && far > near) {
                return Err(ConfigError::InvalidSetting { field, value: far });
            }
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
