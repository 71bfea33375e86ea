//! Shared configuration for the mesh editor
//!
//! This crate is the single source of truth for mesh table capacities,
//! camera parameters, editing tolerances and window dimensions. Every
//! section has defaults matching the reference scene, and a full
//! [`SceneConfig`] can be loaded from JSON with missing fields defaulted.

use serde::{Deserialize, Serialize};

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 720;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Default slot count for each mesh table (vertices, half-edges, faces)
pub const DEFAULT_TABLE_CAPACITY: usize = 512;

/// Default vertical field of view in degrees
pub const DEFAULT_FOV_DEGREES: f32 = 45.0;

/// Default near clip distance
pub const DEFAULT_NEAR: f32 = 0.1;

/// Default far clip distance
pub const DEFAULT_FAR: f32 = 100.0;

/// Errors produced while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Display configuration for window and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Width over height, used for the projection matrix
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Fixed slot counts for the mesh tables.
///
/// Tables are sized once from these values and never grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshCapacityConfig {
    pub max_vertices: usize,
    pub max_half_edges: usize,
    pub max_faces: usize,
}

impl Default for MeshCapacityConfig {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_TABLE_CAPACITY,
            max_half_edges: DEFAULT_TABLE_CAPACITY,
            max_faces: DEFAULT_TABLE_CAPACITY,
        }
    }
}

/// Fly camera parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Translation speed in world units per second
    pub move_speed: f32,
    /// Rotation in radians per pixel of mouse motion
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            move_speed: 3.0,
            look_sensitivity: 0.003,
        }
    }
}

/// Interactive editing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Vertical displacement speed for the selection, in units per second
    pub nudge_speed: f32,
    /// Maximum perpendicular ray distance for vertex picking
    pub vertex_pick_radius: f32,
    /// Closest accepted ray parameter for face picking
    pub pick_min_distance: f32,
    /// Farthest accepted ray parameter for face picking
    pub pick_max_distance: f32,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            nudge_speed: 1.0,
            vertex_pick_radius: 0.1,
            pick_min_distance: DEFAULT_NEAR,
            pick_max_distance: DEFAULT_FAR,
        }
    }
}

/// Complete configuration for a scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub display: DisplayConfig,
    pub capacity: MeshCapacityConfig,
    pub camera: CameraConfig,
    pub edit: EditConfig,
}

impl SceneConfig {
    /// Parse a config from JSON and validate it.
    ///
    /// Missing sections and fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid {
                field: "display",
                reason: format!(
                    "window size must be non-zero, got {}x{}",
                    self.display.width, self.display.height
                ),
            });
        }
        if self.capacity.max_half_edges < 3 || self.capacity.max_vertices < 3 {
            return Err(ConfigError::Invalid {
                field: "capacity",
                reason: "tables must hold at least one triangle".to_string(),
            });
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid {
                field: "camera",
                reason: format!(
                    "expected 0 < near < far, got near={} far={}",
                    self.camera.near, self.camera.far
                ),
            });
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid {
                field: "camera.fov_degrees",
                reason: format!("{} is outside (0, 180)", self.camera.fov_degrees),
            });
        }
        if self.edit.pick_max_distance < self.edit.pick_min_distance {
            return Err(ConfigError::Invalid {
                field: "edit",
                reason: "pick_max_distance is below pick_min_distance".to_string(),
            });
        }
        if self.edit.vertex_pick_radius < 0.0 {
            return Err(ConfigError::Invalid {
                field: "edit.vertex_pick_radius",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
