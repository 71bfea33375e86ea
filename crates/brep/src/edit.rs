//! Interactive editing: picking and nudging mesh elements
//!
//! An [`EditSession`] consumes one frame of [`InputState`] plus the cursor
//! ray, updates the current [`Selection`] on click and moves the selected
//! face or vertex along world Y while a nudge key is held.

use brep_config::{EditConfig, SceneConfig};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::ID_NONE;
use crate::half_edge::{FaceId, HalfEdgeMesh, VertexId};
use crate::raycast::{PickMode, Ray};

/// Snapshot of the input devices for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Cursor position in window pixels, origin top-left
    pub cursor: Vec2,
    /// Mouse motion since the previous frame, in pixels
    pub mouse_delta: Vec2,
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Mouse look button held
    pub look_held: bool,
    /// Select button went down this frame
    pub select_pressed: bool,
    pub nudge_up: bool,
    pub nudge_down: bool,
    /// Pick vertices instead of faces
    pub vertex_mode: bool,
}

impl InputState {
    pub fn pick_mode(&self) -> PickMode {
        if self.vertex_mode {
            PickMode::Vertex
        } else {
            PickMode::Face
        }
    }

    /// -1, 0 or 1 depending on which nudge keys are held
    fn nudge_direction(&self) -> f32 {
        match (self.nudge_up, self.nudge_down) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// Currently selected mesh element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Face(FaceId),
    Vertex(VertexId),
}

impl Selection {
    /// Ids compared against the geometry topology tags: `(vertex, face)`.
    ///
    /// The slot that is not selected holds [`ID_NONE`], which no vertex or
    /// face ever carries.
    pub fn highlight_ids(&self) -> (u32, u32) {
        match *self {
            Selection::None => (ID_NONE, ID_NONE),
            Selection::Face(face) => (ID_NONE, face.0),
            Selection::Vertex(vertex) => (vertex.0, ID_NONE),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// Selection state and edit tuning for one mesh
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    pub selection: Selection,
    pub config: EditConfig,
}

impl EditSession {
    pub fn new(config: EditConfig) -> Self {
        Self {
            selection: Selection::None,
            config,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(config.edit.clone())
    }

    /// Process one frame of input.
    ///
    /// A select click replaces the selection with whatever the ray hits,
    /// clearing it on a miss. Held nudge keys then move the selection by
    /// `nudge_speed * dt` along world Y. Face planes are not refit.
    ///
    /// # Returns
    /// `true` when vertex positions changed and geometry must be regenerated.
    pub fn update(
        &mut self,
        mesh: &mut HalfEdgeMesh,
        input: &InputState,
        ray: &Ray,
        dt: f32,
    ) -> bool {
        if input.select_pressed {
            self.selection = self.pick(mesh, ray, input.pick_mode());
            debug!("update: selection is now {:?}", self.selection);
        }

        let direction = input.nudge_direction();
        if direction == 0.0 || self.selection.is_none() {
            return false;
        }

        let delta = Vec3::Y * direction * self.config.nudge_speed * dt;
        let result = match self.selection {
            Selection::Face(face) => mesh.translate_face(face, delta),
            Selection::Vertex(vertex) => mesh.translate_vertex(vertex, delta),
            Selection::None => Ok(()),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("update: dropping stale selection {:?}: {}", self.selection, e);
                self.selection = Selection::None;
                false
            }
        }
    }

    /// Resolve a ray to a selection without changing the session
    pub fn pick(&self, mesh: &HalfEdgeMesh, ray: &Ray, mode: PickMode) -> Selection {
        match mode {
            PickMode::Face => mesh
                .raycast_face(
                    ray,
                    self.config.pick_min_distance,
                    self.config.pick_max_distance,
                )
                .map_or(Selection::None, |hit| Selection::Face(hit.face)),
            PickMode::Vertex => mesh
                .raycast_vertex(ray, self.config.vertex_pick_radius)
                .map_or(Selection::None, |hit| Selection::Vertex(hit.vertex)),
        }
    }
}
