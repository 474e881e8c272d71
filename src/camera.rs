use std::cell::RefCell;
use std::rc::Rc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::AppConfig;

/// Read-only view of a camera, as consumed by visibility filters.
pub trait CameraSource {
    fn projection_matrix(&self) -> Mat4;
    fn view_matrix(&self) -> Mat4;
    /// False until the camera has a usable projection, e.g. before the first
    /// resize delivered a non-zero viewport.
    fn ready(&self) -> bool;
    fn position(&self) -> Vec3;
}

/// Shared camera handle handed to filters at construction time.
pub type CameraHandle = Rc<RefCell<dyn CameraSource>>;

/// Right-handed free-look camera. At zero yaw and pitch it looks down -Z.
/// Angles are in degrees; positive yaw turns left, positive pitch looks up.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,

    aspect_ratio: f32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    pub fn new(field_of_view: f32, near_plane: f32, far_plane: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            field_of_view,
            near_plane,
            far_plane,
            aspect_ratio: 0.0,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.field_of_view, config.near_plane, config.far_plane)
    }

    pub fn shared(self) -> Rc<RefCell<Camera>> {
        Rc::new(RefCell::new(self))
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// A zero-sized viewport leaves the camera not ready.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect_ratio = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            0.0
        };
        self.update();
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Recomputes the cached matrices from the current fields.
    pub fn update(&mut self) {
        self.pitch = self.pitch.clamp(-90.0, 90.0);

        self.view_matrix =
            Mat4::from_quat(self.rotation().inverse()) * Mat4::from_translation(-self.position);

        if self.ready() {
            self.projection_matrix = Mat4::perspective_rh_gl(
                self.field_of_view.to_radians(),
                self.aspect_ratio,
                self.near_plane,
                self.far_plane,
            );
        }
    }
}

impl CameraSource for Camera {
    fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    fn ready(&self) -> bool {
        self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}
