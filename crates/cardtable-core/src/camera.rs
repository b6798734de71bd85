//! Camera and Interaction State
//!
//! The orbit-style camera that input events steer. Input handlers never write
//! to [`CameraState`] directly: they push [`CameraAction`]s through a
//! [`CameraSender`], and the render tick drains the matching [`CameraQueue`]
//! once per frame before building the view matrix.

use crossbeam::channel::{unbounded, Receiver, Sender, TrySendError};
use glam::{Mat4, Vec3};

/// Initial distance of the eye from the origin along +Z
pub const DEFAULT_EYE_DISTANCE: f32 = 0.5;

/// Height of the eye above the target
pub const EYE_HEIGHT: f32 = 2.0;

/// Closest allowed eye distance
pub const MIN_EYE_DISTANCE: f32 = 0.1;

/// Farthest allowed eye distance
pub const MAX_EYE_DISTANCE: f32 = 50.0;

/// Vertical field of view in degrees
pub const FOV_Y_DEGREES: f32 = 45.0;

/// Near clip plane
pub const Z_NEAR: f32 = 0.1;

/// Far clip plane
pub const Z_FAR: f32 = 100.0;

/// A discrete change to the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    /// Rotate about the X axis by degrees
    RotateX(f32),
    /// Rotate about the Y axis by degrees
    RotateY(f32),
    /// Translate in the view plane
    Translate { dx: f32, dy: f32 },
    /// Move the eye by this much along Z
    Zoom(f32),
    /// Restore the initial camera
    Reset,
}

/// Camera parameters read once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Eye distance along Z
    pub eye_distance: f32,
    /// Rotation about X in degrees
    pub rotation_x: f32,
    /// Rotation about Y in degrees
    pub rotation_y: f32,
    /// Translation along X
    pub translate_x: f32,
    /// Translation along Y
    pub translate_y: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            eye_distance: DEFAULT_EYE_DISTANCE,
            rotation_x: 0.0,
            rotation_y: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl CameraState {
    /// Create a camera at the given eye distance
    pub fn with_eye_distance(eye_distance: f32) -> Self {
        Self {
            eye_distance: eye_distance.clamp(MIN_EYE_DISTANCE, MAX_EYE_DISTANCE),
            ..Default::default()
        }
    }

    /// Apply one action.
    ///
    /// Rotations accumulate without wrapping. The eye distance is clamped so
    /// the eye never sits directly above the target.
    pub fn apply(&mut self, action: CameraAction) {
        match action {
            CameraAction::RotateX(degrees) => self.rotation_x += degrees,
            CameraAction::RotateY(degrees) => self.rotation_y += degrees,
            CameraAction::Translate { dx, dy } => {
                self.translate_x += dx;
                self.translate_y += dy;
            }
            CameraAction::Zoom(delta) => {
                self.eye_distance = (self.eye_distance + delta).clamp(MIN_EYE_DISTANCE, MAX_EYE_DISTANCE);
            }
            CameraAction::Reset => *self = Self::default(),
        }
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, EYE_HEIGHT, self.eye_distance)
    }

    /// Model-view matrix: look-at, then translate, then rotate about X, then about Y
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
            * Mat4::from_translation(Vec3::new(self.translate_x, self.translate_y, 0.0))
            * Mat4::from_rotation_x(self.rotation_x.to_radians())
            * Mat4::from_rotation_y(self.rotation_y.to_radians())
    }

    /// Perspective projection for the given aspect ratio (depth range 0..1)
    pub fn projection_matrix(aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
    }
}

/// Producer side of the camera action queue
#[derive(Debug, Clone)]
pub struct CameraSender {
    sender: Sender<CameraAction>,
}

impl CameraSender {
    /// Queue an action; returns false if the render side has gone away
    pub fn send(&self, action: CameraAction) -> bool {
        match self.sender.try_send(action) {
            Ok(()) => true,
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("camera queue closed, dropping {:?}", action);
                false
            }
            Err(TrySendError::Full(_)) => false,
        }
    }
}

/// Consumer side of the camera action queue
#[derive(Debug)]
pub struct CameraQueue {
    receiver: Receiver<CameraAction>,
}

impl CameraQueue {
    /// Apply every pending action in arrival order; returns how many were applied
    pub fn drain_into(&self, state: &mut CameraState) -> usize {
        let mut applied = 0;
        for action in self.receiver.try_iter() {
            state.apply(action);
            applied += 1;
        }
        applied
    }

    /// Number of actions waiting
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

/// Create a connected sender/queue pair
pub fn camera_channel() -> (CameraSender, CameraQueue) {
    let (sender, receiver) = unbounded();
    (CameraSender { sender }, CameraQueue { receiver })
}
