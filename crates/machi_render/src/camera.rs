use machi_input::{InputManager, Key};
use nalgebra_glm::{self as glm, Mat4, Quat, Vec3};

use crate::glm_ext::{QuatExt, Vec3Ext};

pub const DEFAULT_MOVEMENT_SPEED: f32 = 2.5;
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_FOV: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;

/// Keys that move a [`Camera`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraBindings {
    pub forward: Key,
    pub backward: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
}

impl Default for CameraBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            backward: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::Space,
            down: Key::LShift,
        }
    }
}

/// Free-flying perspective camera.
///
/// Orientation is kept as a quaternion built from yaw (about world up) and
/// pitch (about the camera's right axis), both in degrees. The basis vectors
/// are derived from it and only change through [`Camera::update`] or the
/// setters.
#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    orientation: Quat,
    front: Vec3,
    right: Vec3,
    up: Vec3,

    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub bindings: CameraBindings,

    fov: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::zeros())
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            orientation: Quat::identity(),
            front: Vec3::FORWARD,
            right: Vec3::RIGHT,
            up: Vec3::UP,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            bindings: CameraBindings::default(),
            fov: DEFAULT_FOV,
            near: 0.1,
            far: 100.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Moves and turns the camera from the current input state.
    pub fn update(&mut self, input: &InputManager, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let bindings = self.bindings;

        let mut translation = Vec3::zeros();
        if input.is_key_pressed(bindings.forward) {
            translation += self.front;
        }
        if input.is_key_pressed(bindings.backward) {
            translation -= self.front;
        }
        if input.is_key_pressed(bindings.left) {
            translation -= self.right;
        }
        if input.is_key_pressed(bindings.right) {
            translation += self.right;
        }
        if input.is_key_pressed(bindings.up) {
            translation += self.up;
        }
        if input.is_key_pressed(bindings.down) {
            translation -= self.up;
        }
        self.position += translation * velocity;

        let delta = input.mouse_delta();
        if delta.x != 0.0 || delta.y != 0.0 {
            self.rotate(
                -(delta.x as f32) * self.mouse_sensitivity,
                delta.y as f32 * self.mouse_sensitivity,
            );
        }

        let scroll = input.scroll_delta();
        if scroll.y != 0.0 {
            self.zoom(scroll.y as f32);
        }
    }

    /// Adds to yaw and pitch, in degrees.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.set_rotation(self.yaw + yaw_delta, self.pitch + pitch_delta);
    }

    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Narrows the field of view by `amount` degrees.
    pub fn zoom(&mut self, amount: f32) {
        self.fov = (self.fov - amount).clamp(MIN_FOV, MAX_FOV);
    }

    fn update_vectors(&mut self) {
        self.orientation = Quat::from_yaw_pitch(self.yaw, self.pitch);
        self.front = glm::normalize(&glm::quat_rotate_vec3(&self.orientation, &Vec3::FORWARD));
        self.right = glm::normalize(&glm::quat_rotate_vec3(&self.orientation, &Vec3::RIGHT));
        self.up = glm::normalize(&glm::cross(&self.right, &self.front));
    }

    pub fn view_matrix(&self) -> Mat4 {
        glm::look_at(&self.position, &(self.position + self.front), &self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        glm::perspective(aspect, self.fov.to_radians(), self.near, self.far)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }
}
