use nalgebra_glm::{quat_angle_axis, Quat, Vec3};

/// Right-handed world axes, looking down -Z.
pub trait Vec3Ext {
    const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    const DOWN: Vec3 = Vec3::new(0.0, -1.0, 0.0);
    const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const LEFT: Vec3 = Vec3::new(-1.0, 0.0, 0.0);
    const FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);
    const BACK: Vec3 = Vec3::new(0.0, 0.0, 1.0);
}

impl Vec3Ext for Vec3 {}

pub trait QuatExt {
    /// Yaw about world up, then pitch about the yawed right axis. Angles in
    /// degrees.
    fn from_yaw_pitch(yaw: f32, pitch: f32) -> Quat {
        let yaw = quat_angle_axis(yaw.to_radians(), &Vec3::UP);
        let pitch = quat_angle_axis(pitch.to_radians(), &Vec3::RIGHT);
        (yaw * pitch).normalize()
    }
}

impl QuatExt for Quat {}
