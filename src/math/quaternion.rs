use glam::{Quat, Vec3};

/// `[axis * sin(angle / 2), cos(angle / 2)]`.
///
/// `axis` must already be unit length; it is not normalized here.
pub fn quaternion_from_axis_angle(axis: Vec3, angle: f32) -> Quat {
    let (s, c) = (angle * 0.5).sin_cos();
    Quat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c)
}

/// Rotation from yaw (about Y), pitch (about X) and roll (about Z), in radians.
///
/// Closed form of `q_pitch * q_yaw * q_roll`.
pub fn quaternion_from_euler(yaw: f32, pitch: f32, roll: f32) -> Quat {
    let (sy, cy) = (yaw * 0.5).sin_cos();
    let (sp, cp) = (pitch * 0.5).sin_cos();
    let (sr, cr) = (roll * 0.5).sin_cos();

    Quat::from_xyzw(
        sp * cy * cr + cp * sy * sr,
        cp * sy * cr - sp * cy * sr,
        cp * cy * sr + sp * sy * cr,
        cp * cy * cr - sp * sy * sr,
    )
}
