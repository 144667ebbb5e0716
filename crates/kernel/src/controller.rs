//! Look and motion controllers: turn input into pose updates.

use glam::{Mat4, Vec2, Vec4};
use noneuclid_common::Pose;

use crate::geodesic::{self, StepReport};
use crate::repair::fix_frame;

/// Yaw in the `(right, forward)` plane.
fn yaw_rotation(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(c, 0.0, s, 0.0),
        Vec4::Y,
        Vec4::new(-s, 0.0, c, 0.0),
        Vec4::W,
    )
}

/// Pitch in the `(up, forward)` plane.
fn pitch_rotation(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::X,
        Vec4::new(0.0, c, -s, 0.0),
        Vec4::new(0.0, s, c, 0.0),
        Vec4::W,
    )
}

/// Turns the frame by a pointer delta, horizontal first, then repairs it.
///
/// The observer's location is untouched.
pub fn look(pose: &mut Pose, sensitivity: f32, dx: f32, dy: f32) {
    let saved_w = pose.position.w;
    let on_cylinder = saved_w > 0.0;
    if on_cylinder {
        pose.position.w = 0.0;
    }

    let turned =
        pose.to_mat4() * yaw_rotation(sensitivity * dx) * pitch_rotation(sensitivity * dy);
    *pose = Pose::from_mat4(turned);

    if on_cylinder {
        pose.position.w = saved_w;
    }
    fix_frame(pose);
}

/// Walks `arc_length` along the geodesic in the direction of `intent`
/// (`x` along right, `y` along forward), then repairs the frame.
///
/// A zero intent does nothing and returns `None`.
pub fn move_along(
    pose: &mut Pose,
    intent: Vec2,
    arc_length: f32,
    max_crossings: u32,
) -> Option<StepReport> {
    let len = intent.length();
    if len == 0.0 {
        return None;
    }
    let dir = intent / len;
    let report = geodesic::advance(pose, dir.x, dir.y, arc_length, max_crossings);
    fix_frame(pose);
    Some(report)
}
