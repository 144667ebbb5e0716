//! Tolerance assertions shared by the kernel tests.

use glam::Vec4;
use noneuclid_common::Pose;
use noneuclid_common::linalg::max_abs_diff;

#[track_caller]
pub fn assert_close(actual: f32, expected: f32, tol: f32) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}

#[track_caller]
pub fn assert_vec_close(actual: Vec4, expected: Vec4, tol: f32) {
    assert!(
        max_abs_diff(actual, expected) <= tol,
        "expected {expected:?}, got {actual:?} (tolerance {tol})"
    );
}

#[track_caller]
pub fn assert_pose_close(actual: &Pose, expected: &Pose, tol: f32) {
    assert_vec_close(actual.right, expected.right, tol);
    assert_vec_close(actual.up, expected.up, tol);
    assert_vec_close(actual.forward, expected.forward, tol);
    assert_vec_close(actual.position, expected.position, tol);
}

/// Checks the invariant frame repair maintains: right/up/forward
/// orthonormal, position (axial coordinate removed on the cylinder) unit
/// and orthogonal to right and up.
#[track_caller]
pub fn assert_frame_orthonormal(pose: &Pose, tol: f32) {
    let mut position = pose.position;
    if position.w > 0.0 {
        position.w = 0.0;
    }
    for (name, v) in [
        ("right", pose.right),
        ("up", pose.up),
        ("forward", pose.forward),
        ("position", position),
    ] {
        assert_close(v.length(), 1.0, tol);
        assert!(v.is_finite(), "{name} is not finite: {v:?}");
    }
    assert_close(pose.right.dot(pose.up), 0.0, tol);
    assert_close(pose.right.dot(pose.forward), 0.0, tol);
    assert_close(pose.up.dot(pose.forward), 0.0, tol);
    assert_close(position.dot(pose.right), 0.0, tol);
    assert_close(position.dot(pose.up), 0.0, tol);
}
