use noneuclid_common::Pose;
use noneuclid_common::linalg::{normalize_frame_vector, project_out};

/// Re-orthonormalizes `pose` in place after floating-point drift.
///
/// Sequential Gram-Schmidt with a fixed order: `right` is authoritative,
/// `up` is corrected against `right`, `forward` against both, `position`
/// against all three. On the cylinder `position.w` is the axial coordinate,
/// not a direction component, so it is held out of the projection and put
/// back afterwards.
pub fn fix_frame(pose: &mut Pose) {
    let saved_w = pose.position.w;
    let on_cylinder = saved_w > 0.0;
    if on_cylinder {
        pose.position.w = 0.0;
    }

    pose.right = normalize_frame_vector(pose.right);
    pose.up = normalize_frame_vector(project_out(pose.up, &[pose.right]));
    pose.forward = normalize_frame_vector(project_out(pose.forward, &[pose.right, pose.up]));
    pose.position = normalize_frame_vector(project_out(
        pose.position,
        &[pose.right, pose.up, pose.forward],
    ));

    if on_cylinder {
        pose.position.w = saved_w;
    }
}
