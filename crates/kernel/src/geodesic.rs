use glam::{Mat3, Mat4, Vec4};
use noneuclid_common::linalg::{DEGENERATE_NORM, outer3};
use noneuclid_common::{Pose, Sheet};
use std::f32::consts::PI;

/// Default cap on sheet hand-offs within one call to [`advance`].
pub const DEFAULT_MAX_CROSSINGS: u32 = 8;

/// Outcome of one [`advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Sheet the pose ended on; always equal to `Sheet::of(pose)`.
    pub sheet: Sheet,
    /// Number of sphere/cylinder hand-offs taken.
    pub crossings: u32,
    /// Arc-length actually travelled.
    pub travelled: f32,
    /// Arc-length left over when the crossing cap stopped the walk.
    pub remainder: f32,
}

/// Result of a single-sheet sub-step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubStep {
    pub step: f32,
    /// The boundary cut the sub-step short; the rest belongs to the other sheet.
    pub hand_off: bool,
}

/// Advances `pose` by arc-length `dist` along the geodesic leaving it in
/// tangent direction `(vx, vz)` (a unit vector in the right/forward plane).
///
/// The walk is split at every crossing of the `w = 0` boundary and continued
/// on the other sheet with the remaining length. At most `max_crossings`
/// hand-offs are taken; anything left after that is reported as
/// `remainder` and not travelled. The frame is not repaired here.
pub fn advance(pose: &mut Pose, vx: f32, vz: f32, dist: f32, max_crossings: u32) -> StepReport {
    let _span = tracing::trace_span!("geodesic_advance", vx, vz, dist).entered();
    debug_assert!(dist.is_nan() || dist >= 0.0, "negative arc-length {dist}");

    let mut sheet = Sheet::of(pose);
    let mut remaining = dist;
    let mut travelled = 0.0;
    let mut crossings = 0;

    while remaining > 0.0 {
        let sub = match sheet {
            Sheet::OnSphere => sphere_substep(pose, vx, vz, remaining),
            Sheet::OnCylinder { .. } => cylinder_substep(pose, vx, vz, remaining),
        };
        travelled += sub.step;
        remaining -= sub.step;
        if !sub.hand_off {
            remaining = 0.0;
            break;
        }
        if crossings >= max_crossings {
            tracing::warn!(
                crossings,
                remaining,
                "crossing cap reached, dropping the rest of the step"
            );
            break;
        }
        crossings += 1;
        sheet = match sheet {
            Sheet::OnSphere => Sheet::OnCylinder {
                boundary_distance: 0.0,
            },
            Sheet::OnCylinder { .. } => Sheet::OnSphere,
        };
        tracing::debug!(%sheet, remaining, "crossed sheet boundary");
    }

    let sheet = settle(pose, sheet);
    debug_assert_eq!(sheet, Sheet::of(pose));
    StepReport {
        sheet,
        crossings,
        travelled,
        remainder: remaining,
    }
}

/// Reconciles the tag the loop ended with against `position.w`.
///
/// A sphere sub-step never leaves `w > 0`; rounding just short of the
/// boundary is clamped. A cylinder walk that stopped exactly on the
/// boundary hands the pose to the sphere, which owns `w = 0`.
fn settle(pose: &mut Pose, sheet: Sheet) -> Sheet {
    match sheet {
        Sheet::OnSphere => {
            if pose.position.w > 0.0 {
                pose.position.w = 0.0;
            }
            Sheet::OnSphere
        }
        Sheet::OnCylinder { .. } if pose.position.w <= 0.0 => {
            pose.position.w = 0.0;
            Sheet::OnSphere
        }
        Sheet::OnCylinder { .. } => Sheet::OnCylinder {
            boundary_distance: pose.position.w,
        },
    }
}

/// Geodesic distance on the sphere sheet until `w` first reaches zero.
///
/// Along the great circle `w(t) = w·cos t + dir_w·sin t`. For `w < 0` the
/// first zero is at `atan2(-w, dir_w)`, in `(0, π)`. On the boundary
/// itself the observer either leaves at once (`dir_w > 0`), comes back
/// after half a great circle (`dir_w < 0`) or slides along it forever.
pub(crate) fn sphere_reach(w: f32, dir_w: f32) -> f32 {
    if w < 0.0 {
        (-w).atan2(dir_w)
    } else if dir_w > 0.0 {
        0.0
    } else if dir_w < 0.0 {
        PI
    } else {
        f32::INFINITY
    }
}

/// Rotation of the frame by `angle` in the plane of `(right, forward)`
/// weighted by `(vx, vz)`, carrying `position` along the great circle
/// `cos·position + sin·(vx·right + vz·forward)`. `up` is held fixed.
fn sphere_rotation(vx: f32, vz: f32, angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(vx * vx * c + vz * vz, 0.0, vx * vz * (c - 1.0), -vx * s),
        Vec4::Y,
        Vec4::new(vx * vz * (c - 1.0), 0.0, vz * vz * c + vx * vx, -vz * s),
        Vec4::new(vx * s, 0.0, vz * s, c),
    )
}

pub(crate) fn sphere_substep(pose: &mut Pose, vx: f32, vz: f32, remaining: f32) -> SubStep {
    let dir_w = vx * pose.right.w + vz * pose.forward.w;
    let reach = sphere_reach(pose.position.w, dir_w);
    let step = reach.min(remaining);

    *pose = Pose::from_mat4(pose.to_mat4() * sphere_rotation(vx, vz, step));
    if step >= reach {
        pose.position.w = 0.0;
    }
    tracing::trace!(step, reach, w = pose.position.w, "sphere sub-step");

    SubStep {
        step,
        hand_off: step < remaining,
    }
}

/// Rotation of the `S²` factor by `angle` in the plane spanned by the
/// current location `p` and the unit lateral travel direction `v`:
/// `I + (p⊗p + v⊗v)(cos − 1) + (v⊗p − p⊗v) sin`.
fn cylinder_rotation(p: glam::Vec3, v: glam::Vec3, angle: f32) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::IDENTITY + (outer3(p, p) + outer3(v, v)) * (c - 1.0) + (outer3(v, p) - outer3(p, v)) * s
}

pub(crate) fn cylinder_substep(pose: &mut Pose, vx: f32, vz: f32, remaining: f32) -> SubStep {
    let dir = pose.tangent(vx, vz);
    let reach = if dir.w < 0.0 {
        -pose.position.w / dir.w
    } else {
        f32::INFINITY
    };
    let step = reach.min(remaining);

    // Axial travel is translation; only the rest of the motion turns the frame.
    let angle = step * (1.0 - dir.w * dir.w).max(0.0).sqrt();
    let lateral = dir.truncate();
    let lateral_len = lateral.length();
    if angle != 0.0 && lateral_len > DEGENERATE_NORM {
        let rot = cylinder_rotation(pose.position.truncate(), lateral / lateral_len, angle);
        for col in [
            &mut pose.right,
            &mut pose.up,
            &mut pose.forward,
            &mut pose.position,
        ] {
            *col = (rot * col.truncate()).extend(col.w);
        }
    }
    pose.position.w += step * dir.w;
    if step >= reach {
        pose.position.w = 0.0;
    }
    tracing::trace!(step, reach, angle, w = pose.position.w, "cylinder sub-step");

    SubStep {
        step,
        hand_off: step < remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::fix_frame;
    use crate::testing::{assert_close, assert_frame_orthonormal, assert_vec_close};
    use std::f32::consts::{FRAC_PI_2, TAU};

    /// On the cylinder a distance `w` from the boundary, at `(1, 0, 0)` on
    /// the `S²` factor, looking straight up the axis.
    fn cylinder_pose(w: f32) -> Pose {
        Pose {
            right: Vec4::new(0.0, 1.0, 0.0, 0.0),
            up: Vec4::new(0.0, 0.0, 1.0, 0.0),
            forward: Vec4::new(0.0, 0.0, 0.0, 1.0),
            position: Vec4::new(1.0, 0.0, 0.0, w),
        }
    }

    /// The same distance written as `2π − max(fmod(5π/2 − φ), fmod(3π/2 − φ))`.
    fn phase_reach(w: f32, dir_w: f32) -> f32 {
        let phase = dir_w.atan2(w);
        let a = (2.5 * PI - phase) % TAU;
        let b = (1.5 * PI - phase) % TAU;
        TAU - a.max(b)
    }

    #[test]
    fn zero_step_is_bit_exact() {
        for start in [Pose::INITIAL, cylinder_pose(0.7)] {
            let mut p = start;
            let report = advance(&mut p, 0.6, -0.8, 0.0, DEFAULT_MAX_CROSSINGS);
            assert_eq!(p, start);
            assert_eq!(report.crossings, 0);
            assert_eq!(report.travelled, 0.0);
            assert_eq!(report.remainder, 0.0);
            assert_eq!(report.sheet, Sheet::of(&start));
        }
    }

    #[test]
    fn forward_tick_moves_along_great_circle() {
        let mut p = Pose::INITIAL;
        let report = advance(&mut p, 0.0, -1.0, 0.2, DEFAULT_MAX_CROSSINGS);

        assert_eq!(report.sheet, Sheet::OnSphere);
        assert_eq!(report.crossings, 0);
        assert_close(report.travelled, 0.2, 1e-7);
        let (s, c) = 0.2_f32.sin_cos();
        assert_vec_close(p.position, Vec4::new(0.0, 0.0, -s, -c), 1e-6);
        assert_vec_close(p.forward, Vec4::new(0.0, 0.0, c, -s), 1e-6);
        assert_vec_close(p.up, Vec4::Y, 0.0);
        // Geodesic distance travelled equals the requested arc-length.
        let arc = Pose::INITIAL.position.dot(p.position).clamp(-1.0, 1.0).acos();
        assert_close(arc, 0.2, 1e-4);
        assert_frame_orthonormal(&p, 1e-5);
    }

    #[test]
    fn overshooting_the_boundary_lands_on_cylinder() {
        let mut p = Pose::INITIAL;
        let report = advance(&mut p, 0.0, -1.0, FRAC_PI_2 + 0.3, DEFAULT_MAX_CROSSINGS);

        assert_eq!(report.crossings, 1);
        assert!(matches!(report.sheet, Sheet::OnCylinder { .. }));
        assert!(p.position.w > 0.0);
        // Heading straight along the axis: the overshoot is pure translation.
        assert_close(p.position.w, 0.3, 1e-5);
        assert_vec_close(p.position.truncate().extend(0.0), Vec4::new(0.0, 0.0, -1.0, 0.0), 1e-5);
        assert_close(report.travelled, FRAC_PI_2 + 0.3, 1e-6);
    }

    #[test]
    fn returning_from_cylinder_reenters_sphere() {
        let mut p = Pose::INITIAL;
        advance(&mut p, 0.0, -1.0, FRAC_PI_2 + 0.3, DEFAULT_MAX_CROSSINGS);
        fix_frame(&mut p);

        let report = advance(&mut p, 0.0, 1.0, 0.4, DEFAULT_MAX_CROSSINGS);
        assert_eq!(report.crossings, 1);
        assert_eq!(report.sheet, Sheet::OnSphere);
        assert_close(p.position.w, -(0.1_f32.sin()), 1e-4);
        assert_close(p.position.length(), 1.0, 1e-4);
    }

    #[test]
    fn boundary_landing_is_exact() {
        // Exactly on the boundary with zero length to go.
        let mut p = cylinder_pose(0.0);
        let sub = cylinder_substep(&mut p, 0.0, -1.0, 0.0);
        assert_eq!(sub.step, 0.0);
        assert!(!sub.hand_off);
        assert_eq!(p.position.w, 0.0);

        // Walking back down the axis by exactly the distance to the boundary.
        let mut p = cylinder_pose(0.3);
        let report = advance(&mut p, 0.0, -1.0, 0.3, DEFAULT_MAX_CROSSINGS);
        assert_eq!(p.position.w, 0.0);
        assert_eq!(report.crossings, 0);
        assert_eq!(report.remainder, 0.0);
        assert_close(report.travelled, 0.3, 0.0);
        assert_eq!(report.sheet, Sheet::OnSphere);
    }

    #[test]
    fn slanted_boundary_landing_is_exact() {
        // Heading back towards the boundary at dir.w = -0.5 from w = 0.25.
        let h = 0.75_f32.sqrt();
        let mut p = Pose {
            right: Vec4::new(0.0, 1.0, 0.0, 0.0),
            up: Vec4::new(0.0, 0.0, 0.5, h),
            forward: Vec4::new(0.0, 0.0, h, -0.5),
            position: Vec4::new(1.0, 0.0, 0.0, 0.25),
        };
        let report = advance(&mut p, 0.0, 1.0, 0.5, DEFAULT_MAX_CROSSINGS);

        assert_eq!(p.position.w, 0.0);
        assert_eq!(report.crossings, 0);
        assert_eq!(report.remainder, 0.0);
        assert_eq!(report.sheet, Sheet::OnSphere);
        // The lateral part of the walk turned the S² location towards +z.
        let angle = 0.5 * h;
        assert_close(p.position.x, angle.cos(), 1e-5);
        assert_close(p.position.z, angle.sin(), 1e-5);
    }

    #[test]
    fn two_crossings_in_one_call() {
        // Down the axis, through the sphere's far side, back up the axis.
        let mut p = cylinder_pose(0.1);
        let report = advance(&mut p, 0.0, -1.0, 0.1 + PI + 0.2, DEFAULT_MAX_CROSSINGS);

        assert_eq!(report.crossings, 2);
        assert!(matches!(report.sheet, Sheet::OnCylinder { .. }));
        assert_close(p.position.w, 0.2, 1e-4);
        assert_vec_close(p.position.truncate().extend(0.0), Vec4::new(-1.0, 0.0, 0.0, 0.0), 1e-4);
    }

    #[test]
    fn crossing_cap_stops_the_walk() {
        let mut p = cylinder_pose(0.1);
        let report = advance(&mut p, 0.0, -1.0, 0.1 + PI + 0.2, 1);

        assert_eq!(report.crossings, 1);
        assert_eq!(report.sheet, Sheet::OnSphere);
        assert_eq!(p.position.w, 0.0);
        assert_close(report.remainder, 0.2, 1e-4);
        assert_close(report.travelled + report.remainder, 0.1 + PI + 0.2, 1e-5);
    }

    #[test]
    fn sign_changes_match_crossing_parity() {
        let intents = [(0.0, -1.0), (0.6, -0.8), (-1.0, 0.0), (0.0, 1.0), (0.8, 0.6)];
        let mut p = Pose::INITIAL;
        for i in 0..400 {
            let (vx, vz) = intents[i % intents.len()];
            let before = p.position.w > 0.0;
            let report = advance(&mut p, vx, vz, 0.05 + (i % 7) as f32 * 0.3, DEFAULT_MAX_CROSSINGS);
            fix_frame(&mut p);
            let after = p.position.w > 0.0;
            assert_eq!(before != after, report.crossings % 2 == 1, "call {i}");
            assert_eq!(report.sheet, Sheet::of(&p));
        }
    }

    #[test]
    fn reach_matches_phase_formula_inside_sphere() {
        for &(w, dir_w) in &[
            (-1.0, 0.0),
            (-0.7, 0.3),
            (-0.2, -0.9),
            (-0.95, 0.31),
            (-0.05, 0.99),
        ] {
            assert_close(sphere_reach(w, dir_w), phase_reach(w, dir_w), 1e-5);
        }
    }

    #[test]
    fn reach_on_boundary() {
        assert_eq!(sphere_reach(0.0, 0.5), 0.0);
        assert_eq!(sphere_reach(0.0, -0.5), PI);
        assert_eq!(sphere_reach(0.0, 0.0), f32::INFINITY);
    }

    #[test]
    fn sphere_rotation_is_orthogonal() {
        let r = sphere_rotation(0.6, -0.8, 0.37);
        let rtr = r.transpose() * r;
        assert!(rtr.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn cylinder_rotation_carries_position_to_direction() {
        let p = glam::Vec3::X;
        let v = glam::Vec3::Z;
        let r = cylinder_rotation(p, v, FRAC_PI_2);
        assert!((r * p).abs_diff_eq(v, 1e-6));
        assert!((r * v).abs_diff_eq(-p, 1e-6));
        assert!((r * glam::Vec3::Y).abs_diff_eq(glam::Vec3::Y, 1e-6));
    }
}
