use glam::Vec4;
use noneuclid_common::{Pose, Sheet};
use serde::Serialize;

/// Pose inspector for developer tooling.
///
/// Read-only queries against a camera pose for the HUD, the CLI and tests.
pub struct PoseInspector;

impl PoseInspector {
    /// Produce a summary of the pose.
    pub fn summary(pose: &Pose) -> PoseSummary {
        PoseSummary {
            sheet: pose.sheet(),
            position: pose.position,
            residuals: Self::residuals(pose),
        }
    }

    /// How far the frame is from orthonormal.
    ///
    /// On the cylinder the frame lives in the `xyz` slice, so `position.w`
    /// is dropped before measuring.
    pub fn residuals(pose: &Pose) -> OrthoResiduals {
        let position = match pose.sheet() {
            Sheet::OnSphere => pose.position,
            Sheet::OnCylinder { .. } => pose.position.truncate().extend(0.0),
        };
        let vectors = [pose.right, pose.up, pose.forward, position];
        let max_length_error = vectors
            .iter()
            .map(|v| (v.length() - 1.0).abs())
            .fold(0.0, f32::max);
        let dot = |a: Vec4, b: Vec4| a.dot(b).abs();

        OrthoResiduals {
            max_length_error,
            right_up: dot(pose.right, pose.up),
            right_forward: dot(pose.right, pose.forward),
            up_forward: dot(pose.up, pose.forward),
            right_position: dot(pose.right, position),
            up_position: dot(pose.up, position),
            forward_position: dot(pose.forward, position),
        }
    }
}

/// Deviation of a pose frame from orthonormality.
///
/// Dot products are absolute values. `forward_position` is reported on its
/// own in the summary line since the shader rebuilds the view ray from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrthoResiduals {
    pub max_length_error: f32,
    pub right_up: f32,
    pub right_forward: f32,
    pub up_forward: f32,
    pub right_position: f32,
    pub up_position: f32,
    pub forward_position: f32,
}

impl OrthoResiduals {
    /// Largest pairwise dot product.
    pub fn max_dot(&self) -> f32 {
        [
            self.right_up,
            self.right_forward,
            self.up_forward,
            self.right_position,
            self.up_position,
            self.forward_position,
        ]
        .into_iter()
        .fold(0.0, f32::max)
    }

    /// Largest residual of any kind.
    pub fn worst(&self) -> f32 {
        self.max_length_error.max(self.max_dot())
    }
}

/// Summary of a pose for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct PoseSummary {
    pub sheet: Sheet,
    pub position: Vec4,
    pub residuals: OrthoResiduals,
}

impl std::fmt::Display for PoseSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.position;
        write!(
            f,
            "Pose: {} pos=({:.4}, {:.4}, {:.4}, {:.4}) len_err={:.2e} max_dot={:.2e} fwd·pos={:.2e}",
            self.sheet,
            p.x,
            p.y,
            p.z,
            p.w,
            self.residuals.max_length_error,
            self.residuals.max_dot(),
            self.residuals.forward_position,
        )
    }
}
