use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

/// The observer's frame: three unit axes and a location in the 4-D
/// embedding.
///
/// `position.w` doubles as a coordinate and a sheet selector. For `w <= 0`
/// the observer is on the unit 3-sphere and `position` is a unit 4-vector.
/// For `w > 0` the observer is on the cylinder `S² × ℝ`: `position.xyz` is a
/// unit 3-vector and `w` is the distance from the gluing boundary.
///
/// Assembled as a matrix the columns are `right, up, forward, position`,
/// which is the layout the shader consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub right: Vec4,
    pub up: Vec4,
    pub forward: Vec4,
    pub position: Vec4,
}

impl Pose {
    /// Observer at the sphere's reference point `(0, 0, 0, -1)`.
    pub const INITIAL: Self = Self {
        right: Vec4::new(-1.0, 0.0, 0.0, 0.0),
        up: Vec4::new(0.0, 1.0, 0.0, 0.0),
        forward: Vec4::new(0.0, 0.0, 1.0, 0.0),
        position: Vec4::new(0.0, 0.0, 0.0, -1.0),
    };

    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            right: m.x_axis,
            up: m.y_axis,
            forward: m.z_axis,
            position: m.w_axis,
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(self.right, self.up, self.forward, self.position)
    }

    /// Column-major array for uniform upload.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.to_mat4().to_cols_array_2d()
    }

    /// The sheet implied by the sign of `position.w`.
    pub fn sheet(&self) -> Sheet {
        Sheet::of(self)
    }

    /// Travel direction in the embedding for a tangent intent `(vx, vz)`.
    pub fn tangent(&self, vx: f32, vz: f32) -> Vec4 {
        self.right * vx + self.forward * vz
    }

    pub fn is_finite(&self) -> bool {
        self.right.is_finite()
            && self.up.is_finite()
            && self.forward.is_finite()
            && self.position.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Which part of the composite manifold the observer occupies.
///
/// The two sheets are glued along `w = 0`; the boundary itself belongs to
/// the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sheet {
    OnSphere,
    OnCylinder { boundary_distance: f32 },
}

impl Sheet {
    pub fn of(pose: &Pose) -> Self {
        let w = pose.position.w;
        if w > 0.0 {
            Sheet::OnCylinder {
                boundary_distance: w,
            }
        } else {
            Sheet::OnSphere
        }
    }

    pub fn is_sphere(&self) -> bool {
        matches!(self, Sheet::OnSphere)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sheet::OnSphere => "sphere",
            Sheet::OnCylinder { .. } => "cylinder",
        }
    }
}

impl std::fmt::Display for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sheet::OnSphere => write!(f, "sphere"),
            Sheet::OnCylinder { boundary_distance } => {
                write!(f, "cylinder (w={boundary_distance:.3})")
            }
        }
    }
}
