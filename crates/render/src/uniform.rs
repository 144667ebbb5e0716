use bytemuck::{Pod, Zeroable};
use noneuclid_common::Pose;

use crate::RenderView;

/// Per-frame camera block uploaded to the GPU.
///
/// `camera` holds the pose columns (right, up, forward, position) in
/// column-major order; `frustum.xy` are the image-plane half extents, the
/// remaining lanes are padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub camera: [[f32; 4]; 4],
    pub frustum: [f32; 4],
}

impl CameraUniform {
    pub fn new(pose: &Pose, view: &RenderView) -> Self {
        Self {
            camera: pose.to_cols_array_2d(),
            frustum: [view.frustum.x, view.frustum.y, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_std140_compatible() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn columns_follow_pose() {
        let u = CameraUniform::new(&Pose::INITIAL, &RenderView::for_viewport(800, 800));
        assert_eq!(u.camera[0], [-1.0, 0.0, 0.0, 0.0]);
        assert_eq!(u.camera[3], [0.0, 0.0, 0.0, -1.0]);
        assert_eq!(u.frustum, [0.5, 0.5, 0.0, 0.0]);
    }
}
