use glam::Vec2;
use noneuclid_common::Pose;

/// Viewport configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Half extents of the image plane at unit distance, `(x, y)`.
    pub frustum: Vec2,
}

impl RenderView {
    /// Frustum for a viewport of the given pixel size: half-height 0.5,
    /// half-width scaled by the aspect ratio.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let height = height.max(1) as f32;
        Self {
            frustum: Vec2::new(0.5 * width as f32 / height, 0.5),
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::for_viewport(1024, 768)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a read-only pose snapshot per frame and produces
/// output; the pose is owned by the flight controller.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given pose and view.
    fn render(&self, pose: &Pose, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn fmt_vec(v: glam::Vec4) -> String {
    format!("({:+.4}, {:+.4}, {:+.4}, {:+.4})", v.x, v.y, v.z, v.w)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, pose: &Pose, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Camera ({}) ===\n", pose.sheet()));
        out.push_str(&format!("  right    {}\n", fmt_vec(pose.right)));
        out.push_str(&format!("  up       {}\n", fmt_vec(pose.up)));
        out.push_str(&format!("  forward  {}\n", fmt_vec(pose.forward)));
        out.push_str(&format!("  position {}\n", fmt_vec(pose.position)));
        out.push_str(&format!(
            "Frustum: ({:.3}, {:.3})\n",
            view.frustum.x, view.frustum.y
        ));
        out
    }
}
