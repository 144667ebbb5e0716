//! Small dense vector/matrix helpers on top of `glam`.
//!
//! `glam` already covers dot products, norms, scaling and the 4×4 / 3×3
//! products. The helpers here are the BLAS-shaped pieces the integrator
//! composes: axpy, outer products and batched projection.

use glam::{Mat3, Vec3, Vec4};

/// Norms at or below this are treated as a degenerate frame vector.
pub const DEGENERATE_NORM: f32 = 1e-12;

/// `y + alpha * x`.
#[inline]
pub fn axpy(alpha: f32, x: Vec4, y: Vec4) -> Vec4 {
    y + x * alpha
}

/// Outer product `a ⊗ b`: entry `(i, j)` is `a[i] * b[j]`.
#[inline]
pub fn outer3(a: Vec3, b: Vec3) -> Mat3 {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Removes the components of `v` along each vector of `basis`.
///
/// All dot products are taken against the original `v` before any is
/// subtracted, i.e. `v - B (Bᵀ v)` with `B` the columns in `basis`. For an
/// orthonormal `basis` this is the orthogonal projection onto its complement.
pub fn project_out(v: Vec4, basis: &[Vec4]) -> Vec4 {
    let mut dots = [0.0_f32; 4];
    for (dot, b) in dots.iter_mut().zip(basis) {
        *dot = b.dot(v);
    }
    basis
        .iter()
        .zip(dots)
        .fold(v, |acc, (b, dot)| axpy(-dot, *b, acc))
}

/// Scales `v` to unit length.
///
/// A zero (or non-finite) length means an upstream bug produced a degenerate
/// frame. Debug builds panic; release builds log and return `v` unchanged so
/// that NaNs never enter the pose.
pub fn normalize_frame_vector(v: Vec4) -> Vec4 {
    let len = v.length();
    if len > DEGENERATE_NORM && len.is_finite() {
        return v / len;
    }
    debug_assert!(false, "degenerate frame vector {v:?} (length {len})");
    tracing::error!(?v, len, "refusing to normalize degenerate frame vector");
    v
}

/// Returns the largest absolute difference between two vectors' components.
pub fn max_abs_diff(a: Vec4, b: Vec4) -> f32 {
    (a - b).abs().max_element()
}
