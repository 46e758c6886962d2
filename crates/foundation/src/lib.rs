pub mod bounds;
pub mod ids;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use ids::*;

/// Clamps `v` into `[lo, hi]`.
///
/// NaN inputs come back as `lo`, which keeps derived camera state finite.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}
