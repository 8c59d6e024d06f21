//! Traits for support mapping based shapes.

use crate::math::{Isometry, Point, Real, Vector};
use na::Unit;

/// Trait implemented by convex shapes representable by a support mapping function.
///
/// The support function of a convex shape `S` returns, for a direction `d`,
/// a point of `S` maximising the dot product with `d`:
/// `support(S, d) = argmax { p · d : p ∈ S }`. This is the only geometric
/// information the GJK and EPA algorithms need about a shape.
pub trait SupportMap {
    /// Evaluates the support function of this shape, in its local frame.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real>;

    /// Same as [`SupportMap::local_support_point`] except that `dir` is normalized.
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.local_support_point(dir.as_ref())
    }

    /// Evaluates the support function of this shape transformed by `transform`.
    fn support_point(&self, transform: &Isometry<Real>, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point(&local_dir)
    }

    /// Same as [`SupportMap::support_point`] except that `dir` is normalized.
    fn support_point_toward(
        &self,
        transform: &Isometry<Real>,
        dir: &Unit<Vector<Real>>,
    ) -> Point<Real> {
        let local_dir = Unit::new_unchecked(transform.inverse_transform_vector(dir));
        transform * self.local_support_point_toward(&local_dir)
    }
}
