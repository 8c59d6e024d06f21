//! Axis Aligned Bounding Box.

use crate::math::{Isometry, Point, Real, Vector};
use na;

/// An Axis Aligned Bounding Box.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// The minimum of the `Aabb` along each coordinate axis.
    pub mins: Point<Real>,
    /// The maximum of the `Aabb` along each coordinate axis.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new `Aabb`.
    ///
    /// `mins` must be smaller than `maxs` element-wise.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid `Aabb` with `mins` components set to `Real::MAX` and `maxs`components set to `-Real::MAX`.
    ///
    /// This is often used as the initial values of some `Aabb` merging algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new `Aabb` from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new `Aabb` from a set of points.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point<Real>>,
    {
        let mut result = Aabb::new_invalid();

        for pt in pts {
            result.take_point(*pt);
        }

        result
    }

    /// The center of this `Aabb`.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this `Aabb`.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        let half: Real = 0.5;
        (self.maxs - self.mins) * half
    }

    /// The extents of this `Aabb`.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The squared length of this `Aabb`'s diagonal.
    ///
    /// Used by the octree traversals to decide which side of a pair to
    /// descend first.
    #[inline]
    pub fn size(&self) -> Real {
        (self.maxs - self.mins).norm_squared()
    }

    /// Enlarges this `Aabb` so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// The smallest `Aabb` containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.coords.inf(&other.mins.coords).into(),
            maxs: self.maxs.coords.sup(&other.maxs.coords).into(),
        }
    }

    /// Computes the `Aabb` bounding `self` transformed by `m`.
    ///
    /// The result is the tightest axis-aligned box containing the rotated
    /// and translated box, not the rotated box itself.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        let ls_center = self.center();
        let center = m * ls_center;
        let ws_half_extents = m.rotation.to_rotation_matrix().into_inner().abs() * self.half_extents();

        Aabb::new(center + (-ws_half_extents), center + ws_half_extents)
    }

    /// Does this `Aabb` contain the given point?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..3 {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Does this `Aabb` intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        for i in 0..3 {
            if self.mins[i] > other.maxs[i] || other.mins[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Projects the given point onto this `Aabb` (the point itself if it is inside).
    #[inline]
    pub fn clamp_point(&self, point: &Point<Real>) -> Point<Real> {
        point.coords.sup(&self.mins.coords).inf(&self.maxs.coords).into()
    }

    /// The distance between this `Aabb` and the given point (zero if the point is inside).
    #[inline]
    pub fn distance_to_point(&self, point: &Point<Real>) -> Real {
        na::distance(&self.clamp_point(point), point)
    }

    /// The distance separating this `Aabb` from `other` (zero if they intersect).
    #[inline]
    pub fn distance_to_aabb(&self, other: &Aabb) -> Real {
        let mut dist2: Real = 0.0;

        for i in 0..3 {
            let gap = (other.mins[i] - self.maxs[i]).max(self.mins[i] - other.maxs[i]);

            if gap > 0.0 {
                dist2 += gap * gap;
            }
        }

        dist2.sqrt()
    }

    /// The bounding volume of this `Aabb`'s `i`-th octant.
    ///
    /// For the octant index `i ∈ [0, 8)`, the child covers the lower half of
    /// the parent along axis `k` iff `(i >> k) & 1 == 0`. This assignment is
    /// fixed and shared with the octree cell addressing.
    #[inline]
    pub fn octant(&self, i: usize) -> Aabb {
        let center = self.center();
        let mut child = *self;

        for k in 0..3 {
            if (i >> k) & 1 == 0 {
                child.maxs[k] = center[k];
            } else {
                child.mins[k] = center[k];
            }
        }

        child
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::math::Point;

    #[test]
    fn octant_axis_assignment() {
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));

        let c0 = aabb.octant(0);
        assert_eq!(c0.mins, Point::new(-1.0, -1.0, -1.0));
        assert_eq!(c0.maxs, Point::new(0.0, 0.0, 0.0));

        let c5 = aabb.octant(5); // +x, -y, +z
        assert_eq!(c5.mins, Point::new(0.0, -1.0, 0.0));
        assert_eq!(c5.maxs, Point::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn aabb_distance() {
        let a = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point::new(4.0, 0.0, 0.0), Point::new(5.0, 1.0, 1.0));
        assert_eq!(a.distance_to_aabb(&b), 3.0);

        let c = Aabb::new(Point::new(0.5, 0.5, 0.5), Point::new(2.0, 2.0, 2.0));
        assert_eq!(a.distance_to_aabb(&c), 0.0);
        assert!(a.intersects(&c));
    }
}
