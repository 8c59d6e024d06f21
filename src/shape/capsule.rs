use crate::math::{Point, Real, Vector};
use crate::shape::{Segment, SupportMap};
use na::Unit;

/// A capsule shape: every point at distance at most `radius` from a segment.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capsule {
    /// The axis of the capsule.
    pub segment: Segment,
    /// The radius of the capsule.
    pub radius: Real,
}

impl Capsule {
    /// Creates a new capsule from its endpoints and radius.
    pub fn new(a: Point<Real>, b: Point<Real>, radius: Real) -> Self {
        Capsule {
            segment: Segment::new(a, b),
            radius,
        }
    }

    /// Creates a capsule aligned with the local `y` axis, with a total axis
    /// length of `2.0 * half_height`.
    pub fn new_y(half_height: Real, radius: Real) -> Self {
        let b = Point::new(0.0, half_height, 0.0);
        Self::new(-b, b, radius)
    }

    /// The half-length of this capsule's axis.
    pub fn half_height(&self) -> Real {
        (self.segment.b - self.segment.a).norm() / 2.0
    }
}

impl SupportMap for Capsule {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let dir = Unit::try_new(*dir, crate::math::DEFAULT_EPSILON)
            .unwrap_or_else(Vector::y_axis);
        self.local_support_point_toward(&dir)
    }

    // A capsule is the Minkowski sum of its axis with a ball, so its
    // support is the axis support pushed out by the radius.
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.segment.local_support_point(dir) + **dir * self.radius
    }
}
