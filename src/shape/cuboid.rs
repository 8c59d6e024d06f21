use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A cuboid shape, defined by its half-extents along each local axis.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cuboid {
    /// The half-extents of the cuboid.
    pub half_extents: Vector<Real>,
}

impl Cuboid {
    /// Creates a new box from its half-extents.
    ///
    /// Half-extents are the box half-widths along each axis, so the box
    /// spans `[-half_extents, half_extents]` in its local frame.
    #[inline]
    pub fn new(half_extents: Vector<Real>) -> Cuboid {
        Cuboid { half_extents }
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let mut res = self.half_extents;

        for i in 0..3 {
            if dir[i] < 0.0 {
                res[i] = -res[i];
            }
        }

        Point::from(res)
    }
}
