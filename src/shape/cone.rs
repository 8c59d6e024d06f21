use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A cone shape, aligned with the local `y` axis: the apex points toward `+y`
/// and the base disc of radius `radius` sits at `-half_height`.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cone {
    /// The half-height of the cone.
    pub half_height: Real,
    /// The base radius of the cone.
    pub radius: Real,
}

impl Cone {
    /// Creates a new cone from its half-height and base radius.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Cone {
        Cone {
            half_height,
            radius,
        }
    }
}

impl SupportMap for Cone {
    // The support is either the apex or a point of the base rim; compare
    // their projections and keep the winner.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let apex = Point::new(0.0, self.half_height, 0.0);

        let radial = Vector::new(dir.x, 0.0, dir.z);
        let planar_norm = radial.norm();

        if planar_norm <= crate::math::DEFAULT_EPSILON {
            // Purely axial: apex above, base center below (every base
            // point ties there).
            return if dir.y < 0.0 {
                Point::new(0.0, -self.half_height, 0.0)
            } else {
                apex
            };
        }

        let rim = radial * (self.radius / planar_norm);
        let rim_pt = Point::new(rim.x, -self.half_height, rim.z);

        if dir.y * self.half_height >= dir.dot(&rim_pt.coords) {
            apex
        } else {
            rim_pt
        }
    }
}
