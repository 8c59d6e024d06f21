use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A cylinder shape, aligned with the local `y` axis.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cylinder {
    /// The half-height of the cylinder.
    pub half_height: Real,
    /// The radius of the cylinder.
    pub radius: Real,
}

impl Cylinder {
    /// Creates a new cylinder from its half-height and radius.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Cylinder {
        Cylinder {
            half_height,
            radius,
        }
    }
}

impl SupportMap for Cylinder {
    // Split the direction into axial and radial parts: the axial sign
    // picks the cap, the radial part the azimuth on its rim.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let cap_y = if dir.y < 0.0 {
            -self.half_height
        } else {
            self.half_height
        };

        let radial = Vector::new(dir.x, 0.0, dir.z);
        let planar_norm = radial.norm();

        if planar_norm > crate::math::DEFAULT_EPSILON {
            let rim = radial * (self.radius / planar_norm);
            Point::new(rim.x, cap_y, rim.z)
        } else {
            // Purely axial direction: the cap center is as good as any
            // point of the cap.
            Point::new(0.0, cap_y, 0.0)
        }
    }
}
