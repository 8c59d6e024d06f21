use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// An ellipsoid shape, defined by its three semi-axis lengths.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    /// The semi-axis lengths along each local axis.
    pub radii: Vector<Real>,
}

impl Ellipsoid {
    /// Creates a new ellipsoid from its semi-axis lengths.
    #[inline]
    pub fn new(radii: Vector<Real>) -> Ellipsoid {
        Ellipsoid { radii }
    }
}

impl SupportMap for Ellipsoid {
    // With x = radii ∘ u for a unit u, maximizing d · x selects
    // u = (radii ∘ d) / ‖radii ∘ d‖.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let scaled = self.radii.component_mul(dir);
        let norm = scaled.norm();

        if norm <= crate::math::DEFAULT_EPSILON {
            Point::new(self.radii.x, 0.0, 0.0)
        } else {
            Point::from(self.radii.component_mul(&(scaled / norm)))
        }
    }
}
