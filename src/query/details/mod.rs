//! Analytic shape-pair solvers.
//!
//! These short-circuit GJK/EPA entirely for pairs with a closed-form
//! solution; their results agree with the iterative path within the solver
//! tolerance.

pub use self::ball_ball::contact_ball_ball;
pub use self::ball_shape::contact_ball_point_query;
pub use self::capsule_capsule::contact_capsule_capsule;
pub use self::halfspace::{contact_halfspace_support_map, contact_plane_support_map};
pub use self::segment_segment::closest_points_segment_segment_with_locations;
pub use self::triangle_triangle::contact_triangle_triangle;

use crate::math::{Isometry, Point, Real, UnitVector};

mod ball_ball;
mod ball_shape;
mod capsule_capsule;
mod halfspace;
mod segment_segment;
mod triangle_triangle;

/// A shape-pair contact expressed in the first shape's local frame.
///
/// `distance` is signed: positive separation, negative penetration. The
/// normal points from the second shape toward the first, and the witness
/// points lie on each shape's core surface.
#[derive(Copy, Clone, Debug)]
pub struct LocalContact {
    /// The signed distance between the two shapes.
    pub distance: Real,
    /// The unit separation axis, from the second shape toward the first.
    pub normal: UnitVector<Real>,
    /// The witness point on the first shape.
    pub point1: Point<Real>,
    /// The witness point on the second shape.
    pub point2: Point<Real>,
}

impl LocalContact {
    /// Converts a contact computed with swapped roles (first shape seen as
    /// second) back to the caller's ordering.
    ///
    /// `self` must be expressed in the frame of the *second* caller shape
    /// with roles swapped, and `pos12` is the pose of that shape in the
    /// first caller shape's frame. The result is in the first shape's frame
    /// with roles restored.
    pub fn swapped(self, pos12: &Isometry<Real>) -> LocalContact {
        LocalContact {
            distance: self.distance,
            normal: pos12 * -self.normal,
            point1: pos12 * self.point2,
            point2: pos12 * self.point1,
        }
    }
}
