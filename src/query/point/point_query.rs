use crate::math::{Point, Real};
use na;

/// The projection of a point on a shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointProjection {
    /// Whether the original point was inside of the shape.
    pub is_inside: bool,
    /// The projection of the point on the shape.
    pub point: Point<Real>,
}

impl PointProjection {
    /// Initializes a new `PointProjection`.
    pub fn new(is_inside: bool, point: Point<Real>) -> Self {
        PointProjection { is_inside, point }
    }
}

/// Trait of shapes supporting point projection in their local frame.
pub trait PointQuery {
    /// Projects a point on `self`.
    ///
    /// If `solid` is `true` and the point is inside of the shape, the point
    /// itself is returned; otherwise the projection is on the boundary.
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection;

    /// The distance between the point and `self`, zero if the point is
    /// inside and `solid` is `true`.
    fn distance_to_local_point(&self, pt: &Point<Real>, solid: bool) -> Real {
        let proj = self.project_local_point(pt, solid);
        na::distance(pt, &proj.point)
    }
}

/// Trait of shapes whose point projection also reports which feature of the
/// shape carries the projection.
pub trait PointQueryWithLocation {
    /// The type describing the location of the projection on the shape.
    type Location;

    /// Projects a point on `self`, returning the feature the projection
    /// landed on.
    fn project_local_point_and_get_location(
        &self,
        pt: &Point<Real>,
        solid: bool,
    ) -> (PointProjection, Self::Location);
}
