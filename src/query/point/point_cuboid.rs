use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::query::point::{PointProjection, PointQuery};
use crate::shape::Cuboid;

impl PointQuery for Cuboid {
    #[inline]
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        let dl = Point::from(-self.half_extents);
        let ur = Point::from(self.half_extents);
        Aabb::new(dl, ur).project_local_point(pt, solid)
    }
}
