use crate::math::{Point, Real, Vector};
use crate::query::point::{PointProjection, PointQuery};
use crate::shape::Cylinder;

impl PointQuery for Cylinder {
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        let planar = Vector::new(pt.x, 0.0, pt.z);
        let planar_dist = planar.norm();

        let inside_radially = planar_dist <= self.radius;
        let inside_vertically = pt.y.abs() <= self.half_height;

        if inside_radially && inside_vertically {
            if solid {
                return PointProjection::new(true, *pt);
            }

            // Inside: snap to the closest of the side wall and the caps.
            let to_wall = self.radius - planar_dist;
            let to_cap = self.half_height - pt.y.abs();

            let proj = if to_wall < to_cap && planar_dist > crate::math::DEFAULT_EPSILON {
                let dir = planar / planar_dist;
                Point::new(dir.x * self.radius, pt.y, dir.z * self.radius)
            } else {
                Point::new(pt.x, self.half_height.copysign(pt.y), pt.z)
            };

            return PointProjection::new(true, proj);
        }

        // Outside: clamp radially then vertically.
        let clamped_planar = if inside_radially || planar_dist == 0.0 {
            planar
        } else {
            planar * (self.radius / planar_dist)
        };
        let clamped_y = pt.y.clamp(-self.half_height, self.half_height);

        PointProjection::new(
            false,
            Point::new(clamped_planar.x, clamped_y, clamped_planar.z),
        )
    }
}

#[cfg(test)]
mod test {
    use crate::math::Point;
    use crate::query::point::PointQuery;
    use crate::shape::Cylinder;

    #[test]
    fn project_outside_side_and_cap() {
        let cyl = Cylinder::new(1.0, 0.5);

        let side = cyl.project_local_point(&Point::new(2.0, 0.0, 0.0), true);
        assert!(!side.is_inside);
        assert_relative_eq!(side.point, Point::new(0.5, 0.0, 0.0));

        let cap = cyl.project_local_point(&Point::new(0.0, 3.0, 0.0), true);
        assert_relative_eq!(cap.point, Point::new(0.0, 1.0, 0.0));

        let corner = cyl.project_local_point(&Point::new(2.0, 4.0, 0.0), true);
        assert_relative_eq!(corner.point, Point::new(0.5, 1.0, 0.0));
    }
}
