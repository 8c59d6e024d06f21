use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::query::point::{PointProjection, PointQuery};

impl PointQuery for Aabb {
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        let clamped = self.clamp_point(pt);

        if clamped != *pt {
            return PointProjection::new(false, clamped);
        }

        if solid {
            return PointProjection::new(true, *pt);
        }

        // The point is inside: snap it to the closest face.
        let mut best_axis = 0;
        let mut best_snap = self.mins[0];
        let mut best_dist = Real::MAX;

        for i in 0..3 {
            let to_min = pt[i] - self.mins[i];
            let to_max = self.maxs[i] - pt[i];

            if to_min < best_dist {
                best_dist = to_min;
                best_axis = i;
                best_snap = self.mins[i];
            }

            if to_max < best_dist {
                best_dist = to_max;
                best_axis = i;
                best_snap = self.maxs[i];
            }
        }

        let mut proj = *pt;
        proj[best_axis] = best_snap;
        PointProjection::new(true, proj)
    }
}

#[cfg(test)]
mod test {
    use crate::bounding_volume::Aabb;
    use crate::math::Point;
    use crate::query::point::PointQuery;

    #[test]
    fn project_outside_and_inside() {
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));

        let outside = aabb.project_local_point(&Point::new(3.0, 0.0, 0.0), true);
        assert!(!outside.is_inside);
        assert_eq!(outside.point, Point::new(1.0, 0.0, 0.0));

        let solid = aabb.project_local_point(&Point::new(0.9, 0.0, 0.0), true);
        assert!(solid.is_inside);
        assert_eq!(solid.point, Point::new(0.9, 0.0, 0.0));

        let hollow = aabb.project_local_point(&Point::new(0.9, 0.0, 0.0), false);
        assert!(hollow.is_inside);
        assert_eq!(hollow.point, Point::new(1.0, 0.0, 0.0));
    }
}
