use crate::math::{Point, Real, Vector};
use crate::query::point::{PointProjection, PointQuery};
use crate::shape::Capsule;
use na::Unit;

impl PointQuery for Capsule {
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        let seg_proj = self.segment.project_local_point(pt, true);
        let dproj = *pt - seg_proj.point;

        if let Some((dir, dist)) = Unit::try_new_and_get(dproj, crate::math::DEFAULT_EPSILON) {
            let inside = dist <= self.radius;
            if solid && inside {
                PointProjection::new(true, *pt)
            } else {
                PointProjection::new(inside, seg_proj.point + dir.into_inner() * self.radius)
            }
        } else if solid {
            PointProjection::new(true, *pt)
        } else {
            // The point lies on the capsule axis: snap along an arbitrary
            // direction orthogonal to it.
            let dir = self
                .segment
                .scaled_direction()
                .cross(&Vector::x())
                .try_normalize(crate::math::DEFAULT_EPSILON)
                .unwrap_or_else(|| {
                    self.segment
                        .scaled_direction()
                        .cross(&Vector::y())
                        .normalize()
                });
            PointProjection::new(true, seg_proj.point + dir * self.radius)
        }
    }
}
