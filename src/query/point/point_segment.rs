use crate::math::{Point, Real};
use crate::query::point::{PointProjection, PointQuery, PointQueryWithLocation};
use crate::shape::{Segment, SegmentPointLocation};

impl PointQuery for Segment {
    #[inline]
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        self.project_local_point_and_get_location(pt, solid).0
    }
}

impl PointQueryWithLocation for Segment {
    type Location = SegmentPointLocation;

    #[inline]
    fn project_local_point_and_get_location(
        &self,
        pt: &Point<Real>,
        _solid: bool,
    ) -> (PointProjection, Self::Location) {
        let ab = self.b - self.a;
        let ap = pt - self.a;
        let ab_ap = ab.dot(&ap);
        let sqnab = ab.norm_squared();

        if ab_ap <= 0.0 || sqnab == 0.0 {
            // Voronoï region of `a`.
            (
                PointProjection::new(*pt == self.a, self.a),
                SegmentPointLocation::OnVertex(0),
            )
        } else if ab_ap >= sqnab {
            // Voronoï region of `b`.
            (
                PointProjection::new(*pt == self.b, self.b),
                SegmentPointLocation::OnVertex(1),
            )
        } else {
            // Voronoï region of the segment interior.
            let u = ab_ap / sqnab;
            let proj = self.a + ab * u;

            (
                PointProjection::new(proj == *pt, proj),
                SegmentPointLocation::OnEdge([1.0 - u, u]),
            )
        }
    }
}
