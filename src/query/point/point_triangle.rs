use crate::math::{Point, Real, Vector};
use crate::query::point::{PointProjection, PointQuery, PointQueryWithLocation};
use crate::shape::{Triangle, TrianglePointLocation};

#[inline]
fn compute_result(pt: &Point<Real>, proj: Point<Real>) -> PointProjection {
    PointProjection::new(relative_eq!(proj, *pt), proj)
}

impl PointQuery for Triangle {
    #[inline]
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        self.project_local_point_and_get_location(pt, solid).0
    }
}

impl PointQueryWithLocation for Triangle {
    type Location = TrianglePointLocation;

    fn project_local_point_and_get_location(
        &self,
        pt: &Point<Real>,
        _solid: bool,
    ) -> (PointProjection, Self::Location) {
        let a = self.a;
        let b = self.b;
        let c = self.c;

        let ab = b - a;
        let ac = c - a;
        let ap = pt - a;

        let ab_ap = ab.dot(&ap);
        let ac_ap = ac.dot(&ap);

        if ab_ap <= 0.0 && ac_ap <= 0.0 {
            // Voronoï region of `a`.
            return (compute_result(pt, a), TrianglePointLocation::OnVertex(0));
        }

        let bp = pt - b;
        let ab_bp = ab.dot(&bp);
        let ac_bp = ac.dot(&bp);

        if ab_bp >= 0.0 && ac_bp <= ab_bp {
            // Voronoï region of `b`.
            return (compute_result(pt, b), TrianglePointLocation::OnVertex(1));
        }

        let cp = pt - c;
        let ab_cp = ab.dot(&cp);
        let ac_cp = ac.dot(&cp);

        if ac_cp >= 0.0 && ab_cp <= ac_cp {
            // Voronoï region of `c`.
            return (compute_result(pt, c), TrianglePointLocation::OnVertex(2));
        }

        enum ProjectionInfo {
            OnAB,
            OnAC,
            OnBC,
            OnFace(Real, Real, Real),
        }

        // Checks on which edge Voronoï region the point is, using explicit
        // cross products for numerical stability.
        fn check_edges_voronoi(
            ab: &Vector<Real>,
            ac: &Vector<Real>,
            bc: &Vector<Real>,
            ap: &Vector<Real>,
            bp: &Vector<Real>,
            cp: &Vector<Real>,
            ab_ap: Real,
            ab_bp: Real,
            ac_ap: Real,
            ac_cp: Real,
            ac_bp: Real,
            ab_cp: Real,
        ) -> ProjectionInfo {
            let n = ab.cross(ac);

            let vc = n.dot(&ab.cross(ap));
            if vc < 0.0 && ab_ap >= 0.0 && ab_bp <= 0.0 {
                return ProjectionInfo::OnAB;
            }

            let vb = -n.dot(&ac.cross(cp));
            if vb < 0.0 && ac_ap >= 0.0 && ac_cp <= 0.0 {
                return ProjectionInfo::OnAC;
            }

            let va = n.dot(&bc.cross(bp));
            if va < 0.0 && ac_bp - ab_bp >= 0.0 && ab_cp - ac_cp >= 0.0 {
                return ProjectionInfo::OnBC;
            }

            ProjectionInfo::OnFace(va, vb, vc)
        }

        let bc = c - b;
        match check_edges_voronoi(
            &ab, &ac, &bc, &ap, &bp, &cp, ab_ap, ab_bp, ac_ap, ac_cp, ac_bp, ab_cp,
        ) {
            ProjectionInfo::OnAB => {
                // Voronoï region of `ab`.
                let v = ab_ap / ab.norm_squared();
                let bcoords = [1.0 - v, v];
                let res = a + ab * v;

                (
                    compute_result(pt, res),
                    TrianglePointLocation::OnEdge(0, bcoords),
                )
            }
            ProjectionInfo::OnAC => {
                // Voronoï region of `ac`.
                let w = ac_ap / ac.norm_squared();
                let bcoords = [1.0 - w, w];
                let res = a + ac * w;

                (
                    compute_result(pt, res),
                    TrianglePointLocation::OnEdge(2, bcoords),
                )
            }
            ProjectionInfo::OnBC => {
                // Voronoï region of `bc`.
                let w = bc.dot(&bp) / bc.norm_squared();
                let bcoords = [1.0 - w, w];
                let res = b + bc * w;

                (
                    compute_result(pt, res),
                    TrianglePointLocation::OnEdge(1, bcoords),
                )
            }
            ProjectionInfo::OnFace(va, vb, vc) => {
                // Voronoï region of the face.
                if va + vb + vc != 0.0 {
                    let denom = 1.0 / (va + vb + vc);
                    let v = vb * denom;
                    let w = vc * denom;
                    let bcoords = [1.0 - v - w, v, w];
                    let res = a + ab * v + ac * w;

                    (compute_result(pt, res), TrianglePointLocation::OnFace(bcoords))
                } else {
                    // The triangle is degenerate: project on its longest edge.
                    let edge_ab = crate::shape::Segment::new(a, b);
                    let edge_ac = crate::shape::Segment::new(a, c);
                    let ab2 = ab.norm_squared();
                    let ac2 = ac.norm_squared();

                    if ab2 >= ac2 {
                        let (proj, loc) = edge_ab.project_local_point_and_get_location(pt, false);
                        let bcoords = loc.barycentric_coordinates();
                        (proj, TrianglePointLocation::OnEdge(0, bcoords))
                    } else {
                        let (proj, loc) = edge_ac.project_local_point_and_get_location(pt, false);
                        let bcoords = loc.barycentric_coordinates();
                        (proj, TrianglePointLocation::OnEdge(2, bcoords))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::math::Point;
    use crate::query::point::PointQuery;
    use crate::shape::Triangle;

    #[test]
    fn project_on_face_and_features() {
        let tri = Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(0.0, 2.0, 0.0),
        );

        // Above the interior: projects straight down on the face.
        let proj = tri.project_local_point(&Point::new(0.5, 0.5, 3.0), false);
        assert_relative_eq!(proj.point, Point::new(0.5, 0.5, 0.0));

        // Beyond vertex `b`.
        let proj = tri.project_local_point(&Point::new(4.0, -1.0, 0.0), false);
        assert_relative_eq!(proj.point, Point::new(2.0, 0.0, 0.0));

        // Closest to edge `bc`.
        let proj = tri.project_local_point(&Point::new(2.0, 2.0, 0.0), false);
        assert_relative_eq!(proj.point, Point::new(1.0, 1.0, 0.0));
    }
}
