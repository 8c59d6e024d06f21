use crate::math::{Point, Real};
use crate::query::gjk::{self, CSOPoint};
use crate::query::point::PointQueryWithLocation;
use crate::shape::{Segment, SegmentPointLocation, Triangle, TrianglePointLocation};

/// A simplex of dimension up to 3, using Voronoï regions to compute point
/// projections.
///
/// This is the working set of the GJK algorithm: up to four CSO points,
/// reduced after every insertion to the smallest sub-simplex containing the
/// projection of the origin. The barycentric coordinates of that projection
/// are kept so the witness points on both original shapes can be
/// reconstructed.
#[derive(Clone, Debug)]
pub struct VoronoiSimplex {
    prev_vertices: [CSOPoint; 4],
    prev_proj: [Real; 4],
    prev_dim: usize,

    vertices: [CSOPoint; 4],
    proj: [Real; 4],
    dim: usize,
}

impl Default for VoronoiSimplex {
    fn default() -> Self {
        Self::new()
    }
}

impl VoronoiSimplex {
    /// Creates a new empty simplex.
    pub fn new() -> VoronoiSimplex {
        VoronoiSimplex {
            prev_vertices: [CSOPoint::origin(); 4],
            prev_proj: [0.0; 4],
            prev_dim: 0,
            vertices: [CSOPoint::origin(); 4],
            proj: [0.0; 4],
            dim: 0,
        }
    }

    /// Resets this simplex to a single point.
    pub fn reset(&mut self, pt: CSOPoint) {
        self.prev_dim = 0;
        self.prev_vertices[0] = pt;
        self.dim = 0;
        self.vertices[0] = pt;
    }

    /// Adds a point to this simplex.
    ///
    /// Returns `false` without modifying the simplex if the point is already
    /// one of its vertices (up to the GJK tolerance): inserting it again
    /// could only produce a degenerate simplex.
    pub fn add_point(&mut self, pt: CSOPoint) -> bool {
        for i in 0..self.dim + 1 {
            if (self.vertices[i].point - pt.point).norm_squared() < gjk::eps_tol() {
                return false;
            }
        }

        self.prev_dim = self.dim;
        self.prev_proj = self.proj;
        self.prev_vertices = self.vertices;

        self.dim += 1;
        self.vertices[self.dim] = pt;
        true
    }

    /// The barycentric coordinate of the `i`-th vertex, from the last call
    /// to `project_origin_and_reduce`.
    pub fn proj_coord(&self, i: usize) -> Real {
        assert!(i <= self.dim, "index out of bounds");
        self.proj[i]
    }

    /// The `i`-th point of this simplex.
    pub fn point(&self, i: usize) -> &CSOPoint {
        assert!(i <= self.dim, "index out of bounds");
        &self.vertices[i]
    }

    /// The barycentric coordinate of the `i`-th vertex, from before the last
    /// call to `project_origin_and_reduce`.
    pub fn prev_proj_coord(&self, i: usize) -> Real {
        assert!(i <= self.prev_dim, "index out of bounds");
        self.prev_proj[i]
    }

    /// The `i`-th point of the simplex before the last call to
    /// `project_origin_and_reduce`.
    pub fn prev_point(&self, i: usize) -> &CSOPoint {
        assert!(i <= self.prev_dim, "index out of bounds");
        &self.prev_vertices[i]
    }

    /// Projects the origin on the boundary of this simplex and reduces
    /// `self` to the smallest sub-simplex containing that projection.
    ///
    /// Returns the projection, or `Point::origin()` if the origin lies
    /// inside of the simplex. The pre-projection state can be retrieved with
    /// the `prev_`-prefixed methods.
    pub fn project_origin_and_reduce(&mut self) -> Point<Real> {
        if self.dim == 0 {
            self.proj[0] = 1.0;
            self.vertices[0].point
        } else if self.dim == 1 {
            let (proj, location) = {
                let seg = Segment::new(self.vertices[0].point, self.vertices[1].point);
                seg.project_local_point_and_get_location(&Point::origin(), true)
            };

            match location {
                SegmentPointLocation::OnVertex(0) => {
                    self.proj[0] = 1.0;
                    self.dim = 0;
                }
                SegmentPointLocation::OnVertex(_) => {
                    self.vertices.swap(0, 1);
                    self.proj[0] = 1.0;
                    self.dim = 0;
                }
                SegmentPointLocation::OnEdge(coords) => {
                    self.proj[0] = coords[0];
                    self.proj[1] = coords[1];
                }
            }

            proj.point
        } else if self.dim == 2 {
            let (proj, location) = {
                let tri = Triangle::new(
                    self.vertices[0].point,
                    self.vertices[1].point,
                    self.vertices[2].point,
                );
                tri.project_local_point_and_get_location(&Point::origin(), true)
            };

            self.reduce_triangle([0, 1, 2], &location);
            proj.point
        } else {
            assert!(self.dim == 3);
            self.project_origin_on_tetrahedron()
        }
    }

    // The four faces of the tetrahedron, each listed with the index of its
    // opposite vertex.
    const TETRA_FACES: [([usize; 3], usize); 4] = [
        ([1, 2, 3], 0),
        ([0, 2, 3], 1),
        ([0, 1, 3], 2),
        ([0, 1, 2], 3),
    ];

    // Projects the origin on every face of the tetrahedron it is "outside"
    // of, keeps the closest projection, and reduces the simplex to the
    // corresponding sub-simplex. Keeps `dim == 3` when no face plane
    // separates the origin from the tetrahedron, i.e. the origin is inside.
    //
    // Faces are visited in a fixed order and only a strictly smaller
    // distance replaces the current best, which makes the reduction
    // deterministic for vertices inserted in the same order.
    fn project_origin_on_tetrahedron(&mut self) -> Point<Real> {
        let origin = Point::origin();
        let mut best: Option<(Real, [usize; 3], TrianglePointLocation, Point<Real>)> = None;

        for (pts, opp) in Self::TETRA_FACES {
            let [i0, i1, i2] = pts;
            let a = self.vertices[i0].point;
            let normal = Triangle::new(a, self.vertices[i1].point, self.vertices[i2].point)
                .scaled_normal();

            let origin_side = normal.dot(&(origin - a));
            let opp_side = normal.dot(&(self.vertices[opp].point - a));

            // The origin is strictly on the inner side of this face's
            // plane: the closest point cannot lie on it. A zero product
            // (origin on the plane, or flat tetrahedron) still projects, so
            // degenerate insertions reduce instead of reporting containment.
            if origin_side * opp_side > 0.0 {
                continue;
            }

            let tri = Triangle::new(
                self.vertices[i0].point,
                self.vertices[i1].point,
                self.vertices[i2].point,
            );
            let (proj, loc) = tri.project_local_point_and_get_location(&origin, true);
            let dist = proj.point.coords.norm_squared();

            if best.as_ref().map(|b| dist < b.0).unwrap_or(true) {
                best = Some((dist, pts, loc, proj.point));
            }
        }

        match best {
            None => {
                // The origin is inside the tetrahedron.
                self.proj = [0.25; 4];
                origin
            }
            Some((_, pts, loc, proj)) => {
                self.reduce_triangle(pts, &loc);
                proj
            }
        }
    }

    // Reduces the simplex to the sub-simplex of the triangle
    // `(vertices[pts[0]], vertices[pts[1]], vertices[pts[2]])` designated by
    // `location`, moving the retained vertices to the first slots.
    fn reduce_triangle(&mut self, pts: [usize; 3], location: &TrianglePointLocation) {
        let v = self.vertices;

        match location {
            TrianglePointLocation::OnVertex(i) => {
                self.vertices[0] = v[pts[*i as usize]];
                self.proj[0] = 1.0;
                self.dim = 0;
            }
            TrianglePointLocation::OnEdge(e, coords) => {
                let (i1, i2) = match e {
                    0 => (pts[0], pts[1]),
                    1 => (pts[1], pts[2]),
                    _ => (pts[0], pts[2]),
                };

                self.vertices[0] = v[i1];
                self.vertices[1] = v[i2];
                self.proj[0] = coords[0];
                self.proj[1] = coords[1];
                self.dim = 1;
            }
            TrianglePointLocation::OnFace(coords) => {
                self.vertices[0] = v[pts[0]];
                self.vertices[1] = v[pts[1]];
                self.vertices[2] = v[pts[2]];
                self.proj[..3].copy_from_slice(coords);
                self.dim = 2;
            }
        }
    }

    /// Whether the given point is already a vertex of this simplex.
    pub fn contains_point(&self, pt: &Point<Real>) -> bool {
        for i in 0..self.dim + 1 {
            if self.vertices[i].point == *pt {
                return true;
            }
        }

        false
    }

    /// The dimension of the smallest subspace containing this simplex.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// The dimension of the simplex before the last call to
    /// `project_origin_and_reduce`.
    pub fn prev_dimension(&self) -> usize {
        self.prev_dim
    }
}

#[cfg(test)]
mod test {
    use super::VoronoiSimplex;
    use crate::math::Point;
    use crate::query::gjk::CSOPoint;

    fn cso(x: f64, y: f64, z: f64) -> CSOPoint {
        CSOPoint::new(Point::new(x, y, z), Point::origin())
    }

    #[test]
    fn segment_reduction() {
        let mut simplex = VoronoiSimplex::new();
        simplex.reset(cso(2.0, 1.0, 0.0));
        assert!(simplex.add_point(cso(2.0, -1.0, 0.0)));

        let proj = simplex.project_origin_and_reduce();
        assert_relative_eq!(proj, Point::new(2.0, 0.0, 0.0));
        assert_eq!(simplex.dimension(), 1);
        assert_relative_eq!(simplex.proj_coord(0), 0.5);
        assert_relative_eq!(simplex.proj_coord(1), 0.5);
    }

    #[test]
    fn tetrahedron_keeps_origin_inside() {
        let mut simplex = VoronoiSimplex::new();
        simplex.reset(cso(-1.0, -1.0, -1.0));
        assert!(simplex.add_point(cso(3.0, 0.0, 0.0)));
        assert!(simplex.add_point(cso(0.0, 3.0, 0.0)));
        assert!(simplex.add_point(cso(0.0, 0.0, 3.0)));

        let proj = simplex.project_origin_and_reduce();
        assert_eq!(simplex.dimension(), 3);
        assert_relative_eq!(proj, Point::origin());
    }

    #[test]
    fn tetrahedron_reduces_to_closest_face() {
        let mut simplex = VoronoiSimplex::new();
        simplex.reset(cso(1.0, 0.0, 0.0));
        assert!(simplex.add_point(cso(2.0, 1.0, 1.0)));
        assert!(simplex.add_point(cso(2.0, -1.0, 1.0)));
        assert!(simplex.add_point(cso(2.0, 0.0, -1.0)));

        let proj = simplex.project_origin_and_reduce();
        // The closest feature is the lone vertex at x = 1.
        assert_eq!(simplex.dimension(), 0);
        assert_relative_eq!(proj, Point::new(1.0, 0.0, 0.0));
    }
}
