//! Penetration depth queries using the Expanding Polytope Algorithm.

use crate::math::{Point, Real, Vector};
use crate::query::gjk::{self, CSOPoint, MinkowskiDiff, VoronoiSimplex};
use crate::query::point::PointQueryWithLocation;
use crate::shape::{Triangle, TrianglePointLocation};
use crate::utils;
use na::{self, Unit};
use num::Bounded;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Copy, Clone, PartialEq)]
struct FaceId {
    id: usize,
    neg_dist: Real,
}

impl FaceId {
    fn new(id: usize, neg_dist: Real) -> Option<Self> {
        if neg_dist > gjk::eps_tol() {
            // The origin is on the negative side of the face plane: the
            // polytope would not enclose it.
            None
        } else {
            Some(FaceId { id, neg_dist })
        }
    }
}

impl Eq for FaceId {}

impl PartialOrd for FaceId {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FaceId {
    // Keyed on the negated plane distance, so the max-heap pops the face
    // closest to the origin first.
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        if self.neg_dist < other.neg_dist {
            Ordering::Less
        } else if self.neg_dist > other.neg_dist {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

#[derive(Clone, Debug)]
struct Face {
    pts: [usize; 3],
    adj: [usize; 3],
    normal: Unit<Vector<Real>>,
    bcoords: [Real; 3],
    deleted: bool,
}

impl Face {
    fn new_with_proj(
        vertices: &[CSOPoint],
        bcoords: [Real; 3],
        pts: [usize; 3],
        adj: [usize; 3],
    ) -> Self {
        let normal = utils::ccw_face_normal([
            &vertices[pts[0]].point,
            &vertices[pts[1]].point,
            &vertices[pts[2]].point,
        ])
        // Degenerate faces get a zero normal; `can_be_seen_by` treats them
        // as always visible so they are skipped during silhouette
        // computation.
        .unwrap_or(Unit::new_unchecked(na::zero()));

        Face {
            pts,
            adj,
            normal,
            bcoords,
            deleted: false,
        }
    }

    fn new(vertices: &[CSOPoint], pts: [usize; 3], adj: [usize; 3]) -> (Self, bool) {
        let tri = Triangle::new(
            vertices[pts[0]].point,
            vertices[pts[1]].point,
            vertices[pts[2]].point,
        );
        let (proj, loc) = tri.project_local_point_and_get_location(&Point::origin(), true);

        match loc {
            TrianglePointLocation::OnVertex(_) | TrianglePointLocation::OnEdge(_, _) => {
                let eps_tol = crate::math::DEFAULT_EPSILON * 100.0;
                let origin_on_face = proj.point.coords.norm_squared() <= eps_tol * eps_tol;
                (
                    Self::new_with_proj(vertices, loc.barycentric_coordinates(), pts, adj),
                    origin_on_face,
                )
            }
            TrianglePointLocation::OnFace(bcoords) => {
                (Self::new_with_proj(vertices, bcoords, pts, adj), true)
            }
        }
    }

    fn closest_points(&self, vertices: &[CSOPoint]) -> (Point<Real>, Point<Real>) {
        (
            vertices[self.pts[0]].orig1 * self.bcoords[0]
                + vertices[self.pts[1]].orig1.coords * self.bcoords[1]
                + vertices[self.pts[2]].orig1.coords * self.bcoords[2],
            vertices[self.pts[0]].orig2 * self.bcoords[0]
                + vertices[self.pts[1]].orig2.coords * self.bcoords[1]
                + vertices[self.pts[2]].orig2.coords * self.bcoords[2],
        )
    }

    fn next_ccw_pt_id(&self, id: usize) -> usize {
        if self.pts[0] == id {
            1
        } else if self.pts[1] == id {
            2
        } else {
            if self.pts[2] != id {
                log::debug!(
                    "unexpected adjacency in the expanding polytope: found index {}, expected {}",
                    self.pts[2],
                    id
                );
            }

            0
        }
    }

    fn can_be_seen_by(&self, vertices: &[CSOPoint], point: usize, opp_pt_id: usize) -> bool {
        let p0 = &vertices[self.pts[opp_pt_id]].point;
        let p1 = &vertices[self.pts[(opp_pt_id + 1) % 3]].point;
        let p2 = &vertices[self.pts[(opp_pt_id + 2) % 3]].point;
        let pt = &vertices[point].point;

        // Zero-normal (degenerate) faces yield a zero dot product and are
        // reported as seen, so the silhouette walk steps over them.
        (*pt - *p0).dot(&self.normal) >= -gjk::eps_tol()
            || Triangle::new(*p1, *p2, *pt).is_affinely_dependent()
    }
}

#[derive(Copy, Clone)]
struct SilhouetteEdge {
    face_id: usize,
    opp_pt_id: usize,
}

// Outcome of one fan re-triangulation pass.
enum FanStatus {
    Done,
    NoFace,
    OutOfFaces,
    NonConvex,
}

/// The terminal states of an EPA run.
///
/// Every state except `DidNotRun`/`Running` still leaves a best-effort
/// penetration depth, normal and witness pair readable on the solver;
/// non-`Valid` states flag the result as numerically imprecise.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EpaStatus {
    /// The solver was not invoked yet.
    DidNotRun,
    /// The solver is iterating; internal only.
    Running,
    /// Converged within tolerance.
    Valid,
    /// Expansion stalled before reaching the tolerance; the result is the
    /// closest face found, which is usually accurate enough.
    AccuracyReached,
    /// The face arena was exhausted.
    OutOfFaces,
    /// The vertex arena was exhausted.
    OutOfVertices,
    /// The iteration budget was exhausted.
    Failed,
    /// A face of the polytope degenerated (zero-area triangle).
    Degenerated,
    /// A new face saw the origin on its outer side: the polytope stopped
    /// being convex, typically from accumulated rounding.
    NonConvex,
    /// The silhouette of a visible region was not a simple closed loop.
    InvalidHull,
}

/// The Expanding Polytope Algorithm in 3D.
///
/// Given a GJK simplex enclosing the origin of the Minkowski difference,
/// grows a triangulated polytope outward until the face closest to the
/// origin stops moving; that face carries the minimal penetration direction
/// and depth.
///
/// Faces reference polytope vertices through indices into a vector, never
/// through pointers, which keeps the arenas relocatable and the heap keys
/// stable. All storage is reused across runs; capacities are reserved up
/// front so expansion does not allocate per iteration.
pub struct Epa {
    /// The convergence tolerance.
    pub tolerance: Real,
    /// The maximum number of expansion iterations.
    pub max_iterations: usize,
    /// The face-arena capacity cap.
    pub max_faces: usize,
    /// The vertex-arena capacity cap.
    pub max_vertices: usize,

    status: EpaStatus,
    depth: Real,
    normal: Unit<Vector<Real>>,
    witness1: Point<Real>,
    witness2: Point<Real>,

    vertices: Vec<CSOPoint>,
    faces: Vec<Face>,
    silhouette: SmallVec<[SilhouetteEdge; 16]>,
    heap: BinaryHeap<FaceId>,
}

impl Epa {
    /// Creates a solver with the given iteration budget and tolerance.
    ///
    /// The vertex and face caps default to the largest polytope the
    /// iteration budget can build: one vertex per iteration on top of the
    /// initial tetrahedron, and the matching Euler bound on faces.
    pub fn new(max_iterations: usize, tolerance: Real) -> Self {
        let max_vertices = max_iterations + 4;
        let max_faces = max_vertices * 2;

        Epa {
            tolerance,
            max_iterations,
            max_faces,
            max_vertices,
            status: EpaStatus::DidNotRun,
            depth: 0.0,
            normal: Vector::y_axis(),
            witness1: Point::origin(),
            witness2: Point::origin(),
            vertices: Vec::with_capacity(max_vertices),
            faces: Vec::with_capacity(max_faces),
            silhouette: SmallVec::new(),
            heap: BinaryHeap::with_capacity(max_faces),
        }
    }

    /// The status of the last run.
    #[inline]
    pub fn status(&self) -> EpaStatus {
        self.status
    }

    /// The penetration depth found by the last run (non-negative).
    #[inline]
    pub fn depth(&self) -> Real {
        self.depth
    }

    /// The minimum penetration direction, pointing from the second shape
    /// toward the first, in the first shape's frame.
    #[inline]
    pub fn normal(&self) -> &Unit<Vector<Real>> {
        &self.normal
    }

    /// The witness points of the last run, in the first shape's frame.
    #[inline]
    pub fn witnesses(&self) -> (Point<Real>, Point<Real>) {
        (self.witness1, self.witness2)
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.heap.clear();
        self.silhouette.clear();
        self.depth = 0.0;
        self.normal = Vector::y_axis();
        self.witness1 = Point::origin();
        self.witness2 = Point::origin();
    }

    // Records the result carried by `face` and returns `status`.
    //
    // The face normal points outward from the CSO and equals
    // `(p1 - p2) / depth`. The reported contact normal points from the
    // second shape toward the first (the direction that separates shape 1),
    // which is its negation.
    fn conclude(&mut self, status: EpaStatus, face_id: usize) -> EpaStatus {
        let face = &self.faces[face_id];
        let (p1, p2) = face.closest_points(&self.vertices);

        self.witness1 = p1;
        self.witness2 = p2;
        self.normal = -face.normal;
        self.depth = (p1 - p2).dot(&face.normal);
        self.status = status;
        self.status
    }

    /// Runs the expansion on the given Minkowski difference, starting from
    /// a GJK simplex whose sub-simplex contains the origin.
    ///
    /// Degenerate seeds are completed: a segment is fattened with one
    /// support point, a triangle is doubled into a two-sided polytope. A
    /// point seed means the shapes touch exactly; the run reports a zero
    /// depth immediately.
    pub fn evaluate(&mut self, md: &mut MinkowskiDiff, simplex: &VoronoiSimplex) -> EpaStatus {
        self.status = EpaStatus::Running;
        self.reset();

        for i in 0..simplex.dimension() + 1 {
            self.vertices.push(*simplex.point(i));
        }

        if simplex.dimension() == 0 {
            let pt = &self.vertices[0];
            self.witness1 = pt.orig1;
            self.witness2 = pt.orig2;
            self.depth = 0.0;
            self.status = EpaStatus::Valid;
            return self.status;
        } else if simplex.dimension() == 3 {
            let e1 = self.vertices[1] - self.vertices[0];
            let e2 = self.vertices[2] - self.vertices[0];
            let e3 = self.vertices[3] - self.vertices[0];

            // Reorder so every face of the seed tetrahedron winds outward.
            if e1.cross(&e2).dot(&e3) > 0.0 {
                self.vertices.swap(1, 2)
            }

            let pts = [[0, 1, 2], [1, 3, 2], [0, 2, 3], [0, 3, 1]];
            let adj = [[3, 1, 2], [3, 2, 0], [0, 1, 3], [2, 1, 0]];

            let mut any_inside = false;

            for i in 0..4 {
                let (face, proj_inside) = Face::new(&self.vertices, pts[i], adj[i]);
                self.faces.push(face);

                if proj_inside {
                    any_inside = true;
                    let dist = self.faces[i]
                        .normal
                        .dot(&self.vertices[pts[i][0]].point.coords);

                    match FaceId::new(i, -dist) {
                        Some(id) => self.heap.push(id),
                        None => return self.conclude(EpaStatus::Degenerated, i),
                    }
                }
            }

            if !any_inside {
                // The origin does not project inside any face of the seed
                // tetrahedron; the hull is unusable.
                log::debug!("failed to project the origin on the initial polytope");
                self.status = EpaStatus::InvalidHull;
                return self.status;
            }
        } else {
            if simplex.dimension() == 1 {
                let dpt = self.vertices[1] - self.vertices[0];

                let _ = Vector::orthonormal_subspace_basis(&[dpt], |dir| {
                    self.vertices.push(md.support(dir));
                    false
                });
            }

            let pts = [[0, 1, 2], [0, 2, 1]];
            let adj = [[1, 1, 1], [0, 0, 0]];

            for i in 0..2 {
                let (face, _) = Face::new(&self.vertices, pts[i], adj[i]);
                self.faces.push(face);

                match FaceId::new(i, 0.0) {
                    Some(id) => self.heap.push(id),
                    None => return self.conclude(EpaStatus::Degenerated, i),
                }
            }
        }

        let mut iter = 0;
        let mut best_upper = Real::max_value();
        let mut closest = match self.heap.peek() {
            Some(entry) => *entry,
            None => {
                self.status = EpaStatus::InvalidHull;
                return self.status;
            }
        };

        /*
         * Expansion: pop the face nearest to the origin, push the support
         * point past it, and re-triangulate the hole this opens up.
         */
        while let Some(entry) = self.heap.pop() {
            if self.faces[entry.id].deleted {
                continue;
            }

            if self.vertices.len() >= self.max_vertices {
                return self.conclude(EpaStatus::OutOfVertices, closest.id);
            }

            let seed = self.faces[entry.id].clone();
            let lower = -entry.neg_dist;

            let w = md.support(&seed.normal);
            let new_vid = self.vertices.len();
            self.vertices.push(w);

            // The support plane caps the depth from above; the popped
            // face's plane bounds it from below. A support point landing
            // back on the popped face closes the gap and converges here.
            let support_depth = w.point.coords.dot(&seed.normal);

            if support_depth < best_upper {
                best_upper = support_depth;
                closest = entry;
            }

            if best_upper - lower < self.tolerance {
                return self.conclude(EpaStatus::Valid, closest.id);
            }

            self.faces[entry.id].deleted = true;
            self.carve_visible_region(new_vid, &seed);

            if self.silhouette.is_empty() {
                // The visible region has no boundary: the topology broke.
                return self.conclude(EpaStatus::InvalidHull, closest.id);
            }

            let fan = self.attach_fan(new_vid, lower);
            self.silhouette.clear();

            match fan {
                FanStatus::Done => {}
                FanStatus::NoFace => return self.conclude(EpaStatus::InvalidHull, closest.id),
                FanStatus::OutOfFaces => return self.conclude(EpaStatus::OutOfFaces, closest.id),
                FanStatus::NonConvex => return self.conclude(EpaStatus::NonConvex, entry.id),
            }

            iter += 1;
            if iter > self.max_iterations {
                return self.conclude(EpaStatus::Failed, closest.id);
            }
        }

        // The heap drained: no face can expand any further.
        self.conclude(EpaStatus::AccuracyReached, closest.id)
    }

    // Deletes every face visible from `vertex`, leaving the boundary of the
    // deleted region in `self.silhouette`.
    //
    // Depth-first over the adjacency links of `seed` (already popped); the
    // explicit stack replays the same preorder a recursive walk would, so
    // the boundary edges come out in consecutive order around the horizon.
    // `attach_fan` relies on that ordering to link the new faces.
    fn carve_visible_region(&mut self, vertex: usize, seed: &Face) {
        let mut pending: SmallVec<[(usize, usize); 16]> = SmallVec::new();

        for k in [2, 1, 0] {
            let adj = seed.adj[k];
            let opp = self.faces[adj].next_ccw_pt_id(seed.pts[k]);
            pending.push((adj, opp));
        }

        while let Some((id, opp_pt_id)) = pending.pop() {
            if self.faces[id].deleted {
                continue;
            }

            if !self.faces[id].can_be_seen_by(&self.vertices, vertex, opp_pt_id) {
                self.silhouette.push(SilhouetteEdge {
                    face_id: id,
                    opp_pt_id,
                });
                continue;
            }

            self.faces[id].deleted = true;

            // Cross the two edges not shared with the face we came from,
            // nearest-first.
            for k in [opp_pt_id, (opp_pt_id + 2) % 3] {
                let adj = self.faces[id].adj[k];
                let opp = self.faces[adj].next_ccw_pt_id(self.faces[id].pts[k]);
                pending.push((adj, opp));
            }
        }
    }

    // Joins `new_vid` to every horizon edge, restoring a closed polytope.
    // Each new face neighbours the surviving face across its horizon edge
    // and its two siblings in the fan; the ring is closed at the end.
    fn attach_fan(&mut self, new_vid: usize, lower: Real) -> FanStatus {
        let fan_start = self.faces.len();

        for i in 0..self.silhouette.len() {
            let SilhouetteEdge { face_id, opp_pt_id } = self.silhouette[i];

            if self.faces[face_id].deleted {
                continue;
            }

            if self.faces.len() >= self.max_faces {
                return FanStatus::OutOfFaces;
            }

            let fid = self.faces.len();

            // Horizon edge endpoints, wound so the new face looks outward.
            let e0 = self.faces[face_id].pts[(opp_pt_id + 2) % 3];
            let e1 = self.faces[face_id].pts[(opp_pt_id + 1) % 3];

            let (face, origin_inside) =
                Face::new(&self.vertices, [e0, e1, new_vid], [face_id, fid + 1, fid - 1]);

            self.faces[face_id].adj[(opp_pt_id + 1) % 3] = fid;
            self.faces.push(face);

            if origin_inside {
                let anchor = self.vertices[e0].point.coords;
                let dist = self.faces[fid].normal.dot(&anchor);

                if dist < lower {
                    // This face undercuts the one it replaced: convexity
                    // is lost.
                    return FanStatus::NonConvex;
                }

                if let Some(entry) = FaceId::new(fid, -dist) {
                    self.heap.push(entry);
                }
            }
        }

        if fan_start == self.faces.len() {
            // Every horizon edge belonged to a deleted face.
            return FanStatus::NoFace;
        }

        let fan_end = self.faces.len() - 1;
        self.faces[fan_start].adj[2] = fan_end;
        self.faces[fan_end].adj[1] = fan_start;

        FanStatus::Done
    }
}

#[cfg(test)]
mod test {
    use super::{Epa, EpaStatus};
    use crate::math::{Isometry, Vector};
    use crate::query::gjk::{Gjk, GjkStatus, MinkowskiDiff};
    use crate::shape::Shape;

    #[test]
    fn overlapping_balls_depth() {
        let b1 = Shape::ball(1.0);
        let b2 = Shape::ball(1.0);
        let pos12 = Isometry::translation(1.5, 0.0, 0.0);

        let mut md = MinkowskiDiff::new(b1.kind(), b2.kind(), pos12, [0, 0]).unwrap();
        let mut gjk = Gjk::new(128, 1.0e-6);
        assert_eq!(gjk.evaluate(&mut md, &Vector::x()), GjkStatus::Collision);

        let mut epa = Epa::new(64, 1.0e-6);
        let status = epa.evaluate(&mut md, gjk.simplex());

        assert!(matches!(
            status,
            EpaStatus::Valid | EpaStatus::AccuracyReached
        ));
        assert_relative_eq!(epa.depth(), 0.5, epsilon = 1.0e-4);
        assert_relative_eq!(epa.normal().x.abs(), 1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn overlapping_cuboids_depth() {
        let c = Shape::cuboid(2.0, 1.0, 1.0);
        let pos12 = Isometry::translation(3.5, 0.0, 0.0);

        let mut md = MinkowskiDiff::new(c.kind(), c.kind(), pos12, [0, 0]).unwrap();
        let mut gjk = Gjk::new(128, 1.0e-6);
        assert_eq!(gjk.evaluate(&mut md, &Vector::x()), GjkStatus::Collision);

        let mut epa = Epa::new(64, 1.0e-6);
        let status = epa.evaluate(&mut md, gjk.simplex());

        assert!(matches!(
            status,
            EpaStatus::Valid | EpaStatus::AccuracyReached
        ));
        assert_relative_eq!(epa.depth(), 0.5, epsilon = 1.0e-4);
        // Shape 2 overlaps from the `+x` side, so shape 1 separates along `-x`.
        assert_relative_eq!(epa.normal().x, -1.0, epsilon = 1.0e-4);
    }
}
