use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::SupportMap;
use crate::utils;

/// A convex polyhedron defined by its vertices, triangulated faces and
/// per-vertex neighbour lists.
///
/// The vertex adjacency enables hinted support queries: starting from the
/// vertex returned by a previous query, the search hill-climbs to a
/// neighbour with a higher projection until a local maximum is reached. On
/// a convex polytope a local maximum is also the global one, so successive
/// queries with nearby directions terminate in a handful of steps.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConvexPolyhedron {
    points: Vec<Point<Real>>,
    faces: Vec<[u32; 3]>,
    face_normals: Vec<UnitVector<Real>>,
    // Flattened per-vertex adjacency: vertex `i` neighbours
    // `neighbors[ranges[i].0 .. ranges[i].0 + ranges[i].1]`.
    neighbors: Vec<u32>,
    ranges: Vec<(u32, u32)>,
}

impl ConvexPolyhedron {
    /// Builds a convex polyhedron from its vertices and triangulated faces.
    ///
    /// Faces must be oriented counter-clockwise seen from the outside. The
    /// vertex set is assumed to be convex and in general position; this
    /// constructor derives the face normals and the neighbour lists but does
    /// not run a convex-hull computation. Returns `None` if a face is
    /// degenerate or references an out-of-bounds vertex.
    pub fn from_convex_mesh(points: Vec<Point<Real>>, faces: Vec<[u32; 3]>) -> Option<Self> {
        let n = points.len();

        if n == 0 || faces.is_empty() {
            return None;
        }

        let mut face_normals = Vec::with_capacity(faces.len());
        let mut adj = vec![Vec::new(); n];

        for face in &faces {
            let [ia, ib, ic] = *face;

            if ia as usize >= n || ib as usize >= n || ic as usize >= n {
                return None;
            }

            let normal = utils::ccw_face_normal([
                &points[ia as usize],
                &points[ib as usize],
                &points[ic as usize],
            ])?;
            face_normals.push(normal);

            for (v, w) in [(ia, ib), (ib, ic), (ic, ia)] {
                if !adj[v as usize].contains(&w) {
                    adj[v as usize].push(w);
                }
                if !adj[w as usize].contains(&v) {
                    adj[w as usize].push(v);
                }
            }
        }

        let mut neighbors = Vec::new();
        let mut ranges = Vec::with_capacity(n);

        for nbrs in &mut adj {
            nbrs.sort_unstable();
            ranges.push((neighbors.len() as u32, nbrs.len() as u32));
            neighbors.extend_from_slice(nbrs);
        }

        Some(ConvexPolyhedron {
            points,
            faces,
            face_normals,
            neighbors,
            ranges,
        })
    }

    /// The vertices of this polyhedron.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The triangulated faces of this polyhedron.
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// The outward unit normals of the faces of this polyhedron.
    #[inline]
    pub fn face_normals(&self) -> &[UnitVector<Real>] {
        &self.face_normals
    }

    /// The indices of the vertices adjacent to the vertex `i`.
    #[inline]
    pub fn vertex_neighbors(&self, i: u32) -> &[u32] {
        let (start, len) = self.ranges[i as usize];
        &self.neighbors[start as usize..(start + len) as usize]
    }

    /// Index of the support point, hill-climbing from the vertex `hint`.
    ///
    /// `hint` is clamped to the vertex range, so a stale hint from another
    /// polyhedron degrades to a cold start instead of an out-of-bounds
    /// access. Ties are broken toward the lowest vertex index.
    pub fn support_point_id_with_hint(&self, dir: &Vector<Real>, hint: u32) -> u32 {
        let n = self.points.len() as u32;
        let mut best = hint.min(n - 1);
        let mut best_dot = self.points[best as usize].coords.dot(dir);

        // Bounded by the vertex count: each step strictly increases the
        // projection, so no vertex is visited twice.
        for _ in 0..n {
            let mut improved = false;

            for &nbr in self.vertex_neighbors(best) {
                let dot = self.points[nbr as usize].coords.dot(dir);

                if dot > best_dot || (dot == best_dot && nbr < best) {
                    best = nbr;
                    best_dot = dot;
                    improved = true;
                }
            }

            if !improved {
                return best;
            }
        }

        // The walk failed to settle (near-degenerate adjacency); fall back
        // to the exhaustive scan.
        utils::point_cloud_support_point_id(dir, &self.points) as u32
    }
}

impl SupportMap for ConvexPolyhedron {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        utils::point_cloud_support_point(dir, &self.points)
    }
}

#[cfg(test)]
mod test {
    use super::ConvexPolyhedron;
    use crate::math::{Point, Vector};

    fn tetra() -> ConvexPolyhedron {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        ConvexPolyhedron::from_convex_mesh(points, faces).unwrap()
    }

    #[test]
    fn hinted_walk_agrees_with_scan() {
        let poly = tetra();
        let dirs = [
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(-1.0, -1.0, -1.0),
            Vector::new(0.3, 0.9, -0.1),
            Vector::new(0.0, 0.0, 1.0),
        ];

        for dir in &dirs {
            let scanned = crate::utils::point_cloud_support_point_id(dir, poly.points()) as u32;
            for hint in 0..4 {
                assert_eq!(poly.support_point_id_with_hint(dir, hint), scanned);
            }
        }
    }
}
