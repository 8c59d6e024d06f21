use crate::math::{Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::shape::{Segment, SupportMap};
use crate::utils;

/// A triangle shape.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point<Real>,
    /// The triangle second point.
    pub b: Point<Real>,
    /// The triangle third point.
    pub c: Point<Real>,
}

/// Description of the location of a point on a triangle.
#[derive(Copy, Clone, Debug)]
pub enum TrianglePointLocation {
    /// The point lies on a vertex.
    OnVertex(u32),
    /// The point lies on an edge.
    ///
    /// The edge index is the index of the vertex opposite to it: edge 0 is
    /// `ab`, edge 1 is `bc`, edge 2 is `ca`.
    OnEdge(u32, [Real; 2]),
    /// The point lies on the triangle interior.
    OnFace([Real; 3]),
}

impl TrianglePointLocation {
    /// The barycentric coordinates corresponding to this point location.
    pub fn barycentric_coordinates(&self) -> [Real; 3] {
        let mut bcoords = [0.0; 3];

        match self {
            TrianglePointLocation::OnVertex(i) => bcoords[*i as usize] = 1.0,
            TrianglePointLocation::OnEdge(i, uv) => {
                let (i1, i2) = match i {
                    0 => (0, 1),
                    1 => (1, 2),
                    _ => (0, 2),
                };

                bcoords[i1] = uv[0];
                bcoords[i2] = uv[1];
            }
            TrianglePointLocation::OnFace(uvw) => bcoords = *uvw,
        }

        bcoords
    }
}

impl Triangle {
    /// Creates a new triangle from three points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// The three vertices of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 3] {
        [self.a, self.b, self.c]
    }

    /// The three edges of this triangle: `ab`, `bc`, `ca`.
    #[inline]
    pub fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.a, self.b),
            Segment::new(self.b, self.c),
            Segment::new(self.c, self.a),
        ]
    }

    /// A vector normal to this triangle, scaled by twice its area.
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        ab.cross(&ac)
    }

    /// The unit normal of this triangle, if it is not degenerate.
    #[inline]
    pub fn normal(&self) -> Option<UnitVector<Real>> {
        utils::ccw_face_normal([&self.a, &self.b, &self.c])
    }

    /// Tests whether this triangle is affinely dependent, i.e., its points are almost aligned.
    #[inline]
    pub fn is_affinely_dependent(&self) -> bool {
        let p1p2 = self.b - self.a;
        let p1p3 = self.c - self.a;
        relative_eq!(
            p1p2.cross(&p1p3).norm_squared(),
            0.0,
            epsilon = DEFAULT_EPSILON * 100.0
        )
    }
}

impl SupportMap for Triangle {
    // Ties go to the lowest vertex index, keeping repeated queries
    // deterministic.
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let vtx = self.vertices();
        let mut best = 0;
        let mut best_proj = vtx[0].coords.dot(dir);

        for (i, p) in vtx.iter().enumerate().skip(1) {
            let proj = p.coords.dot(dir);

            if proj > best_proj {
                best = i;
                best_proj = proj;
            }
        }

        vtx[best]
    }
}
