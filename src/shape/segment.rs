use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A segment shape.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    /// The segment first point.
    pub a: Point<Real>,
    /// The segment second point.
    pub b: Point<Real>,
}

/// Logical description of the location of a point on a segment.
#[derive(Copy, Clone, Debug)]
pub enum SegmentPointLocation {
    /// The point lies on the vertex with the given index.
    OnVertex(u32),
    /// The point lies on the segment interior, with the given barycentric coordinates.
    OnEdge([Real; 2]),
}

impl SegmentPointLocation {
    /// The barycentric coordinates corresponding to this point location.
    pub fn barycentric_coordinates(&self) -> [Real; 2] {
        let mut bcoords = [0.0; 2];

        match self {
            SegmentPointLocation::OnVertex(i) => bcoords[*i as usize] = 1.0,
            SegmentPointLocation::OnEdge(uv) => {
                bcoords[0] = uv[0];
                bcoords[1] = uv[1];
            }
        }

        bcoords
    }
}

impl Segment {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>) -> Segment {
        Segment { a, b }
    }

    /// The direction of this segment scaled by its length.
    #[inline]
    pub fn scaled_direction(&self) -> Vector<Real> {
        self.b - self.a
    }

    /// The point at the given location on this segment.
    #[inline]
    pub fn point_at(&self, location: &SegmentPointLocation) -> Point<Real> {
        match location {
            SegmentPointLocation::OnVertex(0) => self.a,
            SegmentPointLocation::OnVertex(_) => self.b,
            SegmentPointLocation::OnEdge(uv) => self.a + self.scaled_direction() * uv[1],
        }
    }
}

impl SupportMap for Segment {
    // The winning endpoint only depends on the sign of the edge direction
    // projected on `dir`.
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        if self.scaled_direction().dot(dir) >= 0.0 {
            self.b
        } else {
            self.a
        }
    }
}
