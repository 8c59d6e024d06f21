use crate::math::{Isometry, Point, Real, Vector};
use crate::query::QueryError;
use crate::shape::{ShapeKind, SupportMap};
use na::Unit;
use std::ops::Sub;

/// A point of a Configuration-Space Obstacle.
///
/// A Configuration-Space Obstacle (CSO) is the result of the Minkowski
/// Difference of two solids. Each of its points corresponds to the
/// difference of two points, each belonging to a different solid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CSOPoint {
    /// The point on the CSO, equal to `self.orig1 - self.orig2`.
    pub point: Point<Real>,
    /// The original point on the first shape used to compute `self.point`.
    pub orig1: Point<Real>,
    /// The original point on the second shape used to compute `self.point`.
    pub orig2: Point<Real>,
}

impl CSOPoint {
    /// Initializes a CSO point with `orig1 - orig2`.
    pub fn new(orig1: Point<Real>, orig2: Point<Real>) -> Self {
        let point = Point::from(orig1 - orig2);
        CSOPoint {
            point,
            orig1,
            orig2,
        }
    }

    /// CSO point where all components are set to zero.
    pub fn origin() -> Self {
        CSOPoint::new(Point::origin(), Point::origin())
    }
}

impl Sub<CSOPoint> for CSOPoint {
    type Output = Vector<Real>;

    #[inline]
    fn sub(self, rhs: CSOPoint) -> Vector<Real> {
        self.point - rhs.point
    }
}

/// The Minkowski difference of two shapes, seen through their support
/// functions.
///
/// This is the ephemeral adapter consumed by GJK and EPA: it owns the
/// relative pose of the second shape in the first shape's frame and the
/// neighbour-walk hints accelerating successive convex-polyhedron support
/// queries. All support points are expressed in the first shape's frame.
///
/// The swept-sphere radii of the shapes are deliberately *not* part of this
/// adapter: the iterative solvers work on the shape cores and the radii are
/// applied as a final correction by the shape-pair solver.
pub struct MinkowskiDiff<'a> {
    shape1: &'a ShapeKind,
    shape2: &'a ShapeKind,
    pos12: Isometry<Real>,
    hints: [u32; 2],
}

impl<'a> MinkowskiDiff<'a> {
    /// Creates the Minkowski difference of two support-mapped shapes.
    ///
    /// `pos12` is the pose of `shape2` expressed in `shape1`'s frame.
    /// Errors with [`QueryError::Unsupported`] if either shape has no
    /// support function (half-space, plane).
    pub fn new(
        shape1: &'a ShapeKind,
        shape2: &'a ShapeKind,
        pos12: Isometry<Real>,
        hints: [u32; 2],
    ) -> Result<Self, QueryError> {
        if shape1.as_support_map().is_none() || shape2.as_support_map().is_none() {
            return Err(QueryError::Unsupported);
        }

        Ok(MinkowskiDiff {
            shape1,
            shape2,
            pos12,
            hints,
        })
    }

    /// The current support-function hints, to be cached by the caller for
    /// warm-starting the next query on the same pair.
    #[inline]
    pub fn hints(&self) -> [u32; 2] {
        self.hints
    }

    /// The pose of the second shape in the first shape's frame.
    #[inline]
    pub fn pos12(&self) -> &Isometry<Real> {
        &self.pos12
    }

    fn support1(&mut self, dir: &Vector<Real>) -> Point<Real> {
        match self.shape1 {
            ShapeKind::ConvexPolyhedron(p) => {
                let id = p.support_point_id_with_hint(dir, self.hints[0]);
                self.hints[0] = id;
                p.points()[id as usize]
            }
            // `new` checked that the shape is support-mapped.
            other => other.as_support_map().unwrap().local_support_point(dir),
        }
    }

    fn support2(&mut self, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = self.pos12.inverse_transform_vector(dir);

        let local_pt = match self.shape2 {
            ShapeKind::ConvexPolyhedron(p) => {
                let id = p.support_point_id_with_hint(&local_dir, self.hints[1]);
                self.hints[1] = id;
                p.points()[id as usize]
            }
            other => other
                .as_support_map()
                .unwrap()
                .local_support_point(&local_dir),
        };

        self.pos12 * local_pt
    }

    /// The support point of the CSO toward the direction `dir`, in the first
    /// shape's frame.
    pub fn support(&mut self, dir: &Vector<Real>) -> CSOPoint {
        let sp1 = self.support1(dir);
        let sp2 = self.support2(&-*dir);

        CSOPoint::new(sp1, sp2)
    }

    /// Same as [`MinkowskiDiff::support`] with a normalized direction.
    #[inline]
    pub fn support_toward(&mut self, dir: &Unit<Vector<Real>>) -> CSOPoint {
        self.support(dir)
    }
}
