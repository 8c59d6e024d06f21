use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::{
    Ball, Capsule, Cone, ConvexPolyhedron, Cuboid, Cylinder, Ellipsoid, HalfSpace, Plane,
    SupportMap, Triangle,
};

/// The closed set of geometric shapes handled by the solvers.
///
/// Shape-pair dispatch is done by matching on pairs of variants; the
/// iterative solvers only ever see the variants through their support
/// functions.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    /// A ball.
    Ball(Ball),
    /// A box.
    Cuboid(Cuboid),
    /// A capsule.
    Capsule(Capsule),
    /// A cone.
    Cone(Cone),
    /// A cylinder.
    Cylinder(Cylinder),
    /// An ellipsoid.
    Ellipsoid(Ellipsoid),
    /// A half-space.
    HalfSpace(HalfSpace),
    /// An infinite plane.
    Plane(Plane),
    /// A triangle.
    Triangle(Triangle),
    /// A convex polyhedron.
    ConvexPolyhedron(ConvexPolyhedron),
}

impl ShapeKind {
    /// A view of this shape as a support map, if it is bounded.
    ///
    /// Half-spaces and planes are unbounded so their support function does
    /// not exist; pairs involving them are solved analytically.
    pub fn as_support_map(&self) -> Option<&dyn SupportMap> {
        match self {
            ShapeKind::Ball(s) => Some(s),
            ShapeKind::Cuboid(s) => Some(s),
            ShapeKind::Capsule(s) => Some(s),
            ShapeKind::Cone(s) => Some(s),
            ShapeKind::Cylinder(s) => Some(s),
            ShapeKind::Ellipsoid(s) => Some(s),
            ShapeKind::Triangle(s) => Some(s),
            ShapeKind::ConvexPolyhedron(s) => Some(s),
            ShapeKind::HalfSpace(_) | ShapeKind::Plane(_) => None,
        }
    }

    /// The local-space bounding box of this shape, if it is bounded.
    pub fn compute_local_aabb(&self) -> Option<Aabb> {
        match self {
            ShapeKind::Ball(s) => Some(Aabb::from_half_extents(
                Point::origin(),
                Vector::repeat(s.radius),
            )),
            ShapeKind::Cuboid(s) => Some(Aabb::from_half_extents(Point::origin(), s.half_extents)),
            ShapeKind::Capsule(s) => {
                let mut aabb = Aabb::from_points([&s.segment.a, &s.segment.b]);
                aabb.mins -= Vector::repeat(s.radius);
                aabb.maxs += Vector::repeat(s.radius);
                Some(aabb)
            }
            ShapeKind::Cone(s) => Some(Aabb::from_half_extents(
                Point::origin(),
                Vector::new(s.radius, s.half_height, s.radius),
            )),
            ShapeKind::Cylinder(s) => Some(Aabb::from_half_extents(
                Point::origin(),
                Vector::new(s.radius, s.half_height, s.radius),
            )),
            ShapeKind::Ellipsoid(s) => Some(Aabb::from_half_extents(Point::origin(), s.radii)),
            ShapeKind::Triangle(s) => Some(Aabb::from_points([&s.a, &s.b, &s.c])),
            ShapeKind::ConvexPolyhedron(s) => Some(Aabb::from_points(s.points())),
            ShapeKind::HalfSpace(_) | ShapeKind::Plane(_) => None,
        }
    }
}

/// A shape together with its swept-sphere radius.
///
/// The swept-sphere radius inflates the shape by a ball of that radius
/// (a Minkowski sum). The iterative solvers run on the deflated core; the
/// radius is added to the converged distance and the witness points are
/// offset along the contact normal afterwards.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    kind: ShapeKind,
    swept_sphere_radius: Real,
}

impl Shape {
    /// Wraps a shape with a zero swept-sphere radius.
    pub fn new(kind: ShapeKind) -> Self {
        Shape {
            kind,
            swept_sphere_radius: 0.0,
        }
    }

    /// Sets the swept-sphere radius of this shape.
    ///
    /// Panics if `radius` is negative.
    pub fn with_swept_sphere_radius(mut self, radius: Real) -> Self {
        assert!(
            radius >= 0.0,
            "the swept-sphere radius must be non-negative"
        );
        self.swept_sphere_radius = radius;
        self
    }

    /// The shape variant.
    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// The swept-sphere radius of this shape.
    #[inline]
    pub fn swept_sphere_radius(&self) -> Real {
        self.swept_sphere_radius
    }

    /// Shorthand for a ball shape.
    pub fn ball(radius: Real) -> Self {
        Self::new(ShapeKind::Ball(Ball::new(radius)))
    }

    /// Shorthand for a cuboid shape.
    pub fn cuboid(hx: Real, hy: Real, hz: Real) -> Self {
        Self::new(ShapeKind::Cuboid(Cuboid::new(Vector::new(hx, hy, hz))))
    }

    /// Shorthand for a capsule shape.
    pub fn capsule(a: Point<Real>, b: Point<Real>, radius: Real) -> Self {
        Self::new(ShapeKind::Capsule(Capsule::new(a, b, radius)))
    }

    /// Shorthand for a cone shape.
    pub fn cone(half_height: Real, radius: Real) -> Self {
        Self::new(ShapeKind::Cone(Cone::new(half_height, radius)))
    }

    /// Shorthand for a cylinder shape.
    pub fn cylinder(half_height: Real, radius: Real) -> Self {
        Self::new(ShapeKind::Cylinder(Cylinder::new(half_height, radius)))
    }

    /// Shorthand for an ellipsoid shape.
    pub fn ellipsoid(radii: Vector<Real>) -> Self {
        Self::new(ShapeKind::Ellipsoid(Ellipsoid::new(radii)))
    }

    /// Shorthand for a half-space.
    pub fn half_space(normal: UnitVector<Real>, d: Real) -> Self {
        Self::new(ShapeKind::HalfSpace(HalfSpace::new(normal, d)))
    }

    /// Shorthand for a plane.
    pub fn plane(normal: UnitVector<Real>, d: Real) -> Self {
        Self::new(ShapeKind::Plane(Plane::new(normal, d)))
    }

    /// Shorthand for a triangle shape.
    pub fn triangle(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Self {
        Self::new(ShapeKind::Triangle(Triangle::new(a, b, c)))
    }

    /// Shorthand for a convex polyhedron.
    pub fn convex_polyhedron(poly: ConvexPolyhedron) -> Self {
        Self::new(ShapeKind::ConvexPolyhedron(poly))
    }
}

impl From<ShapeKind> for Shape {
    fn from(kind: ShapeKind) -> Self {
        Shape::new(kind)
    }
}
