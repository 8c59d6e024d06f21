//! Shapes supported by prox3d.

pub use self::ball::Ball;
pub use self::capsule::Capsule;
pub use self::cone::Cone;
pub use self::convex_polyhedron::ConvexPolyhedron;
pub use self::cuboid::Cuboid;
pub use self::cylinder::Cylinder;
pub use self::ellipsoid::Ellipsoid;
pub use self::half_space::{HalfSpace, Plane};
pub use self::segment::{Segment, SegmentPointLocation};
pub use self::shape::{Shape, ShapeKind};
pub use self::support_map::SupportMap;
pub use self::triangle::{Triangle, TrianglePointLocation};

mod ball;
mod capsule;
mod cone;
mod convex_polyhedron;
mod cuboid;
mod cylinder;
mod ellipsoid;
mod half_space;
mod segment;
mod shape;
mod support_map;
mod triangle;
