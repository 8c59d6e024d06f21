//! Point projection on shapes, with the location of the projection on the
//! shape's features. This is internal machinery for the Voronoï simplex,
//! EPA face construction, and the analytic ball-vs-shape solvers.

pub use self::point_query::{PointProjection, PointQuery, PointQueryWithLocation};

mod point_aabb;
mod point_capsule;
mod point_cuboid;
mod point_cylinder;
mod point_query;
mod point_segment;
mod point_triangle;
