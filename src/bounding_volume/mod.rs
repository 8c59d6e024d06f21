//! Bounding volumes: axis-aligned bounding boxes and oriented bounding boxes.

pub use self::aabb::Aabb;
pub use self::obb::Obb;

mod aabb;
mod obb;
