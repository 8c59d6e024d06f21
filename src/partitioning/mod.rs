//! Spatial partitioning structures over triangle meshes.

pub use self::bvh::{BvhNode, TriMeshBvh, BVH_ROOT};

mod bvh;
