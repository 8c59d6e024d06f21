//! A binary bounding-volume tree over triangles.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shape::Triangle;

/// A node of a [`TriMeshBvh`].
#[derive(Copy, Clone, Debug)]
pub struct BvhNode {
    /// The bounding volume of the subtree rooted at this node, in the mesh's
    /// local frame.
    pub bv: Aabb,
    left: i32,
    right: i32,
    primitive: i32,
}

impl BvhNode {
    /// Whether this node is a leaf referencing a single triangle.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.primitive >= 0
    }

    /// The triangle index referenced by this leaf.
    ///
    /// Panics if this node is not a leaf.
    #[inline]
    pub fn primitive_id(&self) -> u32 {
        assert!(self.is_leaf(), "internal nodes reference no primitive");
        self.primitive as u32
    }

    /// The index of the left child of this internal node.
    #[inline]
    pub fn left_child(&self) -> u32 {
        self.left as u32
    }

    /// The index of the right child of this internal node.
    #[inline]
    pub fn right_child(&self) -> u32 {
        self.right as u32
    }
}

/// A triangle mesh with a binary bounding-volume hierarchy.
///
/// The collision and distance traversals only consume the node interface
/// (`is_leaf`, `left_child`, `right_child`, `primitive_id` and the node
/// bounding volume); the tree itself is built once by a longest-axis median
/// split over the triangle centroids.
#[derive(Clone, Debug)]
pub struct TriMeshBvh {
    vertices: Vec<Point<Real>>,
    indices: Vec<[u32; 3]>,
    nodes: Vec<BvhNode>,
}

/// Index of the root node of a [`TriMeshBvh`].
pub const BVH_ROOT: u32 = 0;

impl TriMeshBvh {
    /// Builds the tree of the given triangle soup.
    ///
    /// Returns `None` if the mesh is empty or an index is out of bounds.
    pub fn new(vertices: Vec<Point<Real>>, indices: Vec<[u32; 3]>) -> Option<Self> {
        if indices.is_empty()
            || indices
                .iter()
                .flatten()
                .any(|i| *i as usize >= vertices.len())
        {
            return None;
        }

        let aabbs: Vec<Aabb> = indices
            .iter()
            .map(|idx| {
                Aabb::from_points([
                    &vertices[idx[0] as usize],
                    &vertices[idx[1] as usize],
                    &vertices[idx[2] as usize],
                ])
            })
            .collect();

        let mut prims: Vec<u32> = (0..indices.len() as u32).collect();
        let mut nodes = Vec::with_capacity(indices.len() * 2);
        let _ = build_node(&aabbs, &mut prims, &mut nodes);

        Some(TriMeshBvh {
            vertices,
            indices,
            nodes,
        })
    }

    /// The vertex buffer of this mesh.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The triangle index buffer of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The number of triangles of this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// The node at the given index; the root is [`BVH_ROOT`].
    #[inline]
    pub fn node(&self, id: u32) -> &BvhNode {
        &self.nodes[id as usize]
    }

    /// The triangle with the given index, in the mesh's local frame.
    #[inline]
    pub fn triangle(&self, id: u32) -> Triangle {
        let idx = self.indices[id as usize];
        Triangle::new(
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        )
    }
}

fn build_node(aabbs: &[Aabb], prims: &mut [u32], nodes: &mut Vec<BvhNode>) -> u32 {
    let mut bv = Aabb::new_invalid();
    for p in prims.iter() {
        bv = bv.merged(&aabbs[*p as usize]);
    }

    let id = nodes.len() as u32;

    if let [prim] = prims {
        nodes.push(BvhNode {
            bv,
            left: -1,
            right: -1,
            primitive: *prim as i32,
        });
        return id;
    }

    // Median split along the longest axis of the centroid spread.
    let mut centroid_bv = Aabb::new_invalid();
    for p in prims.iter() {
        centroid_bv.take_point(aabbs[*p as usize].center());
    }

    let extents = centroid_bv.extents();
    let axis = if extents.x >= extents.y && extents.x >= extents.z {
        0
    } else if extents.y >= extents.z {
        1
    } else {
        2
    };

    prims.sort_unstable_by(|a, b| {
        let ca = aabbs[*a as usize].center()[axis];
        let cb = aabbs[*b as usize].center()[axis];
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = prims.len() / 2;

    nodes.push(BvhNode {
        bv,
        left: -1,
        right: -1,
        primitive: -1,
    });

    let (left_prims, right_prims) = prims.split_at_mut(mid);
    let left = build_node(aabbs, left_prims, nodes) as i32;
    let right = build_node(aabbs, right_prims, nodes) as i32;

    nodes[id as usize].left = left;
    nodes[id as usize].right = right;

    id
}

#[cfg(test)]
mod test {
    use super::{TriMeshBvh, BVH_ROOT};
    use crate::math::Point;

    fn quad_mesh() -> TriMeshBvh {
        // Two triangles forming the unit square of the xy plane.
        let vertices = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        let indices = vec![[0, 1, 2], [0, 2, 3]];
        TriMeshBvh::new(vertices, indices).unwrap()
    }

    #[test]
    fn leaves_cover_all_triangles() {
        let mesh = quad_mesh();
        let root = mesh.node(BVH_ROOT);
        assert!(!root.is_leaf());

        let mut prims = vec![
            mesh.node(root.left_child()).primitive_id(),
            mesh.node(root.right_child()).primitive_id(),
        ];
        prims.sort_unstable();
        assert_eq!(prims, [0, 1]);
    }

    #[test]
    fn root_bounds_the_mesh() {
        let mesh = quad_mesh();
        let bv = mesh.node(BVH_ROOT).bv;
        assert_eq!(bv.mins, Point::new(0.0, 0.0, 0.0));
        assert_eq!(bv.maxs, Point::new(1.0, 1.0, 0.0));
    }
}
