//! A sparse occupancy octree.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};

/// Index of the root node of an [`OcTree`].
pub const OCTREE_ROOT: u32 = 0;

const NO_CHILD: u32 = u32::MAX;

/// A node of an [`OcTree`].
///
/// Nodes carry an occupancy probability in `[0, 1]`; the occupancy of an
/// internal node is the maximum over its children, so pruning a subtree on
/// its root's occupancy never loses an occupied leaf.
#[derive(Copy, Clone, Debug)]
pub struct OcTreeNode {
    occupancy: Real,
    children: [u32; 8],
}

impl OcTreeNode {
    fn new(occupancy: Real) -> Self {
        OcTreeNode {
            occupancy,
            children: [NO_CHILD; 8],
        }
    }

    /// The occupancy probability of this node.
    #[inline]
    pub fn occupancy(&self) -> Real {
        self.occupancy
    }

    /// The index of the `i`-th child, if it exists.
    #[inline]
    pub fn child(&self, i: usize) -> Option<u32> {
        if self.children[i] == NO_CHILD {
            None
        } else {
            Some(self.children[i])
        }
    }

    /// Whether this node has at least one child.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.children.iter().any(|c| *c != NO_CHILD)
    }
}

/// A sparse eight-way tree over a cubic volume of side `2^depth *
/// resolution` centered at the origin of the octree's local frame.
///
/// Nodes live in an arena and are addressed by `u32` indices; the index of
/// a leaf is the primitive identifier reported in contacts involving the
/// tree. The octant→axis assignment is fixed: the `k`-th axis of child `i`
/// covers the lower half of the parent iff `(i >> k) & 1 == 0` (see
/// [`Aabb::octant`]).
#[derive(Clone, Debug)]
pub struct OcTree {
    nodes: Vec<OcTreeNode>,
    depth: u32,
    resolution: Real,
    default_occupancy: Real,
    occupancy_threshold: Real,
    free_threshold: Real,
}

impl OcTree {
    /// Creates an empty octree of the given depth and leaf resolution.
    ///
    /// A depth of zero makes the root itself the single cell of the tree.
    pub fn new(depth: u32, resolution: Real) -> Self {
        assert!(depth <= 16, "octree depth is bounded by 16");

        OcTree {
            nodes: vec![OcTreeNode::new(0.0)],
            depth,
            resolution,
            default_occupancy: 0.7,
            occupancy_threshold: 0.5,
            free_threshold: 0.0,
        }
    }

    /// The depth of this octree.
    #[inline]
    pub fn tree_depth(&self) -> u32 {
        self.depth
    }

    /// The side length of a leaf cell.
    #[inline]
    pub fn resolution(&self) -> Real {
        self.resolution
    }

    /// The number of nodes of this octree.
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// The node at the given arena index.
    #[inline]
    pub fn node(&self, id: u32) -> &OcTreeNode {
        &self.nodes[id as usize]
    }

    /// The bounding volume of the root, in the octree's local frame.
    pub fn root_bv(&self) -> Aabb {
        let delta = (1u64 << self.depth) as Real * self.resolution / 2.0;
        Aabb::new(
            Point::new(-delta, -delta, -delta),
            Point::new(delta, delta, delta),
        )
    }

    /// The occupancy written by [`OcTree::insert_point`].
    #[inline]
    pub fn default_occupancy(&self) -> Real {
        self.default_occupancy
    }

    /// Sets the occupancy written by [`OcTree::insert_point`].
    pub fn set_default_occupancy(&mut self, occupancy: Real) {
        self.default_occupancy = occupancy;
    }

    /// The threshold above which a node counts as occupied.
    #[inline]
    pub fn occupancy_threshold(&self) -> Real {
        self.occupancy_threshold
    }

    /// Sets the occupancy threshold.
    pub fn set_occupancy_threshold(&mut self, threshold: Real) {
        self.occupancy_threshold = threshold;
    }

    /// The threshold below which a node counts as free.
    #[inline]
    pub fn free_threshold(&self) -> Real {
        self.free_threshold
    }

    /// Sets the free threshold.
    pub fn set_free_threshold(&mut self, threshold: Real) {
        self.free_threshold = threshold;
    }

    /// Whether the node counts as occupied.
    #[inline]
    pub fn is_node_occupied(&self, node: &OcTreeNode) -> bool {
        node.occupancy >= self.occupancy_threshold
    }

    /// Whether the node counts as free.
    #[inline]
    pub fn is_node_free(&self, node: &OcTreeNode) -> bool {
        node.occupancy <= self.free_threshold
    }

    /// Whether the node is neither occupied nor free.
    #[inline]
    pub fn is_node_uncertain(&self, node: &OcTreeNode) -> bool {
        !self.is_node_occupied(node) && !self.is_node_free(node)
    }

    /// Marks the leaf cell containing `point` with the default occupancy.
    ///
    /// Points outside the root volume are ignored.
    pub fn insert_point(&mut self, point: &Point<Real>) {
        self.insert_point_with_occupancy(point, self.default_occupancy)
    }

    /// Marks the leaf cell containing `point` with the given occupancy.
    ///
    /// Intermediate nodes are created on demand; occupancies propagate
    /// upward by maximum. Points outside the root volume are ignored.
    pub fn insert_point_with_occupancy(&mut self, point: &Point<Real>, occupancy: Real) {
        let mut bv = self.root_bv();

        if !bv.contains_local_point(point) {
            return;
        }

        let mut path = [OCTREE_ROOT; 17];
        let mut len = 1;
        let mut current = OCTREE_ROOT;

        for _ in 0..self.depth {
            let center = bv.center();
            let mut octant = 0;

            for k in 0..3 {
                if point[k] >= center[k] {
                    octant |= 1 << k;
                }
            }

            bv = bv.octant(octant);

            current = match self.nodes[current as usize].child(octant) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len() as u32;
                    self.nodes.push(OcTreeNode::new(0.0));
                    self.nodes[current as usize].children[octant] = child;
                    child
                }
            };

            path[len] = current;
            len += 1;
        }

        self.nodes[current as usize].occupancy = occupancy;

        // Max-propagation toward the root.
        for id in path[..len].iter().rev().skip(1) {
            let max_child = self.nodes[*id as usize]
                .children
                .iter()
                .filter(|c| **c != NO_CHILD)
                .map(|c| self.nodes[*c as usize].occupancy)
                .fold(0.0 as Real, Real::max);

            self.nodes[*id as usize].occupancy = max_child;
        }
    }

    /// The occupied leaf cells as `(center, side length, occupancy)`
    /// triples, in the octree's local frame.
    pub fn to_boxes(&self) -> Vec<(Point<Real>, Real, Real)> {
        let mut boxes = Vec::new();
        self.collect_boxes(OCTREE_ROOT, self.root_bv(), &mut boxes);
        boxes
    }

    fn collect_boxes(&self, id: u32, bv: Aabb, out: &mut Vec<(Point<Real>, Real, Real)>) {
        let node = &self.nodes[id as usize];

        if node.has_children() {
            for i in 0..8 {
                if let Some(child) = node.child(i) {
                    self.collect_boxes(child, bv.octant(i), out);
                }
            }
        } else if self.is_node_occupied(node) {
            out.push((bv.center(), bv.extents().x, node.occupancy));
        }
    }

    /// The bounding box of the occupied cells, in the octree's local frame;
    /// `None` for a tree with no occupied cell.
    pub fn compute_local_aabb(&self) -> Option<Aabb> {
        let boxes = self.to_boxes();

        if boxes.is_empty() {
            return None;
        }

        let mut aabb = Aabb::new_invalid();

        for (center, size, _) in boxes {
            let half = Vector::repeat(size / 2.0);
            aabb = aabb.merged(&Aabb::new(center - half, center + half));
        }

        Some(aabb)
    }
}

#[cfg(test)]
mod test {
    use super::{OcTree, OCTREE_ROOT};
    use crate::math::Point;

    #[test]
    fn single_cell_tree() {
        let mut tree = OcTree::new(0, 1.0);
        tree.insert_point(&Point::origin());

        assert_eq!(tree.size(), 1);
        assert!(tree.is_node_occupied(tree.node(OCTREE_ROOT)));

        let bv = tree.root_bv();
        assert_eq!(bv.mins, Point::new(-0.5, -0.5, -0.5));
        assert_eq!(bv.maxs, Point::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn insertion_creates_octants() {
        let mut tree = OcTree::new(1, 1.0);
        tree.insert_point(&Point::new(-0.5, -0.5, -0.5));

        let root = tree.node(OCTREE_ROOT);
        assert!(root.has_children());
        assert!(root.child(0).is_some());
        assert!(root.child(7).is_none());

        // Max-propagation makes the root occupied too.
        assert!(tree.is_node_occupied(root));

        let boxes = tree.to_boxes();
        assert_eq!(boxes.len(), 1);
        assert_relative_eq!(boxes[0].0, Point::new(-0.5, -0.5, -0.5));
        assert_relative_eq!(boxes[0].1, 1.0);
    }

    #[test]
    fn uncertain_cells_are_not_exported() {
        let mut tree = OcTree::new(1, 1.0);
        tree.insert_point_with_occupancy(&Point::new(0.5, 0.5, 0.5), 0.3);

        assert!(tree.is_node_uncertain(tree.node(OCTREE_ROOT)));
        assert!(tree.to_boxes().is_empty());
    }
}
