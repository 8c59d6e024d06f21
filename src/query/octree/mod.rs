//! Recursive traversals pairing an octree with another octree, a triangle
//! mesh, or a plain shape, for both collision and distance queries.
//!
//! The traversals prune with bounding-volume tests (oriented boxes for
//! collision, axis-aligned distance bounds for distance queries) and hand
//! occupied leaf cells to the shape-pair solver as axis-aligned boxes.

use crate::bounding_volume::{Aabb, Obb};
use crate::math::{Isometry, Point, Real, Translation, Vector};
use crate::octree::{OcTree, OCTREE_ROOT};
use crate::partitioning::{TriMeshBvh, BVH_ROOT};
use crate::query::request::{
    CollisionRequest, CollisionResult, Contact, DistanceRequest, DistanceResult,
    CONTACT_PRIMITIVE_NONE,
};
use crate::query::solver::{make_contact, ShapeContact, ShapePairSolver};
use crate::query::QueryError;
use crate::shape::Shape;
use arrayvec::ArrayVec;
use std::cmp::Ordering;

/// The octree traversal driver.
///
/// Owns a [`ShapePairSolver`] whose scratch state is reused by every leaf
/// test of a traversal. One instance is single-threaded; distinct instances
/// share nothing.
pub struct OcTreeSolver {
    solver: ShapePairSolver,
}

impl Default for OcTreeSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OcTreeSolver {
    /// Creates a traversal driver with default solver settings.
    pub fn new() -> Self {
        OcTreeSolver {
            solver: ShapePairSolver::default(),
        }
    }

    /*
     * Octree vs. octree.
     */

    /// Collision between two octrees placed in world space.
    pub fn octree_intersect(
        &mut self,
        tree1: &OcTree,
        tree2: &OcTree,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<(), QueryError> {
        self.solver = ShapePairSolver::from_query_request(&request.base);

        let _ = self.octree_intersect_recurse(
            tree1,
            OCTREE_ROOT,
            &tree1.root_bv(),
            tree2,
            OCTREE_ROOT,
            &tree2.root_bv(),
            tf1,
            tf2,
            request,
            result,
        )?;

        Ok(())
    }

    /// Distance between two octrees placed in world space.
    pub fn octree_distance(
        &mut self,
        tree1: &OcTree,
        tree2: &OcTree,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<Real, QueryError> {
        self.solver = ShapePairSolver::from_distance_request(request);

        let _ = self.octree_distance_recurse(
            tree1,
            OCTREE_ROOT,
            &tree1.root_bv(),
            tree2,
            OCTREE_ROOT,
            &tree2.root_bv(),
            tf1,
            tf2,
            request,
            result,
        )?;

        Ok(result.min_distance)
    }

    /*
     * Octree vs. mesh.
     */

    /// Collision between an octree and a triangle mesh.
    pub fn octree_mesh_intersect(
        &mut self,
        tree1: &OcTree,
        mesh2: &TriMeshBvh,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<(), QueryError> {
        self.solver = ShapePairSolver::from_query_request(&request.base);

        let _ = self.octree_mesh_intersect_recurse(
            tree1,
            OCTREE_ROOT,
            &tree1.root_bv(),
            mesh2,
            BVH_ROOT,
            tf1,
            tf2,
            request,
            result,
        )?;

        Ok(())
    }

    /// Collision between a triangle mesh and an octree.
    ///
    /// Same traversal as [`OcTreeSolver::octree_mesh_intersect`] with the
    /// operands swapped; reported contacts keep the caller's argument order.
    pub fn mesh_octree_intersect(
        &mut self,
        mesh1: &TriMeshBvh,
        tree2: &OcTree,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<(), QueryError> {
        let first_new = result.num_contacts();
        self.octree_mesh_intersect(tree2, mesh1, tf2, tf1, request, result)?;
        flip_contacts(result, first_new);
        Ok(())
    }

    /// Distance between an octree and a triangle mesh.
    pub fn octree_mesh_distance(
        &mut self,
        tree1: &OcTree,
        mesh2: &TriMeshBvh,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<Real, QueryError> {
        self.solver = ShapePairSolver::from_distance_request(request);

        let _ = self.octree_mesh_distance_recurse(
            tree1,
            OCTREE_ROOT,
            &tree1.root_bv(),
            mesh2,
            BVH_ROOT,
            tf1,
            tf2,
            request,
            result,
        )?;

        Ok(result.min_distance)
    }

    /// Distance between a triangle mesh and an octree.
    pub fn mesh_octree_distance(
        &mut self,
        mesh1: &TriMeshBvh,
        tree2: &OcTree,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<Real, QueryError> {
        let dist = self.octree_mesh_distance(tree2, mesh1, tf2, tf1, request, result)?;
        flip_distance_result(result);
        Ok(dist)
    }

    /*
     * Octree vs. shape.
     */

    /// Collision between an octree and a shape.
    ///
    /// The shape is pre-wrapped in an oriented bounding box expressed
    /// relative to the octree, then the tree is descended with
    /// box-overlap pruning.
    pub fn octree_shape_intersect(
        &mut self,
        tree1: &OcTree,
        shape2: &Shape,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<(), QueryError> {
        self.solver = ShapePairSolver::from_query_request(&request.base);

        let local_aabb = shape2
            .kind()
            .compute_local_aabb()
            .ok_or(QueryError::Unsupported)?;
        let obb2 = Obb::from_aabb(&local_aabb, tf2);

        let _ = self.octree_shape_intersect_recurse(
            tree1,
            OCTREE_ROOT,
            &tree1.root_bv(),
            shape2,
            &obb2,
            tf1,
            tf2,
            request,
            result,
        )?;

        Ok(())
    }

    /// Collision between a shape and an octree; contacts keep the caller's
    /// argument order.
    pub fn shape_octree_intersect(
        &mut self,
        shape1: &Shape,
        tree2: &OcTree,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<(), QueryError> {
        let first_new = result.num_contacts();
        self.octree_shape_intersect(tree2, shape1, tf2, tf1, request, result)?;
        flip_contacts(result, first_new);
        Ok(())
    }

    /// Distance between an octree and a shape.
    pub fn octree_shape_distance(
        &mut self,
        tree1: &OcTree,
        shape2: &Shape,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<Real, QueryError> {
        self.solver = ShapePairSolver::from_distance_request(request);

        let local_aabb = shape2
            .kind()
            .compute_local_aabb()
            .ok_or(QueryError::Unsupported)?;
        let aabb2 = local_aabb.transform_by(tf2);

        let _ = self.octree_shape_distance_recurse(
            tree1,
            OCTREE_ROOT,
            &tree1.root_bv(),
            shape2,
            &aabb2,
            tf1,
            tf2,
            request,
            result,
        )?;

        Ok(result.min_distance)
    }

    /// Distance between a shape and an octree.
    pub fn shape_octree_distance(
        &mut self,
        shape1: &Shape,
        tree2: &OcTree,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<Real, QueryError> {
        let dist = self.octree_shape_distance(tree2, shape1, tf2, tf1, request, result)?;
        flip_distance_result(result);
        Ok(dist)
    }

    /*
     * Recursions.
     */

    fn octree_intersect_recurse(
        &mut self,
        tree1: &OcTree,
        node1: u32,
        bv1: &Aabb,
        tree2: &OcTree,
        node2: u32,
        bv2: &Aabb,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<bool, QueryError> {
        let n1 = tree1.node(node1);
        let n2 = tree2.node(node2);

        if !n1.has_children() && !n2.has_children() {
            if tree1.is_node_occupied(n1) && tree2.is_node_occupied(n2) {
                if !request.enable_contact {
                    // Existence only: the oriented-box test is the verdict.
                    let obb1 = Obb::from_aabb(bv1, tf1);
                    let obb2 = Obb::from_aabb(bv2, tf2);

                    if obb1.overlaps(&obb2) {
                        if result.num_contacts() < request.num_max_contacts || request.exhaustive {
                            result.add_contact(make_id_contact(node1 as i32, node2 as i32));
                        }

                        return Ok(contact_cap_reached(request, result));
                    }

                    return Ok(false);
                }

                let (box1, box1_tf) = make_box(bv1, tf1);
                let (box2, box2_tf) = make_box(bv2, tf2);
                let contact = self.solver.contact(&box1, &box1_tf, &box2, &box2_tf, true)?;

                if contact.distance <= request.security_margin {
                    if result.num_contacts() < request.num_max_contacts || request.exhaustive {
                        result.add_contact(make_contact(
                            node1 as i32,
                            node2 as i32,
                            &contact,
                            request,
                        ));
                    }

                    return Ok(contact_cap_reached(request, result));
                } else if request.enable_distance_lower_bound {
                    result.update_distance_lower_bound(contact.distance - request.security_margin);
                }

                return Ok(false);
            }

            return Ok(false);
        }

        if !tree1.is_node_occupied(n1) || !tree2.is_node_occupied(n2) {
            return Ok(false);
        }

        let obb1 = Obb::from_aabb(bv1, tf1);
        let obb2 = Obb::from_aabb(bv2, tf2);
        if !obb1.overlaps(&obb2) {
            return Ok(false);
        }

        if !n2.has_children() || (n1.has_children() && bv1.size() > bv2.size()) {
            for i in 0..8 {
                if let Some(child) = n1.child(i) {
                    let child_bv = bv1.octant(i);

                    if self.octree_intersect_recurse(
                        tree1, child, &child_bv, tree2, node2, bv2, tf1, tf2, request, result,
                    )? {
                        return Ok(true);
                    }
                }
            }
        } else {
            for i in 0..8 {
                if let Some(child) = n2.child(i) {
                    let child_bv = bv2.octant(i);

                    if self.octree_intersect_recurse(
                        tree1, node1, bv1, tree2, child, &child_bv, tf1, tf2, request, result,
                    )? {
                        return Ok(true);
                    }
                }
            }
        }

        Ok(false)
    }

    fn octree_distance_recurse(
        &mut self,
        tree1: &OcTree,
        node1: u32,
        bv1: &Aabb,
        tree2: &OcTree,
        node2: u32,
        bv2: &Aabb,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<bool, QueryError> {
        let n1 = tree1.node(node1);
        let n2 = tree2.node(node2);

        if !n1.has_children() && !n2.has_children() {
            if tree1.is_node_occupied(n1) && tree2.is_node_occupied(n2) {
                let (box1, box1_tf) = make_box(bv1, tf1);
                let (box2, box2_tf) = make_box(bv2, tf2);
                let contact = self
                    .solver
                    .contact(&box1, &box1_tf, &box2, &box2_tf, request.enable_signed_distance)?;

                record_min_distance(result, &contact, node1 as i32, node2 as i32, request);

                return Ok(result.min_distance <= 0.0);
            }

            return Ok(false);
        }

        if !tree1.is_node_occupied(n1) || !tree2.is_node_occupied(n2) {
            return Ok(false);
        }

        if !n2.has_children() || (n1.has_children() && bv1.size() > bv2.size()) {
            let other = bv2.transform_by(tf2);

            for (child, child_bv, bound) in children_by_distance(tree1, node1, bv1, tf1, &other) {
                if bound < result.min_distance {
                    if self.octree_distance_recurse(
                        tree1, child, &child_bv, tree2, node2, bv2, tf1, tf2, request, result,
                    )? {
                        return Ok(true);
                    }
                }
            }
        } else {
            let other = bv1.transform_by(tf1);

            for (child, child_bv, bound) in children_by_distance(tree2, node2, bv2, tf2, &other) {
                if bound < result.min_distance {
                    if self.octree_distance_recurse(
                        tree1, node1, bv1, tree2, child, &child_bv, tf1, tf2, request, result,
                    )? {
                        return Ok(true);
                    }
                }
            }
        }

        Ok(false)
    }

    fn octree_mesh_intersect_recurse(
        &mut self,
        tree1: &OcTree,
        node1: u32,
        bv1: &Aabb,
        mesh2: &TriMeshBvh,
        node2: u32,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<bool, QueryError> {
        let n1 = tree1.node(node1);
        let bvh2 = mesh2.node(node2);

        if !n1.has_children() && bvh2.is_leaf() {
            if tree1.is_node_occupied(n1) {
                let obb1 = Obb::from_aabb(bv1, tf1);
                let obb2 = Obb::from_aabb(&bvh2.bv, tf2);

                if obb1.overlaps(&obb2) {
                    let primitive_id = bvh2.primitive_id();
                    let tri = mesh2.triangle(primitive_id);

                    let (box1, box1_tf) = make_box(bv1, tf1);
                    let tri_shape = Shape::triangle(tri.a, tri.b, tri.c);

                    let contact = self.solver.contact(
                        &box1,
                        &box1_tf,
                        &tri_shape,
                        tf2,
                        request.enable_contact,
                    )?;

                    if contact.distance <= request.security_margin {
                        if result.num_contacts() < request.num_max_contacts || request.exhaustive {
                            result.add_contact(make_contact(
                                node1 as i32,
                                primitive_id as i32,
                                &contact,
                                request,
                            ));
                        }

                        return Ok(contact_cap_reached(request, result));
                    } else if request.enable_distance_lower_bound {
                        result
                            .update_distance_lower_bound(contact.distance - request.security_margin);
                    }
                }

                return Ok(false);
            }

            return Ok(false);
        }

        if !tree1.is_node_occupied(n1) {
            return Ok(false);
        }

        let obb1 = Obb::from_aabb(bv1, tf1);
        let obb2 = Obb::from_aabb(&bvh2.bv, tf2);
        if !obb1.overlaps(&obb2) {
            return Ok(false);
        }

        if bvh2.is_leaf() || (n1.has_children() && bv1.size() > bvh2.bv.size()) {
            for i in 0..8 {
                if let Some(child) = n1.child(i) {
                    let child_bv = bv1.octant(i);

                    if self.octree_mesh_intersect_recurse(
                        tree1, child, &child_bv, mesh2, node2, tf1, tf2, request, result,
                    )? {
                        return Ok(true);
                    }
                }
            }
        } else {
            if self.octree_mesh_intersect_recurse(
                tree1,
                node1,
                bv1,
                mesh2,
                bvh2.left_child(),
                tf1,
                tf2,
                request,
                result,
            )? {
                return Ok(true);
            }

            if self.octree_mesh_intersect_recurse(
                tree1,
                node1,
                bv1,
                mesh2,
                bvh2.right_child(),
                tf1,
                tf2,
                request,
                result,
            )? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn octree_mesh_distance_recurse(
        &mut self,
        tree1: &OcTree,
        node1: u32,
        bv1: &Aabb,
        mesh2: &TriMeshBvh,
        node2: u32,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<bool, QueryError> {
        let n1 = tree1.node(node1);
        let bvh2 = mesh2.node(node2);

        if !n1.has_children() && bvh2.is_leaf() {
            if tree1.is_node_occupied(n1) {
                let primitive_id = bvh2.primitive_id();
                let tri = mesh2.triangle(primitive_id);

                let (box1, box1_tf) = make_box(bv1, tf1);
                let tri_shape = Shape::triangle(tri.a, tri.b, tri.c);

                let contact = self.solver.contact(
                    &box1,
                    &box1_tf,
                    &tri_shape,
                    tf2,
                    request.enable_signed_distance,
                )?;

                record_min_distance(result, &contact, node1 as i32, primitive_id as i32, request);

                return Ok(result.min_distance <= 0.0);
            }

            return Ok(false);
        }

        if !tree1.is_node_occupied(n1) {
            return Ok(false);
        }

        if bvh2.is_leaf() || (n1.has_children() && bv1.size() > bvh2.bv.size()) {
            let other = bvh2.bv.transform_by(tf2);

            for (child, child_bv, bound) in children_by_distance(tree1, node1, bv1, tf1, &other) {
                if bound < result.min_distance {
                    if self.octree_mesh_distance_recurse(
                        tree1, child, &child_bv, mesh2, node2, tf1, tf2, request, result,
                    )? {
                        return Ok(true);
                    }
                }
            }
        } else {
            let aabb1 = bv1.transform_by(tf1);

            for child in [bvh2.left_child(), bvh2.right_child()] {
                let aabb2 = mesh2.node(child).bv.transform_by(tf2);

                if aabb1.distance_to_aabb(&aabb2) < result.min_distance {
                    if self.octree_mesh_distance_recurse(
                        tree1, node1, bv1, mesh2, child, tf1, tf2, request, result,
                    )? {
                        return Ok(true);
                    }
                }
            }
        }

        Ok(false)
    }

    fn octree_shape_intersect_recurse(
        &mut self,
        tree1: &OcTree,
        node1: u32,
        bv1: &Aabb,
        shape2: &Shape,
        obb2: &Obb,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<bool, QueryError> {
        let n1 = tree1.node(node1);

        if !n1.has_children() {
            if tree1.is_node_occupied(n1) {
                let obb1 = Obb::from_aabb(bv1, tf1);

                if obb1.overlaps(obb2) {
                    let (box1, box1_tf) = make_box(bv1, tf1);
                    let contact =
                        self.solver
                            .contact(&box1, &box1_tf, shape2, tf2, request.enable_contact)?;

                    if contact.distance <= request.security_margin {
                        if result.num_contacts() < request.num_max_contacts || request.exhaustive {
                            result.add_contact(make_contact(
                                node1 as i32,
                                CONTACT_PRIMITIVE_NONE,
                                &contact,
                                request,
                            ));
                        }

                        return Ok(contact_cap_reached(request, result));
                    } else if request.enable_distance_lower_bound {
                        result
                            .update_distance_lower_bound(contact.distance - request.security_margin);
                    }
                }

                return Ok(false);
            }

            return Ok(false);
        }

        if !tree1.is_node_occupied(n1) {
            return Ok(false);
        }

        let obb1 = Obb::from_aabb(bv1, tf1);
        if !obb1.overlaps(obb2) {
            return Ok(false);
        }

        for i in 0..8 {
            if let Some(child) = n1.child(i) {
                let child_bv = bv1.octant(i);

                if self.octree_shape_intersect_recurse(
                    tree1, child, &child_bv, shape2, obb2, tf1, tf2, request, result,
                )? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    fn octree_shape_distance_recurse(
        &mut self,
        tree1: &OcTree,
        node1: u32,
        bv1: &Aabb,
        shape2: &Shape,
        aabb2: &Aabb,
        tf1: &Isometry<Real>,
        tf2: &Isometry<Real>,
        request: &DistanceRequest,
        result: &mut DistanceResult,
    ) -> Result<bool, QueryError> {
        let n1 = tree1.node(node1);

        if !n1.has_children() {
            if tree1.is_node_occupied(n1) {
                let (box1, box1_tf) = make_box(bv1, tf1);
                let contact = self.solver.contact(
                    &box1,
                    &box1_tf,
                    shape2,
                    tf2,
                    request.enable_signed_distance,
                )?;

                record_min_distance(result, &contact, node1 as i32, CONTACT_PRIMITIVE_NONE, request);

                return Ok(result.min_distance <= 0.0);
            }

            return Ok(false);
        }

        if !tree1.is_node_occupied(n1) {
            return Ok(false);
        }

        for (child, child_bv, bound) in children_by_distance(tree1, node1, bv1, tf1, aabb2) {
            if bound < result.min_distance {
                if self.octree_shape_distance_recurse(
                    tree1, child, &child_bv, shape2, aabb2, tf1, tf2, request, result,
                )? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }
}

// The children of an octree node, paired with the world-space distance from
// their cell to `other` and sorted nearest first: visiting the closest cell
// first establishes a tight bound before the remaining cells are tested,
// which lets the caller prune most of them.
fn children_by_distance(
    tree: &OcTree,
    node: u32,
    bv: &Aabb,
    tf: &Isometry<Real>,
    other: &Aabb,
) -> ArrayVec<(u32, Aabb, Real), 8> {
    let mut out = ArrayVec::new();

    for i in 0..8 {
        if let Some(child) = tree.node(node).child(i) {
            let child_bv = bv.octant(i);
            let bound = child_bv.transform_by(tf).distance_to_aabb(other);
            out.push((child, child_bv, bound));
        }
    }

    out.sort_unstable_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));
    out
}

// An occupied octree cell as a box shape placed in world space.
fn make_box(bv: &Aabb, tf: &Isometry<Real>) -> (Shape, Isometry<Real>) {
    let he = bv.half_extents();
    let shape = Shape::cuboid(he.x, he.y, he.z);
    let tf_box = tf * Translation::from(bv.center().coords);

    (shape, tf_box)
}

fn contact_cap_reached(request: &CollisionRequest, result: &CollisionResult) -> bool {
    result.num_contacts() >= request.num_max_contacts && !request.exhaustive
}

fn record_min_distance(
    result: &mut DistanceResult,
    contact: &ShapeContact,
    b1: i32,
    b2: i32,
    request: &DistanceRequest,
) {
    let dist = if request.enable_signed_distance {
        contact.distance
    } else {
        contact.distance.max(0.0)
    };

    if dist < result.min_distance {
        result.min_distance = dist;
        result.normal = contact.normal;
        result.b1 = b1;
        result.b2 = b2;

        if request.enable_nearest_points {
            result.nearest_points = [contact.point1, contact.point2];
        }
    }
}

fn flip_contacts(result: &mut CollisionResult, first: usize) {
    for contact in &mut result.contacts[first..] {
        std::mem::swap(&mut contact.b1, &mut contact.b2);
        contact.nearest_points.swap(0, 1);
        contact.normal = -contact.normal;
    }
}

fn flip_distance_result(result: &mut DistanceResult) {
    std::mem::swap(&mut result.b1, &mut result.b2);
    result.nearest_points.swap(0, 1);
    result.normal = result.normal.map(|n| -n);
}

// A contact carrying only the primitive identities, for requests that
// disabled contact computation.
fn make_id_contact(b1: i32, b2: i32) -> Contact {
    Contact {
        b1,
        b2,
        pos: Point::origin(),
        normal: Vector::x_axis(),
        penetration_depth: 0.0,
        nearest_points: [Point::origin(); 2],
    }
}
