use prox3d::math::{Isometry, Point, Real};
use prox3d::octree::OcTree;
use prox3d::partitioning::TriMeshBvh;
use prox3d::query::octree::OcTreeSolver;
use prox3d::query::{CollisionRequest, CollisionResult, DistanceRequest, DistanceResult};
use prox3d::shape::Shape;

// A 2x2x2 occupancy grid at resolution 1 whose cells are centered on the
// lattice `{-0.5, 0.5}^3` of its local frame.
fn eight_cell_tree() -> OcTree {
    OcTree::new(1, 1.0)
}

fn single_cell_tree() -> OcTree {
    let mut tree = OcTree::new(0, 1.0);
    tree.insert_point(&Point::origin());
    tree
}

#[test]
fn octree_vs_sphere_distance() {
    // One occupied cell covering [-0.5, 0.5]^3 in world space, and a unit
    // sphere at (2, 0, 0): the gap spans x in [0.5, 1.0].
    let mut tree = eight_cell_tree();
    tree.insert_point(&Point::new(-0.5, -0.5, -0.5));
    let tf_tree = Isometry::translation(0.5, 0.5, 0.5);

    let sphere = Shape::ball(1.0);
    let tf_sphere = Isometry::translation(2.0, 0.0, 0.0);

    let mut solver = OcTreeSolver::new();
    let request = DistanceRequest::default();
    let mut result = DistanceResult::default();
    let dist = solver
        .octree_shape_distance(&tree, &sphere, &tf_tree, &tf_sphere, &request, &mut result)
        .unwrap();

    assert_relative_eq!(dist, 0.5, epsilon = 1.0e-6);

    // Disjoint, so a collision query reports no contact.
    let creq = CollisionRequest::default();
    let mut cres = CollisionResult::new();
    solver
        .octree_shape_intersect(&tree, &sphere, &tf_tree, &tf_sphere, &creq, &mut cres)
        .unwrap();
    assert_eq!(cres.num_contacts(), 0);
}

#[test]
fn octree_octree_penetration() {
    let tree1 = single_cell_tree();
    let tree2 = single_cell_tree();

    let tf1 = Isometry::identity();
    let tf2 = Isometry::translation(0.5, 0.0, 0.0);

    let mut solver = OcTreeSolver::new();
    let request = CollisionRequest::default();
    let mut result = CollisionResult::new();
    solver
        .octree_intersect(&tree1, &tree2, &tf1, &tf2, &request, &mut result)
        .unwrap();

    assert_eq!(result.num_contacts(), 1);
    let contact = &result.contacts[0];
    assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = 1.0e-4);
    assert_relative_eq!(contact.normal.x.abs(), 1.0, epsilon = 1.0e-4);
}

#[test]
fn contact_cap_unwinds_early() {
    // Every cell of both trees is occupied and the trees coincide: far more
    // than `num_max_contacts` leaf pairs overlap.
    let mut tree1 = eight_cell_tree();
    let mut tree2 = eight_cell_tree();

    for x in [-0.5, 0.5] {
        for y in [-0.5, 0.5] {
            for z in [-0.5, 0.5] {
                tree1.insert_point(&Point::new(x, y, z));
                tree2.insert_point(&Point::new(x, y, z));
            }
        }
    }

    let tf = Isometry::identity();
    let mut solver = OcTreeSolver::new();

    let mut request = CollisionRequest::default();
    request.num_max_contacts = 3;

    let mut result = CollisionResult::new();
    solver
        .octree_intersect(&tree1, &tree2, &tf, &tf, &request, &mut result)
        .unwrap();

    assert_eq!(result.num_contacts(), 3);

    // An exhaustive request reports every overlapping pair instead.
    request.exhaustive = true;
    let mut result = CollisionResult::new();
    solver
        .octree_intersect(&tree1, &tree2, &tf, &tf, &request, &mut result)
        .unwrap();
    assert!(result.num_contacts() > 3);
}

fn ground_square(z: Real) -> TriMeshBvh {
    let vertices = vec![
        Point::new(-2.0, -2.0, z),
        Point::new(2.0, -2.0, z),
        Point::new(2.0, 2.0, z),
        Point::new(-2.0, 2.0, z),
    ];
    let indices = vec![[0, 1, 2], [0, 2, 3]];
    TriMeshBvh::new(vertices, indices).unwrap()
}

#[test]
fn octree_vs_mesh_distance_and_collision() {
    let tree = single_cell_tree();
    let tf = Isometry::identity();

    let mut solver = OcTreeSolver::new();

    // Square at z = 2: the cell's top face is at z = 0.5.
    let far_mesh = ground_square(2.0);
    let request = DistanceRequest::default();
    let mut result = DistanceResult::default();
    let dist = solver
        .octree_mesh_distance(&tree, &far_mesh, &tf, &tf, &request, &mut result)
        .unwrap();
    assert_relative_eq!(dist, 1.5, epsilon = 1.0e-6);

    // Square at z = 0.3 slices through the cell: 0.2 below its top face.
    let near_mesh = ground_square(0.3);
    let creq = CollisionRequest::default();
    let mut cres = CollisionResult::new();
    solver
        .octree_mesh_intersect(&tree, &near_mesh, &tf, &tf, &creq, &mut cres)
        .unwrap();

    assert_eq!(cres.num_contacts(), 1);
    assert_relative_eq!(cres.contacts[0].penetration_depth, 0.2, epsilon = 1.0e-3);
}

#[test]
fn mesh_major_order_mirrors_identifiers() {
    let tree = single_cell_tree();
    let tf = Isometry::identity();
    let near_mesh = ground_square(0.3);

    let mut solver = OcTreeSolver::new();
    let creq = CollisionRequest::default();

    let mut octree_major = CollisionResult::new();
    solver
        .octree_mesh_intersect(&tree, &near_mesh, &tf, &tf, &creq, &mut octree_major)
        .unwrap();

    let mut mesh_major = CollisionResult::new();
    solver
        .mesh_octree_intersect(&near_mesh, &tree, &tf, &tf, &creq, &mut mesh_major)
        .unwrap();

    let c1 = &octree_major.contacts[0];
    let c2 = &mesh_major.contacts[0];

    assert_eq!(c1.b1, c2.b2);
    assert_eq!(c1.b2, c2.b1);
    assert_relative_eq!(*c1.normal, -*c2.normal, epsilon = 1.0e-9);
}
