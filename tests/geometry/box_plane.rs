use prox3d::math::{Isometry, Vector};
use prox3d::query::{self, CollisionRequest, CollisionResult};
use prox3d::shape::Shape;

#[test]
fn unit_cube_on_low_plane() {
    let cube = Shape::cuboid(0.5, 0.5, 0.5);
    let plane = Shape::plane(Vector::z_axis(), 0.0);

    let tf_cube = Isometry::identity();
    let tf_plane = Isometry::translation(0.0, 0.0, -0.2);

    let request = CollisionRequest::default();
    let mut result = CollisionResult::new();
    let hit = query::collide(&cube, &tf_cube, &plane, &tf_plane, &request, &mut result).unwrap();

    assert!(hit);
    let contact = &result.contacts[0];
    assert_relative_eq!(contact.penetration_depth, 0.3, epsilon = 1.0e-9);
    assert_relative_eq!(contact.normal.z, 1.0, epsilon = 1.0e-9);
}

#[test]
fn half_space_agrees_with_plane_when_shallow() {
    let cube = Shape::cuboid(0.5, 0.5, 0.5);
    let plane = Shape::plane(Vector::z_axis(), 0.0);
    let halfspace = Shape::half_space(Vector::z_axis(), 0.0);

    let tf_cube = Isometry::identity();
    let tf_other = Isometry::translation(0.0, 0.0, -0.2);

    let request = CollisionRequest::default();

    let mut res_plane = CollisionResult::new();
    let _ = query::collide(&cube, &tf_cube, &plane, &tf_other, &request, &mut res_plane).unwrap();

    let mut res_half = CollisionResult::new();
    let _ =
        query::collide(&cube, &tf_cube, &halfspace, &tf_other, &request, &mut res_half).unwrap();

    let pen_plane = res_plane.contacts[0].penetration_depth;
    let pen_half = res_half.contacts[0].penetration_depth;
    assert_relative_eq!(pen_plane, pen_half, epsilon = 1.0e-9);
}
