use prox3d::math::{Isometry, Point};
use prox3d::query::{self, CollisionRequest, CollisionResult, DistanceRequest, DistanceResult};
use prox3d::shape::Shape;

#[test]
fn disjoint_unit_spheres() {
    let s1 = Shape::ball(1.0);
    let s2 = Shape::ball(1.0);
    let tf1 = Isometry::identity();
    let tf2 = Isometry::translation(3.0, 0.0, 0.0);

    let request = DistanceRequest::default();
    let mut result = DistanceResult::default();
    let dist = query::distance(&s1, &tf1, &s2, &tf2, &request, &mut result).unwrap();

    assert_relative_eq!(dist, 1.0, epsilon = 1.0e-9);
    assert_relative_eq!(result.nearest_points[0], Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-9);
    assert_relative_eq!(result.nearest_points[1], Point::new(2.0, 0.0, 0.0), epsilon = 1.0e-9);

    // The normal points from the second sphere toward the first.
    let normal = result.normal.unwrap();
    assert_relative_eq!(normal.x, -1.0, epsilon = 1.0e-9);
}

#[test]
fn overlapping_unit_spheres() {
    let s1 = Shape::ball(1.0);
    let s2 = Shape::ball(1.0);
    let tf1 = Isometry::identity();
    let tf2 = Isometry::translation(1.5, 0.0, 0.0);

    let request = CollisionRequest::default();
    let mut result = CollisionResult::new();
    let hit = query::collide(&s1, &tf1, &s2, &tf2, &request, &mut result).unwrap();

    assert!(hit);
    assert_eq!(result.num_contacts(), 1);

    let contact = &result.contacts[0];
    assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = 1.0e-9);
    assert_relative_eq!(contact.normal.x.abs(), 1.0, epsilon = 1.0e-9);
    assert_relative_eq!(contact.nearest_points[0], Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-9);
    assert_relative_eq!(contact.nearest_points[1], Point::new(0.5, 0.0, 0.0), epsilon = 1.0e-9);
}

#[test]
fn signed_distance_of_overlapping_spheres() {
    let s1 = Shape::ball(1.0);
    let s2 = Shape::ball(1.0);
    let tf1 = Isometry::identity();
    let tf2 = Isometry::translation(1.5, 0.0, 0.0);

    let request = DistanceRequest::default();
    let mut result = DistanceResult::default();
    let dist = query::distance(&s1, &tf1, &s2, &tf2, &request, &mut result).unwrap();

    assert_relative_eq!(dist, -0.5, epsilon = 1.0e-9);

    let mut unsigned = DistanceRequest::default();
    unsigned.enable_signed_distance = false;
    let mut result = DistanceResult::default();
    let dist = query::distance(&s1, &tf1, &s2, &tf2, &unsigned, &mut result).unwrap();

    assert_eq!(dist, 0.0);
}
