use prox3d::math::{Isometry, Point};
use prox3d::query::{self, DistanceRequest, DistanceResult};
use prox3d::shape::Shape;

#[test]
fn parallel_capsules() {
    let capsule = || {
        Shape::capsule(
            Point::new(-0.5, 0.0, 0.0),
            Point::new(0.5, 0.0, 0.0),
            0.1,
        )
    };

    let tf1 = Isometry::identity();
    let tf2 = Isometry::translation(0.0, 0.25, 0.0);

    let request = DistanceRequest::default();
    let mut result = DistanceResult::default();
    let dist = query::distance(&capsule(), &tf1, &capsule(), &tf2, &request, &mut result).unwrap();

    assert_relative_eq!(dist, 0.05, epsilon = 1.0e-9);

    // The witnesses are 0.05 apart along `y`.
    let [p1, p2] = result.nearest_points;
    assert_relative_eq!(p2.y - p1.y, 0.05, epsilon = 1.0e-9);
}
