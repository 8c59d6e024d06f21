use prox3d::math::{Isometry, Point, Real, Vector};
use prox3d::query::{self, DistanceRequest, DistanceResult};
use prox3d::shape::{
    Ball, Capsule, Cone, ConvexPolyhedron, Cuboid, Cylinder, Ellipsoid, Shape, SupportMap,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_dir(rng: &mut StdRng) -> Vector<Real> {
    loop {
        let v = Vector::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );

        if v.norm_squared() > 1.0e-6 {
            return v.normalize();
        }
    }
}

// For every pair of sampled directions `d`, `d'`: the support point toward
// `d'` belongs to the shape, so it cannot beat the support point toward `d`
// on the projection along `d`.
fn check_support_map<S: SupportMap>(shape: &S, rng: &mut StdRng) {
    let dirs: Vec<_> = (0..64).map(|_| random_dir(rng)).collect();
    let supports: Vec<_> = dirs.iter().map(|d| shape.local_support_point(d)).collect();

    for (d, sup) in dirs.iter().zip(&supports) {
        let best = d.dot(&sup.coords);

        for other in &supports {
            assert!(d.dot(&other.coords) <= best + 1.0e-9);
        }
    }
}

#[test]
fn support_functions_are_extremal() {
    let mut rng = StdRng::seed_from_u64(42);

    check_support_map(&Ball::new(1.5), &mut rng);
    check_support_map(&Cuboid::new(Vector::new(0.5, 1.0, 2.0)), &mut rng);
    check_support_map(
        &Capsule::new(Point::new(0.0, -0.7, 0.0), Point::new(0.0, 0.7, 0.0), 0.3),
        &mut rng,
    );
    check_support_map(&Cylinder::new(1.0, 0.5), &mut rng);
    check_support_map(&Cone::new(1.0, 0.5), &mut rng);
    check_support_map(&Ellipsoid::new(Vector::new(1.0, 2.0, 0.5)), &mut rng);

    let tetra = ConvexPolyhedron::from_convex_mesh(
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
    .unwrap();
    check_support_map(&tetra, &mut rng);
}

#[test]
fn frame_equivariance() {
    let capsule = Shape::capsule(Point::new(-0.5, 0.0, 0.0), Point::new(0.5, 0.0, 0.0), 0.2);
    let cuboid = Shape::cuboid(0.3, 0.4, 0.5);

    let tf1 = Isometry::translation(0.0, 2.0, 0.0);
    let tf2 = Isometry::rotation(Vector::z() * 0.4);

    let request = DistanceRequest::default();
    let mut base = DistanceResult::default();
    let d_base = query::distance(&capsule, &tf1, &cuboid, &tf2, &request, &mut base).unwrap();

    // Move both bodies by the same rigid transform.
    let motion = Isometry::new(Vector::new(1.0, -2.0, 0.5), Vector::new(0.3, 0.2, -0.4));
    let mut moved = DistanceResult::default();
    let d_moved = query::distance(
        &capsule,
        &(motion * tf1),
        &cuboid,
        &(motion * tf2),
        &request,
        &mut moved,
    )
    .unwrap();

    assert_relative_eq!(d_base, d_moved, epsilon = 1.0e-5);

    let n_base = base.normal.unwrap();
    let n_moved = moved.normal.unwrap();
    assert_relative_eq!(*(motion * n_base), *n_moved, epsilon = 1.0e-4);

    assert_relative_eq!(motion * base.nearest_points[0], moved.nearest_points[0], epsilon = 1.0e-4);
    assert_relative_eq!(motion * base.nearest_points[1], moved.nearest_points[1], epsilon = 1.0e-4);
}

#[test]
fn query_symmetry() {
    let cone = Shape::cone(0.5, 0.4);
    let ball = Shape::ball(0.3);

    let tf1 = Isometry::translation(0.0, 1.6, 0.0);
    let tf2 = Isometry::identity();

    let request = DistanceRequest::default();
    let mut res12 = DistanceResult::default();
    let mut res21 = DistanceResult::default();

    let d12 = query::distance(&cone, &tf1, &ball, &tf2, &request, &mut res12).unwrap();
    let d21 = query::distance(&ball, &tf2, &cone, &tf1, &request, &mut res21).unwrap();

    assert_relative_eq!(d12, d21, epsilon = 1.0e-5);
    assert_relative_eq!(res12.nearest_points[0], res21.nearest_points[1], epsilon = 1.0e-4);
    assert_relative_eq!(res12.nearest_points[1], res21.nearest_points[0], epsilon = 1.0e-4);

    let n12 = res12.normal.unwrap();
    let n21 = res21.normal.unwrap();
    assert_relative_eq!(*n12, -*n21, epsilon = 1.0e-4);
}

#[test]
fn analytic_ball_cuboid_agrees_with_gjk() {
    // The same cube expressed as a convex polyhedron takes the iterative
    // path; the `Cuboid` variant takes the analytic one.
    let ball = Shape::ball(0.7);
    let cuboid = Shape::cuboid(0.5, 0.5, 0.5);

    let cube_mesh = ConvexPolyhedron::from_convex_mesh(
        vec![
            Point::new(-0.5, -0.5, -0.5),
            Point::new(0.5, -0.5, -0.5),
            Point::new(0.5, 0.5, -0.5),
            Point::new(-0.5, 0.5, -0.5),
            Point::new(-0.5, -0.5, 0.5),
            Point::new(0.5, -0.5, 0.5),
            Point::new(0.5, 0.5, 0.5),
            Point::new(-0.5, 0.5, 0.5),
        ],
        vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ],
    )
    .unwrap();
    let cube_poly = Shape::convex_polyhedron(cube_mesh);

    let tf1 = Isometry::identity();
    let request = DistanceRequest::default();

    for t in [
        Vector::new(2.0, 0.0, 0.0),
        Vector::new(1.5, 1.5, 0.0),
        Vector::new(-1.0, 1.2, 0.8),
    ] {
        let tf2 = Isometry::translation(t.x, t.y, t.z);

        let mut res_analytic = DistanceResult::default();
        let d_analytic =
            query::distance(&ball, &tf1, &cuboid, &tf2, &request, &mut res_analytic).unwrap();

        let mut res_iterative = DistanceResult::default();
        let d_iterative =
            query::distance(&ball, &tf1, &cube_poly, &tf2, &request, &mut res_iterative).unwrap();

        assert_relative_eq!(d_analytic, d_iterative, epsilon = 1.0e-5);
    }
}
