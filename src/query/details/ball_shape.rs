use crate::math::{Isometry, Point, Real, Vector};
use crate::query::details::LocalContact;
use crate::query::point::PointQuery;
use crate::shape::Ball;
use na::Unit;

/// Contact between a ball and any shape supporting point projection, in the
/// ball's frame.
///
/// The ball is the first shape, centered at the origin of its frame;
/// `pos12` is the pose of the other shape in that frame.
pub fn contact_ball_point_query<S: ?Sized + PointQuery>(
    pos12: &Isometry<Real>,
    ball: &Ball,
    shape: &S,
) -> LocalContact {
    // The ball center, seen from the other shape.
    let center = pos12.inverse_transform_point(&Point::origin());
    let proj = shape.project_local_point(&center, false);

    let dproj = center - proj.point;
    let (dir, dist) = Unit::try_new_and_get(dproj, crate::math::DEFAULT_EPSILON)
        .unwrap_or((Vector::x_axis(), 0.0));

    // In the shape's frame, `dir` points from its surface toward the ball
    // center when the center is outside, into the shape when inside.
    let (distance, normal2, point2) = if proj.is_inside {
        (-(dist + ball.radius), -dir, proj.point)
    } else {
        (dist - ball.radius, dir, proj.point)
    };

    // Back to the ball's frame. The normal must point from the shape
    // (second) toward the ball (first).
    let normal = pos12 * normal2;

    LocalContact {
        distance,
        normal,
        point1: Point::from(-*normal * ball.radius),
        point2: pos12 * point2,
    }
}

#[cfg(test)]
mod test {
    use super::contact_ball_point_query;
    use crate::math::{Isometry, Point};
    use crate::shape::{Ball, Cuboid, Triangle};
    use crate::math::Vector;

    #[test]
    fn ball_cuboid_separation() {
        let ball = Ball::new(1.0);
        let cuboid = Cuboid::new(Vector::repeat(0.5));
        let pos12 = Isometry::translation(3.0, 0.0, 0.0);

        let c = contact_ball_point_query(&pos12, &ball, &cuboid);
        assert_relative_eq!(c.distance, 1.5, epsilon = 1.0e-9);
        assert_relative_eq!(c.point1, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-9);
        assert_relative_eq!(c.point2, Point::new(2.5, 0.0, 0.0), epsilon = 1.0e-9);
        assert_relative_eq!(c.normal.x, -1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn ball_center_inside_cuboid() {
        let ball = Ball::new(0.25);
        let cuboid = Cuboid::new(Vector::repeat(1.0));
        // Ball center 0.2 away from the `+x` face, inside the box.
        let pos12 = Isometry::translation(-0.8, 0.0, 0.0);

        let c = contact_ball_point_query(&pos12, &ball, &cuboid);
        assert_relative_eq!(c.distance, -0.45, epsilon = 1.0e-9);
        assert_relative_eq!(c.normal.x, 1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn ball_triangle_face() {
        let ball = Ball::new(0.5);
        let tri = Triangle::new(
            Point::new(-1.0, -2.0, -1.0),
            Point::new(1.0, -2.0, -1.0),
            Point::new(0.0, -2.0, 1.0),
        );

        let c = contact_ball_point_query(&Isometry::identity(), &ball, &tri);
        assert_relative_eq!(c.distance, 1.5, epsilon = 1.0e-9);
        assert_relative_eq!(c.normal.y, 1.0, epsilon = 1.0e-9);
    }
}
