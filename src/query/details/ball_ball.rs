use crate::math::{Isometry, Point, Real, Vector};
use crate::query::details::LocalContact;
use crate::shape::Ball;
use na::Unit;

/// Contact between two balls, in the first ball's frame.
pub fn contact_ball_ball(pos12: &Isometry<Real>, b1: &Ball, b2: &Ball) -> LocalContact {
    let center2 = Point::from(pos12.translation.vector);

    // Direction from the first ball's center toward the second; for
    // concentric balls any axis realises the distance, `x` by convention.
    let (dir12, center_dist) =
        Unit::try_new_and_get(center2.coords, crate::math::DEFAULT_EPSILON)
            .unwrap_or((Vector::x_axis(), 0.0));

    LocalContact {
        distance: center_dist - b1.radius - b2.radius,
        normal: -dir12,
        point1: Point::from(*dir12 * b1.radius),
        point2: center2 - *dir12 * b2.radius,
    }
}

#[cfg(test)]
mod test {
    use super::contact_ball_ball;
    use crate::math::{Isometry, Point};
    use crate::shape::Ball;

    #[test]
    fn disjoint_and_penetrating() {
        let b = Ball::new(1.0);

        let sep = contact_ball_ball(&Isometry::translation(3.0, 0.0, 0.0), &b, &b);
        assert_relative_eq!(sep.distance, 1.0);
        assert_relative_eq!(sep.point1, Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(sep.point2, Point::new(2.0, 0.0, 0.0));
        assert_relative_eq!(sep.normal.x, -1.0);

        let pen = contact_ball_ball(&Isometry::translation(1.5, 0.0, 0.0), &b, &b);
        assert_relative_eq!(pen.distance, -0.5);
        assert_relative_eq!(pen.point1, Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(pen.point2, Point::new(0.5, 0.0, 0.0));
    }
}
