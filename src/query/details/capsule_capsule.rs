use crate::math::{Isometry, Real, Vector};
use crate::query::details::{closest_points_segment_segment_with_locations, LocalContact};
use crate::shape::{Capsule, Segment};
use na::Unit;

/// Contact between two capsules, in the first capsule's frame.
///
/// Reduces to the closest points between the two axes followed by a
/// ball-ball resolution at those points.
pub fn contact_capsule_capsule(
    pos12: &Isometry<Real>,
    capsule1: &Capsule,
    capsule2: &Capsule,
) -> LocalContact {
    let seg1 = capsule1.segment;
    let seg2_1 = Segment::new(pos12 * capsule2.segment.a, pos12 * capsule2.segment.b);

    let (loc1, loc2) = closest_points_segment_segment_with_locations(&seg1, &seg2_1);
    let axis_p1 = seg1.point_at(&loc1);
    let axis_p2 = seg2_1.point_at(&loc2);

    // For overlapping axes any orthogonal direction works; `x` by
    // convention, like concentric balls.
    let (dir12, axis_dist) =
        Unit::try_new_and_get(axis_p2 - axis_p1, crate::math::DEFAULT_EPSILON)
            .unwrap_or((Vector::x_axis(), 0.0));

    LocalContact {
        distance: axis_dist - capsule1.radius - capsule2.radius,
        normal: -dir12,
        point1: axis_p1 + *dir12 * capsule1.radius,
        point2: axis_p2 - *dir12 * capsule2.radius,
    }
}

#[cfg(test)]
mod test {
    use super::contact_capsule_capsule;
    use crate::math::{Isometry, Point};
    use crate::shape::Capsule;

    #[test]
    fn parallel_capsules_distance() {
        let c1 = Capsule::new(
            Point::new(-0.5, 0.0, 0.0),
            Point::new(0.5, 0.0, 0.0),
            0.1,
        );
        let c2 = c1;
        let pos12 = Isometry::translation(0.0, 0.25, 0.0);

        let contact = contact_capsule_capsule(&pos12, &c1, &c2);
        assert_relative_eq!(contact.distance, 0.05, epsilon = 1.0e-9);
        assert_relative_eq!(contact.normal.y, -1.0, epsilon = 1.0e-9);
    }
}
