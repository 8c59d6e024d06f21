use crate::math::Real;
use crate::shape::{Segment, SegmentPointLocation};
use na;

/// Closest points between two segments, as locations on each segment.
///
/// Both segments must be expressed in the same frame. Inspired by
/// real-time collision detection, Christer Ericson.
pub fn closest_points_segment_segment_with_locations(
    seg1: &Segment,
    seg2: &Segment,
) -> (SegmentPointLocation, SegmentPointLocation) {
    let d1 = seg1.scaled_direction();
    let d2 = seg2.scaled_direction();
    let r = seg1.a - seg2.a;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let mut s;
    let mut t;

    let _eps = crate::math::DEFAULT_EPSILON;
    if a <= _eps && e <= _eps {
        s = 0.0;
        t = 0.0;
    } else if a <= _eps {
        s = 0.0;
        t = na::clamp(f / e, 0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e <= _eps {
            t = 0.0;
            s = na::clamp(-c / a, 0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let ae = a * e;
            let bb = b * b;
            let denom = ae - bb;

            // Absolute and ulps error to test collinearity.
            if denom > _eps && !ulps_eq!(ae, bb) {
                s = na::clamp((b * f - c * e) / denom, 0.0, 1.0);
            } else {
                s = 0.0;
            }

            t = (b * s + f) / e;

            if t < 0.0 {
                t = 0.0;
                s = na::clamp(-c / a, 0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = na::clamp((b - c) / a, 0.0, 1.0);
            }
        }
    }

    let loc1 = if s == 0.0 {
        SegmentPointLocation::OnVertex(0)
    } else if s == 1.0 {
        SegmentPointLocation::OnVertex(1)
    } else {
        SegmentPointLocation::OnEdge([1.0 - s, s])
    };

    let loc2 = if t == 0.0 {
        SegmentPointLocation::OnVertex(0)
    } else if t == 1.0 {
        SegmentPointLocation::OnVertex(1)
    } else {
        SegmentPointLocation::OnEdge([1.0 - t, t])
    };

    (loc1, loc2)
}

#[cfg(test)]
mod test {
    use super::closest_points_segment_segment_with_locations;
    use crate::math::Point;
    use crate::shape::Segment;
    use na;

    #[test]
    fn parallel_segments() {
        let s1 = Segment::new(Point::new(-0.5, 0.0, 0.0), Point::new(0.5, 0.0, 0.0));
        let s2 = Segment::new(Point::new(-0.5, 0.25, 0.0), Point::new(0.5, 0.25, 0.0));

        let (loc1, loc2) = closest_points_segment_segment_with_locations(&s1, &s2);
        let p1 = s1.point_at(&loc1);
        let p2 = s2.point_at(&loc2);
        assert_relative_eq!(na::distance(&p1, &p2), 0.25);
    }

    #[test]
    fn crossing_segments() {
        let s1 = Segment::new(Point::new(-1.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0));
        let s2 = Segment::new(Point::new(0.0, -1.0, 1.0), Point::new(0.0, 1.0, 1.0));

        let (loc1, loc2) = closest_points_segment_segment_with_locations(&s1, &s2);
        let p1 = s1.point_at(&loc1);
        let p2 = s2.point_at(&loc2);
        assert_relative_eq!(p1, Point::new(0.0, 0.0, 0.0));
        assert_relative_eq!(p2, Point::new(0.0, 0.0, 1.0));
    }
}
