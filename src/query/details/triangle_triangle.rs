use crate::math::{Isometry, Point, Real, Vector};
use crate::query::details::{closest_points_segment_segment_with_locations, LocalContact};
use crate::query::point::{PointQuery, PointQueryWithLocation};
use crate::shape::Triangle;
use na::{self, Unit};

/// Contact between two triangles, in the first triangle's frame.
pub fn contact_triangle_triangle(
    pos12: &Isometry<Real>,
    tri1: &Triangle,
    tri2: &Triangle,
) -> LocalContact {
    let tri2_1 = Triangle::new(pos12 * tri2.a, pos12 * tri2.b, pos12 * tri2.c);

    if triangles_intersect(tri1, &tri2_1) {
        penetration_sat(tri1, &tri2_1)
    } else {
        disjoint_closest_points(tri1, &tri2_1)
    }
}

// Plane-interval intersection test in the style of Möller's triangle
// overlap test, completed by the edge-axis checks so coplanar and
// degenerate configurations are decided too.
fn triangles_intersect(tri1: &Triangle, tri2: &Triangle) -> bool {
    for axis in separating_axes(tri1, tri2) {
        let (min1, max1) = project(tri1, &axis);
        let (min2, max2) = project(tri2, &axis);

        if min1 > max2 || min2 > max1 {
            return false;
        }
    }

    true
}

// The candidate separating axes of a triangle pair: both face normals and
// the nine edge cross-products. Degenerate axes are skipped.
fn separating_axes(tri1: &Triangle, tri2: &Triangle) -> Vec<Vector<Real>> {
    let mut axes = Vec::with_capacity(11);
    let eps = crate::math::DEFAULT_EPSILON;

    for n in [tri1.scaled_normal(), tri2.scaled_normal()] {
        if let Some(n) = n.try_normalize(eps) {
            axes.push(n);
        }
    }

    let edges1 = [tri1.b - tri1.a, tri1.c - tri1.b, tri1.a - tri1.c];
    let edges2 = [tri2.b - tri2.a, tri2.c - tri2.b, tri2.a - tri2.c];

    for e1 in &edges1 {
        for e2 in &edges2 {
            if let Some(axis) = e1.cross(e2).try_normalize(eps) {
                axes.push(axis);
            }
        }
    }

    axes
}

fn project(tri: &Triangle, axis: &Vector<Real>) -> (Real, Real) {
    let d1 = tri.a.coords.dot(axis);
    let d2 = tri.b.coords.dot(axis);
    let d3 = tri.c.coords.dot(axis);

    (d1.min(d2).min(d3), d1.max(d2).max(d3))
}

// Minimal-translation direction over the 11 separating-axis candidates.
// Two flat triangles make EPA ill-conditioned, which is why the
// intersecting branch stays analytic.
fn penetration_sat(tri1: &Triangle, tri2: &Triangle) -> LocalContact {
    let mut best_depth = Real::MAX;
    let mut best_normal = Vector::x();

    for axis in separating_axes(tri1, tri2) {
        let (min1, max1) = project(tri1, &axis);
        let (min2, max2) = project(tri2, &axis);

        // Overlap when pushing triangle 1 toward +axis vs toward -axis.
        let push_up = max2 - min1;
        let push_down = max1 - min2;

        let (depth, normal) = if push_up <= push_down {
            (push_up, axis)
        } else {
            (push_down, -axis)
        };

        if depth < best_depth {
            best_depth = depth;
            best_normal = normal;
        }
    }

    // `best_normal` separates triangle 1 along its positive direction, so
    // it already points from the second shape toward the first. Witnesses:
    // the extreme points along the penetration axis.
    let normal = Unit::new_unchecked(best_normal);
    let point1 = deepest_point(tri1, &-best_normal);
    let point2 = deepest_point(tri2, &best_normal);

    LocalContact {
        distance: -best_depth.max(0.0),
        normal,
        point1,
        point2,
    }
}

fn deepest_point(tri: &Triangle, dir: &Vector<Real>) -> Point<Real> {
    let mut best = tri.a;
    let mut best_dot = tri.a.coords.dot(dir);

    for p in [tri.b, tri.c] {
        let dot = p.coords.dot(dir);
        if dot > best_dot {
            best_dot = dot;
            best = p;
        }
    }

    best
}

// Disjoint triangles: the closest pair is realised by an edge pair or by a
// vertex against the other face; enumerate all of them.
fn disjoint_closest_points(tri1: &Triangle, tri2: &Triangle) -> LocalContact {
    let mut best_dist2 = Real::MAX;
    let mut best = (Point::origin(), Point::origin());

    for e1 in &tri1.edges() {
        for e2 in &tri2.edges() {
            let (loc1, loc2) = closest_points_segment_segment_with_locations(e1, e2);
            let p1 = e1.point_at(&loc1);
            let p2 = e2.point_at(&loc2);
            let d2 = na::distance_squared(&p1, &p2);

            if d2 < best_dist2 {
                best_dist2 = d2;
                best = (p1, p2);
            }
        }
    }

    for v in tri2.vertices() {
        let (proj, _) = tri1.project_local_point_and_get_location(&v, false);
        let d2 = na::distance_squared(&proj.point, &v);

        if d2 < best_dist2 {
            best_dist2 = d2;
            best = (proj.point, v);
        }
    }

    for v in tri1.vertices() {
        let proj = tri2.project_local_point(&v, false);
        let d2 = na::distance_squared(&v, &proj.point);

        if d2 < best_dist2 {
            best_dist2 = d2;
            best = (v, proj.point);
        }
    }

    let distance = best_dist2.sqrt();
    let normal = Unit::try_new(best.0 - best.1, crate::math::DEFAULT_EPSILON)
        .unwrap_or(Vector::x_axis());

    LocalContact {
        distance,
        normal,
        point1: best.0,
        point2: best.1,
    }
}

#[cfg(test)]
mod test {
    use super::contact_triangle_triangle;
    use crate::math::{Isometry, Point};
    use crate::shape::Triangle;

    fn xy_triangle() -> Triangle {
        Triangle::new(
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn stacked_triangles_distance() {
        let tri = xy_triangle();
        let contact =
            contact_triangle_triangle(&Isometry::translation(0.0, 0.0, 0.75), &tri, &tri);

        assert_relative_eq!(contact.distance, 0.75, epsilon = 1.0e-9);
        assert_relative_eq!(contact.normal.z, -1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn piercing_triangles_penetrate() {
        let tri1 = xy_triangle();
        // An upright triangle crossing tri1's plane through its interior.
        let tri2 = Triangle::new(
            Point::new(0.0, 0.0, -0.5),
            Point::new(0.2, 0.0, 0.5),
            Point::new(-0.2, 0.1, 0.5),
        );

        let contact = contact_triangle_triangle(&Isometry::identity(), &tri1, &tri2);
        assert!(contact.distance < 0.0);
    }
}
