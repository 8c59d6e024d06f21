use crate::math::{Isometry, Real};
use crate::query::details::LocalContact;
use crate::shape::{HalfSpace, Plane, SupportMap};

/// Contact between a half-space and a support-mapped shape, in the
/// half-space's frame.
pub fn contact_halfspace_support_map<G: ?Sized + SupportMap>(
    pos12: &Isometry<Real>,
    halfspace: &HalfSpace,
    other: &G,
) -> LocalContact {
    let deepest = other.support_point_toward(pos12, &-halfspace.normal);
    let distance = halfspace.normal.dot(&deepest.coords) - halfspace.d;

    LocalContact {
        distance,
        // From the shape above the boundary, down into the half-space.
        normal: -halfspace.normal,
        point1: deepest - *halfspace.normal * distance,
        point2: deepest,
    }
}

/// Contact between a plane and a support-mapped shape, in the plane's frame.
///
/// Unlike the half-space, the plane has no interior: a shape entirely on
/// either side is separated, and a straddling shape is pushed out through
/// whichever side is cheaper.
pub fn contact_plane_support_map<G: ?Sized + SupportMap>(
    pos12: &Isometry<Real>,
    plane: &Plane,
    other: &G,
) -> LocalContact {
    let p_low = other.support_point_toward(pos12, &-plane.normal);
    let p_high = other.support_point_toward(pos12, &plane.normal);

    let d_low = plane.normal.dot(&p_low.coords) - plane.d;
    let d_high = plane.normal.dot(&p_high.coords) - plane.d;

    if d_low >= 0.0 {
        // Entirely on the positive side.
        LocalContact {
            distance: d_low,
            normal: -plane.normal,
            point1: p_low - *plane.normal * d_low,
            point2: p_low,
        }
    } else if d_high <= 0.0 {
        // Entirely on the negative side.
        LocalContact {
            distance: -d_high,
            normal: plane.normal,
            point1: p_high - *plane.normal * d_high,
            point2: p_high,
        }
    } else if -d_low <= d_high {
        // Straddling; the overhang below the plane is smaller.
        LocalContact {
            distance: d_low,
            normal: -plane.normal,
            point1: p_low - *plane.normal * d_low,
            point2: p_low,
        }
    } else {
        LocalContact {
            distance: -d_high,
            normal: plane.normal,
            point1: p_high - *plane.normal * d_high,
            point2: p_high,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{contact_halfspace_support_map, contact_plane_support_map};
    use crate::math::{Isometry, Vector};
    use crate::shape::{Cuboid, HalfSpace, Plane};

    #[test]
    fn cuboid_above_halfspace() {
        let halfspace = HalfSpace::new(Vector::z_axis(), 0.0);
        let cuboid = Cuboid::new(Vector::repeat(0.5));

        let sep = contact_halfspace_support_map(
            &Isometry::translation(0.0, 0.0, 2.0),
            &halfspace,
            &cuboid,
        );
        assert_relative_eq!(sep.distance, 1.5, epsilon = 1.0e-9);

        let pen = contact_halfspace_support_map(
            &Isometry::translation(0.0, 0.0, 0.2),
            &halfspace,
            &cuboid,
        );
        assert_relative_eq!(pen.distance, -0.3, epsilon = 1.0e-9);
    }

    #[test]
    fn cuboid_straddling_plane() {
        // The unit cube's center sits 0.2 above the plane, so the overhang
        // below it is 0.3 deep.
        let plane = Plane::new(Vector::z_axis(), 0.0);
        let cuboid = Cuboid::new(Vector::repeat(0.5));

        let pen = contact_plane_support_map(
            &Isometry::translation(0.0, 0.0, 0.2),
            &plane,
            &cuboid,
        );
        assert_relative_eq!(pen.distance, -0.3, epsilon = 1.0e-9);
        assert_relative_eq!(pen.normal.z, -1.0, epsilon = 1.0e-9);
    }
}
