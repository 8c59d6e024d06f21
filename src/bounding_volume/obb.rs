//! Oriented bounding box.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Matrix, Point, Real, Vector};

/// An oriented bounding box: an `Aabb` subjected to a rigid transform.
///
/// Used by the collision traversals to test octree cells against rotated
/// geometry without losing tightness to the world-space re-wrap of an
/// [`Aabb`].
#[derive(Debug, Copy, Clone)]
pub struct Obb {
    /// The center of the box, in world space.
    pub center: Point<Real>,
    /// The orientation of the box; columns are the box's local axes.
    pub rot: Matrix<Real>,
    /// The half-extents of the box along its local axes.
    pub half_extents: Vector<Real>,
}

impl Obb {
    /// Builds the `Obb` of `aabb` transformed by `pos`.
    #[inline]
    pub fn from_aabb(aabb: &Aabb, pos: &Isometry<Real>) -> Self {
        Obb {
            center: pos * aabb.center(),
            rot: pos.rotation.to_rotation_matrix().into_inner(),
            half_extents: aabb.half_extents(),
        }
    }

    /// Tests whether this box and `other` overlap.
    ///
    /// Separating-axis test over the 6 face normals and the 9 edge
    /// cross-products, with an absolute epsilon guarding the near-parallel
    /// cross products.
    pub fn overlaps(&self, other: &Obb) -> bool {
        let eps = crate::math::DEFAULT_EPSILON * 100.0;

        // Rotation of `other` expressed in `self`'s frame, and its
        // element-wise absolute value inflated by `eps`.
        let rot = self.rot.transpose() * other.rot;
        let abs_rot = rot.map(|e| e.abs() + eps);

        // Translation from `self` to `other`, in `self`'s frame.
        let t = self.rot.transpose() * (other.center - self.center);

        let a = &self.half_extents;
        let b = &other.half_extents;

        // Face normals of `self`.
        for i in 0..3 {
            let ra = a[i];
            let rb = abs_rot.row(i).transpose().dot(b);
            if t[i].abs() > ra + rb {
                return false;
            }
        }

        // Face normals of `other`.
        for j in 0..3 {
            let ra = abs_rot.column(j).dot(a);
            let rb = b[j];
            if (rot.column(j).dot(&t)).abs() > ra + rb {
                return false;
            }
        }

        // Edge cross-products, axis = A_i × B_j.
        for i in 0..3 {
            let i1 = (i + 1) % 3;
            let i2 = (i + 2) % 3;

            for j in 0..3 {
                let j1 = (j + 1) % 3;
                let j2 = (j + 2) % 3;

                let ra = a[i1] * abs_rot[(i2, j)] + a[i2] * abs_rot[(i1, j)];
                let rb = b[j1] * abs_rot[(i, j2)] + b[j2] * abs_rot[(i, j1)];
                let dist = (t[i2] * rot[(i1, j)] - t[i1] * rot[(i2, j)]).abs();

                if dist > ra + rb {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod test {
    use super::Obb;
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Real, Vector};

    #[test]
    fn axis_aligned_overlap_matches_aabb() {
        let a = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point::new(1.5, 0.0, 0.0), Point::new(2.5, 1.0, 1.0));

        let id = Isometry::identity();
        let obb_a = Obb::from_aabb(&a, &id);
        let obb_b = Obb::from_aabb(&b, &id);
        assert!(!obb_a.overlaps(&obb_b));

        let shifted = Isometry::translation(-1.0, 0.0, 0.0);
        let obb_b2 = Obb::from_aabb(&b, &shifted);
        assert!(obb_a.overlaps(&obb_b2));
    }

    #[test]
    fn rotated_cube_corner_overlap() {
        // A unit cube rotated 45° around z pokes its corner past x = 0.5.
        let cube = Aabb::from_half_extents(Point::origin(), Vector::repeat(0.5));
        let rot = Isometry::rotation(Vector::z() * (std::f64::consts::FRAC_PI_4 as Real));

        let fixed = Obb::from_aabb(&cube, &Isometry::translation(1.1, 0.0, 0.0));
        let straight = Obb::from_aabb(&cube, &Isometry::identity());
        let spun = Obb::from_aabb(&cube, &rot);

        assert!(!straight.overlaps(&fixed));
        assert!(spun.overlaps(&fixed));
    }
}
