use crate::math::{Real, UnitVector};

/// A half-space delimited by the plane with outward normal `normal` and
/// offset `d`: the set of points `x` with `normal · x ≤ d`.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HalfSpace {
    /// The outward normal of the half-space boundary.
    pub normal: UnitVector<Real>,
    /// The signed offset of the boundary plane along the normal.
    pub d: Real,
}

impl HalfSpace {
    /// Creates a new half-space from its boundary plane.
    #[inline]
    pub fn new(normal: UnitVector<Real>, d: Real) -> HalfSpace {
        HalfSpace { normal, d }
    }
}

/// An infinite plane with normal `normal` and offset `d`: the set of points
/// `x` with `normal · x = d`.
///
/// Unlike [`HalfSpace`], a plane has no interior side: both half-spaces it
/// delimits are outside of the shape.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    /// The normal of the plane.
    pub normal: UnitVector<Real>,
    /// The signed offset of the plane along its normal.
    pub d: Real,
}

impl Plane {
    /// Creates a new plane from its normal and offset.
    #[inline]
    pub fn new(normal: UnitVector<Real>, d: Real) -> Plane {
        Plane { normal, d }
    }
}
