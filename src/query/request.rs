//! Query requests and results exchanged with the collision and distance
//! entry points.

use crate::math::{Point, Real, UnitVector, Vector};
use crate::query::gjk::{GjkConvergenceCriterion, GjkConvergenceCriterionType};
use num::Bounded;

/// How the GJK initial search direction is chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GjkInitialGuess {
    /// Start from `(1, 0, 0)`.
    DefaultGuess,
    /// Start from the guess cached by a previous query on the same pair
    /// (`cached_gjk_guess` / `cached_support_func_guess`).
    CachedGuess,
    /// Start from the vector separating the two shapes' local bounding-box
    /// centers. Fails with
    /// [`QueryError::MissingLocalBoundingVolume`](crate::query::QueryError)
    /// if a shape is unbounded.
    BoundingVolumeGuess,
}

/// The GJK iteration flavor.
///
/// Only the textbook iteration is implemented; the enum exists so requests
/// carry the choice explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GjkVariant {
    /// The default GJK iteration.
    DefaultGjk,
}

/// Solver tuning shared by collision and distance requests.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueryRequest {
    /// How the GJK initial direction is chosen.
    pub gjk_initial_guess: GjkInitialGuess,
    /// The GJK iteration flavor.
    pub gjk_variant: GjkVariant,
    /// The GJK convergence tolerance.
    pub gjk_tolerance: Real,
    /// The GJK iteration budget.
    pub gjk_max_iterations: usize,
    /// The quantity monitored by the GJK termination predicate.
    pub gjk_convergence_criterion: GjkConvergenceCriterion,
    /// Relative or absolute thresholding of that quantity.
    pub gjk_convergence_criterion_type: GjkConvergenceCriterionType,
    /// The EPA convergence tolerance.
    pub epa_tolerance: Real,
    /// The EPA iteration budget; also bounds the polytope arenas.
    pub epa_max_iterations: usize,
    /// The warm-start direction used by [`GjkInitialGuess::CachedGuess`].
    pub cached_gjk_guess: Vector<Real>,
    /// The warm-start support-function hints (convex polyhedra vertex
    /// indices) used by [`GjkInitialGuess::CachedGuess`].
    pub cached_support_func_guess: [u32; 2],
}

impl Default for QueryRequest {
    fn default() -> Self {
        QueryRequest {
            gjk_initial_guess: GjkInitialGuess::DefaultGuess,
            gjk_variant: GjkVariant::DefaultGjk,
            gjk_tolerance: 1.0e-6,
            gjk_max_iterations: 128,
            gjk_convergence_criterion: GjkConvergenceCriterion::Default,
            gjk_convergence_criterion_type: GjkConvergenceCriterionType::Relative,
            epa_tolerance: 1.0e-6,
            epa_max_iterations: 64,
            cached_gjk_guess: Vector::x(),
            cached_support_func_guess: [0, 0],
        }
    }
}

/// Parameters of a collision query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionRequest {
    /// Solver tuning.
    pub base: QueryRequest,
    /// The maximum number of contacts appended to the result.
    pub num_max_contacts: usize,
    /// Report every contact found instead of unwinding once
    /// `num_max_contacts` is reached.
    pub exhaustive: bool,
    /// Compute contact points, normal and penetration depth; when `false`
    /// only the existence of the contact is reported.
    pub enable_contact: bool,
    /// Keep the smallest separation seen across the query in
    /// [`CollisionResult::distance_lower_bound`].
    pub enable_distance_lower_bound: bool,
    /// Inflation of the acceptance band: contacts are reported at
    /// separations up to this value.
    pub security_margin: Real,
    /// Separation above which a pair is dropped without refining the
    /// distance further.
    pub break_distance: Real,
    /// Asks GJK to stop early once the separation provably exceeds this.
    pub distance_upper_bound: Real,
}

impl Default for CollisionRequest {
    fn default() -> Self {
        CollisionRequest {
            base: QueryRequest::default(),
            num_max_contacts: 1,
            exhaustive: false,
            enable_contact: true,
            enable_distance_lower_bound: false,
            security_margin: 0.0,
            break_distance: 1.0e-3,
            distance_upper_bound: Real::max_value(),
        }
    }
}

/// Index value used when a contact side has no primitive subdivision.
pub const CONTACT_PRIMITIVE_NONE: i32 = -1;

/// Geometric description of a single contact.
///
/// The geometry identities are implied by the argument order of the query
/// that produced this contact; `b1`/`b2` locate the primitive within each
/// geometry: the arena index of the octree leaf cell, the triangle index of
/// a mesh, or [`CONTACT_PRIMITIVE_NONE`] for plain shapes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contact {
    /// The primitive index within the first geometry.
    pub b1: i32,
    /// The primitive index within the second geometry.
    pub b2: i32,
    /// The contact position, in world space, midway between the witnesses.
    pub pos: Point<Real>,
    /// The contact normal, in world space, pointing from the second
    /// geometry toward the first.
    pub normal: UnitVector<Real>,
    /// The penetration depth; negative when the contact was accepted by a
    /// positive security margin while the shapes are still separated.
    pub penetration_depth: Real,
    /// The witness points on each geometry, in world space.
    pub nearest_points: [Point<Real>; 2],
}

/// The outcome of a collision query.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionResult {
    /// The contacts found, at most `num_max_contacts` of them unless the
    /// request was exhaustive.
    pub contacts: Vec<Contact>,
    /// A lower bound on the separation distance of the pair, when the
    /// request enabled it and no contact was found.
    pub distance_lower_bound: Real,
    /// Warm-start direction to feed to the next query on the same pair.
    pub cached_gjk_guess: Vector<Real>,
    /// Warm-start support hints to feed to the next query on the same pair.
    pub cached_support_func_guess: [u32; 2],
}

impl Default for CollisionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResult {
    /// An empty result.
    pub fn new() -> Self {
        CollisionResult {
            contacts: Vec::new(),
            distance_lower_bound: Real::max_value(),
            cached_gjk_guess: Vector::x(),
            cached_support_func_guess: [0, 0],
        }
    }

    /// Whether at least one contact was found.
    #[inline]
    pub fn is_collision(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// The number of contacts found.
    #[inline]
    pub fn num_contacts(&self) -> usize {
        self.contacts.len()
    }

    /// Appends a contact to this result.
    #[inline]
    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Folds a separation distance into the lower bound.
    #[inline]
    pub fn update_distance_lower_bound(&mut self, distance: Real) {
        if distance < self.distance_lower_bound {
            self.distance_lower_bound = distance;
        }
    }

    /// Clears the result for reuse.
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.distance_lower_bound = Real::max_value();
    }
}

/// Parameters of a distance query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceRequest {
    /// Solver tuning.
    pub base: QueryRequest,
    /// Compute the witness points realising the distance.
    pub enable_nearest_points: bool,
    /// Run EPA on overlap so the returned distance is the negative
    /// penetration depth instead of zero.
    pub enable_signed_distance: bool,
    /// Relative error accepted on the distance, mapped on the GJK relative
    /// convergence predicate.
    pub rel_err: Real,
    /// Absolute error accepted on the distance, mapped on the GJK absolute
    /// convergence predicate; used when `rel_err` is zero.
    pub abs_err: Real,
}

impl Default for DistanceRequest {
    fn default() -> Self {
        DistanceRequest {
            base: QueryRequest::default(),
            enable_nearest_points: true,
            enable_signed_distance: true,
            rel_err: 0.0,
            abs_err: 0.0,
        }
    }
}

/// The outcome of a distance query.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceResult {
    /// The distance between the two geometries, negative on overlap when
    /// signed distances were requested.
    pub min_distance: Real,
    /// The separation axis, in world space, pointing from the second
    /// geometry toward the first; `None` when the shapes overlap so deeply
    /// that no axis was recovered.
    pub normal: Option<UnitVector<Real>>,
    /// The witness points, in world space.
    pub nearest_points: [Point<Real>; 2],
    /// The primitive index within the first geometry realising the
    /// distance, [`CONTACT_PRIMITIVE_NONE`] for plain shapes.
    pub b1: i32,
    /// The primitive index within the second geometry realising the
    /// distance.
    pub b2: i32,
    /// Warm-start direction to feed to the next query on the same pair.
    pub cached_gjk_guess: Vector<Real>,
    /// Warm-start support hints to feed to the next query on the same pair.
    pub cached_support_func_guess: [u32; 2],
}

impl Default for DistanceResult {
    fn default() -> Self {
        DistanceResult {
            min_distance: Real::max_value(),
            normal: None,
            nearest_points: [Point::origin(); 2],
            b1: CONTACT_PRIMITIVE_NONE,
            b2: CONTACT_PRIMITIVE_NONE,
            cached_gjk_guess: Vector::x(),
            cached_support_func_guess: [0, 0],
        }
    }
}
