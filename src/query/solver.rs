//! The shape-pair solver: analytic dispatch, GJK → EPA driving, swept-sphere
//! correction and warm-start plumbing.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::details::{self, LocalContact};
use crate::query::epa::{Epa, EpaStatus};
use crate::query::gjk::{Gjk, GjkStatus, MinkowskiDiff};
use crate::query::request::{
    CollisionRequest, CollisionResult, Contact, DistanceRequest, DistanceResult, GjkInitialGuess,
    QueryRequest, CONTACT_PRIMITIVE_NONE,
};
use crate::query::QueryError;
use crate::shape::{Shape, ShapeKind};
use na;
use num::Bounded;

/// The outcome of a single shape-pair query, in world space.
#[derive(Copy, Clone, Debug)]
pub struct ShapeContact {
    /// The signed distance between the shapes (swept-sphere radii applied):
    /// positive separation, negative penetration.
    pub distance: Real,
    /// The separation axis, pointing from the second shape toward the
    /// first; `None` when the shapes overlap deeply and penetration
    /// information was not requested.
    pub normal: Option<UnitVector<Real>>,
    /// The witness point on the first shape.
    pub point1: Point<Real>,
    /// The witness point on the second shape.
    pub point2: Point<Real>,
    /// The narrow-phase verdict, using the GJK status vocabulary.
    pub status: GjkStatus,
    /// The EPA verdict, `None` when EPA did not need to run.
    pub epa_status: Option<EpaStatus>,
}

/// A narrow-phase solver instance.
///
/// Owns all iteration scratch state (simplex, expanding polytope, warm-start
/// caches), so a single instance is re-entrant per query but two instances
/// never share anything and may run on different threads.
pub struct ShapePairSolver {
    /// The GJK engine.
    pub gjk: Gjk,
    /// The EPA engine.
    pub epa: Epa,
    /// How the GJK initial direction is chosen.
    pub gjk_initial_guess: GjkInitialGuess,
    /// The cached warm-start direction, updated after every iterative query
    /// when `gjk_initial_guess` is [`GjkInitialGuess::CachedGuess`].
    pub cached_gjk_guess: Vector<Real>,
    /// The cached support-function hints.
    pub cached_support_func_guess: [u32; 2],
}

impl Default for ShapePairSolver {
    fn default() -> Self {
        Self::from_query_request(&QueryRequest::default())
    }
}

impl ShapePairSolver {
    /// Creates a solver configured by the given request.
    pub fn from_query_request(req: &QueryRequest) -> Self {
        let mut gjk = Gjk::new(req.gjk_max_iterations, req.gjk_tolerance);
        gjk.convergence_criterion = req.gjk_convergence_criterion;
        gjk.convergence_criterion_type = req.gjk_convergence_criterion_type;

        ShapePairSolver {
            gjk,
            epa: Epa::new(req.epa_max_iterations, req.epa_tolerance),
            gjk_initial_guess: req.gjk_initial_guess,
            cached_gjk_guess: req.cached_gjk_guess,
            cached_support_func_guess: req.cached_support_func_guess,
        }
    }

    /// Creates a solver configured for a distance request, mapping its
    /// error bounds on the GJK termination predicate.
    pub fn from_distance_request(req: &DistanceRequest) -> Self {
        use crate::query::gjk::GjkConvergenceCriterionType::*;

        let mut solver = Self::from_query_request(&req.base);

        if req.rel_err > 0.0 {
            solver.gjk.tolerance = req.rel_err;
            solver.gjk.convergence_criterion_type = Relative;
        } else if req.abs_err > 0.0 {
            solver.gjk.tolerance = req.abs_err;
            solver.gjk.convergence_criterion_type = Absolute;
        }

        solver
    }

    fn initial_guess(
        &self,
        s1: &Shape,
        s2: &Shape,
        pos12: &Isometry<Real>,
    ) -> Result<Vector<Real>, QueryError> {
        match self.gjk_initial_guess {
            GjkInitialGuess::DefaultGuess => Ok(Vector::x()),
            GjkInitialGuess::CachedGuess => Ok(self.cached_gjk_guess),
            GjkInitialGuess::BoundingVolumeGuess => {
                let aabb1 = s1
                    .kind()
                    .compute_local_aabb()
                    .ok_or(QueryError::MissingLocalBoundingVolume)?;
                let aabb2 = s2
                    .kind()
                    .compute_local_aabb()
                    .ok_or(QueryError::MissingLocalBoundingVolume)?;

                // The ray GJK converges to is `witness1 - witness2`; the
                // center separation approximates it.
                Ok(aabb1.center() - pos12 * aabb2.center())
            }
        }
    }

    /// Computes the contact between two shapes placed in world space.
    ///
    /// When `need_penetration` is `false` and the shape cores overlap
    /// deeply, the query stops at the verdict: the returned distance is
    /// zero and the normal is absent.
    pub fn contact(
        &mut self,
        s1: &Shape,
        tf1: &Isometry<Real>,
        s2: &Shape,
        tf2: &Isometry<Real>,
        need_penetration: bool,
    ) -> Result<ShapeContact, QueryError> {
        let pos12 = tf1.inv_mul(tf2);

        let mut result = match analytic_contact(&pos12, s1.kind(), s2.kind())? {
            Some(local) => ShapeContact {
                distance: local.distance,
                normal: Some(local.normal),
                point1: local.point1,
                point2: local.point2,
                status: if local.distance > 0.0 {
                    GjkStatus::NoCollision
                } else {
                    GjkStatus::CollisionWithPenetrationInformation
                },
                epa_status: None,
            },
            None => self.iterative_contact(s1, s2, &pos12, need_penetration)?,
        };

        // Swept-sphere correction: the solvers above saw the cores only.
        let ssr1 = s1.swept_sphere_radius();
        let ssr2 = s2.swept_sphere_radius();

        if ssr1 > 0.0 || ssr2 > 0.0 {
            if let Some(normal) = result.normal {
                let was_separated = result.distance > 0.0;

                result.point1 -= *normal * ssr1;
                result.point2 += *normal * ssr2;
                result.distance -= ssr1 + ssr2;

                if was_separated && result.distance <= 0.0 {
                    // Only the inflation overlaps; the cores are separated
                    // so the penetration is exactly known without EPA.
                    result.status = GjkStatus::CollisionWithPenetrationInformation;
                }
            } else {
                result.distance -= ssr1 + ssr2;
            }
        }

        // Back to world space.
        result.point1 = tf1 * result.point1;
        result.point2 = tf1 * result.point2;
        result.normal = result.normal.map(|n| tf1 * n);

        Ok(result)
    }

    fn iterative_contact(
        &mut self,
        s1: &Shape,
        s2: &Shape,
        pos12: &Isometry<Real>,
        need_penetration: bool,
    ) -> Result<ShapeContact, QueryError> {
        let guess = self.initial_guess(s1, s2, pos12)?;
        let hints = match self.gjk_initial_guess {
            GjkInitialGuess::CachedGuess => self.cached_support_func_guess,
            _ => [0, 0],
        };

        let mut md = MinkowskiDiff::new(s1.kind(), s2.kind(), *pos12, hints)?;
        let gjk_status = self.gjk.evaluate(&mut md, &guess);

        let result = match gjk_status {
            GjkStatus::DidNotRun | GjkStatus::Running => return Err(QueryError::NeverRan),

            GjkStatus::NoCollision
            | GjkStatus::NoCollisionEarlyStopped
            | GjkStatus::Failed
            | GjkStatus::CollisionWithPenetrationInformation => {
                let (point1, point2, normal) = self.gjk.witnesses();

                ShapeContact {
                    distance: self.gjk.distance(),
                    normal,
                    point1,
                    point2,
                    status: gjk_status,
                    epa_status: None,
                }
            }

            GjkStatus::Collision => {
                if !need_penetration {
                    ShapeContact {
                        distance: 0.0,
                        normal: None,
                        point1: Point::origin(),
                        point2: Point::origin(),
                        status: gjk_status,
                        epa_status: None,
                    }
                } else {
                    let epa_status = self.epa.evaluate(&mut md, self.gjk.simplex());

                    if matches!(epa_status, EpaStatus::DidNotRun | EpaStatus::Running) {
                        return Err(QueryError::NeverRan);
                    }

                    let (point1, point2) = self.epa.witnesses();

                    ShapeContact {
                        distance: -self.epa.depth(),
                        normal: Some(*self.epa.normal()),
                        point1,
                        point2,
                        status: gjk_status,
                        epa_status: Some(epa_status),
                    }
                }
            }
        };

        // Warm-start write-back.
        if self.gjk_initial_guess == GjkInitialGuess::CachedGuess {
            let ray = *self.gjk.ray();
            if ray.norm_squared() > 0.0 {
                self.cached_gjk_guess = ray;
            }
            self.cached_support_func_guess = md.hints();
        }

        Ok(result)
    }
}

// The analytic specializations; `Ok(None)` falls back to the iterative path.
fn analytic_contact(
    pos12: &Isometry<Real>,
    k1: &ShapeKind,
    k2: &ShapeKind,
) -> Result<Option<LocalContact>, QueryError> {
    use ShapeKind::*;

    let contact = match (k1, k2) {
        (Ball(b1), Ball(b2)) => Some(details::contact_ball_ball(pos12, b1, b2)),

        (Ball(b), Cuboid(c)) => Some(details::contact_ball_point_query(pos12, b, c)),
        (Cuboid(c), Ball(b)) => Some(mirrored(pos12, |p21| {
            details::contact_ball_point_query(p21, b, c)
        })),
        (Ball(b), Capsule(c)) => Some(details::contact_ball_point_query(pos12, b, c)),
        (Capsule(c), Ball(b)) => Some(mirrored(pos12, |p21| {
            details::contact_ball_point_query(p21, b, c)
        })),
        (Ball(b), Cylinder(c)) => Some(details::contact_ball_point_query(pos12, b, c)),
        (Cylinder(c), Ball(b)) => Some(mirrored(pos12, |p21| {
            details::contact_ball_point_query(p21, b, c)
        })),
        (Ball(b), Triangle(t)) => Some(details::contact_ball_point_query(pos12, b, t)),
        (Triangle(t), Ball(b)) => Some(mirrored(pos12, |p21| {
            details::contact_ball_point_query(p21, b, t)
        })),

        (Capsule(c1), Capsule(c2)) => Some(details::contact_capsule_capsule(pos12, c1, c2)),
        (Triangle(t1), Triangle(t2)) => Some(details::contact_triangle_triangle(pos12, t1, t2)),

        (HalfSpace(_) | Plane(_), HalfSpace(_) | Plane(_)) => {
            return Err(QueryError::Unsupported)
        }

        (HalfSpace(h), other) => {
            let sm = other.as_support_map().ok_or(QueryError::Unsupported)?;
            Some(details::contact_halfspace_support_map(pos12, h, sm))
        }
        (other, HalfSpace(h)) => {
            let sm = other.as_support_map().ok_or(QueryError::Unsupported)?;
            Some(mirrored(pos12, |p21| {
                details::contact_halfspace_support_map(p21, h, sm)
            }))
        }
        (Plane(p), other) => {
            let sm = other.as_support_map().ok_or(QueryError::Unsupported)?;
            Some(details::contact_plane_support_map(pos12, p, sm))
        }
        (other, Plane(p)) => {
            let sm = other.as_support_map().ok_or(QueryError::Unsupported)?;
            Some(mirrored(pos12, |p21| {
                details::contact_plane_support_map(p21, p, sm)
            }))
        }

        _ => None,
    };

    Ok(contact)
}

// Runs an analytic solver with the shape roles swapped and restores the
// caller's ordering and frame.
fn mirrored(
    pos12: &Isometry<Real>,
    f: impl FnOnce(&Isometry<Real>) -> LocalContact,
) -> LocalContact {
    f(&pos12.inverse()).swapped(pos12)
}

/// Computes the collision between two shapes, appending contacts to `result`.
///
/// Returns whether the shapes collide (within the request's security
/// margin).
pub fn collide(
    s1: &Shape,
    tf1: &Isometry<Real>,
    s2: &Shape,
    tf2: &Isometry<Real>,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<bool, QueryError> {
    let mut solver = ShapePairSolver::from_query_request(&request.base);
    solver.gjk.distance_upper_bound = request.distance_upper_bound;

    // Without a caller-provided bound, and when no exact lower bound is
    // wanted, there is no point refining a separation beyond the margin:
    // the pair cannot produce a contact past `security_margin`, and
    // `break_distance` is the slack before giving up on it.
    if !request.enable_distance_lower_bound
        && request.distance_upper_bound == Real::max_value()
    {
        solver.gjk.distance_upper_bound = request.security_margin + request.break_distance;
    }

    let collides = collide_with_solver(&mut solver, s1, tf1, s2, tf2, request, result)?;

    result.cached_gjk_guess = solver.cached_gjk_guess;
    result.cached_support_func_guess = solver.cached_support_func_guess;

    Ok(collides)
}

pub(crate) fn collide_with_solver(
    solver: &mut ShapePairSolver,
    s1: &Shape,
    tf1: &Isometry<Real>,
    s2: &Shape,
    tf2: &Isometry<Real>,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<bool, QueryError> {
    let contact = solver.contact(s1, tf1, s2, tf2, request.enable_contact)?;
    let collides = contact.distance <= request.security_margin;

    if collides {
        if result.num_contacts() < request.num_max_contacts || request.exhaustive {
            result.add_contact(make_contact(
                CONTACT_PRIMITIVE_NONE,
                CONTACT_PRIMITIVE_NONE,
                &contact,
                request,
            ));
        }
    } else if request.enable_distance_lower_bound {
        result.update_distance_lower_bound(contact.distance - request.security_margin);
    }

    Ok(collides)
}

pub(crate) fn make_contact(
    b1: i32,
    b2: i32,
    contact: &ShapeContact,
    request: &CollisionRequest,
) -> Contact {
    let normal = contact.normal.unwrap_or(Vector::x_axis());
    let pos = na::center(&contact.point1, &contact.point2);

    if request.enable_contact {
        Contact {
            b1,
            b2,
            pos,
            normal,
            penetration_depth: -contact.distance,
            nearest_points: [contact.point1, contact.point2],
        }
    } else {
        // Only the existence of the contact is meaningful.
        Contact {
            b1,
            b2,
            pos: Point::origin(),
            normal: Vector::x_axis(),
            penetration_depth: 0.0,
            nearest_points: [Point::origin(); 2],
        }
    }
}

/// Computes the distance between two shapes placed in world space.
///
/// The returned value is also written to `result.min_distance`; it is
/// negative on overlap when the request enabled signed distances.
pub fn distance(
    s1: &Shape,
    tf1: &Isometry<Real>,
    s2: &Shape,
    tf2: &Isometry<Real>,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<Real, QueryError> {
    let mut solver = ShapePairSolver::from_distance_request(request);

    let contact = solver.contact(s1, tf1, s2, tf2, request.enable_signed_distance)?;

    result.min_distance = if request.enable_signed_distance {
        contact.distance
    } else {
        contact.distance.max(0.0)
    };
    result.normal = contact.normal;

    if request.enable_nearest_points {
        result.nearest_points = [contact.point1, contact.point2];
    }

    result.b1 = CONTACT_PRIMITIVE_NONE;
    result.b2 = CONTACT_PRIMITIVE_NONE;
    result.cached_gjk_guess = solver.cached_gjk_guess;
    result.cached_support_func_guess = solver.cached_support_func_guess;

    Ok(result.min_distance)
}

#[cfg(test)]
mod test {
    use super::{collide, distance};
    use crate::math::{Isometry, Point, Vector};
    use crate::query::request::{CollisionRequest, CollisionResult, DistanceRequest, DistanceResult};
    use crate::shape::Shape;

    #[test]
    fn ball_ball_matches_gjk_path() {
        // The same pair solved analytically (balls) and iteratively
        // (ellipsoids with equal radii) must agree within tolerance.
        let ball = Shape::ball(1.0);
        let ellipsoid = Shape::ellipsoid(Vector::repeat(1.0));
        let tf1 = Isometry::identity();
        let tf2 = Isometry::translation(3.0, 0.5, -0.25);

        let req = DistanceRequest::default();
        let mut res_a = DistanceResult::default();
        let mut res_b = DistanceResult::default();

        let d_analytic = distance(&ball, &tf1, &ball, &tf2, &req, &mut res_a).unwrap();
        let d_iterative = distance(&ellipsoid, &tf1, &ellipsoid, &tf2, &req, &mut res_b).unwrap();

        assert_relative_eq!(d_analytic, d_iterative, epsilon = 1.0e-5);
    }

    #[test]
    fn box_plane_penetration() {
        let cube = Shape::cuboid(0.5, 0.5, 0.5);
        let plane = Shape::plane(Vector::z_axis(), 0.0);

        // Plane at z = -0.2 in the cube's frame.
        let tf1 = Isometry::identity();
        let tf2 = Isometry::translation(0.0, 0.0, -0.2);

        let req = CollisionRequest::default();
        let mut res = CollisionResult::new();
        let hit = collide(&cube, &tf1, &plane, &tf2, &req, &mut res).unwrap();

        assert!(hit);
        let contact = &res.contacts[0];
        assert_relative_eq!(contact.penetration_depth, 0.3, epsilon = 1.0e-9);
        assert_relative_eq!(contact.normal.z, 1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn swept_sphere_correction() {
        // Two points inflated by swept-sphere radii behave like balls.
        let b1 = Shape::ball(1.0e-12).with_swept_sphere_radius(1.0);
        let b2 = Shape::ball(1.0e-12).with_swept_sphere_radius(1.0);
        let tf1 = Isometry::identity();
        let tf2 = Isometry::translation(3.0, 0.0, 0.0);

        let req = DistanceRequest::default();
        let mut res = DistanceResult::default();
        let d = distance(&b1, &tf1, &b2, &tf2, &req, &mut res).unwrap();

        assert_relative_eq!(d, 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(res.nearest_points[0], Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-6);
        assert_relative_eq!(res.nearest_points[1], Point::new(2.0, 0.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn symmetry_of_distance() {
        let capsule = Shape::capsule(
            Point::new(-0.5, 0.0, 0.0),
            Point::new(0.5, 0.0, 0.0),
            0.1,
        );
        let cube = Shape::cuboid(0.4, 0.4, 0.4);
        let tf1 = Isometry::translation(0.0, 2.0, 0.0);
        let tf2 = Isometry::rotation(Vector::z() * 0.3);

        let req = DistanceRequest::default();
        let mut res12 = DistanceResult::default();
        let mut res21 = DistanceResult::default();

        let d12 = distance(&capsule, &tf1, &cube, &tf2, &req, &mut res12).unwrap();
        let d21 = distance(&cube, &tf2, &capsule, &tf1, &req, &mut res21).unwrap();

        assert_relative_eq!(d12, d21, epsilon = 1.0e-5);

        let n12 = res12.normal.unwrap();
        let n21 = res21.normal.unwrap();
        assert_relative_eq!(*n12, -*n21, epsilon = 1.0e-4);
    }
}
