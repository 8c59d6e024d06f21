//! The Gilbert-Johnson-Keerthi distance algorithm.

use crate::math::{Point, Real, Vector};
use crate::query::gjk::{CSOPoint, MinkowskiDiff, VoronoiSimplex};
use na::{self, Unit};
use num::Bounded;

/// The absolute tolerance used by the GJK algorithm.
pub fn eps_tol() -> Real {
    crate::math::DEFAULT_EPSILON * 10.0
}

/// The terminal states of a GJK run.
///
/// `DidNotRun` and `Running` are never observable by callers after
/// [`Gjk::evaluate`] returns; seeing them is a logic error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GjkStatus {
    /// The solver was not invoked yet.
    DidNotRun,
    /// The solver is iterating; internal only.
    Running,
    /// The shapes are separated; distance and witnesses are valid.
    NoCollision,
    /// The solver proved the distance exceeds the requested upper bound and
    /// stopped early; the exact distance was not computed.
    NoCollisionEarlyStopped,
    /// The origin is inside the Minkowski difference: the shapes overlap.
    /// Penetration information requires an EPA pass on the final simplex.
    Collision,
    /// The shapes overlap but the penetration is already known without an
    /// EPA pass. Produced by the shape-pair solver when the shape *cores*
    /// are separated and only the swept-sphere inflation (or the security
    /// margin) turns the positive core distance into an overlap.
    CollisionWithPenetrationInformation,
    /// The iteration budget was exhausted before convergence. The recorded
    /// distance and witnesses are a usable but imprecise estimate.
    Failed,
}

/// Which quantity the GJK termination predicate monitors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GjkConvergenceCriterion {
    /// Support-plane gap: terminate on `upper - lower` (the distance between
    /// the current simplex estimate and the latest support plane).
    Default,
    /// Squared-gap variant, `upper² - lower²`.
    DualityGap,
    /// Absolute predicate for the first half of the iteration budget, then
    /// the relative one.
    Hybrid,
}

/// Whether the GJK termination predicate is scaled by the current estimate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GjkConvergenceCriterionType {
    /// Compare the gap against `tolerance * upper`.
    Relative,
    /// Compare the gap against `tolerance`.
    Absolute,
}

/// The Gilbert-Johnson-Keerthi distance solver.
///
/// Owns the simplex and the termination settings; one instance can be
/// reused across queries, and two instances never share state, so distinct
/// solvers may run concurrently on different threads.
pub struct Gjk {
    /// The termination tolerance.
    pub tolerance: Real,
    /// The maximum number of iterations before the run is flagged [`GjkStatus::Failed`].
    pub max_iterations: usize,
    /// The monitored convergence quantity.
    pub convergence_criterion: GjkConvergenceCriterion,
    /// Relative or absolute thresholding of the convergence quantity.
    pub convergence_criterion_type: GjkConvergenceCriterionType,
    /// Early-exit separation bound: once the solver proves the distance
    /// exceeds this value it stops with [`GjkStatus::NoCollisionEarlyStopped`].
    pub distance_upper_bound: Real,

    status: GjkStatus,
    ray: Vector<Real>,
    distance: Real,
    simplex: VoronoiSimplex,
}

impl Gjk {
    /// Creates a solver with the given iteration budget and tolerance.
    pub fn new(max_iterations: usize, tolerance: Real) -> Self {
        Gjk {
            tolerance,
            max_iterations,
            convergence_criterion: GjkConvergenceCriterion::Default,
            convergence_criterion_type: GjkConvergenceCriterionType::Relative,
            distance_upper_bound: Real::max_value(),
            status: GjkStatus::DidNotRun,
            ray: Vector::x(),
            distance: Real::max_value(),
            simplex: VoronoiSimplex::new(),
        }
    }

    /// The status of the last run.
    #[inline]
    pub fn status(&self) -> GjkStatus {
        self.status
    }

    /// The vector from the origin to the closest point of the last simplex,
    /// i.e. `witness1 - witness2` in the first shape's frame.
    ///
    /// This is also the recommended warm-start guess for the next query on
    /// the same pair.
    #[inline]
    pub fn ray(&self) -> &Vector<Real> {
        &self.ray
    }

    /// The distance computed by the last run.
    #[inline]
    pub fn distance(&self) -> Real {
        self.distance
    }

    /// The simplex of the last run. After a [`GjkStatus::Collision`] it is a
    /// tetrahedron enclosing the origin, suitable to seed EPA.
    #[inline]
    pub fn simplex(&self) -> &VoronoiSimplex {
        &self.simplex
    }

    fn converged(&self, upper: Real, lower: Real, niter: usize) -> bool {
        use GjkConvergenceCriterion::*;
        use GjkConvergenceCriterionType::*;

        let (gap, scale) = match self.convergence_criterion {
            Default => (upper - lower, upper),
            DualityGap => (upper * upper - lower * lower.abs(), upper * upper),
            Hybrid => (upper - lower, upper),
        };

        let relative = match (self.convergence_criterion, self.convergence_criterion_type) {
            (Hybrid, _) => niter * 2 >= self.max_iterations,
            (_, Relative) => true,
            (_, Absolute) => false,
        };

        if relative {
            gap <= self.tolerance * scale
        } else {
            gap <= self.tolerance
        }
    }

    /// Runs the solver on the given Minkowski difference.
    ///
    /// `guess` is the initial search direction, in the first shape's frame;
    /// a zero guess falls back to `(1, 0, 0)`. The returned status is also
    /// stored and queryable through [`Gjk::status`], alongside the final
    /// ray, distance and simplex.
    pub fn evaluate(&mut self, md: &mut MinkowskiDiff, guess: &Vector<Real>) -> GjkStatus {
        self.status = GjkStatus::Running;
        self.distance = Real::max_value();

        let guess_dir = Unit::try_new(*guess, eps_tol()).unwrap_or(Vector::x_axis());
        self.simplex.reset(md.support_toward(&guess_dir));

        // `upper` is the distance from the origin to the current simplex: a
        // non-increasing estimate of the distance. `lower` is the distance
        // to the latest support plane: a lower bound when the shapes are
        // disjoint.
        let mut old_upper = Real::max_value();
        let mut niter = 0;

        loop {
            let proj = self.simplex.project_origin_and_reduce();
            let upper = proj.coords.norm();

            if self.simplex.dimension() == 3 {
                // The origin is enclosed by a tetrahedron.
                self.ray = na::zero();
                self.distance = 0.0;
                self.status = GjkStatus::Collision;
                return self.status;
            }

            if upper <= self.tolerance {
                // The origin lies on the simplex: the shapes overlap even
                // though the simplex may not be a full tetrahedron yet. EPA
                // completes degenerate simplices on its own.
                self.ray = proj.coords;
                self.distance = upper;
                self.status = GjkStatus::Collision;
                return self.status;
            }

            if upper >= old_upper {
                // No progress: the estimate stopped decreasing, which only
                // happens from numerical exhaustion. The previous simplex
                // state carries the best estimate.
                self.ray = proj.coords;
                self.distance = upper;
                self.status = GjkStatus::NoCollision;
                return self.status;
            }

            old_upper = upper;

            let dir = Unit::new_unchecked(-proj.coords / upper);
            let w = md.support_toward(&dir);
            let lower = -dir.dot(&w.point.coords);

            if lower > self.distance_upper_bound {
                // The support plane already separates the shapes by more
                // than the caller cares about.
                self.ray = proj.coords;
                self.distance = lower;
                self.status = GjkStatus::NoCollisionEarlyStopped;
                return self.status;
            }

            if self.converged(upper, lower, niter) {
                self.ray = proj.coords;
                self.distance = upper;
                self.status = GjkStatus::NoCollision;
                return self.status;
            }

            if !self.simplex.add_point(w) {
                // The new support point is already on the simplex: the
                // estimate cannot improve.
                self.ray = proj.coords;
                self.distance = upper;
                self.status = GjkStatus::NoCollision;
                return self.status;
            }

            niter += 1;

            if niter >= self.max_iterations {
                self.ray = proj.coords;
                self.distance = upper;
                self.status = GjkStatus::Failed;
                return self.status;
            }
        }
    }

    /// The witness points realised by the last simplex, in the first
    /// shape's frame, and the unit separation axis pointing from the second
    /// shape toward the first (`None` when the shapes overlap deeply and the
    /// ray is degenerate).
    pub fn witnesses(&self) -> (Point<Real>, Point<Real>, Option<Unit<Vector<Real>>>) {
        let mut p1 = Point::origin();
        let mut p2 = Point::origin();

        for i in 0..self.simplex.dimension() + 1 {
            let coord = self.simplex.proj_coord(i);
            let point = self.simplex.point(i);
            p1 += point.orig1.coords * coord;
            p2 += point.orig2.coords * coord;
        }

        (p1, p2, Unit::try_new(self.ray, eps_tol()))
    }
}

#[cfg(test)]
mod test {
    use super::{Gjk, GjkStatus};
    use crate::math::{Isometry, Vector};
    use crate::query::gjk::MinkowskiDiff;
    use crate::shape::Shape;

    #[test]
    fn disjoint_balls_distance() {
        let b1 = Shape::ball(1.0);
        let b2 = Shape::ball(1.0);
        let pos12 = Isometry::translation(3.0, 0.0, 0.0);

        let mut md = MinkowskiDiff::new(b1.kind(), b2.kind(), pos12, [0, 0]).unwrap();
        let mut gjk = Gjk::new(128, 1.0e-6);

        let status = gjk.evaluate(&mut md, &Vector::x());
        assert_eq!(status, GjkStatus::NoCollision);
        assert_relative_eq!(gjk.distance(), 1.0, epsilon = 1.0e-6);

        let (p1, p2, axis) = gjk.witnesses();
        assert_relative_eq!(p1.x, 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(p2.x, 2.0, epsilon = 1.0e-6);
        assert!(axis.unwrap().x < 0.0);
    }

    #[test]
    fn overlapping_balls_collide() {
        let b1 = Shape::ball(1.0);
        let b2 = Shape::ball(1.0);
        let pos12 = Isometry::translation(1.5, 0.0, 0.0);

        let mut md = MinkowskiDiff::new(b1.kind(), b2.kind(), pos12, [0, 0]).unwrap();
        let mut gjk = Gjk::new(128, 1.0e-6);

        let status = gjk.evaluate(&mut md, &Vector::x());
        assert!(matches!(
            status,
            GjkStatus::Collision | GjkStatus::CollisionWithPenetrationInformation
        ));
    }

    #[test]
    fn early_stop_on_distance_upper_bound() {
        let b1 = Shape::ball(1.0);
        let b2 = Shape::ball(1.0);
        let pos12 = Isometry::translation(50.0, 0.0, 0.0);

        let mut md = MinkowskiDiff::new(b1.kind(), b2.kind(), pos12, [0, 0]).unwrap();
        let mut gjk = Gjk::new(128, 1.0e-6);
        gjk.distance_upper_bound = 10.0;

        let status = gjk.evaluate(&mut md, &Vector::x());
        assert_eq!(status, GjkStatus::NoCollisionEarlyStopped);
        assert!(gjk.distance() > 10.0);
    }
}
