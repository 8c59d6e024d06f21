//! The GJK algorithm for distance computation.

pub use self::cso_point::{CSOPoint, MinkowskiDiff};
pub use self::gjk::{
    eps_tol, Gjk, GjkConvergenceCriterion, GjkConvergenceCriterionType, GjkStatus,
};
pub use self::voronoi_simplex::VoronoiSimplex;

mod cso_point;
mod gjk;
mod voronoi_simplex;
