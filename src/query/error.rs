use core::fmt;

/// Fatal query failures.
///
/// Numerical trouble (convergence failure, capacity exhaustion, geometric
/// degeneracy) is *not* reported here: the solvers flag it on their status
/// and still return best-effort results. `QueryError` is reserved for
/// contract violations that make the query meaningless.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum QueryError {
    /// The query is not supported between these two shapes.
    Unsupported,
    /// `GjkInitialGuess::BoundingVolumeGuess` was requested but one of the
    /// shapes has no local bounding volume (half-spaces and planes are
    /// unbounded).
    MissingLocalBoundingVolume,
    /// A solver status was still `DidNotRun` after a call, which indicates a
    /// logic error in the solver driving code.
    NeverRan,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Unsupported => f.pad("query not supported between these shapes"),
            QueryError::MissingLocalBoundingVolume => {
                f.pad("the shape has no local bounding volume to derive an initial guess from")
            }
            QueryError::NeverRan => f.pad("a solver reported `DidNotRun` after being invoked"),
        }
    }
}

impl std::error::Error for QueryError {}
