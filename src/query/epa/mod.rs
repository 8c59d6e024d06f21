//! The EPA algorithm for penetration depth computation.

pub use self::epa::{Epa, EpaStatus};

mod epa;
