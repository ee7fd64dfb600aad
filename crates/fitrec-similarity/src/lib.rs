//! Similarity matcher: deterministic k-nearest-neighbour lookup over prior
//! users and aggregation of their outcomes.

pub mod distance;
pub mod matcher;
pub mod signal;

pub use distance::DistanceMetric;
pub use matcher::{SimilarityMatcher, DEFAULT_K};
pub use signal::{Neighbor, SimilaritySignal};
