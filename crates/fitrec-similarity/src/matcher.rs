use fitrec_core::config::SimilarityConfig;
use fitrec_core::{FeatureVector, FitError, Population, Result};
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::distance::DistanceMetric;
use crate::signal::{Neighbor, SimilaritySignal};

pub const DEFAULT_K: usize = 10;

/// Brute-force k-nearest-neighbour search over a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityMatcher {
    k: usize,
    metric: DistanceMetric,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self { k: DEFAULT_K, metric: DistanceMetric::default() }
    }
}

impl SimilarityMatcher {
    pub fn new(k: usize, metric: DistanceMetric) -> Result<Self> {
        if k == 0 {
            return Err(FitError::Config("similarity k must be at least 1".into()));
        }
        Ok(Self { k, metric })
    }

    pub fn from_config(config: &SimilarityConfig) -> Result<Self> {
        Self::new(config.k, DistanceMetric::parse(&config.metric)?)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// The k closest records ordered by (distance, insertion index).
    ///
    /// A query from another encoder version or dimension is not comparable
    /// with the stored vectors and selects nothing.
    pub fn nearest(&self, query: &FeatureVector, population: &Population) -> Vec<Neighbor> {
        if population.is_empty() {
            return Vec::new();
        }
        if query.version != population.encoder_version() || query.dim() != population.dimension() {
            warn!(
                query_version = query.version,
                population_version = population.encoder_version(),
                query_dim = query.dim(),
                population_dim = population.dimension(),
                "query not comparable with population, skipping similarity"
            );
            return Vec::new();
        }

        let q = query.as_slice();
        let mut scored: Vec<(OrderedFloat<f64>, usize)> = population
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| (OrderedFloat(self.metric.distance(q, r.features.as_slice())), i))
            .collect();

        let k = self.k.min(scored.len());
        if k < scored.len() {
            scored.select_nth_unstable(k - 1);
            scored.truncate(k);
        }
        scored.sort_unstable();

        let records = population.records();
        scored
            .into_iter()
            .map(|(d, i)| Neighbor { index: i, distance: d.into_inner(), outcome: records[i].outcome })
            .collect()
    }

    /// Nearest neighbours aggregated by outcome frequency.
    pub fn similar_outcomes(&self, query: &FeatureVector, population: &Population) -> SimilaritySignal {
        let signal = SimilaritySignal::from_neighbors(self.nearest(query, population));
        debug!(
            neighbors = signal.len(),
            dominant = ?signal.dominant,
            mean_distance = signal.mean_distance,
            "similarity search"
        );
        signal
    }
}
