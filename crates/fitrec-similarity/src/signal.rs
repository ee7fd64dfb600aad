use fitrec_core::Goal;
use serde::{Deserialize, Serialize};

/// One selected population record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Insertion index in the population.
    pub index: usize,
    pub distance: f64,
    pub outcome: Goal,
}

/// Aggregated outcomes of the k nearest population records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilaritySignal {
    /// Nearest first; ties in insertion order.
    pub neighbors: Vec<Neighbor>,
    /// Share of neighbours per goal, indexed by `Goal::index`. All zero when
    /// there are no neighbours.
    pub outcome_distribution: [f64; Goal::COUNT],
    /// Most frequent outcome. Ties go to the goal of the nearest neighbour.
    pub dominant: Option<Goal>,
    pub mean_distance: f64,
}

impl SimilaritySignal {
    pub fn empty() -> Self {
        Self {
            neighbors: Vec::new(),
            outcome_distribution: [0.0; Goal::COUNT],
            dominant: None,
            mean_distance: 0.0,
        }
    }

    pub fn from_neighbors(neighbors: Vec<Neighbor>) -> Self {
        if neighbors.is_empty() {
            return Self::empty();
        }
        let mut counts = [0usize; Goal::COUNT];
        for n in &neighbors {
            counts[n.outcome.index()] += 1;
        }
        let total = neighbors.len() as f64;
        let outcome_distribution = counts.map(|c| c as f64 / total);

        let best = counts.iter().copied().max().unwrap_or(0);
        let dominant = neighbors
            .iter()
            .map(|n| n.outcome)
            .find(|g| counts[g.index()] == best);

        let mean_distance = neighbors.iter().map(|n| n.distance).sum::<f64>() / total;

        Self { neighbors, outcome_distribution, dominant, mean_distance }
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Share of neighbours whose outcome is `goal`.
    pub fn frequency(&self, goal: Goal) -> f64 {
        self.outcome_distribution[goal.index()]
    }

    /// Dominant outcome and its share, when it differs from `goal`.
    pub fn disagreement(&self, goal: Goal) -> Option<(Goal, f64)> {
        self.dominant
            .filter(|d| *d != goal)
            .map(|d| (d, self.frequency(d)))
    }
}
