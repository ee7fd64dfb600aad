//! Bagged ensemble of decision trees.

use fitrec_core::Goal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::GoalModel;
use crate::tree::{DecisionTree, Sample, TreeParams};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Random forest: bootstrap rows per tree, √d candidate features per split,
/// probability = mean of the leaf class distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit deterministically: the same samples and params give the same forest.
    pub fn fit(samples: &[Sample], params: &ForestParams) -> Self {
        let n_features = samples.first().map(|s| s.features.len()).unwrap_or(0);
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            max_features: Some(((n_features as f64).sqrt().ceil() as usize).max(1)),
        };
        let mut rng = StdRng::seed_from_u64(params.seed);
        let n = samples.len();

        let trees = (0..params.n_estimators.max(1))
            .map(|_| {
                let idx: Vec<usize> = if params.bootstrap && n > 0 {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(samples, idx, &tree_params, &mut rng)
            })
            .collect::<Vec<_>>();

        debug!(
            trees = trees.len(),
            samples = n,
            mean_nodes = trees.iter().map(|t| t.node_count()).sum::<usize>() / trees.len(),
            "fitted random forest"
        );
        Self { n_features, trees }
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn predict(&self, features: &[f64]) -> Goal {
        let proba = self.predict_proba(features);
        let mut best = 0;
        for (i, &p) in proba.iter().enumerate() {
            if p > proba[best] {
                best = i;
            }
        }
        Goal::ALL[best]
    }
}

impl GoalModel for RandomForest {
    fn predict_proba(&self, features: &[f64]) -> [f64; Goal::COUNT] {
        let mut acc = [0.0; Goal::COUNT];
        if self.trees.is_empty() {
            return acc;
        }
        for tree in &self.trees {
            for (a, p) in acc.iter_mut().zip(tree.predict_proba(features)) {
                *a += p;
            }
        }
        let n = self.trees.len() as f64;
        acc.map(|a| a / n)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
