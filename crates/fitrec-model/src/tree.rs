//! CART decision tree with Gini impurity.

use fitrec_core::Goal;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One labelled training row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: Goal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all of them.
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { max_depth: 10, min_samples_split: 2, min_samples_leaf: 1, max_features: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { distribution: [f64; Goal::COUNT] },
}

/// Fitted tree; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Fit on `samples[idx]` (indices may repeat, as in a bootstrap draw).
    pub fn fit<R: Rng>(samples: &[Sample], idx: Vec<usize>, params: &TreeParams, rng: &mut R) -> Self {
        let n_features = samples.first().map(|s| s.features.len()).unwrap_or(0);
        let mut nodes = Vec::new();
        grow(&mut nodes, samples, idx, 0, n_features, params, rng);
        Self { nodes }
    }

    pub fn predict_proba(&self, features: &[f64]) -> [f64; Goal::COUNT] {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Split { feature, threshold, left, right }) => {
                    let x = features.get(*feature).copied().unwrap_or(0.0);
                    id = if x <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { distribution }) => return *distribution,
                None => return [0.0; Goal::COUNT],
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes.get(id) {
                Some(Node::Split { left, right, .. }) => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

fn class_counts(samples: &[Sample], idx: &[usize]) -> [usize; Goal::COUNT] {
    let mut counts = [0usize; Goal::COUNT];
    for &i in idx {
        counts[samples[i].label.index()] += 1;
    }
    counts
}

fn gini(counts: &[usize; Goal::COUNT], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

fn distribution(counts: &[usize; Goal::COUNT]) -> [f64; Goal::COUNT] {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return [1.0 / Goal::COUNT as f64; Goal::COUNT];
    }
    (*counts).map(|c| c as f64 / total as f64)
}

fn grow<R: Rng>(
    nodes: &mut Vec<Node>,
    samples: &[Sample],
    idx: Vec<usize>,
    depth: usize,
    n_features: usize,
    params: &TreeParams,
    rng: &mut R,
) -> usize {
    let counts = class_counts(samples, &idx);
    let node_id = nodes.len();
    nodes.push(Node::Leaf { distribution: distribution(&counts) });

    let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
    if pure || depth >= params.max_depth || idx.len() < params.min_samples_split {
        return node_id;
    }

    let parent = gini(&counts, idx.len());
    let Some(split) = best_split(samples, &idx, n_features, params, rng) else {
        return node_id;
    };
    if split.impurity >= parent - 1e-12 {
        return node_id;
    }

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = idx
        .into_iter()
        .partition(|&i| samples[i].features[split.feature] <= split.threshold);

    let left = grow(nodes, samples, left_idx, depth + 1, n_features, params, rng);
    let right = grow(nodes, samples, right_idx, depth + 1, n_features, params, rng);
    nodes[node_id] = Node::Split { feature: split.feature, threshold: split.threshold, left, right };
    node_id
}

fn best_split<R: Rng>(
    samples: &[Sample],
    idx: &[usize],
    n_features: usize,
    params: &TreeParams,
    rng: &mut R,
) -> Option<SplitCandidate> {
    let mut features: Vec<usize> = (0..n_features).collect();
    features.shuffle(rng);
    let take = params.max_features.unwrap_or(n_features).clamp(1, n_features.max(1));
    features.truncate(take);

    let total = idx.len();
    let total_counts = class_counts(samples, idx);
    let min_leaf = params.min_samples_leaf.max(1);
    let mut best: Option<SplitCandidate> = None;

    for feature in features {
        let mut order = idx.to_vec();
        order.sort_by(|&a, &b| samples[a].features[feature].total_cmp(&samples[b].features[feature]));

        let mut left = [0usize; Goal::COUNT];
        for pos in 0..total - 1 {
            let i = order[pos];
            left[samples[i].label.index()] += 1;

            let here = samples[i].features[feature];
            let next = samples[order[pos + 1]].features[feature];
            if here == next {
                continue;
            }
            let n_left = pos + 1;
            let n_right = total - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let mut right = total_counts;
            for (r, l) in right.iter_mut().zip(left.iter()) {
                *r -= l;
            }
            let impurity = (n_left as f64 * gini(&left, n_left) + n_right as f64 * gini(&right, n_right))
                / total as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(SplitCandidate { feature, threshold: (here + next) / 2.0, impurity });
            }
        }
    }
    best
}
