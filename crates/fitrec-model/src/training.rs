//! Offline training: stratified split, fit, evaluate.

use fitrec_core::{encode, Goal, Population, PopulationRecord, Result, ENCODER_VERSION};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::forest::{ForestParams, RandomForest};
use crate::synthetic::SyntheticProfile;
use crate::traits::GoalModel;
use crate::tree::Sample;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassReport {
    pub goal: Goal,
    pub precision: f64,
    pub recall: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassReport>,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "accuracy: {:.3}", self.accuracy)?;
        writeln!(f, "{:<14}{:>10}{:>10}{:>10}", "goal", "precision", "recall", "support")?;
        for c in &self.per_class {
            writeln!(f, "{:<14}{:>10.3}{:>10.3}{:>10}", c.goal.as_str(), c.precision, c.recall, c.support)?;
        }
        Ok(())
    }
}

pub struct TrainingOutcome {
    pub forest: RandomForest,
    pub report: EvaluationReport,
    pub population: Population,
}

/// Encode labelled profiles into training rows.
pub fn to_samples(data: &[SyntheticProfile]) -> Result<Vec<Sample>> {
    data.iter()
        .map(|d| Ok(Sample { features: encode(&d.profile)?.values, label: d.goal }))
        .collect()
}

/// Split per class so both halves keep the label mix. Returns (train, test).
pub fn stratified_split(samples: &[Sample], test_fraction: f64, seed: u64) -> (Vec<Sample>, Vec<Sample>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for goal in Goal::ALL {
        let mut class: Vec<&Sample> = samples.iter().filter(|s| s.label == goal).collect();
        class.shuffle(&mut rng);
        let n_test = (class.len() as f64 * test_fraction).round() as usize;
        for (i, s) in class.into_iter().enumerate() {
            if i < n_test {
                test.push(s.clone());
            } else {
                train.push(s.clone());
            }
        }
    }
    (train, test)
}

pub fn evaluate(model: &dyn GoalModel, samples: &[Sample]) -> EvaluationReport {
    let mut confusion = [[0usize; Goal::COUNT]; Goal::COUNT];
    for s in samples {
        let proba = model.predict_proba(&s.features);
        let mut pred = 0;
        for (i, &p) in proba.iter().enumerate() {
            if p > proba[pred] {
                pred = i;
            }
        }
        confusion[s.label.index()][pred] += 1;
    }

    let correct: usize = (0..Goal::COUNT).map(|i| confusion[i][i]).sum();
    let accuracy = if samples.is_empty() { 0.0 } else { correct as f64 / samples.len() as f64 };

    let per_class = Goal::ALL
        .iter()
        .map(|&g| {
            let i = g.index();
            let tp = confusion[i][i] as f64;
            let predicted: usize = (0..Goal::COUNT).map(|r| confusion[r][i]).sum();
            let support: usize = confusion[i].iter().sum();
            ClassReport {
                goal: g,
                precision: if predicted == 0 { 0.0 } else { tp / predicted as f64 },
                recall: if support == 0 { 0.0 } else { tp / support as f64 },
                support,
            }
        })
        .collect();

    EvaluationReport { accuracy, per_class }
}

/// Fit a forest on an 80/20 split of `data` and keep the full labelled set
/// as the similarity population.
pub fn train(data: &[SyntheticProfile], params: &ForestParams) -> Result<TrainingOutcome> {
    let samples = to_samples(data)?;
    let (train_set, test_set) = stratified_split(&samples, 0.2, params.seed);
    info!(train = train_set.len(), test = test_set.len(), trees = params.n_estimators, "training goal model");

    let forest = RandomForest::fit(&train_set, params);
    let report = evaluate(&forest, &test_set);
    info!(accuracy = report.accuracy, "evaluated goal model");

    let records = samples
        .into_iter()
        .map(|s| PopulationRecord {
            features: fitrec_core::FeatureVector::new(ENCODER_VERSION, s.features),
            outcome: s.label,
        })
        .collect();
    let population = Population::new(ENCODER_VERSION, records)?;

    Ok(TrainingOutcome { forest, report, population })
}
