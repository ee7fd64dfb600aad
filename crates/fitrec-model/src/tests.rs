use crate::*;
use crate::synthetic;
use crate::training::{evaluate, stratified_split, to_samples};
use fitrec_core::{encode, ActivityLevel, ExperienceLevel, FitError, Gender, Goal, UserProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn small_params() -> ForestParams {
    ForestParams { n_estimators: 15, max_depth: 8, ..ForestParams::default() }
}

fn sample(x: f64, label: Goal) -> Sample {
    Sample { features: vec![x, 0.0], label }
}

// ========== Decision Tree ==========

#[test]
fn test_tree_separable() {
    let samples: Vec<Sample> = (0..20)
        .map(|i| sample(i as f64, if i < 10 { Goal::WeightLoss } else { Goal::Endurance }))
        .collect();
    let mut rng = StdRng::seed_from_u64(1);
    let tree = DecisionTree::fit(&samples, (0..20).collect(), &TreeParams::default(), &mut rng);
    assert_eq!(tree.predict_proba(&[2.0, 0.0])[Goal::WeightLoss.index()], 1.0);
    assert_eq!(tree.predict_proba(&[17.0, 0.0])[Goal::Endurance.index()], 1.0);
    assert_eq!(tree.depth(), 1);
}

#[test]
fn test_tree_pure_is_leaf() {
    let samples: Vec<Sample> = (0..5).map(|i| sample(i as f64, Goal::Maintenance)).collect();
    let mut rng = StdRng::seed_from_u64(1);
    let tree = DecisionTree::fit(&samples, (0..5).collect(), &TreeParams::default(), &mut rng);
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.predict_proba(&[100.0, 0.0])[Goal::Maintenance.index()], 1.0);
}

#[test]
fn test_tree_respects_max_depth() {
    let samples: Vec<Sample> = (0..64).map(|i| sample(i as f64, Goal::ALL[i % 4])).collect();
    let params = TreeParams { max_depth: 3, ..TreeParams::default() };
    let mut rng = StdRng::seed_from_u64(3);
    let tree = DecisionTree::fit(&samples, (0..64).collect(), &params, &mut rng);
    assert!(tree.depth() <= 3);
}

#[test]
fn test_tree_constant_feature_no_split() {
    let samples = vec![sample(1.0, Goal::WeightLoss), sample(1.0, Goal::MuscleGain)];
    let mut rng = StdRng::seed_from_u64(3);
    let tree = DecisionTree::fit(&samples, vec![0, 1], &TreeParams::default(), &mut rng);
    let p = tree.predict_proba(&[1.0, 0.0]);
    assert!((p[0] - 0.5).abs() < 1e-9);
    assert!((p[1] - 0.5).abs() < 1e-9);
}

// ========== Forest ==========

#[test]
fn test_forest_deterministic() {
    let data = synthetic::generate(200, 9);
    let samples = to_samples(&data).unwrap();
    let a = RandomForest::fit(&samples, &small_params());
    let b = RandomForest::fit(&samples, &small_params());
    for s in samples.iter().take(25) {
        assert_eq!(a.predict_proba(&s.features), b.predict_proba(&s.features));
    }
}

#[test]
fn test_forest_proba_is_simplex() {
    let data = synthetic::generate(300, 5);
    let samples = to_samples(&data).unwrap();
    let forest = RandomForest::fit(&samples, &small_params());
    for s in &samples {
        let p = forest.predict_proba(&s.features);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }
    assert_eq!(forest.len(), 15);
    assert_eq!(forest.n_features(), fitrec_core::FEATURE_DIM);
}

// ========== Synthetic Data ==========

#[test]
fn test_synthetic_deterministic() {
    let a = synthetic::generate(50, 42);
    let b = synthetic::generate(50, 42);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.profile, y.profile);
        assert_eq!(x.goal, y.goal);
    }
}

#[test]
fn test_synthetic_ranges_valid() {
    for d in synthetic::generate(500, 42) {
        assert!(d.profile.validate().is_ok());
        assert!((18..65).contains(&d.profile.age));
        assert!((40.0..=150.0).contains(&d.profile.weight_kg));
        assert!((150.0..=200.0).contains(&d.profile.height_cm));
    }
}

#[test]
fn test_synthetic_high_bmi_is_weight_loss() {
    for d in synthetic::generate(500, 42) {
        if d.profile.bmi() > 28.0 {
            assert_eq!(d.goal, Goal::WeightLoss);
        }
    }
}

#[test]
fn test_label_active_young_lean() {
    let p = UserProfile {
        age: 30,
        weight_kg: 75.0,
        height_cm: 180.0,
        gender: Gender::Male,
        activity_level: ActivityLevel::VeryActive,
        experience_level: ExperienceLevel::Advanced,
    };
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..20 {
        let g = synthetic::label(&p, &mut rng);
        assert!(g == Goal::MuscleGain || g == Goal::Endurance);
    }
}

// ========== Training / Evaluation ==========

#[test]
fn test_stratified_split_keeps_classes() {
    let samples = to_samples(&synthetic::generate(400, 42)).unwrap();
    let (train, test) = stratified_split(&samples, 0.2, 42);
    assert_eq!(train.len() + test.len(), samples.len());
    for g in Goal::ALL {
        let total = samples.iter().filter(|s| s.label == g).count();
        let in_test = test.iter().filter(|s| s.label == g).count();
        assert_eq!(in_test, (total as f64 * 0.2).round() as usize);
    }
}

#[test]
fn test_train_beats_chance() {
    let data = synthetic::generate(600, 42);
    let outcome = train(&data, &small_params()).unwrap();
    assert!(outcome.report.accuracy > 0.45, "accuracy {}", outcome.report.accuracy);
    assert_eq!(outcome.population.len(), 600);
    assert_eq!(outcome.report.per_class.len(), Goal::COUNT);
}

#[test]
fn test_evaluate_perfect_model() {
    struct Oracle;
    impl GoalModel for Oracle {
        fn predict_proba(&self, f: &[f64]) -> [f64; Goal::COUNT] {
            let mut p = [0.0; Goal::COUNT];
            p[f[0] as usize] = 1.0;
            p
        }
        fn n_features(&self) -> usize { 1 }
        fn name(&self) -> &str { "oracle" }
    }
    let samples: Vec<Sample> = Goal::ALL
        .iter()
        .map(|&g| Sample { features: vec![g.index() as f64], label: g })
        .collect();
    let report = evaluate(&Oracle, &samples);
    assert_eq!(report.accuracy, 1.0);
    assert!(report.per_class.iter().all(|c| c.precision == 1.0 && c.recall == 1.0));
    assert!(report.to_string().contains("accuracy: 1.000"));
}

// ========== Classifier / Artifact ==========

#[test]
fn test_classifier_prediction_consistent() {
    let data = synthetic::generate(300, 42);
    let outcome = train(&data, &small_params()).unwrap();
    let classifier = GoalClassifier::new(Arc::new(outcome.forest));
    for d in data.iter().take(50) {
        let pred = classifier.predict(&encode(&d.profile).unwrap());
        let max = pred.probabilities.values().cloned().fold(f64::MIN, f64::max);
        assert_eq!(pred.confidence, max);
        assert_eq!(pred.probability(pred.goal), max);
    }
}

#[test]
fn test_classifier_incompatible_vector_uniform() {
    let data = synthetic::generate(100, 1);
    let outcome = train(&data, &small_params()).unwrap();
    let classifier = GoalClassifier::new(Arc::new(outcome.forest));
    let v = fitrec_core::FeatureVector::new(fitrec_core::ENCODER_VERSION, vec![1.0, 2.0]);
    assert!((classifier.predict(&v).confidence - 0.25).abs() < 1e-9);
}

#[test]
fn test_artifact_save_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let outcome = train(&synthetic::generate(200, 42), &small_params()).unwrap();
    let profile = &synthetic::generate(1, 77)[0].profile;
    let v = encode(profile).unwrap();
    let before = GoalClassifier::new(Arc::new(outcome.forest.clone())).predict(&v);

    ModelArtifact::new(outcome.forest, small_params(), Some(outcome.report)).save(&path).unwrap();
    let classifier = GoalClassifier::from_artifact(&path).unwrap();
    let after = classifier.predict(&v);
    assert_eq!(after.goal, before.goal);
    for g in Goal::ALL {
        assert!((after.probability(g) - before.probability(g)).abs() < 1e-9);
    }
    assert_eq!(classifier.model_name(), "random_forest");
}

#[test]
fn test_artifact_missing_is_model_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = GoalClassifier::from_artifact(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, FitError::ModelUnavailable(_)));
}

#[test]
fn test_artifact_corrupt_is_model_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(ModelArtifact::load(&path), Err(FitError::ModelUnavailable(_))));
}

#[test]
fn test_artifact_encoder_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let outcome = train(&synthetic::generate(100, 42), &small_params()).unwrap();
    let mut artifact = ModelArtifact::new(outcome.forest, small_params(), None);
    artifact.encoder_version += 1;
    artifact.save(&path).unwrap();
    let err = ModelArtifact::load(&path).unwrap_err();
    assert!(err.to_string().contains("encoder"));
}
