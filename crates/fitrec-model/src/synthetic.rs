//! Synthetic training population with realistic goal correlations.

use fitrec_core::{ActivityLevel, ExperienceLevel, Gender, Goal, UserProfile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProfile {
    pub profile: UserProfile,
    pub goal: Goal,
}

/// Generate `n` labelled profiles. Deterministic for a given seed.
pub fn generate(n: usize, seed: u64) -> Vec<SyntheticProfile> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let profile = random_profile(&mut rng);
            let goal = label(&profile, &mut rng);
            SyntheticProfile { profile, goal }
        })
        .collect()
}

fn random_profile(rng: &mut StdRng) -> UserProfile {
    let age = rng.gen_range(18..65);
    let weight_kg = gauss(rng, 70.0, 15.0).clamp(40.0, 150.0);
    let height_cm = gauss(rng, 170.0, 10.0).clamp(150.0, 200.0);
    let gender = match rng.gen_range(0..100) {
        0..=47 => Gender::Male,
        48..=95 => Gender::Female,
        _ => Gender::Other,
    };
    UserProfile {
        age,
        weight_kg,
        height_cm,
        gender,
        activity_level: ActivityLevel::ALL[rng.gen_range(0..ActivityLevel::ALL.len())],
        experience_level: ExperienceLevel::ALL[rng.gen_range(0..ExperienceLevel::ALL.len())],
    }
}

/// Goal the synthetic user pursued.
///
/// High BMI leans to weight loss, young and lean to muscle gain, active
/// under-40s to endurance (advanced lean athletes split with muscle gain),
/// older users to maintenance; everyone else is uniform noise.
pub fn label(p: &UserProfile, rng: &mut impl Rng) -> Goal {
    let bmi = p.bmi();
    if bmi > 28.0 {
        Goal::WeightLoss
    } else if bmi >= 25.0 && p.activity_level <= ActivityLevel::Light {
        Goal::WeightLoss
    } else if bmi < 20.0 && p.age < 30 {
        Goal::MuscleGain
    } else if p.activity_level >= ActivityLevel::Active && p.age < 40 {
        if p.experience_level == ExperienceLevel::Advanced && bmi < 26.0 && rng.gen_bool(0.5) {
            Goal::MuscleGain
        } else {
            Goal::Endurance
        }
    } else if p.age >= 55 && rng.gen_bool(0.6) {
        Goal::Maintenance
    } else {
        Goal::ALL[rng.gen_range(0..Goal::COUNT)]
    }
}

/// Box-Muller normal sample.
fn gauss(rng: &mut impl Rng, mu: f64, sigma: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-300);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mu + sigma * z
}
