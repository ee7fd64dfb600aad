//! Shared data model for the hybrid fitness recommender: profiles, goals,
//! feature encoding, configuration and the error taxonomy.

pub mod config;
pub mod encoder;
pub mod error;
pub mod goal;
pub mod population;
pub mod profile;

pub use config::FitRecConfig;
pub use encoder::{encode, FeatureVector, ENCODER_VERSION, FEATURE_DIM};
pub use error::{CoachingError, FitError, Result};
pub use goal::{Goal, GoalPrediction};
pub use population::{Population, PopulationRecord};
pub use profile::{ActivityLevel, BmiCategory, ExperienceLevel, Gender, UserProfile};
