//! Prior users' encoded profiles and the goal they ended up pursuing.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

use crate::encoder::{FeatureVector, ENCODER_VERSION};
use crate::error::{FitError, Result};
use crate::goal::Goal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub features: FeatureVector,
    pub outcome: Goal,
}

/// Read-only population set. Record order is the insertion order used for
/// tie-breaking during similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    encoder_version: u32,
    dimension: usize,
    records: Vec<PopulationRecord>,
}

impl Population {
    /// Build a population; every record must come from `encoder_version`
    /// and share one dimension.
    pub fn new(encoder_version: u32, records: Vec<PopulationRecord>) -> Result<Self> {
        let dimension = records.first().map(|r| r.features.dim()).unwrap_or(0);
        for (i, r) in records.iter().enumerate() {
            if r.features.version != encoder_version {
                return Err(FitError::Config(format!(
                    "population record {i} has encoder version {}, expected {encoder_version}",
                    r.features.version
                )));
            }
            if r.features.dim() != dimension {
                return Err(FitError::Config(format!(
                    "population record {i} has dimension {}, expected {dimension}",
                    r.features.dim()
                )));
            }
        }
        Ok(Self { encoder_version, dimension, records })
    }

    pub fn empty() -> Self {
        Self { encoder_version: ENCODER_VERSION, dimension: 0, records: Vec::new() }
    }

    pub fn encoder_version(&self) -> u32 {
        self.encoder_version
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn records(&self) -> &[PopulationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        debug!(path = %path.display(), records = self.len(), "population saved");
        Ok(())
    }

    /// Load and re-validate a population file. Fails if the file was
    /// written by a different encoder version than the running one.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let raw: Population = serde_json::from_reader(reader)?;
        if raw.encoder_version != ENCODER_VERSION {
            return Err(FitError::Config(format!(
                "population encoded with version {}, running encoder is {ENCODER_VERSION}",
                raw.encoder_version
            )));
        }
        let population = Self::new(raw.encoder_version, raw.records)?;
        info!(
            path = %path.display(),
            records = population.len(),
            dimension = population.dimension(),
            "population loaded"
        );
        Ok(population)
    }
}
