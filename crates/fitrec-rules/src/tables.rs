//! Validated, immutable reference tables.

use fitrec_core::{ExperienceLevel, FitError, Goal, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::selector::fallback_chain;
use crate::types::*;

const TIERS: usize = ExperienceLevel::ALL.len();

/// Reference tables, checked once at load time.
///
/// Every (goal, experience) pair resolves to a template index up front, so
/// lookups never fail and never walk the fallback chain at request time.
#[derive(Debug, Clone)]
pub struct RuleTables {
    templates: Vec<PlanTemplate>,
    resolved: [[(usize, bool); TIERS]; Goal::COUNT],
    tier_limits: [TierLimit; TIERS],
    age_bands: Vec<AgeBand>,
    experience_notes: Vec<ExperienceNotes>,
    general_tips: Vec<String>,
    goal_guidance: Vec<GoalGuidance>,
}

impl RuleTables {
    pub fn from_raw(raw: RawRuleTables) -> Result<Self> {
        let tier_limits = resolve_tier_limits(&raw.tier_limits)?;

        let mut seen = HashSet::new();
        for t in &raw.templates {
            let key = (t.goal, t.experience);
            if !seen.insert(key) {
                return Err(config_err(format!("duplicate template for {} / {}", t.goal, t.experience)));
            }
            validate_template(t, &tier_limits[t.experience.rank()])?;
        }

        let mut resolved = [[(0usize, false); TIERS]; Goal::COUNT];
        for goal in Goal::ALL {
            for exp in ExperienceLevel::ALL {
                let hit = fallback_chain(exp).into_iter().find_map(|tier| {
                    raw.templates
                        .iter()
                        .position(|t| t.goal == goal && t.experience == tier)
                });
                let idx = hit.ok_or_else(|| {
                    config_err(format!("no template for {goal} at {exp} or any lower tier"))
                })?;
                resolved[goal.index()][exp.rank()] = (idx, raw.templates[idx].experience != exp);
            }
        }

        let mut age_bands = raw.age_bands;
        age_bands.sort_by_key(|b| b.min_age);
        for band in &age_bands {
            if !(band.intensity_factor > 0.0 && band.intensity_factor <= 1.0) {
                return Err(config_err(format!(
                    "age band '{}' intensity_factor {} must be in (0, 1]",
                    band.name, band.intensity_factor
                )));
            }
        }

        Ok(Self {
            templates: raw.templates,
            resolved,
            tier_limits,
            age_bands,
            experience_notes: raw.experience_notes,
            general_tips: raw.general_tips,
            goal_guidance: raw.goal_guidance,
        })
    }

    /// Load a JSON tables file written in `RawRuleTables` form.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| FitError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        let raw: RawRuleTables = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| FitError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        let tables = Self::from_raw(raw)?;
        info!(path = %path.display(), templates = tables.templates.len(), "loaded rule tables");
        Ok(tables)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_raw(crate::defaults::default_rule_tables())
    }

    pub fn to_raw(&self) -> RawRuleTables {
        RawRuleTables {
            templates: self.templates.clone(),
            tier_limits: self.tier_limits.to_vec(),
            age_bands: self.age_bands.clone(),
            experience_notes: self.experience_notes.clone(),
            general_tips: self.general_tips.clone(),
            goal_guidance: self.goal_guidance.clone(),
        }
    }

    /// Template for the pair, or for the nearest lower tier that has one.
    /// The flag is true when a lower tier was used.
    pub fn resolve(&self, goal: Goal, experience: ExperienceLevel) -> (&PlanTemplate, bool) {
        let (idx, fell_back) = self.resolved[goal.index()][experience.rank()];
        (&self.templates[idx], fell_back)
    }

    /// Exact entry only, without fallback.
    pub fn get(&self, goal: Goal, experience: ExperienceLevel) -> Option<&PlanTemplate> {
        self.templates.iter().find(|t| t.goal == goal && t.experience == experience)
    }

    pub fn templates(&self) -> &[PlanTemplate] {
        &self.templates
    }

    pub fn tier_limit(&self, experience: ExperienceLevel) -> &TierLimit {
        &self.tier_limits[experience.rank()]
    }

    pub fn age_band(&self, age: u32) -> Option<&AgeBand> {
        self.age_bands.iter().rev().find(|b| b.min_age <= age)
    }

    pub fn experience_notes(&self, experience: ExperienceLevel) -> &[String] {
        self.experience_notes
            .iter()
            .find(|n| n.experience == experience)
            .map(|n| n.notes.as_slice())
            .unwrap_or(&[])
    }

    pub fn general_tips(&self) -> &[String] {
        &self.general_tips
    }

    pub fn goal_guidance(&self, goal: Goal) -> Option<&GoalGuidance> {
        self.goal_guidance.iter().find(|g| g.goal == goal)
    }
}

fn config_err(msg: String) -> FitError {
    FitError::Config(format!("rule tables: {msg}"))
}

fn resolve_tier_limits(limits: &[TierLimit]) -> Result<[TierLimit; TIERS]> {
    let find = |exp: ExperienceLevel| {
        limits
            .iter()
            .find(|l| l.experience == exp)
            .copied()
            .ok_or_else(|| config_err(format!("missing tier limit for {exp}")))
    };
    let resolved = [
        find(ExperienceLevel::Beginner)?,
        find(ExperienceLevel::Intermediate)?,
        find(ExperienceLevel::Advanced)?,
    ];
    for pair in resolved.windows(2) {
        if pair[1].max_intensity < pair[0].max_intensity {
            return Err(config_err(format!(
                "tier ceiling for {} is below {}",
                pair[1].experience, pair[0].experience
            )));
        }
    }
    Ok(resolved)
}

fn validate_template(t: &PlanTemplate, limit: &TierLimit) -> Result<()> {
    let name = format!("{} / {}", t.goal, t.experience);
    if !t.intensity.is_valid() {
        return Err(config_err(format!("{name}: intensity bounds {:?} are inconsistent", t.intensity)));
    }
    if t.intensity.ceiling > limit.max_intensity {
        return Err(config_err(format!(
            "{name}: ceiling {} exceeds the tier limit {}",
            t.intensity.ceiling, limit.max_intensity
        )));
    }
    if t.sessions_per_week == 0 || t.sessions_per_week > limit.max_sessions {
        return Err(config_err(format!(
            "{name}: {} sessions per week outside 1..={}",
            t.sessions_per_week, limit.max_sessions
        )));
    }
    if t.workout.is_empty() || t.diet.is_empty() {
        return Err(config_err(format!("{name}: workout and diet must not be empty")));
    }
    if t.workout.iter().any(|w| !(w.load > 0.0 && w.load <= 1.0)) {
        return Err(config_err(format!("{name}: workout load must be in (0, 1]")));
    }
    Ok(())
}
