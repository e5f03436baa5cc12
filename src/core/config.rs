/// Configuration — RON-backed tables for the cast, the event pools, the mood
/// graph and the generation loop, validated at load.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::demographics::{compute_intervals, DemographicBucket};
use crate::core::mood_graph::{MoodEdge, MoodGraph, MoodGraphError};
use crate::core::romance::RomanticPercentages;
use crate::core::selection::SelectionWeights;
use crate::core::social_graph::SocialWeights;
use crate::schema::character::CharacterTemplate;
use crate::schema::event::{ConclusionEvent, Event, Mood};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("there are no conclusion events in the event pool")]
    NoConclusionEvents,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn load_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&contents)?)
}

fn check_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

fn check_fraction(name: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be within 0.0..=1.0, got {}",
            name, value
        )))
    }
}

fn default_cast_size() -> usize {
    20
}

fn default_male_fraction() -> f32 {
    0.5042
}

fn default_max_edge_distance() -> u32 {
    10
}

/// Everything needed to generate a cast and its relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastConfig {
    pub templates: Vec<CharacterTemplate>,
    #[serde(default = "default_cast_size")]
    pub cast_size: usize,
    #[serde(default = "default_male_fraction")]
    pub male_fraction: f32,
    pub demographics: Vec<DemographicBucket>,
    #[serde(default)]
    pub romance: RomanticPercentages,
    #[serde(default)]
    pub social: SocialWeights,
    #[serde(default = "default_max_edge_distance")]
    pub max_edge_distance: u32,
    /// Fixed Erdős–Rényi threshold. Drawn per cast when absent.
    #[serde(default)]
    pub edge_threshold: Option<f32>,
}

impl CastConfig {
    pub fn load_from_ron(path: &Path) -> Result<CastConfig, ConfigError> {
        let mut config: CastConfig = load_ron(path)?;
        compute_intervals(&mut config.demographics);
        Ok(config)
    }

    pub fn parse_ron(input: &str) -> Result<CastConfig, ConfigError> {
        let mut config: CastConfig = ron::from_str(input)?;
        compute_intervals(&mut config.demographics);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.templates.is_empty() {
            return Err(ConfigError::Invalid("no character templates".to_string()));
        }
        if self.demographics.is_empty() {
            return Err(ConfigError::Invalid("no demographic buckets".to_string()));
        }
        if self.max_edge_distance < 1 {
            return Err(ConfigError::Invalid(
                "max_edge_distance must be at least 1".to_string(),
            ));
        }
        check_fraction("male_fraction", self.male_fraction)?;
        check_fraction("romance.married", self.romance.married)?;
        check_fraction("romance.divorced", self.romance.divorced)?;
        check_fraction("romance.widowed", self.romance.widowed)?;
        check_fraction("social.neighbor", self.social.neighbor)?;
        check_fraction("social.family", self.social.family)?;
        check_fraction("social.coworker", self.social.coworker)?;
        check_fraction("social.friend", self.social.friend)?;
        if let Some(threshold) = self.edge_threshold {
            check_fraction("edge_threshold", threshold)?;
        }
        for template in &self.templates {
            check_fraction("template.moral_tendency", template.moral_tendency)?;
            check_fraction(
                "template.desire_pursuit_tendency",
                template.desire_pursuit_tendency,
            )?;
        }
        for bucket in &self.demographics {
            if !(0.0..=1.0).contains(&bucket.population_share) {
                return Err(ConfigError::Invalid(format!(
                    "population share for {:?} must be within 0.0..=1.0",
                    bucket.generation
                )));
            }
            if bucket.min_age > bucket.max_age {
                return Err(ConfigError::Invalid(format!(
                    "{:?} has min_age {} above max_age {}",
                    bucket.generation, bucket.min_age, bucket.max_age
                )));
            }
            if bucket.population_share > 0.0 {
                let missing = if bucket.male_names.is_empty() && self.male_fraction > 0.0 {
                    Some("male")
                } else if bucket.female_names.is_empty() && self.male_fraction < 1.0 {
                    Some("female")
                } else {
                    None
                };
                if let Some(gender) = missing {
                    return Err(ConfigError::Invalid(format!(
                        "{:?} has no {} names",
                        bucket.generation, gender
                    )));
                }
            }
        }
        Ok(())
    }

    /// Sum of all population shares.
    pub fn total_population_share(&self) -> f64 {
        self.demographics
            .iter()
            .map(|b| b.population_share)
            .sum()
    }
}

/// Authored events: the body pool and the conclusion pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPool {
    #[serde(default)]
    pub events: Vec<Event>,
    pub conclusions: Vec<ConclusionEvent>,
    #[serde(default)]
    pub desired_final_tension: f32,
}

impl EventPool {
    pub fn load_from_ron(path: &Path) -> Result<EventPool, ConfigError> {
        load_ron(path)
    }

    pub fn parse_ron(input: &str) -> Result<EventPool, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conclusions.is_empty() {
            return Err(ConfigError::NoConclusionEvents);
        }
        Ok(())
    }
}

/// Vertices and edges of the mood graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodGraphConfig {
    pub vertices: Vec<Mood>,
    pub edges: Vec<MoodEdge>,
}

impl MoodGraphConfig {
    pub fn load_from_ron(path: &Path) -> Result<MoodGraphConfig, ConfigError> {
        load_ron(path)
    }

    pub fn parse_ron(input: &str) -> Result<MoodGraphConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    pub fn build(&self) -> Result<MoodGraph, MoodGraphError> {
        MoodGraph::build(&self.vertices, &self.edges)
    }
}

fn default_generation_interval() -> f32 {
    1.0
}

fn default_max_body_events() -> usize {
    64
}

/// Tuning for the generation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSettings {
    /// Seconds between narratives when driven by `tick`.
    #[serde(default = "default_generation_interval")]
    pub generation_interval_secs: f32,
    #[serde(default)]
    pub selection: SelectionWeights,
    /// Upper bound on body events per narrative.
    #[serde(default = "default_max_body_events")]
    pub max_body_events: usize,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            generation_interval_secs: default_generation_interval(),
            selection: SelectionWeights::default(),
            max_body_events: default_max_body_events(),
        }
    }
}

impl NarrativeSettings {
    pub fn load_from_ron(path: &Path) -> Result<NarrativeSettings, ConfigError> {
        load_ron(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.generation_interval_secs.is_finite() && self.generation_interval_secs >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "generation_interval_secs must be a non-negative number, got {}",
                self.generation_interval_secs
            )));
        }
        check_positive("ideal_mood_distance", self.selection.ideal_mood_distance)?;
        for (name, value) in [
            ("mood_weight", self.selection.mood_weight),
            ("recency_weight", self.selection.recency_weight),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAST: &str = r#"(
        templates: [
            (occupation: Teacher, salary: 52000, greatest_desire: RaiseAFamily),
        ],
        demographics: [
            (generation: Millennials, population_share: 0.5, min_age: 28, max_age: 43,
             male_names: ["Michael"], female_names: ["Jessica"]),
            (generation: GenerationZ, population_share: 0.5, min_age: 12, max_age: 27,
             male_names: ["Liam"], female_names: ["Emma"]),
        ],
    )"#;

    #[test]
    fn cast_config_defaults_and_intervals() {
        let config = CastConfig::parse_ron(CAST).unwrap();
        assert_eq!(config.cast_size, 20);
        assert_eq!(config.max_edge_distance, 10);
        assert_eq!(config.romance, RomanticPercentages::default());
        assert!(config.edge_threshold.is_none());
        assert_eq!(config.demographics[0].cumulative_bound, 0.5);
        assert_eq!(config.demographics[1].cumulative_bound, 1.0);
        assert_eq!(config.total_population_share(), 1.0);
        config.validate().unwrap();
    }

    #[test]
    fn cast_config_rejects_bad_fraction() {
        let mut config = CastConfig::parse_ron(CAST).unwrap();
        config.romance.married = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn cast_config_rejects_inverted_ages() {
        let mut config = CastConfig::parse_ron(CAST).unwrap();
        config.demographics[0].min_age = 90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn cast_config_requires_templates() {
        let mut config = CastConfig::parse_ron(CAST).unwrap();
        config.templates.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn cast_config_rejects_empty_name_pool() {
        let mut config = CastConfig::parse_ron(CAST).unwrap();
        config.demographics[0].female_names.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        // An all-male cast never draws from the female pool.
        config.male_fraction = 1.0;
        config.validate().unwrap();

        config.demographics[0].male_names.clear();
        assert!(config.validate().is_err());

        // Nobody is drawn from a bucket with no share.
        config.demographics[0].population_share = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn settings_reject_non_finite_values() {
        let mut settings = NarrativeSettings::default();
        settings.generation_interval_secs = f32::NAN;
        assert!(settings.validate().is_err());

        let mut settings = NarrativeSettings::default();
        settings.selection.ideal_mood_distance = f32::NAN;
        assert!(settings.validate().is_err());
        settings.selection.ideal_mood_distance = f32::INFINITY;
        assert!(settings.validate().is_err());

        let mut settings = NarrativeSettings::default();
        settings.selection.mood_weight = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn empty_conclusion_pool_is_reported() {
        let pool = EventPool::parse_ron("(conclusions: [])").unwrap();
        assert!(matches!(pool.validate(), Err(ConfigError::NoConclusionEvents)));
    }

    #[test]
    fn mood_graph_config_builds() {
        let config = MoodGraphConfig::parse_ron(
            "(vertices: [Joyful, Depressing], edges: [(a: Joyful, b: Depressing, distance: 5)])",
        )
        .unwrap();
        let graph = config.build().unwrap();
        assert_eq!(graph.vertices().len(), 2);
    }

    #[test]
    fn settings_defaults() {
        let settings: NarrativeSettings = ron::from_str("()").unwrap();
        assert_eq!(settings, NarrativeSettings::default());
        assert_eq!(settings.selection.ideal_mood_distance, 3.0);
        settings.validate().unwrap();
    }

    #[test]
    fn load_cast_fixture() {
        let path = std::path::PathBuf::from("tests/fixtures/test_cast.ron");
        let config = CastConfig::load_from_ron(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.demographics.len(), 4);
    }
}
