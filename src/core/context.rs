/// Narrative context — the single owner of the cast, both graphs, the event
/// pools and narrative history.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::core::config::CastConfig;
use crate::core::demographics::{
    assign_gender, assign_generation_and_age, assign_name, DemographicsError,
};
use crate::core::mood_graph::MoodGraph;
use crate::core::romance;
use crate::core::social_graph::{apply_social_ties, SocialGraph, SocialGraphError};
use crate::schema::character::{Character, CharacterTemplate};
use crate::schema::event::{ConclusionEvent, Event};
use crate::schema::narrative::GeneratedNarrative;

#[derive(Debug, Error)]
pub enum CastError {
    #[error("no character templates to build characters from")]
    NoTemplates,
    #[error("demographics error: {0}")]
    Demographics(#[from] DemographicsError),
    #[error("social graph error: {0}")]
    SocialGraph(#[from] SocialGraphError),
}

/// All long-lived generation state. Algorithms borrow pieces of it; only
/// the orchestrator mutates it, one cycle at a time.
#[derive(Debug, Clone)]
pub struct NarrativeContext {
    pub characters: Vec<Character>,
    /// Persist across casts so usage stays even.
    pub templates: Vec<CharacterTemplate>,
    pub social_graph: SocialGraph,
    pub mood_graph: MoodGraph,
    pub events: Vec<Event>,
    pub conclusions: Vec<ConclusionEvent>,
    /// Append-only.
    pub history: Vec<GeneratedNarrative>,
    pub current: GeneratedNarrative,
    pub rng: StdRng,
}

impl NarrativeContext {
    pub fn new(seed: u64, templates: Vec<CharacterTemplate>) -> Self {
        Self {
            characters: Vec::new(),
            templates,
            social_graph: SocialGraph::default(),
            mood_graph: MoodGraph::default(),
            events: Vec::new(),
            conclusions: Vec::new(),
            history: Vec::new(),
            current: GeneratedNarrative::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the cast with `config.cast_size` fresh characters. Each draws
    /// gender, then cohort and age, then name, backed by the least-used
    /// template. On error the previous cast and template usage are kept.
    pub fn generate_cast(&mut self, config: &CastConfig) -> Result<(), CastError> {
        let mut characters = Vec::with_capacity(config.cast_size);
        let mut templates = self.templates.clone();

        for _ in 0..config.cast_size {
            let template_index =
                least_used_template(&templates).ok_or(CastError::NoTemplates)?;

            let gender = assign_gender(&mut self.rng, config.male_fraction);
            let cohort = assign_generation_and_age(&mut self.rng, &config.demographics)?;
            let name = assign_name(
                &mut self.rng,
                &config.demographics,
                cohort.generation,
                gender,
            )?;

            characters.push(Character::new(
                name,
                cohort.age,
                cohort.generation,
                gender,
                template_index,
            ));
            templates[template_index].times_used += 1;
        }

        self.templates = templates;
        self.characters = characters;
        Ok(())
    }

    /// Romantic statuses and pairing first, then the social graph and the
    /// ties derived from it.
    pub fn build_relationships(&mut self, config: &CastConfig) -> Result<(), CastError> {
        for character in &mut self.characters {
            character.social.clear();
        }

        let pending = romance::assign_statuses(&mut self.characters, &mut self.rng, &config.romance);
        let report = romance::pair(&pending, &mut self.characters);
        tracing::info!(
            couples = report.pairs.len(),
            demoted = report.demoted.len(),
            "paired married characters"
        );

        let threshold = match config.edge_threshold {
            Some(threshold) => threshold,
            None => self.rng.gen(),
        };
        self.social_graph = SocialGraph::build(
            self.characters.len(),
            threshold,
            config.max_edge_distance,
            &mut self.rng,
        )?;
        apply_social_ties(&mut self.characters, &self.social_graph, &config.social)?;

        for character in &self.characters {
            tracing::debug!(
                character = %character.summary(),
                ties = character.social.len(),
                "generated character"
            );
        }
        Ok(())
    }

    pub fn character_by_name(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name() == name)
    }

    /// The conclusion of the most recently archived narrative.
    pub fn last_conclusion(&self) -> Option<&ConclusionEvent> {
        self.history.last().and_then(|n| n.conclusion.as_ref())
    }
}

/// Index of the template used the fewest times; the earliest wins ties.
pub fn least_used_template(templates: &[CharacterTemplate]) -> Option<usize> {
    templates
        .iter()
        .enumerate()
        .min_by_key(|(_, t)| t.times_used)
        .map(|(index, _)| index)
}
