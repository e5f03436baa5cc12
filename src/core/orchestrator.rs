/// The narrative orchestrator: cast → relationships → mood graph once, then a
/// conclusion-and-body cycle on every trigger.

use std::path::Path;
use thiserror::Error;

use crate::core::body::{ImmediateConvergence, NarrativeBodyPolicy};
use crate::core::config::{CastConfig, ConfigError, EventPool, MoodGraphConfig, NarrativeSettings};
use crate::core::context::{CastError, NarrativeContext};
use crate::core::demographics::compute_intervals;
use crate::core::mood_graph::MoodGraphError;
use crate::core::selection::{select_best, SelectionError};
use crate::schema::character::Character;
use crate::schema::narrative::GeneratedNarrative;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("cast error: {0}")]
    Cast(#[from] CastError),
    #[error("mood graph error: {0}")]
    MoodGraph(#[from] MoodGraphError),
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
    #[error("missing {0} configuration")]
    MissingConfig(&'static str),
}

/// Where a generation cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    SelectConclusion,
    BuildEvents,
}

/// Owns the generation state and runs cycles. Built via
/// `NarrativeOrchestrator::builder()`.
#[derive(Debug)]
pub struct NarrativeOrchestrator {
    cast_config: CastConfig,
    settings: NarrativeSettings,
    context: NarrativeContext,
    policy: Box<dyn NarrativeBodyPolicy>,
    phase: GenerationPhase,
    elapsed_secs: f32,
}

/// Builder for constructing a `NarrativeOrchestrator`.
pub struct NarrativeOrchestratorBuilder {
    preset_dir: Option<String>,
    cast_path: Option<String>,
    events_path: Option<String>,
    mood_graph_path: Option<String>,
    settings_path: Option<String>,
    seed: u64,
    /// Directly provided configs (for testing without files).
    cast: Option<CastConfig>,
    events: Option<EventPool>,
    mood_graph: Option<MoodGraphConfig>,
    settings: Option<NarrativeSettings>,
    policy: Option<Box<dyn NarrativeBodyPolicy>>,
}

impl NarrativeOrchestrator {
    pub fn builder() -> NarrativeOrchestratorBuilder {
        NarrativeOrchestratorBuilder {
            preset_dir: None,
            cast_path: None,
            events_path: None,
            mood_graph_path: None,
            settings_path: None,
            seed: 0,
            cast: None,
            events: None,
            mood_graph: None,
            settings: None,
            policy: None,
        }
    }

    /// Advance the trigger clock. Generates a narrative when the elapsed time
    /// exceeds the configured interval, then resets the clock.
    pub fn tick(&mut self, delta_secs: f32) -> Result<Option<&GeneratedNarrative>, NarrativeError> {
        self.elapsed_secs += delta_secs;
        if self.elapsed_secs > self.settings.generation_interval_secs {
            self.elapsed_secs = 0.0;
            return self.generate_narrative().map(Some);
        }
        Ok(None)
    }

    /// Run one generation cycle. The current narrative, if any, is archived
    /// first; on failure it is restored and history is left untouched.
    pub fn generate_narrative(&mut self) -> Result<&GeneratedNarrative, NarrativeError> {
        let archived = if self.context.current.initialized {
            let previous = std::mem::take(&mut self.context.current);
            self.context.history.push(previous);
            true
        } else {
            false
        };

        match self.run_cycle() {
            Ok(narrative) => {
                self.context.current = narrative;
                Ok(&self.context.current)
            }
            Err(e) => {
                self.phase = GenerationPhase::Idle;
                if archived {
                    if let Some(previous) = self.context.history.pop() {
                        self.context.current = previous;
                    }
                }
                Err(e)
            }
        }
    }

    fn run_cycle(&mut self) -> Result<GeneratedNarrative, NarrativeError> {
        let mut narrative = GeneratedNarrative::default();

        // 1. Conclusion
        self.phase = GenerationPhase::SelectConclusion;
        let ctx = &mut self.context;
        let conclusion = select_best(
            &mut ctx.conclusions,
            &ctx.history,
            &ctx.mood_graph,
            &self.settings.selection,
            &mut ctx.rng,
        )?;
        self.policy
            .cast_characters(&mut narrative, &conclusion.event, &self.context);
        tracing::info!(
            narrative = self.context.history.len(),
            conclusion = %conclusion.describe(),
            "selected conclusion event"
        );
        narrative.conclusion = Some(conclusion);

        // 2. Body events
        self.phase = GenerationPhase::BuildEvents;
        while !self.policy.has_converged(&narrative) {
            if narrative.events.len() >= self.settings.max_body_events {
                tracing::warn!(
                    cap = self.settings.max_body_events,
                    "narrative body hit the event cap before converging"
                );
                break;
            }
            let Some(event) = self.policy.next_event(&mut self.context) else {
                break;
            };
            self.policy
                .cast_characters(&mut narrative, &event, &self.context);
            narrative.events.push(event);
        }

        narrative.initialized = true;
        self.phase = GenerationPhase::Idle;
        Ok(narrative)
    }

    /// Replace the whole cast and rebuild its relationships. Template usage
    /// carries over; narrative history is kept.
    pub fn regenerate_cast(&mut self) -> Result<(), NarrativeError> {
        self.context.generate_cast(&self.cast_config)?;
        self.context.build_relationships(&self.cast_config)?;
        Ok(())
    }

    pub fn context(&self) -> &NarrativeContext {
        &self.context
    }

    pub fn characters(&self) -> &[Character] {
        &self.context.characters
    }

    pub fn history(&self) -> &[GeneratedNarrative] {
        &self.context.history
    }

    pub fn current(&self) -> &GeneratedNarrative {
        &self.context.current
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn settings(&self) -> &NarrativeSettings {
        &self.settings
    }
}

impl NarrativeOrchestratorBuilder {
    /// Directory holding `cast.ron`, `events.ron`, `mood_graph.ron` and an
    /// optional `settings.ron`. Explicit paths and configs take precedence.
    pub fn preset_dir(mut self, path: &str) -> Self {
        self.preset_dir = Some(path.to_string());
        self
    }

    pub fn cast_config(mut self, path: &str) -> Self {
        self.cast_path = Some(path.to_string());
        self
    }

    pub fn event_pool(mut self, path: &str) -> Self {
        self.events_path = Some(path.to_string());
        self
    }

    pub fn mood_graph(mut self, path: &str) -> Self {
        self.mood_graph_path = Some(path.to_string());
        self
    }

    pub fn settings(mut self, path: &str) -> Self {
        self.settings_path = Some(path.to_string());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Provide the cast config directly (for testing without files).
    pub fn with_cast_config(mut self, config: CastConfig) -> Self {
        self.cast = Some(config);
        self
    }

    /// Provide the event pool directly (for testing without files).
    pub fn with_event_pool(mut self, pool: EventPool) -> Self {
        self.events = Some(pool);
        self
    }

    /// Provide the mood graph directly (for testing without files).
    pub fn with_mood_graph(mut self, config: MoodGraphConfig) -> Self {
        self.mood_graph = Some(config);
        self
    }

    pub fn with_settings(mut self, settings: NarrativeSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn body_policy(mut self, policy: impl NarrativeBodyPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn build(self) -> Result<NarrativeOrchestrator, NarrativeError> {
        let preset = self.preset_dir.as_deref().map(Path::new);

        let mut cast = match self.cast {
            Some(config) => config,
            None => CastConfig::load_from_ron(&resolve(&self.cast_path, preset, "cast.ron", "cast")?)?,
        };
        let events = match self.events {
            Some(pool) => pool,
            None => EventPool::load_from_ron(&resolve(&self.events_path, preset, "events.ron", "event pool")?)?,
        };
        let mood_graph = match self.mood_graph {
            Some(config) => config,
            None => MoodGraphConfig::load_from_ron(&resolve(
                &self.mood_graph_path,
                preset,
                "mood_graph.ron",
                "mood graph",
            )?)?,
        };
        let settings = match self.settings {
            Some(settings) => settings,
            None => match (&self.settings_path, preset) {
                (Some(path), _) => NarrativeSettings::load_from_ron(Path::new(path))?,
                (None, Some(dir)) if dir.join("settings.ron").exists() => {
                    NarrativeSettings::load_from_ron(&dir.join("settings.ron"))?
                }
                _ => NarrativeSettings::default(),
            },
        };

        compute_intervals(&mut cast.demographics);
        cast.validate()?;
        settings.validate()?;

        let mut context = NarrativeContext::new(self.seed, cast.templates.clone());

        // Characters first, then events, then the mood graph.
        context.generate_cast(&cast)?;
        context.build_relationships(&cast)?;
        tracing::info!(
            characters = context.characters.len(),
            social_edges = context.social_graph.edges().len(),
            "initialized cast"
        );

        if let Err(e) = events.validate() {
            tracing::error!("{}; add some and try again", e);
            return Err(e.into());
        }
        context.events = events.events;
        context.conclusions = events.conclusions;

        context.mood_graph = mood_graph.build()?;

        Ok(NarrativeOrchestrator {
            cast_config: cast,
            settings,
            context,
            policy: self.policy.unwrap_or_else(|| Box::new(ImmediateConvergence)),
            phase: GenerationPhase::Idle,
            elapsed_secs: 0.0,
        })
    }
}

/// An explicit path, else `file_name` inside the preset directory.
fn resolve(
    explicit: &Option<String>,
    preset: Option<&Path>,
    file_name: &str,
    what: &'static str,
) -> Result<std::path::PathBuf, NarrativeError> {
    if let Some(path) = explicit {
        return Ok(std::path::PathBuf::from(path));
    }
    preset
        .map(|dir| dir.join(file_name))
        .ok_or(NarrativeError::MissingConfig(what))
}
