/// Conclusion selection — scores candidate conclusion events against the
/// previous narrative's mood and picks the best one.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::mood_graph::{MoodGraph, MoodGraphError};
use crate::schema::event::ConclusionEvent;
use crate::schema::narrative::GeneratedNarrative;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no conclusion events to choose from")]
    NoCandidates,
    #[error("previous narrative has no conclusion event")]
    MissingPreviousConclusion,
    #[error("mood graph error: {0}")]
    MoodGraph(#[from] MoodGraphError),
}

/// Scoring constants for conclusion selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionWeights {
    /// Mood distance that counts as one full unit of tonal change.
    pub ideal_mood_distance: f32,
    pub mood_weight: f32,
    pub recency_weight: f32,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            ideal_mood_distance: 3.0,
            mood_weight: 0.67,
            recency_weight: 0.33,
        }
    }
}

/// Pick the conclusion for the next narrative.
///
/// With no history the pick is uniform. Otherwise every candidate is scored
/// and the highest total wins, earliest candidate on ties. The winner's usage
/// list gains `history.len()`, the index the new narrative will have once
/// archived, and a snapshot of it is returned.
pub fn select_best(
    candidates: &mut [ConclusionEvent],
    history: &[GeneratedNarrative],
    mood_graph: &MoodGraph,
    weights: &SelectionWeights,
    rng: &mut StdRng,
) -> Result<ConclusionEvent, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let best = match history.last() {
        None => rng.gen_range(0..candidates.len()),
        Some(previous) => {
            let previous_mood = previous
                .conclusion_mood()
                .ok_or(SelectionError::MissingPreviousConclusion)?;
            let distances = mood_graph.shortest_distances(previous_mood)?;
            // Resolve every distance before scoring so a bad mood leaves the pool untouched.
            let mood_distances = candidates
                .iter()
                .map(|candidate| distances.get(candidate.mood()))
                .collect::<Result<Vec<u32>, MoodGraphError>>()?;

            let mut best = 0;
            let mut best_score = f32::NEG_INFINITY;
            for (index, (candidate, distance)) in
                candidates.iter_mut().zip(mood_distances).enumerate()
            {
                score_candidate(candidate, distance, weights);
                tracing::debug!(
                    candidate = %candidate.event.describe(),
                    score = candidate.evaluated_score,
                    "scored conclusion event"
                );
                if candidate.evaluated_score > best_score {
                    best = index;
                    best_score = candidate.evaluated_score;
                }
            }
            best
        }
    };

    let chosen = &mut candidates[best];
    chosen.narrative_usage.push(history.len());
    Ok(chosen.clone())
}

/// Fill in the sub-scores and total for one candidate, given the mood-graph
/// distance from the previous conclusion's mood.
pub fn score_candidate(candidate: &mut ConclusionEvent, mood_distance: u32, weights: &SelectionWeights) {
    let usage_score = usage_recency_score(candidate, weights);
    tracing::trace!(usage_score, "recency score computed and not applied");
    candidate.recency_subscore = 0.0;

    candidate.mood_subscore =
        mood_distance as f32 / weights.ideal_mood_distance * weights.mood_weight;
    candidate.evaluated_score = candidate.recency_subscore + candidate.mood_subscore;
}

/// Density and last-use score over the usage history. Currently not part of
/// the total; see [`score_candidate`].
fn usage_recency_score(candidate: &ConclusionEvent, weights: &SelectionWeights) -> f32 {
    const DENSITY_WEIGHT: f32 = 0.67;
    const LAST_USAGE_WEIGHT: f32 = 0.5;

    match candidate.narrative_usage.last() {
        None => 0.0,
        Some(&last) => {
            let appearances = candidate.narrative_usage.len() as f32;
            let raw = appearances * DENSITY_WEIGHT + last as f32 / LAST_USAGE_WEIGHT;
            raw * weights.recency_weight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mood_graph::MoodEdge;
    use crate::schema::event::{Attitude, CharacterTag, Event, EventAction, EventRole, Mood};
    use rand::SeedableRng;

    fn conclusion(action: EventAction, mood: Mood) -> ConclusionEvent {
        ConclusionEvent::new(Event {
            subject: EventRole {
                tag: CharacterTag::Protagonist,
                initial_attitude: Attitude::default(),
                final_attitude: Attitude::default(),
            },
            action,
            object: None,
            setting: None,
            time_of_day: None,
            mood,
        })
    }

    fn narrative_ending_in(mood: Mood) -> GeneratedNarrative {
        GeneratedNarrative {
            initialized: true,
            conclusion: Some(conclusion(EventAction::LosesJob, mood)),
            events: Vec::new(),
            cast: Vec::new(),
        }
    }

    fn line_graph() -> MoodGraph {
        // Joyful -2- Serene -4- Melancholy
        MoodGraph::build(
            &[Mood::Joyful, Mood::Serene, Mood::Melancholy],
            &[
                MoodEdge { a: Mood::Joyful, b: Mood::Serene, distance: 2 },
                MoodEdge { a: Mood::Serene, b: Mood::Melancholy, distance: 4 },
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = select_best(&mut [], &[], &line_graph(), &SelectionWeights::default(), &mut rng);
        assert_eq!(result, Err(SelectionError::NoCandidates));
    }

    #[test]
    fn single_candidate_without_history() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = vec![conclusion(EventAction::DepartsTheTown, Mood::Serene)];
        let chosen = select_best(&mut pool, &[], &line_graph(), &SelectionWeights::default(), &mut rng)
            .unwrap();
        assert_eq!(chosen.event.action, EventAction::DepartsTheTown);
        assert_eq!(chosen.narrative_usage, vec![0]);
        assert_eq!(pool[0].narrative_usage, vec![0]);
    }

    #[test]
    fn random_pick_without_history_covers_pool() {
        let mut seen = std::collections::HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = vec![
                conclusion(EventAction::DepartsTheTown, Mood::Serene),
                conclusion(EventAction::LosesJob, Mood::Joyful),
                conclusion(EventAction::BecomesADrunk, Mood::Melancholy),
            ];
            let chosen =
                select_best(&mut pool, &[], &line_graph(), &SelectionWeights::default(), &mut rng)
                    .unwrap();
            seen.insert(chosen.event.action);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn farthest_mood_scores_highest() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = vec![
            conclusion(EventAction::DepartsTheTown, Mood::Serene),
            conclusion(EventAction::BecomesADrunk, Mood::Melancholy),
            conclusion(EventAction::LosesJob, Mood::Joyful),
        ];
        let history = vec![narrative_ending_in(Mood::Joyful)];
        let weights = SelectionWeights::default();
        let chosen = select_best(&mut pool, &history, &line_graph(), &weights, &mut rng).unwrap();

        assert_eq!(chosen.event.action, EventAction::BecomesADrunk);
        assert_eq!(chosen.narrative_usage, vec![1]);
        assert!((chosen.mood_subscore - 6.0 / 3.0 * 0.67).abs() < 1e-6);
        assert_eq!(chosen.recency_subscore, 0.0);
        assert_eq!(pool[2].evaluated_score, 0.0);
        assert!(pool[0].narrative_usage.is_empty());
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = vec![
            conclusion(EventAction::DepartsTheTown, Mood::Melancholy),
            conclusion(EventAction::BecomesADrunk, Mood::Melancholy),
        ];
        let history = vec![narrative_ending_in(Mood::Joyful)];
        let chosen =
            select_best(&mut pool, &history, &line_graph(), &SelectionWeights::default(), &mut rng)
                .unwrap();
        assert_eq!(chosen.event.action, EventAction::DepartsTheTown);
    }

    #[test]
    fn recency_is_computed_but_not_applied() {
        let mut candidate = conclusion(EventAction::LosesJob, Mood::Serene);
        candidate.narrative_usage = vec![0, 3, 4];
        let weights = SelectionWeights::default();
        assert!(usage_recency_score(&candidate, &weights) > 0.0);

        score_candidate(&mut candidate, 3, &weights);
        assert_eq!(candidate.recency_subscore, 0.0);
        assert!((candidate.evaluated_score - 0.67).abs() < 1e-6);
    }

    #[test]
    fn unknown_candidate_mood_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = vec![conclusion(EventAction::LosesJob, Mood::Romantic)];
        let history = vec![narrative_ending_in(Mood::Joyful)];
        let result = select_best(&mut pool, &history, &line_graph(), &SelectionWeights::default(), &mut rng);
        assert_eq!(
            result,
            Err(SelectionError::MoodGraph(MoodGraphError::NotFound(Mood::Romantic)))
        );
    }

    #[test]
    fn failed_scoring_leaves_pool_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = vec![
            conclusion(EventAction::BecomesADrunk, Mood::Melancholy),
            conclusion(EventAction::LosesJob, Mood::Romantic),
        ];
        let before = pool.clone();
        let history = vec![narrative_ending_in(Mood::Joyful)];
        let result = select_best(&mut pool, &history, &line_graph(), &SelectionWeights::default(), &mut rng);
        assert!(result.is_err());
        assert_eq!(pool, before);
    }

    #[test]
    fn unreachable_mood_counts_as_maximal() {
        let graph = MoodGraph::build(
            &[Mood::Joyful, Mood::Serene, Mood::Exciting],
            &[MoodEdge { a: Mood::Joyful, b: Mood::Serene, distance: 9 }],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = vec![
            conclusion(EventAction::LosesJob, Mood::Serene),
            conclusion(EventAction::CaughtRobbing, Mood::Exciting),
        ];
        let history = vec![narrative_ending_in(Mood::Joyful)];
        let chosen =
            select_best(&mut pool, &history, &graph, &SelectionWeights::default(), &mut rng).unwrap();
        assert_eq!(chosen.event.action, EventAction::CaughtRobbing);
    }
}
