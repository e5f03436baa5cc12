/// Narrative body — the extension point that fills a narrative with events
/// after its conclusion is chosen, and casts characters into them.

use crate::core::context::NarrativeContext;
use crate::schema::event::Event;
use crate::schema::narrative::GeneratedNarrative;

/// Strategy for building the events that lead up to a conclusion.
///
/// The orchestrator calls `cast_characters` for the conclusion, then loops
/// `next_event` / `cast_characters` until `has_converged` returns true or the
/// configured event cap is hit.
pub trait NarrativeBodyPolicy: std::fmt::Debug {
    fn has_converged(&self, narrative: &GeneratedNarrative) -> bool;

    /// The next body event, or `None` if the policy has nothing to add.
    fn next_event(&mut self, context: &mut NarrativeContext) -> Option<Event>;

    /// Record the characters taking part in `event` on `narrative`.
    fn cast_characters(
        &mut self,
        narrative: &mut GeneratedNarrative,
        event: &Event,
        context: &NarrativeContext,
    );
}

/// Converges before any body event is added and casts nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateConvergence;

impl NarrativeBodyPolicy for ImmediateConvergence {
    fn has_converged(&self, _narrative: &GeneratedNarrative) -> bool {
        true
    }

    fn next_event(&mut self, _context: &mut NarrativeContext) -> Option<Event> {
        None
    }

    fn cast_characters(
        &mut self,
        _narrative: &mut GeneratedNarrative,
        _event: &Event,
        _context: &NarrativeContext,
    ) {
    }
}
