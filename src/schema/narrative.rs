use serde::{Deserialize, Serialize};

use super::character::CharacterTemplate;
use super::event::{ConclusionEvent, Event};

/// One generated narrative: its conclusion plus the body events leading to it.
///
/// `conclusion` is a snapshot taken at selection time, so later scoring
/// passes over the pool do not rewrite history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedNarrative {
    pub initialized: bool,
    pub conclusion: Option<ConclusionEvent>,
    pub events: Vec<Event>,
    pub cast: Vec<CharacterTemplate>,
}

impl GeneratedNarrative {
    pub fn conclusion_mood(&self) -> Option<super::event::Mood> {
        self.conclusion.as_ref().map(|c| c.mood())
    }
}
