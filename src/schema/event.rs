use serde::{Deserialize, Serialize};

/// The tonal category of an event. These are the vertices of the mood graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mood {
    Joyful,
    Optimistic,
    Playful,
    Empathetic,
    Sentimental,
    Serene,
    Inquisitive,
    Romantic,
    Exciting,
    Disturbing,
    Depressing,
    Melancholy,
}

impl Mood {
    /// Every mood category, in declaration order.
    pub const ALL: [Mood; 12] = [
        Mood::Joyful,
        Mood::Optimistic,
        Mood::Playful,
        Mood::Empathetic,
        Mood::Sentimental,
        Mood::Serene,
        Mood::Inquisitive,
        Mood::Romantic,
        Mood::Exciting,
        Mood::Disturbing,
        Mood::Depressing,
        Mood::Melancholy,
    ];

    /// Returns the tag string for this mood (e.g., "mood:joyful").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Joyful => "mood:joyful",
            Self::Optimistic => "mood:optimistic",
            Self::Playful => "mood:playful",
            Self::Empathetic => "mood:empathetic",
            Self::Sentimental => "mood:sentimental",
            Self::Serene => "mood:serene",
            Self::Inquisitive => "mood:inquisitive",
            Self::Romantic => "mood:romantic",
            Self::Exciting => "mood:exciting",
            Self::Disturbing => "mood:disturbing",
            Self::Depressing => "mood:depressing",
            Self::Melancholy => "mood:melancholy",
        }
    }
}

/// Which cast member an event slot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterTag {
    Protagonist,
    /// Numbered supporting character (1-based).
    Character(u8),
}

/// The attitude a character holds before or after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Attitude {
    #[default]
    Indifferent,
    Depressed,
    Joyful,
    Amazed,
    Bold,
    Comfortable,
    Optimistic,
    Proud,
    Aggravated,
    Pessimistic,
    Tense,
    Anxious,
    Tired,
    Disturbed,
    Curious,
    Shy,
    Sentimental,
}

/// What happens in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventAction {
    KilledInHitAndRun,
    DepartsTheTown,
    DivorcesAndEndsMarriageWith,
    SentencedToPrison,
    PromisesToBeBetter,
    BecomesADrunk,
    LosesJob,
    CaughtRobbing,
    WinsLawsuitAgainst,
    RevealedPregnantWithChildOf,
}

impl EventAction {
    /// Lowercase phrase used in summaries, e.g. "loses their job".
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::KilledInHitAndRun => "is killed in a hit and run",
            Self::DepartsTheTown => "departs the town",
            Self::DivorcesAndEndsMarriageWith => "divorces and ends the marriage with",
            Self::SentencedToPrison => "is sentenced to prison",
            Self::PromisesToBeBetter => "promises to be better",
            Self::BecomesADrunk => "becomes a drunk",
            Self::LosesJob => "loses their job",
            Self::CaughtRobbing => "is caught robbing",
            Self::WinsLawsuitAgainst => "wins a lawsuit against",
            Self::RevealedPregnantWithChildOf => "is revealed pregnant with the child of",
        }
    }
}

/// Time-of-day windows an event may be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// 4 AM to 6 AM
    Dawn,
    /// 6 AM to 8 AM
    EarlyMorning,
    /// 8 AM to 12 PM
    LateMorning,
    /// 12 PM to 1 PM
    Noon,
    /// 1 PM to 3 PM
    EarlyAfternoon,
    /// 3 PM to 5 PM
    LateAfternoon,
    /// 5 PM to 8 PM
    EarlyNight,
    /// 8 PM to 4 AM
    LateNight,
}

/// A character slot in an event along with the attitude it starts and ends with.
///
/// The initial attitude is an ideal case, not a guarantee. The final attitude
/// is what the event leaves the character with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRole {
    pub tag: CharacterTag,
    #[serde(default)]
    pub initial_attitude: Attitude,
    #[serde(default)]
    pub final_attitude: Attitude,
}

/// An authored narrative event: a subject performs an action, optionally on
/// an object, optionally constrained to a setting and a time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub subject: EventRole,
    pub action: EventAction,
    #[serde(default)]
    pub object: Option<EventRole>,
    /// Overrides the setting chosen at runtime.
    #[serde(default)]
    pub setting: Option<String>,
    /// Overrides the time of day chosen at runtime.
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    pub mood: Mood,
}

impl Event {
    /// One-line description, e.g. "Protagonist loses their job [mood:depressing]".
    pub fn describe(&self) -> String {
        let mut out = format!("{:?} {}", self.subject.tag, self.action.phrase());
        if let Some(ref object) = self.object {
            out.push_str(&format!(" {:?}", object.tag));
        }
        out.push_str(&format!(" [{}]", self.mood.tag()));
        out
    }
}

/// An event that can end a narrative. Carries its scoring state and the
/// indices of every narrative it has concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConclusionEvent {
    pub event: Event,
    #[serde(default)]
    pub evaluated_score: f32,
    #[serde(default)]
    pub recency_subscore: f32,
    #[serde(default)]
    pub mood_subscore: f32,
    /// Append-only; the only record of how recently this event was used.
    #[serde(default)]
    pub narrative_usage: Vec<usize>,
}

impl ConclusionEvent {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            evaluated_score: 0.0,
            recency_subscore: 0.0,
            mood_subscore: 0.0,
            narrative_usage: Vec::new(),
        }
    }

    pub fn mood(&self) -> Mood {
        self.event.mood
    }

    pub fn describe(&self) -> String {
        format!(
            "{} (score {:.3}, used in {:?})",
            self.event.describe(),
            self.evaluated_score,
            self.narrative_usage
        )
    }
}
