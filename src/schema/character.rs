use serde::{Deserialize, Serialize};

use super::relationship::SocialTie;

/// Birth cohort of a character. Drives age range and name pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Generation {
    /// 1945 and before
    SilentGeneration,
    /// 1946 to 1964
    BabyBoomers,
    /// 1965 to 1980
    GenerationX,
    /// 1981 to 1996
    Millennials,
    /// 1997 to 2012
    GenerationZ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn is_male(&self) -> bool {
        matches!(self, Self::Male)
    }

    /// Possessive determiner: "his" or "her".
    pub fn possessive(&self) -> &'static str {
        match self {
            Self::Male => "his",
            Self::Female => "her",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RomanticStatus {
    Married,
    Divorced,
    Widowed,
    #[default]
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupation {
    SoftwareEngineer,
    Doctor,
    Teacher,
    Professor,
    Accountant,
    Actor,
    Architect,
    Artist,
    Author,
    Banker,
    Barber,
}

/// What a character wants most, independent of occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Desire {
    RaiseAFamily,
    AchieveWealth,
    AchieveFame,
    AchieveKnowledge,
    FindLove,
    CollectPossessions,
    BeRespected,
}

fn default_moral_tendency() -> f32 {
    0.5
}

fn default_desire_tendency() -> f32 {
    0.75
}

/// Authored archetype that backs generated characters. Persists across
/// cast generations; `times_used` spreads usage evenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub occupation: Occupation,
    pub salary: u32,
    pub greatest_desire: Desire,
    /// 0.0..1.0
    #[serde(default = "default_moral_tendency")]
    pub moral_tendency: f32,
    /// 0.0..1.0
    #[serde(default = "default_desire_tendency")]
    pub desire_pursuit_tendency: f32,
    #[serde(default)]
    pub times_used: u32,
}

/// Marital state and, when married, the partner's name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RomanticData {
    pub status: RomanticStatus,
    pub partner: Option<String>,
}

/// A generated member of the cast.
///
/// Name, age, generation and gender are fixed at creation. Romantic and
/// social data are filled in by the relationship passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    name: String,
    age: u32,
    generation: Generation,
    gender: Gender,
    template_index: usize,
    pub romantic: RomanticData,
    pub social: Vec<SocialTie>,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        age: u32,
        generation: Generation,
        gender: Gender,
        template_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            generation,
            gender,
            template_index,
            romantic: RomanticData::default(),
            social: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Index of the backing template in the cast configuration.
    pub fn template_index(&self) -> usize {
        self.template_index
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({}, {:?}, {:?}) {:?}{}",
            self.name,
            self.age,
            self.generation,
            self.gender,
            self.romantic.status,
            self.romantic
                .partner
                .as_deref()
                .map(|p| format!(" to {}", p))
                .unwrap_or_default(),
        )
    }
}
