/// Romantic pairing — marital status draws and greedy spouse matching.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::schema::character::{Character, RomanticStatus};

/// Marital status shares, consumed in the order married, divorced, widowed.
/// The remainder is single.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RomanticPercentages {
    pub married: f32,
    pub divorced: f32,
    pub widowed: f32,
    /// Informational; singles take the residual share.
    #[serde(default)]
    pub single: f32,
}

impl Default for RomanticPercentages {
    fn default() -> Self {
        Self {
            married: 0.6754,
            divorced: 0.1509,
            widowed: 0.0358,
            single: 0.4735,
        }
    }
}

/// Map a uniform draw onto a status using cumulative, inclusive bounds.
pub fn status_from_draw(draw: f32, percentages: &RomanticPercentages) -> RomanticStatus {
    let draw = draw.clamp(0.0, 1.0);
    let mut bound = percentages.married;
    if draw <= bound {
        return RomanticStatus::Married;
    }
    bound += percentages.divorced;
    if draw <= bound {
        return RomanticStatus::Divorced;
    }
    bound += percentages.widowed;
    if draw <= bound {
        return RomanticStatus::Widowed;
    }
    RomanticStatus::Single
}

/// Draw a status for every character. Returns the cast indices of married
/// characters, in cast order, as the queue for [`pair`].
pub fn assign_statuses(
    characters: &mut [Character],
    rng: &mut StdRng,
    percentages: &RomanticPercentages,
) -> Vec<usize> {
    let mut pending = Vec::new();
    for (index, character) in characters.iter_mut().enumerate() {
        character.romantic.status = status_from_draw(rng.gen(), percentages);
        character.romantic.partner = None;
        if character.romantic.status == RomanticStatus::Married {
            pending.push(index);
        }
    }
    tracing::debug!(waiting = pending.len(), "characters waiting for marriage partners");
    pending
}

/// What [`pair`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingReport {
    pub pairs: Vec<(usize, usize)>,
    /// Characters demoted to single for lack of a partner.
    pub demoted: Vec<usize>,
}

/// Greedily pair married characters.
///
/// For each unpaired entry, the whole queue is rescanned from the start for
/// the first unpaired, still-married character of the same generation and
/// opposite gender. Characters left without a match become single.
pub fn pair(pending: &[usize], characters: &mut [Character]) -> PairingReport {
    let mut paired = vec![false; characters.len()];
    let mut report = PairingReport::default();

    for &index in pending {
        if paired[index] {
            continue;
        }

        let seeker = &characters[index];
        let partner = pending.iter().copied().find(|&candidate| {
            let other = &characters[candidate];
            !paired[candidate]
                && other.romantic.status == RomanticStatus::Married
                && other.generation() == seeker.generation()
                && other.gender() != seeker.gender()
        });

        match partner {
            Some(partner) => {
                let seeker_name = characters[index].name().to_string();
                let partner_name = characters[partner].name().to_string();
                characters[index].romantic.partner = Some(partner_name);
                characters[partner].romantic.partner = Some(seeker_name);
                paired[index] = true;
                paired[partner] = true;
                report.pairs.push((index, partner));
            }
            None => {
                let character = &mut characters[index];
                tracing::warn!(
                    name = character.name(),
                    "no spouse available, character is now single"
                );
                character.romantic.status = RomanticStatus::Single;
                character.romantic.partner = None;
                report.demoted.push(index);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::character::{Gender, Generation};
    use rand::SeedableRng;

    fn married(name: &str, generation: Generation, gender: Gender) -> Character {
        let mut c = Character::new(name, 40, generation, gender, 0);
        c.romantic.status = RomanticStatus::Married;
        c
    }

    #[test]
    fn status_bands_are_inclusive() {
        let pct = RomanticPercentages {
            married: 0.5,
            divorced: 0.2,
            widowed: 0.1,
            single: 0.2,
        };
        assert_eq!(status_from_draw(0.0, &pct), RomanticStatus::Married);
        assert_eq!(status_from_draw(0.5, &pct), RomanticStatus::Married);
        assert_eq!(status_from_draw(0.6, &pct), RomanticStatus::Divorced);
        assert_eq!(status_from_draw(0.75, &pct), RomanticStatus::Widowed);
        assert_eq!(status_from_draw(0.95, &pct), RomanticStatus::Single);
        assert_eq!(status_from_draw(7.0, &pct), RomanticStatus::Single);
    }

    #[test]
    fn assign_collects_married_in_order() {
        let mut characters: Vec<Character> = (0..10)
            .map(|i| Character::new(format!("c{}", i), 30, Generation::Millennials, Gender::Male, 0))
            .collect();
        let mut rng = StdRng::seed_from_u64(4);
        let all_married = RomanticPercentages {
            married: 1.0,
            divorced: 0.0,
            widowed: 0.0,
            single: 0.0,
        };
        let pending = assign_statuses(&mut characters, &mut rng, &all_married);
        assert_eq!(pending, (0..10).collect::<Vec<_>>());

        let none_married = RomanticPercentages {
            married: 0.0,
            divorced: 0.0,
            widowed: 0.0,
            single: 1.0,
        };
        let pending = assign_statuses(&mut characters, &mut rng, &none_married);
        assert!(pending.len() <= 1, "only an exact zero draw can marry");
    }

    #[test]
    fn pairs_opposite_gender_same_generation() {
        let mut characters = vec![
            married("Al", Generation::GenerationX, Gender::Male),
            married("Bo", Generation::GenerationX, Gender::Male),
            married("Cat", Generation::Millennials, Gender::Female),
            married("Di", Generation::GenerationX, Gender::Female),
        ];
        let report = pair(&[0, 1, 2, 3], &mut characters);

        assert_eq!(report.pairs, vec![(0, 3)]);
        assert_eq!(report.demoted, vec![1, 2]);
        assert_eq!(characters[0].romantic.partner.as_deref(), Some("Di"));
        assert_eq!(characters[3].romantic.partner.as_deref(), Some("Al"));
        assert_eq!(characters[1].romantic.status, RomanticStatus::Single);
        assert!(characters[1].romantic.partner.is_none());
        assert_eq!(characters[2].romantic.status, RomanticStatus::Single);
    }

    #[test]
    fn already_paired_entries_are_skipped() {
        // Di claims Al; Fay then skips the paired entries and finds Ed.
        let mut characters = vec![
            married("Di", Generation::GenerationZ, Gender::Female),
            married("Fay", Generation::Millennials, Gender::Female),
            married("Al", Generation::GenerationZ, Gender::Male),
            married("Ed", Generation::Millennials, Gender::Male),
        ];
        let report = pair(&[0, 1, 2, 3], &mut characters);
        assert_eq!(report.pairs, vec![(0, 2), (1, 3)]);
        assert!(report.demoted.is_empty());
    }

    #[test]
    fn every_married_has_partner_every_single_has_none() {
        let genders = [Gender::Male, Gender::Female];
        let generations = [Generation::GenerationX, Generation::Millennials];
        let mut characters: Vec<Character> = (0..12)
            .map(|i| married(&format!("c{}", i), generations[i % 2], genders[(i / 3) % 2]))
            .collect();
        let pending: Vec<usize> = (0..12).collect();
        pair(&pending, &mut characters);

        for c in &characters {
            match c.romantic.status {
                RomanticStatus::Married => assert!(c.romantic.partner.is_some()),
                _ => assert!(c.romantic.partner.is_none()),
            }
        }
        for c in characters.iter().filter(|c| c.romantic.status == RomanticStatus::Married) {
            let partner_name = c.romantic.partner.as_deref().unwrap();
            let partner = characters.iter().find(|p| p.name() == partner_name).unwrap();
            assert_eq!(partner.romantic.partner.as_deref(), Some(c.name()));
        }
    }
}
