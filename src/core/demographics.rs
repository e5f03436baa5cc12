/// Demographics — generation cohort, age, gender and name draws for new
/// cast members.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::character::{Gender, Generation};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DemographicsError {
    #[error("no demographic buckets configured")]
    NoBuckets,
    #[error("no {gender:?} names configured for {generation:?}")]
    EmptyPool { generation: Generation, gender: Gender },
    #[error("bucket for {generation:?} has min age {min} above max age {max}")]
    InvalidAgeRange {
        generation: Generation,
        min: u32,
        max: u32,
    },
}

/// A population segment: its share of the cast, age range and name pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicBucket {
    pub generation: Generation,
    /// 0.0..1.0
    pub population_share: f64,
    pub min_age: u32,
    pub max_age: u32,
    #[serde(default)]
    pub male_names: Vec<String>,
    #[serde(default)]
    pub female_names: Vec<String>,
    /// Sum of shares of this bucket and every bucket before it.
    #[serde(skip)]
    pub cumulative_bound: f64,
}

impl DemographicBucket {
    pub fn names_for(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.male_names,
            Gender::Female => &self.female_names,
        }
    }
}

/// Fill in `cumulative_bound` for each bucket, in declaration order.
pub fn compute_intervals(buckets: &mut [DemographicBucket]) {
    let mut start = 0.0;
    for bucket in buckets.iter_mut() {
        bucket.cumulative_bound = start + bucket.population_share;
        start = bucket.cumulative_bound;
    }
}

/// Outcome of a cohort draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortDraw {
    pub generation: Generation,
    pub age: u32,
    pub bucket_index: usize,
    /// The draw matched no interval and the last bucket was used instead.
    pub fell_through: bool,
    /// The first age drawn from the terminal cohort was zero and was redrawn.
    pub resampled: bool,
}

/// Pick a cohort by population share, then an age within its range.
///
/// Buckets are matched against their `cumulative_bound`s, so run
/// [`compute_intervals`] first. A draw past the final bound falls back to
/// the last bucket. A zero age drawn from the last bucket is
/// redrawn once from the same bounds.
pub fn assign_generation_and_age(
    rng: &mut StdRng,
    buckets: &[DemographicBucket],
) -> Result<CohortDraw, DemographicsError> {
    let last_index = buckets.len().checked_sub(1).ok_or(DemographicsError::NoBuckets)?;
    let draw: f64 = rng.gen();

    let mut selected = None;
    let mut lower = 0.0;
    for (index, bucket) in buckets.iter().enumerate() {
        if draw >= lower && draw < bucket.cumulative_bound {
            selected = Some(index);
            break;
        }
        lower = bucket.cumulative_bound;
    }

    let fell_through = selected.is_none();
    let bucket_index = selected.unwrap_or(last_index);
    if fell_through {
        tracing::warn!(draw, "demographic draw matched no bucket, using the last one");
    }

    let bucket = &buckets[bucket_index];
    let mut age = draw_age(rng, bucket)?;
    let resampled = age == 0 && bucket_index == last_index;
    if resampled {
        tracing::warn!(generation = ?bucket.generation, "redrawing zero age for terminal cohort");
        age = draw_age(rng, bucket)?;
    }

    Ok(CohortDraw {
        generation: bucket.generation,
        age,
        bucket_index,
        fell_through,
        resampled,
    })
}

fn draw_age(rng: &mut StdRng, bucket: &DemographicBucket) -> Result<u32, DemographicsError> {
    if bucket.min_age > bucket.max_age {
        return Err(DemographicsError::InvalidAgeRange {
            generation: bucket.generation,
            min: bucket.min_age,
            max: bucket.max_age,
        });
    }
    Ok(rng.gen_range(bucket.min_age..=bucket.max_age))
}

/// Male iff a uniform draw lands below `male_fraction`.
pub fn assign_gender(rng: &mut StdRng, male_fraction: f32) -> Gender {
    if rng.gen::<f32>() < male_fraction {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// Draw a name from the pool for this generation and gender. When several
/// buckets share a generation, the last one wins.
pub fn assign_name(
    rng: &mut StdRng,
    buckets: &[DemographicBucket],
    generation: Generation,
    gender: Gender,
) -> Result<String, DemographicsError> {
    let pool = buckets
        .iter()
        .rev()
        .find(|b| b.generation == generation)
        .map(|b| b.names_for(gender))
        .unwrap_or_default();

    if pool.is_empty() {
        return Err(DemographicsError::EmptyPool { generation, gender });
    }
    Ok(pool[rng.gen_range(0..pool.len())].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn bucket(generation: Generation, share: f64, min_age: u32, max_age: u32) -> DemographicBucket {
        DemographicBucket {
            generation,
            population_share: share,
            min_age,
            max_age,
            male_names: vec!["James".to_string(), "Robert".to_string()],
            female_names: vec!["Mary".to_string()],
            cumulative_bound: 0.0,
        }
    }

    fn quarter_buckets() -> Vec<DemographicBucket> {
        let mut buckets = vec![
            bucket(Generation::BabyBoomers, 0.25, 60, 78),
            bucket(Generation::GenerationX, 0.25, 44, 59),
            bucket(Generation::Millennials, 0.25, 28, 43),
            bucket(Generation::GenerationZ, 0.25, 12, 27),
        ];
        compute_intervals(&mut buckets);
        buckets
    }

    #[test]
    fn intervals_accumulate_in_order() {
        let buckets = quarter_buckets();
        let bounds: Vec<f64> = buckets.iter().map(|b| b.cumulative_bound).collect();
        assert_eq!(bounds, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn full_partition_never_falls_through() {
        let buckets = quarter_buckets();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100_000 {
            let draw = assign_generation_and_age(&mut rng, &buckets).unwrap();
            assert!(!draw.fell_through);
            let b = &buckets[draw.bucket_index];
            assert_eq!(draw.generation, b.generation);
            assert!(draw.age >= b.min_age && draw.age <= b.max_age);
        }
    }

    #[test]
    fn short_partition_falls_back_to_last_bucket() {
        let mut buckets = vec![
            bucket(Generation::BabyBoomers, 0.0, 60, 78),
            bucket(Generation::GenerationZ, 0.0, 12, 27),
        ];
        compute_intervals(&mut buckets);
        let mut rng = StdRng::seed_from_u64(3);
        let draw = assign_generation_and_age(&mut rng, &buckets).unwrap();
        assert!(draw.fell_through);
        assert_eq!(draw.bucket_index, 1);
        assert_eq!(draw.generation, Generation::GenerationZ);
    }

    #[test]
    fn no_buckets_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            assign_generation_and_age(&mut rng, &[]),
            Err(DemographicsError::NoBuckets)
        );
    }

    #[test]
    fn zero_age_in_terminal_cohort_is_redrawn_once() {
        let mut buckets = vec![bucket(Generation::GenerationZ, 1.0, 0, 1)];
        compute_intervals(&mut buckets);
        let mut rng = StdRng::seed_from_u64(11);
        let mut redraws = 0;
        for _ in 0..1000 {
            // Replay the same stream: cohort draw, first age, optional second age.
            let mut replay = rng.clone();
            let _: f64 = replay.gen();
            let first = replay.gen_range(0..=1u32);

            let draw = assign_generation_and_age(&mut rng, &buckets).unwrap();
            assert_eq!(draw.resampled, first == 0);
            if draw.resampled {
                redraws += 1;
                assert_eq!(draw.age, replay.gen_range(0..=1u32));
            } else {
                assert_eq!(draw.age, first);
            }
        }
        assert!(redraws > 0);
    }

    #[test]
    fn zero_age_in_earlier_cohort_is_kept() {
        let mut buckets = vec![
            bucket(Generation::GenerationZ, 1.0, 0, 1),
            bucket(Generation::Millennials, 0.0, 28, 43),
        ];
        compute_intervals(&mut buckets);
        let mut rng = StdRng::seed_from_u64(11);
        let mut zeros = 0;
        for _ in 0..1000 {
            let draw = assign_generation_and_age(&mut rng, &buckets).unwrap();
            assert_eq!(draw.bucket_index, 0);
            assert!(!draw.resampled);
            if draw.age == 0 {
                zeros += 1;
            }
        }
        assert!(zeros > 0);
    }

    #[test]
    fn inverted_age_range_is_rejected() {
        let mut buckets = vec![bucket(Generation::Millennials, 1.0, 40, 30)];
        compute_intervals(&mut buckets);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            assign_generation_and_age(&mut rng, &buckets),
            Err(DemographicsError::InvalidAgeRange { .. })
        ));
    }

    #[test]
    fn gender_respects_extremes() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(assign_gender(&mut rng, 1.0), Gender::Male);
            assert_eq!(assign_gender(&mut rng, 0.0), Gender::Female);
        }
    }

    #[test]
    fn gender_split_is_roughly_even() {
        let mut rng = StdRng::seed_from_u64(9);
        let males = (0..10_000)
            .filter(|_| assign_gender(&mut rng, 0.5).is_male())
            .count();
        assert!(males > 4_500 && males < 5_500, "got {} males", males);
    }

    #[test]
    fn name_comes_from_matching_pool() {
        let buckets = quarter_buckets();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let name = assign_name(&mut rng, &buckets, Generation::GenerationX, Gender::Male).unwrap();
            assert!(name == "James" || name == "Robert");
        }
        let name = assign_name(&mut rng, &buckets, Generation::GenerationX, Gender::Female).unwrap();
        assert_eq!(name, "Mary");
    }

    #[test]
    fn missing_generation_or_empty_pool_is_an_error() {
        let mut buckets = quarter_buckets();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            assign_name(&mut rng, &buckets, Generation::SilentGeneration, Gender::Male),
            Err(DemographicsError::EmptyPool {
                generation: Generation::SilentGeneration,
                gender: Gender::Male,
            })
        );
        buckets[0].female_names.clear();
        assert!(assign_name(&mut rng, &buckets, Generation::BabyBoomers, Gender::Female).is_err());
    }
}
