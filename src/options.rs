//! Difficulty-calibrated distractor generation.
//!
//! Given the correct sentence and the full sentence pool, pick `count - 1`
//! distractors ranked by a per-difficulty similarity score (ascending):
//!   - easy   : `-length_diff`, no length band, the tail of the ranking is taken
//!   - normal : `length_diff` inside a length band, the head is taken
//!   - hard   : `length_diff - w * shared_chars` inside a tighter band, the head is taken
//! The result is shuffled so the correct option has no fixed position.
//!
//! Lengths are counted in chars, which matches what a reader sees for Han text.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::OptionsConfig;
use crate::domain::{DifficultyLevel, PoemOption};
use crate::error::OptionsError;

/// Build a shuffled option set: one correct option plus up to `count - 1` distractors.
///
/// When the pool holds too few distinct candidates, every candidate is used and the
/// result is shorter than `count`.
pub fn generate_options<R: Rng + ?Sized>(
  cfg: &OptionsConfig,
  correct: &str,
  count: usize,
  pool: &[String],
  difficulty: DifficultyLevel,
  rng: &mut R,
) -> Result<Vec<PoemOption>, OptionsError> {
  if count == 0 {
    return Err(OptionsError::InvalidCount);
  }
  if correct.trim().is_empty() {
    return Err(OptionsError::EmptySentence);
  }
  let wanted = count - 1;

  // Distinct candidates in pool order; the answer itself is never a candidate.
  let mut seen = HashSet::new();
  let candidates: Vec<&str> = pool
    .iter()
    .map(String::as_str)
    .filter(|s| *s != correct && seen.insert(*s))
    .collect();

  if candidates.len() <= wanted {
    return Ok(assemble(correct, &candidates, rng));
  }

  let correct_len = correct.chars().count();
  let length_diff = |s: &str| s.chars().count().abs_diff(correct_len);

  let mut pick: Vec<&str> = match difficulty {
    DifficultyLevel::Easy => candidates.clone(),
    DifficultyLevel::Normal | DifficultyLevel::Hard => {
      let band = cfg.max_length_diff.for_level(difficulty);
      let banded: Vec<&str> = candidates.iter().copied().filter(|s| length_diff(*s) <= band).collect();
      // Never let the band starve the generator.
      if banded.len() < wanted { candidates.clone() } else { banded }
    }
  };

  let similarity = |s: &str| -> f64 {
    let diff = length_diff(s) as f64;
    match difficulty {
      DifficultyLevel::Easy => -diff,
      DifficultyLevel::Normal => diff,
      DifficultyLevel::Hard => {
        let common = s.chars().filter(|c| correct.contains(*c)).count() as f64;
        diff - cfg.common_char_weight * common
      }
    }
  };

  // Stable, so equal scores keep pool order.
  pick.sort_by(|a, b| similarity(*a).total_cmp(&similarity(*b)));

  let chosen: &[&str] = match difficulty {
    DifficultyLevel::Easy => &pick[pick.len() - wanted..],
    DifficultyLevel::Normal | DifficultyLevel::Hard => &pick[..wanted],
  };

  Ok(assemble(correct, chosen, rng))
}

fn assemble<R: Rng + ?Sized>(correct: &str, distractors: &[&str], rng: &mut R) -> Vec<PoemOption> {
  let mut options = Vec::with_capacity(distractors.len() + 1);
  options.push(PoemOption::new(correct, true));
  options.extend(distractors.iter().map(|s| PoemOption::new(s, false)));
  // Fisher-Yates
  options.shuffle(rng);
  options
}
