//! Loading quiz configuration (option bands, scoring rules, rank table) from TOML.
//!
//! Every section is optional; missing keys fall back to `QuizConfig::default()`.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{DifficultyLevel, DifficultyMode, RankTier};
use crate::seeds::{seed_rank_tiers, FREE_MAX_SCORE};

/// Top-level config. Example:
///
/// ```toml
/// free_max_score = 25
/// [options]
/// count = 4
/// [options.max_length_diff]
/// hard = 1
/// [scoring.hard]
/// correct = 2
/// incorrect = -2
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
  pub options: OptionsConfig,
  pub scoring: ScoringRules,
  /// Score cap for accounts without the paid entitlement.
  pub free_max_score: u32,
  pub ranks: Vec<RankTier>,
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      options: OptionsConfig::default(),
      scoring: ScoringRules::default(),
      free_max_score: FREE_MAX_SCORE,
      ranks: seed_rank_tiers(),
    }
  }
}

/// Tuning knobs for the distractor generator.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
  /// Options per question, correct one included.
  pub count: usize,
  pub default_difficulty: DifficultyLevel,
  pub max_length_diff: LengthBands,
  /// Weight of shared characters in the hard-mode similarity score.
  pub common_char_weight: f64,
}

impl Default for OptionsConfig {
  fn default() -> Self {
    Self {
      count: 4,
      default_difficulty: DifficultyLevel::Normal,
      max_length_diff: LengthBands::default(),
      common_char_weight: 0.5,
    }
  }
}

/// Allowed length difference (in characters) between a distractor and the answer.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct LengthBands {
  /// Accepted for symmetry but inert: easy mode never filters by length.
  pub easy: usize,
  pub normal: usize,
  pub hard: usize,
}

impl Default for LengthBands {
  fn default() -> Self {
    Self { easy: 3, normal: 2, hard: 1 }
  }
}

impl LengthBands {
  pub fn for_level(&self, level: DifficultyLevel) -> usize {
    match level {
      DifficultyLevel::Easy => self.easy,
      DifficultyLevel::Normal => self.normal,
      DifficultyLevel::Hard => self.hard,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreRule {
  pub correct: i32,
  pub incorrect: i32,
}

/// Score deltas per mode. A `[scoring.<mode>]` table may set either key;
/// the other keeps that mode's default.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(from = "ScoringSection")]
pub struct ScoringRules {
  pub easy: ScoreRule,
  pub hard: ScoreRule,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ScoringSection {
  easy: PartialRule,
  hard: PartialRule,
}

#[derive(Default, Deserialize)]
struct PartialRule {
  correct: Option<i32>,
  incorrect: Option<i32>,
}

impl PartialRule {
  fn over(self, base: ScoreRule) -> ScoreRule {
    ScoreRule {
      correct: self.correct.unwrap_or(base.correct),
      incorrect: self.incorrect.unwrap_or(base.incorrect),
    }
  }
}

impl From<ScoringSection> for ScoringRules {
  fn from(s: ScoringSection) -> Self {
    let base = ScoringRules::default();
    Self { easy: s.easy.over(base.easy), hard: s.hard.over(base.hard) }
  }
}

impl Default for ScoringRules {
  fn default() -> Self {
    Self {
      easy: ScoreRule { correct: 1, incorrect: -1 },
      hard: ScoreRule { correct: 2, incorrect: -2 },
    }
  }
}

impl ScoringRules {
  pub fn delta(&self, mode: DifficultyMode, correct: bool) -> i32 {
    let rule = match mode {
      DifficultyMode::Easy => self.easy,
      DifficultyMode::Hard => self.hard,
    };
    if correct { rule.correct } else { rule.incorrect }
  }
}

pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "chinpoem_backend", %path, ranks = cfg.ranks.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "chinpoem_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "chinpoem_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_yields_defaults() {
    let cfg = parse_quiz_config("").unwrap();
    assert_eq!(cfg.free_max_score, 25);
    assert_eq!(cfg.options.count, 4);
    assert_eq!(cfg.options.max_length_diff.for_level(DifficultyLevel::Hard), 1);
    assert_eq!(cfg.ranks.len(), 11);
    assert_eq!(cfg.scoring.delta(DifficultyMode::Hard, false), -2);
  }

  #[test]
  fn partial_sections_override_only_given_keys() {
    let cfg = parse_quiz_config(
      r#"
free_max_score = 45
[options]
count = 3
default_difficulty = "hard"
[options.max_length_diff]
normal = 4
[scoring.easy]
correct = 3
incorrect = 0
"#,
    )
    .unwrap();
    assert_eq!(cfg.free_max_score, 45);
    assert_eq!(cfg.options.count, 3);
    assert_eq!(cfg.options.default_difficulty, DifficultyLevel::Hard);
    assert_eq!(cfg.options.max_length_diff.normal, 4);
    assert_eq!(cfg.options.max_length_diff.easy, 3);
    assert_eq!(cfg.options.common_char_weight, 0.5);
    assert_eq!(cfg.scoring.delta(DifficultyMode::Easy, true), 3);
    assert_eq!(cfg.scoring.delta(DifficultyMode::Hard, true), 2);
  }

  #[test]
  fn scoring_table_may_set_a_single_key() {
    let cfg = parse_quiz_config("[scoring.easy]\ncorrect = 3\n[scoring.hard]\nincorrect = -5\n").unwrap();
    assert_eq!(cfg.scoring.easy, ScoreRule { correct: 3, incorrect: -1 });
    assert_eq!(cfg.scoring.hard, ScoreRule { correct: 2, incorrect: -5 });

    let cfg = parse_quiz_config("[scoring]\n").unwrap();
    assert_eq!(cfg.scoring.delta(DifficultyMode::Easy, false), -1);
  }

  #[test]
  fn custom_rank_table_parses() {
    let cfg = parse_quiz_config(
      r#"
[[ranks]]
key = "low"
name = "低"
min_score = 0
max_score = 9

[[ranks]]
key = "high"
name = "高"
min_score = 10
requires_premium = true
"#,
    )
    .unwrap();
    assert_eq!(cfg.ranks.len(), 2);
    assert_eq!(cfg.ranks[1].max_score, None);
    assert!(cfg.ranks[1].requires_premium);
  }
}
