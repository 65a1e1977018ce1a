//! Domain models used by the backend: poems, quiz options, rank tiers, accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of a poem, addressed by its sentence id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoemSentence {
  pub senid: u32,
  pub content: String,
}

/// A Chinese poem as stored in `poem_chinese.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Poem {
  pub id: String,
  pub title: String,
  pub author: String,
  pub sentence: Vec<PoemSentence>,
}

/// A translation of a poem; sentence ids line up with the Chinese original.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranslatedPoem {
  pub id: String,
  #[serde(default)] pub title: Option<String>,
  #[serde(default)] pub author: Option<String>,
  pub sentence: Vec<PoemSentence>,
}

/// Languages a learner can play in.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  Chinese,
  English,
  French,
  Spanish,
  German,
  Japanese,
}

impl Default for Language {
  fn default() -> Self { Language::English }
}

impl Language {
  pub const ALL: [Language; 6] = [
    Language::Chinese,
    Language::English,
    Language::French,
    Language::Spanish,
    Language::German,
    Language::Japanese,
  ];

  /// File stem used by the poem data files (`poem_<stem>.json`).
  pub fn as_str(self) -> &'static str {
    match self {
      Language::Chinese => "chinese",
      Language::English => "english",
      Language::French => "french",
      Language::Spanish => "spanish",
      Language::German => "german",
      Language::Japanese => "japanese",
    }
  }

  pub fn is_chinese(self) -> bool {
    matches!(self, Language::Chinese)
  }

  /// Chinese players get no foreign-language hint.
  pub fn hint_language(self) -> &'static str {
    if self.is_chinese() { "none" } else { self.as_str() }
  }

  /// Chinese mode only supports hard mode; every other language supports both.
  pub fn supports(self, mode: DifficultyMode) -> bool {
    !self.is_chinese() || mode == DifficultyMode::Hard
  }

  pub fn default_mode(self) -> DifficultyMode {
    if self.is_chinese() { DifficultyMode::Hard } else { DifficultyMode::Easy }
  }

  /// Mode to use after switching to this language from `current`.
  pub fn reconcile_mode(self, current: DifficultyMode) -> DifficultyMode {
    if self.supports(current) { current } else { self.default_mode() }
  }
}

/// How similar distractors are to the correct sentence.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
  Easy,
  Normal,
  Hard,
}

impl Default for DifficultyLevel {
  fn default() -> Self { DifficultyLevel::Normal }
}

/// Quiz mode of an account: decides the prompt (translation or not) and score deltas.
/// Kept separate from `DifficultyLevel` on purpose; the two are not interchangeable.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
  Easy,
  Hard,
}

impl Default for DifficultyMode {
  fn default() -> Self { DifficultyMode::Easy }
}

impl DifficultyMode {
  pub fn as_str(self) -> &'static str {
    match self {
      DifficultyMode::Easy => "easy",
      DifficultyMode::Hard => "hard",
    }
  }
}

/// One multiple-choice option.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoemOption {
  pub value: String,
  pub label: String,
  pub is_correct: bool,
}

impl PoemOption {
  pub fn new(sentence: &str, is_correct: bool) -> Self {
    Self { value: sentence.to_string(), label: sentence.to_string(), is_correct }
  }
}

/// One "academic rank" band. `max_score = None` means unbounded.
/// Config files use snake_case keys; API output is camelCase.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RankTier {
  pub key: String,
  pub name: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub emoji: String,
  pub min_score: u32,
  #[serde(default)] pub max_score: Option<u32>,
  #[serde(default)] pub requires_premium: bool,
}

impl RankTier {
  pub fn contains(&self, score: u32) -> bool {
    score >= self.min_score && self.max_score.map_or(true, |max| score <= max)
  }
}

/// Outcome of applying a score delta.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
  pub new_score: u32,
  /// False when the free-tier cap rejected the update; the stored score is unchanged.
  pub applied: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
  pub total_answered: u32,
  pub correct_answers: u32,
  pub incorrect_answers: u32,
  pub last_answered_at: Option<DateTime<Utc>>,
}

impl AccountStats {
  pub fn record(&mut self, correct: bool, at: DateTime<Utc>) {
    self.total_answered += 1;
    if correct {
      self.correct_answers += 1;
    } else {
      self.incorrect_answers += 1;
    }
    self.last_answered_at = Some(at);
  }
}

/// Learner account held in memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  pub account_name: String,
  pub display_name: String,
  pub score: u32,
  pub language: Language,
  pub difficulty: DifficultyMode,
  pub is_paid: bool,
  pub created_at: DateTime<Utc>,
  pub last_updated_at: DateTime<Utc>,
  pub stats: AccountStats,
}

impl Account {
  pub fn new(account_name: String, display_name: Option<String>, language: Language, now: DateTime<Utc>) -> Self {
    let display_name = display_name
      .filter(|d| !d.trim().is_empty())
      .unwrap_or_else(|| account_name.clone());
    Self {
      account_name,
      display_name,
      score: 0,
      language,
      difficulty: language.default_mode(),
      is_paid: false,
      created_at: now,
      last_updated_at: now,
      stats: AccountStats::default(),
    }
  }
}
