//! In-memory poem repository: the Chinese corpus, its translations, and the
//! flat sentence pool the option generator draws distractors from.

use std::collections::HashMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::domain::{DifficultyMode, Language, Poem, PoemSentence, TranslatedPoem};
use crate::error::RepoError;
use crate::seeds::{seed_poems, seed_translations};

/// Placeholder shown instead of the line being asked about.
pub const MASK: &str = "＿＿＿＿＿";

#[derive(Clone, Debug)]
pub struct PoemRepository {
  poems: Vec<Poem>,
  translations: HashMap<Language, HashMap<String, TranslatedPoem>>,
  sentences: Vec<String>,
}

impl PoemRepository {
  pub fn new(poems: Vec<Poem>, translations: HashMap<Language, Vec<TranslatedPoem>>) -> Self {
    let sentences = poems
      .iter()
      .flat_map(|p| p.sentence.iter().map(|s| s.content.clone()))
      .collect();
    let translations = translations
      .into_iter()
      .map(|(lang, list)| (lang, list.into_iter().map(|t| (t.id.clone(), t)).collect()))
      .collect();
    Self { poems, translations, sentences }
  }

  /// Built-in corpus (a handful of well-known poems with English translations).
  pub fn seeded() -> Self {
    Self::new(seed_poems(), seed_translations())
  }

  /// Load `poem_chinese.json` (required) and any `poem_<language>.json` present in `dir`.
  pub fn load_dir(dir: &Path) -> Result<Self, RepoError> {
    let poems: Vec<Poem> = read_json(&dir.join("poem_chinese.json"))?;
    let mut translations = HashMap::new();
    for lang in Language::ALL.into_iter().filter(|l| !l.is_chinese()) {
      let path = dir.join(format!("poem_{}.json", lang.as_str()));
      if !path.exists() {
        continue;
      }
      let list: Vec<TranslatedPoem> = read_json(&path)?;
      info!(target: "chinpoem_backend", language = lang.as_str(), poems = list.len(), "Loaded translations");
      translations.insert(lang, list);
    }
    info!(target: "chinpoem_backend", dir = %dir.display(), poems = poems.len(), "Loaded poem corpus");
    Ok(Self::new(poems, translations))
  }

  /// POEM_DATA_DIR when set and loadable, otherwise the built-in corpus.
  pub fn from_env() -> Self {
    let Ok(dir) = std::env::var("POEM_DATA_DIR") else {
      info!(target: "chinpoem_backend", "POEM_DATA_DIR not set; using built-in poems");
      return Self::seeded();
    };
    match Self::load_dir(Path::new(&dir)) {
      Ok(repo) if !repo.poems.is_empty() => repo,
      Ok(_) => {
        warn!(target: "chinpoem_backend", %dir, "Poem data is empty; using built-in poems");
        Self::seeded()
      }
      Err(e) => {
        warn!(target: "chinpoem_backend", %dir, error = %e, "Failed to load poem data; using built-in poems");
        Self::seeded()
      }
    }
  }

  pub fn poems(&self) -> &[Poem] {
    &self.poems
  }

  /// Every sentence of every Chinese poem, in corpus order (duplicates kept).
  pub fn all_sentences(&self) -> &[String] {
    &self.sentences
  }

  pub fn random_poem<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Poem, RepoError> {
    self.poems.choose(rng).ok_or(RepoError::NoPoems)
  }

  pub fn random_sentence<'p, R: Rng + ?Sized>(&self, poem: &'p Poem, rng: &mut R) -> Result<&'p PoemSentence, RepoError> {
    poem
      .sentence
      .choose(rng)
      .ok_or_else(|| RepoError::NoSentences(poem.id.clone()))
  }

  pub fn translated_sentence(&self, poem_id: &str, senid: u32, language: Language) -> Option<&str> {
    self
      .translations
      .get(&language)?
      .get(poem_id)?
      .sentence
      .iter()
      .find(|s| s.senid == senid)
      .map(|s| s.content.as_str())
  }

  /// Lines shown to the learner. The asked line becomes its translation in easy
  /// mode (non-Chinese language, translation available) and is masked otherwise.
  pub fn display_lines(&self, poem: &Poem, senid: u32, language: Language, mode: DifficultyMode) -> Vec<String> {
    poem
      .sentence
      .iter()
      .map(|s| {
        if s.senid != senid {
          return s.content.clone();
        }
        let translated = match (mode, language.is_chinese()) {
          (DifficultyMode::Easy, false) => self.translated_sentence(&poem.id, senid, language),
          _ => None,
        };
        translated.map(str::to_string).unwrap_or_else(|| MASK.to_string())
      })
      .collect()
  }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RepoError> {
  let display = path.display().to_string();
  let raw = std::fs::read_to_string(path).map_err(|source| RepoError::Io { path: display.clone(), source })?;
  serde_json::from_str(&raw).map_err(|source| RepoError::Json { path: display, source })
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn seeded_pool_flattens_every_sentence() {
    let repo = PoemRepository::seeded();
    let total: usize = repo.poems().iter().map(|p| p.sentence.len()).sum();
    assert_eq!(repo.all_sentences().len(), total);
    assert!(repo.all_sentences().iter().any(|s| s == "床前明月光"));
  }

  #[test]
  fn random_selection_errors_on_empty_data() {
    let repo = PoemRepository::new(vec![], HashMap::new());
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(repo.random_poem(&mut rng), Err(RepoError::NoPoems)));

    let empty = Poem { id: "x".into(), title: "t".into(), author: "a".into(), sentence: vec![] };
    assert!(matches!(repo.random_sentence(&empty, &mut rng), Err(RepoError::NoSentences(id)) if id == "x"));
  }

  #[test]
  fn display_lines_follow_mode_and_language() {
    let repo = PoemRepository::seeded();
    let poem = repo.poems()[0].clone();

    let easy = repo.display_lines(&poem, 0, Language::English, DifficultyMode::Easy);
    assert_eq!(easy[0], "Before my bed the moonlight glows");
    assert_eq!(easy[1], "疑是地上霜");

    let hard = repo.display_lines(&poem, 0, Language::English, DifficultyMode::Hard);
    assert_eq!(hard[0], MASK);

    // No French data in the seeds: fall back to the mask.
    let missing = repo.display_lines(&poem, 2, Language::French, DifficultyMode::Easy);
    assert_eq!(missing[2], MASK);
    assert_eq!(missing[0], "床前明月光");

    let chinese = repo.display_lines(&poem, 3, Language::Chinese, DifficultyMode::Easy);
    assert_eq!(chinese[3], MASK);
  }

  #[test]
  fn loads_corpus_and_translations_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
      dir.path().join("poem_chinese.json"),
      r#"[{"id":"9","title":"鹿柴","author":"王维","sentence":[{"senid":0,"content":"空山不见人"},{"senid":1,"content":"但闻人语响"}]}]"#,
    )
    .unwrap();
    std::fs::write(
      dir.path().join("poem_german.json"),
      r#"[{"id":"9","sentence":[{"senid":0,"content":"Leerer Berg, niemand zu sehen"}]}]"#,
    )
    .unwrap();

    let repo = PoemRepository::load_dir(dir.path()).unwrap();
    assert_eq!(repo.poems().len(), 1);
    assert_eq!(repo.all_sentences(), &["空山不见人".to_string(), "但闻人语响".to_string()]);
    assert_eq!(repo.translated_sentence("9", 0, Language::German), Some("Leerer Berg, niemand zu sehen"));
    assert_eq!(repo.translated_sentence("9", 1, Language::German), None);
    assert_eq!(repo.translated_sentence("9", 0, Language::English), None);
  }

  #[test]
  fn missing_chinese_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(PoemRepository::load_dir(dir.path()), Err(RepoError::Io { .. })));

    std::fs::write(dir.path().join("poem_chinese.json"), "not json").unwrap();
    assert!(matches!(PoemRepository::load_dir(dir.path()), Err(RepoError::Json { .. })));
  }
}
