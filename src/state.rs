//! Application state: quiz config, rank table, poem repository, and the
//! in-memory account and question stores.
//!
//! Config comes from QUIZ_CONFIG_PATH (TOML) when present; a rank table that
//! fails validation is reported and replaced by the built-in one.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::config::{load_quiz_config_from_env, QuizConfig};
use crate::domain::{Account, DifficultyLevel, DifficultyMode, PoemOption};
use crate::poems::PoemRepository;
use crate::ranks::RankTable;

/// A question handed to a learner, kept until it is answered.
#[derive(Clone, Debug)]
pub struct Question {
    pub id: String,
    pub account_name: String,
    pub poem_id: String,
    pub title: String,
    pub author: String,
    pub senid: u32,
    pub lines: Vec<String>,
    pub options: Vec<PoemOption>,
    pub difficulty: DifficultyLevel,
    pub mode: DifficultyMode,
}

impl Question {
    pub fn correct_value(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.is_correct)
            .map(|o| o.value.as_str())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<QuizConfig>,
    pub ranks: Arc<RankTable>,
    pub poems: Arc<PoemRepository>,
    pub accounts: Arc<RwLock<HashMap<String, Account>>>,
    pub questions: Arc<RwLock<HashMap<String, Question>>>,
}

impl AppState {
    /// Build state from env: load config and poems, validate the rank table.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_quiz_config_from_env().unwrap_or_default();
        Self::with_parts(config, PoemRepository::from_env())
    }

    pub fn with_parts(config: QuizConfig, poems: PoemRepository) -> Self {
        let ranks = match RankTable::new(config.ranks.clone(), config.free_max_score) {
            Ok(t) => t,
            Err(e) => {
                error!(
                    target: "chinpoem_backend",
                    error = %e,
                    free_max_score = config.free_max_score,
                    "Invalid rank table in config; using built-in ranks with the configured free cap"
                );
                RankTable::builtin(config.free_max_score)
            }
        };

        info!(
            target: "chinpoem_backend",
            poems = poems.poems().len(),
            sentences = poems.all_sentences().len(),
            ranks = ranks.tiers().len(),
            free_max_score = ranks.free_max_score(),
            option_count = config.options.count,
            "Quiz state ready"
        );

        Self {
            config: Arc::new(config),
            ranks: Arc::new(ranks),
            poems: Arc::new(poems),
            accounts: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_account(&self, name: &str) -> Option<Account> {
        self.accounts.read().await.get(name).cloned()
    }

    /// Store a question as the account's only open one; any earlier
    /// unanswered question of that account is dropped.
    #[instrument(level = "debug", skip(self, q), fields(id = %q.id, account = %q.account_name))]
    pub async fn insert_question(&self, q: Question) {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|_, open| open.account_name != q.account_name);
        if questions.len() < before {
            debug!(target: "quiz", account = %q.account_name, "Replaced unanswered question");
        }
        questions.insert(q.id.clone(), q);
    }

    /// Remove and return a question; each question can be answered once.
    #[instrument(level = "debug", skip(self))]
    pub async fn take_question(&self, id: &str) -> Option<Question> {
        self.questions.write().await.remove(id)
    }
}
