//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Account, AccountStats, DifficultyLevel, DifficultyMode, Language, PoemOption, RankTier};
use crate::ranks::RankView;
use crate::state::Question;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewQuestion {
        account: String,
        #[serde(default)]
        difficulty: Option<DifficultyLevel>,
    },
    SubmitAnswer {
        #[serde(rename = "questionId")]
        question_id: String,
        value: String,
    },
    GetAccount {
        account: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Question {
        question: QuestionOut,
    },
    AnswerResult {
        result: AnswerOut,
    },
    Account {
        account: AccountOut,
    },
    Error {
        message: String,
    },
}

/// Option as sent to clients; correctness stays on the server.
#[derive(Debug, Serialize)]
pub struct OptionOut {
    pub value: String,
    pub label: String,
}

/// DTO used by both WS and HTTP for question delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub id: String,
    pub poem_id: String,
    pub title: String,
    pub author: String,
    pub sentence_index: u32,
    pub lines: Vec<String>,
    pub options: Vec<OptionOut>,
    pub difficulty: DifficultyLevel,
    pub mode: DifficultyMode,
}

/// Convert a stored `Question` to the public DTO.
pub fn to_out(q: &Question) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        poem_id: q.poem_id.clone(),
        title: q.title.clone(),
        author: q.author.clone(),
        sentence_index: q.senid,
        lines: q.lines.clone(),
        options: q
            .options
            .iter()
            .map(|o| OptionOut { value: o.value.clone(), label: o.label.clone() })
            .collect(),
        difficulty: q.difficulty,
        mode: q.mode,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOut {
    pub correct: bool,
    pub expected: String,
    pub delta: i32,
    pub applied: bool,
    /// Free-tier cap blocked the update: the client should offer the upgrade.
    pub upsell: bool,
    pub rank: RankView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOut {
    pub account_name: String,
    pub display_name: String,
    pub score: u32,
    pub language: Language,
    pub hint_language: &'static str,
    pub difficulty: DifficultyMode,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub stats: AccountStats,
    pub rank: RankView,
}

impl AccountOut {
    pub fn new(a: &Account, rank: RankView) -> Self {
        Self {
            account_name: a.account_name.clone(),
            display_name: a.display_name.clone(),
            score: a.score,
            language: a.language,
            hint_language: a.language.hint_language(),
            difficulty: a.difficulty,
            is_paid: a.is_paid,
            created_at: a.created_at,
            last_updated_at: a.last_updated_at,
            stats: a.stats.clone(),
            rank,
        }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    pub account: String,
    pub difficulty: Option<DifficultyLevel>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct RankQuery {
    pub score: i64,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Serialize)]
pub struct RanksOut {
    pub ranks: Vec<RankTier>,
    #[serde(rename = "freeMaxScore")]
    pub free_max_score: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsIn {
    pub correct: String,
    #[serde(default)]
    pub count: Option<usize>,
    pub pool: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<DifficultyLevel>,
}

#[derive(Serialize)]
pub struct OptionsOut {
    pub options: Vec<PoemOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountIn {
    pub account_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsIn {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub difficulty: Option<DifficultyMode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumIn {
    pub is_paid: bool,
}

#[derive(Serialize)]
pub struct AccountListOut {
    pub accounts: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
