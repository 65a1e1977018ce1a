//! Error types for the quiz core and the service layer.
//!
//! The pure core (option generation, rank table) reports invalid input through
//! small enums; `QuizError` wraps them for handlers and maps to HTTP statuses.

use axum::{
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
  #[error("option count must be at least 1")]
  InvalidCount,
  #[error("correct sentence must not be empty")]
  EmptySentence,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankTableError {
  #[error("rank table is empty")]
  Empty,
  #[error("first rank must start at 0, found {0}")]
  FirstNotZero(u32),
  #[error("rank '{key}' has min {min} above max {max}")]
  Inverted { key: String, min: u32, max: u32 },
  #[error("rank '{key}' starts at {found}, expected {expected}")]
  Gap { key: String, expected: u32, found: u32 },
  #[error("only the last rank may be unbounded ('{0}' is not last)")]
  UnboundedNotLast(String),
  #[error("last rank '{0}' must be unbounded")]
  LastBounded(String),
  #[error("duplicate rank key '{0}'")]
  DuplicateKey(String),
  #[error("rank '{0}' ends at the maximum score, leaving no room for the ranks after it")]
  NoRoomAfter(String),
}

#[derive(Debug, Error)]
pub enum RepoError {
  #[error("IO error reading {path}: {source}")]
  Io { path: String, source: std::io::Error },
  #[error("JSON error in {path}: {source}")]
  Json { path: String, source: serde_json::Error },
  #[error("no poems available")]
  NoPoems,
  #[error("poem '{0}' has no sentences")]
  NoSentences(String),
}

#[derive(Debug, Error)]
pub enum QuizError {
  #[error(transparent)]
  Options(#[from] OptionsError),
  #[error(transparent)]
  Repo(#[from] RepoError),
  #[error("unknown account: {0}")]
  UnknownAccount(String),
  #[error("account already exists: {0}")]
  AccountExists(String),
  #[error("account name must not be empty")]
  EmptyAccountName,
  #[error("unknown or already answered question: {0}")]
  UnknownQuestion(String),
  #[error("{language} does not support {mode} mode")]
  UnsupportedMode { language: &'static str, mode: &'static str },
  #[error("invalid request body: {0}")]
  Body(#[from] JsonRejection),
  #[error("invalid query string: {0}")]
  Query(#[from] QueryRejection),
  #[error("invalid path: {0}")]
  Path(#[from] PathRejection),
}

pub type QuizResult<T> = Result<T, QuizError>;

impl QuizError {
  pub fn status(&self) -> StatusCode {
    match self {
      QuizError::Options(_) | QuizError::EmptyAccountName | QuizError::UnsupportedMode { .. } => StatusCode::BAD_REQUEST,
      QuizError::UnknownAccount(_) | QuizError::UnknownQuestion(_) => StatusCode::NOT_FOUND,
      QuizError::AccountExists(_) => StatusCode::CONFLICT,
      QuizError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
      QuizError::Body(r) => r.status(),
      QuizError::Query(r) => r.status(),
      QuizError::Path(r) => r.status(),
    }
  }
}

impl IntoResponse for QuizError {
  fn into_response(self) -> axum::response::Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}
