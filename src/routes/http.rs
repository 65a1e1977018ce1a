//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::error::QuizResult;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;
use super::extract::{ApiJson, ApiPath, ApiQuery};

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_ranks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(RanksOut { ranks: state.ranks.tiers().to_vec(), free_max_score: state.ranks.free_max_score() })
}

#[instrument(level = "info", skip(state), fields(score = q.score, paid = q.paid))]
pub async fn http_get_rank(
  State(state): State<Arc<AppState>>,
  ApiQuery(q): ApiQuery<RankQuery>,
) -> impl IntoResponse {
  let score = u32::try_from(q.score.max(0)).unwrap_or(u32::MAX);
  Json(rank_view(&state, score, q.paid))
}

#[instrument(level = "info", skip(state, body), fields(pool_len = body.pool.len()))]
pub async fn http_post_options(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<OptionsIn>,
) -> QuizResult<Json<OptionsOut>> {
  let options = build_options(&state, &body)?;
  Ok(Json(OptionsOut { options }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_accounts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(AccountListOut { accounts: list_accounts(&state).await })
}

#[instrument(level = "info", skip(state, body), fields(account = %body.account_name))]
pub async fn http_create_account(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<CreateAccountIn>,
) -> QuizResult<(StatusCode, Json<AccountOut>)> {
  let out = create_account(&state, body).await?;
  Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_account(
  State(state): State<Arc<AppState>>,
  ApiPath(name): ApiPath<String>,
) -> QuizResult<Json<AccountOut>> {
  Ok(Json(get_account(&state, &name).await?))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_put_settings(
  State(state): State<Arc<AppState>>,
  ApiPath(name): ApiPath<String>,
  ApiJson(body): ApiJson<SettingsIn>,
) -> QuizResult<Json<AccountOut>> {
  Ok(Json(update_settings(&state, &name, body).await?))
}

#[instrument(level = "info", skip(state, body), fields(is_paid = body.is_paid))]
pub async fn http_put_premium(
  State(state): State<Arc<AppState>>,
  ApiPath(name): ApiPath<String>,
  ApiJson(body): ApiJson<PremiumIn>,
) -> QuizResult<Json<AccountOut>> {
  Ok(Json(set_premium(&state, &name, body.is_paid).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset(
  State(state): State<Arc<AppState>>,
  ApiPath(name): ApiPath<String>,
) -> QuizResult<Json<AccountOut>> {
  Ok(Json(reset_account(&state, &name).await?))
}

#[instrument(level = "info", skip(state), fields(account = %q.account))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  ApiQuery(q): ApiQuery<QuestionQuery>,
) -> QuizResult<Json<QuestionOut>> {
  let question = new_question(&state, &q.account, q.difficulty).await?;
  info!(target: "quiz", id = %question.id, account = %q.account, "HTTP question served");
  Ok(Json(to_out(&question)))
}

#[instrument(level = "info", skip(state, body), fields(question_id = %body.question_id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<AnswerIn>,
) -> QuizResult<Json<AnswerOut>> {
  let out = submit_answer(&state, &body.question_id, &body.value).await?;
  info!(target: "quiz", id = %body.question_id, correct = out.correct, applied = out.applied, "HTTP answer evaluated");
  Ok(Json(out))
}
