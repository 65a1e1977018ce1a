//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Building questions (random poem + sentence, distractor options, prompt lines)
//!   - Evaluating answers and applying the score/rank model
//!   - Account lifecycle (create, settings, paid flag, reset)
//!   - Stateless helpers: rank lookup and raw option generation

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Account, DifficultyLevel, PoemOption};
use crate::error::{QuizError, QuizResult};
use crate::options::generate_options;
use crate::protocol::{AccountOut, AnswerOut, CreateAccountIn, OptionsIn, SettingsIn};
use crate::ranks::RankView;
use crate::state::{AppState, Question};

pub fn rank_view(state: &AppState, score: u32, is_paid: bool) -> RankView {
  state.ranks.view(score, is_paid)
}

/// Raw generator access: options for an arbitrary sentence and pool.
#[instrument(level = "info", skip(state, input), fields(pool_len = input.pool.len()))]
pub fn build_options(state: &AppState, input: &OptionsIn) -> QuizResult<Vec<PoemOption>> {
  let cfg = &state.config.options;
  let count = input.count.unwrap_or(cfg.count);
  let difficulty = input.difficulty.unwrap_or(cfg.default_difficulty);
  let options = generate_options(cfg, &input.correct, count, &input.pool, difficulty, &mut rand::thread_rng())?;
  debug!(target: "quiz", count, ?difficulty, produced = options.len(), "Options generated");
  Ok(options)
}

fn account_out(state: &AppState, a: &Account) -> AccountOut {
  AccountOut::new(a, rank_view(state, a.score, a.is_paid))
}

#[instrument(level = "info", skip(state, input), fields(account = %input.account_name))]
pub async fn create_account(state: &AppState, input: CreateAccountIn) -> QuizResult<AccountOut> {
  let name = input.account_name.trim().to_string();
  if name.is_empty() {
    return Err(QuizError::EmptyAccountName);
  }
  let mut accounts = state.accounts.write().await;
  if accounts.contains_key(&name) {
    return Err(QuizError::AccountExists(name));
  }
  let account = Account::new(name.clone(), input.display_name, input.language.unwrap_or_default(), Utc::now());
  let out = account_out(state, &account);
  accounts.insert(name, account);
  info!(target: "quiz", account = %out.account_name, language = ?out.language, "Account created");
  Ok(out)
}

pub async fn get_account(state: &AppState, name: &str) -> QuizResult<AccountOut> {
  let account = state
    .get_account(name)
    .await
    .ok_or_else(|| QuizError::UnknownAccount(name.to_string()))?;
  Ok(account_out(state, &account))
}

pub async fn list_accounts(state: &AppState) -> Vec<String> {
  let mut names: Vec<String> = state.accounts.read().await.keys().cloned().collect();
  names.sort();
  names
}

/// Run `f` on the stored account and return its refreshed view.
async fn with_account<F>(state: &AppState, name: &str, f: F) -> QuizResult<AccountOut>
where
  F: FnOnce(&mut Account) -> QuizResult<()>,
{
  let mut accounts = state.accounts.write().await;
  let account = accounts
    .get_mut(name)
    .ok_or_else(|| QuizError::UnknownAccount(name.to_string()))?;
  f(account)?;
  account.last_updated_at = Utc::now();
  Ok(account_out(state, account))
}

/// Language changes keep the mode when the new language supports it and switch
/// to the language default otherwise. An explicit unsupported mode is rejected.
#[instrument(level = "info", skip(state), fields(%name))]
pub async fn update_settings(state: &AppState, name: &str, input: SettingsIn) -> QuizResult<AccountOut> {
  with_account(state, name, |a| {
    let language = input.language.unwrap_or(a.language);
    let mode = match input.difficulty {
      Some(mode) if !language.supports(mode) => {
        return Err(QuizError::UnsupportedMode { language: language.as_str(), mode: mode.as_str() });
      }
      Some(mode) => mode,
      None => language.reconcile_mode(a.difficulty),
    };
    a.language = language;
    a.difficulty = mode;
    info!(target: "quiz", account = %a.account_name, language = language.as_str(), ?mode, "Settings updated");
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state), fields(%name))]
pub async fn set_premium(state: &AppState, name: &str, is_paid: bool) -> QuizResult<AccountOut> {
  with_account(state, name, |a| {
    a.is_paid = is_paid;
    info!(target: "quiz", account = %a.account_name, is_paid, "Entitlement updated");
    Ok(())
  })
  .await
}

/// Explicit reset: score back to 0 and statistics cleared.
#[instrument(level = "info", skip(state), fields(%name))]
pub async fn reset_account(state: &AppState, name: &str) -> QuizResult<AccountOut> {
  with_account(state, name, |a| {
    a.score = 0;
    a.stats = Default::default();
    info!(target: "quiz", account = %a.account_name, "Account reset");
    Ok(())
  })
  .await
}

/// Pick a random poem line for the account and build its option set.
#[instrument(level = "info", skip(state), fields(%account))]
pub async fn new_question(state: &AppState, account: &str, difficulty: Option<DifficultyLevel>) -> QuizResult<Question> {
  let acc = state
    .get_account(account)
    .await
    .ok_or_else(|| QuizError::UnknownAccount(account.to_string()))?;
  let cfg = &state.config.options;
  let difficulty = difficulty.unwrap_or(cfg.default_difficulty);

  // ThreadRng is !Send; keep it out of any await.
  let question = {
    let mut rng = rand::thread_rng();
    let poem = state.poems.random_poem(&mut rng)?;
    let sentence = state.poems.random_sentence(poem, &mut rng)?;
    let options = generate_options(cfg, &sentence.content, cfg.count, state.poems.all_sentences(), difficulty, &mut rng)?;
    Question {
      id: Uuid::new_v4().to_string(),
      account_name: acc.account_name.clone(),
      poem_id: poem.id.clone(),
      title: poem.title.clone(),
      author: poem.author.clone(),
      senid: sentence.senid,
      lines: state.poems.display_lines(poem, sentence.senid, acc.language, acc.difficulty),
      options,
      difficulty,
      mode: acc.difficulty,
    }
  };

  state.insert_question(question.clone()).await;
  info!(
    target: "quiz",
    id = %question.id,
    poem = %question.poem_id,
    senid = question.senid,
    ?difficulty,
    options = question.options.len(),
    "Question created"
  );
  Ok(question)
}

/// Check the selected value, score it by the question's mode, and update the account.
#[instrument(level = "info", skip(state, value), fields(%question_id))]
pub async fn submit_answer(state: &AppState, question_id: &str, value: &str) -> QuizResult<AnswerOut> {
  let question = state
    .take_question(question_id)
    .await
    .ok_or_else(|| QuizError::UnknownQuestion(question_id.to_string()))?;
  let expected = question.correct_value().unwrap_or_default().to_string();
  let correct = value == expected;
  let delta = state.config.scoring.delta(question.mode, correct);

  let mut accounts = state.accounts.write().await;
  let account = accounts
    .get_mut(&question.account_name)
    .ok_or_else(|| QuizError::UnknownAccount(question.account_name.clone()))?;

  let update = state.ranks.apply_score_delta(account.score, delta, account.is_paid);
  let now = Utc::now();
  account.score = update.new_score;
  account.stats.record(correct, now);
  account.last_updated_at = now;

  if !update.applied {
    warn!(target: "quiz", account = %account.account_name, score = account.score, delta, "Free tier cap reached; score unchanged");
  }
  info!(target: "quiz", id = %question_id, account = %account.account_name, correct, delta, score = account.score, "Answer evaluated");

  Ok(AnswerOut {
    correct,
    expected,
    delta,
    applied: update.applied,
    upsell: !update.applied,
    rank: rank_view(state, account.score, account.is_paid),
  })
}
