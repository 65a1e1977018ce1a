//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::protocol::{to_out, ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "chinpoem_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "chinpoem_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "chinpoem_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "chinpoem_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "chinpoem_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let error = |e: crate::error::QuizError| ServerWsMessage::Error { message: e.to_string() };
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::NewQuestion { account, difficulty } => match new_question(state, &account, difficulty).await {
      Ok(q) => {
        info!(target: "quiz", id = %q.id, %account, "WS new_question served");
        ServerWsMessage::Question { question: to_out(&q) }
      }
      Err(e) => error(e),
    },

    ClientWsMessage::SubmitAnswer { question_id, value } => match submit_answer(state, &question_id, &value).await {
      Ok(result) => {
        info!(target: "quiz", id = %question_id, correct = result.correct, "WS submit_answer evaluated");
        ServerWsMessage::AnswerResult { result }
      }
      Err(e) => error(e),
    },

    ClientWsMessage::GetAccount { account } => match get_account(state, &account).await {
      Ok(account) => ServerWsMessage::Account { account },
      Err(e) => error(e),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::QuizConfig;
  use crate::poems::PoemRepository;
  use crate::protocol::CreateAccountIn;

  #[tokio::test]
  async fn dispatches_question_and_answer() {
    let state = AppState::with_parts(QuizConfig::default(), PoemRepository::seeded());
    create_account(&state, CreateAccountIn { account_name: "su".into(), display_name: None, language: None })
      .await
      .unwrap();

    assert!(matches!(handle_client_ws(ClientWsMessage::Ping, &state).await, ServerWsMessage::Pong));

    let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"new_question","account":"su","difficulty":"hard"}"#).unwrap();
    let ServerWsMessage::Question { question } = handle_client_ws(msg, &state).await else {
      panic!("expected a question");
    };
    assert_eq!(question.options.len(), 4);

    let value = question.options[0].value.clone();
    let msg = ClientWsMessage::SubmitAnswer { question_id: question.id.clone(), value };
    assert!(matches!(handle_client_ws(msg, &state).await, ServerWsMessage::AnswerResult { .. }));

    let again = ClientWsMessage::SubmitAnswer { question_id: question.id, value: String::new() };
    assert!(matches!(handle_client_ws(again, &state).await, ServerWsMessage::Error { .. }));
  }

  #[tokio::test]
  async fn unknown_account_is_reported_as_error() {
    let state = AppState::with_parts(QuizConfig::default(), PoemRepository::seeded());
    let msg = ClientWsMessage::GetAccount { account: "nobody".into() };
    let ServerWsMessage::Error { message } = handle_client_ws(msg, &state).await else {
      panic!("expected an error");
    };
    assert!(message.contains("nobody"));
  }
}
