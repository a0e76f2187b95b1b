//! Handlers for publishing the regenerated site.

use axum::{Json, extract::State};
use folio_content::git::DEFAULT_COMMIT_MESSAGE;
use folio_core::store::DocumentStore;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /api/git/status`
pub async fn status<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Json<Value>, ApiError>
where
  S: DocumentStore + 'static,
{
  let status = state.content.status().await?;
  Ok(Json(json!({ "success": true, "status": status })))
}

#[derive(Debug, Default, Deserialize)]
pub struct PushBody {
  pub message: Option<String>,
}

/// `POST /api/git/push` — body: `{"message": "..."}`, optional.
pub async fn push<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  body: Option<Json<PushBody>>,
) -> Result<Json<Value>, ApiError>
where
  S: DocumentStore + 'static,
{
  let message = body
    .and_then(|Json(b)| b.message)
    .filter(|m| !m.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_owned());
  let outcome = state.content.publish(&message).await?;
  Ok(Json(json!({ "success": true, "message": outcome.to_string() })))
}
