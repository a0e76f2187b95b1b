//! Handler for `POST /forms/{form_id}`.
//!
//! The server-side counterpart of the on-page submit workflow, for browsers
//! without JavaScript and for other clients. Each request runs its own
//! headless [`SubmissionHandler`], so concurrent visitors never see each
//! other's in-flight guard. The response carries the form's own feedback
//! message.
//!
//! | Status | Body |
//! |--------|------|
//! | 201 | `{"id": "...", "message": "Submitted ✅"}` |
//! | 404 | unknown form id |
//! | 422 | `{"error": "Name & Phone needed", "missing": ["name"]}` |
//! | 502 | `{"error": "Error ❌"}` |

use std::sync::Arc;

use axum::{
  Form, Json,
  extract::{FromRequest, Path, Request, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use folio_core::{form::FormValues, store::DocumentStore};
use folio_forms::{DEFAULT_FEEDBACK_INTERVAL, Headless, SubmissionHandler, SubmitOutcome};
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Field values from either a JSON object or an urlencoded body.
pub struct FormPayload(pub FormValues);

impl<St> FromRequest<St> for FormPayload
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
    let is_json = req
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
      let Json(values) = Json::<FormValues>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Self(values))
    } else {
      let Form(values) = Form::<FormValues>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Self(values))
    }
  }
}

/// `POST /forms/{form_id}`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Path(form_id): Path<String>,
  FormPayload(mut values): FormPayload,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + 'static,
{
  let schema = state
    .forms
    .get(&form_id)
    .ok_or_else(|| ApiError::NotFound(format!("unknown form {form_id:?}")))?;
  let messages = schema.messages.clone();

  let handler: SubmissionHandler<S, Headless> = SubmissionHandler::new(
    schema.clone(),
    Arc::clone(&state.store),
    None,
    DEFAULT_FEEDBACK_INTERVAL,
  );

  match handler.submit(&mut values).await {
    SubmitOutcome::Submitted(id) => Ok((
      StatusCode::CREATED,
      Json(json!({ "id": id, "message": messages.success })),
    )),
    SubmitOutcome::Invalid(e) => {
      Err(ApiError::Unprocessable { message: messages.invalid, missing: e.missing })
    }
    SubmitOutcome::Failed => Err(ApiError::BadGateway(messages.error)),
    SubmitOutcome::Ignored => {
      Err(ApiError::Unavailable("submission already in progress".to_owned()))
    }
  }
}
