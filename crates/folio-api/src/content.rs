//! Generic CRUD handlers shared by the four content kinds.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/{kind}`      | All items, in stored order |
//! | `POST`   | `/api/{kind}`      | 201 with the created item |
//! | `PUT`    | `/api/{kind}/{id}` | Partial update; 404 if absent |
//! | `DELETE` | `/api/{kind}/{id}` | 204; 404 if absent |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_content::{ContentItem, ContentService, Repositories};
use folio_core::store::DocumentStore;

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /api/{kind}`
pub async fn list<S, T>(
  _: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<T>>, ApiError>
where
  S: DocumentStore + 'static,
  T: ContentItem,
  ContentService: Repositories<T>,
{
  Ok(Json(state.content.list::<T>().await?))
}

/// `POST /api/{kind}`
pub async fn create<S, T>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Json(new): Json<T::New>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + 'static,
  T: ContentItem,
  ContentService: Repositories<T>,
{
  let item = state.content.create::<T>(new).await?;
  Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/{kind}/{id}`
pub async fn update<S, T>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<u64>,
  Json(patch): Json<T::Patch>,
) -> Result<Json<T>, ApiError>
where
  S: DocumentStore + 'static,
  T: ContentItem,
  ContentService: Repositories<T>,
{
  Ok(Json(state.content.update::<T>(id, patch).await?))
}

/// `DELETE /api/{kind}/{id}`
pub async fn delete<S, T>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<u64>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore + 'static,
  T: ContentItem,
  ContentService: Repositories<T>,
{
  state.content.delete::<T>(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
