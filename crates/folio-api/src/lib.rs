//! HTTP surface for Folio.
//!
//! Exposes an axum [`Router`] with the public form endpoint and the
//! basic-auth protected content administration endpoints, backed by any
//! [`DocumentStore`].
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | `GET`  | `/health` | none |
//! | `POST` | `/forms/{form_id}` | none |
//! | `GET`/`POST` | `/api/{reviews,faqs,gallery,reels}` | basic |
//! | `PUT`/`DELETE` | `/api/{kind}/{id}` | basic |
//! | `GET`  | `/api/git/status` | basic |
//! | `POST` | `/api/git/push` | basic |

pub mod auth;
pub mod content;
pub mod error;
pub mod forms;
pub mod git;

use std::sync::Arc;

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  routing::{get, post, put},
};
use folio_content::{
  ContentItem, ContentService, Faq, GalleryImage, Reel, Repositories, Review,
};
use folio_core::{schema::FormCatalog, store::DocumentStore};
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

pub use auth::AuthConfig;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub forms:   Arc<FormCatalog>,
  pub content: Arc<ContentService>,
  pub auth:    Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      forms:   Arc::clone(&self.forms),
      content: Arc::clone(&self.content),
      auth:    Arc::clone(&self.auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

fn content_routes<S, T>(router: Router<AppState<S>>, base: &str) -> Router<AppState<S>>
where
  S: DocumentStore + 'static,
  T: ContentItem,
  ContentService: Repositories<T>,
{
  router
    .route(base, get(content::list::<S, T>).post(content::create::<S, T>))
    .route(
      &format!("{base}/{{id}}"),
      put(content::update::<S, T>).delete(content::delete::<S, T>),
    )
}

/// CORS for the admin UI and the site's own origin. Unparseable origins are
/// logged and dropped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
  let origins: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| match HeaderValue::from_str(o) {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(origin = %o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the full application router.
pub fn router<S>(state: AppState<S>, cors_origins: &[String]) -> Router
where
  S: DocumentStore + 'static,
{
  let router = Router::new()
    .route("/health", get(|| async { "ok" }))
    .route("/forms/{form_id}", post(forms::submit::<S>))
    .route("/api/git/status", get(git::status::<S>))
    .route("/api/git/push", post(git::push::<S>));

  let router = content_routes::<S, Review>(router, "/api/reviews");
  let router = content_routes::<S, Faq>(router, "/api/faqs");
  let router = content_routes::<S, GalleryImage>(router, "/api/gallery");
  let router = content_routes::<S, Reel>(router, "/api/reels");

  router
    .layer(cors_layer(cors_origins))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
