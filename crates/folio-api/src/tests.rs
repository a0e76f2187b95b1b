//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use folio_content::{ContentService, SiteRenderer};
use folio_core::{
  record::{DocumentId, SubmissionRecord},
  schema::FormCatalog,
  store::DocumentStore,
};
use folio_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;

use super::*;
use crate::auth::hash_password;

const PAGE: &str = "<ul>\n<!-- folio:faqs:start -->\n<!-- folio:faqs:end -->\n</ul>\n";

struct Harness<S> {
  state: AppState<S>,
  dir:   TempDir,
}

fn harness<S: DocumentStore + 'static>(store: S) -> Harness<S> {
  let dir = tempfile::tempdir().unwrap();
  let page = dir.path().join("index.html");
  std::fs::write(&page, PAGE).unwrap();
  let content =
    ContentService::new(&dir.path().join("data")).with_renderer(SiteRenderer::new(page));

  Harness {
    state: AppState {
      store:   Arc::new(store),
      forms:   Arc::new(FormCatalog::canonical()),
      content: Arc::new(content),
      auth:    Arc::new(AuthConfig {
        username:      "studio".to_owned(),
        password_hash: hash_password("s3cret").unwrap(),
      }),
    },
    dir,
  }
}

async fn sqlite() -> Harness<SqliteStore> {
  harness(SqliteStore::open_in_memory().await.unwrap())
}

fn admin() -> String { format!("Basic {}", B64.encode("studio:s3cret")) }

async fn send<S: DocumentStore + 'static>(
  state: &AppState<S>,
  req: Request<Body>,
) -> Response {
  router(state.clone(), &[]).oneshot(req).await.unwrap()
}

fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .header(header::AUTHORIZATION, admin())
    .body(Body::from(body.to_string()))
    .unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

// ── Forms ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn urlencoded_inquiry_is_stored() {
  let h = sqlite().await;
  let req = Request::builder()
    .method("POST")
    .uri("/forms/inquiryForm")
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from("name=Asha&phone=0550000000&eventType=Wedding&date=2025-02-14"))
    .unwrap();

  let resp = send(&h.state, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  assert_eq!(body["message"], "Submitted ✅");

  let docs = h.state.store.list("inquiries").await.unwrap();
  assert_eq!(docs.len(), 1);
  assert_eq!(body["id"], docs[0].document_id.as_str());
  assert_eq!(docs[0].body["eventDate"], "2025-02-14");
  assert_eq!(docs[0].body["botim"], "");
  assert_eq!(docs[0].body["source"], "heroInquiry");
}

#[tokio::test]
async fn json_footer_contact_missing_email_is_422() {
  let h = sqlite().await;
  let req = Request::builder()
    .method("POST")
    .uri("/forms/footerContactForm")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(json!({ "name": "Ravi", "email": "  " }).to_string()))
    .unwrap();

  let resp = send(&h.state, req).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body_json(resp).await, json!({
    "error": "Name & Email needed",
    "missing": ["email"]
  }));
  assert!(h.state.store.list("contacts").await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_form_is_404() {
  let h = sqlite().await;
  let req = Request::builder()
    .method("POST")
    .uri("/forms/newsletter")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(r#"{"email":"a@b.c"}"#))
    .unwrap();
  assert_eq!(send(&h.state, req).await.status(), StatusCode::NOT_FOUND);
}

#[derive(Debug, thiserror::Error)]
#[error("store offline")]
struct Offline;

struct OfflineStore;

impl DocumentStore for OfflineStore {
  type Error = Offline;

  async fn append(&self, _: &str, _: &SubmissionRecord) -> Result<DocumentId, Offline> {
    Err(Offline)
  }
}

#[tokio::test]
async fn store_failure_is_502_with_generic_message() {
  let h = harness(OfflineStore);
  let req = Request::builder()
    .method("POST")
    .uri("/forms/footerContactForm")
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from("name=Ravi&email=ravi%40example.com"))
    .unwrap();

  let resp = send(&h.state, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  let body = body_json(resp).await;
  assert_eq!(body["error"], "Error ❌");
  assert!(!body.to_string().contains("offline"));
}

/// Lets each append through only once another one is waiting too.
struct RendezvousStore(tokio::sync::Barrier);

impl DocumentStore for RendezvousStore {
  type Error = Offline;

  async fn append(&self, collection: &str, _: &SubmissionRecord) -> Result<DocumentId, Offline> {
    self.0.wait().await;
    Ok(DocumentId(format!("{collection}-1")))
  }
}

#[tokio::test]
async fn concurrent_visitors_on_one_form_are_both_stored() {
  let h = harness(RendezvousStore(tokio::sync::Barrier::new(2)));
  let req = || {
    Request::builder()
      .method("POST")
      .uri("/forms/footerContactForm")
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from("name=Ravi&email=ravi%40example.com"))
      .unwrap()
  };

  let (a, b) = tokio::time::timeout(std::time::Duration::from_secs(5), async {
    tokio::join!(send(&h.state, req()), send(&h.state, req()))
  })
  .await
  .expect("both submissions should reach the store together");

  assert_eq!(a.status(), StatusCode::CREATED);
  assert_eq!(b.status(), StatusCode::CREATED);
  assert_eq!(body_json(a).await["message"], "Sent ✅");
}

// ── Admin ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_routes_require_credentials() {
  let h = sqlite().await;
  let req = Request::builder().uri("/api/reviews").body(Body::empty()).unwrap();
  let resp = send(&h.state, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

  let req = Request::builder()
    .uri("/api/reviews")
    .header(header::AUTHORIZATION, format!("Basic {}", B64.encode("studio:wrong")))
    .body(Body::empty())
    .unwrap();
  assert_eq!(send(&h.state, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn faq_crud_round_trip_renders_page() {
  let h = sqlite().await;

  let resp = send(&h.state, json_req("POST", "/api/faqs", json!({
    "question": "Do you travel?", "answer": "Across the UAE"
  })))
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(body_json(resp).await["id"], 1);

  let page = std::fs::read_to_string(h.dir.path().join("index.html")).unwrap();
  assert!(page.contains("Do you travel?"));

  let resp = send(&h.state, json_req("PUT", "/api/faqs/1", json!({ "answer": "Worldwide" }))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let faq = body_json(resp).await;
  assert_eq!(faq["question"], "Do you travel?");
  assert_eq!(faq["answer"], "Worldwide");

  let req = Request::builder()
    .uri("/api/faqs")
    .header(header::AUTHORIZATION, admin())
    .body(Body::empty())
    .unwrap();
  let list = body_json(send(&h.state, req).await).await;
  assert_eq!(list.as_array().unwrap().len(), 1);

  let req = Request::builder()
    .method("DELETE")
    .uri("/api/faqs/1")
    .header(header::AUTHORIZATION, admin())
    .body(Body::empty())
    .unwrap();
  assert_eq!(send(&h.state, req).await.status(), StatusCode::NO_CONTENT);

  let req = Request::builder()
    .method("DELETE")
    .uri("/api/faqs/1")
    .header(header::AUTHORIZATION, admin())
    .body(Body::empty())
    .unwrap();
  assert_eq!(send(&h.state, req).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_with_bad_rating_is_400() {
  let h = sqlite().await;
  let resp = send(&h.state, json_req("POST", "/api/reviews", json!({
    "name": "Asha", "rating": 9
  })))
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn git_endpoints_without_publisher_are_unavailable() {
  let h = sqlite().await;
  let req = Request::builder()
    .uri("/api/git/status")
    .header(header::AUTHORIZATION, admin())
    .body(Body::empty())
    .unwrap();
  assert_eq!(send(&h.state, req).await.status(), StatusCode::SERVICE_UNAVAILABLE);

  let resp = send(&h.state, json_req("POST", "/api/git/push", json!({}))).await;
  assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn health_is_public() {
  let h = sqlite().await;
  let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
  let resp = send(&h.state, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  assert_eq!(&bytes[..], b"ok");
}
