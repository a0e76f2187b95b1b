//! HTTP Basic-auth extractor for the admin endpoints.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use folio_core::store::DocumentStore;
use rand_core::OsRng;

use crate::{AppState, error::ApiError};

/// The single admin account.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in the handler means the request was authenticated.
pub struct Authenticated;

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

impl AuthConfig {
  /// Whether `username`/`password` match the admin account. An unset or
  /// unparseable hash matches nothing.
  pub fn accepts(&self, username: &str, password: &str) -> bool {
    if username != self.username {
      return false;
    }
    let Ok(hash) = PasswordHash::new(&self.password_hash) else { return false };
    Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
  }
}

/// The `(username, password)` pair of a Basic `Authorization` header. The
/// scheme name is case-insensitive; the password may contain colons.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, encoded) = value.split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("basic") {
    return None;
  }
  let decoded = String::from_utf8(B64.decode(encoded.trim()).ok()?).ok()?;
  let (username, password) = decoded.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

/// Check the `Authorization: Basic …` header against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let Some((username, password)) = basic_credentials(headers) else {
    return Err(ApiError::Unauthorized);
  };
  if config.accepts(&username, &password) { Ok(()) } else { Err(ApiError::Unauthorized) }
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: DocumentStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    if let Err(e) = verify_auth(&parts.headers, &state.auth) {
      tracing::debug!(path = %parts.uri.path(), "admin request rejected");
      return Err(e);
    }
    Ok(Authenticated)
  }
}
