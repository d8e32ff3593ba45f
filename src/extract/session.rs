use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	error::Error,
	openapi::{SECURITY_SCHEME_BEARER, SECURITY_SCHEME_SESSION},
	route::auth,
	session,
	token::{Claims, TokenService},
};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts and verifies the session token of the request.
///
/// The token is read from a bearer `Authorization` header, falling back
/// to the session cookie. Missing, malformed and expired tokens are all
/// rejected with the same [`auth::Error::Unauthorized`].
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{}", session.claims.email);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub claims: Claims,
}

impl Session {
	pub fn user_id(&self) -> Uuid {
		self.claims.sub
	}

	pub fn email(&self) -> &str {
		&self.claims.email
	}
}

/// Reads the raw token from the request, preferring the `Authorization` header.
pub fn token_from_parts(parts: &request::Parts) -> Option<String> {
	if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
		return value
			.to_str()
			.ok()
			.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX))
			.map(|token| token.trim().to_owned());
	}

	parts
		.headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.find_map(|value| session::find_cookie(value, session::COOKIE_NAME))
		.map(|cookie| cookie.value().to_owned())
}

/// Extracts the raw session token, if any, without verifying it.
///
/// Used where a session is optional, such as logging out.
#[derive(Debug)]
pub struct SessionToken(pub Option<String>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		Ok(Self(token_from_parts(parts)))
	}
}

impl OperationInput for SessionToken {}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	TokenService: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let token = token_from_parts(parts).ok_or(auth::Error::Unauthorized)?;
		let tokens = TokenService::from_ref(state);

		let claims = tokens.verify(&token, chrono::Utc::now()).map_err(|error| {
			tracing::debug!(%error, "rejected session token");
			auth::Error::Unauthorized
		})?;

		Ok(Self { claims })
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a bearer token or session cookie requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		]);
	}
}
