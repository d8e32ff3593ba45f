//! The session gate in front of protected pages.
//!
//! Every request passes through [`session_gate`]. Identity headers sent by the
//! client are always discarded; on protected paths the `token` cookie is
//! verified and the identity it carries is forwarded to the handler, or the
//! browser is sent to the login page.

use axum::{
	extract::{Request, State},
	http::{header, HeaderMap, HeaderValue},
	middleware::Next,
	response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{session, token::TokenService, AppState};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const LOGIN_PATH: &str = "/login";

const STATIC_PREFIXES: [&str; 4] = ["/_next/", "/static/", "/assets/", "/favicon.ico"];
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "avif"];

/// The signed-in user, as forwarded to page handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
	pub id: Uuid,
	pub email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
	/// Let the request through without an identity.
	Pass,
	/// Send the browser to the login page, coming back to `redirect_to` afterwards.
	Redirect { redirect_to: String },
	/// Let the request through with the identity attached.
	Forward(Identity),
}

pub fn is_static_asset(path: &str) -> bool {
	if STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
		return true;
	}

	let file = path.rsplit('/').next().unwrap_or(path);

	file.rsplit_once('.').is_some_and(|(_, extension)| {
		IMAGE_EXTENSIONS
			.iter()
			.any(|e| e.eq_ignore_ascii_case(extension))
	})
}

/// Whether `path` equals a protected path or is nested under one.
pub fn is_protected(path: &str, protected: &[String]) -> bool {
	protected.iter().any(|p| {
		p == "/"
			|| path == p
			|| path
				.strip_prefix(p.as_str())
				.is_some_and(|rest| rest.starts_with('/'))
	})
}

/// Decides what happens to a request for `path_and_query`, given its `Cookie` header.
pub fn decide(
	path_and_query: &str,
	cookie_header: Option<&str>,
	protected: &[String],
	tokens: &TokenService,
	now: DateTime<Utc>,
) -> Decision {
	let path = path_and_query
		.split_once('?')
		.map_or(path_and_query, |(path, _)| path);

	if is_static_asset(path) || !is_protected(path, protected) {
		return Decision::Pass;
	}

	let claims = cookie_header
		.and_then(|header| session::find_cookie(header, session::COOKIE_NAME))
		.and_then(|cookie| tokens.verify(cookie.value(), now).ok());

	match claims {
		Some(claims) => Decision::Forward(Identity {
			id: claims.sub,
			email: claims.email,
		}),
		None => Decision::Redirect {
			redirect_to: path_and_query.to_owned(),
		},
	}
}

/// The login page URL that returns to `redirect_to` after signing in.
pub fn login_url(redirect_to: &str) -> String {
	let query = url::form_urlencoded::Serializer::new(String::new())
		.append_pair("redirectTo", redirect_to)
		.finish();

	format!("{LOGIN_PATH}?{query}")
}

fn strip_identity_headers(headers: &mut HeaderMap) {
	headers.remove(USER_ID_HEADER);
	headers.remove(USER_EMAIL_HEADER);
}

fn forward_identity_headers(headers: &mut HeaderMap, identity: &Identity) {
	let values = [
		(USER_ID_HEADER, identity.id.to_string()),
		(USER_EMAIL_HEADER, identity.email.clone()),
	];

	for (name, value) in values {
		// Emails outside visible ASCII are only available through the extension.
		if let Ok(value) = HeaderValue::from_str(&value) {
			headers.insert(name, value);
		}
	}
}

pub async fn session_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	strip_identity_headers(req.headers_mut());

	let path_and_query = req
		.uri()
		.path_and_query()
		.map_or_else(|| req.uri().path().to_owned(), |pq| pq.as_str().to_owned());

	let cookie_header = req
		.headers()
		.get(header::COOKIE)
		.and_then(|value| value.to_str().ok());

	let decision = decide(
		&path_and_query,
		cookie_header,
		&state.config.protected_paths,
		&state.tokens,
		Utc::now(),
	);

	match decision {
		Decision::Pass => next.run(req).await,
		Decision::Redirect { redirect_to } => {
			tracing::debug!(path = %redirect_to, "no valid session, redirecting to login");

			Redirect::temporary(&login_url(&redirect_to)).into_response()
		}
		Decision::Forward(identity) => {
			forward_identity_headers(req.headers_mut(), &identity);
			req.extensions_mut().insert(identity);
			next.run(req).await
		}
	}
}
