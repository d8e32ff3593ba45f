//! Minimal server-rendered pages behind the session gate.
//!
//! The protected pages rely on the [`Identity`] attached by
//! [`session_gate`](crate::middleware::session_gate); reaching one without it
//! means the path was left out of the protected list.

use axum::{
	extract::Query,
	response::{Html, IntoResponse, Redirect, Response},
	routing::get,
	Extension, Router,
};
use serde::Deserialize;

use crate::{
	middleware::{login_url, Identity},
	AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
	redirect_to: Option<String>,
}

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/login", get(login))
		.route("/profile", get(profile))
		.route("/favourites", get(favourites))
		.route("/shopping-list", get(shopping_list))
}

/// Escapes text for use in HTML content and attribute values.
fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}

	escaped
}

fn page(title: &str, body: &str) -> Html<String> {
	Html(format!(
		"<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head><body><h1>{title}</h1>{body}</body></html>",
		title = escape(title),
	))
}

/// Only same-site paths are followed after login.
fn safe_redirect(target: Option<&str>) -> &str {
	match target {
		Some(target) if target.starts_with('/') && !target.starts_with("//") => target,
		_ => "/",
	}
}

async fn login(Query(query): Query<LoginQuery>) -> Html<String> {
	let redirect_to = safe_redirect(query.redirect_to.as_deref());

	page(
		"Log in",
		&format!(
			"<form data-redirect-to=\"{}\" data-endpoint=\"/api/authorisation/login\">\
			<input name=\"email\" type=\"email\"><input name=\"password\" type=\"password\">\
			<button type=\"submit\">Log in</button></form>",
			escape(redirect_to)
		),
	)
}

fn protected_page(identity: Option<Extension<Identity>>, path: &str, title: &str) -> Response {
	let Some(Extension(identity)) = identity else {
		return Redirect::temporary(&login_url(path)).into_response();
	};

	page(
		title,
		&format!("<p>Signed in as {}</p>", escape(&identity.email)),
	)
	.into_response()
}

async fn profile(identity: Option<Extension<Identity>>) -> Response {
	protected_page(identity, "/profile", "Profile")
}

async fn favourites(identity: Option<Extension<Identity>>) -> Response {
	protected_page(identity, "/favourites", "Favourites")
}

async fn shopping_list(identity: Option<Extension<Identity>>) -> Response {
	protected_page(identity, "/shopping-list", "Shopping list")
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test::*;

	#[test]
	fn test_escape() {
		assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
	}

	#[test]
	fn test_safe_redirect() {
		assert_eq!(safe_redirect(Some("/profile?tab=1")), "/profile?tab=1");
		assert_eq!(safe_redirect(Some("//evil.example")), "/");
		assert_eq!(safe_redirect(Some("https://evil.example")), "/");
		assert_eq!(safe_redirect(None), "/");
	}

	#[tokio::test]
	async fn test_protected_page_redirects_without_session() {
		let (app, _) = app();

		let response = app.get("/profile").await;

		assert_eq!(response.status_code(), 307);
		assert_eq!(
			response.header(LOCATION),
			"/login?redirectTo=%2Fprofile"
		);

		let response = app
			.get("/favourites")
			.add_header(COOKIE, cookie_header("not-a-token"))
			.await;

		assert_eq!(response.status_code(), 307);
	}

	#[tokio::test]
	async fn test_protected_page_with_session() {
		let (app, _) = app();
		let token = login_as(&app, "page@b.com").await;

		let response = app
			.get("/shopping-list")
			.add_header(COOKIE, cookie_header(&token))
			.await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("Signed in as page@b.com"));
	}

	#[tokio::test]
	async fn test_spoofed_identity_is_ignored() {
		let (app, _) = app();

		let response = app
			.get("/profile")
			.add_header(
				HeaderName::from_static("x-user-email"),
				HeaderValue::from_static("admin@b.com"),
			)
			.await;

		assert_eq!(response.status_code(), 307);
	}

	#[tokio::test]
	async fn test_login_page_is_public() {
		let (app, _) = app();

		let response = app.get("/login?redirectTo=%2Fprofile").await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("data-redirect-to=\"/profile\""));
	}
}
