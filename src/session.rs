use cookie::{time::Duration, Cookie, SameSite};

use crate::token::TOKEN_LIFETIME_SECS;

/// The HTTP-only cookie carrying the session token.
pub const COOKIE_NAME: &str = "token";
/// Script-readable convenience cookie holding the signed-in email.
pub const EMAIL_COOKIE_NAME: &str = "user_email";
/// Script-readable convenience cookie flagging a signed-in browser.
pub const LOGGED_IN_COOKIE_NAME: &str = "logged_in";

/// Creates the session cookie, expiring together with the token.
pub fn create_cookie(token: String, secure: bool) -> Cookie<'static> {
	Cookie::build((COOKIE_NAME, token))
		.secure(secure)
		.http_only(true)
		.same_site(SameSite::Strict)
		.path("/")
		.max_age(Duration::seconds(TOKEN_LIFETIME_SECS))
		.into()
}

/// Creates the two convenience cookies readable by client scripts.
pub fn create_public_cookies(email: String, secure: bool) -> [Cookie<'static>; 2] {
	[(EMAIL_COOKIE_NAME, email), (LOGGED_IN_COOKIE_NAME, "true".to_owned())].map(
		|(name, value)| {
			Cookie::build((name, value))
				.secure(secure)
				.same_site(SameSite::Strict)
				.path("/")
				.max_age(Duration::seconds(TOKEN_LIFETIME_SECS))
				.build()
		},
	)
}

/// Creates expired replacements for every session cookie, used to invalidate previous ones.
pub fn clear_cookies() -> [Cookie<'static>; 3] {
	[COOKIE_NAME, EMAIL_COOKIE_NAME, LOGGED_IN_COOKIE_NAME].map(|name| {
		Cookie::build(name)
			.http_only(name == COOKIE_NAME)
			.same_site(SameSite::Strict)
			.path("/")
			.max_age(Duration::ZERO)
			.build()
	})
}

/// Finds a cookie by name in a `Cookie` request header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<Cookie<'a>> {
	Cookie::split_parse(header)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == name)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_session_cookie_attributes() {
		let cookie = create_cookie("abc".into(), true).to_string();

		assert!(cookie.starts_with("token=abc"));
		assert!(cookie.contains("HttpOnly"));
		assert!(cookie.contains("SameSite=Strict"));
		assert!(cookie.contains("Secure"));
		assert!(cookie.contains("Max-Age=3600"));

		assert!(!create_cookie("abc".into(), false).to_string().contains("Secure"));
	}

	#[test]
	fn test_public_cookies_are_readable() {
		let [email, logged_in] = create_public_cookies("a@b.com".into(), false);

		assert_eq!(email.value(), "a@b.com");
		assert_eq!(logged_in.value(), "true");
		assert!(!email.to_string().contains("HttpOnly"));
	}

	#[test]
	fn test_find_cookie() {
		let header = "theme=dark; token=abc.def; logged_in=true";

		assert_eq!(find_cookie(header, "token").unwrap().value(), "abc.def");
		assert!(find_cookie(header, "missing").is_none());
	}
}
