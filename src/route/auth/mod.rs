use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, token, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information. In particular, an unknown email and a wrong password
/// share one message, as do missing, invalid and expired tokens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password hashing error")]
	Argon(#[from] argon2::Error),
	#[error("password hashing task failed")]
	Join(#[from] tokio::task::JoinError),
	#[error("token error: {0}")]
	Token(#[from] token::Error),
	#[error("unauthorized")]
	Unauthorized,
	#[error("email already taken")]
	EmailTaken,
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/signup", post_with(signup, signup_docs))
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", post_with(logout, logout_docs))
		.api_route("/session", get_with(get_session, get_session_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword | Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::Argon(..) | Self::Join(..) | Self::Token(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::EmailTaken => StatusCode::CONFLICT,
		}
	}
}
