use aide::axum::IntoApiResponse;
use argon2::Argon2;
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::{AppendHeaders, IntoResponse},
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Session, SessionToken},
	model::User,
	openapi::tag,
	route::Success,
	session, store,
	token::Claims,
	AppState,
};

use super::{model, Error};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
///
/// Hashing is deliberately slow, so it runs on the blocking pool
/// instead of stalling the request executor.
async fn hash_password(
	hasher: Argon2<'static>,
	password: String,
	id: Uuid,
) -> Result<[u8; KEY_LENGTH], Error> {
	let hash = tokio::task::spawn_blocking(move || {
		let mut hash = [0; KEY_LENGTH];

		hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
		Ok::<_, argon2::Error>(hash)
	})
	.await??;

	Ok(hash)
}

/// Sign up
/// Creates a new account. The password is stored only as a salted hash.
#[route(tag = tag::AUTH, response(status = 201, description = "Signed up successfully.", shape = "Json<Success<model::SignupOutput>>"))]
pub async fn signup(
	State(state): State<AppState>,
	Json(auth): Json<model::SignupInput>,
) -> Result<impl IntoApiResponse, crate::Error> {
	let user_id = Uuid::new_v4();
	let hashed = hash_password(state.hasher.clone(), auth.password, user_id).await?;

	let user = User {
		id: user_id,
		email: auth.email,
		password: hashed.to_vec(),
		created_at: chrono::Utc::now(),
	};

	state.database.create_user(&user).await.map_err(|e| match e {
		store::Error::Duplicate(..) => crate::Error::from(Error::EmailTaken),
		e => e.into(),
	})?;

	tracing::info!(user = %user_id, "user signed up");

	Ok((
		StatusCode::CREATED,
		Success::json(model::SignupOutput { user_id }),
	)
		.into_response())
}

/// Log in
/// Logs in to an account, setting the session cookie and two script-readable convenience cookies.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<Success<model::LoginOutput>>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(auth): Json<model::LoginInput>,
) -> Result<impl IntoApiResponse, crate::Error> {
	let user = state.database.user_by_email(&auth.email).await?;

	// Unknown emails still pay for a hash, so both failures take as long.
	let salt = user.as_ref().map_or(Uuid::nil(), |user| user.id);
	let hashed = hash_password(state.hasher.clone(), auth.password, salt).await?;

	let Some(user) = user.filter(|user| user.password == hashed) else {
		return Err(Error::InvalidEmailOrPassword.into());
	};

	let token = state
		.tokens
		.issue(user.id, &user.email, chrono::Utc::now())
		.map_err(Error::Token)?;

	let secure = state.config.environment.is_production();
	let [email, logged_in] = session::create_public_cookies(user.email.clone(), secure);

	tracing::info!(user = %user.id, "user logged in");

	Ok((
		AppendHeaders([
			(header::SET_COOKIE, session::create_cookie(token, secure).to_string()),
			(header::SET_COOKIE, email.to_string()),
			(header::SET_COOKIE, logged_in.to_string()),
		]),
		Success::json(model::LoginOutput { email: user.email }),
	)
		.into_response())
}

/// Log out
/// Clears the session cookies. Succeeds whether or not a session was present.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged out successfully.", shape = "Json<Success<model::LogoutOutput>>"))]
pub async fn logout(
	State(state): State<AppState>,
	SessionToken(token): SessionToken,
) -> Result<impl IntoApiResponse, crate::Error> {
	// Sessions are stateless, so a stored token record is unusual. A failure
	// to remove one must not block the logout.
	if let Some(token) = token {
		if let Err(error) = state.database.delete_token(&token).await {
			tracing::warn!(%error, "failed to delete token record");
		}
	}

	let [token, email, logged_in] = session::clear_cookies();

	Ok((
		AppendHeaders([
			(header::SET_COOKIE, token.to_string()),
			(header::SET_COOKIE, email.to_string()),
			(header::SET_COOKIE, logged_in.to_string()),
		]),
		Success::json(model::LogoutOutput {
			message: "logged out",
		}),
	)
		.into_response())
}

/// Get session
/// Verifies the session token and returns its claims.
#[route(tag = tag::AUTH)]
pub async fn get_session(session: Session) -> Json<Success<Claims>> {
	Success::json(session.claims)
}
