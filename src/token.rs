//! Signed, time-bounded session tokens.
//!
//! Tokens are HS256 JWTs and are never stored server-side; the token is the
//! whole credential. Verification is a pure function of the token, the
//! secret and the supplied time.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a freshly issued token stays valid, in seconds.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// The claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Claims {
	/// The user id.
	pub sub: Uuid,
	pub email: String,
	/// Issued at, in seconds since the epoch.
	pub iat: i64,
	/// Expiry, in seconds since the epoch.
	pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("token could not be signed: {0}")]
	Encode(jsonwebtoken::errors::Error),
	#[error("token is malformed or badly signed: {0}")]
	Invalid(jsonwebtoken::errors::Error),
	#[error("token expired")]
	Expired,
}

#[derive(Clone)]
pub struct TokenService {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
}

impl TokenService {
	pub fn new(secret: &str) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);

		// Expiry is checked against the caller's clock in `verify`.
		validation.validate_exp = false;
		validation.required_spec_claims.clear();

		Self {
			encoding_key: EncodingKey::from_secret(secret.as_bytes()),
			decoding_key: DecodingKey::from_secret(secret.as_bytes()),
			validation,
		}
	}

	/// Mints a token for the user, valid for [`TOKEN_LIFETIME_SECS`] from `now`.
	pub fn issue(&self, user_id: Uuid, email: &str, now: DateTime<Utc>) -> Result<String, Error> {
		let claims = Claims {
			sub: user_id,
			email: email.to_owned(),
			iat: now.timestamp(),
			exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
		};

		encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(Error::Encode)
	}

	/// Checks the signature and that the token has not expired at `now`.
	pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, Error> {
		let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
			.map_err(Error::Invalid)?
			.claims;

		if claims.exp <= now.timestamp() {
			return Err(Error::Expired);
		}

		Ok(claims)
	}
}
