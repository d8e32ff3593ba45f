//! Request extractors that reject invalid input through the crate [`Error`],
//! so malformed bodies, query strings and ids all share the error envelope.

mod session;

pub use session::{Session, SessionToken};

use aide::OperationIo;
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::Error;

fn validated<T: Validate>(value: T) -> Result<T, Error> {
	value.validate()?;
	Ok(value)
}

/// A JSON body that passed its [`Validate`] rules. Also used to send
/// response bodies.
///
/// ```rust,ignore
/// async fn signup(Json(auth): Json<model::SignupInput>) {
///   // auth.email is a valid address and auth.password is non-empty
/// }
/// ```
#[derive(OperationIo)]
#[aide(input_with = "axum::Json<T>", output_with = "axum::Json<T>", json_schema)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let axum::Json(body) = axum::Json::<T>::from_request(req, state).await?;

		validated(body).map(Self)
	}
}

/// Query parameters that passed their [`Validate`] rules. Several can be
/// read from one query string, such as a [`Paginate`](crate::route::model::Paginate)
/// next to a sort order.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Query<T>",
	output_with = "axum::Json<T>",
	json_schema
)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let axum::extract::Query(query) =
			axum::extract::Query::<T>::from_request_parts(parts, state).await?;

		validated(query).map(Self)
	}
}

/// Path parameters, usually a recipe id. A malformed id is a bad request
/// rather than a missing route.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Path<T>",
	output_with = "axum::Json<T>",
	json_schema
)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: DeserializeOwned + Validate + Send,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let axum::extract::Path(path) =
			axum::extract::Path::<T>::from_request_parts(parts, state).await?;

		validated(path).map(Self)
	}
}
