use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{config::Environment, route, store};

/// Implemented by the error enum of every route module, mapping each
/// variant to the status code it is reported with.
///
/// The [`Display`](std::fmt::Display) output of these errors is sent to the
/// client, so it must not contain sensitive information.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
}

/// Error type for the application.
///
/// The Display trait of the non-route variants is not sent to the client,
/// so it can show sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error(transparent)]
	Auth(#[from] route::auth::Error),
	#[error(transparent)]
	Recipe(#[from] route::recipe::Error),
	#[error(transparent)]
	Review(#[from] route::review::Error),
	#[error(transparent)]
	Favourite(#[from] route::favourite::Error),
	#[error(transparent)]
	ShoppingList(#[from] route::shopping_list::Error),
	#[error(transparent)]
	Browse(#[from] route::browse::Error),
	#[error("rate limit error: {0}")]
	RateLimit(#[from] GovernorError),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
}

/// The body of every failed response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
	/// Always `false`.
	pub success: bool,
	/// What went wrong, safe to show to a user.
	pub message: String,
	/// Individual problems, such as one per invalid field.
	pub errors: Vec<String>,
	/// Internal error detail. Never present in production.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
}

impl ErrorResponse {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			success: false,
			message: message.into(),
			errors: Vec::new(),
			detail: None,
		}
	}

	pub fn errors(mut self, errors: Vec<String>) -> Self {
		self.errors = errors;
		self
	}

	/// Attaches internal detail, unless running in production.
	pub fn detail(mut self, detail: impl FnOnce() -> String) -> Self {
		if !Environment::current().is_production() {
			self.detail = Some(detail());
		}

		self
	}

	fn with_status(self, status: StatusCode) -> Response<Body> {
		(status, Json(self)).into_response()
	}
}

/// Lists every validation failure as `path: message`, where nested fields
/// are reached with `.` and list items with `[index]`.
fn flatten_validation(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
	for (field, kind) in errors.errors() {
		let path = if prefix.is_empty() {
			field.to_string()
		} else {
			format!("{prefix}.{field}")
		};

		match kind {
			ValidationErrorsKind::Field(errors) => {
				out.extend(errors.iter().map(|error| match &error.message {
					Some(message) => format!("{path}: {message}"),
					None => format!("{path}: {}", error.code),
				}));
			}
			ValidationErrorsKind::Struct(errors) => flatten_validation(&path, errors, out),
			ValidationErrorsKind::List(items) => {
				for (index, errors) in items {
					flatten_validation(&format!("{path}[{index}]"), errors, out);
				}
			}
		}
	}
}

fn shaped(error: &impl ErrorShape) -> Response<Body> {
	let status = error.status();

	if status.is_server_error() {
		tracing::error!(%error, "request failed");

		return ErrorResponse::new("internal server error")
			.detail(|| error.to_string())
			.with_status(status);
	}

	ErrorResponse::new(error.to_string()).with_status(status)
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Error::Validation(errors) => {
				let mut messages = Vec::new();

				flatten_validation("", &errors, &mut messages);
				messages.sort();

				ErrorResponse::new("validation failed")
					.errors(messages)
					.with_status(StatusCode::BAD_REQUEST)
			}
			Error::Json(rejection) => ErrorResponse::new("invalid request body")
				.errors(vec![rejection.body_text()])
				.with_status(StatusCode::BAD_REQUEST),
			Error::Query(rejection) => ErrorResponse::new("invalid query string")
				.errors(vec![rejection.body_text()])
				.with_status(StatusCode::BAD_REQUEST),
			Error::Path(rejection) => ErrorResponse::new("invalid id format")
				.errors(vec![rejection.body_text()])
				.with_status(StatusCode::BAD_REQUEST),
			Error::Auth(error) => shaped(&error),
			Error::Recipe(error) => shaped(&error),
			Error::Review(error) => shaped(&error),
			Error::Favourite(error) => shaped(&error),
			Error::ShoppingList(error) => shaped(&error),
			Error::Browse(error) => shaped(&error),
			Error::RateLimit(GovernorError::TooManyRequests { headers, .. }) => {
				let mut response = ErrorResponse::new("too many requests")
					.with_status(StatusCode::TOO_MANY_REQUESTS);

				if let Some(headers) = headers {
					response.headers_mut().extend(headers);
				}

				response
			}
			error @ (Error::RateLimit(..) | Error::Store(..)) => {
				tracing::error!(%error, "request failed");

				ErrorResponse::new("internal server error")
					.detail(|| error.to_string())
					.with_status(StatusCode::INTERNAL_SERVER_ERROR)
			}
		}
	}
}

impl aide::OperationOutput for Error {
	type Inner = ErrorResponse;
}
