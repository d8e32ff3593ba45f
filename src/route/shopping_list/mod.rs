use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod list;
pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no shopping list for this user")]
	UnknownList,
	#[error("a shopping list already exists for this user")]
	AlreadyExists,
	#[error("append and markPurchased cannot be combined")]
	ConflictingModes,
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/",
		get_with(get_shopping_list, get_shopping_list_docs)
			.post_with(create_shopping_list, create_shopping_list_docs)
			.put_with(update_shopping_list, update_shopping_list_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownList => StatusCode::NOT_FOUND,
			Self::AlreadyExists => StatusCode::CONFLICT,
			Self::ConflictingModes => StatusCode::BAD_REQUEST,
		}
	}
}
