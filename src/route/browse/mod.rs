use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no matching recipes")]
	NoMatches,
	#[error("{0} must not be empty")]
	EmptyList(&'static str),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/categories", get_with(get_categories, get_categories_docs))
		.api_route("/Tags", get_with(get_tags, get_tags_docs))
		.api_route("/Ingredients", get_with(get_ingredients, get_ingredients_docs))
		.api_route("/search", get_with(search, search_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::NoMatches => StatusCode::NOT_FOUND,
			Self::EmptyList(..) => StatusCode::BAD_REQUEST,
		}
	}
}
