use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown recipe {0}")]
	UnknownRecipe(Uuid),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_recipes, get_recipes_docs))
		.api_route("/recent", get_with(get_recent_recipes, get_recent_recipes_docs))
		.api_route("/filter", get_with(filter_recipes, filter_recipes_docs))
		.api_route(
			"/:id",
			get_with(get_recipe, get_recipe_docs).put_with(update_recipe, update_recipe_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownRecipe(..) => StatusCode::NOT_FOUND,
		}
	}
}
