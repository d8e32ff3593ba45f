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
	#[error("recipe {0} is not a favourite")]
	NotFavourite(Uuid),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/",
		get_with(get_favourites, get_favourites_docs)
			.post_with(add_favourite, add_favourite_docs)
			.delete_with(remove_favourite, remove_favourite_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownRecipe(..) | Self::NotFavourite(..) => StatusCode::NOT_FOUND,
		}
	}
}
