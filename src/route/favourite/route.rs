use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Session},
	model::Recipe,
	openapi::tag,
	route::Success,
	store, AppState,
};

use super::{model, Error};

/// Get favourites
/// Lists the signed-in user's favourite recipes, most recently added first.
#[route(tag = tag::FAVOURITE)]
pub async fn get_favourites(
	State(state): State<AppState>,
	session: Session,
) -> Result<Json<Success<Vec<Recipe>>>, crate::Error> {
	Ok(Success::json(
		state.database.favourite_recipes(session.email()).await?,
	))
}

/// Add favourite
/// Bookmarks a recipe. Bookmarking it again succeeds with `created` set to false.
#[route(tag = tag::FAVOURITE, response(status = 404, description = "The recipe does not exist."))]
pub async fn add_favourite(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::FavouriteInput>,
) -> Result<Json<Success<model::AddFavouriteOutput>>, crate::Error> {
	if state.database.recipe(input.recipe_id).await?.is_none() {
		return Err(Error::UnknownRecipe(input.recipe_id).into());
	}

	let output = match state
		.database
		.add_favourite(session.email(), input.recipe_id)
		.await
	{
		Ok(..) => {
			tracing::info!(user = %session.user_id(), recipe = %input.recipe_id, "favourite added");

			model::AddFavouriteOutput {
				created: true,
				message: "favourite added",
			}
		}
		Err(store::Error::Duplicate(..)) => model::AddFavouriteOutput {
			created: false,
			message: "already a favourite",
		},
		Err(e) => return Err(e.into()),
	};

	Ok(Success::json(output))
}

/// Remove favourite
#[route(tag = tag::FAVOURITE, response(status = 404, description = "The recipe is not a favourite."))]
pub async fn remove_favourite(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::FavouriteInput>,
) -> Result<Json<Success<model::RemoveFavouriteOutput>>, crate::Error> {
	if !state
		.database
		.remove_favourite(session.email(), input.recipe_id)
		.await?
	{
		return Err(Error::NotFavourite(input.recipe_id).into());
	}

	Ok(Success::json(model::RemoveFavouriteOutput {
		recipe_id: input.recipe_id,
		message: "favourite removed",
	}))
}
