use aide::axum::IntoApiResponse;
use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	model::Recipe,
	openapi::tag,
	route::Success,
	AppState,
};

use super::{model, Error};

/// Get recipes
/// Lists recipes sorted by an allow-listed field. Unknown sort fields fall back to newest first.
#[route(tag = tag::RECIPE)]
pub async fn get_recipes(
	State(state): State<AppState>,
	Query(paginate): Query<model::Paginate>,
	Query(sort): Query<model::SortInput>,
) -> Result<Json<Success<Vec<Recipe>>>, crate::Error> {
	let recipes = state.database.recipes(&sort.query(&paginate)).await?;

	Ok(Success::json(recipes))
}

/// Get recent recipes
/// Lists recipes newest first.
#[route(tag = tag::RECIPE)]
pub async fn get_recent_recipes(
	State(state): State<AppState>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Success<Vec<Recipe>>>, crate::Error> {
	let newest_first = model::SortInput {
		sort_by: None,
		order: None,
	};

	Ok(Success::json(
		state.database.recipes(&newest_first.query(&paginate)).await?,
	))
}

/// Get recipe
#[route(tag = tag::RECIPE, response(status = 404, description = "The recipe does not exist."))]
pub async fn get_recipe(
	State(state): State<AppState>,
	Path(input): Path<model::IdInput>,
) -> Result<Json<Success<Recipe>>, crate::Error> {
	let recipe = state
		.database
		.recipe(input.id)
		.await?
		.ok_or(Error::UnknownRecipe(input.id))?;

	Ok(Success::json(recipe))
}

/// Update recipe
/// Replaces the description of a recipe.
#[route(tag = tag::RECIPE, response(status = 404, description = "The recipe does not exist."))]
pub async fn update_recipe(
	State(state): State<AppState>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateRecipeInput>,
) -> Result<impl IntoApiResponse, crate::Error> {
	let recipe = state
		.database
		.update_description(path.id, &input.description)
		.await?
		.ok_or(Error::UnknownRecipe(path.id))?;

	tracing::info!(recipe = %recipe.id, user = %input.user_id, "recipe description updated");

	Ok(Success::json(recipe))
}

/// Filter recipes by steps
/// Lists recipes with at most the given number of instructions.
#[route(tag = tag::RECIPE)]
pub async fn filter_recipes(
	State(state): State<AppState>,
	Query(input): Query<model::FilterInput>,
) -> Result<Json<Success<Vec<Recipe>>>, crate::Error> {
	Ok(Success::json(
		state.database.recipes_with_max_steps(input.steps).await?,
	))
}
