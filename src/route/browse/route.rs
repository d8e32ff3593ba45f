use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Query},
	model::Recipe,
	openapi::tag,
	route::Success,
	AppState,
};

use super::{
	model::{self, Listing},
	Error,
};

fn non_empty(recipes: Vec<Recipe>) -> Result<Listing, Error> {
	if recipes.is_empty() {
		Err(Error::NoMatches)
	} else {
		Ok(Listing::Recipes(recipes))
	}
}

/// Appends the fallback results not already present in the primary results.
pub fn union_by_id(mut primary: Vec<Recipe>, fallback: Vec<Recipe>) -> Vec<Recipe> {
	for recipe in fallback {
		if !primary.iter().any(|r| r.id == recipe.id) {
			primary.push(recipe);
		}
	}

	primary
}

/// Browse categories
/// Lists the distinct categories, or the recipes in one category.
#[route(tag = tag::BROWSE, response(status = 404, description = "No recipe is in the category."))]
pub async fn get_categories(
	State(state): State<AppState>,
	Query(input): Query<model::CategoryInput>,
) -> Result<Json<Success<Listing>>, crate::Error> {
	let listing = match input.category.as_deref().map(str::trim) {
		None | Some("") => Listing::Names(state.database.categories().await?),
		Some(category) => non_empty(state.database.recipes_in_category(category).await?)?,
	};

	Ok(Success::json(listing))
}

/// Browse tags
/// Lists the distinct tags, or the recipes carrying any (or, with `matchAll`, every) of the given tags.
#[route(tag = tag::BROWSE, response(status = 404, description = "No recipe matches the tags."))]
pub async fn get_tags(
	State(state): State<AppState>,
	Query(input): Query<model::TagsInput>,
) -> Result<Json<Success<Listing>>, crate::Error> {
	let Some(tags) = input.tags.as_deref() else {
		return Ok(Success::json(Listing::Names(state.database.tags().await?)));
	};

	let tags = model::split_list(tags);

	if tags.is_empty() {
		return Err(Error::EmptyList("tags").into());
	}

	let recipes = state
		.database
		.recipes_with_tags(&tags, model::match_mode(input.match_all))
		.await?;

	Ok(Success::json(non_empty(recipes)?))
}

/// Browse ingredients
/// Lists the distinct ingredient names, or the recipes using any (or, with `matchAll`, every) of the given ingredients.
#[route(tag = tag::BROWSE, response(status = 404, description = "No recipe matches the ingredients."))]
pub async fn get_ingredients(
	State(state): State<AppState>,
	Query(input): Query<model::IngredientsInput>,
) -> Result<Json<Success<Listing>>, crate::Error> {
	let Some(ingredients) = input.ingredients.as_deref() else {
		return Ok(Success::json(Listing::Names(
			state.database.ingredients().await?,
		)));
	};

	let ingredients = model::split_list(ingredients);

	if ingredients.is_empty() {
		return Err(Error::EmptyList("ingredients").into());
	}

	let recipes = state
		.database
		.recipes_with_ingredients(&ingredients, model::match_mode(input.match_all))
		.await?;

	Ok(Success::json(non_empty(recipes)?))
}

/// Search recipes
/// Full-text search over titles and descriptions. When that finds nothing, titles containing the term are returned instead.
#[route(tag = tag::BROWSE)]
pub async fn search(
	State(state): State<AppState>,
	Query(input): Query<model::SearchInput>,
) -> Result<Json<Success<Vec<Recipe>>>, crate::Error> {
	let term = input.search_term.trim();

	if term.is_empty() {
		return Err(Error::EmptyList("searchTerm").into());
	}

	let primary = state.database.search_text(term).await?;

	if !primary.is_empty() {
		return Ok(Success::json(primary));
	}

	let fallback = state.database.search_title(term).await?;

	tracing::debug!(term, matches = fallback.len(), "full-text search empty, used title match");

	Ok(Success::json(union_by_id(primary, fallback)))
}
