use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Path, Query},
	model::Review,
	openapi::tag,
	route::{review::aggregate, Success},
	store::ReviewChange,
	AppState,
};

use super::{aggregate::Aggregate, model, Error};

async fn ensure_recipe(state: &AppState, recipe_id: Uuid) -> Result<(), crate::Error> {
	match state.database.recipe(recipe_id).await? {
		Some(..) => Ok(()),
		None => Err(Error::UnknownRecipe(recipe_id).into()),
	}
}

async fn recompute(state: &AppState, recipe_id: Uuid) -> Result<Option<Aggregate>, crate::Error> {
	Ok(aggregate::recompute(&*state.database, &state.ratings, recipe_id).await?)
}

fn output(review: Review, aggregate: Option<Aggregate>) -> model::ReviewOutput {
	model::ReviewOutput {
		review,
		average_rating: aggregate.map(|a| a.average),
		review_count: aggregate.map(|a| a.count),
	}
}

/// Get reviews
/// Lists the reviews of a recipe, newest first.
#[route(tag = tag::REVIEW, response(status = 404, description = "The recipe does not exist."))]
pub async fn get_reviews(
	State(state): State<AppState>,
	Path(path): Path<model::RecipeIdInput>,
) -> Result<Json<Success<Vec<Review>>>, crate::Error> {
	ensure_recipe(&state, path.recipe_id).await?;

	Ok(Success::json(state.database.reviews(path.recipe_id).await?))
}

/// Create review
/// Adds a review to a recipe and recomputes the recipe's rating.
#[route(tag = tag::REVIEW, response(status = 201, description = "Review created.", shape = "Json<Success<model::ReviewOutput>>"), response(status = 404, description = "The recipe does not exist."))]
pub async fn create_review(
	State(state): State<AppState>,
	Path(path): Path<model::RecipeIdInput>,
	Json(input): Json<model::CreateReviewInput>,
) -> Result<impl IntoApiResponse, crate::Error> {
	ensure_recipe(&state, path.recipe_id).await?;

	let review = Review {
		id: Uuid::new_v4(),
		recipe_id: path.recipe_id,
		username: input.username,
		rating: input.rating,
		review: input.review,
		date: chrono::Utc::now(),
		updated_at: None,
	};

	state.database.create_review(&review).await?;

	let aggregate = recompute(&state, path.recipe_id).await?;

	tracing::info!(recipe = %review.recipe_id, review = %review.id, "review created");

	Ok((StatusCode::CREATED, Success::json(output(review, aggregate))).into_response())
}

/// Update review
/// Changes the rating or text of a review and recomputes the recipe's rating.
#[route(tag = tag::REVIEW, response(status = 404, description = "The recipe or review does not exist."))]
pub async fn update_review(
	State(state): State<AppState>,
	Path(path): Path<model::RecipeIdInput>,
	Json(input): Json<model::UpdateReviewInput>,
) -> Result<Json<Success<model::ReviewOutput>>, crate::Error> {
	if input.rating.is_none() && input.review.is_none() {
		return Err(Error::NothingToUpdate.into());
	}

	ensure_recipe(&state, path.recipe_id).await?;

	let change = ReviewChange {
		rating: input.rating,
		review: input.review,
	};

	let review = state
		.database
		.update_review(path.recipe_id, input.review_id, &change)
		.await?
		.ok_or(Error::UnknownReview(input.review_id))?;

	let aggregate = recompute(&state, path.recipe_id).await?;

	Ok(Success::json(output(review, aggregate)))
}

/// Delete review
/// Removes a review and recomputes the recipe's rating. Deleting the last review leaves the previous rating in place.
#[route(tag = tag::REVIEW, response(status = 404, description = "The recipe or review does not exist."))]
pub async fn delete_review(
	State(state): State<AppState>,
	Path(path): Path<model::RecipeIdInput>,
	Query(input): Query<model::DeleteReviewInput>,
) -> Result<Json<Success<model::DeleteReviewOutput>>, crate::Error> {
	ensure_recipe(&state, path.recipe_id).await?;

	if !state
		.database
		.delete_review(path.recipe_id, input.review_id)
		.await?
	{
		return Err(Error::UnknownReview(input.review_id).into());
	}

	recompute(&state, path.recipe_id).await?;

	tracing::info!(recipe = %path.recipe_id, review = %input.review_id, "review deleted");

	Ok(Success::json(model::DeleteReviewOutput {
		review_id: input.review_id,
		message: "review deleted",
	}))
}
