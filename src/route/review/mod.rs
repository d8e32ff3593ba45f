use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod aggregate;
pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown recipe {0}")]
	UnknownRecipe(Uuid),
	#[error("unknown review {0}")]
	UnknownReview(Uuid),
	#[error("nothing to update, give a rating or a review")]
	NothingToUpdate,
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/:recipeId",
		get_with(get_reviews, get_reviews_docs)
			.post_with(create_review, create_review_docs)
			.put_with(update_review, update_review_docs)
			.delete_with(delete_review, delete_review_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownRecipe(..) | Self::UnknownReview(..) => StatusCode::NOT_FOUND,
			Self::NothingToUpdate => StatusCode::BAD_REQUEST,
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	async fn post_review(app: &TestServer, recipe_id: Uuid, rating: i16) -> TestResponse {
		app.post(&format!("/api/reviews/{recipe_id}"))
			.json(&json!({ "username": "ana", "rating": rating, "review": "Lovely" }))
			.await
	}

	async fn recipe_rating(app: &TestServer, recipe_id: Uuid) -> (f64, i64) {
		let recipe = app
			.get(&format!("/api/recipes/{recipe_id}"))
			.await
			.json::<Value>();

		(
			recipe["data"]["averageRating"].as_f64().unwrap(),
			recipe["data"]["reviewCount"].as_i64().unwrap(),
		)
	}

	#[tokio::test]
	async fn test_first_review_sets_rating() {
		let (app, store) = app();
		let recipe = seed_recipes(&store, 1).remove(0);

		let response = post_review(&app, recipe.id, 5).await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.json::<Value>()["data"]["averageRating"], 5.0);
		assert_eq!(recipe_rating(&app, recipe.id).await, (5.0, 1));

		let reviews = app
			.get(&format!("/api/reviews/{}", recipe.id))
			.await
			.json::<Value>();

		assert_eq!(reviews["data"].as_array().unwrap().len(), 1);
		assert_eq!(reviews["data"][0]["username"], "ana");
	}

	#[tokio::test]
	async fn test_rating_follows_updates_and_deletes() {
		let (app, store) = app();
		let recipe = seed_recipes(&store, 1).remove(0);

		post_review(&app, recipe.id, 5).await;

		let second = post_review(&app, recipe.id, 2).await.json::<Value>()["data"]["review"]["id"]
			.as_str()
			.unwrap()
			.to_owned();

		assert_eq!(recipe_rating(&app, recipe.id).await, (3.5, 2));

		let response = app
			.put(&format!("/api/reviews/{}", recipe.id))
			.json(&json!({ "reviewId": second, "rating": 3 }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["data"]["review"]["review"], "Lovely");
		assert_eq!(recipe_rating(&app, recipe.id).await, (4.0, 2));

		let response = app
			.delete(&format!("/api/reviews/{}?reviewId={second}", recipe.id))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(recipe_rating(&app, recipe.id).await, (5.0, 1));
	}

	#[tokio::test]
	async fn test_deleting_last_review_keeps_rating() {
		let (app, store) = app();
		let recipe = seed_recipes(&store, 1).remove(0);

		let id = post_review(&app, recipe.id, 4).await.json::<Value>()["data"]["review"]["id"]
			.as_str()
			.unwrap()
			.to_owned();

		app.delete(&format!("/api/reviews/{}?reviewId={id}", recipe.id))
			.await;

		// With no reviews left, the aggregate is not rewritten.
		assert_eq!(recipe_rating(&app, recipe.id).await, (4.0, 1));
	}

	#[tokio::test]
	async fn test_review_validation() {
		let (app, store) = app();
		let recipe = seed_recipes(&store, 1).remove(0);

		assert_eq!(post_review(&app, recipe.id, 6).await.status_code(), 400);
		assert_eq!(post_review(&app, recipe.id, 0).await.status_code(), 400);
		assert_eq!(post_review(&app, Uuid::new_v4(), 3).await.status_code(), 404);

		let response = app
			.put(&format!("/api/reviews/{}", recipe.id))
			.json(&json!({ "reviewId": Uuid::new_v4() }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.put(&format!("/api/reviews/{}", recipe.id))
			.json(&json!({ "reviewId": Uuid::new_v4(), "rating": 2 }))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app
			.delete(&format!("/api/reviews/{}?reviewId={}", recipe.id, Uuid::new_v4()))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_concurrent_reviews_aggregate_fully() {
		let (app, store) = app();
		let recipe = seed_recipes(&store, 1).remove(0);

		tokio::join!(
			post_review(&app, recipe.id, 1),
			post_review(&app, recipe.id, 2),
			post_review(&app, recipe.id, 4),
			post_review(&app, recipe.id, 5),
		);

		assert_eq!(recipe_rating(&app, recipe.id).await, (3.0, 4));
	}
}
