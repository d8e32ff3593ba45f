use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::route::model::RecipeIdInput;

use crate::model::Review;

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CreateReviewInput {
	/// The display name of the reviewer.
	#[validate(length(min = 1, max = 64))]
	pub username: String,
	#[validate(range(min = 1, max = 5))]
	pub rating: i16,
	#[validate(length(min = 1, max = 4096))]
	pub review: String,
}

/// A partial update. At least one of `rating` and `review` must be given.
#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
	pub review_id: Uuid,
	#[validate(range(min = 1, max = 5))]
	pub rating: Option<i16>,
	#[validate(length(min = 1, max = 4096))]
	pub review: Option<String>,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewInput {
	pub review_id: Uuid,
}

/// A review write, together with the recipe's rating after it.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutput {
	pub review: Review,
	pub average_rating: Option<f64>,
	pub review_count: Option<i64>,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewOutput {
	pub review_id: Uuid,
	pub message: &'static str,
}
