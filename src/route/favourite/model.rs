use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The result of adding a favourite. Adding one twice is not an error.
#[derive(Serialize, JsonSchema)]
pub struct AddFavouriteOutput {
	/// Whether a new favourite was recorded.
	pub created: bool,
	pub message: &'static str,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFavouriteOutput {
	pub recipe_id: Uuid,
	pub message: &'static str,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteInput {
	pub recipe_id: Uuid,
}
