use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

pub use crate::route::model::{IdInput, Paginate};

use crate::store::{Order, RecipeQuery, SortField};

/// The sort order of a listing, read from the same query string as its [`Paginate`].
///
/// Sort fields and directions outside the allow-list are ignored
/// rather than rejected.
#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortInput {
	/// One of `title`, `createdAt`, `averageRating`, `reviewCount`, `prepTime`, `cookTime`.
	pub sort_by: Option<String>,
	/// Either `asc` or `desc`.
	pub order: Option<String>,
}

impl SortInput {
	pub fn query(&self, paginate: &Paginate) -> RecipeQuery {
		RecipeQuery {
			sort: self
				.sort_by
				.as_deref()
				.map(SortField::parse)
				.unwrap_or_default(),
			order: self.order.as_deref().map(Order::parse).unwrap_or_default(),
			limit: paginate.limit(),
			offset: paginate.offset(),
		}
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct FilterInput {
	/// The maximum number of instructions.
	#[validate(range(min = 1))]
	pub steps: i32,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeInput {
	#[validate(length(min = 1, max = 10000))]
	pub description: String,
	/// The user making the change.
	#[validate(length(min = 1))]
	pub user_id: String,
}
