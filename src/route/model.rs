use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::Json;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn one() -> i64 {
	1
}

#[inline]
fn default_page_size() -> i64 {
	DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 10000))]
	#[serde(default = "one")]
	pub page: i64,
	/// The number of items to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "default_page_size")]
	pub limit: i64,
}

impl Paginate {
	pub fn offset(&self) -> i64 {
		(self.page - 1) * self.limit
	}

	pub fn limit(&self) -> i64 {
		self.limit
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIdInput {
	pub recipe_id: Uuid,
}

/// The body of every successful response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Success<T> {
	/// Always `true`.
	pub success: bool,
	pub data: T,
}

impl<T> Success<T> {
	pub fn json(data: T) -> Json<Self> {
		Json(Self {
			success: true,
			data,
		})
	}
}
