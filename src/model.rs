use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A model representing a single user.
///
/// Use this when fetching from the database.
/// The `password` field is never serialized to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: Uuid,
	pub email: String,
	/// argon2 and salted with `id`
	#[serde(skip_serializing)]
	pub password: Vec<u8>,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// How much of an ingredient a recipe calls for.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Measure {
	pub quantity: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit: Option<String>,
}

/// A single recipe.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
	/// The unique identifier of the recipe.
	pub id: Uuid,
	pub title: String,
	pub description: String,
	pub category: String,
	pub tags: Vec<String>,
	/// Ingredient name to the amount required.
	pub ingredients: BTreeMap<String, Measure>,
	/// Ordered preparation steps.
	pub instructions: Vec<String>,
	/// Preparation time in minutes.
	pub prep_time: i32,
	/// Cooking time in minutes.
	pub cook_time: i32,
	pub servings: i32,
	/// Image URLs.
	pub images: Vec<String>,
	/// Mean rating of the recipe's reviews, maintained by review aggregation.
	pub average_rating: f64,
	/// Number of reviews, maintained by review aggregation.
	pub review_count: i64,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A user-submitted rating and text tied to one recipe.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
	pub id: Uuid,
	pub recipe_id: Uuid,
	pub username: String,
	/// Between 1 and 5 inclusive.
	pub rating: i16,
	/// The free-text body of the review.
	pub review: String,
	/// The submission date.
	pub date: chrono::DateTime<chrono::Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A user's bookmark of a recipe.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favourite {
	pub user_email: String,
	pub recipe_id: Uuid,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A single entry on a shopping list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ShoppingItem {
	/// Trimmed and lower-cased item name, unique within a list.
	pub name: String,
	#[serde(default)]
	pub quantity: String,
	#[serde(default)]
	pub purchased: bool,
}

/// The shopping list owned by a single user.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
	pub user_id: String,
	pub items: Vec<ShoppingItem>,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub updated_at: chrono::DateTime<chrono::Utc>,
}
