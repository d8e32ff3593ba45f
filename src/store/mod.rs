//! The persistence gateway.
//!
//! Handlers only ever talk to a [`Store`]; the production implementation is
//! [`postgres::PgStore`], built once at startup and shared through the
//! application state.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use uuid::Uuid;

use crate::model::{Favourite, Recipe, Review, ShoppingItem, ShoppingList, User};

/// An error raised by a [`Store`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A unique constraint rejected the write. The value names the resource.
	#[error("duplicate {0}")]
	Duplicate(&'static str),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fields recipes can be sorted by.
///
/// Unknown names fall back to [`SortField::CreatedAt`] instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
	Title,
	#[default]
	CreatedAt,
	AverageRating,
	ReviewCount,
	PrepTime,
	CookTime,
}

impl SortField {
	pub fn parse(name: &str) -> Self {
		match name {
			"title" => Self::Title,
			"averageRating" => Self::AverageRating,
			"reviewCount" => Self::ReviewCount,
			"prepTime" => Self::PrepTime,
			"cookTime" => Self::CookTime,
			_ => Self::CreatedAt,
		}
	}

	pub fn column(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::CreatedAt => "created_at",
			Self::AverageRating => "average_rating",
			Self::ReviewCount => "review_count",
			Self::PrepTime => "prep_time",
			Self::CookTime => "cook_time",
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
	Asc,
	#[default]
	Desc,
}

impl Order {
	pub fn parse(name: &str) -> Self {
		if name.eq_ignore_ascii_case("asc") {
			Self::Asc
		} else {
			Self::Desc
		}
	}

	pub fn keyword(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

/// A sorted, paginated recipe listing. The recipe id is always
/// used as the secondary sort key, in the same direction.
#[derive(Debug, Clone, Copy)]
pub struct RecipeQuery {
	pub sort: SortField,
	pub order: Order,
	pub limit: i64,
	pub offset: i64,
}

/// Whether every requested value must match, or any one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
	All,
	Any,
}

/// A partial update of a review. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ReviewChange {
	pub rating: Option<i16>,
	pub review: Option<String>,
}

#[axum::async_trait]
pub trait Store: Send + Sync {
	/// Inserts a new user, failing with [`Error::Duplicate`] if the email is taken.
	async fn create_user(&self, user: &User) -> Result<()>;

	async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

	/// Deletes a server-side token record, returning whether one existed.
	async fn delete_token(&self, token: &str) -> Result<bool>;

	async fn recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>>;

	async fn recipe(&self, id: Uuid) -> Result<Option<Recipe>>;

	/// Replaces a recipe's description, returning the updated recipe if it exists.
	async fn update_description(&self, id: Uuid, description: &str) -> Result<Option<Recipe>>;

	/// Recipes with at most `steps` instructions.
	async fn recipes_with_max_steps(&self, steps: i32) -> Result<Vec<Recipe>>;

	/// Writes the aggregate rating fields of a recipe.
	async fn set_rating(&self, id: Uuid, average: f64, count: i64) -> Result<()>;

	async fn categories(&self) -> Result<Vec<String>>;

	async fn tags(&self) -> Result<Vec<String>>;

	async fn ingredients(&self) -> Result<Vec<String>>;

	async fn recipes_in_category(&self, category: &str) -> Result<Vec<Recipe>>;

	async fn recipes_with_tags(&self, tags: &[String], mode: Match) -> Result<Vec<Recipe>>;

	async fn recipes_with_ingredients(&self, names: &[String], mode: Match)
		-> Result<Vec<Recipe>>;

	/// Full-text match over title and description.
	async fn search_text(&self, term: &str) -> Result<Vec<Recipe>>;

	/// Case-insensitive substring match on the title.
	async fn search_title(&self, term: &str) -> Result<Vec<Recipe>>;

	/// Reviews of a recipe, newest first.
	async fn reviews(&self, recipe_id: Uuid) -> Result<Vec<Review>>;

	async fn create_review(&self, review: &Review) -> Result<()>;

	async fn update_review(
		&self,
		recipe_id: Uuid,
		review_id: Uuid,
		change: &ReviewChange,
	) -> Result<Option<Review>>;

	async fn delete_review(&self, recipe_id: Uuid, review_id: Uuid) -> Result<bool>;

	/// Adds a favourite, failing with [`Error::Duplicate`] if the pair already exists.
	async fn add_favourite(&self, user_email: &str, recipe_id: Uuid) -> Result<Favourite>;

	async fn remove_favourite(&self, user_email: &str, recipe_id: Uuid) -> Result<bool>;

	/// The user's favourite recipes, most recently favourited first.
	async fn favourite_recipes(&self, user_email: &str) -> Result<Vec<Recipe>>;

	async fn shopping_list(&self, user_id: &str) -> Result<Option<ShoppingList>>;

	/// Creates a list, failing with [`Error::Duplicate`] if the user already has one.
	async fn create_shopping_list(&self, list: &ShoppingList) -> Result<()>;

	/// Replaces the items of an existing list, returning the list if it exists.
	async fn replace_shopping_items(
		&self,
		user_id: &str,
		items: &[ShoppingItem],
	) -> Result<Option<ShoppingList>>;
}
