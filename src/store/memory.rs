//! An in-process [`Store`] used by the test suite.

use std::{cmp::Ordering, collections::BTreeSet, sync::Mutex};

use uuid::Uuid;

use super::{Error, Match, Order, RecipeQuery, Result, ReviewChange, SortField, Store};
use crate::model::{Favourite, Recipe, Review, ShoppingItem, ShoppingList, User};

#[derive(Default)]
struct Inner {
	users: Vec<User>,
	tokens: Vec<String>,
	recipes: Vec<Recipe>,
	reviews: Vec<Review>,
	favourites: Vec<Favourite>,
	shopping_lists: Vec<ShoppingList>,
}

#[derive(Default)]
pub struct MemoryStore {
	inner: Mutex<Inner>,
}

impl MemoryStore {
	pub fn insert_recipe(&self, recipe: Recipe) {
		self.lock().recipes.push(recipe);
	}

	pub fn insert_token(&self, token: &str) {
		self.lock().tokens.push(token.to_owned());
	}

	pub fn has_token(&self, token: &str) -> bool {
		self.lock().tokens.iter().any(|t| t == token)
	}

	pub fn favourite_count(&self) -> usize {
		self.lock().favourites.len()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
		self.inner.lock().expect("memory store lock poisoned")
	}

	fn newest_first(&self, filter: impl Fn(&Recipe) -> bool) -> Vec<Recipe> {
		let mut recipes = self
			.lock()
			.recipes
			.iter()
			.filter(|recipe| filter(recipe))
			.cloned()
			.collect::<Vec<_>>();

		recipes.sort_by(|a, b| compare(a, b, SortField::CreatedAt, Order::Desc));
		recipes
	}
}

fn compare(a: &Recipe, b: &Recipe, sort: SortField, order: Order) -> Ordering {
	let primary = match sort {
		SortField::Title => a.title.cmp(&b.title),
		SortField::CreatedAt => a.created_at.cmp(&b.created_at),
		SortField::AverageRating => a.average_rating.total_cmp(&b.average_rating),
		SortField::ReviewCount => a.review_count.cmp(&b.review_count),
		SortField::PrepTime => a.prep_time.cmp(&b.prep_time),
		SortField::CookTime => a.cook_time.cmp(&b.cook_time),
	};
	let ordering = primary.then_with(|| a.id.cmp(&b.id));

	match order {
		Order::Asc => ordering,
		Order::Desc => ordering.reverse(),
	}
}

fn words(text: &str) -> BTreeSet<String> {
	text.split(|c: char| !c.is_alphanumeric())
		.filter(|word| !word.is_empty())
		.map(str::to_lowercase)
		.collect()
}

#[axum::async_trait]
impl Store for MemoryStore {
	async fn create_user(&self, user: &User) -> Result<()> {
		let mut inner = self.lock();

		if inner.users.iter().any(|u| u.email == user.email) {
			return Err(Error::Duplicate("user"));
		}

		inner.users.push(user.clone());
		Ok(())
	}

	async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
		Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
	}

	async fn delete_token(&self, token: &str) -> Result<bool> {
		let mut inner = self.lock();
		let before = inner.tokens.len();

		inner.tokens.retain(|t| t != token);
		Ok(inner.tokens.len() != before)
	}

	async fn recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
		let mut recipes = self.lock().recipes.clone();

		recipes.sort_by(|a, b| compare(a, b, query.sort, query.order));

		Ok(recipes
			.into_iter()
			.skip(usize::try_from(query.offset).unwrap_or(0))
			.take(usize::try_from(query.limit).unwrap_or(0))
			.collect())
	}

	async fn recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
		Ok(self.lock().recipes.iter().find(|r| r.id == id).cloned())
	}

	async fn update_description(&self, id: Uuid, description: &str) -> Result<Option<Recipe>> {
		let mut inner = self.lock();
		let Some(recipe) = inner.recipes.iter_mut().find(|r| r.id == id) else {
			return Ok(None);
		};

		description.clone_into(&mut recipe.description);
		Ok(Some(recipe.clone()))
	}

	async fn recipes_with_max_steps(&self, steps: i32) -> Result<Vec<Recipe>> {
		let steps = usize::try_from(steps).unwrap_or(0);

		Ok(self.newest_first(|r| r.instructions.len() <= steps))
	}

	async fn set_rating(&self, id: Uuid, average: f64, count: i64) -> Result<()> {
		if let Some(recipe) = self.lock().recipes.iter_mut().find(|r| r.id == id) {
			recipe.average_rating = average;
			recipe.review_count = count;
		}

		Ok(())
	}

	async fn categories(&self) -> Result<Vec<String>> {
		let categories = self
			.lock()
			.recipes
			.iter()
			.map(|r| r.category.clone())
			.collect::<BTreeSet<_>>();

		Ok(categories.into_iter().collect())
	}

	async fn tags(&self) -> Result<Vec<String>> {
		let tags = self
			.lock()
			.recipes
			.iter()
			.flat_map(|r| r.tags.iter().cloned())
			.collect::<BTreeSet<_>>();

		Ok(tags.into_iter().collect())
	}

	async fn ingredients(&self) -> Result<Vec<String>> {
		let names = self
			.lock()
			.recipes
			.iter()
			.flat_map(|r| r.ingredients.keys().cloned())
			.collect::<BTreeSet<_>>();

		Ok(names.into_iter().collect())
	}

	async fn recipes_in_category(&self, category: &str) -> Result<Vec<Recipe>> {
		Ok(self.newest_first(|r| r.category == category))
	}

	async fn recipes_with_tags(&self, tags: &[String], mode: Match) -> Result<Vec<Recipe>> {
		Ok(self.newest_first(|r| match mode {
			Match::All => tags.iter().all(|tag| r.tags.contains(tag)),
			Match::Any => tags.iter().any(|tag| r.tags.contains(tag)),
		}))
	}

	async fn recipes_with_ingredients(
		&self,
		names: &[String],
		mode: Match,
	) -> Result<Vec<Recipe>> {
		Ok(self.newest_first(|r| match mode {
			Match::All => names.iter().all(|name| r.ingredients.contains_key(name)),
			Match::Any => names.iter().any(|name| r.ingredients.contains_key(name)),
		}))
	}

	async fn search_text(&self, term: &str) -> Result<Vec<Recipe>> {
		let wanted = words(term);

		if wanted.is_empty() {
			return Ok(Vec::new());
		}

		Ok(self.newest_first(|r| {
			let text = words(&format!("{} {}", r.title, r.description));

			wanted.is_subset(&text)
		}))
	}

	async fn search_title(&self, term: &str) -> Result<Vec<Recipe>> {
		let term = term.to_lowercase();

		Ok(self.newest_first(|r| r.title.to_lowercase().contains(&term)))
	}

	async fn reviews(&self, recipe_id: Uuid) -> Result<Vec<Review>> {
		let mut reviews = self
			.lock()
			.reviews
			.iter()
			.filter(|r| r.recipe_id == recipe_id)
			.cloned()
			.collect::<Vec<_>>();

		reviews.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
		Ok(reviews)
	}

	async fn create_review(&self, review: &Review) -> Result<()> {
		self.lock().reviews.push(review.clone());
		Ok(())
	}

	async fn update_review(
		&self,
		recipe_id: Uuid,
		review_id: Uuid,
		change: &ReviewChange,
	) -> Result<Option<Review>> {
		let mut inner = self.lock();
		let Some(review) = inner
			.reviews
			.iter_mut()
			.find(|r| r.id == review_id && r.recipe_id == recipe_id)
		else {
			return Ok(None);
		};

		if let Some(rating) = change.rating {
			review.rating = rating;
		}

		if let Some(text) = &change.review {
			text.clone_into(&mut review.review);
		}

		review.updated_at = Some(chrono::Utc::now());
		Ok(Some(review.clone()))
	}

	async fn delete_review(&self, recipe_id: Uuid, review_id: Uuid) -> Result<bool> {
		let mut inner = self.lock();
		let before = inner.reviews.len();

		inner
			.reviews
			.retain(|r| !(r.id == review_id && r.recipe_id == recipe_id));

		Ok(inner.reviews.len() != before)
	}

	async fn add_favourite(&self, user_email: &str, recipe_id: Uuid) -> Result<Favourite> {
		let mut inner = self.lock();

		if inner
			.favourites
			.iter()
			.any(|f| f.user_email == user_email && f.recipe_id == recipe_id)
		{
			return Err(Error::Duplicate("favourite"));
		}

		let favourite = Favourite {
			user_email: user_email.to_owned(),
			recipe_id,
			created_at: chrono::Utc::now(),
		};

		inner.favourites.push(favourite.clone());
		Ok(favourite)
	}

	async fn remove_favourite(&self, user_email: &str, recipe_id: Uuid) -> Result<bool> {
		let mut inner = self.lock();
		let before = inner.favourites.len();

		inner
			.favourites
			.retain(|f| !(f.user_email == user_email && f.recipe_id == recipe_id));

		Ok(inner.favourites.len() != before)
	}

	async fn favourite_recipes(&self, user_email: &str) -> Result<Vec<Recipe>> {
		let inner = self.lock();

		// Insertion order is favourite order, so walk it backwards.
		Ok(inner
			.favourites
			.iter()
			.rev()
			.filter(|f| f.user_email == user_email)
			.filter_map(|f| inner.recipes.iter().find(|r| r.id == f.recipe_id))
			.cloned()
			.collect())
	}

	async fn shopping_list(&self, user_id: &str) -> Result<Option<ShoppingList>> {
		Ok(self
			.lock()
			.shopping_lists
			.iter()
			.find(|l| l.user_id == user_id)
			.cloned())
	}

	async fn create_shopping_list(&self, list: &ShoppingList) -> Result<()> {
		let mut inner = self.lock();

		if inner.shopping_lists.iter().any(|l| l.user_id == list.user_id) {
			return Err(Error::Duplicate("shopping list"));
		}

		inner.shopping_lists.push(list.clone());
		Ok(())
	}

	async fn replace_shopping_items(
		&self,
		user_id: &str,
		items: &[ShoppingItem],
	) -> Result<Option<ShoppingList>> {
		let mut inner = self.lock();
		let Some(list) = inner.shopping_lists.iter_mut().find(|l| l.user_id == user_id) else {
			return Ok(None);
		};

		list.items = items.to_vec();
		list.updated_at = chrono::Utc::now();
		Ok(Some(list.clone()))
	}
}
