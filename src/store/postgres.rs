use std::collections::BTreeMap;

use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{Error, Match, RecipeQuery, Result, ReviewChange, Store};
use crate::model::{Favourite, Measure, Recipe, Review, ShoppingItem, ShoppingList, User};

const RECIPE_COLUMNS: &str = r#"
	recipe.id, recipe.title, recipe.description, recipe.category, recipe.tags,
	recipe.ingredients, recipe.instructions, recipe.prep_time, recipe.cook_time,
	recipe.servings, recipe.images, recipe.average_rating, recipe.review_count,
	recipe.created_at
"#;

const REVIEW_COLUMNS: &str = "id, recipe_id, username, rating, body, created_at, updated_at";

/// A [`Store`] backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	/// Builds the pool without opening a connection. The first query
	/// establishes it, and every later one reuses the pool.
	pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(max_connections)
			.connect_lazy(url)?;

		Ok(Self::new(pool))
	}

	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	/// Applies the migrations embedded from `./migrations`.
	pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
		sqlx::migrate!("./migrations").run(&self.pool).await
	}

	async fn fetch_recipes<'q>(
		&self,
		query: sqlx::query::QueryAs<'q, sqlx::Postgres, RecipeRecord, sqlx::postgres::PgArguments>,
	) -> Result<Vec<Recipe>> {
		let records = query.fetch_all(&self.pool).await?;

		Ok(records.into_iter().map(Recipe::from).collect())
	}
}

#[derive(FromRow)]
struct UserRecord {
	id: Uuid,
	email: String,
	password: Vec<u8>,
	created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRecord> for User {
	fn from(record: UserRecord) -> Self {
		Self {
			id: record.id,
			email: record.email,
			password: record.password,
			created_at: record.created_at,
		}
	}
}

#[derive(FromRow)]
struct RecipeRecord {
	id: Uuid,
	title: String,
	description: String,
	category: String,
	tags: Vec<String>,
	ingredients: Json<BTreeMap<String, Measure>>,
	instructions: Vec<String>,
	prep_time: i32,
	cook_time: i32,
	servings: i32,
	images: Vec<String>,
	average_rating: f64,
	review_count: i64,
	created_at: chrono::DateTime<chrono::Utc>,
}

impl From<RecipeRecord> for Recipe {
	fn from(record: RecipeRecord) -> Self {
		Self {
			id: record.id,
			title: record.title,
			description: record.description,
			category: record.category,
			tags: record.tags,
			ingredients: record.ingredients.0,
			instructions: record.instructions,
			prep_time: record.prep_time,
			cook_time: record.cook_time,
			servings: record.servings,
			images: record.images,
			average_rating: record.average_rating,
			review_count: record.review_count,
			created_at: record.created_at,
		}
	}
}

#[derive(FromRow)]
struct ReviewRecord {
	id: Uuid,
	recipe_id: Uuid,
	username: String,
	rating: i16,
	body: String,
	created_at: chrono::DateTime<chrono::Utc>,
	updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<ReviewRecord> for Review {
	fn from(record: ReviewRecord) -> Self {
		Self {
			id: record.id,
			recipe_id: record.recipe_id,
			username: record.username,
			rating: record.rating,
			review: record.body,
			date: record.created_at,
			updated_at: record.updated_at,
		}
	}
}

#[derive(FromRow)]
struct ShoppingListRecord {
	user_id: String,
	items: Json<Vec<ShoppingItem>>,
	created_at: chrono::DateTime<chrono::Utc>,
	updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ShoppingListRecord> for ShoppingList {
	fn from(record: ShoppingListRecord) -> Self {
		Self {
			user_id: record.user_id,
			items: record.items.0,
			created_at: record.created_at,
			updated_at: record.updated_at,
		}
	}
}

/// Maps a violation of the named unique constraint to [`Error::Duplicate`].
fn duplicate_on(
	constraint: &'static str,
	resource: &'static str,
) -> impl FnOnce(sqlx::Error) -> Error {
	move |error| match error {
		sqlx::Error::Database(ref d) if d.constraint() == Some(constraint) => {
			Error::Duplicate(resource)
		}
		e => Error::Database(e),
	}
}

/// Escapes `LIKE` wildcards so the term is matched literally.
fn escape_like(term: &str) -> String {
	let mut escaped = String::with_capacity(term.len());

	for c in term.chars() {
		if matches!(c, '\\' | '%' | '_') {
			escaped.push('\\');
		}

		escaped.push(c);
	}

	escaped
}

#[axum::async_trait]
impl Store for PgStore {
	async fn create_user(&self, user: &User) -> Result<()> {
		sqlx::query(
			r#"
				INSERT INTO "user" (id, email, password, created_at) VALUES ($1, $2, $3, $4)
			"#,
		)
		.bind(user.id)
		.bind(&user.email)
		.bind(&user.password)
		.bind(user.created_at)
		.execute(&self.pool)
		.await
		.map_err(duplicate_on("user_email_key", "user"))?;

		Ok(())
	}

	async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, UserRecord>(
			r#"SELECT id, email, password, created_at FROM "user" WHERE email = $1"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		Ok(user.map(User::from))
	}

	async fn delete_token(&self, token: &str) -> Result<bool> {
		let status = sqlx::query("DELETE FROM auth_token WHERE token = $1")
			.bind(token)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
		// Both the column and the direction come from closed enums.
		let sql = format!(
			"SELECT {RECIPE_COLUMNS} FROM recipe ORDER BY {column} {order}, id {order} LIMIT $1 OFFSET $2",
			column = query.sort.column(),
			order = query.order.keyword(),
		);

		self.fetch_recipes(
			sqlx::query_as(&sql)
				.bind(query.limit)
				.bind(query.offset),
		)
		.await
	}

	async fn recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
		let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipe WHERE id = $1");
		let recipe = sqlx::query_as::<_, RecipeRecord>(&sql)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(recipe.map(Recipe::from))
	}

	async fn update_description(&self, id: Uuid, description: &str) -> Result<Option<Recipe>> {
		let sql = format!(
			"UPDATE recipe SET description = $1 WHERE id = $2 RETURNING {RECIPE_COLUMNS}"
		);
		let recipe = sqlx::query_as::<_, RecipeRecord>(&sql)
			.bind(description)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(recipe.map(Recipe::from))
	}

	async fn recipes_with_max_steps(&self, steps: i32) -> Result<Vec<Recipe>> {
		let sql = format!(
			r#"
				SELECT {RECIPE_COLUMNS} FROM recipe
				WHERE cardinality(instructions) <= $1
				ORDER BY created_at DESC, id DESC
			"#
		);

		self.fetch_recipes(sqlx::query_as(&sql).bind(steps)).await
	}

	async fn set_rating(&self, id: Uuid, average: f64, count: i64) -> Result<()> {
		sqlx::query("UPDATE recipe SET average_rating = $1, review_count = $2 WHERE id = $3")
			.bind(average)
			.bind(count)
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn categories(&self) -> Result<Vec<String>> {
		let categories =
			sqlx::query_scalar("SELECT DISTINCT category FROM recipe ORDER BY category")
				.fetch_all(&self.pool)
				.await?;

		Ok(categories)
	}

	async fn tags(&self) -> Result<Vec<String>> {
		let tags = sqlx::query_scalar(
			"SELECT DISTINCT tag FROM recipe, unnest(recipe.tags) AS tag ORDER BY tag",
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(tags)
	}

	async fn ingredients(&self) -> Result<Vec<String>> {
		let names = sqlx::query_scalar(
			r#"
				SELECT DISTINCT name FROM recipe, jsonb_object_keys(recipe.ingredients) AS name
				ORDER BY name
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(names)
	}

	async fn recipes_in_category(&self, category: &str) -> Result<Vec<Recipe>> {
		let sql = format!(
			r#"
				SELECT {RECIPE_COLUMNS} FROM recipe
				WHERE category = $1
				ORDER BY created_at DESC, id DESC
			"#
		);

		self.fetch_recipes(sqlx::query_as(&sql).bind(category)).await
	}

	async fn recipes_with_tags(&self, tags: &[String], mode: Match) -> Result<Vec<Recipe>> {
		let operator = match mode {
			Match::All => "@>",
			Match::Any => "&&",
		};
		let sql = format!(
			r#"
				SELECT {RECIPE_COLUMNS} FROM recipe
				WHERE tags {operator} $1
				ORDER BY created_at DESC, id DESC
			"#
		);

		self.fetch_recipes(sqlx::query_as(&sql).bind(tags)).await
	}

	async fn recipes_with_ingredients(
		&self,
		names: &[String],
		mode: Match,
	) -> Result<Vec<Recipe>> {
		let operator = match mode {
			Match::All => "?&",
			Match::Any => "?|",
		};
		let sql = format!(
			r#"
				SELECT {RECIPE_COLUMNS} FROM recipe
				WHERE ingredients {operator} $1
				ORDER BY created_at DESC, id DESC
			"#
		);

		self.fetch_recipes(sqlx::query_as(&sql).bind(names)).await
	}

	async fn search_text(&self, term: &str) -> Result<Vec<Recipe>> {
		let sql = format!(
			r#"
				SELECT {RECIPE_COLUMNS} FROM recipe
				WHERE to_tsvector('english', title || ' ' || description)
					@@ plainto_tsquery('english', $1)
				ORDER BY ts_rank(
					to_tsvector('english', title || ' ' || description),
					plainto_tsquery('english', $1)
				) DESC, id
			"#
		);

		self.fetch_recipes(sqlx::query_as(&sql).bind(term)).await
	}

	async fn search_title(&self, term: &str) -> Result<Vec<Recipe>> {
		let sql = format!(
			r#"
				SELECT {RECIPE_COLUMNS} FROM recipe
				WHERE title ILIKE '%' || $1 || '%'
				ORDER BY created_at DESC, id DESC
			"#
		);

		self.fetch_recipes(sqlx::query_as(&sql).bind(escape_like(term)))
			.await
	}

	async fn reviews(&self, recipe_id: Uuid) -> Result<Vec<Review>> {
		let sql = format!(
			"SELECT {REVIEW_COLUMNS} FROM review WHERE recipe_id = $1 ORDER BY created_at DESC, id DESC"
		);
		let reviews = sqlx::query_as::<_, ReviewRecord>(&sql)
			.bind(recipe_id)
			.fetch_all(&self.pool)
			.await?;

		Ok(reviews.into_iter().map(Review::from).collect())
	}

	async fn create_review(&self, review: &Review) -> Result<()> {
		sqlx::query(
			r#"
				INSERT INTO review (id, recipe_id, username, rating, body, created_at)
				VALUES ($1, $2, $3, $4, $5, $6)
			"#,
		)
		.bind(review.id)
		.bind(review.recipe_id)
		.bind(&review.username)
		.bind(review.rating)
		.bind(&review.review)
		.bind(review.date)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn update_review(
		&self,
		recipe_id: Uuid,
		review_id: Uuid,
		change: &ReviewChange,
	) -> Result<Option<Review>> {
		let sql = format!(
			r#"
				UPDATE review
				SET rating = COALESCE($1, rating), body = COALESCE($2, body), updated_at = now()
				WHERE id = $3 AND recipe_id = $4
				RETURNING {REVIEW_COLUMNS}
			"#
		);
		let review = sqlx::query_as::<_, ReviewRecord>(&sql)
			.bind(change.rating)
			.bind(change.review.as_deref())
			.bind(review_id)
			.bind(recipe_id)
			.fetch_optional(&self.pool)
			.await?;

		Ok(review.map(Review::from))
	}

	async fn delete_review(&self, recipe_id: Uuid, review_id: Uuid) -> Result<bool> {
		let status = sqlx::query("DELETE FROM review WHERE id = $1 AND recipe_id = $2")
			.bind(review_id)
			.bind(recipe_id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn add_favourite(&self, user_email: &str, recipe_id: Uuid) -> Result<Favourite> {
		let (user_email, recipe_id, created_at): (String, Uuid, chrono::DateTime<chrono::Utc>) =
			sqlx::query_as(
			r#"
				INSERT INTO favourite (user_email, recipe_id) VALUES ($1, $2)
				RETURNING user_email, recipe_id, created_at
			"#,
		)
		.bind(user_email)
		.bind(recipe_id)
		.fetch_one(&self.pool)
		.await
		.map_err(duplicate_on("favourite_pkey", "favourite"))?;

		Ok(Favourite {
			user_email,
			recipe_id,
			created_at,
		})
	}

	async fn remove_favourite(&self, user_email: &str, recipe_id: Uuid) -> Result<bool> {
		let status = sqlx::query("DELETE FROM favourite WHERE user_email = $1 AND recipe_id = $2")
			.bind(user_email)
			.bind(recipe_id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn favourite_recipes(&self, user_email: &str) -> Result<Vec<Recipe>> {
		let sql = format!(
			r#"
				SELECT {RECIPE_COLUMNS} FROM recipe
				JOIN favourite ON favourite.recipe_id = recipe.id
				WHERE favourite.user_email = $1
				ORDER BY favourite.created_at DESC, recipe.id
			"#
		);

		self.fetch_recipes(sqlx::query_as(&sql).bind(user_email))
			.await
	}

	async fn shopping_list(&self, user_id: &str) -> Result<Option<ShoppingList>> {
		let list = sqlx::query_as::<_, ShoppingListRecord>(
			"SELECT user_id, items, created_at, updated_at FROM shopping_list WHERE user_id = $1",
		)
		.bind(user_id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(list.map(ShoppingList::from))
	}

	async fn create_shopping_list(&self, list: &ShoppingList) -> Result<()> {
		sqlx::query(
			r#"
				INSERT INTO shopping_list (user_id, items, created_at, updated_at)
				VALUES ($1, $2, $3, $4)
			"#,
		)
		.bind(&list.user_id)
		.bind(Json(&list.items))
		.bind(list.created_at)
		.bind(list.updated_at)
		.execute(&self.pool)
		.await
		.map_err(duplicate_on("shopping_list_pkey", "shopping list"))?;

		Ok(())
	}

	async fn replace_shopping_items(
		&self,
		user_id: &str,
		items: &[ShoppingItem],
	) -> Result<Option<ShoppingList>> {
		let list = sqlx::query_as::<_, ShoppingListRecord>(
			r#"
				UPDATE shopping_list SET items = $1, updated_at = now()
				WHERE user_id = $2
				RETURNING user_id, items, created_at, updated_at
			"#,
		)
		.bind(Json(items))
		.bind(user_id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(list.map(ShoppingList::from))
	}
}

#[cfg(test)]
mod test {
	use chrono::{Duration, TimeZone, Utc};

	use super::*;
	use crate::{
		route::review::aggregate::{self, RatingLocks},
		store::{Order, SortField},
		test::{ingredients, recipe_with},
	};

	async fn insert_recipe(pool: &PgPool, recipe: &Recipe) {
		sqlx::query(
			r#"
				INSERT INTO recipe (
					id, title, description, category, tags, ingredients, instructions,
					prep_time, cook_time, servings, images, average_rating, review_count, created_at
				)
				VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
			"#,
		)
		.bind(recipe.id)
		.bind(&recipe.title)
		.bind(&recipe.description)
		.bind(&recipe.category)
		.bind(&recipe.tags)
		.bind(Json(&recipe.ingredients))
		.bind(&recipe.instructions)
		.bind(recipe.prep_time)
		.bind(recipe.cook_time)
		.bind(recipe.servings)
		.bind(&recipe.images)
		.bind(recipe.average_rating)
		.bind(recipe.review_count)
		.bind(recipe.created_at)
		.execute(pool)
		.await
		.unwrap();
	}

	/// A soup tagged `vegan` and `quick`, and a cake tagged `quick`.
	async fn seed_pair(pool: &PgPool) -> (Recipe, Recipe) {
		let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
		let soup = recipe_with(|r| {
			r.title = "Tomato soup".into();
			r.description = "A warming bowl".into();
			r.category = "Soups".into();
			r.tags = vec!["vegan".into(), "quick".into()];
			r.ingredients = ingredients(&["tomato", "onion"]);
			r.created_at = start;
		});
		let cake = recipe_with(|r| {
			r.title = "Carrot cake, 100% spiced".into();
			r.description = "Sweet".into();
			r.category = "Desserts".into();
			r.tags = vec!["quick".into()];
			r.ingredients = ingredients(&["carrot", "flour"]);
			r.created_at = start + Duration::minutes(1);
		});

		insert_recipe(pool, &soup).await;
		insert_recipe(pool, &cake).await;

		(soup, cake)
	}

	fn ids(recipes: &[Recipe]) -> Vec<Uuid> {
		recipes.iter().map(|r| r.id).collect()
	}

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|v| (*v).to_owned()).collect()
	}

	#[test]
	fn test_escape_like() {
		assert_eq!(escape_like("pasta"), "pasta");
		assert_eq!(escape_like("100%"), "100\\%");
		assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
	}

	#[sqlx::test]
	async fn test_unique_violations_are_duplicates(pool: PgPool) {
		let store = PgStore::new(pool.clone());
		let (soup, _) = seed_pair(&pool).await;

		let user = User {
			id: Uuid::new_v4(),
			email: "a@b.com".into(),
			password: vec![0; 32],
			created_at: Utc::now(),
		};
		let twin = User {
			id: Uuid::new_v4(),
			..user.clone()
		};

		store.create_user(&user).await.unwrap();
		assert!(matches!(
			store.create_user(&twin).await,
			Err(Error::Duplicate("user"))
		));

		store.add_favourite("a@b.com", soup.id).await.unwrap();
		assert!(matches!(
			store.add_favourite("a@b.com", soup.id).await,
			Err(Error::Duplicate("favourite"))
		));

		let list = ShoppingList {
			user_id: "u1".into(),
			items: Vec::new(),
			created_at: Utc::now(),
			updated_at: Utc::now(),
		};

		store.create_shopping_list(&list).await.unwrap();
		assert!(matches!(
			store.create_shopping_list(&list).await,
			Err(Error::Duplicate("shopping list"))
		));
	}

	#[sqlx::test]
	async fn test_tag_and_ingredient_match_modes(pool: PgPool) {
		let store = PgStore::new(pool.clone());
		let (soup, cake) = seed_pair(&pool).await;

		let tags = strings(&["vegan", "quick"]);

		assert_eq!(
			ids(&store.recipes_with_tags(&tags, Match::Any).await.unwrap()),
			vec![cake.id, soup.id]
		);
		assert_eq!(
			ids(&store.recipes_with_tags(&tags, Match::All).await.unwrap()),
			vec![soup.id]
		);

		let names = strings(&["carrot", "onion"]);

		assert_eq!(
			store
				.recipes_with_ingredients(&names, Match::Any)
				.await
				.unwrap()
				.len(),
			2
		);
		assert!(store
			.recipes_with_ingredients(&names, Match::All)
			.await
			.unwrap()
			.is_empty());
		assert_eq!(
			ids(&store
				.recipes_with_ingredients(&strings(&["carrot", "flour"]), Match::All)
				.await
				.unwrap()),
			vec![cake.id]
		);

		assert_eq!(store.tags().await.unwrap(), strings(&["quick", "vegan"]));
		assert_eq!(
			store.categories().await.unwrap(),
			strings(&["Desserts", "Soups"])
		);
		assert_eq!(
			store.ingredients().await.unwrap(),
			strings(&["carrot", "flour", "onion", "tomato"])
		);
	}

	#[sqlx::test]
	async fn test_search_and_title_match(pool: PgPool) {
		let store = PgStore::new(pool.clone());
		let (soup, cake) = seed_pair(&pool).await;

		assert_eq!(ids(&store.search_text("warming").await.unwrap()), vec![soup.id]);
		assert!(store.search_text("carr").await.unwrap().is_empty());
		assert_eq!(ids(&store.search_title("CARR").await.unwrap()), vec![cake.id]);

		// Wildcards in the term are matched literally.
		assert_eq!(ids(&store.search_title("100%").await.unwrap()), vec![cake.id]);
		assert!(store.search_title("%soup").await.unwrap().is_empty());
	}

	#[sqlx::test]
	async fn test_sorting_and_pagination(pool: PgPool) {
		let store = PgStore::new(pool.clone());
		let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
		let mut recipes = Vec::new();

		for i in 0..5 {
			let recipe = recipe_with(|r| {
				r.title = format!("Recipe {i:02}");
				r.instructions = vec!["step".into(); i + 1];
				r.created_at = start + Duration::minutes(i64::try_from(i).unwrap());
			});

			insert_recipe(&pool, &recipe).await;
			recipes.push(recipe);
		}

		let page = store
			.recipes(&RecipeQuery {
				sort: SortField::CreatedAt,
				order: Order::Desc,
				limit: 2,
				offset: 2,
			})
			.await
			.unwrap();

		assert_eq!(ids(&page), vec![recipes[2].id, recipes[1].id]);

		let page = store
			.recipes(&RecipeQuery {
				sort: SortField::Title,
				order: Order::Asc,
				limit: 3,
				offset: 0,
			})
			.await
			.unwrap();

		assert_eq!(ids(&page), ids(&recipes[..3]));

		assert_eq!(
			ids(&store.recipes_with_max_steps(2).await.unwrap()),
			vec![recipes[1].id, recipes[0].id]
		);
	}

	#[sqlx::test]
	async fn test_partial_review_update_and_aggregate(pool: PgPool) {
		let store = PgStore::new(pool.clone());
		let (soup, _) = seed_pair(&pool).await;
		let locks = RatingLocks::default();

		let review = Review {
			id: Uuid::new_v4(),
			recipe_id: soup.id,
			username: "ana".into(),
			rating: 2,
			review: "Bland".into(),
			date: Utc::now(),
			updated_at: None,
		};

		store.create_review(&review).await.unwrap();

		let change = ReviewChange {
			rating: Some(4),
			review: None,
		};
		let updated = store
			.update_review(soup.id, review.id, &change)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.rating, 4);
		assert_eq!(updated.review, "Bland");
		assert!(updated.updated_at.is_some());

		// The review belongs to the soup only.
		assert!(store
			.update_review(Uuid::new_v4(), review.id, &change)
			.await
			.unwrap()
			.is_none());

		aggregate::recompute(&store, &locks, soup.id).await.unwrap();

		let soup = store.recipe(soup.id).await.unwrap().unwrap();

		assert_eq!((soup.average_rating, soup.review_count), (4.0, 1));
	}
}
