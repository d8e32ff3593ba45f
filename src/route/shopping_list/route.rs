use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Query},
	model::ShoppingList,
	openapi::tag,
	route::Success,
	store, AppState,
};

use super::{list, model, Error};

/// Get shopping list
#[route(tag = tag::SHOPPING_LIST, response(status = 404, description = "The user has no shopping list."))]
pub async fn get_shopping_list(
	State(state): State<AppState>,
	Query(input): Query<model::ListOwnerInput>,
) -> Result<Json<Success<ShoppingList>>, crate::Error> {
	let list = state
		.database
		.shopping_list(&input.user_id)
		.await?
		.ok_or(Error::UnknownList)?;

	Ok(Success::json(list))
}

/// Create shopping list
/// Creates the user's shopping list. Each user has at most one.
#[route(tag = tag::SHOPPING_LIST, response(status = 201, description = "Shopping list created.", shape = "Json<Success<ShoppingList>>"), response(status = 409, description = "The user already has a shopping list."))]
pub async fn create_shopping_list(
	State(state): State<AppState>,
	Json(input): Json<model::CreateListInput>,
) -> Result<impl IntoApiResponse, crate::Error> {
	let now = chrono::Utc::now();
	let list = ShoppingList {
		user_id: input.user_id,
		items: list::normalize(input.items),
		created_at: now,
		updated_at: now,
	};

	state
		.database
		.create_shopping_list(&list)
		.await
		.map_err(|e| match e {
			store::Error::Duplicate(..) => crate::Error::from(Error::AlreadyExists),
			e => e.into(),
		})?;

	Ok((StatusCode::CREATED, Success::json(list)).into_response())
}

/// Update shopping list
/// Replaces the items, appends new ones with `append`, or changes purchased flags with `markPurchased`.
#[route(tag = tag::SHOPPING_LIST, response(status = 404, description = "The user has no shopping list."))]
pub async fn update_shopping_list(
	State(state): State<AppState>,
	Json(input): Json<model::UpdateListInput>,
) -> Result<Json<Success<ShoppingList>>, crate::Error> {
	if input.append && input.mark_purchased {
		return Err(Error::ConflictingModes.into());
	}

	let current = state
		.database
		.shopping_list(&input.user_id)
		.await?
		.ok_or(Error::UnknownList)?;

	let items = if input.append {
		let mut items = current.items;

		list::append(&mut items, list::normalize(input.items));
		items
	} else if input.mark_purchased {
		let mut items = current.items;
		let changed = list::mark_purchased(&mut items, &input.items);

		tracing::debug!(user = %input.user_id, changed, "purchased flags updated");
		items
	} else {
		list::normalize(input.items)
	};

	let list = state
		.database
		.replace_shopping_items(&input.user_id, &items)
		.await?
		.ok_or(Error::UnknownList)?;

	Ok(Success::json(list))
}
