use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ItemInput {
	/// Stored trimmed and lower-cased.
	#[validate(length(min = 1, max = 200))]
	pub name: String,
	#[serde(default)]
	#[validate(length(max = 100))]
	pub quantity: String,
	pub purchased: Option<bool>,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListOwnerInput {
	#[validate(length(min = 1))]
	pub user_id: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListInput {
	#[validate(length(min = 1))]
	pub user_id: String,
	#[serde(default)]
	#[validate(nested)]
	pub items: Vec<ItemInput>,
}

/// Updates a list in one of three modes: replace the items (the default),
/// append new items, or change the purchased flags of existing items.
#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListInput {
	#[validate(length(min = 1))]
	pub user_id: String,
	#[validate(nested)]
	pub items: Vec<ItemInput>,
	#[serde(default)]
	pub append: bool,
	#[serde(default)]
	pub mark_purchased: bool,
}
