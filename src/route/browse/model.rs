use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{model::Recipe, store::Match};

/// Either the distinct values of a field, or the recipes matching a filter on it.
#[derive(Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Listing {
	Names(Vec<String>),
	Recipes(Vec<Recipe>),
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CategoryInput {
	/// Without this, the distinct categories are listed instead.
	#[validate(length(min = 1, max = 200))]
	pub category: Option<String>,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagsInput {
	/// Comma-separated tags. Without this, the distinct tags are listed instead.
	#[validate(length(max = 1000))]
	pub tags: Option<String>,
	/// Require every tag rather than any one.
	#[serde(default)]
	pub match_all: bool,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientsInput {
	/// Comma-separated ingredient names. Without this, the distinct ingredient names are listed instead.
	#[validate(length(max = 1000))]
	pub ingredients: Option<String>,
	/// Require every ingredient rather than any one.
	#[serde(default)]
	pub match_all: bool,
}

#[derive(Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
	#[validate(length(min = 1, max = 200))]
	pub search_term: String,
}

pub fn match_mode(all: bool) -> Match {
	if all {
		Match::All
	} else {
		Match::Any
	}
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_owned)
		.collect()
}
