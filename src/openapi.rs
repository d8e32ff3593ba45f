use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error::ErrorResponse, extract::Json, session};

pub const SECURITY_SCHEME_BEARER: &str = "Bearer";
pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const RECIPE: &str = "Recipe";
	pub const REVIEW: &str = "Review";
	pub const FAVOURITE: &str = "Favourite";
	pub const SHOPPING_LIST: &str = "Shopping list";
	pub const BROWSE: &str = "Browse";
}

fn tag(name: &str, description: &str) -> Tag {
	Tag {
		name: name.into(),
		description: Some(description.into()),
		..Default::default()
	}
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Recipe Box API")
		.summary("Recipes, reviews, favourites and shopping lists")
		.description(include_str!("../README.md"))
		.tag(tag(tag::AUTH, "Signup, login and sessions"))
		.tag(tag(tag::RECIPE, "Recipe listing and editing"))
		.tag(tag(tag::REVIEW, "Recipe reviews and ratings"))
		.tag(tag(tag::FAVOURITE, "Bookmarked recipes"))
		.tag(tag(tag::SHOPPING_LIST, "Per-user shopping lists"))
		.tag(tag(tag::BROWSE, "Categories, tags, ingredients and search"))
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("JWT".into()),
				description: Some("A session token".into()),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("The session cookie set at login".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<ErrorResponse>, _>(|res| {
			res.example(ErrorResponse::new("error message").errors(vec!["field: problem".into()]))
		})
}
