use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{http::HeaderName, middleware, Extension, Router};
use tower_http::{
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{openapi, AppState};

pub mod auth;
pub mod browse;
pub mod docs;
pub mod favourite;
pub mod model;
pub mod pages;
pub mod recipe;
pub mod review;
pub mod shopping_list;

pub use model::Success;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the full application: the JSON API, its OpenAPI document, the
/// pages, and the session gate in front of all of them.
pub fn app(state: AppState) -> Router {
	let mut api = OpenApi::default();
	let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

	ApiRouter::new()
		.nest("/api/authorisation", auth::routes())
		.nest("/api/recipes", recipe::routes())
		.nest("/api/reviews", review::routes())
		.nest("/api/favourites", favourite::routes())
		.nest("/api/shoppingList", shopping_list::routes())
		.nest("/api", browse::routes())
		.nest("/docs", docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.merge(pages::routes())
		.layer(middleware::from_fn_with_state(
			state.clone(),
			crate::middleware::session_gate,
		))
		.layer(Extension(Arc::new(api)))
		.layer(TraceLayer::new_for_http())
		.layer(PropagateRequestIdLayer::new(request_id.clone()))
		.layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
		.with_state(state)
}
