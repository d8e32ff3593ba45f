#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod middleware;
mod model;
mod openapi;
mod ratelimit;
mod route;
mod session;
mod store;
mod token;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use argon2::Argon2;
use axum::http::{header, HeaderValue, Method};
use tower_governor::GovernorLayer;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

pub use error::Error;

use crate::{
	config::Config,
	route::review::aggregate::RatingLocks,
	store::{postgres::PgStore, Store},
	token::TokenService,
};

pub type Database = Arc<dyn Store>;

/// The shared application state.
///
/// This contains every shared dependency that handlers need to access,
/// such as the store, the hash configuration and the token signer.
#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub tokens: TokenService,
	/// Serialises rating recomputes per recipe.
	pub ratings: Arc<RatingLocks>,
	pub config: Arc<Config>,
}

impl AppState {
	pub fn new(database: Database, config: Config) -> Self {
		Self {
			database,
			hasher: Argon2::default(),
			tokens: TokenService::new(&config.jwt_secret),
			ratings: Arc::new(RatingLocks::default()),
			config: Arc::new(config),
		}
	}
}

fn cors(config: &Config) -> CorsLayer {
	let cors = CorsLayer::new()
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
		.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

	match config
		.base_url
		.as_deref()
		.and_then(|url| HeaderValue::from_str(url.trim_end_matches('/')).ok())
	{
		Some(origin) => cors.allow_origin(origin).allow_credentials(true),
		None => cors,
	}
}

#[tokio::main]
async fn main() {
	let config = Config::from_env().expect("invalid configuration");

	config.environment.install();
	trace::init_tracing_subscriber(config.log_level, !config.environment.is_production());

	let store = PgStore::connect_lazy(&config.database_url, config.max_connections)
		.expect("invalid DATABASE_URL");

	store.migrate().await.expect("failed to run migrations");

	let address = SocketAddr::new(config.host, config.port);
	let ratelimit = ratelimit::per_peer(config.rate_limit).expect("invalid rate limit configuration");

	ratelimit::spawn_cleanup(&ratelimit);

	let cors = cors(&config);
	let app = route::app(AppState::new(Arc::new(store), config))
		.layer(GovernorLayer { config: ratelimit })
		.layer(CompressionLayer::new())
		.layer(cors);

	let listener = tokio::net::TcpListener::bind(address)
		.await
		.expect("failed to bind to address");

	tracing::info!(%address, "listening");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.expect("server error");
}
