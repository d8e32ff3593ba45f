//! Application configuration, loaded from the environment at startup.
//!
//! A `.env` file in the working directory is read first for local development.

use std::{net::IpAddr, sync::OnceLock};

use tracing::Level;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("missing the environment variable {0}")]
	MissingVar(&'static str),
	#[error("invalid value for the environment variable {0}: {1}")]
	InvalidValue(&'static str, String),
}

/// The deployment environment. Anything other than `production` is
/// treated as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
	Development,
	Production,
}

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

impl Environment {
	pub fn parse(value: &str) -> Self {
		if value.eq_ignore_ascii_case("production") {
			Self::Production
		} else {
			Self::Development
		}
	}

	pub fn is_production(self) -> bool {
		self == Self::Production
	}

	/// Records the environment for code that has no access to the
	/// application state, such as error responses. Only the first call wins.
	pub fn install(self) {
		ENVIRONMENT.get_or_init(|| self);
	}

	/// The installed environment, or production if none was installed
	/// so that error details are withheld by default.
	pub fn current() -> Self {
		ENVIRONMENT.get().copied().unwrap_or(Self::Production)
	}
}

#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	pub database_url: String,
	pub max_connections: u32,
	pub jwt_secret: String,
	pub environment: Environment,
	/// The site origin allowed to make credentialed cross-origin requests.
	pub base_url: Option<String>,
	/// Page paths that require a valid session cookie.
	pub protected_paths: Vec<String>,
	pub log_level: Level,
	pub rate_limit: RateLimit,
}

/// Each peer may make `burst` requests at once, and regains one every
/// `replenish_seconds`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
	pub replenish_seconds: u64,
	pub burst: u32,
}

pub const DEFAULT_PROTECTED_PATHS: &str = "/profile,/favourites,/shopping-list";

/// Reads the first of the given variables that is set.
fn var_any(names: &[&str]) -> Option<String> {
	names.iter().find_map(|name| std::env::var(name).ok())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
	T::Err: std::fmt::Display,
{
	match std::env::var(name) {
		Ok(value) => value
			.parse()
			.map_err(|e: T::Err| ConfigError::InvalidValue(name, e.to_string())),
		Err(_) => Ok(default),
	}
}

/// Splits a comma-separated path list, dropping empty entries and trailing slashes.
pub fn parse_paths(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|path| !path.is_empty())
		.map(|path| {
			let path = path.trim_end_matches('/');

			if path.is_empty() {
				"/".to_owned()
			} else {
				path.to_owned()
			}
		})
		.collect()
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();

		let database_url =
			std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
		let jwt_secret =
			std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

		if jwt_secret.is_empty() {
			return Err(ConfigError::InvalidValue(
				"JWT_SECRET",
				"must not be empty".into(),
			));
		}

		let environment = var_any(&["APP_ENV", "NODE_ENV"])
			.map_or(Environment::Development, |value| Environment::parse(&value));

		let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
		let log_level = log_level.parse::<Level>().map_err(|_| {
			ConfigError::InvalidValue("RUST_LOG", format!("'{log_level}' is not a valid log level"))
		})?;

		Ok(Self {
			host: parse_var("HOST", IpAddr::from([127, 0, 0, 1]))?,
			port: parse_var("PORT", 3000)?,
			database_url,
			max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
			jwt_secret,
			environment,
			base_url: var_any(&["BASE_URL", "NEXT_PUBLIC_BASE_URL"]).filter(|url| !url.is_empty()),
			protected_paths: parse_paths(
				&std::env::var("PROTECTED_PATHS").unwrap_or_else(|_| DEFAULT_PROTECTED_PATHS.into()),
			),
			log_level,
			rate_limit: RateLimit {
				replenish_seconds: parse_var("RATE_LIMIT_REPLENISH_SECONDS", 10)?,
				burst: parse_var("RATE_LIMIT_BURST", 50)?,
			},
		})
	}
}
