use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::middleware::StateInformationMiddleware;
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::PeerIpKeyExtractor,
	GovernorError,
};

use crate::config::{ConfigError, RateLimit};

pub type Limiter = Arc<GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>>;

/// How often state for idle peers is dropped.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Builds the per-peer limiter. The period and burst must be non-zero.
pub fn per_peer(limit: RateLimit) -> Result<Limiter, ConfigError> {
	GovernorConfigBuilder::default()
		.per_second(limit.replenish_seconds)
		.burst_size(limit.burst)
		.use_headers()
		.error_handler(rejected)
		.finish()
		.map(Arc::new)
		.ok_or_else(|| {
			ConfigError::InvalidValue(
				"RATE_LIMIT_REPLENISH_SECONDS",
				"replenish period and burst must both be greater than zero".into(),
			)
		})
}

/// Rejections share the error envelope and carry the rate limit headers.
fn rejected(error: GovernorError) -> Response<Body> {
	crate::Error::from(error).into_response()
}

/// Drops limiter state for peers that have not been seen recently, for as
/// long as the runtime lives.
pub fn spawn_cleanup(limiter: &Limiter) {
	let limiter = limiter.limiter().clone();

	tokio::spawn(async move {
		let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

		loop {
			interval.tick().await;

			tracing::debug!(peers = limiter.len(), "pruning rate limit state");
			limiter.retain_recent();
		}
	});
}
