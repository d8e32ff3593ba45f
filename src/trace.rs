use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber, writing human-readable logs
/// to stdout at `level` and above.
pub fn init_tracing_subscriber(level: Level, ansi: bool) {
	tracing_subscriber::registry()
		.with(LevelFilter::from_level(level))
		.with(tracing_subscriber::fmt::layer().with_ansi(ansi))
		.init();
}
