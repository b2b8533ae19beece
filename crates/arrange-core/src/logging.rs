use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor an explicit directive is given.
pub const DEFAULT_FILTER: &str = "info";

pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over `filter`.
///
/// Panics if a global subscriber is already installed; see [`try_init`].
pub fn init_with_filter(filter: &str) {
    tracing_subscriber::fmt().with_env_filter(env_filter(filter)).init();
}

/// Like [`init`] but returns `false` instead of panicking when a subscriber
/// already exists. Tests call this freely.
pub fn try_init() -> bool {
    try_init_with_filter(DEFAULT_FILTER)
}

pub fn try_init_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_test_writer()
        .try_init()
        .is_ok()
}

fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter))
}
