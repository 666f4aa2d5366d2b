//! JSON log bootstrap for hosts that want structured output.

use core::fmt;

use tracing_subscriber::EnvFilter;

/// Error from installing the global subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// A global subscriber was already set.
    AlreadyInstalled,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInstalled => write!(f, "a global tracing subscriber is already installed"),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install a JSON subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_json(default_filter: &str) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}
