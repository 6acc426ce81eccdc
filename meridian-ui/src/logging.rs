//! Tracing setup for binaries built on meridian.
//!
//! Library crates only emit `tracing` events; a binary opts in to output by
//! calling [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber.
///
/// `RUST_LOG` takes precedence when set. Otherwise `default_filter` is used,
/// falling back to `"error"` if it does not parse. Calling this more than once
/// keeps the first subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match EnvFilter::try_new(default_filter) {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_tracing("meridian_ui=debug");
        init_tracing("not a [valid filter");
        tracing::debug!("still logging");
    }
}
