//! Log output.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or unreadable.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG`.
///
/// `log` records (the actix access log among them) are forwarded into the same
/// output. Calling this twice is harmless; the second call is reported and ignored.
///
/// ```text
/// RUST_LOG=debug                      everything at debug and above
/// RUST_LOG=info,userdesk_mongodb=debug  duplicate-key details from the store
/// ```
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        tracing::warn!(error = %e, "tracing init failed");
    }
}
