//! valsemc - command-line driver for value-semantics derivation.
//!
//! Reads a TOML class table, derives `equals`, `hashCode` and `toString`
//! for every marked class in parallel, prints the emitted IR and renders
//! diagnostics against the input file.

pub mod cli;
pub mod driver;
pub mod input;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=valsem_derive=debug`
/// or `RUST_LOG=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
