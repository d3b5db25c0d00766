//! # Telemetry
//!
//! Global `tracing` subscriber for the server and the CLI.

use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing() -> anyhow::Result<()> {
    let ansi = std::io::stdout().is_terminal();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi);

    Registry::default().with(filter).with(fmt_layer).try_init()?;
    Ok(())
}
