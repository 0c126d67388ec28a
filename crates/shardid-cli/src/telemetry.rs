//! Log output for the CLI.
//!
//! Events go to stderr so that stdout carries only IDs and shard listings.
//! Verbosity follows `RUST_LOG` and defaults to `info`; library spans from
//! `shardid` show up at `trace`, e.g. `RUST_LOG=shardid=trace`.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;
    Ok(())
}
