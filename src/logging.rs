use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "tender_ledger=debug,tower_http=debug,info",
        Environment::Staging => "tender_ledger=debug,tower_http=info,info",
        Environment::Prod => "tender_ledger=info,tower_http=info,warn",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the per-environment
/// defaults.
pub fn init_logging(env: &Environment) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    // Use JSON format in production, pretty format elsewhere
    if env.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init()
            .context("failed to install JSON log subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .try_init()
            .context("failed to install log subscriber")?;
    }

    tracing::info!("Logging initialized for {:?} environment", env);
    Ok(())
}
