use std::io;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

/// Held for the life of the process; dropping it loses buffered file output.
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Gateway and TLS crates log every heartbeat at `info`.
const QUIET_DEPENDENCIES: &str = "serenity=warn,rustls=warn,tungstenite=warn,hyper=warn";

/// Console plus `{logs_dir}/{process}.log.<date>`. Each bot passes its own
/// process name so the two can share one logs directory. Later calls are
/// no-ops.
pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths, process: &str) -> Result<()> {
    FILE_GUARD.get_or_try_init::<_, anyhow::Error>(|| {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = build_filter(rust_log.as_deref(), &config.logging.level);

        let file_name = format!("{process}.log");
        let (file_writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(&paths.logs_dir, &file_name));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stdout))
            .with(fmt::layer().with_ansi(false).with_writer(file_writer))
            .try_init()?;

        tracing::info!(
            target: "lifecycle",
            process,
            file = %paths.logs_dir.join(&file_name).display(),
            "logging ready"
        );
        Ok(guard)
    })?;
    Ok(())
}

/// `RUST_LOG` wins outright. Otherwise the configured level applies, falling
/// back to `info` when it does not parse, with chatty dependencies held at
/// `warn`.
fn build_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    if let Some(filter) = rust_log.and_then(|raw| EnvFilter::try_new(raw).ok()) {
        return filter;
    }
    EnvFilter::try_new(format!("{level},{QUIET_DEPENDENCIES}"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_DEPENDENCIES}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_keeps_gateway_quiet() {
        let filter = build_filter(None, "debug").to_string();
        assert!(filter.contains("debug"));
        assert!(filter.contains("serenity=warn"));
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let filter = build_filter(Some("ducs_bots=trace"), "debug").to_string();
        assert_eq!(filter, "ducs_bots=trace");
    }
}
