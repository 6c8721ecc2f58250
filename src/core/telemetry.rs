use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Settings;

/// Console tracing for the API process. `LMS_LOG_JSON` switches to
/// line-delimited JSON for log shippers; `RUST_LOG` overrides the
/// configured level when set.
pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let telemetry = settings.telemetry();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(telemetry.log_level.clone()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(fmt::format::FmtSpan::CLOSE);

    let result = if telemetry.json { builder.json().try_init() } else { builder.try_init() };

    result.map_err(|err| anyhow::anyhow!("tracing init: {err}"))
}
