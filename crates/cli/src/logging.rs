//! Installs the process-wide `tracing` subscriber. `RUST_LOG` controls
//! verbosity via `EnvFilter`; `--log-format` chooses the pretty or JSON
//! formatter, mirroring the daemon's `tracing-subscriber` setup.

use crate::settings::LogFormat;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
