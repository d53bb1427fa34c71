//! Pipeline progress logging.
//!
//! The library emits `tracing` events; the binary installs a stderr
//! subscriber with [`init_logging`]. The `log_*` helpers keep the pipeline's
//! step-by-step progress lines uniform.

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when `verbose`.
/// Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn log_info(msg: impl AsRef<str>) {
    info!("{}", msg.as_ref());
}

pub fn log_success(msg: impl AsRef<str>) {
    info!(status = "ok", "{}", msg.as_ref());
}

pub fn log_warning(msg: impl AsRef<str>) {
    warn!("{}", msg.as_ref());
}

pub fn log_error(msg: impl AsRef<str>) {
    error!("{}", msg.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging(false);
        init_logging(true);
        log_info("still logging");
        log_success(String::from("done"));
        log_warning("nothing matched");
        log_error("failed");
    }
}
