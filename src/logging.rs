use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Build the subscriber used by [`init`]. In debug mode `RUST_LOG` may
/// override the default `debug` level; otherwise the level is forced to
/// `info`.
///
/// When `log_file` is set, output goes to that file instead of stderr.
pub fn subscriber(debug: bool, log_file: Option<PathBuf>) -> Box<dyn Subscriber + Send + Sync> {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dashboard.log"));
            let appender = tracing_appender::rolling::never(dir, file_name);
            Box::new(builder.with_ansi(false).with_writer(appender).finish())
        }
        None => Box::new(builder.finish()),
    }
}

/// Install the subscriber globally. Later calls are ignored.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let _ = tracing::subscriber::set_global_default(subscriber(debug, log_file));
}
