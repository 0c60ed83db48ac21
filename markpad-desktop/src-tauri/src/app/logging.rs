use markpad_core::config::{DEFAULT_LOG_FILTER, EditorConfig};
use markpad_infrastructure::MarkpadPaths;
use markpad_infrastructure::config_service::ENV_LOG;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: stderr plus a daily rolling file.
///
/// The returned guard flushes the file writer and must live as long as the
/// application. Without a logs directory only stderr is used.
pub fn init_logging(config: &EditorConfig) -> Option<WorkerGuard> {
    let filter = if std::env::var_os(ENV_LOG).is_some() {
        EnvFilter::try_new(&config.log_filter)
    } else {
        EnvFilter::try_from_default_env()
    }
    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let logs_dir = match MarkpadPaths::logs_dir() {
        Ok(dir) => dir,
        Err(e) => {
            registry.init();
            tracing::warn!("[Logging] File logging disabled: {}", e);
            return None;
        }
    };

    let appender = tracing_appender::rolling::daily(&logs_dir, "markpad.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    tracing::info!("[Logging] Writing logs to {:?}", logs_dir);
    Some(guard)
}
