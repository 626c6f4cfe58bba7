use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::{constants::LOGS_DIR, utils::display_offset};

const LOG_FILE_NAME: &str = "depined-pinger.log";

/// Log timestamps in the same UTC+8 civil time the account table uses.
struct DisplayTimer;

impl FormatTime for DisplayTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now().with_timezone(&display_offset());
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Console plus daily rolling file output. Keep the guard alive for the life of
/// the process or buffered file lines are lost.
pub fn init_default_logger() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(LOGS_DIR, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_timer(DisplayTimer);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_timer(DisplayTimer);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}
