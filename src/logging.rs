// Centralized logging setup: runtime log levels from env, pretty console
// output, optional structured JSON file output.
use std::env;
use std::fs;
use std::sync::OnceLock;

use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

pub fn init_logging(service: String) -> eyre::Result<()> {
    // Log levels for console and file come from env; everything outside this
    // crate is capped at warn.
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    let env_filter_console =
        EnvFilter::try_new(format!("warn,branch_sales_monitor={console_log_level}"))
            .unwrap_or_else(|_| EnvFilter::new("branch_sales_monitor=info"));

    let console_layer = fmt::Layer::new().pretty().with_filter(env_filter_console);

    if log_to_file {
        let env_filter_file =
            EnvFilter::try_new(format!("warn,branch_sales_monitor={file_log_level}"))
                .unwrap_or_else(|_| EnvFilter::new("branch_sales_monitor=info"));

        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir)?;
        let file_appender = tracing_appender::rolling::never(log_dir, format!("{service}.log"));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok(); // Keep the guard alive for the process lifetime

        // File layer: structured JSON logs with UTC timestamps
        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(env_filter_file);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry().with(console_layer).init();
    }

    Ok(())
}
