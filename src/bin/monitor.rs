use branch_sales_monitor::config;
use branch_sales_monitor::feed::HttpFeed;
use branch_sales_monitor::logging;
use branch_sales_monitor::sink::LogSink;
use branch_sales_monitor::sync::SyncEngine;

use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {e}");
        return Err(e);
    }

    // Load configuration
    let cfg = config::Config::load();
    info!(
        feed_base_url = %cfg.feed_base_url,
        poll_interval = ?cfg.poll_interval,
        "Configuration loaded and logging initialized"
    );

    let feed = HttpFeed::new(&cfg);
    let mut engine = SyncEngine::new(feed, LogSink, cfg.report_months);

    // Live subscriptions first, then the one-shot load so the first render
    // never waits on the poll cadence.
    engine.start_subscriptions();
    engine.initial_load().await;

    engine.run().await;

    Ok(())
}
