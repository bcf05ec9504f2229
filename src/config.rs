use std::env;
use std::time::Duration;

use dotenvy::dotenv;

pub const DEFAULT_REPORT_MONTHS: &str = "2025-12,2026-01,2026-02";

pub struct Config {
    pub feed_base_url: String,
    pub poll_interval: Duration,
    pub report_months: Vec<String>,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();

        let feed_base_url = env::var("FEED_BASE_URL").expect("Missing FEED_BASE_URL");

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let report_months = env::var("REPORT_MONTHS")
            .unwrap_or_else(|_| DEFAULT_REPORT_MONTHS.to_string())
            .split(',')
            .map(|month| month.trim().to_string())
            .filter(|month| !month.is_empty())
            .collect();

        Config {
            feed_base_url,
            poll_interval: Duration::from_secs(poll_interval_secs),
            report_months,
        }
    }
}
