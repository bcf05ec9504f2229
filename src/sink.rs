use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::branch::Branch;
use crate::stats::{GrandStats, MonthlyStats, SalespersonStats};

/// Everything a sink needs to draw one full refresh of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub grand: GrandStats,
    pub ranking: Vec<SalespersonStats>,
    pub details: BTreeMap<Branch, Vec<SalespersonStats>>,
    pub monthly: Vec<MonthlyStats>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Consumer of engine output. `render` receives the recomputed view after
/// every applied update; `notify` carries transient user-facing status.
pub trait PresentationSink {
    fn render(&mut self, view: &DashboardView);
    fn notify(&mut self, message: &str, is_error: bool);
}

/// Sink that renders the dashboard as structured log output. Stands in for
/// a real display surface during headless runs.
pub struct LogSink;

impl PresentationSink for LogSink {
    fn render(&mut self, view: &DashboardView) {
        let mut lines = vec![format!(
            "總體 target {} achieved {} remaining {} progress {}%",
            view.grand.grand_total_target,
            view.grand.grand_total_achieved,
            view.grand.grand_total_remaining,
            view.grand.grand_progress_pct,
        )];
        for (branch, stats) in &view.grand.branches {
            lines.push(format!(
                "{}分行 target {} achieved {} progress {}%",
                branch.label(),
                stats.total_target,
                stats.total_achieved,
                stats.progress_pct,
            ));
        }
        for (position, entry) in view.ranking.iter().enumerate() {
            lines.push(format!(
                "#{} {} ({}分行) achieved {} progress {}%",
                position + 1,
                entry.name,
                entry.branch.label(),
                entry.achieved,
                entry.progress,
            ));
        }
        for month in &view.monthly {
            lines.push(format!(
                "{}: total {} finance {} insurance {}",
                month.month, month.total, month.finance, month.insurance,
            ));
        }

        info!(
            last_synced_at = ?view.last_synced_at,
            "Dashboard refreshed:\n{}",
            lines.join("\n")
        );
    }

    fn notify(&mut self, message: &str, is_error: bool) {
        if is_error {
            error!("{message}");
        } else {
            info!("{message}");
        }
    }
}
