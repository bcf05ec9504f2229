use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, instrument, warn};

use crate::branch::Branch;
use crate::error::SyncError;
use crate::feed::{ChangeFeed, FeedEvent, FeedKind, Subscription, TargetConfigDoc};
use crate::sink::{DashboardView, PresentationSink};
use crate::stats::{
    BranchFilter, DEFAULT_RANKING_LIMIT, RankMetric, branch_detail, grand_stats, monthly_stats,
    rank,
};
use crate::store::BranchContext;

/// Keeps the in-memory projection in step with the change feed and pushes a
/// freshly computed view into the sink after every applied update.
///
/// All state lives in this struct and is only touched from the task driving
/// it: subscriptions deliver into one queue, and the queue is consumed
/// serially, so recomputation never races a feed callback.
pub struct SyncEngine<F, S> {
    feed: F,
    sink: S,
    ctx: BranchContext,
    report_months: Vec<String>,
    ranking_metric: RankMetric,
    ranking_filter: BranchFilter,
    ranking_limit: usize,
    subscriptions: Vec<Subscription>,
    events_tx: UnboundedSender<FeedEvent>,
    events_rx: UnboundedReceiver<FeedEvent>,
    last_synced_at: Option<DateTime<Utc>>,
}

impl<F: ChangeFeed, S: PresentationSink> SyncEngine<F, S> {
    pub fn new(feed: F, sink: S, report_months: Vec<String>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            feed,
            sink,
            ctx: BranchContext::new(),
            report_months,
            ranking_metric: RankMetric::Amount,
            ranking_filter: BranchFilter::All,
            ranking_limit: DEFAULT_RANKING_LIMIT,
            subscriptions: Vec::new(),
            events_tx,
            events_rx,
            last_synced_at: None,
        }
    }

    pub fn context(&self) -> &BranchContext {
        &self.ctx
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// Subscribe every branch for both data kinds. A branch whose
    /// subscription cannot be established is reported and skipped; the
    /// remaining branches still come live.
    #[instrument(skip(self))]
    pub fn start_subscriptions(&mut self) {
        for branch in Branch::ALL {
            // Targets before records, matching the bootstrap order.
            for kind in [FeedKind::Targets, FeedKind::Records] {
                match self.feed.subscribe(branch, kind, self.events_tx.clone()) {
                    Ok(subscription) => {
                        debug!(%branch, %kind, "subscription established");
                        self.subscriptions.push(subscription);
                    }
                    Err(e) => {
                        error!(%branch, %kind, error = %e, "failed to establish subscription");
                        self.sink.notify(&e.to_string(), true);
                    }
                }
            }
        }
        info!(count = self.subscriptions.len(), "live subscriptions started");
    }

    /// One-shot fallback load: fetch targets then records for every branch
    /// concurrently, waiting for all branches to settle before the first
    /// render. A branch that fails keeps its last-known snapshot (defaults
    /// or empty at startup) and is reported without blocking the others.
    #[instrument(skip(self))]
    pub async fn initial_load(&mut self) {
        let feed = &self.feed;
        let target_results = join_all(
            Branch::ALL.map(|branch| async move { (branch, feed.fetch_targets(branch).await) }),
        )
        .await;
        for (branch, result) in target_results {
            match result {
                Ok(docs) => {
                    self.apply_target_docs(branch, docs);
                }
                Err(e) => self.report_failure(&e),
            }
        }

        let feed = &self.feed;
        let record_results = join_all(
            Branch::ALL.map(|branch| async move { (branch, feed.fetch_records(branch).await) }),
        )
        .await;
        for (branch, result) in record_results {
            match result {
                Ok(records) => {
                    info!(%branch, count = records.len(), "records loaded");
                    self.ctx.records.set_records(branch, records);
                }
                Err(e) => self.report_failure(&e),
            }
        }

        self.touch();
        self.render();
        self.sink.notify("branch data loaded", false);
    }

    /// Manual refresh: re-run the fallback fetches against the live feed.
    pub async fn reload(&mut self) {
        self.sink.notify("reloading all branch data", false);
        self.initial_load().await;
    }

    /// Consume the event queue for the life of the engine. Each event is
    /// fully applied (and rendered) before the next one is looked at.
    pub async fn run(&mut self) {
        while let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    /// Apply every event already queued without waiting for more.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Change the ranking selection and re-render from the current snapshot.
    pub fn set_ranking(&mut self, metric: RankMetric, filter: BranchFilter) {
        self.ranking_metric = metric;
        self.ranking_filter = filter;
        self.render();
    }

    /// Tear down all live subscriptions, one at a time.
    pub fn shutdown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }

    fn handle_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::RecordsChanged { branch, records } => {
                info!(%branch, count = records.len(), "record snapshot received");
                self.ctx.records.set_records(branch, records);
                self.touch();
                self.render();
            }
            FeedEvent::TargetsChanged { branch, docs } => {
                if self.apply_target_docs(branch, docs) {
                    self.touch();
                    self.render();
                }
            }
            FeedEvent::StreamError {
                branch,
                kind,
                message,
            } => {
                // The subscription stays in place; manual reload recovers.
                let e = SyncError::Subscription {
                    branch,
                    kind,
                    message,
                };
                self.report_failure(&e);
            }
        }
    }

    /// Apply the first `salesTargets` document, if any. Returns whether the
    /// branch's targets changed. A missing document keeps the current
    /// mapping silently; a document without a usable payload keeps it with
    /// a warning.
    fn apply_target_docs(&mut self, branch: Branch, docs: Vec<TargetConfigDoc>) -> bool {
        let Some(doc) = docs.into_iter().find(TargetConfigDoc::is_sales_targets) else {
            debug!(%branch, "no target configuration found, keeping current targets");
            return false;
        };
        match doc.data {
            Some(targets) if !targets.is_empty() => {
                info!(%branch, count = targets.len(), "sales targets updated");
                self.ctx.targets.set_targets(branch, targets);
                true
            }
            _ => {
                warn!(%branch, "{}", SyncError::MalformedConfig { branch });
                false
            }
        }
    }

    fn report_failure(&mut self, e: &SyncError) {
        error!("{e}");
        self.sink.notify(&e.to_string(), true);
    }

    fn touch(&mut self) {
        self.last_synced_at = Some(Utc::now());
    }

    fn render(&mut self) {
        let view = build_view(
            &self.ctx,
            self.ranking_metric,
            self.ranking_filter,
            self.ranking_limit,
            &self.report_months,
            self.last_synced_at,
        );
        self.sink.render(&view);
    }
}

/// Recompute every derived view from one snapshot.
pub fn build_view(
    ctx: &BranchContext,
    metric: RankMetric,
    filter: BranchFilter,
    limit: usize,
    report_months: &[String],
    last_synced_at: Option<DateTime<Utc>>,
) -> DashboardView {
    DashboardView {
        grand: grand_stats(ctx),
        ranking: rank(ctx, metric, filter, limit),
        details: Branch::ALL
            .into_iter()
            .map(|branch| (branch, branch_detail(ctx, branch)))
            .collect(),
        monthly: monthly_stats(ctx, report_months),
        last_synced_at,
    }
}
