pub mod channel;
pub mod http;

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::branch::Branch;
use crate::error::SyncResult;
use crate::store::{CustomerRecord, SalesTargets};

pub use channel::ChannelFeed;
pub use http::HttpFeed;

/// The two independent per-branch data kinds the remote store publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeedKind {
    Records,
    Targets,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Records => f.write_str("records"),
            FeedKind::Targets => f.write_str("targets"),
        }
    }
}

/// Configuration document as stored remotely. Only documents whose `type`
/// is `salesTargets` carry target data; the first matching document per
/// branch wins if several exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfigDoc {
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub data: Option<SalesTargets>,
}

pub const SALES_TARGETS_DOC_TYPE: &str = "salesTargets";

impl TargetConfigDoc {
    pub fn is_sales_targets(&self) -> bool {
        self.doc_type == SALES_TARGETS_DOC_TYPE
    }
}

/// One push delivery. Snapshots are always the full current collection for
/// the branch; stream failures travel in-band so the consumer can report
/// them without tearing anything down.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    RecordsChanged {
        branch: Branch,
        records: Vec<CustomerRecord>,
    },
    TargetsChanged {
        branch: Branch,
        docs: Vec<TargetConfigDoc>,
    },
    StreamError {
        branch: Branch,
        kind: FeedKind,
        message: String,
    },
}

/// Handle for one live (branch, kind) subscription. Dropping or disposing
/// it cancels delivery for that subscription only.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn dispose(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Boundary to the remote live-updating store. Push subscriptions deliver
/// full snapshots into the caller's queue; the one-shot fetches are the
/// fallback path for initial load and manual refresh.
///
/// Adapters own the ordering guarantee: snapshots for one (branch, kind)
/// must be delivered in fetch order, so a stale response never overwrites a
/// newer snapshot downstream.
pub trait ChangeFeed {
    fn subscribe(
        &self,
        branch: Branch,
        kind: FeedKind,
        events: UnboundedSender<FeedEvent>,
    ) -> SyncResult<Subscription>;

    fn fetch_records(
        &self,
        branch: Branch,
    ) -> impl Future<Output = SyncResult<Vec<CustomerRecord>>> + Send;

    fn fetch_targets(
        &self,
        branch: Branch,
    ) -> impl Future<Output = SyncResult<Vec<TargetConfigDoc>>> + Send;
}
