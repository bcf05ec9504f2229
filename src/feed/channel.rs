use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::branch::Branch;
use crate::error::{SyncError, SyncResult};
use crate::store::CustomerRecord;

use super::{ChangeFeed, FeedEvent, FeedKind, Subscription, TargetConfigDoc};

/// In-process change feed. Snapshots published through it fan out to every
/// live subscription for the matching (branch, kind) and are kept as the
/// current state served by the one-shot fetches.
///
/// Branches can be disconnected and fetches forced to fail, which is how the
/// engine tests exercise the per-branch failure isolation paths.
#[derive(Clone)]
pub struct ChannelFeed {
    inner: Arc<Mutex<FeedState>>,
}

struct FeedState {
    connected: BTreeSet<Branch>,
    records: BTreeMap<Branch, Vec<CustomerRecord>>,
    target_docs: BTreeMap<Branch, Vec<TargetConfigDoc>>,
    failing_fetches: BTreeSet<(Branch, FeedKind)>,
    subscribers: Vec<Subscriber>,
    next_token: u64,
}

struct Subscriber {
    token: u64,
    branch: Branch,
    kind: FeedKind,
    sender: UnboundedSender<FeedEvent>,
}

impl ChannelFeed {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedState {
                connected: Branch::ALL.into_iter().collect(),
                records: BTreeMap::new(),
                target_docs: BTreeMap::new(),
                failing_fetches: BTreeSet::new(),
                subscribers: Vec::new(),
                next_token: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.inner.lock().expect("feed state lock poisoned")
    }

    /// Publish a full record snapshot for one branch. Publishing under the
    /// state lock keeps delivery order identical to publish order.
    pub fn publish_records(&self, branch: Branch, records: Vec<CustomerRecord>) {
        let mut state = self.state();
        state.records.insert(branch, records.clone());
        state.deliver(
            branch,
            FeedKind::Records,
            FeedEvent::RecordsChanged { branch, records },
        );
    }

    /// Publish the branch's current configuration documents.
    pub fn publish_targets(&self, branch: Branch, docs: Vec<TargetConfigDoc>) {
        let mut state = self.state();
        state.target_docs.insert(branch, docs.clone());
        state.deliver(
            branch,
            FeedKind::Targets,
            FeedEvent::TargetsChanged { branch, docs },
        );
    }

    /// Report a failure on a live stream without cancelling it.
    pub fn emit_stream_error(&self, branch: Branch, kind: FeedKind, message: impl Into<String>) {
        let mut state = self.state();
        state.deliver(
            branch,
            kind,
            FeedEvent::StreamError {
                branch,
                kind,
                message: message.into(),
            },
        );
    }

    /// Drop the branch's connection; subscribes and fetches for it will fail
    /// with `AdapterUninitialized` until `reconnect` is called.
    pub fn disconnect(&self, branch: Branch) {
        self.state().connected.remove(&branch);
    }

    pub fn reconnect(&self, branch: Branch) {
        self.state().connected.insert(branch);
    }

    /// Make one-shot fetches of the given kind fail for the branch.
    pub fn fail_fetches(&self, branch: Branch, kind: FeedKind) {
        self.state().failing_fetches.insert((branch, kind));
    }

    pub fn restore_fetches(&self, branch: Branch, kind: FeedKind) {
        self.state().failing_fetches.remove(&(branch, kind));
    }

    fn check_connected(state: &FeedState, branch: Branch) -> SyncResult<()> {
        if state.connected.contains(&branch) {
            Ok(())
        } else {
            Err(SyncError::AdapterUninitialized { branch })
        }
    }
}

impl Default for ChannelFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    fn deliver(&mut self, branch: Branch, kind: FeedKind, event: FeedEvent) {
        // Closed receivers are pruned as a side effect of delivery.
        self.subscribers.retain(|sub| {
            if sub.branch != branch || sub.kind != kind {
                return true;
            }
            sub.sender.send(event.clone()).is_ok()
        });
    }
}

impl ChangeFeed for ChannelFeed {
    fn subscribe(
        &self,
        branch: Branch,
        kind: FeedKind,
        events: UnboundedSender<FeedEvent>,
    ) -> SyncResult<Subscription> {
        let mut state = self.state();
        Self::check_connected(&state, branch)?;

        let token = state.next_token;
        state.next_token += 1;
        state.subscribers.push(Subscriber {
            token,
            branch,
            kind,
            sender: events,
        });
        debug!(%branch, %kind, token, "channel feed subscription registered");

        let inner = Arc::clone(&self.inner);
        Ok(Subscription::new(move || {
            if let Ok(mut state) = inner.lock() {
                state.subscribers.retain(|sub| sub.token != token);
            }
        }))
    }

    async fn fetch_records(&self, branch: Branch) -> SyncResult<Vec<CustomerRecord>> {
        let state = self.state();
        Self::check_connected(&state, branch)?;
        if state.failing_fetches.contains(&(branch, FeedKind::Records)) {
            return Err(SyncError::fetch(
                branch,
                FeedKind::Records,
                "remote store unavailable",
            ));
        }
        Ok(state.records.get(&branch).cloned().unwrap_or_default())
    }

    async fn fetch_targets(&self, branch: Branch) -> SyncResult<Vec<TargetConfigDoc>> {
        let state = self.state();
        Self::check_connected(&state, branch)?;
        if state.failing_fetches.contains(&(branch, FeedKind::Targets)) {
            return Err(SyncError::fetch(
                branch,
                FeedKind::Targets,
                "remote store unavailable",
            ));
        }
        Ok(state.target_docs.get(&branch).cloned().unwrap_or_default())
    }
}
