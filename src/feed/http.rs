use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::interval;
use tracing::{debug, instrument};
use url::Url;

use crate::branch::Branch;
use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::store::CustomerRecord;

use super::{ChangeFeed, FeedEvent, FeedKind, Subscription, TargetConfigDoc};

/// Change feed over the snapshot REST API:
/// `GET {base}/branches/{key}/records` and `GET {base}/branches/{key}/config`.
///
/// Push subscriptions are bridged onto the pull API by a poll task per
/// (branch, kind). Each round trip is awaited before the next one starts,
/// so snapshots are always delivered in fetch order and a slow stale
/// response can never land after a newer one.
#[derive(Clone)]
pub struct HttpFeed {
    http_client: ClientWithMiddleware,
    base_url: String,
    poll_interval: Duration,
}

/// Last snapshot a poll task delivered, for change detection.
#[derive(PartialEq)]
enum Polled {
    Records(Vec<CustomerRecord>),
    Targets(Vec<TargetConfigDoc>),
}

impl HttpFeed {
    pub fn new(config: &Config) -> Self {
        let reqwest_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(2))
            .build_with_max_retries(3);

        let http_client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            http_client,
            base_url: config.feed_base_url.trim_end_matches('/').to_string(),
            poll_interval: config.poll_interval,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        branch: Branch,
        kind: FeedKind,
        path: &str,
    ) -> SyncResult<T> {
        let url = Url::parse(&format!("{}/branches/{}/{}", self.base_url, branch.key(), path))
            .map_err(|e| SyncError::fetch(branch, kind, e))?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::fetch(branch, kind, e))?
            .error_for_status()
            .map_err(|e| SyncError::fetch(branch, kind, e))?;

        response
            .json::<T>()
            .await
            .map_err(|e| SyncError::fetch(branch, kind, e))
    }

    async fn poll_once(&self, branch: Branch, kind: FeedKind) -> SyncResult<Polled> {
        match kind {
            FeedKind::Records => self.fetch_records(branch).await.map(Polled::Records),
            FeedKind::Targets => self.fetch_targets(branch).await.map(Polled::Targets),
        }
    }

    #[instrument(skip(self, events), fields(branch = %branch, kind = %kind))]
    async fn poll_loop(self, branch: Branch, kind: FeedKind, events: UnboundedSender<FeedEvent>) {
        let mut ticker = interval(self.poll_interval);
        let mut last_delivered: Option<Polled> = None;

        loop {
            ticker.tick().await;

            let event = match self.poll_once(branch, kind).await {
                Ok(polled) => {
                    if last_delivered.as_ref() == Some(&polled) {
                        debug!("snapshot unchanged, nothing to deliver");
                        continue;
                    }
                    let event = match &polled {
                        Polled::Records(records) => FeedEvent::RecordsChanged {
                            branch,
                            records: records.clone(),
                        },
                        Polled::Targets(docs) => FeedEvent::TargetsChanged {
                            branch,
                            docs: docs.clone(),
                        },
                    };
                    last_delivered = Some(polled);
                    event
                }
                // Report and keep polling; manual reload is the recovery path.
                Err(e) => FeedEvent::StreamError {
                    branch,
                    kind,
                    message: e.to_string(),
                },
            };

            if events.send(event).is_err() {
                debug!("event queue closed, poll task exiting");
                return;
            }
        }
    }
}

impl ChangeFeed for HttpFeed {
    fn subscribe(
        &self,
        branch: Branch,
        kind: FeedKind,
        events: UnboundedSender<FeedEvent>,
    ) -> SyncResult<Subscription> {
        let handle = tokio::spawn(self.clone().poll_loop(branch, kind, events));
        debug!(%branch, %kind, "http feed poll task started");
        Ok(Subscription::new(move || handle.abort()))
    }

    async fn fetch_records(&self, branch: Branch) -> SyncResult<Vec<CustomerRecord>> {
        self.get_json(branch, FeedKind::Records, "records").await
    }

    async fn fetch_targets(&self, branch: Branch) -> SyncResult<Vec<TargetConfigDoc>> {
        self.get_json(branch, FeedKind::Targets, "config").await
    }
}
