//! Change fetcher with a rolling lookback window

use std::sync::Arc;
use std::time::Duration;

use agendaflow_common::SharedClock;
use agendaflow_domain::{AgendaError, ChangeRecord};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::ports::ChangeFeed;

/// Result of one fetch. `changes` is empty whenever `error` is set.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub since: DateTime<Utc>,
    pub changes: Vec<ChangeRecord>,
    pub error: Option<AgendaError>,
}

/// Asks the [`ChangeFeed`] for everything changed in the last `lookback`.
///
/// The window is "now minus lookback", not "since the last successful
/// cycle", so the same change may be delivered on several cycles.
pub struct ChangeFetcher {
    feed: Arc<dyn ChangeFeed>,
    clock: SharedClock,
    lookback: Duration,
}

impl ChangeFetcher {
    pub fn new(feed: Arc<dyn ChangeFeed>, clock: SharedClock, lookback: Duration) -> Self {
        Self { feed, clock, lookback }
    }

    /// Lower bound of the current lookback window.
    pub fn since(&self) -> DateTime<Utc> {
        let lookback = chrono::Duration::from_std(self.lookback).unwrap_or(chrono::Duration::zero());
        self.clock.utc_now() - lookback
    }

    /// Fetch changes, never failing: errors are logged and reported in the
    /// outcome with an empty change list.
    #[instrument(skip(self))]
    pub async fn fetch_changes(&self) -> FetchOutcome {
        let since = self.since();

        match self.feed.changes_since(since).await {
            Ok(changes) => {
                debug!(count = changes.len(), since = %since, "changes fetched");
                FetchOutcome { since, changes, error: None }
            }
            Err(err) => {
                warn!(error = %err, since = %since, "change fetch failed");
                FetchOutcome { since, changes: Vec::new(), error: Some(err) }
            }
        }
    }
}
