//! Processed-change ledger
//!
//! The rolling lookback hands back the same change on every cycle until it
//! ages out of the window. The ledger remembers the newest `updated_at`
//! processed per meeting so redelivered changes cause no reload, refresh or
//! notification.

use std::collections::HashMap;

use agendaflow_domain::{ChangeRecord, MeetingId};
use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub(crate) struct ChangeLedger {
    processed: HashMap<MeetingId, DateTime<Utc>>,
}

impl ChangeLedger {
    /// Collapse a batch to the newest change per meeting and drop anything
    /// already processed. Output keeps first-seen order.
    pub(crate) fn fresh(&self, changes: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
        let mut newest: Vec<ChangeRecord> = Vec::with_capacity(changes.len());

        for change in changes {
            match newest.iter_mut().find(|kept| kept.meeting_id == change.meeting_id) {
                Some(kept) if change.updated_at > kept.updated_at => *kept = change,
                Some(_) => {}
                None => newest.push(change),
            }
        }

        newest.retain(|change| {
            self.processed.get(&change.meeting_id).map_or(true, |seen| change.updated_at > *seen)
        });
        newest
    }

    pub(crate) fn record(&mut self, change: &ChangeRecord) {
        let entry = self.processed.entry(change.meeting_id).or_insert(change.updated_at);
        if change.updated_at > *entry {
            *entry = change.updated_at;
        }
    }

    /// Forget entries the feed can no longer return.
    pub(crate) fn prune_before(&mut self, since: DateTime<Utc>) {
        self.processed.retain(|_, updated_at| *updated_at >= since);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.processed.len()
    }
}
