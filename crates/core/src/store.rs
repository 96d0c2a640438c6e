//! Client-side meeting cache
//!
//! Every write goes through [`MeetingStateStore::apply`], whether it comes
//! from the reconciliation engine or from a user action. Full reloads are
//! ordered by [`ReloadTicket`]s so a slow snapshot can never overwrite a
//! fresher one, and status changes are last-writer-wins on the backend
//! timestamp.

use std::sync::atomic::{AtomicU64, Ordering};

use agendaflow_domain::{ChangeRecord, Meeting, MeetingId, Result};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::ports::MeetingRepository;

/// Ordering token taken before a full reload's network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

impl ReloadTicket {
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// The only ways the store can change.
#[derive(Debug, Clone)]
pub enum StoreMutation {
    /// Total replacement from a full list fetch.
    ReplaceAll { meetings: Vec<Meeting>, ticket: ReloadTicket },
    /// Overwrite the confirmation status of one meeting.
    ApplyChange(ChangeRecord),
    /// Insert or replace one record (user save).
    Upsert(Meeting),
    /// Drop one record (user delete).
    Remove(MeetingId),
}

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Replaced { count: usize },
    /// A newer snapshot was already committed; this one was dropped.
    StaleReloadDiscarded,
    Applied,
    /// The change was already reflected; nothing was written.
    Unchanged,
    /// The store holds a status with a newer backend timestamp.
    Superseded,
    UnknownMeeting,
    Upserted,
    Removed,
}

impl MutationOutcome {
    /// Whether the store content changed.
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Replaced { .. } | Self::Applied | Self::Upserted | Self::Removed)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    meetings: Vec<Meeting>,
    committed_ticket: Option<ReloadTicket>,
}

impl StoreState {
    fn position(&self, id: MeetingId) -> Option<usize> {
        self.meetings.iter().position(|meeting| meeting.id == id)
    }
}

/// In-memory authoritative cache of meeting records.
#[derive(Debug, Default)]
pub struct MeetingStateStore {
    state: RwLock<StoreState>,
    next_ticket: AtomicU64,
}

impl MeetingStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket before starting a full reload.
    pub fn begin_reload(&self) -> ReloadTicket {
        ReloadTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Single mutation entry point.
    pub fn apply(&self, mutation: StoreMutation) -> MutationOutcome {
        let mut state = self.state.write();

        match mutation {
            StoreMutation::ReplaceAll { meetings, ticket } => {
                if state.committed_ticket.is_some_and(|committed| ticket < committed) {
                    debug!(ticket = ticket.sequence(), "discarding stale meeting snapshot");
                    return MutationOutcome::StaleReloadDiscarded;
                }
                let count = meetings.len();
                state.meetings = meetings;
                state.committed_ticket = Some(ticket);
                MutationOutcome::Replaced { count }
            }
            StoreMutation::ApplyChange(change) => {
                let Some(index) = state.position(change.meeting_id) else {
                    warn!(meeting_id = %change.meeting_id, "change for unknown meeting ignored");
                    return MutationOutcome::UnknownMeeting;
                };
                let meeting = &mut state.meetings[index];

                if let Some(current) = meeting.status_updated_at {
                    if change.updated_at < current {
                        debug!(meeting_id = %change.meeting_id, "older change superseded");
                        return MutationOutcome::Superseded;
                    }
                }
                if meeting.confirmation_status == change.new_status
                    && meeting.status_updated_at == Some(change.updated_at)
                {
                    return MutationOutcome::Unchanged;
                }

                meeting.confirmation_status = change.new_status;
                meeting.status_updated_at = Some(change.updated_at);
                MutationOutcome::Applied
            }
            StoreMutation::Upsert(meeting) => {
                match state.position(meeting.id) {
                    Some(index) => state.meetings[index] = meeting,
                    None => state.meetings.push(meeting),
                }
                MutationOutcome::Upserted
            }
            StoreMutation::Remove(id) => match state.position(id) {
                Some(index) => {
                    state.meetings.remove(index);
                    MutationOutcome::Removed
                }
                None => MutationOutcome::UnknownMeeting,
            },
        }
    }

    /// Full replacement after a list fetch.
    pub fn replace_all(&self, meetings: Vec<Meeting>, ticket: ReloadTicket) -> MutationOutcome {
        self.apply(StoreMutation::ReplaceAll { meetings, ticket })
    }

    /// Idempotent status patch.
    pub fn apply_change(&self, change: &ChangeRecord) -> MutationOutcome {
        self.apply(StoreMutation::ApplyChange(change.clone()))
    }

    /// Fetch the full list from `repository` and commit it.
    ///
    /// # Errors
    /// Propagates the repository error; the store is left untouched.
    pub async fn reload(&self, repository: &dyn MeetingRepository) -> Result<MutationOutcome> {
        let ticket = self.begin_reload();
        let meetings = repository.list_meetings().await?;
        Ok(self.replace_all(meetings, ticket))
    }

    pub fn get(&self, id: MeetingId) -> Option<Meeting> {
        let state = self.state.read();
        state.position(id).map(|index| state.meetings[index].clone())
    }

    /// Snapshot of every cached meeting in backend order.
    pub fn all(&self) -> Vec<Meeting> {
        self.state.read().meetings.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().meetings.is_empty()
    }
}
