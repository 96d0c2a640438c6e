use std::collections::VecDeque;

use agendaflow_core::ports::Notifier;
use agendaflow_domain::{Notification, NotificationLevel};
use parking_lot::Mutex;
use tracing::{error, info};

/// Logs every notification and queues it for the hosting page to drain.
///
/// The queue is bounded; the oldest entry is dropped when full.
pub struct QueuedNotifier {
    queue: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl QueuedNotifier {
    pub fn new(capacity: usize) -> Self {
        Self { queue: Mutex::new(VecDeque::with_capacity(capacity)), capacity: capacity.max(1) }
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Default for QueuedNotifier {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Error => error!(message = %notification.message, "notification"),
            _ => info!(level = ?notification.level, message = %notification.message, "notification"),
        }

        let mut queue = self.queue.lock();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(notification.clone());
    }
}
