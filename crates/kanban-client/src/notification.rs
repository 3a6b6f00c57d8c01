use std::time::{Duration, Instant};

use crate::actions::{Action, EntityKind, OperationKind, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient banner. `message_key` is a translation key resolved by the UI.
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message_key: &'static str,
    pub raised_at: Instant,
}

impl Notification {
    pub fn new(level: NotificationLevel, message_key: &'static str) -> Self {
        Self {
            level,
            message_key,
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.raised_at.elapsed() > ttl
    }
}

/// Holds at most one banner, derived from action outcomes.
#[derive(Debug, Clone)]
pub struct Notifier {
    current: Option<Notification>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current: None,
            timeout,
        }
    }

    /// Update the banner for an action outcome.
    ///
    /// A pending action hides whatever is shown. Completed actions raise a
    /// banner only when they have a message; otherwise the banner is left as is.
    pub fn record(&mut self, action: Action, outcome: Outcome) {
        match outcome {
            Outcome::Pending => self.current = None,
            Outcome::Fulfilled => {
                if let Some(key) = success_key(action) {
                    self.current = Some(Notification::new(NotificationLevel::Success, key));
                }
            }
            Outcome::Rejected => {
                if let Some(key) = error_key(action.operation) {
                    self.current = Some(Notification::new(NotificationLevel::Error, key));
                }
            }
        }
    }

    pub fn info(&mut self, message_key: &'static str) {
        self.current = Some(Notification::new(NotificationLevel::Info, message_key));
    }

    /// The banner to display, if any and not yet expired.
    pub fn visible(&self) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|notification| !notification.is_expired(self.timeout))
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drop the banner once its timeout elapsed. Returns true if one was dropped.
    pub fn prune_expired(&mut self) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|notification| notification.is_expired(self.timeout));
        if expired {
            self.current = None;
        }
        expired
    }
}

fn success_key(action: Action) -> Option<&'static str> {
    match action.operation {
        OperationKind::Add => Some(match action.entity {
            EntityKind::Board => "add.board",
            EntityKind::Column => "add.column",
            EntityKind::Task => "add.task",
        }),
        OperationKind::Edit => Some(match action.entity {
            EntityKind::Board => "edit.board",
            EntityKind::Column => "edit.column",
            EntityKind::Task => "edit.task",
        }),
        OperationKind::Delete => Some(match action.entity {
            EntityKind::Board => "delete.board",
            EntityKind::Column => "delete.column",
            EntityKind::Task => "delete.task",
        }),
        OperationKind::Done => match action.entity {
            EntityKind::Task => Some("done.task.done"),
            EntityKind::Board | EntityKind::Column => None,
        },
        OperationKind::NotDone => match action.entity {
            EntityKind::Task => Some("done.task.notDone"),
            EntityKind::Board | EntityKind::Column => None,
        },
        OperationKind::Fetch | OperationKind::Reorder => None,
    }
}

fn error_key(operation: OperationKind) -> Option<&'static str> {
    match operation {
        OperationKind::Add => Some("add.error"),
        OperationKind::Edit | OperationKind::Done | OperationKind::NotDone => Some("edit.error"),
        OperationKind::Delete => Some("delete.error"),
        OperationKind::Reorder => Some("reorder.error"),
        OperationKind::Fetch => None,
    }
}
