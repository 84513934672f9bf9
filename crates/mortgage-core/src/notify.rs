//! User-facing notifications
//!
//! Remote outcomes are surfaced through a [`Notifier`]. Failures carry a
//! generic per-operation message; the underlying cause goes to the log.

use serde::{Deserialize, Serialize};

/// Operation a notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create from the form
    Create,
    /// Save an edit session
    Update,
    /// Delete a row
    Delete,
    /// Re-read the list
    Refresh,
}

impl Operation {
    // only a create is confirmed; other outcomes show in the refreshed list
    fn success_message(self) -> Option<&'static str> {
        match self {
            Self::Create => Some("Mortgage added successfully"),
            Self::Update | Self::Delete | Self::Refresh => None,
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::Create => "There was an error adding the mortgage. Please try again.",
            Self::Update => "Error updating mortgage",
            Self::Delete => "Error deleting mortgage",
            Self::Refresh => "Error fetching mortgages",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Refresh => "refresh",
        };
        f.write_str(name)
    }
}

/// Outcome kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Operation succeeded
    Success,
    /// Operation failed; local state kept for retry
    Failure,
}

/// Message for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Outcome kind
    pub level: NotificationLevel,
    /// Operation attempted
    pub operation: Operation,
    /// Text shown to the user
    pub message: String,
}

impl Notification {
    /// Success notice for an operation, if it has one
    #[must_use]
    pub fn success(operation: Operation) -> Option<Self> {
        operation.success_message().map(|message| Self {
            level: NotificationLevel::Success,
            operation,
            message: message.to_string(),
        })
    }

    /// Generic failure notice for an operation
    #[must_use]
    pub fn failure(operation: Operation) -> Self {
        Self {
            level: NotificationLevel::Failure,
            operation,
            message: operation.failure_message().to_string(),
        }
    }

    /// Check if this reports a failure
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.level == NotificationLevel::Failure
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification);
    }
}
