//! User-visible failure notifications.
//!
//! The executor decides *when* to notify; delivering the notification (toast,
//! log line, telemetry) is up to the injected [`NotificationSink`].

use serde::Serialize;

use crate::classify::ClassifiedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Never produced by the executor; available to callers sharing the sink.
    Info,
    /// Failure that will be retried automatically.
    Warning,
    /// Failure that ends the session.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    /// Build the notification for a classified failure.
    pub fn for_error(error: &ClassifiedError, severity: Severity) -> Self {
        Self {
            title: error.kind().title().to_string(),
            description: error.message().to_string(),
            severity,
        }
    }
}

/// Receives notifications. Must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Emits notifications as tracing events at a level matching the severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Info => tracing::info!(title = %n.title, "{}", n.description),
            Severity::Warning => tracing::warn!(title = %n.title, "{}", n.description),
            Severity::Error => tracing::error!(title = %n.title, "{}", n.description),
        }
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_message;
    use std::sync::{Arc, Mutex};

    #[test]
    fn notification_uses_kind_title_and_message() {
        let err = classify_message("403", Some("Booking"));
        let n = Notification::for_error(&err, Severity::Error);
        assert_eq!(n.title, "Access Denied");
        assert_eq!(
            n.description,
            "Booking: You don't have permission to perform this action."
        );
        assert_eq!(n.severity, Severity::Error);
    }

    #[test]
    fn closures_are_sinks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let sink = move |n: Notification| s.lock().unwrap().push(n.severity);
        sink.notify(Notification {
            title: "t".into(),
            description: "d".into(),
            severity: Severity::Warning,
        });
        assert_eq!(*seen.lock().unwrap(), vec![Severity::Warning]);
    }
}
