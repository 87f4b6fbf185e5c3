use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Session missing or expired (401).
    Authentication,
    /// Caller is not allowed to do this (403).
    Permission,
    /// Resource does not exist (404).
    NotFound,
    /// Remote side failed (500).
    ServerError,
    /// Connectivity problem before a response was received.
    Network,
    /// Request did not complete in time.
    Timeout,
    /// Anything else.
    Unknown,
}

impl ErrorKind {
    /// Every kind, in classification priority order.
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::Authentication,
        ErrorKind::Permission,
        ErrorKind::NotFound,
        ErrorKind::ServerError,
        ErrorKind::Network,
        ErrorKind::Timeout,
        ErrorKind::Unknown,
    ];

    /// Canonical message shown to the user for this kind (without context prefix).
    pub fn template(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "Your session has expired. Please log in again.",
            ErrorKind::Permission => "You don't have permission to perform this action.",
            ErrorKind::NotFound => "The requested resource was not found.",
            ErrorKind::ServerError => "A server error occurred. Please try again later.",
            ErrorKind::Network => "Network connection issue. Check your internet connection.",
            ErrorKind::Timeout => "The request timed out. Please try again.",
            ErrorKind::Unknown => "An unexpected error occurred. Please try again.",
        }
    }

    /// Short title used for notifications.
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "Session Expired",
            ErrorKind::Permission => "Access Denied",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::ServerError => "Server Error",
            ErrorKind::Network => "Connection Problem",
            ErrorKind::Timeout => "Request Timed Out",
            ErrorKind::Unknown => "Something Went Wrong",
        }
    }

    /// Stable snake_case name (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::Permission => "permission",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
