//! Substring rules mapping a raw error message to an [`ErrorKind`].

use std::fmt;

use super::{ClassifiedError, ErrorKind};

/// Ordered rules; the first rule with any matching needle wins.
/// Matching is case-sensitive.
const RULES: &[(&[&str], ErrorKind)] = &[
    (&["401", "Authentication"], ErrorKind::Authentication),
    (&["403", "Permission"], ErrorKind::Permission),
    (&["404", "Not Found"], ErrorKind::NotFound),
    (&["500", "Internal Server"], ErrorKind::ServerError),
    (&["Network", "fetch"], ErrorKind::Network),
    (&["timeout"], ErrorKind::Timeout),
];

fn kind_for(message: &str) -> ErrorKind {
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| message.contains(n)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Unknown)
}

/// Classify a raw error message. `context`, when given, is prepended to the
/// canonical message as `"{context}: "`.
pub fn classify_message(message: &str, context: Option<&str>) -> ClassifiedError {
    let kind = kind_for(message);
    let text = match context {
        Some(ctx) => format!("{}: {}", ctx, kind.template()),
        None => kind.template().to_string(),
    };
    ClassifiedError::new(kind, text)
}

/// Classify any displayable error by its rendered message.
pub fn classify<E>(error: &E, context: Option<&str>) -> ClassifiedError
where
    E: fmt::Display + ?Sized,
{
    classify_message(&error.to_string(), context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_from_status_line() {
        let e = classify_message("Request failed: 404 Not Found", None);
        assert_eq!(e.kind(), ErrorKind::NotFound);
        assert_eq!(e.message(), "The requested resource was not found.");
    }

    #[test]
    fn fetch_failure_is_network() {
        assert_eq!(
            classify_message("TypeError: fetch failed", None).kind(),
            ErrorKind::Network
        );
    }

    #[test]
    fn each_rule_maps_to_its_kind() {
        let cases = [
            ("HTTP 401", ErrorKind::Authentication),
            ("Authentication required", ErrorKind::Authentication),
            ("403 Forbidden", ErrorKind::Permission),
            ("Permission denied", ErrorKind::Permission),
            ("Not Found", ErrorKind::NotFound),
            ("500", ErrorKind::ServerError),
            ("Internal Server Error", ErrorKind::ServerError),
            ("Network error", ErrorKind::Network),
            ("connection timeout", ErrorKind::Timeout),
            ("something odd", ErrorKind::Unknown),
        ];
        for (raw, kind) in cases {
            assert_eq!(classify_message(raw, None).kind(), kind, "input {raw:?}");
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        // Mentions both a permission and a server failure; permission is checked first.
        let e = classify_message("403 after 500 Internal Server Error", None);
        assert_eq!(e.kind(), ErrorKind::Permission);
        // "Network timeout" hits the network rule before the timeout rule.
        assert_eq!(
            classify_message("Network timeout", None).kind(),
            ErrorKind::Network
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(
            classify_message("network down", None).kind(),
            ErrorKind::Unknown
        );
        assert_eq!(
            classify_message("Timeout", None).kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn context_is_prefixed() {
        let e = classify_message("401", Some("Submitting claim"));
        assert_eq!(
            e.message(),
            "Submitting claim: Your session has expired. Please log in again."
        );
    }

    #[test]
    fn classify_uses_display_text() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "Network unreachable");
        assert_eq!(classify(&err, None).kind(), ErrorKind::Network);
        let any = anyhow::anyhow!("request timeout");
        assert_eq!(classify(&any, None).kind(), ErrorKind::Timeout);
    }
}
