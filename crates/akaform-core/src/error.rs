// ── Core error types ──
//
// Errors surfaced by resource and data-source adapters. Facade failures are
// wrapped with the name of the adapter operation that issued them, so a
// caller sees `resourceRuleCreate: calling 'UpdateRule': …` rather than a
// bare HTTP status.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Identity ─────────────────────────────────────────────────────
    #[error("invalid ID format {id:?}: expected {hint}")]
    InvalidIdFormat { id: String, hint: String },

    // ── Remote state resolution ──────────────────────────────────────
    #[error("failed to resolve {what} for config {config_id}: {source}")]
    RemoteLookupFailed {
        what: &'static str,
        config_id: i64,
        #[source]
        source: akaform_api::Error,
    },

    // ── Declared state ───────────────────────────────────────────────
    #[error("invalid rule_action {action:?} with condition_exception: {reason}")]
    InvalidActionCombination { action: String, reason: String },

    #[error("failed to set attribute {name:?}: {message}")]
    ValueSetFailed { name: String, message: String },

    #[error("attribute not found: {name}")]
    AttributeNotFound { name: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Operations ───────────────────────────────────────────────────
    #[error("{operation}: {source}")]
    Operation {
        operation: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Operation rejected: {message}")]
    Rejected { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{0}")]
    Api(#[source] akaform_api::Error),

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap any error with the adapter operation that produced it.
    pub fn operation(operation: impl Into<String>, source: impl Into<CoreError>) -> Self {
        Self::Operation {
            operation: operation.into(),
            source: Box::new(source.into()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// `true` for the not-found sentinel: a missing attribute, a missing
    /// entity, or an HTTP 404 from the facade (looked up through wrappers).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::AttributeNotFound { .. } | Self::NotFound { .. } => true,
            Self::Api(e) => e.is_not_found(),
            Self::RemoteLookupFailed { source, .. } => source.is_not_found(),
            Self::Operation { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The innermost error, skipping operation-name wrappers.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<akaform_api::Error> for CoreError {
    fn from(err: akaform_api::Error) -> Self {
        match err {
            akaform_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            akaform_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            akaform_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            other => CoreError::Api(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> akaform_api::Error {
        akaform_api::Error::Api {
            status: 404,
            title: "Not Found".into(),
            detail: None,
            problem_type: None,
        }
    }

    #[test]
    fn operation_prefix_is_displayed() {
        let err = CoreError::operation("cidrMap Create failed", not_found());
        assert_eq!(
            err.to_string(),
            "cidrMap Create failed: API error (HTTP 404): Not Found"
        );
    }

    #[test]
    fn not_found_is_seen_through_wrappers() {
        let err = CoreError::operation("resourceRuleRead", not_found());
        assert!(err.is_not_found());
        assert!(matches!(err.root(), CoreError::Api(_)));

        let err = CoreError::operation("x", CoreError::validation("bad"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn authentication_errors_are_translated() {
        let err: CoreError = akaform_api::Error::Authentication {
            message: "signature mismatch".into(),
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }
}
