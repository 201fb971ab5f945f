// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Shorthand.
//
// `ShorthandError` covers infrastructure failures (config, I/O, encoding).
// `DecodeError` is the caller-visible outcome of a rejected signed payload
// and is always returned, never raised.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Top-level error type for all Shorthand infrastructure operations.
#[derive(Debug, Error)]
pub enum ShorthandError {
    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("salt `{0}` is not configured")]
    MissingSalt(String),

    // -- Signing --
    #[error("cannot encode signed envelope: {0}")]
    Envelope(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShorthandError>;

// ---------------------------------------------------------------------------
// Decode outcomes
// ---------------------------------------------------------------------------

/// Category of a rejected signed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// Nothing was supplied.
    EmptyData,
    /// The payload could not be turned into data (bad base64, bad JSON).
    WrongData,
    /// The envelope is malformed, the signature is wrong, or the session
    /// has expired.
    WrongSession,
    /// A direct-trust service call carried the wrong shared secret.
    WrongServiceKey,
    /// The salt name is not allowed for this call site.
    AccessDenied,
}

impl DecodeErrorKind {
    /// Wire name of the kind, as reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyData => "empty-data",
            Self::WrongData => "wrong-data",
            Self::WrongSession => "wrong-session",
            Self::WrongServiceKey => "wrong-service-key",
            Self::AccessDenied => "access-denied",
        }
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DecodeErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Hint strings attached to [`DecodeError`]s.
pub mod hint {
    pub const WRONG_DATA: &str = "wrong-data";
    pub const WRONG_SIGN: &str = "wrong-sign";
    pub const CHECK_BASE64: &str = "check-base64";
    pub const SESSION_EXPIRED: &str = "session-expired";
    pub const WRONG_JSON: &str = "wrong-json";
    pub const CHECK_SALT_NAME_ALLOW: &str = "check-salt-name-allow-variable";
}

/// A rejected signed payload: a kind plus an optional free-text hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeError {
    #[serde(rename = "error")]
    pub kind: DecodeErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self { kind, hint: None }
    }

    pub fn with_hint(kind: DecodeErrorKind, hint: impl Into<String>) -> Self {
        Self {
            kind,
            hint: Some(hint.into()),
        }
    }

    pub fn empty_data() -> Self {
        Self::new(DecodeErrorKind::EmptyData)
    }

    pub fn wrong_envelope() -> Self {
        Self::with_hint(DecodeErrorKind::WrongSession, hint::WRONG_DATA)
    }

    pub fn wrong_service_key() -> Self {
        Self::new(DecodeErrorKind::WrongServiceKey)
    }

    /// `allowed` is echoed back so the integrator can see what the call
    /// site was configured with.
    pub fn access_denied(allowed: &[String]) -> Self {
        Self::with_hint(
            DecodeErrorKind::AccessDenied,
            format!("{}: {}", hint::CHECK_SALT_NAME_ALLOW, allowed.join(",")),
        )
    }

    pub fn wrong_sign() -> Self {
        Self::with_hint(DecodeErrorKind::WrongSession, hint::WRONG_SIGN)
    }

    pub fn check_base64() -> Self {
        Self::with_hint(DecodeErrorKind::WrongData, hint::CHECK_BASE64)
    }

    pub fn wrong_json() -> Self {
        Self::with_hint(DecodeErrorKind::WrongData, hint::WRONG_JSON)
    }

    pub fn session_expired() -> Self {
        Self::with_hint(DecodeErrorKind::WrongSession, hint::SESSION_EXPIRED)
    }

    /// The hint, or `""` when none is attached.
    pub fn hint(&self) -> &str {
        self.hint.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{}: {}", self.kind, hint),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for DecodeError {}
