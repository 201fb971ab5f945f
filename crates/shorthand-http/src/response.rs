// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON response bodies for endpoints.
//
// Decode errors map to a 4xx status; the body names the error kind and hint
// so the client can tell a stale session from a forged one.

use serde::Serialize;
use serde_json::{Value, json};
use shorthand_core::error::{DecodeError, DecodeErrorKind, Result};

/// A response ready to be written by the server integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: String,
}

impl JsonResponse {
    /// `200` with `{"status":"ok","data":...}`.
    pub fn success<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        let body = json!({"status": "ok", "data": serde_json::to_value(data)?});
        Ok(Self::new(200, body))
    }

    /// 4xx with `{"status":"error","error":kind,"hint":hint}`.
    pub fn error(err: &DecodeError) -> Self {
        Self::new(status_code(err), error_body(err))
    }

    fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![
                ("Content-Type", "application/json"),
                ("Access-Control-Allow-Origin", "*"),
            ],
            body: body.to_string(),
        }
    }
}

/// HTTP status for a rejected signed payload.
pub fn status_code(err: &DecodeError) -> u16 {
    match err.kind {
        DecodeErrorKind::EmptyData | DecodeErrorKind::WrongData => 400,
        DecodeErrorKind::WrongSession | DecodeErrorKind::WrongServiceKey => 401,
        DecodeErrorKind::AccessDenied => 403,
    }
}

fn error_body(err: &DecodeError) -> Value {
    let mut body = json!({"status": "error", "error": err.kind.as_str()});
    if let Some(hint) = &err.hint {
        body["hint"] = Value::String(hint.clone());
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_wraps_data() {
        let resp = JsonResponse::success(&json!({"id": 1})).unwrap();
        assert_eq!(resp.status, 200);
        let body: Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body, json!({"status": "ok", "data": {"id": 1}}));
        assert!(resp.headers.contains(&("Access-Control-Allow-Origin", "*")));
    }

    #[test]
    fn status_codes() {
        assert_eq!(status_code(&DecodeError::empty_data()), 400);
        assert_eq!(status_code(&DecodeError::check_base64()), 400);
        assert_eq!(status_code(&DecodeError::wrong_sign()), 401);
        assert_eq!(status_code(&DecodeError::session_expired()), 401);
        assert_eq!(status_code(&DecodeError::wrong_service_key()), 401);
        assert_eq!(status_code(&DecodeError::access_denied(&[])), 403);
    }

    #[test]
    fn error_body_carries_kind_and_hint() {
        let resp = JsonResponse::error(&DecodeError::session_expired());
        assert_eq!(resp.status, 401);
        let body: Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(
            body,
            json!({"status": "error", "error": "wrong-session", "hint": "session-expired"})
        );

        let resp = JsonResponse::error(&DecodeError::empty_data());
        let body: Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body, json!({"status": "error", "error": "empty-data"}));
    }
}
