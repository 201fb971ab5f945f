// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signed payload decoder.
//
// Checks run in a fixed order and the first failure is returned:
//
//   empty -> envelope -> [service/direct shortcut] -> allow-list
//         -> signature -> base64 -> JSON -> TTL
//
// The service/direct shortcut compares the shared secret literally and
// returns without signature or TTL checks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use serde_json::{Map, Value};
use shorthand_core::error::DecodeError;
use shorthand_core::{Algorithm, SignedPayload, TTL_NEVER, salt_role};
use tracing::{debug, instrument};

use crate::envelope::SignedEnvelope;
use crate::salt::SaltStore;
use crate::sign::{KeyedHashSigner, SignPrimitive, constant_time_eq};

/// Default maximum JSON nesting depth.
pub const JSON_MAX_DEPTH: usize = 6;

/// Per-call decode settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Whether the payload segment is base64 before JSON parsing.
    pub is_base64: bool,
    /// Salt names accepted at this call site. Empty accepts any.
    pub allowed_salt_names: Vec<String>,
    /// Maximum JSON nesting depth.
    pub json_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            is_base64: true,
            allowed_salt_names: Vec::new(),
            json_depth: JSON_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn base64(mut self, is_base64: bool) -> Self {
        self.is_base64 = is_base64;
        self
    }

    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_salt_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn json_depth(mut self, depth: usize) -> Self {
        self.json_depth = depth;
        self
    }

    fn allows(&self, salt_name: &str) -> bool {
        self.allowed_salt_names.is_empty()
            || self
                .allowed_salt_names
                .iter()
                .any(|n| n == salt_name || n == salt_role::ALL)
    }
}

/// Payload text that passed authentication.
enum Verified {
    /// Service call authenticated by shared secret.
    Direct(String),
    /// Signature checked and base64 (if any) removed.
    Signed(String),
}

/// Decodes signed strings against a salt store.
#[derive(Debug, Clone)]
pub struct Decoder<'s, P = KeyedHashSigner> {
    salts: &'s SaltStore,
    signer: P,
}

impl<'s> Decoder<'s> {
    pub fn new(salts: &'s SaltStore) -> Self {
        Self {
            salts,
            signer: KeyedHashSigner,
        }
    }
}

impl<'s, P: SignPrimitive> Decoder<'s, P> {
    pub fn with_signer(salts: &'s SaltStore, signer: P) -> Self {
        Self { salts, signer }
    }

    /// Decode `raw` into `T`, checking expiry against the current time.
    pub fn decode<T: SignedPayload>(
        &self,
        raw: &str,
        options: &DecodeOptions,
    ) -> Result<T, DecodeError> {
        self.decode_at(raw, options, Utc::now().timestamp())
    }

    /// Decode `raw` into `T`, checking expiry against `now` (unix seconds).
    #[instrument(skip_all, fields(len = raw.len(), now = now))]
    pub fn decode_at<T: SignedPayload>(
        &self,
        raw: &str,
        options: &DecodeOptions,
        now: i64,
    ) -> Result<T, DecodeError> {
        let result = self.verify(raw, options).and_then(|verified| match verified {
            Verified::Direct(text) => parse_record(&text, options.json_depth),
            Verified::Signed(text) => {
                let record: T = parse_record(&text, options.json_depth)?;
                let ttl = record.ttl();
                if ttl != TTL_NEVER && ttl < now {
                    return Err(DecodeError::session_expired());
                }
                Ok(record)
            }
        });
        log_failure(&result);
        result
    }

    /// Authenticate `raw` and return its payload text without parsing it.
    #[instrument(skip_all, fields(len = raw.len()))]
    pub fn decode_text(&self, raw: &str, options: &DecodeOptions) -> Result<String, DecodeError> {
        let result = self.verify(raw, options).map(|verified| match verified {
            Verified::Direct(text) | Verified::Signed(text) => text,
        });
        log_failure(&result);
        result
    }

    fn verify(&self, raw: &str, options: &DecodeOptions) -> Result<Verified, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::empty_data());
        }

        let envelope = SignedEnvelope::parse(raw).ok_or_else(DecodeError::wrong_envelope)?;
        let secret = self.salts.lookup(envelope.salt_name());

        if envelope.salt_name() == salt_role::SERVICE && envelope.algorithm() == Algorithm::Direct {
            if secret.is_empty() || !constant_time_eq(secret.as_bytes(), envelope.hash().as_bytes())
            {
                return Err(DecodeError::wrong_service_key());
            }
            debug!("direct service key accepted");
            return Ok(Verified::Direct(envelope.payload().to_owned()));
        }

        if !options.allows(envelope.salt_name()) {
            return Err(DecodeError::access_denied(&options.allowed_salt_names));
        }

        if !self.signer.verify(
            envelope.hash(),
            envelope.payload(),
            secret,
            envelope.algorithm(),
        ) {
            return Err(DecodeError::wrong_sign());
        }

        let text = if options.is_base64 {
            decode_base64(envelope.payload())?
        } else {
            envelope.payload().to_owned()
        };
        Ok(Verified::Signed(text))
    }
}

fn log_failure<T>(result: &Result<T, DecodeError>) {
    if let Err(err) = result {
        debug!(kind = %err.kind, hint = err.hint(), "signed data rejected");
    }
}

fn decode_base64(payload: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| DecodeError::check_base64())?;
    if bytes.is_empty() {
        return Err(DecodeError::check_base64());
    }
    String::from_utf8(bytes).map_err(|_| DecodeError::check_base64())
}

/// Parse JSON text into `T`. Empty-ish documents become `{}`.
fn parse_record<T: SignedPayload>(text: &str, max_depth: usize) -> Result<T, DecodeError> {
    let value = parse_json(text, max_depth)?;
    let value = if is_empty_value(&value) {
        Value::Object(Map::new())
    } else {
        value
    };
    serde_json::from_value(value).map_err(|_| DecodeError::wrong_json())
}

/// Parse JSON, rejecting documents nested deeper than `max_depth`.
pub fn parse_json(text: &str, max_depth: usize) -> Result<Value, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(|_| DecodeError::wrong_json())?;
    if json_depth(&value) > max_depth {
        return Err(DecodeError::wrong_json());
    }
    Ok(value)
}

/// Nesting depth: each array or object adds one level, scalars add none.
pub fn json_depth(value: &Value) -> usize {
    let mut max = 0;
    let mut stack = vec![(value, 0usize)];
    while let Some((value, depth)) = stack.pop() {
        let children: Box<dyn Iterator<Item = &Value>> = match value {
            Value::Array(items) => Box::new(items.iter()),
            Value::Object(map) => Box::new(map.values()),
            _ => {
                max = max.max(depth);
                continue;
            }
        };
        max = max.max(depth + 1);
        stack.extend(children.map(|child| (child, depth + 1)));
    }
    max
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use shorthand_core::{DecodeErrorKind, Session, SignedDataBase};

    use crate::create::create_signed_data;

    const NOW: i64 = 1_700_000_000;

    fn store() -> SaltStore {
        [("client", "k1"), ("service", "svc-shared"), ("support", "k2")]
            .into_iter()
            .collect()
    }

    fn signed(value: &Value, salt: &str, store: &SaltStore) -> String {
        create_signed_data(&value.to_string(), salt, store, Algorithm::Md5, true).unwrap()
    }

    #[test]
    fn valid_client_payload_decodes() {
        let store = store();
        let raw = signed(&json!({"ttl": 9_999_999_999i64}), "client", &store);
        let opts = DecodeOptions::default().allow(["client"]);

        let data: SignedDataBase = Decoder::new(&store).decode_at(&raw, &opts, NOW).unwrap();
        assert_eq!(data.ttl(), 9_999_999_999);
    }

    #[test]
    fn empty_input() {
        let store = store();
        let err = Decoder::new(&store)
            .decode_at::<SignedDataBase>("", &DecodeOptions::default(), NOW)
            .unwrap_err();
        assert_eq!(err, DecodeError::empty_data());
    }

    #[test]
    fn malformed_envelope() {
        let store = store();
        let err = Decoder::new(&store)
            .decode_text("not-an-envelope", &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::WrongSession);
        assert_eq!(err.hint(), "wrong-data");
    }

    #[test]
    fn salt_not_in_allow_list() {
        let store = store();
        let raw = signed(&json!({"ttl": 9_999_999_999i64}), "client", &store);
        let opts = DecodeOptions::default().allow(["support"]);

        let err = Decoder::new(&store)
            .decode_at::<SignedDataBase>(&raw, &opts, NOW)
            .unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::AccessDenied);
        assert_eq!(err.hint(), "check-salt-name-allow-variable: support");
    }

    #[test]
    fn wildcard_allows_any_salt() {
        let store = store();
        let raw = signed(&json!({}), "support", &store);
        let opts = DecodeOptions::default().allow([salt_role::ALL]);

        assert!(
            Decoder::new(&store)
                .decode_at::<SignedDataBase>(&raw, &opts, NOW)
                .is_ok()
        );
    }

    #[test]
    fn tampered_hash() {
        let store = store();
        let raw = signed(&json!({"ttl": -1}), "client", &store);
        let env = SignedEnvelope::parse(&raw).unwrap();
        let mut hash: Vec<char> = env.hash().chars().collect();
        hash[0] = if hash[0] == 'a' { 'b' } else { 'a' };
        let tampered = SignedEnvelope::new(
            env.salt_name(),
            env.algorithm(),
            hash.into_iter().collect::<String>(),
            env.payload(),
        )
        .unwrap()
        .to_string();

        let err = Decoder::new(&store)
            .decode_at::<SignedDataBase>(&tampered, &DecodeOptions::default(), NOW)
            .unwrap_err();
        assert_eq!(err, DecodeError::wrong_sign());
    }

    #[test]
    fn unknown_salt_cannot_be_forged_with_empty_key() {
        let store = store();
        let payload = STANDARD.encode(r#"{"ttl":-1}"#);
        let hash = KeyedHashSigner.sign(&payload, "", Algorithm::Md5);
        let raw = format!("nobody.md5.{hash}.{payload}");

        let err = Decoder::new(&store)
            .decode_at::<SignedDataBase>(&raw, &DecodeOptions::default(), NOW)
            .unwrap_err();
        assert_eq!(err, DecodeError::wrong_sign());
    }

    #[test]
    fn wildcard_name_is_never_a_signing_key() {
        let store: SaltStore = [("client", "k1"), ("all", "wild")].into_iter().collect();
        let payload = STANDARD.encode(r#"{"ttl":-1}"#);
        let hash = KeyedHashSigner.sign(&payload, "wild", Algorithm::Md5);
        let raw = format!("all.md5.{hash}.{payload}");

        let err = Decoder::new(&store)
            .decode_at::<SignedDataBase>(&raw, &DecodeOptions::default(), NOW)
            .unwrap_err();
        assert_eq!(err, DecodeError::wrong_sign());
    }

    #[test]
    fn ttl_boundary() {
        let store = store();
        let opts = DecodeOptions::default();
        let decoder = Decoder::new(&store);

        let at_now = signed(&json!({"ttl": NOW}), "client", &store);
        assert!(decoder.decode_at::<SignedDataBase>(&at_now, &opts, NOW).is_ok());

        let past = signed(&json!({"ttl": NOW - 1}), "client", &store);
        assert_eq!(
            decoder.decode_at::<SignedDataBase>(&past, &opts, NOW).unwrap_err(),
            DecodeError::session_expired()
        );

        let never = signed(&json!({"ttl": -1}), "client", &store);
        assert!(decoder.decode_at::<SignedDataBase>(&never, &opts, i64::MAX).is_ok());
    }

    #[test]
    fn direct_service_call_skips_ttl_and_allow_list() {
        let store = store();
        let raw = r#"service.direct.svc-shared.{"uid":5,"cid":2,"ttl":1}"#;
        let opts = DecodeOptions::default().allow(["client"]);

        let session: Session = Decoder::new(&store).decode_at(raw, &opts, NOW).unwrap();
        assert_eq!(session.user_id, 5);
        assert_eq!(session.ttl, 1);
    }

    #[test]
    fn direct_service_call_wrong_key() {
        let store = store();
        let raw = r#"service.direct.guess.{"ttl":-1}"#;
        let err = Decoder::new(&store)
            .decode_text(raw, &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err, DecodeError::wrong_service_key());
    }

    #[test]
    fn direct_service_call_without_configured_secret() {
        let store: SaltStore = [("client", "k1")].into_iter().collect();
        let raw = r#"service.direct.x.{}"#;
        let err = Decoder::new(&store)
            .decode_text(raw, &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err, DecodeError::wrong_service_key());
    }

    #[test]
    fn direct_service_call_returns_text() {
        let store = store();
        let raw = r#"service.direct.svc-shared.{"a":1}"#;
        let text = Decoder::new(&store)
            .decode_text(raw, &DecodeOptions::default())
            .unwrap();
        assert_eq!(text, r#"{"a":1}"#);
    }

    #[test]
    fn base64_flag() {
        let store = store();
        let plain = r#"{"ttl":-1}"#;
        let raw = create_signed_data(plain, "client", &store, Algorithm::Md5, false).unwrap();
        let decoder = Decoder::new(&store);

        let err = decoder
            .decode_at::<SignedDataBase>(&raw, &DecodeOptions::default(), NOW)
            .unwrap_err();
        assert_eq!(err, DecodeError::check_base64());

        let opts = DecodeOptions::default().base64(false);
        let data: SignedDataBase = decoder.decode_at(&raw, &opts, NOW).unwrap();
        assert_eq!(data.ttl(), -1);
    }

    #[test]
    fn empty_base64_payload() {
        let store = store();
        let raw = create_signed_data("", "client", &store, Algorithm::Md5, true).unwrap();
        let err = Decoder::new(&store)
            .decode_text(&raw, &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err, DecodeError::check_base64());
    }

    #[test]
    fn text_mode_returns_decoded_payload() {
        let store = store();
        let raw = create_signed_data("hello", "client", &store, Algorithm::Sha256, true).unwrap();
        let text = Decoder::new(&store)
            .decode_text(&raw, &DecodeOptions::default())
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn empty_json_becomes_empty_object() {
        let store = store();
        let decoder = Decoder::new(&store);
        for payload in ["null", "[]", "{}", "false", "0"] {
            let raw = create_signed_data(payload, "client", &store, Algorithm::Md5, true).unwrap();
            let data: SignedDataBase = decoder
                .decode_at(&raw, &DecodeOptions::default(), NOW)
                .unwrap_or_else(|e| panic!("{payload}: {e}"));
            assert!(data.raw.is_empty());
            assert_eq!(data.ttl(), TTL_NEVER);
        }
    }

    #[test]
    fn json_too_deep() {
        let store = store();
        let deep = json!({"a": {"b": {"c": [1]}}});
        let raw = signed(&deep, "client", &store);
        let decoder = Decoder::new(&store);

        let opts = DecodeOptions::default().json_depth(3);
        assert_eq!(
            decoder.decode_at::<SignedDataBase>(&raw, &opts, NOW).unwrap_err(),
            DecodeError::wrong_json()
        );

        let opts = DecodeOptions::default().json_depth(4);
        assert!(decoder.decode_at::<SignedDataBase>(&raw, &opts, NOW).is_ok());
    }

    #[test]
    fn record_shape_mismatch() {
        let store = store();
        let raw = signed(&json!({"uid": "not-a-number", "cid": 1}), "client", &store);
        let err = Decoder::new(&store)
            .decode_at::<Session>(&raw, &DecodeOptions::default(), NOW)
            .unwrap_err();
        assert_eq!(err, DecodeError::wrong_json());
    }

    #[test]
    fn non_integer_ttl_is_rejected() {
        let store = store();
        let decoder = Decoder::new(&store);
        let opts = DecodeOptions::default();
        for ttl in [json!(1.0), json!("1"), json!(1_600_000_000.5)] {
            let raw = signed(&json!({"uid": 1, "ttl": ttl}), "client", &store);
            assert_eq!(
                decoder.decode_at::<SignedDataBase>(&raw, &opts, NOW).unwrap_err(),
                DecodeError::wrong_json()
            );
        }
    }

    #[test]
    fn custom_record_type() {
        #[derive(Debug, Deserialize)]
        struct Download {
            file: String,
            expires: i64,
        }

        impl SignedPayload for Download {
            fn ttl(&self) -> i64 {
                self.expires
            }
        }

        let opts = DecodeOptions::default();
        let store: SaltStore = [("public", "pb")].into_iter().collect();
        let raw = signed(&json!({"file": "a.pdf", "expires": NOW + 60}), "public", &store);
        let download: Download = Decoder::new(&store).decode_at(&raw, &opts, NOW).unwrap();
        assert_eq!(download.file, "a.pdf");
        assert_eq!(
            Decoder::new(&store)
                .decode_at::<Download>(&raw, &opts, NOW + 61)
                .unwrap_err(),
            DecodeError::session_expired()
        );
    }

    #[test]
    fn depth_counts_containers() {
        assert_eq!(json_depth(&json!(1)), 0);
        assert_eq!(json_depth(&json!([])), 1);
        assert_eq!(json_depth(&json!([[1]])), 2);
        assert_eq!(json_depth(&json!({"a": [1, {"b": null}]})), 3);
    }
}
