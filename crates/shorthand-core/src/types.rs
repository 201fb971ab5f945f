// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Shorthand: salt roles, signing algorithms, and the
// records a signed payload can decode into.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Logical salt names. Each maps to a secret in the salt store.
pub mod salt_role {
    pub const PUBLIC: &str = "public";
    pub const SERVICE: &str = "service";
    pub const CLIENT: &str = "client";
    pub const SUPPORT: &str = "support";
    /// Wildcard accepted in allow-lists only; never a secret lookup key.
    pub const ALL: &str = "all";
}

/// TTL value meaning "never expires".
pub const TTL_NEVER: i64 = -1;

/// Signature algorithm carried in an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// HMAC-MD5, hex encoded.
    #[default]
    Md5,
    /// HMAC-SHA256, hex encoded.
    Sha256,
    /// No hashing: the hash slot carries the shared secret itself.
    Direct,
}

impl Algorithm {
    /// Tag used in the envelope wire format.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Direct => "direct",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Unknown algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown signature algorithm `{}`", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            "direct" => Ok(Self::Direct),
            other => Err(UnknownAlgorithm(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoded records
// ---------------------------------------------------------------------------

/// A record that a signed payload can decode into.
///
/// Implementors are built from the payload JSON and expose a TTL as a unix
/// timestamp in seconds. [`TTL_NEVER`] disables expiry.
pub trait SignedPayload: DeserializeOwned {
    fn ttl(&self) -> i64;
}

fn ttl_never() -> i64 {
    TTL_NEVER
}

/// Untyped signed data: the payload object kept as-is.
///
/// A `ttl` key must be an integer or `null`. Anything else fails to
/// deserialize rather than being read as "never expires".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SignedDataBase {
    pub raw: Map<String, Value>,
}

impl<'de> Deserialize<'de> for SignedDataBase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        match raw.get("ttl") {
            None | Some(Value::Null) => {}
            Some(ttl) if ttl.as_i64().is_some() => {}
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "ttl must be an integer, got {other}"
                )));
            }
        }
        Ok(Self { raw })
    }
}

impl SignedDataBase {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

impl SignedPayload for SignedDataBase {
    fn ttl(&self) -> i64 {
        self.raw
            .get("ttl")
            .and_then(Value::as_i64)
            .unwrap_or(TTL_NEVER)
    }
}

/// A user session issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "uid")]
    pub user_id: i64,
    #[serde(rename = "cid")]
    pub client_id: i64,
    #[serde(default = "ttl_never")]
    pub ttl: i64,
}

impl SignedPayload for Session {
    fn ttl(&self) -> i64 {
        self.ttl
    }
}

/// A request wrapper carrying a nested signed blob in `safe`.
///
/// The outer request is decoded first; `safe` is then decoded on its own,
/// typically into a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestModel {
    pub safe: String,
    #[serde(default)]
    pub rid: Option<i64>,
    #[serde(default = "ttl_never")]
    pub ttl: i64,
}

impl RequestModel {
    pub fn safe_data_raw(&self) -> &str {
        &self.safe
    }
}

impl SignedPayload for RequestModel {
    fn ttl(&self) -> i64 {
        self.ttl
    }
}
