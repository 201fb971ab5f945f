// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signed envelope wire format.
//
//   <salt_name>.<algorithm>.<hash>.<payload>
//
// The string is split on the first three dots, so the payload may contain
// dots. The first three segments must be non-empty and dot-free.

use std::fmt;

use shorthand_core::Algorithm;
use shorthand_core::error::{Result, ShorthandError};

const SEPARATOR: char = '.';

/// A parsed signed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    salt_name: String,
    algorithm: Algorithm,
    hash: String,
    payload: String,
}

impl SignedEnvelope {
    /// Build an envelope, rejecting values the wire format cannot carry.
    pub fn new(
        salt_name: impl Into<String>,
        algorithm: Algorithm,
        hash: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<Self> {
        let salt_name = salt_name.into();
        let hash = hash.into();
        check_segment("salt name", &salt_name)?;
        check_segment("hash", &hash)?;
        Ok(Self {
            salt_name,
            algorithm,
            hash,
            payload: payload.into(),
        })
    }

    /// Parse the wire form. Returns `None` for anything malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(4, SEPARATOR);
        let salt_name = parts.next().filter(|s| !s.is_empty())?;
        let algorithm = parts.next()?.parse::<Algorithm>().ok()?;
        let hash = parts.next().filter(|s| !s.is_empty())?;
        let payload = parts.next()?;
        Some(Self {
            salt_name: salt_name.to_owned(),
            algorithm,
            hash: hash.to_owned(),
            payload: payload.to_owned(),
        })
    }

    pub fn salt_name(&self) -> &str {
        &self.salt_name
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Wire form without the payload, as carried by signed URLs.
    pub fn token(&self) -> String {
        format!("{}{SEPARATOR}{}{SEPARATOR}{}", self.salt_name, self.algorithm, self.hash)
    }

    /// Parse a `salt.algorithm.hash` token.
    pub fn parse_token(token: &str) -> Option<(String, Algorithm, String)> {
        let mut parts = token.split(SEPARATOR);
        let salt_name = parts.next().filter(|s| !s.is_empty())?;
        let algorithm = parts.next()?.parse::<Algorithm>().ok()?;
        let hash = parts.next().filter(|s| !s.is_empty())?;
        if parts.next().is_some() {
            return None;
        }
        Some((salt_name.to_owned(), algorithm, hash.to_owned()))
    }
}

impl fmt::Display for SignedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.token(), self.payload)
    }
}

fn check_segment(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ShorthandError::Envelope(format!("{what} is empty")));
    }
    if value.contains(SEPARATOR) {
        return Err(ShorthandError::Envelope(format!(
            "{what} must not contain `{SEPARATOR}`"
        )));
    }
    Ok(())
}
