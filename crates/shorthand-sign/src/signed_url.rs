// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signed URLs.
//
// The signature covers the canonical form `path?query`, where the query is
// re-encoded as `application/x-www-form-urlencoded` in its original order.
// The token `salt.algorithm.hash` travels in a query parameter.

use shorthand_core::error::{Result, ShorthandError};
use shorthand_core::{Algorithm, ShorthandConfig};
use tracing::{debug, instrument, warn};
use url::Url;
use url::form_urlencoded;

use crate::envelope::SignedEnvelope;
use crate::salt::SaltStore;
use crate::sign::{KeyedHashSigner, SignPrimitive};

/// Default query parameter carrying the signature.
pub const SIGN_QUERY_PARAM: &str = "s";

const BASE: &str = "http://localhost/";

/// When URL checks may be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPolicy {
    pub dev_mode: bool,
    /// Query flag that skips verification, honoured only in dev mode.
    pub dev_bypass_param: Option<String>,
}

impl UrlPolicy {
    pub fn from_config(config: &ShorthandConfig) -> Self {
        Self {
            dev_mode: config.is_dev(),
            dev_bypass_param: config.dev_bypass_param.clone(),
        }
    }

    fn bypassed_by(&self, pairs: &[(String, String)]) -> bool {
        match (&self.dev_bypass_param, self.dev_mode) {
            (Some(flag), true) => pairs.iter().any(|(k, _)| k == flag),
            _ => false,
        }
    }
}

/// Sign `url` (path and query; scheme and host are ignored) and return the
/// canonical URL with the signature appended as `sign_key`.
#[instrument(skip(salts))]
pub fn create_signed_url(
    url: &str,
    salt_name: &str,
    salts: &SaltStore,
    algorithm: Algorithm,
    sign_key: &str,
) -> Result<String> {
    if algorithm == Algorithm::Direct {
        return Err(ShorthandError::Envelope(
            "direct algorithm would expose the secret in a URL".into(),
        ));
    }
    let secret = salts.lookup(salt_name);
    if secret.is_empty() {
        return Err(ShorthandError::MissingSalt(salt_name.to_owned()));
    }

    let (path, mut pairs) = split_uri(url).ok_or_else(|| ShorthandError::InvalidUrl(url.to_owned()))?;
    pairs.retain(|(k, _)| k != sign_key);

    let canonical = canonical_url(&path, &pairs);
    let hash = KeyedHashSigner.sign(&canonical, secret, algorithm);
    let token = SignedEnvelope::new(salt_name, algorithm, hash, "")?.token();

    pairs.push((sign_key.to_owned(), token));
    Ok(canonical_url(&path, &pairs))
}

/// Check the signature of a request URI.
///
/// Parameters in `except_params` are ignored, so they can be added after
/// signing. Returns `false` for anything unsigned or malformed.
#[instrument(skip(salts, policy))]
pub fn check_signed_url(
    uri: &str,
    salts: &SaltStore,
    except_params: &[&str],
    sign_key: &str,
    policy: &UrlPolicy,
) -> bool {
    let Some((path, mut pairs)) = split_uri(uri) else {
        return false;
    };
    if pairs.is_empty() {
        return false;
    }

    if policy.bypassed_by(&pairs) {
        warn!("URL signature check bypassed (dev mode)");
        return true;
    }

    let Some(token) = pairs
        .iter()
        .rev()
        .find(|(k, _)| k == sign_key)
        .map(|(_, v)| v.clone())
    else {
        return false;
    };

    pairs.retain(|(k, _)| k != sign_key && !except_params.contains(&k.as_str()));
    let canonical = canonical_url(&path, &pairs);

    let Some((salt_name, algorithm, hash)) = SignedEnvelope::parse_token(&token) else {
        debug!("malformed URL signature");
        return false;
    };
    if algorithm == Algorithm::Direct {
        return false;
    }

    let valid = KeyedHashSigner.verify(&hash, &canonical, salts.lookup(&salt_name), algorithm);
    if !valid {
        debug!(%salt_name, "URL signature mismatch");
    }
    valid
}

fn split_uri(uri: &str) -> Option<(String, Vec<(String, String)>)> {
    let base = Url::parse(BASE).ok()?;
    let url = base.join(uri).ok()?;
    let pairs = url.query_pairs().into_owned().collect();
    Some((url.path().to_owned(), pairs))
}

fn canonical_url(path: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return path.to_owned();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}
