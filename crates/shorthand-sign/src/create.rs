// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Producing signed envelopes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use shorthand_core::Algorithm;
use shorthand_core::error::{Result, ShorthandError};
use tracing::{debug, instrument};

use crate::envelope::SignedEnvelope;
use crate::salt::SaltStore;
use crate::sign::{KeyedHashSigner, SignPrimitive};

/// Sign `text` with the secret named `salt_name`.
///
/// With `is_base64` the text is base64-encoded first and the signature
/// covers the encoded form. [`Algorithm::Direct`] places the secret itself
/// in the hash slot, for trusted service-to-service calls.
#[instrument(skip(text, salts), fields(len = text.len()))]
pub fn create_signed_data(
    text: &str,
    salt_name: &str,
    salts: &SaltStore,
    algorithm: Algorithm,
    is_base64: bool,
) -> Result<String> {
    create_signed_data_with(&KeyedHashSigner, text, salt_name, salts, algorithm, is_base64)
}

/// Serialize `data` as JSON and sign it. See [`create_signed_data`].
pub fn create_signed_json<T: Serialize + ?Sized>(
    data: &T,
    salt_name: &str,
    salts: &SaltStore,
    algorithm: Algorithm,
    is_base64: bool,
) -> Result<String> {
    let text = serde_json::to_string(data)?;
    create_signed_data(&text, salt_name, salts, algorithm, is_base64)
}

/// [`create_signed_data`] with an explicit signer.
pub fn create_signed_data_with<P: SignPrimitive>(
    signer: &P,
    text: &str,
    salt_name: &str,
    salts: &SaltStore,
    algorithm: Algorithm,
    is_base64: bool,
) -> Result<String> {
    let secret = salts.lookup(salt_name);
    if secret.is_empty() {
        return Err(ShorthandError::MissingSalt(salt_name.to_owned()));
    }

    let payload = if is_base64 {
        STANDARD.encode(text)
    } else {
        text.to_owned()
    };
    let hash = signer.sign(&payload, secret, algorithm);
    let envelope = SignedEnvelope::new(salt_name, algorithm, hash, payload)?;

    debug!("signed data created");
    Ok(envelope.to_string())
}
