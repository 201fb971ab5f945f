// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Keyed-hash signatures over payload strings.

use hmac::{Hmac, Mac};
use md5::Md5;
use sha2::Sha256;
use shorthand_core::Algorithm;
use subtle::ConstantTimeEq;

type HmacMd5 = Hmac<Md5>;
type HmacSha256 = Hmac<Sha256>;

/// Produces and checks the hash slot of a signed envelope.
pub trait SignPrimitive {
    /// Hash `payload` under `secret` with `algorithm`.
    ///
    /// For [`Algorithm::Direct`] the "hash" is the secret itself.
    fn sign(&self, payload: &str, secret: &str, algorithm: Algorithm) -> String;

    /// Check `hash` against a freshly computed signature.
    ///
    /// An empty secret never verifies, whatever the algorithm: an unknown
    /// salt resolves to `""` and must not be signable by anyone.
    fn verify(&self, hash: &str, payload: &str, secret: &str, algorithm: Algorithm) -> bool {
        if secret.is_empty() {
            return false;
        }
        let expected = self.sign(payload, secret, algorithm);
        constant_time_eq(expected.as_bytes(), hash.as_bytes())
    }
}

/// HMAC-based signer. This is what every decoder uses unless told otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedHashSigner;

impl SignPrimitive for KeyedHashSigner {
    fn sign(&self, payload: &str, secret: &str, algorithm: Algorithm) -> String {
        match algorithm {
            Algorithm::Md5 => {
                let mut mac =
                    HmacMd5::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
                mac.update(payload.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            Algorithm::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
                    .expect("HMAC accepts any key length");
                mac.update(payload.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            Algorithm::Direct => secret.to_owned(),
        }
    }
}

/// Constant-time byte comparison. Length differences return early.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
