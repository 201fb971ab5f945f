// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// shorthand-sign — signed payloads for web endpoints.
//
// Salt store, keyed-hash signatures, the envelope wire format, the decoder
// that turns a signed string into a typed record, and signed URLs.

pub mod create;
pub mod decoder;
pub mod envelope;
pub mod salt;
pub mod sign;
pub mod signed_url;

// PUBLIC API: Re-export the signing primitives and decoder
pub use create::{create_signed_data, create_signed_json};
pub use decoder::{DecodeOptions, Decoder, JSON_MAX_DEPTH, parse_json};
pub use envelope::SignedEnvelope;
pub use salt::SaltStore;
pub use sign::{KeyedHashSigner, SignPrimitive};
pub use signed_url::{SIGN_QUERY_PARAM, UrlPolicy, check_signed_url, create_signed_url};
