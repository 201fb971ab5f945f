// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CLI subcommands. Each returns the text to print and whether the input was
// accepted.

use shorthand_core::error::Result;
use shorthand_core::{Algorithm, SignedDataBase};
use shorthand_http::{JsonResponse, RequestContext, Shorthand};

/// What a command produced.
#[derive(Debug, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub accepted: bool,
}

impl Outcome {
    fn accepted(output: String) -> Self {
        Self {
            output,
            accepted: true,
        }
    }

    fn rejected(output: String) -> Self {
        Self {
            output,
            accepted: false,
        }
    }
}

pub fn sign(
    sh: &Shorthand,
    data: &str,
    salt_name: &str,
    algorithm: Algorithm,
    plain: bool,
) -> Result<Outcome> {
    let raw = sh.create_signed_data(data, salt_name, algorithm, !plain)?;
    Ok(Outcome::accepted(raw))
}

pub fn decode(
    sh: &Shorthand,
    raw: &str,
    allow: &[String],
    plain: bool,
    text: bool,
) -> Result<Outcome> {
    let options = sh
        .decode_options()
        .base64(!plain)
        .allow(allow.iter().cloned());

    if text {
        return Ok(match sh.decode_signed_text(raw, &options) {
            Ok(output) => Outcome::accepted(output),
            Err(err) => Outcome::rejected(JsonResponse::error(&err).body),
        });
    }

    Ok(match sh.decode_signed_data::<SignedDataBase>(raw, &options) {
        Ok(data) => Outcome::accepted(serde_json::to_string_pretty(&data)?),
        Err(err) => Outcome::rejected(JsonResponse::error(&err).body),
    })
}

pub fn sign_url(sh: &Shorthand, url: &str, salt_name: &str, algorithm: Algorithm) -> Result<Outcome> {
    Ok(Outcome::accepted(sh.create_signed_url(url, salt_name, algorithm)?))
}

pub fn check_url(sh: &Shorthand, uri: &str, except: &[String]) -> Outcome {
    let except: Vec<&str> = except.iter().map(String::as_str).collect();
    let ctx = RequestContext::new().with_uri(uri);
    if sh.check_signed_url(&ctx, None, &except) {
        Outcome::accepted("valid".into())
    } else {
        Outcome::rejected("invalid".into())
    }
}
