// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Endpoint-facing helpers: pull a signed string out of a request and hand
// it to the decoder, sign outgoing data and URLs, read JSON bodies.
//
// `Shorthand` holds only read-only state and can be shared across request
// handlers behind an `Arc`.

use serde::Serialize;
use serde_json::Value;
use shorthand_core::error::{DecodeError, Result};
use shorthand_core::{Algorithm, ShorthandConfig, SignedPayload};
use shorthand_sign::{
    DecodeOptions, Decoder, SaltStore, UrlPolicy, check_signed_url, create_signed_data,
    create_signed_json, create_signed_url, parse_json,
};
use tracing::{debug, instrument};

use crate::request::RequestContext;

/// Where a signed string is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedSource<'a> {
    /// Raw POST body, or a named form field.
    Post(Option<&'a str>),
    /// A request header; `None` uses the configured header name.
    Header(Option<&'a str>),
    /// A cookie; `None` uses the configured cookie name.
    Cookie(Option<&'a str>),
}

/// Signed-data helpers bound to a configuration and salt store.
#[derive(Debug, Clone)]
pub struct Shorthand {
    config: ShorthandConfig,
    salts: SaltStore,
}

impl Shorthand {
    pub fn new(config: ShorthandConfig, salts: SaltStore) -> Self {
        Self { config, salts }
    }

    pub fn config(&self) -> &ShorthandConfig {
        &self.config
    }

    pub fn salts(&self) -> &SaltStore {
        &self.salts
    }

    pub fn is_dev(&self) -> bool {
        self.config.is_dev()
    }

    /// Default options for this configuration: base64 payloads, no
    /// allow-list, configured JSON depth.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::default().json_depth(self.config.json_max_depth)
    }

    fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.salts)
    }

    // -- Decoding -------------------------------------------------------------

    /// Decode an already extracted signed string.
    pub fn decode_signed_data<T: SignedPayload>(
        &self,
        raw: &str,
        options: &DecodeOptions,
    ) -> std::result::Result<T, DecodeError> {
        self.decoder().decode(raw, options)
    }

    /// Decode an already extracted signed string to its payload text.
    pub fn decode_signed_text(
        &self,
        raw: &str,
        options: &DecodeOptions,
    ) -> std::result::Result<String, DecodeError> {
        self.decoder().decode_text(raw, options)
    }

    /// The signed string found at `source`, or `""` when absent.
    pub fn signed_raw<'r>(&self, ctx: &'r RequestContext, source: SignedSource<'_>) -> &'r str {
        let found = match source {
            SignedSource::Post(None) => Some(ctx.body()),
            SignedSource::Post(Some(field)) => ctx.form_field(field),
            SignedSource::Header(name) => {
                ctx.header(name.unwrap_or(self.config.sign_header_name.as_str()))
            }
            SignedSource::Cookie(name) => {
                ctx.cookie(name.unwrap_or(self.config.sign_cookie_name.as_str()))
            }
        };
        found.unwrap_or_default()
    }

    #[instrument(skip(self, ctx, options))]
    pub fn decode_from<T: SignedPayload>(
        &self,
        ctx: &RequestContext,
        source: SignedSource<'_>,
        options: &DecodeOptions,
    ) -> std::result::Result<T, DecodeError> {
        self.decode_signed_data(self.signed_raw(ctx, source), options)
    }

    #[instrument(skip(self, ctx, options))]
    pub fn decode_text_from(
        &self,
        ctx: &RequestContext,
        source: SignedSource<'_>,
        options: &DecodeOptions,
    ) -> std::result::Result<String, DecodeError> {
        self.decode_signed_text(self.signed_raw(ctx, source), options)
    }

    /// Decode the POST body (`field == None`) or a form field.
    pub fn decode_signed_post<T: SignedPayload>(
        &self,
        ctx: &RequestContext,
        field: Option<&str>,
        options: &DecodeOptions,
    ) -> std::result::Result<T, DecodeError> {
        self.decode_from(ctx, SignedSource::Post(field), options)
    }

    /// Decode a header; `None` uses the configured header (`X-SDATA`).
    pub fn decode_signed_header<T: SignedPayload>(
        &self,
        ctx: &RequestContext,
        name: Option<&str>,
        options: &DecodeOptions,
    ) -> std::result::Result<T, DecodeError> {
        self.decode_from(ctx, SignedSource::Header(name), options)
    }

    /// Decode a cookie; `None` uses the configured cookie (`x-session`).
    pub fn decode_signed_cookie<T: SignedPayload>(
        &self,
        ctx: &RequestContext,
        name: Option<&str>,
        options: &DecodeOptions,
    ) -> std::result::Result<T, DecodeError> {
        self.decode_from(ctx, SignedSource::Cookie(name), options)
    }

    /// Parse the POST body or a form field as JSON within the configured
    /// depth.
    pub fn post_json(
        &self,
        ctx: &RequestContext,
        field: Option<&str>,
    ) -> std::result::Result<Value, DecodeError> {
        let data = match field {
            None => ctx.body(),
            Some(name) => ctx.form_field(name).unwrap_or_default(),
        };
        if data.is_empty() {
            return Err(DecodeError::empty_data());
        }
        parse_json(data, self.config.json_max_depth)
    }

    // -- Signing --------------------------------------------------------------

    pub fn create_signed_data(
        &self,
        text: &str,
        salt_name: &str,
        algorithm: Algorithm,
        is_base64: bool,
    ) -> Result<String> {
        create_signed_data(text, salt_name, &self.salts, algorithm, is_base64)
    }

    pub fn create_signed_json<T: Serialize + ?Sized>(
        &self,
        data: &T,
        salt_name: &str,
        algorithm: Algorithm,
        is_base64: bool,
    ) -> Result<String> {
        create_signed_json(data, salt_name, &self.salts, algorithm, is_base64)
    }

    /// Sign a URL using the configured signature parameter.
    pub fn create_signed_url(
        &self,
        url: &str,
        salt_name: &str,
        algorithm: Algorithm,
    ) -> Result<String> {
        create_signed_url(
            url,
            salt_name,
            &self.salts,
            algorithm,
            &self.config.sign_query_param,
        )
    }

    /// Check the signature on `uri`, or on the request URI when `None`.
    pub fn check_signed_url(
        &self,
        ctx: &RequestContext,
        uri: Option<&str>,
        except_params: &[&str],
    ) -> bool {
        let uri = uri.unwrap_or(ctx.uri());
        let valid = check_signed_url(
            uri,
            &self.salts,
            except_params,
            &self.config.sign_query_param,
            &UrlPolicy::from_config(&self.config),
        );
        debug!(valid, "signed URL checked");
        valid
    }
}
