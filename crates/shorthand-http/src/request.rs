// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request context — the parts of an incoming HTTP request the signed-data
// helpers read. Built explicitly by the server integration.

use std::collections::HashMap;

use url::form_urlencoded;

/// Body, form fields, headers, cookies and URI of one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    body: String,
    form: HashMap<String, String>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    uri: String,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Parse an `application/x-www-form-urlencoded` body into form fields.
    /// The raw body stays available.
    pub fn with_form_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self.form = form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect();
        self
    }

    pub fn with_form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(normalize_header(name), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Parse a `Cookie:` header value (`a=1; b=2`).
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        for pair in header.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    self.cookies.insert(name.to_owned(), value.trim().to_owned());
                }
            }
        }
        self
    }

    /// Request path and query.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    /// Header lookup is case-insensitive and treats `_` like `-`, so
    /// `X_SDATA` and `x-sdata` name the same header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&normalize_header(name)).map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

fn normalize_header(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}
