// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Salt store — named secrets used as signing keys.
//
// Read-only after construction, so a single store can be shared across
// request handlers without locking.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use shorthand_core::error::{Result, ShorthandError};
use shorthand_core::salt_role;
use tracing::{debug, instrument};

/// Mapping of salt name to secret value.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SaltStore {
    salts: HashMap<String, String>,
}

impl SaltStore {
    pub fn new(salts: HashMap<String, String>) -> Self {
        Self { salts }
    }

    /// Read a JSON object of `name -> secret` pairs.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&data)?;
        debug!(salts = store.salts.len(), "salt store loaded");
        Ok(store)
    }

    /// Collect salts from environment variables named `{prefix}{NAME}`.
    ///
    /// `SHORTHAND_SALT_CLIENT=k1` with prefix `SHORTHAND_SALT_` yields the
    /// salt `client`.
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Same as [`SaltStore::from_env`] over an explicit variable list.
    pub fn from_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let salts = vars
            .into_iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(prefix)?;
                (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value))
            })
            .collect();
        Self { salts }
    }

    /// Secret for `name`, or `""` when the name is unknown.
    ///
    /// An empty secret never verifies a signature, so an unknown name fails
    /// the signature check instead of erroring here. The `all` wildcard is
    /// never looked up, even when an entry by that name is configured.
    pub fn lookup(&self, name: &str) -> &str {
        if name == salt_role::ALL {
            return "";
        }
        self.salts.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Secret for the `client` role, which must be configured.
    pub fn client(&self) -> Result<&str> {
        self.salts
            .get(salt_role::CLIENT)
            .map(String::as_str)
            .ok_or_else(|| ShorthandError::MissingSalt(salt_role::CLIENT.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.salts.contains_key(name)
    }

    /// Configured salt names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.salts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.salts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.salts.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SaltStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            salts: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for SaltStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("SaltStore").field("names", &names).finish()
    }
}
