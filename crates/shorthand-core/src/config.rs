// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShorthandError};

/// Environment variable overriding [`ShorthandConfig::app_env`].
pub const ENV_APP_ENV: &str = "SHORTHAND_APP_ENV";
/// Environment variable overriding [`ShorthandConfig::dev_bypass_param`].
pub const ENV_DEV_BYPASS_PARAM: &str = "SHORTHAND_DEV_BYPASS_PARAM";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Dev,
    #[default]
    Prod,
}

impl std::str::FromStr for AppEnv {
    type Err = ShorthandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(ShorthandError::Config(format!(
                "unknown app env `{other}` (expected `dev` or `prod`)"
            ))),
        }
    }
}

/// Settings consumed by the signed-data helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShorthandConfig {
    /// Deployment environment. Only `dev` enables the URL signature bypass.
    pub app_env: AppEnv,
    /// Maximum JSON nesting depth accepted when parsing payloads.
    pub json_max_depth: usize,
    /// Query parameter carrying a URL signature.
    pub sign_query_param: String,
    /// Request header carrying a signed envelope.
    pub sign_header_name: String,
    /// Cookie carrying a signed envelope.
    pub sign_cookie_name: String,
    /// Query flag that skips URL signature checks in dev mode. No bypass
    /// exists while this is unset.
    pub dev_bypass_param: Option<String>,
}

impl Default for ShorthandConfig {
    fn default() -> Self {
        Self {
            app_env: AppEnv::Prod,
            json_max_depth: 6,
            sign_query_param: "s".into(),
            sign_header_name: "X-SDATA".into(),
            sign_cookie_name: "x-session".into(),
            dev_bypass_param: None,
        }
    }
}

impl ShorthandConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.display(), env = ?config.app_env, "config loaded");
        Ok(config)
    }

    /// Apply `SHORTHAND_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` as the environment.
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(env) = lookup(ENV_APP_ENV) {
            self.app_env = env.parse()?;
        }
        if let Some(param) = lookup(ENV_DEV_BYPASS_PARAM) {
            self.dev_bypass_param = Some(param).filter(|p| !p.is_empty());
        }
        self.validate()?;
        Ok(self)
    }

    pub fn is_dev(&self) -> bool {
        self.app_env == AppEnv::Dev
    }

    fn validate(&self) -> Result<()> {
        if self.json_max_depth == 0 {
            return Err(ShorthandError::Config("json_max_depth must be positive".into()));
        }
        if self.sign_query_param.is_empty() {
            return Err(ShorthandError::Config("sign_query_param must not be empty".into()));
        }
        Ok(())
    }
}
