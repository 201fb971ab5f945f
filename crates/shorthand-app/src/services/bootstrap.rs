// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Builds the `Shorthand` helpers from files and the environment.
//
// Config: the given JSON file, or defaults, then `SHORTHAND_*` overrides.
// Salts: the given JSON file, or `SHORTHAND_SALT_*` variables.

use std::path::Path;

use shorthand_core::ShorthandConfig;
use shorthand_core::error::{Result, ShorthandError};
use shorthand_http::Shorthand;
use shorthand_sign::SaltStore;
use tracing::{info, warn};

/// Prefix of environment variables holding salts.
pub const SALT_ENV_PREFIX: &str = "SHORTHAND_SALT_";

pub fn load_config(path: Option<&Path>) -> Result<ShorthandConfig> {
    let config = match path {
        Some(path) => ShorthandConfig::load(path)?,
        None => ShorthandConfig::default(),
    };
    config.apply_env()
}

pub fn load_salts(path: Option<&Path>) -> Result<SaltStore> {
    let salts = match path {
        Some(path) => SaltStore::load(path)?,
        None => SaltStore::from_env(SALT_ENV_PREFIX),
    };
    if salts.is_empty() {
        return Err(ShorthandError::Config(format!(
            "no salts configured (use --salts or {SALT_ENV_PREFIX}<NAME> variables)"
        )));
    }
    Ok(salts)
}

/// Load everything needed to run a command.
pub fn init(config_path: Option<&Path>, salts_path: Option<&Path>) -> Result<Shorthand> {
    let config = load_config(config_path)?;
    let salts = load_salts(salts_path)?;

    if config.is_dev() {
        warn!("running in dev mode");
    }
    info!(salts = ?salts, env = ?config.app_env, "shorthand initialised");
    Ok(Shorthand::new(config, salts))
}
