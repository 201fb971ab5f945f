// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shorthand — command-line signing and verification of signed payloads.
//
// Entry point. Initialises logging, loads config and salts, and runs one
// subcommand. Exit codes: 0 accepted, 1 rejected, 2 setup error.

mod commands;
mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shorthand_core::Algorithm;

use commands::Outcome;
use services::bootstrap;

#[derive(Debug, Parser)]
#[command(name = "shorthand", version, about = "Sign and verify Shorthand payloads")]
struct Cli {
    /// JSON config file (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON file of salt name -> secret. Falls back to SHORTHAND_SALT_* variables.
    #[arg(long, global = true)]
    salts: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign a payload and print the envelope.
    Sign {
        /// Salt name to sign with.
        #[arg(long)]
        salt: String,
        #[arg(long, default_value = "md5")]
        algo: Algorithm,
        /// Sign the payload as-is instead of base64-encoding it.
        #[arg(long)]
        plain: bool,
        data: String,
    },
    /// Verify and decode an envelope.
    Decode {
        /// Accepted salt names (repeatable). Empty accepts any.
        #[arg(long)]
        allow: Vec<String>,
        /// The payload is not base64.
        #[arg(long)]
        plain: bool,
        /// Print the payload text instead of parsing it as JSON.
        #[arg(long)]
        text: bool,
        raw: String,
    },
    /// Sign a URL.
    SignUrl {
        #[arg(long)]
        salt: String,
        #[arg(long, default_value = "md5")]
        algo: Algorithm,
        url: String,
    },
    /// Check a signed URL.
    CheckUrl {
        /// Query parameters excluded from the signature (repeatable).
        #[arg(long)]
        except: Vec<String>,
        uri: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let sh = match bootstrap::init(cli.config.as_deref(), cli.salts.as_deref()) {
        Ok(sh) => sh,
        Err(e) => {
            tracing::error!(error = %e, "setup failed");
            return ExitCode::from(2);
        }
    };

    let outcome = match cli.command {
        Command::Sign {
            salt,
            algo,
            plain,
            data,
        } => commands::sign(&sh, &data, &salt, algo, plain),
        Command::Decode {
            allow,
            plain,
            text,
            raw,
        } => commands::decode(&sh, &raw, &allow, plain, text),
        Command::SignUrl { salt, algo, url } => commands::sign_url(&sh, &url, &salt, algo),
        Command::CheckUrl { except, uri } => Ok(commands::check_url(&sh, &uri, &except)),
    };

    match outcome {
        Ok(Outcome { output, accepted }) => {
            println!("{output}");
            if accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::from(2)
        }
    }
}
