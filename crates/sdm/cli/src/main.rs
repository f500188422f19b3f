//! Command-line verifier for NTAG 424 DNA SUN messages
//!
//! Validates either the three mirrored hex fields or a full scanned URL and
//! prints the outcome as JSON. Exits with a failure status when the message
//! does not validate.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eyre::WrapErr;
use nexum_sdm::{DerivationMode, ModePolicy, SunValidator};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use url::Url;

mod config;
mod response;
mod scan;

use config::{Overrides, load_config};
use response::Response;
use scan::SunParams;

#[derive(Parser)]
#[command(version, about = "Verify NTAG 424 DNA Secure Dynamic Messaging (SUN) messages")]
struct Cli {
    /// Configuration file (defaults to ./sdm.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master key in hex, overriding the configuration file
    #[arg(long, env = "SDM_MASTER_KEY", hide_env_values = true)]
    master_key: Option<String>,

    /// Key diversification strategy, overriding the configuration file
    #[arg(long, value_enum)]
    derive_mode: Option<DerivationMode>,

    /// Accept only LRP-authenticated messages (`--require-lrp=false` lifts a configured requirement)
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    require_lrp: Option<bool>,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the mirrored hex fields of a SUN message
    Validate {
        /// Tag UID (7 bytes hex)
        #[arg(long)]
        uid: String,

        /// Read counter (3 bytes hex, big-endian)
        #[arg(long)]
        ctr: String,

        /// Truncated SDMMAC (8 bytes hex)
        #[arg(long)]
        cmac: String,
    },

    /// Validate the SUN message carried by a scanned URL
    Url {
        /// URL served by the tag
        #[arg(required = true)]
        url: Url,
    },
}

fn main() -> eyre::Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let overrides = Overrides {
        master_key: cli.master_key,
        derive_mode: cli.derive_mode,
        require_lrp: cli.require_lrp,
    };
    let config =
        load_config(cli.config.as_deref(), &overrides).wrap_err("Failed to load configuration")?;

    info!(
        derive_mode = %config.derive_mode,
        require_lrp = config.require_lrp,
        "Loaded configuration"
    );

    let validator = SunValidator::new(config.master_key, config.derive_mode)
        .with_policy(ModePolicy::from_require_lrp(config.require_lrp));

    let response = match &cli.command {
        Commands::Validate { uid, ctr, cmac } => {
            Response::from(validator.validate_hex(uid, ctr, cmac))
        }
        Commands::Url { url } => match SunParams::from_url(url, &config.params) {
            Some(params) => {
                Response::from(validator.validate_hex(&params.uid, &params.ctr, &params.cmac))
            }
            None => {
                debug!(%url, "Scanned URL lacks SDM parameters");
                Response::missing_parameters()
            }
        },
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Set up logging on stderr, keeping stdout for the JSON response
fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}
