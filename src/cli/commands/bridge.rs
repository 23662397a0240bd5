//! Global arguments shared by every subcommand: where the backend lives and
//! where the token is kept.

use crate::{config::BridgeConfig, storage::FileStorage};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::{path::PathBuf, time::Duration};

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_ENDPOINT_SIGNUP: &str = "endpoint-signup";
pub const ARG_ENDPOINT_LOGIN: &str = "endpoint-login";
pub const ARG_STORAGE_KEY: &str = "storage-key";
pub const ARG_STORAGE: &str = "storage";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASE_URL)
                .long(ARG_BASE_URL)
                .help("Auth backend base URL; endpoints default to <base>/signup and <base>/login")
                .env("FORMBRIDGE_BASE_URL")
                .default_value(crate::config::DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ENDPOINT_SIGNUP)
                .long(ARG_ENDPOINT_SIGNUP)
                .help("Full signup endpoint URL, overrides --base-url")
                .env("FORMBRIDGE_ENDPOINT_SIGNUP")
                .global(true),
        )
        .arg(
            Arg::new(ARG_ENDPOINT_LOGIN)
                .long(ARG_ENDPOINT_LOGIN)
                .help("Full login endpoint URL, overrides --base-url")
                .env("FORMBRIDGE_ENDPOINT_LOGIN")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STORAGE_KEY)
                .long(ARG_STORAGE_KEY)
                .help("Key the login token is stored under")
                .env("FORMBRIDGE_STORAGE_KEY")
                .default_value(crate::config::DEFAULT_STORAGE_KEY)
                .global(true),
        )
        .arg(
            Arg::new(ARG_STORAGE)
                .long(ARG_STORAGE)
                .help("Storage file path (default: <data dir>/formbridge/storage.json)")
                .env("FORMBRIDGE_STORAGE")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("FORMBRIDGE_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
}

/// Where the token lives. Enough for `token` and `logout`, which never talk
/// to the backend.
#[derive(Debug)]
pub struct StorageOptions {
    pub storage_key: String,
    pub storage_path: PathBuf,
}

impl StorageOptions {
    /// # Errors
    /// Returns an error if no storage path was given and none can be derived.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let storage_key = matches
            .get_one::<String>(ARG_STORAGE_KEY)
            .map_or(crate::config::DEFAULT_STORAGE_KEY, String::as_str)
            .to_string();

        let storage_path = match matches.get_one::<PathBuf>(ARG_STORAGE) {
            Some(path) => path.clone(),
            None => FileStorage::default_path()
                .context("cannot locate the storage file, pass --storage")?,
        };

        Ok(Self {
            storage_key,
            storage_path,
        })
    }
}

/// Everything a form submission needs.
#[derive(Debug)]
pub struct Options {
    pub config: BridgeConfig,
    pub storage_path: PathBuf,
}

impl Options {
    /// Builds the bridge configuration and storage path from global arguments.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or no storage path can be derived.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let base_url = matches
            .get_one::<String>(ARG_BASE_URL)
            .map_or(crate::config::DEFAULT_BASE_URL, String::as_str);
        let mut config = BridgeConfig::with_base_url(base_url)
            .with_context(|| format!("invalid --{ARG_BASE_URL}"))?;

        if let Some(endpoint) = matches.get_one::<String>(ARG_ENDPOINT_SIGNUP) {
            endpoint.clone_into(&mut config.endpoint_signup);
        }
        if let Some(endpoint) = matches.get_one::<String>(ARG_ENDPOINT_LOGIN) {
            endpoint.clone_into(&mut config.endpoint_login);
        }
        if let Some(seconds) = matches.get_one::<u64>(ARG_TIMEOUT) {
            config.timeout = Duration::from_secs(*seconds);
        }

        let storage = StorageOptions::parse(matches)?;
        config.storage_key = storage.storage_key;

        Ok(Self {
            config,
            storage_path: storage.storage_path,
        })
    }
}
