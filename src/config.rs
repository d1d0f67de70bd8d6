// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names and defaults for the `token-balance` binary.
//! The library itself takes all of its inputs as arguments.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RPC_URL` | JSON-RPC endpoint, or a preset name (`ethereum`, `sepolia`, `avalanche`, `fuji`) | Required |
//! | `ACCOUNT_ADDRESS` | Account whose balance is queried | Required |
//! | `TOKEN_ADDRESS` | ERC-20 token contract address | Required |
//! | `TOKEN_ABI_PATH` | JSON ABI file (bare array or build artifact) | Built-in ERC-20 ABI |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;

use crate::blockchain::NetworkConfig;

/// JSON-RPC endpoint or network preset name.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Account whose token balance is queried.
pub const ACCOUNT_ADDRESS_ENV: &str = "ACCOUNT_ADDRESS";

/// Token contract address.
pub const TOKEN_ADDRESS_ENV: &str = "TOKEN_ADDRESS";

/// Optional path to the token's JSON ABI.
pub const TOKEN_ABI_PATH_ENV: &str = "TOKEN_ABI_PATH";

/// Logging output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration for one balance query.
#[derive(Debug, Clone)]
pub struct Config {
    pub network: NetworkConfig,
    pub account: String,
    pub token_address: String,
    pub abi_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let rpc = required(RPC_URL_ENV)?;
        let network = NetworkConfig::by_name(&rpc).unwrap_or_else(|| NetworkConfig::custom(rpc));

        let log_format = match lookup(LOG_FORMAT_ENV) {
            None => LogFormat::default(),
            Some(raw) => parse_log_format(&raw)?,
        };

        Ok(Self {
            network,
            account: required(ACCOUNT_ADDRESS_ENV)?,
            token_address: required(TOKEN_ADDRESS_ENV)?,
            abi_path: lookup(TOKEN_ABI_PATH_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_format,
        })
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError::Invalid {
            key: LOG_FORMAT_ENV,
            value: raw.to_string(),
        }),
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable `{0}`")]
    Missing(&'static str),

    #[error("Invalid value for `{key}`: {value}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        (RPC_URL_ENV, "http://localhost:8545"),
        (ACCOUNT_ADDRESS_ENV, "0x1111111111111111111111111111111111111111"),
        (TOKEN_ADDRESS_ENV, "0x5425890298aed601595a70AB815c96711a31Bc65"),
    ];

    #[test]
    fn loads_required_values_with_defaults() {
        let config = Config::from_lookup(lookup(&BASE)).unwrap();
        assert_eq!(config.network, NetworkConfig::custom("http://localhost:8545"));
        assert_eq!(config.account, BASE[1].1);
        assert_eq!(config.token_address, BASE[2].1);
        assert!(config.abi_path.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn resolves_network_presets() {
        let mut vars = BASE.to_vec();
        vars[0] = (RPC_URL_ENV, "fuji");
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.network, NetworkConfig::fuji());
    }

    #[test]
    fn reports_missing_variables() {
        let err = Config::from_lookup(lookup(&BASE[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(TOKEN_ADDRESS_ENV)));

        let mut vars = BASE.to_vec();
        vars[1] = (ACCOUNT_ADDRESS_ENV, "  ");
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ACCOUNT_ADDRESS_ENV)));
    }

    #[test]
    fn parses_optional_values() {
        let mut vars = BASE.to_vec();
        vars.push((TOKEN_ABI_PATH_ENV, "abi/usdc.json"));
        vars.push((LOG_FORMAT_ENV, "JSON"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.abi_path, Some(PathBuf::from("abi/usdc.json")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_log_format() {
        let mut vars = BASE.to_vec();
        vars.push((LOG_FORMAT_ENV, "xml"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: LOG_FORMAT_ENV, .. }));
    }
}
