// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::sync::Arc;

use alloy::{json_abi::JsonAbi, primitives::Address};
use serde::{Deserialize, Serialize};

/// EVM network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: String,
    /// Chain ID, if known
    pub chain_id: Option<u64>,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer URL
    pub explorer_url: Option<String>,
}

impl NetworkConfig {
    /// Configuration for an arbitrary RPC endpoint.
    pub fn custom(rpc_url: impl Into<String>) -> Self {
        Self {
            name: "Custom".to_string(),
            chain_id: None,
            rpc_url: rpc_url.into(),
            explorer_url: None,
        }
    }

    /// Ethereum mainnet configuration.
    pub fn ethereum() -> Self {
        Self::preset(
            "Ethereum Mainnet",
            1,
            "https://eth.llamarpc.com",
            "https://etherscan.io",
        )
    }

    /// Ethereum Sepolia testnet configuration.
    pub fn sepolia() -> Self {
        Self::preset(
            "Ethereum Sepolia",
            11155111,
            "https://rpc.sepolia.org",
            "https://sepolia.etherscan.io",
        )
    }

    /// Avalanche C-Chain mainnet configuration.
    pub fn avalanche() -> Self {
        Self::preset(
            "Avalanche C-Chain",
            43114,
            "https://api.avax.network/ext/bc/C/rpc",
            "https://snowtrace.io",
        )
    }

    /// Avalanche Fuji testnet configuration.
    pub fn fuji() -> Self {
        Self::preset(
            "Avalanche Fuji Testnet",
            43113,
            "https://api.avax-test.network/ext/bc/C/rpc",
            "https://testnet.snowtrace.io",
        )
    }

    /// Look up a preset by its short name (case-insensitive).
    pub fn by_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ethereum" | "mainnet" => Some(Self::ethereum()),
            "sepolia" => Some(Self::sepolia()),
            "avalanche" | "avax" => Some(Self::avalanche()),
            "fuji" => Some(Self::fuji()),
            _ => None,
        }
    }

    fn preset(name: &str, chain_id: u64, rpc_url: &str, explorer_url: &str) -> Self {
        Self {
            name: name.to_string(),
            chain_id: Some(chain_id),
            rpc_url: rpc_url.to_string(),
            explorer_url: Some(explorer_url.to_string()),
        }
    }
}

/// A token contract resolved for a call: parsed address plus its interface.
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    pub address: Address,
    pub abi: Arc<JsonAbi>,
}

/// Token balance as printed by the command-line tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Network name
    pub network: String,
    /// Queried account
    pub account: String,
    /// Token contract address
    pub contract_address: String,
    /// Chain head when the query was issued
    pub block_number: u64,
    /// Balance in display units (`mwei` scale)
    pub balance: String,
}
