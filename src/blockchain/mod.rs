// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for EVM chains.
//!
//! This module provides functionality for:
//! - Connecting to a JSON-RPC node
//! - Binding ERC-20 contracts from a runtime JSON ABI
//! - Converting smallest-unit amounts to display strings

pub mod client;
pub mod erc20;
pub mod types;
pub mod units;

pub use client::{BalanceSource, ClientError, EvmClient};
pub use erc20::{erc20_abi, load_abi, parse_abi, Erc20Contract, BALANCE_OF};
pub use types::*;
pub use units::{format_units, from_mwei, MWEI_DECIMALS};
