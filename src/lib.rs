// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token Balance Watcher
//!
//! Reactive ERC-20 balance fetcher for EVM chains. A [`BalanceWatcher`]
//! binds a token contract from a runtime JSON ABI, calls `balanceOf` for an
//! account whenever its inputs change, and publishes the amount on the
//! fixed `mwei` (10^6) scale.
//!
//! ## Modules
//!
//! - `blockchain` - JSON-RPC client, contract binding, unit conversion
//! - `watcher` - Reactive balance fetcher
//! - `config` - Environment configuration for the CLI
//! - `error` - CLI error type

pub mod blockchain;
pub mod config;
pub mod error;
pub mod watcher;

pub use watcher::{BalanceInputs, BalanceWatcher, CompletionPolicy, FetchError, FetchOutcome};
