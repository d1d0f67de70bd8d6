// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM JSON-RPC client used as the connection handle for balance queries.

use std::future::Future;
use std::sync::Arc;

use alloy::{
    json_abi::JsonAbi,
    primitives::U256,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use tracing::debug;

use super::erc20::Erc20Contract;
use super::types::NetworkConfig;

/// Anything that can answer a `balanceOf` query for a token contract.
///
/// The balance watcher only talks to the chain through this trait.
pub trait BalanceSource: Send + Sync + 'static {
    /// Bind `contract_address` with `abi` and call `balanceOf(account)`.
    ///
    /// Returns the raw amount in the token's smallest unit.
    fn balance_of(
        &self,
        contract_address: &str,
        abi: Arc<JsonAbi>,
        account: &str,
    ) -> impl Future<Output = Result<U256, ClientError>> + Send;
}

/// HTTP client for an EVM chain.
pub struct EvmClient {
    /// Network configuration
    network: NetworkConfig,
    /// Alloy HTTP provider
    provider: DynProvider,
}

impl EvmClient {
    /// Create a new client for the specified network.
    pub fn new(network: NetworkConfig) -> Result<Self, ClientError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ClientError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        debug!(network = %network.name, rpc_url = %network.rpc_url, "EVM client created");

        Ok(Self { network, provider })
    }

    /// Create a client for an arbitrary RPC endpoint.
    pub fn connect(rpc_url: &str) -> Result<Self, ClientError> {
        Self::new(NetworkConfig::custom(rpc_url))
    }

    /// Get the current block number.
    pub async fn get_block_number(&self) -> Result<u64, ClientError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ClientError::RpcError(e.to_string()))
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Bind a token contract on this client's provider.
    pub fn bind_token(
        &self,
        contract_address: &str,
        abi: Arc<JsonAbi>,
    ) -> Result<Erc20Contract<DynProvider>, ClientError> {
        Erc20Contract::bind(&self.provider, contract_address, abi)
    }
}

impl BalanceSource for EvmClient {
    async fn balance_of(
        &self,
        contract_address: &str,
        abi: Arc<JsonAbi>,
        account: &str,
    ) -> Result<U256, ClientError> {
        let contract = self.bind_token(contract_address, abi)?;
        contract.balance_of(account).await
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid ABI: {0}")]
    InvalidAbi(String),

    #[error("Contract interface has no `{0}` method")]
    MissingMethod(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Unexpected return value from `{method}`: {found}")]
    UnexpectedReturn { method: String, found: String },
}
