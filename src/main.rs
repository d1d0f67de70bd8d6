// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use token_balance_watcher::{
    blockchain::{erc20_abi, load_abi, EvmClient, TokenBalance},
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    error::AppError,
    BalanceInputs, BalanceWatcher,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(AppError::from(e).exit_code());
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Balance query failed");
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Logs go to stderr so stdout carries only the JSON result.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(config: Config) -> Result<(), AppError> {
    let abi = match &config.abi_path {
        Some(path) => load_abi(path)?,
        None => erc20_abi()?,
    };
    let abi = Arc::new(abi);
    let client = Arc::new(EvmClient::new(config.network.clone())?);

    // Bind up front so a bad address or interface fails before any RPC.
    let token = client.bind_token(&config.token_address, Arc::clone(&abi))?;
    let block_number = client.get_block_number().await?;

    tracing::info!(
        network = %config.network.name,
        account = %config.account,
        token = %token.descriptor().address,
        block_number,
        "Querying token balance"
    );

    let mut watcher = BalanceWatcher::default();
    let fetch = watcher
        .observe(BalanceInputs::new(
            client,
            config.account.as_str(),
            config.token_address.as_str(),
            abi,
        ))
        .ok_or(AppError::NotReady)?;
    fetch.join().await?;

    let output = TokenBalance {
        network: config.network.name,
        account: config.account,
        contract_address: config.token_address,
        block_number,
        balance: watcher.balance(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
