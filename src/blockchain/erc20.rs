// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.
//!
//! Contracts are bound at runtime from a JSON ABI rather than from `sol!`
//! bindings, so the caller decides which interface describes the token.
//! The ABI must match the deployed contract; a mismatch either fails the
//! call or decodes the wrong value.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use alloy::{
    contract::{ContractInstance, Interface},
    dyn_abi::DynSolValue,
    json_abi::JsonAbi,
    primitives::{Address, U256},
    providers::Provider,
};

use super::client::ClientError;
use super::types::ContractDescriptor;

/// Name of the balance-query method.
pub const BALANCE_OF: &str = "balanceOf";

/// Human-readable signatures of the built-in ERC-20 interface.
const ERC20_SIGNATURES: [&str; 5] = [
    "function name() external view returns (string)",
    "function symbol() external view returns (string)",
    "function decimals() external view returns (uint8)",
    "function totalSupply() external view returns (uint256)",
    "function balanceOf(address account) external view returns (uint256)",
];

/// The read-only ERC-20 interface, for tokens whose ABI is not at hand.
pub fn erc20_abi() -> Result<JsonAbi, ClientError> {
    JsonAbi::parse(ERC20_SIGNATURES).map_err(|e| ClientError::InvalidAbi(e.to_string()))
}

/// Load a JSON ABI from a file.
///
/// Accepts either a bare ABI array or a build artifact (Hardhat, Foundry,
/// Truffle) that carries the ABI under an `abi` key.
pub fn load_abi(path: impl AsRef<Path>) -> Result<JsonAbi, ClientError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ClientError::InvalidAbi(format!("{}: {}", path.display(), e)))?;
    parse_abi(&raw)
}

/// Parse a JSON ABI from a string (bare array or artifact).
pub fn parse_abi(raw: &str) -> Result<JsonAbi, ClientError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ClientError::InvalidAbi(e.to_string()))?;

    let abi = match value {
        serde_json::Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| ClientError::InvalidAbi("artifact has no `abi` field".to_string()))?,
        other => other,
    };

    serde_json::from_value(abi).map_err(|e| ClientError::InvalidAbi(e.to_string()))
}

/// Token contract bound from a runtime ABI.
pub struct Erc20Contract<P> {
    contract: ContractInstance<P>,
    descriptor: ContractDescriptor,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    /// Bind the contract at `contract_address` using `abi`.
    ///
    /// Fails if the address does not parse or the ABI declares no
    /// `balanceOf` method. Nothing is checked against deployed bytecode.
    pub fn bind(
        provider: &P,
        contract_address: &str,
        abi: Arc<JsonAbi>,
    ) -> Result<Self, ClientError> {
        let address = Address::from_str(contract_address)
            .map_err(|e| ClientError::InvalidAddress(e.to_string()))?;

        if abi.function(BALANCE_OF).is_none() {
            return Err(ClientError::MissingMethod(BALANCE_OF.to_string()));
        }

        let contract =
            ContractInstance::new(address, provider.clone(), Interface::new((*abi).clone()));

        Ok(Self {
            contract,
            descriptor: ContractDescriptor { address, abi },
        })
    }

    /// The bound address and interface.
    pub fn descriptor(&self) -> &ContractDescriptor {
        &self.descriptor
    }

    /// Call `balanceOf(account)` against the latest block.
    ///
    /// Returns the amount in the token's smallest unit.
    pub async fn balance_of(&self, account: &str) -> Result<U256, ClientError> {
        let account = Address::from_str(account)
            .map_err(|e| ClientError::InvalidAddress(e.to_string()))?;

        let output = self
            .contract
            .function(BALANCE_OF, &[DynSolValue::Address(account)])
            .map_err(|e| ClientError::ContractError(e.to_string()))?
            .call()
            .await
            .map_err(|e| ClientError::ContractError(e.to_string()))?;

        decode_amount(output.first())
    }
}

/// Interpret the first return value of `balanceOf` as an integer amount.
fn decode_amount(value: Option<&DynSolValue>) -> Result<U256, ClientError> {
    match value {
        Some(DynSolValue::Uint(amount, _)) => Ok(*amount),
        Some(DynSolValue::Int(amount, _)) if !amount.is_negative() => Ok(amount.into_raw()),
        Some(other) => Err(ClientError::UnexpectedReturn {
            method: BALANCE_OF.to_string(),
            found: format!("{other:?}"),
        }),
        None => Err(ClientError::UnexpectedReturn {
            method: BALANCE_OF.to_string(),
            found: "no value".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use alloy::primitives::I256;

    use super::*;

    const BALANCE_ONLY_ABI: &str = r#"[
        {
            "type": "function",
            "name": "balanceOf",
            "stateMutability": "view",
            "inputs": [{ "name": "account", "type": "address" }],
            "outputs": [{ "name": "", "type": "uint256" }]
        }
    ]"#;

    #[test]
    fn test_builtin_abi_declares_balance_of() {
        let abi = erc20_abi().unwrap();
        let functions = abi.function(BALANCE_OF).unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].inputs.len(), 1);
        assert!(abi.function("decimals").is_some());
        assert!(abi.function("transfer").is_none());
    }

    #[test]
    fn test_parse_bare_abi_array() {
        let abi = parse_abi(BALANCE_ONLY_ABI).unwrap();
        assert!(abi.function(BALANCE_OF).is_some());
    }

    #[test]
    fn test_parse_artifact() {
        let artifact = format!(r#"{{ "contractName": "Token", "abi": {BALANCE_ONLY_ABI} }}"#);
        let abi = parse_abi(&artifact).unwrap();
        assert!(abi.function(BALANCE_OF).is_some());
    }

    #[test]
    fn test_parse_artifact_without_abi() {
        let err = parse_abi(r#"{ "bytecode": "0x" }"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidAbi(_)));
    }

    #[test]
    fn test_load_abi_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BALANCE_ONLY_ABI.as_bytes()).unwrap();

        let abi = load_abi(file.path()).unwrap();
        assert!(abi.function(BALANCE_OF).is_some());

        let missing = load_abi(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(missing, ClientError::InvalidAbi(_)));
    }

    #[test]
    fn test_decode_amount() {
        let amount = U256::from(1_500_000u64);
        assert_eq!(
            decode_amount(Some(&DynSolValue::Uint(amount, 256))).unwrap(),
            amount
        );

        let signed = I256::from_raw(U256::from(42u64));
        assert_eq!(
            decode_amount(Some(&DynSolValue::Int(signed, 256))).unwrap(),
            U256::from(42u64)
        );

        let negative = I256::MINUS_ONE;
        assert!(decode_amount(Some(&DynSolValue::Int(negative, 256))).is_err());
        assert!(decode_amount(Some(&DynSolValue::Bool(true))).is_err());
        assert!(decode_amount(None).is_err());
    }
}
