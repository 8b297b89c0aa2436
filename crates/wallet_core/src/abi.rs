//! Contract interface artifacts and call encoding.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi, StateMutability};
use serde::Deserialize;
use shared::domain::{Bytes, U256};
use thiserror::Error;

const BUNDLED_ARTIFACT: &str = include_str!("../artifacts/NFTCollectible.json");

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read contract artifact '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed contract artifact: {0}")]
    Json(#[from] serde_json::Error),
    #[error("contract artifact declares no functions")]
    NoFunctions,
}

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("contract interface has no function named {0}")]
    UnknownFunction(String),
    #[error("no overload of {function} takes {actual} argument(s)")]
    ArgumentCount { function: String, actual: usize },
    #[error("{0} is not payable")]
    NotPayable(String),
    #[error("failed to encode {function}: {source}")]
    Encode {
        function: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactDocument {
    Compiled {
        abi: JsonAbi,
        #[serde(rename = "contractName", default)]
        contract_name: Option<String>,
    },
    Bare(JsonAbi),
}

/// Parsed interface description of a deployed contract.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    contract_name: Option<String>,
    abi: JsonAbi,
}

impl ContractArtifact {
    /// Accepts a compiler artifact (`{"contractName": .., "abi": [..]}`) or a bare abi array.
    pub fn from_json(raw: &str) -> Result<Self, ArtifactError> {
        let (contract_name, abi) = match serde_json::from_str::<ArtifactDocument>(raw)? {
            ArtifactDocument::Compiled { abi, contract_name } => (contract_name, abi),
            ArtifactDocument::Bare(abi) => (None, abi),
        };
        if abi.functions().next().is_none() {
            return Err(ArtifactError::NoFunctions);
        }
        Ok(Self { contract_name, abi })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn bundled() -> Result<Self, ArtifactError> {
        Self::from_json(BUNDLED_ARTIFACT)
    }

    pub fn contract_name(&self) -> Option<&str> {
        self.contract_name.as_deref()
    }

    /// The overload of `name` that takes `arity` arguments.
    pub fn function(&self, name: &str, arity: usize) -> Result<&Function, AbiError> {
        self.abi
            .function(name)
            .ok_or_else(|| AbiError::UnknownFunction(name.to_string()))?
            .iter()
            .find(|function| function.inputs.len() == arity)
            .ok_or_else(|| AbiError::ArgumentCount {
                function: name.to_string(),
                actual: arity,
            })
    }

    /// Selector-prefixed calldata for `name(args)`, sent with `value` wei attached.
    pub fn encode_call(
        &self,
        name: &str,
        args: &[DynSolValue],
        value: U256,
    ) -> Result<Bytes, AbiError> {
        let function = self.function(name, args.len())?;
        if !value.is_zero() && function.state_mutability != StateMutability::Payable {
            return Err(AbiError::NotPayable(function.signature()));
        }
        function
            .abi_encode_input(args)
            .map(Bytes::from)
            .map_err(|source| AbiError::Encode {
                function: function.signature(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{hex, Address};

    use super::*;

    const TRANSFER_ABI: &str = r#"[{
        "type": "function",
        "name": "transfer",
        "inputs": [
            {"name": "to", "type": "address", "internalType": "address"},
            {"name": "amount", "type": "uint256", "internalType": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool", "internalType": "bool"}],
        "stateMutability": "nonpayable"
    }]"#;

    #[test]
    fn bundled_artifact_exposes_mint_and_burn() {
        let artifact = ContractArtifact::bundled().expect("bundled artifact");
        assert_eq!(artifact.contract_name(), Some("NFTCollectible"));

        let mint = artifact.function("mintNFTs", 1).expect("mint");
        assert_eq!(mint.state_mutability, StateMutability::Payable);
        assert_eq!(mint.signature(), "mintNFTs(uint256)");

        let burn = artifact.function("burnNFTs", 0).expect("burn");
        assert_eq!(burn.state_mutability, StateMutability::NonPayable);
    }

    #[test]
    fn mint_call_is_selector_plus_one_word() {
        let artifact = ContractArtifact::bundled().expect("bundled artifact");
        let selector = artifact.function("mintNFTs", 1).expect("mint").selector();

        let data = artifact
            .encode_call(
                "mintNFTs",
                &[DynSolValue::Uint(U256::from(1u64), 256)],
                U256::from(10_000_000_000_000_000u64),
            )
            .expect("encode");
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], selector.as_slice());
        assert!(data[4..35].iter().all(|byte| *byte == 0));
        assert_eq!(data[35], 1);
    }

    #[test]
    fn transfer_selector_matches_known_value() {
        let artifact = ContractArtifact::from_json(TRANSFER_ABI).expect("artifact");
        assert_eq!(artifact.contract_name(), None);

        let to: Address = "0x00000000000000000000000000000000000000ff"
            .parse()
            .expect("address");
        let data = artifact
            .encode_call(
                "transfer",
                &[
                    DynSolValue::Address(to),
                    DynSolValue::Uint(U256::from(2u64), 256),
                ],
                U256::ZERO,
            )
            .expect("encode");
        assert_eq!(hex::encode(&data[..4]), "a9059cbb");
        assert_eq!(data[35], 0xff);
        assert_eq!(data[67], 2);
    }

    #[test]
    fn value_on_non_payable_function_is_rejected() {
        let artifact = ContractArtifact::bundled().expect("bundled artifact");
        assert!(matches!(
            artifact.encode_call("burnNFTs", &[], U256::from(1u64)),
            Err(AbiError::NotPayable(signature)) if signature == "burnNFTs()"
        ));
    }

    #[test]
    fn unknown_functions_and_wrong_arguments_are_rejected() {
        let artifact = ContractArtifact::bundled().expect("bundled artifact");
        assert!(matches!(
            artifact.encode_call("mintAll", &[], U256::ZERO),
            Err(AbiError::UnknownFunction(_))
        ));
        assert!(matches!(
            artifact.encode_call("mintNFTs", &[], U256::ZERO),
            Err(AbiError::ArgumentCount { actual: 0, .. })
        ));
        assert!(matches!(
            artifact.encode_call("mintNFTs", &[DynSolValue::Bool(true)], U256::ZERO),
            Err(AbiError::Encode { .. })
        ));
    }

    #[test]
    fn empty_or_malformed_artifacts_are_rejected() {
        assert!(matches!(
            ContractArtifact::from_json(r#"{"abi": []}"#),
            Err(ArtifactError::NoFunctions)
        ));
        assert!(matches!(
            ContractArtifact::from_json("not json"),
            Err(ArtifactError::Json(_))
        ));
    }
}
