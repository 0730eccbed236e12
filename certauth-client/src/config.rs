// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use alloy_primitives::{hex, Address, B256};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Where transactions are shown when no explorer is configured.
pub const DEFAULT_EXPLORER_TX_URL: &str = "https://sepolia.etherscan.io/tx";

/// The deployment the form talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The address of the certificate contract. It must match the network in use.
    pub contract_address: Address,
    /// The Ethereum JSON-RPC endpoint. Without one, there is no wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// The block explorer page of a transaction, without the hash. Only used for display.
    #[serde(default = "default_explorer_tx_url")]
    pub explorer_tx_url: String,
}

fn default_explorer_tx_url() -> String {
    DEFAULT_EXPLORER_TX_URL.to_string()
}

impl NetworkConfig {
    pub fn new(contract_address: Address) -> Self {
        NetworkConfig {
            contract_address,
            rpc_url: None,
            explorer_tx_url: default_explorer_tx_url(),
        }
    }

    pub fn read(path: &Path) -> Result<Self, Error> {
        let bytes = fs_err::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(self)?;
        fs_err::write(path, json)?;
        Ok(())
    }

    /// Returns the explorer link of a transaction.
    pub fn explorer_link(&self, transaction_hash: &B256) -> String {
        format!(
            "{}/{}",
            self.explorer_tx_url.trim_end_matches('/'),
            hex::encode_prefixed(transaction_hash)
        )
    }
}
