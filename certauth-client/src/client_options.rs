// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use alloy_primitives::Address;
use certauth_base::tracing::{LogConfig, LogFormat};
use certauth_ethereum::provider::RpcWalletProvider;

use crate::{
    config::{NetworkConfig, DEFAULT_EXPLORER_TX_URL},
    Error,
};

#[derive(Clone, Debug, clap::Parser)]
#[command(
    name = "certauth",
    version,
    about = "Create certificates on an Ethereum contract and look them up by hash"
)]
pub struct ClientOptions {
    /// Sets the JSON file holding the network configuration
    #[arg(long = "config", env = "CERTAUTH_CONFIG")]
    pub config_path: Option<PathBuf>,

    /// The Ethereum JSON-RPC endpoint. Without one, no wallet is available.
    #[arg(long, env = "CERTAUTH_RPC_URL")]
    pub rpc_url: Option<String>,

    /// The address of the certificate contract.
    #[arg(long, env = "CERTAUTH_CONTRACT_ADDRESS")]
    pub contract_address: Option<Address>,

    /// Private keys of the accounts the wallet exposes. If none is given, the accounts
    /// managed by the node are used.
    #[arg(
        long = "private-key",
        env = "CERTAUTH_PRIVATE_KEY",
        value_delimiter = ',',
        hide_env_values = true
    )]
    pub private_keys: Vec<String>,

    /// The block explorer page of a transaction, without the hash.
    #[arg(long, env = "CERTAUTH_EXPLORER_URL")]
    pub explorer_url: Option<String>,

    /// A fixed gas limit for certificate transactions. Without it, gas is estimated and
    /// a transaction that would revert is refused before being sent.
    #[arg(long, env = "CERTAUTH_GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// The format of log lines: `plain`, `json` or `pretty`.
    #[arg(long, env = "CERTAUTH_LOG_FORMAT", default_value_t)]
    pub log_format: LogFormat,

    /// A directory where a log file is written in addition to the standard error.
    #[arg(long, env = "CERTAUTH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Subcommand. Opens the interactive form if omitted.
    #[command(subcommand)]
    pub command: Option<ClientCommand>,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum ClientCommand {
    /// Print the accounts authorized by the wallet.
    Accounts,

    /// Create a certificate and wait for the transaction to be confirmed.
    Create {
        /// The name of the certificate owner.
        #[arg(long)]
        owner_name: String,

        /// What the certificate certifies.
        #[arg(long)]
        description: String,
    },

    /// Look up a certificate by its hash.
    Get {
        /// The hash emitted when the certificate was created.
        certificate_hash: String,
    },

    /// Open the form and read actions from the standard input.
    Interactive,
}

impl ClientOptions {
    pub fn init() -> Self {
        <ClientOptions as clap::Parser>::parse()
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            format: self.log_format,
            directory: self.log_dir.clone(),
        }
    }

    /// Combines the configuration file with the command line. Command-line values win.
    pub fn network_config(&self) -> Result<NetworkConfig, Error> {
        let file_config = self
            .config_path
            .as_deref()
            .map(NetworkConfig::read)
            .transpose()?;
        let contract_address = self
            .contract_address
            .or(file_config.as_ref().map(|config| config.contract_address))
            .ok_or(Error::NoContractAddress)?;
        let rpc_url = self
            .rpc_url
            .clone()
            .or_else(|| file_config.as_ref().and_then(|config| config.rpc_url.clone()));
        let explorer_tx_url = self
            .explorer_url
            .clone()
            .or_else(|| file_config.map(|config| config.explorer_tx_url))
            .unwrap_or_else(|| DEFAULT_EXPLORER_TX_URL.to_string());
        Ok(NetworkConfig {
            contract_address,
            rpc_url,
            explorer_tx_url,
        })
    }

    /// Creates the wallet, or returns `None` if no RPC endpoint is configured.
    pub fn make_wallet(&self, config: &NetworkConfig) -> Result<Option<RpcWalletProvider>, Error> {
        let Some(rpc_url) = &config.rpc_url else {
            return Ok(None);
        };
        let mut wallet = RpcWalletProvider::new(rpc_url, config.contract_address)?;
        for private_key in &self.private_keys {
            wallet = wallet.with_private_key(private_key)?;
        }
        if let Some(gas_limit) = self.gas_limit {
            wallet = wallet.with_gas_limit(gas_limit);
        }
        Ok(Some(wallet))
    }
}
