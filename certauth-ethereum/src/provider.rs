// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    network::{EthereumWallet, ReceiptResponse as _},
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use certauth_base::{
    data_types::{CertificateHash, CertificateRecord, Submission},
    ensure,
};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    common::EthereumServiceError,
    contract::{
        certificate_hash_from_logs, CertificateAuthenticator,
        CertificateAuthenticator::CertificateAuthenticatorInstance,
    },
    wallet::{CertificateReader, CertificateSigner, WalletProvider},
};

/// A wallet backed by an Ethereum JSON-RPC endpoint.
///
/// Accounts are either local private keys, or, if none were given, the accounts
/// managed by the node itself (as with development nodes).
#[derive(Debug)]
pub struct RpcWalletProvider {
    url: Url,
    contract_address: Address,
    signers: Vec<PrivateKeySigner>,
    gas_limit: Option<u64>,
}

impl RpcWalletProvider {
    /// Creates a wallet for the contract deployed at `contract_address`. No connection
    /// is made until an account or a contract handle is requested.
    pub fn new(url: &str, contract_address: Address) -> Result<Self, EthereumServiceError> {
        let url = Url::parse(url)?;
        Ok(Self {
            url,
            contract_address,
            signers: Vec::new(),
            gas_limit: None,
        })
    }

    /// Adds a local account from its hex-encoded private key.
    pub fn with_private_key(self, private_key: &str) -> Result<Self, EthereumServiceError> {
        let signer = private_key.trim().parse::<PrivateKeySigner>()?;
        Ok(self.with_signer(signer))
    }

    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.signers.push(signer);
        self
    }

    /// Sends every transaction with `gas_limit` instead of an estimate. A transaction that
    /// reverts is then mined and reported as [`EthereumServiceError::TransactionReverted`].
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }

    fn read_only_provider(&self) -> DynProvider {
        ProviderBuilder::new()
            .connect_http(self.url.clone())
            .erased()
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    type Signer = RpcCertificateSigner;
    type Reader = RpcCertificateReader;

    async fn request_accounts(&self) -> Result<Vec<Address>, EthereumServiceError> {
        if !self.signers.is_empty() {
            return Ok(self.signers.iter().map(|signer| signer.address()).collect());
        }
        Ok(self.read_only_provider().get_accounts().await?)
    }

    async fn signer(&self, account: Address) -> Result<RpcCertificateSigner, EthereumServiceError> {
        let provider = match self.signers.iter().find(|signer| signer.address() == account) {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(self.url.clone())
                .erased(),
            None => {
                let provider = self.read_only_provider();
                let accounts = provider.get_accounts().await?;
                ensure!(
                    accounts.contains(&account),
                    EthereumServiceError::UnknownAccount(account)
                );
                provider
            }
        };
        Ok(RpcCertificateSigner {
            account,
            gas_limit: self.gas_limit,
            contract: CertificateAuthenticator::new(self.contract_address, provider),
        })
    }

    async fn reader(&self) -> Result<RpcCertificateReader, EthereumServiceError> {
        Ok(RpcCertificateReader {
            contract: CertificateAuthenticator::new(
                self.contract_address,
                self.read_only_provider(),
            ),
        })
    }
}

#[derive(Debug)]
pub struct RpcCertificateSigner {
    account: Address,
    gas_limit: Option<u64>,
    contract: CertificateAuthenticatorInstance<DynProvider>,
}

#[async_trait]
impl CertificateSigner for RpcCertificateSigner {
    fn account(&self) -> Address {
        self.account
    }

    #[instrument(skip(self), fields(account = %self.account))]
    async fn create_certificate(
        &self,
        owner_name: &str,
        description: &str,
    ) -> Result<Submission, EthereumServiceError> {
        let mut call = self
            .contract
            .createCertificate(owner_name.to_string(), description.to_string())
            .from(self.account);
        if let Some(gas_limit) = self.gas_limit {
            call = call.gas(gas_limit);
        }
        let pending = call.send().await?;
        let transaction_hash = *pending.tx_hash();
        debug!(%transaction_hash, "Waiting for the transaction to be confirmed");
        let receipt = pending.get_receipt().await?;
        ensure!(
            receipt.status(),
            EthereumServiceError::TransactionReverted(transaction_hash)
        );
        let certificate_hash = certificate_hash_from_logs(receipt.inner.logs())?;
        Ok(Submission {
            certificate_hash,
            transaction_hash,
        })
    }
}

pub struct RpcCertificateReader {
    contract: CertificateAuthenticatorInstance<DynProvider>,
}

#[async_trait]
impl CertificateReader for RpcCertificateReader {
    #[instrument(skip(self))]
    async fn get_certificate(
        &self,
        certificate_hash: CertificateHash,
    ) -> Result<CertificateRecord, EthereumServiceError> {
        let certificate = self
            .contract
            .getCertificate(certificate_hash.into())
            .call()
            .await?;
        Ok(certificate.into())
    }
}
