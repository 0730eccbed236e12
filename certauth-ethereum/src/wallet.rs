// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The boundary between the form and the wallet that talks to the contract on behalf of
//! the user.

use alloy::primitives::Address;
use async_trait::async_trait;
use certauth_base::data_types::{CertificateHash, CertificateRecord, Submission};

use crate::common::EthereumServiceError;

/// A wallet able to authorize accounts and hand out contract handles.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    type Signer: CertificateSigner;
    type Reader: CertificateReader;

    /// Asks the wallet for the accounts the user is willing to expose.
    ///
    /// The wallet may prompt the user, who may decline.
    async fn request_accounts(&self) -> Result<Vec<Address>, EthereumServiceError>;

    /// Returns a handle that signs transactions as `account`.
    async fn signer(&self, account: Address) -> Result<Self::Signer, EthereumServiceError>;

    /// Returns a read-only handle on the contract.
    async fn reader(&self) -> Result<Self::Reader, EthereumServiceError>;
}

/// A contract handle bound to a signing account.
#[async_trait]
pub trait CertificateSigner: Send + Sync {
    /// The account that signs the transactions.
    fn account(&self) -> Address;

    /// Sends a `createCertificate` transaction and waits until it is confirmed.
    ///
    /// There is no timeout: a wallet or node that never answers blocks the call.
    async fn create_certificate(
        &self,
        owner_name: &str,
        description: &str,
    ) -> Result<Submission, EthereumServiceError>;
}

/// A read-only contract handle.
#[async_trait]
pub trait CertificateReader: Send + Sync {
    /// Queries `getCertificate`. Unknown hashes yield the contract's zero-valued tuple.
    async fn get_certificate(
        &self,
        certificate_hash: CertificateHash,
    ) -> Result<CertificateRecord, EthereumServiceError>;
}
