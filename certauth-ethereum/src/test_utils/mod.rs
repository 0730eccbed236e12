// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use alloy::primitives::{keccak256, Address};
use async_lock::Mutex;
use async_trait::async_trait;
use certauth_base::data_types::{CertificateHash, CertificateRecord, Submission};
use tokio::sync::Semaphore;

use crate::{
    common::EthereumServiceError,
    wallet::{CertificateReader, CertificateSigner, WalletProvider},
};

/// An in-memory stand-in for the deployed certificate contract.
///
/// Like the real contract, it answers queries for unknown hashes with a zero-valued
/// record instead of an error.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    certificates: BTreeMap<CertificateHash, CertificateRecord>,
    transaction_count: u64,
}

impl MemoryLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stores a new certificate. Every call yields a fresh hash, even for identical inputs.
    pub async fn create_certificate(
        &self,
        owner: Address,
        owner_name: &str,
        description: &str,
    ) -> Submission {
        let mut state = self.state.lock().await;
        state.transaction_count += 1;
        let nonce = state.transaction_count.to_be_bytes();

        let mut preimage = owner.to_vec();
        preimage.extend_from_slice(&nonce);
        preimage.extend_from_slice(owner_name.as_bytes());
        preimage.extend_from_slice(description.as_bytes());
        let certificate_hash = CertificateHash(keccak256(&preimage));
        let transaction_hash = keccak256([b"transaction".as_slice(), nonce.as_slice()].concat());

        state.certificates.insert(
            certificate_hash,
            CertificateRecord::new(owner, owner_name, description),
        );
        Submission {
            certificate_hash,
            transaction_hash,
        }
    }

    pub async fn get_certificate(&self, certificate_hash: &CertificateHash) -> CertificateRecord {
        let state = self.state.lock().await;
        state
            .certificates
            .get(certificate_hash)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of certificates created so far.
    pub async fn len(&self) -> usize {
        self.state.lock().await.certificates.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// A wallet over a [`MemoryLedger`].
#[derive(Clone, Debug)]
pub struct MemoryWallet {
    ledger: Arc<MemoryLedger>,
    accounts: Vec<Address>,
    declines_requests: Arc<AtomicBool>,
    authorization_gate: Option<Arc<Semaphore>>,
    confirmation_gate: Option<Arc<Semaphore>>,
}

impl MemoryWallet {
    /// Creates a wallet exposing two accounts.
    pub fn new(ledger: Arc<MemoryLedger>) -> Self {
        Self::with_accounts(
            ledger,
            vec![Address::with_last_byte(1), Address::with_last_byte(2)],
        )
    }

    pub fn with_accounts(ledger: Arc<MemoryLedger>, accounts: Vec<Address>) -> Self {
        MemoryWallet {
            ledger,
            accounts,
            declines_requests: Arc::new(AtomicBool::new(false)),
            authorization_gate: None,
            confirmation_gate: None,
        }
    }

    /// Makes the wallet behave as if the user rejected every prompt.
    pub fn declining(self) -> Self {
        self.set_declining(true);
        self
    }

    /// Changes whether the user rejects prompts. Clones of this wallet share the setting.
    pub fn set_declining(&self, declining: bool) {
        self.declines_requests.store(declining, Ordering::SeqCst);
    }

    /// Holds every account request unanswered until a permit is added to `gate`.
    pub fn with_authorization_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.authorization_gate = Some(gate);
        self
    }

    /// Holds every transaction unconfirmed until a permit is added to `gate`.
    pub fn with_confirmation_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.confirmation_gate = Some(gate);
        self
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    pub fn ledger(&self) -> &Arc<MemoryLedger> {
        &self.ledger
    }
}

#[async_trait]
impl WalletProvider for MemoryWallet {
    type Signer = MemorySigner;
    type Reader = MemoryReader;

    async fn request_accounts(&self) -> Result<Vec<Address>, EthereumServiceError> {
        if let Some(gate) = &self.authorization_gate {
            gate.acquire()
                .await
                .expect("authorization gate should stay open")
                .forget();
        }
        if self.declines_requests.load(Ordering::SeqCst) {
            return Err(EthereumServiceError::UserRejected);
        }
        Ok(self.accounts.clone())
    }

    async fn signer(&self, account: Address) -> Result<MemorySigner, EthereumServiceError> {
        if self.declines_requests.load(Ordering::SeqCst) {
            return Err(EthereumServiceError::UserRejected);
        }
        if !self.accounts.contains(&account) {
            return Err(EthereumServiceError::UnknownAccount(account));
        }
        Ok(MemorySigner {
            account,
            ledger: self.ledger.clone(),
            confirmation_gate: self.confirmation_gate.clone(),
        })
    }

    async fn reader(&self) -> Result<MemoryReader, EthereumServiceError> {
        Ok(MemoryReader {
            ledger: self.ledger.clone(),
        })
    }
}

#[derive(Debug)]
pub struct MemorySigner {
    account: Address,
    ledger: Arc<MemoryLedger>,
    confirmation_gate: Option<Arc<Semaphore>>,
}

#[async_trait]
impl CertificateSigner for MemorySigner {
    fn account(&self) -> Address {
        self.account
    }

    async fn create_certificate(
        &self,
        owner_name: &str,
        description: &str,
    ) -> Result<Submission, EthereumServiceError> {
        if let Some(gate) = &self.confirmation_gate {
            gate.acquire()
                .await
                .expect("confirmation gate should stay open")
                .forget();
        }
        Ok(self
            .ledger
            .create_certificate(self.account, owner_name, description)
            .await)
    }
}

#[derive(Debug)]
pub struct MemoryReader {
    ledger: Arc<MemoryLedger>,
}

#[async_trait]
impl CertificateReader for MemoryReader {
    async fn get_certificate(
        &self,
        certificate_hash: CertificateHash,
    ) -> Result<CertificateRecord, EthereumServiceError> {
        Ok(self.ledger.get_certificate(&certificate_hash).await)
    }
}
