// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The certificate form.
//!
//! A [`CertificateForm`] holds what the user typed and what the wallet and the contract
//! answered. Each user action maps to one operation that makes at most one call through
//! the [`WalletProvider`]. The state lock is never held across that call, so several
//! operations may be in flight at once. Nothing prevents a second submission while a
//! first one is pending: both create a certificate, and the last one to complete is
//! displayed.
//!
//! An operation that completes after a [`CertificateForm::disconnect`] still returns its
//! outcome to the caller, but leaves the displayed state untouched.

use std::{fmt, sync::Arc};

use alloy_primitives::{hex::FromHexError, Address};
use async_lock::Mutex;
use certauth_base::data_types::{CertificateHash, CertificateRecord, Submission};
use certauth_ethereum::{
    common::EthereumServiceError,
    wallet::{CertificateReader as _, CertificateSigner as _, WalletProvider},
};
use tracing::{debug, info, warn};

/// Why an operation of the form failed.
#[derive(Clone, Debug, thiserror::Error)]
pub enum FormError {
    #[error("no wallet found")]
    WalletNotFound,
    #[error("no account is connected")]
    NotConnected,
    #[error("the wallet did not authorize any account")]
    NoAccounts,
    #[error("invalid certificate hash {input:?}: {error}")]
    InvalidCertificateHash {
        input: String,
        #[source]
        error: FromHexError,
    },
    #[error(transparent)]
    Ethereum(Arc<EthereumServiceError>),
}

impl From<EthereumServiceError> for FormError {
    fn from(error: EthereumServiceError) -> Self {
        FormError::Ethereum(Arc::new(error))
    }
}

/// The progress of one kind of operation.
#[derive(Clone, Debug)]
pub enum OperationState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(FormError),
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        OperationState::Idle
    }
}

impl<T> OperationState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, OperationState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OperationState::Pending)
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            OperationState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FormError> {
        match self {
            OperationState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// A message for the user that does not belong to a single operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    WalletNotFound,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WalletNotFound => {
                write!(f, "Wallet not found! Configure an RPC endpoint to connect.")
            }
        }
    }
}

/// Everything the form displays.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    /// The connected account. Only a successful connection changes it, and only
    /// [`CertificateForm::disconnect`] clears it.
    pub account: Option<Address>,
    /// The last connection attempt.
    pub connection: OperationState<Address>,
    pub owner_name: String,
    pub description: String,
    /// The result of the last submission to complete.
    pub submission: OperationState<Submission>,
    /// The number of submissions still waiting for confirmation.
    pub in_flight_submissions: usize,
    /// The certificate hash field. It is both the lookup input and the place where a
    /// freshly created hash is shown.
    pub lookup_query: String,
    pub retrieval: OperationState<CertificateRecord>,
    pub notice: Option<Notice>,
}

impl FormState {
    pub fn account(&self) -> Option<Address> {
        self.account
    }
}

pub struct CertificateForm<W> {
    wallet: Option<W>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    state: FormState,
    /// Incremented by every disconnection.
    generation: u64,
}

impl Inner {
    /// Returns the state to update with the outcome of an operation started during
    /// `generation`, or `None` if the form was disconnected since.
    fn state_since(&mut self, generation: u64) -> Option<&mut FormState> {
        if self.generation == generation {
            Some(&mut self.state)
        } else {
            debug!("Discarding the outcome of an operation started before a disconnection");
            None
        }
    }
}

impl<W> CertificateForm<W>
where
    W: WalletProvider,
{
    /// Creates an empty form. `None` stands for an environment without a wallet.
    pub fn new(wallet: Option<W>) -> Self {
        CertificateForm {
            wallet,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_wallet(wallet: W) -> Self {
        Self::new(Some(wallet))
    }

    pub fn without_wallet() -> Self {
        Self::new(None)
    }

    /// Returns a snapshot of the displayed state.
    pub async fn state(&self) -> FormState {
        self.inner.lock().await.state.clone()
    }

    pub async fn set_owner_name(&self, owner_name: impl Into<String>) {
        self.inner.lock().await.state.owner_name = owner_name.into();
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.inner.lock().await.state.description = description.into();
    }

    pub async fn set_lookup_query(&self, query: impl Into<String>) {
        self.inner.lock().await.state.lookup_query = query.into();
    }

    /// Asks the wallet for access and connects its first account.
    ///
    /// Without a wallet, only the [`Notice::WalletNotFound`] notice is raised and
    /// `Ok(None)` is returned. A failed attempt keeps the account already connected, if
    /// any.
    pub async fn connect(&self) -> Result<Option<Address>, FormError> {
        let Some(wallet) = &self.wallet else {
            warn!("No wallet found");
            self.inner.lock().await.state.notice = Some(Notice::WalletNotFound);
            return Ok(None);
        };
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.state.connection = OperationState::Pending;
            inner.generation
        };
        let result = match wallet.request_accounts().await {
            Ok(accounts) => accounts.first().copied().ok_or(FormError::NoAccounts),
            Err(error) => Err(error.into()),
        };

        let mut inner = self.inner.lock().await;
        let state = inner.state_since(generation);
        match result {
            Ok(account) => {
                info!(%account, "Connected");
                if let Some(state) = state {
                    state.account = Some(account);
                    state.connection = OperationState::Succeeded(account);
                }
                Ok(Some(account))
            }
            Err(error) => {
                warn!(%error, "Failed to connect");
                if let Some(state) = state {
                    state.connection = OperationState::Failed(error.clone());
                }
                Err(error)
            }
        }
    }

    /// Forgets the session and every result. The draft fields are kept.
    pub async fn disconnect(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        let state = &mut inner.state;
        state.account = None;
        state.connection = OperationState::Idle;
        state.submission = OperationState::Idle;
        state.lookup_query.clear();
        state.retrieval = OperationState::Idle;
        state.notice = None;
        debug!("Disconnected");
    }

    /// Creates a certificate from the draft fields with the connected account, and waits
    /// for the transaction to be confirmed.
    ///
    /// On success, the new hash is also written to the lookup field.
    pub async fn submit(&self) -> Result<Submission, FormError> {
        let (generation, account, owner_name, description) = {
            let mut inner = self.inner.lock().await;
            let generation = inner.generation;
            let state = &mut inner.state;
            let Some(account) = state.account else {
                state.submission = OperationState::Failed(FormError::NotConnected);
                return Err(FormError::NotConnected);
            };
            state.submission = OperationState::Pending;
            state.in_flight_submissions += 1;
            (
                generation,
                account,
                state.owner_name.clone(),
                state.description.clone(),
            )
        };
        debug!(%account, %owner_name, %description, "Submitting certificate");
        let result = self
            .create_certificate(account, &owner_name, &description)
            .await;

        let mut inner = self.inner.lock().await;
        inner.state.in_flight_submissions -= 1;
        let state = inner.state_since(generation);
        match &result {
            Ok(submission) => {
                info!(
                    certificate_hash = %submission.certificate_hash,
                    transaction_hash = %submission.transaction_hash,
                    "Certificate created"
                );
                if let Some(state) = state {
                    state.lookup_query = submission.certificate_hash.to_string();
                    state.submission = OperationState::Succeeded(*submission);
                }
            }
            Err(error) => {
                warn!(%error, "Failed to create certificate");
                if let Some(state) = state {
                    state.submission = OperationState::Failed(error.clone());
                }
            }
        }
        result
    }

    /// Looks up the certificate whose hash is in the lookup field.
    ///
    /// The contract's answer is stored as-is: an unknown hash gives an empty record,
    /// not an error.
    pub async fn lookup(&self) -> Result<CertificateRecord, FormError> {
        let (generation, query) = {
            let mut inner = self.inner.lock().await;
            inner.state.retrieval = OperationState::Pending;
            (inner.generation, inner.state.lookup_query.clone())
        };
        let result = self.get_certificate(&query).await;

        let mut inner = self.inner.lock().await;
        let state = inner.state_since(generation);
        match &result {
            Ok(record) => {
                info!(%query, owner = %record.owner, empty = record.is_empty(), "Certificate retrieved");
                if let Some(state) = state {
                    state.retrieval = OperationState::Succeeded(record.clone());
                }
            }
            Err(error) => {
                warn!(%query, %error, "Failed to retrieve certificate");
                if let Some(state) = state {
                    if let FormError::WalletNotFound = error {
                        state.notice = Some(Notice::WalletNotFound);
                    }
                    state.retrieval = OperationState::Failed(error.clone());
                }
            }
        }
        result
    }

    async fn create_certificate(
        &self,
        account: Address,
        owner_name: &str,
        description: &str,
    ) -> Result<Submission, FormError> {
        let wallet = self.wallet.as_ref().ok_or(FormError::WalletNotFound)?;
        let signer = wallet.signer(account).await?;
        Ok(signer.create_certificate(owner_name, description).await?)
    }

    async fn get_certificate(&self, query: &str) -> Result<CertificateRecord, FormError> {
        let certificate_hash =
            query
                .parse::<CertificateHash>()
                .map_err(|error| FormError::InvalidCertificateHash {
                    input: query.to_string(),
                    error,
                })?;
        let wallet = self.wallet.as_ref().ok_or(FormError::WalletNotFound)?;
        let reader = wallet.reader().await?;
        Ok(reader.get_certificate(certificate_hash).await?)
    }
}
