// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use alloy_primitives::Address;
use assert_matches::assert_matches;
use certauth_base::data_types::CertificateRecord;
use certauth_ethereum::{
    common::EthereumServiceError,
    test_utils::{MemoryLedger, MemoryWallet},
};
use test_case::test_case;
use tokio::sync::Semaphore;

use crate::form::{CertificateForm, FormError, Notice, OperationState};

fn make_form() -> (CertificateForm<MemoryWallet>, MemoryWallet) {
    let wallet = MemoryWallet::new(MemoryLedger::new());
    (CertificateForm::with_wallet(wallet.clone()), wallet)
}

#[test_log::test(tokio::test)]
async fn test_connect_uses_first_account() {
    let (form, wallet) = make_form();
    let account = form.connect().await.unwrap();
    assert_eq!(account, Some(wallet.accounts()[0]));
    let state = form.state().await;
    assert_eq!(state.account(), Some(wallet.accounts()[0]));
    assert_eq!(state.notice, None);
}

#[test_log::test(tokio::test)]
async fn test_connect_without_wallet_raises_notice() {
    let form = CertificateForm::<MemoryWallet>::without_wallet();
    form.set_owner_name("Alice").await;
    assert_matches!(form.connect().await, Ok(None));
    let state = form.state().await;
    assert_eq!(state.notice, Some(Notice::WalletNotFound));
    assert!(state.connection.is_idle());
    assert_eq!(state.account(), None);
    assert_eq!(state.owner_name, "Alice");
}

#[test_log::test(tokio::test)]
async fn test_connect_declined() {
    let wallet = MemoryWallet::new(MemoryLedger::new()).declining();
    let form = CertificateForm::with_wallet(wallet);
    let error = form.connect().await.unwrap_err();
    assert_matches!(error, FormError::Ethereum(ref error) if matches!(**error, EthereumServiceError::UserRejected));
    let state = form.state().await;
    assert_matches!(state.connection.failure(), Some(FormError::Ethereum(_)));
    assert_eq!(state.account(), None);
}

#[test_log::test(tokio::test)]
async fn test_connect_without_accounts() {
    let wallet = MemoryWallet::with_accounts(MemoryLedger::new(), Vec::new());
    let form = CertificateForm::with_wallet(wallet);
    assert_matches!(form.connect().await, Err(FormError::NoAccounts));
}

#[test_log::test(tokio::test)]
async fn test_submit_requires_connection() {
    let (form, wallet) = make_form();
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;
    assert_matches!(form.submit().await, Err(FormError::NotConnected));
    let state = form.state().await;
    assert_matches!(state.submission, OperationState::Failed(FormError::NotConnected));
    assert_eq!(state.in_flight_submissions, 0);
    assert!(wallet.ledger().is_empty().await);
}

#[test_log::test(tokio::test)]
async fn test_submit_then_lookup() -> anyhow::Result<()> {
    let (form, wallet) = make_form();
    let account = form.connect().await?.unwrap();
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;
    let submission = form.submit().await?;

    let state = form.state().await;
    assert_eq!(state.submission.succeeded(), Some(&submission));
    assert_eq!(state.lookup_query, submission.certificate_hash.to_string());
    // The draft is not consumed.
    assert_eq!(state.owner_name, "Alice");
    assert_eq!(state.description, "Diploma");

    let record = form.lookup().await?;
    assert_eq!(record, CertificateRecord::new(account, "Alice", "Diploma"));
    assert_eq!(
        form.state().await.retrieval.succeeded(),
        Some(&CertificateRecord::new(account, "Alice", "Diploma"))
    );
    assert_eq!(wallet.ledger().len().await, 1);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_submit_is_not_idempotent() -> anyhow::Result<()> {
    let (form, wallet) = make_form();
    form.connect().await?;
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;
    let first = form.submit().await?;
    let second = form.submit().await?;
    assert_ne!(first.certificate_hash, second.certificate_hash);
    assert_eq!(wallet.ledger().len().await, 2);
    assert_eq!(form.state().await.submission.succeeded(), Some(&second));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_concurrent_submissions_are_not_guarded() -> anyhow::Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let ledger = MemoryLedger::new();
    let wallet = MemoryWallet::new(ledger.clone()).with_confirmation_gate(gate.clone());
    let form = CertificateForm::with_wallet(wallet);
    form.connect().await?;
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;

    let observer = async {
        // Let both submissions reach the wallet.
        tokio::task::yield_now().await;
        let state = form.state().await;
        assert!(state.submission.is_pending());
        assert_eq!(state.in_flight_submissions, 2);
        assert!(ledger.is_empty().await);
        gate.add_permits(2);
    };
    let (first, second, ()) = tokio::join!(form.submit(), form.submit(), observer);

    assert_ne!(first?.certificate_hash, second?.certificate_hash);
    assert_eq!(ledger.len().await, 2);
    let state = form.state().await;
    assert_eq!(state.in_flight_submissions, 0);
    assert!(state.submission.succeeded().is_some());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_lookup_of_unknown_certificate_is_empty() -> anyhow::Result<()> {
    let (form, _) = make_form();
    form.set_lookup_query("0x00000000000000000000000000000000000000000000000000000000000000aa")
        .await;
    let record = form.lookup().await?;
    // Missing and empty certificates cannot be told apart.
    assert!(record.is_empty());
    assert_eq!(record.owner, Address::ZERO);
    assert_eq!(form.state().await.retrieval.succeeded(), Some(&record));
    Ok(())
}

#[test_case(""; "empty")]
#[test_case("0xabc"; "too_short")]
#[test_case("certificate"; "not_hex")]
#[test_log::test(tokio::test)]
async fn test_lookup_with_malformed_hash(query: &str) {
    let (form, _) = make_form();
    form.set_lookup_query(query).await;
    assert_matches!(
        form.lookup().await,
        Err(FormError::InvalidCertificateHash { ref input, .. }) if input == query
    );
    assert_matches!(
        form.state().await.retrieval,
        OperationState::Failed(FormError::InvalidCertificateHash { .. })
    );
}

#[test_log::test(tokio::test)]
async fn test_lookup_without_wallet() {
    let form = CertificateForm::<MemoryWallet>::without_wallet();
    form.set_lookup_query("0x00000000000000000000000000000000000000000000000000000000000000aa")
        .await;
    assert_matches!(form.lookup().await, Err(FormError::WalletNotFound));
    assert_eq!(form.state().await.notice, Some(Notice::WalletNotFound));
}

#[test_log::test(tokio::test)]
async fn test_disconnect_clears_results() -> anyhow::Result<()> {
    let (form, _) = make_form();
    form.connect().await?;
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;
    form.submit().await?;
    form.lookup().await?;

    form.disconnect().await;
    let state = form.state().await;
    assert_eq!(state.account(), None);
    assert!(state.connection.is_idle());
    assert!(state.submission.is_idle());
    assert!(state.lookup_query.is_empty());
    assert!(state.retrieval.is_idle());
    assert_eq!(state.owner_name, "Alice");
    assert_eq!(state.description, "Diploma");

    // Disconnecting again changes nothing.
    form.disconnect().await;
    assert!(form.state().await.connection.is_idle());
    assert_matches!(form.submit().await, Err(FormError::NotConnected));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_disconnect_clears_notice() {
    let form = CertificateForm::<MemoryWallet>::without_wallet();
    form.connect().await.unwrap();
    form.disconnect().await;
    assert_eq!(form.state().await.notice, None);
}

#[test_log::test(tokio::test)]
async fn test_declined_reconnection_keeps_account() -> anyhow::Result<()> {
    let (form, wallet) = make_form();
    let account = form.connect().await?;
    assert_eq!(account, Some(wallet.accounts()[0]));

    wallet.set_declining(true);
    assert_matches!(form.connect().await, Err(FormError::Ethereum(_)));
    let state = form.state().await;
    assert_eq!(state.account(), account);
    assert_matches!(state.connection.failure(), Some(FormError::Ethereum(_)));

    wallet.set_declining(false);
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;
    form.submit().await?;
    assert_eq!(wallet.ledger().len().await, 1);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_submit_during_reconnection() -> anyhow::Result<()> {
    let gate = Arc::new(Semaphore::new(1));
    let wallet = MemoryWallet::new(MemoryLedger::new()).with_authorization_gate(gate.clone());
    let form = CertificateForm::with_wallet(wallet.clone());
    let account = form.connect().await?;
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;

    let submit_then_release = async {
        // The second connection waits on the gate.
        tokio::task::yield_now().await;
        let state = form.state().await;
        assert!(state.connection.is_pending());
        assert_eq!(state.account(), account);
        let submission = form.submit().await;
        gate.add_permits(1);
        submission
    };
    let (reconnection, submission) = tokio::join!(form.connect(), submit_then_release);

    assert_eq!(reconnection?, account);
    assert!(submission.is_ok());
    assert_eq!(wallet.ledger().len().await, 1);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_connection_completing_after_disconnect_is_discarded() -> anyhow::Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let wallet = MemoryWallet::new(MemoryLedger::new()).with_authorization_gate(gate.clone());
    let form = CertificateForm::with_wallet(wallet);

    let disconnect_then_release = async {
        tokio::task::yield_now().await;
        assert!(form.state().await.connection.is_pending());
        form.disconnect().await;
        gate.add_permits(1);
    };
    let (connection, ()) = tokio::join!(form.connect(), disconnect_then_release);

    // The wallet answered, but the form was disconnected in the meantime.
    assert!(connection?.is_some());
    let state = form.state().await;
    assert_eq!(state.account(), None);
    assert!(state.connection.is_idle());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_submission_completing_after_disconnect_is_discarded() -> anyhow::Result<()> {
    let gate = Arc::new(Semaphore::new(0));
    let ledger = MemoryLedger::new();
    let wallet = MemoryWallet::new(ledger.clone()).with_confirmation_gate(gate.clone());
    let form = CertificateForm::with_wallet(wallet);
    form.connect().await?;
    form.set_owner_name("Alice").await;
    form.set_description("Diploma").await;

    let disconnect_then_release = async {
        tokio::task::yield_now().await;
        form.disconnect().await;
        gate.add_permits(1);
    };
    let (submission, ()) = tokio::join!(form.submit(), disconnect_then_release);

    // The certificate exists, but the form does not show it.
    submission?;
    assert_eq!(ledger.len().await, 1);
    let state = form.state().await;
    assert!(state.submission.is_idle());
    assert!(state.lookup_query.is_empty());
    assert_eq!(state.in_flight_submissions, 0);
    Ok(())
}
