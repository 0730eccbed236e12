// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{address, b256, Address};
use certauth_base::data_types::{CertificateHash, CertificateRecord, Submission};

use crate::{
    config::NetworkConfig,
    form::{FormError, FormState, Notice, OperationState},
    render::FormView,
};

fn render(state: &FormState) -> String {
    let config = NetworkConfig::new(Address::ZERO);
    FormView::new(state, &config).to_string()
}

#[test]
fn test_render_empty_form() {
    let output = render(&FormState::default());
    assert!(output.starts_with("Certificate Authenticator\nNot connected\n"));
    assert!(output.contains("Create Certificate\nOwner Name: \nDescription: \n"));
    assert!(output.ends_with("Get Certificate\nCertificate Hash: \n"));
}

#[test]
fn test_render_notice() {
    let state = FormState {
        notice: Some(Notice::WalletNotFound),
        ..FormState::default()
    };
    assert!(render(&state).contains("Wallet not found!"));
}

#[test]
fn test_render_created_certificate() {
    let account = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    let certificate_hash = CertificateHash(b256!(
        "1111111111111111111111111111111111111111111111111111111111111111"
    ));
    let state = FormState {
        account: Some(account),
        connection: OperationState::Succeeded(account),
        owner_name: "Alice".to_string(),
        description: "Diploma".to_string(),
        submission: OperationState::Succeeded(Submission {
            certificate_hash,
            transaction_hash: b256!(
                "2222222222222222222222222222222222222222222222222222222222222222"
            ),
        }),
        in_flight_submissions: 1,
        lookup_query: certificate_hash.to_string(),
        retrieval: OperationState::Succeeded(CertificateRecord::new(account, "Alice", "Diploma")),
        notice: None,
    };
    let output = render(&state);
    assert!(output.contains("Connected: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    assert!(output.contains("Waiting for 1 transaction(s) to be confirmed..."));
    assert!(output.contains(
        "Certificate Hash: 0x1111111111111111111111111111111111111111111111111111111111111111"
    ));
    assert!(output.contains(
        "Transaction: https://sepolia.etherscan.io/tx/0x2222222222222222222222222222222222222222222222222222222222222222"
    ));
    assert!(output.ends_with(
        "Owner: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\nOwner Name: Alice\nDescription: Diploma\n"
    ));
}

#[test]
fn test_render_failures() {
    let state = FormState {
        connection: OperationState::Failed(FormError::NoAccounts),
        submission: OperationState::Failed(FormError::NotConnected),
        retrieval: OperationState::Pending,
        ..FormState::default()
    };
    let output = render(&state);
    assert!(output.contains("Not connected\nConnection failed: the wallet did not authorize any account"));
    assert!(output.contains("Creation failed: no account is connected"));
    assert!(output.ends_with("Retrieving...\n"));
}

#[test]
fn test_render_failed_reconnection_keeps_account() {
    let account = Address::with_last_byte(1);
    let state = FormState {
        account: Some(account),
        connection: OperationState::Failed(FormError::NoAccounts),
        ..FormState::default()
    };
    let output = render(&state);
    assert!(output.contains(&format!("Connected: {account}\nConnection failed: ")));
}
