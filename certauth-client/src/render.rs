// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Text rendering of the form.

use std::fmt;

use crate::{
    config::NetworkConfig,
    form::{FormState, OperationState},
};

/// Displays a [`FormState`] the way the form lays it out: the wallet connection, the
/// creation section, then the lookup section.
pub struct FormView<'a> {
    pub state: &'a FormState,
    pub config: &'a NetworkConfig,
}

impl<'a> FormView<'a> {
    pub fn new(state: &'a FormState, config: &'a NetworkConfig) -> Self {
        FormView { state, config }
    }
}

impl fmt::Display for FormView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        writeln!(f, "Certificate Authenticator")?;
        if let Some(notice) = &state.notice {
            writeln!(f, "Notice: {notice}")?;
        }
        match state.account {
            Some(account) => writeln!(f, "Connected: {account}")?,
            None => writeln!(f, "Not connected")?,
        }
        match &state.connection {
            OperationState::Idle | OperationState::Succeeded(_) => {}
            OperationState::Pending => writeln!(f, "Connecting...")?,
            OperationState::Failed(error) => writeln!(f, "Connection failed: {error}")?,
        }

        writeln!(f)?;
        writeln!(f, "Create Certificate")?;
        writeln!(f, "Owner Name: {}", state.owner_name)?;
        writeln!(f, "Description: {}", state.description)?;
        if state.in_flight_submissions > 0 {
            writeln!(
                f,
                "Waiting for {} transaction(s) to be confirmed...",
                state.in_flight_submissions
            )?;
        }
        match &state.submission {
            OperationState::Idle | OperationState::Pending => {}
            OperationState::Succeeded(submission) => {
                writeln!(f, "Certificate Hash: {}", submission.certificate_hash)?;
                writeln!(
                    f,
                    "Transaction: {}",
                    self.config.explorer_link(&submission.transaction_hash)
                )?;
            }
            OperationState::Failed(error) => writeln!(f, "Creation failed: {error}")?,
        }

        writeln!(f)?;
        writeln!(f, "Get Certificate")?;
        writeln!(f, "Certificate Hash: {}", state.lookup_query)?;
        match &state.retrieval {
            OperationState::Idle => {}
            OperationState::Pending => writeln!(f, "Retrieving...")?,
            OperationState::Succeeded(record) => {
                writeln!(f, "Owner: {}", record.owner)?;
                writeln!(f, "Owner Name: {}", record.owner_name)?;
                writeln!(f, "Description: {}", record.description)?;
            }
            OperationState::Failed(error) => writeln!(f, "Retrieval failed: {error}")?,
        }
        Ok(())
    }
}
