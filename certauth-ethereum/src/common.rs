// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::primitives::{Address, B256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EthereumServiceError {
    /// The wallet owner declined the request
    #[error("the request was rejected by the wallet")]
    UserRejected,

    /// The wallet cannot sign for this account
    #[error("account {0} is not managed by this wallet")]
    UnknownAccount(Address),

    #[error("transaction {0} was reverted")]
    TransactionReverted(B256),

    #[error("Event parsing error")]
    EventParsingError,

    /// ABI decoding error
    #[error(transparent)]
    SolTypesError(#[from] alloy::sol_types::Error),

    /// RPC error
    #[error(transparent)]
    RpcError(#[from] alloy::transports::TransportError),

    /// Contract call error
    #[error(transparent)]
    ContractError(#[from] alloy::contract::Error),

    /// Error while waiting for a transaction receipt
    #[error(transparent)]
    PendingTransactionError(#[from] alloy::providers::PendingTransactionError),

    /// Private key parsing error
    #[error(transparent)]
    LocalSignerError(#[from] alloy_signer_local::LocalSignerError),

    /// URL parsing error
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),
}
