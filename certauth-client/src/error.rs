// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use certauth_ethereum::common::EthereumServiceError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] crate::config::Error),
    #[error("no contract address configured: pass --contract-address or use a configuration file")]
    NoContractAddress,
    #[error("Ethereum error: {0}")]
    Ethereum(#[from] EthereumServiceError),
    #[error("form error: {0}")]
    Form(#[from] crate::form::FormError),
}
