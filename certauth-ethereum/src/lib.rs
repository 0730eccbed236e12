// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides access to the certificate contract through an Ethereum wallet.

pub mod common;
pub mod contract;
pub mod provider;
pub mod wallet;

/// Helper types for tests.
#[cfg(any(test, feature = "test"))]
pub mod test_utils;
