// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Base definitions shared by the certificate authenticator crates: the data exchanged
//! with the certificate contract, and the tracing setup used by the binaries.

pub mod data_types;
pub mod error;
pub mod tracing;

pub use alloy_primitives::{Address, B256};
