// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides the certificate form: a wallet session, the creation of
//! certificates, and their lookup by hash.

pub mod client_options;
pub mod config;
mod error;
pub mod form;
pub mod render;

#[cfg(test)]
mod unit_tests;

pub use error::Error;
