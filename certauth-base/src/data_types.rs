// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core data types for the certificate authenticator.

use std::{fmt, str::FromStr};

use alloy_primitives::{hex, Address, B256};
use serde::{Deserialize, Serialize};

/// The fixed-width identifier the contract assigns to a newly created certificate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CertificateHash(pub B256);

impl CertificateHash {
    pub const fn new(hash: B256) -> Self {
        CertificateHash(hash)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }
}

impl From<B256> for CertificateHash {
    fn from(hash: B256) -> Self {
        CertificateHash(hash)
    }
}

impl From<CertificateHash> for B256 {
    fn from(hash: CertificateHash) -> Self {
        hash.0
    }
}

impl fmt::Display for CertificateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_prefixed(self.0))
    }
}

/// Parses 64 hexadecimal digits, with or without a `0x` prefix.
/// Surrounding whitespace is ignored, since the value usually comes from a text field.
impl FromStr for CertificateHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s.trim()).map(CertificateHash)
    }
}

/// The outcome of a confirmed `createCertificate` transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Submission {
    /// The hash taken from the event emitted by the contract.
    pub certificate_hash: CertificateHash,
    /// The hash of the transaction that created the certificate.
    pub transaction_hash: B256,
}

/// A certificate as returned by `getCertificate`.
///
/// The contract answers queries for unknown hashes with a zero-valued tuple, so a
/// record with [`CertificateRecord::is_empty`] may stand either for a missing
/// certificate or for a stored one whose fields happen to be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub owner: Address,
    pub owner_name: String,
    pub description: String,
}

impl CertificateRecord {
    pub fn new(owner: Address, owner_name: impl Into<String>, description: impl Into<String>) -> Self {
        CertificateRecord {
            owner,
            owner_name: owner_name.into(),
            description: description.into(),
        }
    }

    /// Whether this is the contract's default tuple.
    pub fn is_empty(&self) -> bool {
        self.owner.is_zero() && self.owner_name.is_empty() && self.description.is_empty()
    }
}
