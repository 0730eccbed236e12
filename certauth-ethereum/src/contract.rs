// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Solidity ABI of the certificate contract.

use alloy::{rpc::types::eth::Log, sol};
use certauth_base::data_types::{CertificateHash, CertificateRecord};

use crate::common::EthereumServiceError;

sol! {
    /// The deployed certificate contract.
    #[sol(rpc)]
    contract CertificateAuthenticator {
        event CertificateCreated(
            bytes32 indexed certificateHash,
            address indexed owner,
            string ownerName,
            string description
        );

        function createCertificate(string ownerName, string description)
            external
            returns (bytes32 certificateHash);

        function getCertificate(bytes32 certificateHash)
            external
            view
            returns (address owner, string ownerName, string description);
    }
}

/// Extracts the certificate hash from the logs of a `createCertificate` receipt.
///
/// The contract emits exactly one event per creation, so only the first log is decoded.
pub fn certificate_hash_from_logs(logs: &[Log]) -> Result<CertificateHash, EthereumServiceError> {
    let log = logs.first().ok_or(EthereumServiceError::EventParsingError)?;
    let event = log.log_decode::<CertificateAuthenticator::CertificateCreated>()?;
    Ok(CertificateHash(event.inner.data.certificateHash))
}

impl From<CertificateAuthenticator::getCertificateReturn> for CertificateRecord {
    fn from(certificate: CertificateAuthenticator::getCertificateReturn) -> Self {
        CertificateRecord {
            owner: certificate.owner,
            owner_name: certificate.ownerName,
            description: certificate.description,
        }
    }
}
