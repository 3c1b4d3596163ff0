//! Batch authorization requests
//!
//! A request file carries biometric confidences, so it is read into a
//! [`SensitiveBuffer`] and parsed straight from those bytes. The raw
//! contents are erased as soon as parsing finishes, whether it succeeded
//! or not.

use risk_engine::{BiometricVerification, Transaction, User};
use security::SensitiveBuffer;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// One transaction to authorize
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationRequest {
    /// Transaction
    pub transaction: Transaction,

    /// Initiating user
    pub user: User,

    /// Biometric result; absent when the subsystem produced none
    #[serde(default)]
    pub verification: Option<BiometricVerification>,
}

/// Parse a JSON array of requests and erase `buffer`
pub fn parse_requests(buffer: &mut SensitiveBuffer) -> Result<Vec<AuthorizationRequest>> {
    let parsed = serde_json::from_slice::<Vec<AuthorizationRequest>>(buffer.as_slice());
    buffer.erase();

    parsed.map_err(|e| Error::Serialization(format!("Failed to parse requests: {}", e)))
}

/// Read and parse a request file
pub fn load_requests(path: impl AsRef<Path>) -> Result<Vec<AuthorizationRequest>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let mut buffer = SensitiveBuffer::read_from(&mut file)?;

    let requests = parse_requests(&mut buffer)?;
    debug!(count = requests.len(), path = %path.display(), "Parsed requests");
    Ok(requests)
}
