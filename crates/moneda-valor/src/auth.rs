//! Shared-secret header check for protected routes.
//!
//! The caller (SAP) sends the configured secret in [`API_KEY_HEADER`]. The
//! check is a plain allow/deny: exact byte equality with the configured key,
//! evaluated through [`constant_time_eq`] so the comparison time does not
//! depend on how much of the key matched.
//!
//! [`API_KEY_HEADER`]: crate::API_KEY_HEADER

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Why a request was refused. Both variants map to the same 401 body; the
/// distinction only reaches logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("API key header missing")]
    MissingCredential,

    #[error("API key does not match")]
    InvalidCredential,
}

impl AuthError {
    /// Short label used for the `reason` metric dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing",
            AuthError::InvalidCredential => "invalid",
        }
    }
}

/// Check the raw header value (if any) against the expected key.
pub fn check_api_key(provided: Option<&[u8]>, expected: &str) -> Result<(), AuthError> {
    match provided {
        None => Err(AuthError::MissingCredential),
        Some(value) if constant_time_eq(value, expected.as_bytes()) => Ok(()),
        Some(_) => Err(AuthError::InvalidCredential),
    }
}

/// Equality over SHA-256 digests of both inputs, compared with
/// `subtle::ConstantTimeEq`. Neither content nor length leaks through timing.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}
