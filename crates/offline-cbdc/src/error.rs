//! error types for the offline cbdc core
//!
//! construction functions (provers, builders, store mutations) return
//! [`Result`]; verification functions return `bool` and never error on a
//! structurally malformed proof.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// a precondition on caller-supplied data failed
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// serial missing from the token store
    #[error("token not found in store")]
    NotFound,

    /// token exists but is not in the UNSPENT state
    #[error("token is not spendable")]
    NotSpendable,

    /// duplicate serial or nullifier on insert
    #[error("already exists: {0}")]
    AlreadyExists(&'static str),

    /// bank signature over a minted token failed to verify
    #[error("invalid bank signature")]
    InvalidSignature,

    /// a sigma proof failed verification where an error is expected
    /// (bank-side mint verification)
    #[error("proof verification failed")]
    ProofInvalid,

    /// device certificate is past its expiry
    #[error("device certificate expired")]
    ExpiredCertificate,
}
