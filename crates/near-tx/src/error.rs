//! Error types for near-tx.
//!
//! Every fallible operation in this crate returns [`Error`](enum@Error). Each
//! variant names one kind of invalid input, so callers can match on the kind
//! and abort the submission flow. Failures are never retried or swallowed:
//! they are deterministic input-validation errors, not transient faults.
//!
//! # Example
//!
//! ```
//! use near_tx::{Error, Transaction};
//!
//! let tx = Transaction::create(
//!     "alice.testnet",
//!     "bob.testnet",
//!     "eefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804",
//!     "D7CPxgTXyRKYTSYuwAiRwDJH5RdHz7DwPt4EViptAW4L",
//!     1u64,
//! )
//! .unwrap();
//!
//! // No action was set, so encoding is refused.
//! assert!(matches!(tx.serialize(), Err(Error::MissingAction)));
//! ```

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    // ─── Keys and signatures ───
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid signature: expected 64 bytes, got {actual}")]
    InvalidSignature { actual: usize },

    // ─── Transaction fields ───
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(String),

    #[error("Invalid block hash: {0}")]
    InvalidBlockHash(String),

    #[error("Invalid nonce: {0}")]
    InvalidNonce(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid method name: {0}")]
    InvalidMethodName(String),

    #[error("Transaction has no actions")]
    MissingAction,

    // ─── Encoding ───
    #[error("Encoding overflow: {0}")]
    EncodingOverflow(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Decode error: {0}")]
    Decode(String),
}
