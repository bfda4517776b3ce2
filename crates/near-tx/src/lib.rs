//! Offline construction and signing of NEAR transactions.
//!
//! **near-tx** builds a transaction from caller-supplied text, encodes it
//! in the protocol's canonical byte layout, signs the SHA-256 digest of
//! those bytes with ed25519, and assembles the signed transaction ready
//! for submission.
//!
//! # Quick Start
//!
//! ```
//! use near_tx::{Action, SecretKey, Transaction};
//!
//! # fn main() -> Result<(), near_tx::Error> {
//! let secret: SecretKey = SecretKey::from_hex(
//!     "b9ec4d26ab5bec8df4314a9e3b8fc3f9c96d410b4cd13caa675018dcfc7916cceefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804",
//! )?;
//! let public_key = secret.public_key();
//!
//! let tx = Transaction::create(
//!     public_key.implicit_account_id(),
//!     "ggasii.testnet",
//!     &public_key.to_hex(),
//!     "D7CPxgTXyRKYTSYuwAiRwDJH5RdHz7DwPt4EViptAW4L",
//!     1u64,
//! )?
//! .with_action(Action::transfer("222000000000000000000000")?);
//!
//! let signed = tx.sign(&secret)?;
//! assert!(signed.to_base64()?.starts_with("QAAAAGVlZmJiYTg1"));
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! 1. [`Transaction::create`] validates the text inputs.
//! 2. [`Transaction::set_action`] appends [`Action`]s.
//! 3. [`Transaction::serialize`] produces the canonical bytes
//!    ([`Transaction::to_base58`] for the text form).
//! 4. [`signer::sign_transaction`] hashes and signs them.
//! 5. [`SignedTransaction::create`] pairs transaction and signature, and
//!    [`SignedTransaction::to_base64`] yields the submission payload.
//!
//! # Core Types
//!
//! - [`AccountId`] - Account identifier
//! - [`NearToken`] - Token amount in minimal units
//! - [`Gas`] - Gas units
//! - [`PublicKey`], [`SecretKey`], [`Signature`] - ed25519 key material
//! - [`CryptoHash`] - 32-byte SHA-256 hash
//!
//! Amounts are never parsed through floating point:
//!
//! ```
//! use near_tx::NearToken;
//!
//! let amount = NearToken::from_decimal("0.222", 24).unwrap();
//! assert_eq!(amount.as_yoctonear(), 222_000_000_000_000_000_000_000);
//! assert!(NearToken::from_decimal("0.1", 0).is_err());
//! ```

pub mod encoding;
pub mod error;
pub mod signer;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use signer::{Signer, sign_bytes, sign_transaction};
pub use types::*;
