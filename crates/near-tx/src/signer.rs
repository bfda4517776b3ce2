//! Signing of encoded transactions.
//!
//! The signed message is always the SHA-256 digest of the canonical
//! transaction bytes, never the bytes themselves.
//!
//! # Example
//!
//! ```
//! use near_tx::{Action, Transaction, signer};
//!
//! # fn example() -> Result<(), near_tx::Error> {
//! let tx = Transaction::create(
//!     "ggasii.testnet",
//!     "ft.examples.testnet",
//!     "eefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804",
//!     "D7CPxgTXyRKYTSYuwAiRwDJH5RdHz7DwPt4EViptAW4L",
//!     1u64,
//! )?
//! .with_action(Action::transfer("1")?);
//!
//! let signature = signer::sign_transaction(
//!     &tx.to_base58()?,
//!     "b9ec4d26ab5bec8df4314a9e3b8fc3f9c96d410b4cd13caa675018dcfc7916cceefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804",
//! )?;
//! assert!(signature.verify(tx.get_hash()?.as_bytes(), tx.public_key()));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{CryptoHash, PublicKey, SecretKey, Signature};

// ============================================================================
// Signer Trait
// ============================================================================

/// Something that can produce signatures for a single public key.
///
/// [`SecretKey`] is the in-memory implementation. Other backends (hardware
/// wallets, remote signers) implement this trait to plug into
/// [`Transaction::sign`](crate::Transaction::sign).
pub trait Signer: Send + Sync {
    /// The public key signatures verify against.
    fn public_key(&self) -> PublicKey;

    /// Sign a message.
    fn sign(&self, message: &[u8]) -> Result<Signature>;
}

impl Signer for SecretKey {
    fn public_key(&self) -> PublicKey {
        SecretKey::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Result<Signature> {
        Ok(SecretKey::sign(self, message))
    }
}

/// Implement `Signer` for `Arc<dyn Signer>` for convenience.
impl Signer for Arc<dyn Signer> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Signature> {
        (**self).sign(message)
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Sign canonical transaction bytes: SHA-256, then ed25519.
pub fn sign_bytes(bytes: &[u8], signer: &impl Signer) -> Result<Signature> {
    let hash = CryptoHash::hash(bytes);
    debug!(len = bytes.len(), hash = %hash, "signing transaction");
    signer.sign(hash.as_bytes())
}

/// Sign a base58-encoded unsigned transaction with a hex private key.
///
/// `private_key_hex` is the 64-byte combined form: 32-byte seed followed by
/// the 32-byte public key. Fails with [`Error::Decode`] if `encoded_tx` is
/// not base58, or [`Error::InvalidPrivateKey`] if the key is malformed or
/// its halves do not match.
pub fn sign_transaction(encoded_tx: &str, private_key_hex: &str) -> Result<Signature> {
    let bytes = bs58::decode(encoded_tx)
        .into_vec()
        .map_err(|e| Error::Decode(format!("invalid base58 transaction: {}", e)))?;
    let secret_key = SecretKey::from_hex(private_key_hex)?;
    sign_bytes(&bytes, &secret_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY_HEX: &str = "b9ec4d26ab5bec8df4314a9e3b8fc3f9c96d410b4cd13caa675018dcfc7916cceefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804";

    #[test]
    fn test_sign_bytes_signs_digest() {
        let secret = SecretKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let message = b"unsigned transaction bytes";

        let signature = sign_bytes(message, &secret).unwrap();
        let digest = CryptoHash::hash(message);
        assert!(signature.verify(digest.as_bytes(), &secret.public_key()));
        assert!(!signature.verify(message, &secret.public_key()));
    }

    #[test]
    fn test_signature_consistency() {
        let secret = SecretKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let first = sign_bytes(b"payload", &secret).unwrap();
        let second = sign_bytes(b"payload", &secret).unwrap();
        assert_eq!(first, second, "ed25519 signatures are deterministic");
    }

    #[test]
    fn test_different_messages_different_signatures() {
        let secret = SecretKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let a = sign_bytes(b"payload a", &secret).unwrap();
        let b = sign_bytes(b"payload b", &secret).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sign_transaction_matches_sign_bytes() {
        let secret = SecretKey::from_hex(PRIVATE_KEY_HEX).unwrap();
        let bytes = vec![14u8, 0, 0, 0, 1, 2, 3];
        let encoded = bs58::encode(&bytes).into_string();

        assert_eq!(
            sign_transaction(&encoded, PRIVATE_KEY_HEX).unwrap(),
            sign_bytes(&bytes, &secret).unwrap()
        );
    }

    #[test]
    fn test_sign_transaction_rejects_bad_base58() {
        assert!(matches!(
            sign_transaction("0OIl", PRIVATE_KEY_HEX),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_sign_transaction_rejects_bad_key() {
        let encoded = bs58::encode([1u8, 2, 3]).into_string();

        assert_eq!(
            sign_transaction(&encoded, &PRIVATE_KEY_HEX[..64]),
            Err(Error::InvalidPrivateKey(
                "expected 64 bytes, got 32".to_string()
            ))
        );
        assert!(matches!(
            sign_transaction(&encoded, "not hex"),
            Err(Error::InvalidPrivateKey(_))
        ));

        let mut mismatched = PRIVATE_KEY_HEX.to_string();
        mismatched.replace_range(126..128, "05");
        assert!(matches!(
            sign_transaction(&encoded, &mismatched),
            Err(Error::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_signer_trait_object() {
        let secret = SecretKey::generate_ed25519();
        let public = secret.public_key();
        let signer: Arc<dyn Signer> = Arc::new(secret);

        assert_eq!(signer.public_key(), public);
        let signature = sign_bytes(b"payload", &signer).unwrap();
        assert!(signature.verify(CryptoHash::hash(b"payload").as_bytes(), &public));
    }
}
