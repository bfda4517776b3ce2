//! Transaction types.
//!
//! [`Transaction`] is the unsigned transaction builder: it validates caller
//! input once, collects actions, and encodes itself canonically.
//! [`SignedTransaction`] pairs it with a signature into the on-wire form.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, trace};

use super::{AccountId, Action, CryptoHash, PublicKey, Signature};
use crate::encoding;
use crate::error::{Error, Result};
use crate::signer::{self, Signer};

// ============================================================================
// IntoNonce trait
// ============================================================================

/// Trait for values that can be used as a transaction nonce.
///
/// Negative values, or values wider than 64 bits, fail with
/// [`Error::InvalidNonce`].
pub trait IntoNonce {
    /// Convert into a `u64` nonce.
    fn into_nonce(self) -> Result<u64>;
}

impl IntoNonce for u64 {
    fn into_nonce(self) -> Result<u64> {
        Ok(self)
    }
}

impl IntoNonce for u32 {
    fn into_nonce(self) -> Result<u64> {
        Ok(self.into())
    }
}

impl IntoNonce for i64 {
    fn into_nonce(self) -> Result<u64> {
        u64::try_from(self).map_err(|_| Error::InvalidNonce(format!("{} is negative", self)))
    }
}

impl IntoNonce for u128 {
    fn into_nonce(self) -> Result<u64> {
        u64::try_from(self).map_err(|_| Error::InvalidNonce(format!("{} exceeds 2^64 - 1", self)))
    }
}

impl IntoNonce for i128 {
    fn into_nonce(self) -> Result<u64> {
        u64::try_from(self)
            .map_err(|_| Error::InvalidNonce(format!("{} is outside the u64 range", self)))
    }
}

impl IntoNonce for &str {
    fn into_nonce(self) -> Result<u64> {
        encoding::parse_u64_decimal(self).map_err(|e| Error::InvalidNonce(e.to_string()))
    }
}

// ============================================================================
// Transaction
// ============================================================================

/// An unsigned transaction.
///
/// Fields are encoded in this exact order: signer ID, public key, nonce,
/// receiver ID, block hash, actions.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    signer_id: AccountId,
    public_key: PublicKey,
    nonce: u64,
    receiver_id: AccountId,
    block_hash: CryptoHash,
    actions: Vec<Action>,
}

impl Transaction {
    /// Create a transaction from typed parts.
    pub fn new(
        signer_id: AccountId,
        public_key: PublicKey,
        nonce: u64,
        receiver_id: AccountId,
        block_hash: CryptoHash,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            signer_id,
            public_key,
            nonce,
            receiver_id,
            block_hash,
            actions,
        }
    }

    /// Create a transaction with no actions from caller-supplied text.
    ///
    /// - `public_key`: 32 bytes as hex, or `ed25519:<base58>`.
    /// - `block_hash`: 32 bytes as base58.
    /// - `nonce`: any integer (or decimal string) that fits in a `u64`.
    ///
    /// ```
    /// use near_tx::{Action, Transaction};
    ///
    /// let mut tx = Transaction::create(
    ///     "ggasii.testnet",
    ///     "ft.examples.testnet",
    ///     "eefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804",
    ///     "D7CPxgTXyRKYTSYuwAiRwDJH5RdHz7DwPt4EViptAW4L",
    ///     1u64,
    /// )?;
    /// tx.set_action(Action::transfer("1")?);
    /// let bytes = tx.serialize()?;
    /// assert_eq!(&bytes[..4], &[14, 0, 0, 0]);
    /// # Ok::<(), near_tx::Error>(())
    /// ```
    pub fn create(
        signer_id: impl AsRef<str>,
        receiver_id: impl AsRef<str>,
        public_key: &str,
        block_hash: &str,
        nonce: impl IntoNonce,
    ) -> Result<Self> {
        let signer_id = AccountId::new(signer_id.as_ref())?;
        let receiver_id = AccountId::new(receiver_id.as_ref())?;

        let public_key = if public_key.contains(':') {
            public_key.parse::<PublicKey>()
        } else {
            PublicKey::from_hex(public_key)
        }
        .map_err(|e| Error::InvalidPublicKey(e.to_string()))?;

        let block_hash = block_hash
            .parse::<CryptoHash>()
            .map_err(|e| Error::InvalidBlockHash(e.to_string()))?;

        let nonce = nonce.into_nonce()?;

        debug!(
            signer_id = %signer_id,
            receiver_id = %receiver_id,
            nonce,
            "created transaction"
        );

        Ok(Self::new(
            signer_id,
            public_key,
            nonce,
            receiver_id,
            block_hash,
            Vec::new(),
        ))
    }

    /// Append an action.
    pub fn set_action(&mut self, action: Action) -> &mut Self {
        trace!(discriminant = action.discriminant(), "appending action");
        self.actions.push(action);
        self
    }

    /// Append an action, by value.
    pub fn with_action(mut self, action: Action) -> Self {
        self.set_action(action);
        self
    }

    /// The account that signs and pays for the transaction.
    pub fn signer_id(&self) -> &AccountId {
        &self.signer_id
    }

    /// The public key of the signer.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Nonce for replay protection.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The account that receives the transaction.
    pub fn receiver_id(&self) -> &AccountId {
        &self.receiver_id
    }

    /// The referenced recent block.
    pub fn block_hash(&self) -> &CryptoHash {
        &self.block_hash
    }

    /// The actions, in execution order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Encode the transaction canonically.
    ///
    /// Fails with [`Error::MissingAction`] if no action was set. Calling this
    /// repeatedly on the same transaction yields identical bytes.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.actions.is_empty() {
            return Err(Error::MissingAction);
        }
        let bytes = encoding::to_vec(self)?;
        trace!(len = bytes.len(), "serialized transaction");
        Ok(bytes)
    }

    /// The canonical encoding as base58 text, the form handed to
    /// [`signer::sign_transaction`].
    pub fn to_base58(&self) -> Result<String> {
        Ok(bs58::encode(self.serialize()?).into_string())
    }

    /// SHA-256 of the canonical encoding: the message that gets signed, and
    /// the transaction's ID on chain.
    pub fn get_hash(&self) -> Result<CryptoHash> {
        Ok(CryptoHash::hash(&self.serialize()?))
    }

    /// Hash, sign and assemble in one step.
    ///
    /// The signer's public key must be the one recorded in the transaction.
    pub fn sign(self, signer: &impl Signer) -> Result<SignedTransaction> {
        if signer.public_key() != self.public_key {
            return Err(Error::InvalidPrivateKey(
                "signing key does not match the transaction public key".to_string(),
            ));
        }
        let signature = signer::sign_bytes(&self.serialize()?, signer)?;
        Ok(SignedTransaction::new(self, signature))
    }
}

// ============================================================================
// SignedTransaction
// ============================================================================

/// A signed transaction ready to be sent.
///
/// Encodes as the transaction's fields followed by the signature's tagged
/// encoding.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: Signature,
}

impl SignedTransaction {
    /// Pair a transaction with a signature.
    pub fn new(transaction: Transaction, signature: Signature) -> Self {
        Self {
            transaction,
            signature,
        }
    }

    /// Pair a transaction with raw ed25519 signature bytes.
    ///
    /// Fails with [`Error::InvalidSignature`] unless `signature` is exactly
    /// 64 bytes.
    pub fn create(transaction: Transaction, signature: &[u8]) -> Result<Self> {
        let signature = Signature::ed25519_from_slice(signature)?;
        Ok(Self::new(transaction, signature))
    }

    /// The unsigned transaction.
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// The signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The transaction hash.
    pub fn get_hash(&self) -> Result<CryptoHash> {
        self.transaction.get_hash()
    }

    /// Check the signature against the transaction's own public key.
    pub fn verify(&self) -> bool {
        match self.transaction.get_hash() {
            Ok(hash) => self
                .signature
                .verify(hash.as_bytes(), self.transaction.public_key()),
            Err(_) => false,
        }
    }

    /// Encode the signed transaction for submission.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.transaction.actions.is_empty() {
            return Err(Error::MissingAction);
        }
        let bytes = encoding::to_vec(self)?;
        debug!(len = bytes.len(), "serialized signed transaction");
        Ok(bytes)
    }

    /// Standard base64 of [`serialize`](Self::serialize), the form RPC
    /// endpoints accept.
    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.serialize()?))
    }

    /// Decode from bytes produced by [`serialize`](Self::serialize).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let signed: Self = encoding::from_slice(bytes)?;
        if signed.transaction.actions.is_empty() {
            return Err(Error::MissingAction);
        }
        Ok(signed)
    }

    /// Decode from base64 produced by [`to_base64`](Self::to_base64).
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| Error::Decode(format!("invalid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecretKey;

    const PUBLIC_KEY_HEX: &str = "eefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804";
    const BLOCK_HASH: &str = "D7CPxgTXyRKYTSYuwAiRwDJH5RdHz7DwPt4EViptAW4L";

    fn create_test_transaction() -> Transaction {
        Transaction::create(
            "alice.testnet",
            "bob.testnet",
            PUBLIC_KEY_HEX,
            BLOCK_HASH,
            1u64,
        )
        .unwrap()
    }

    // ========================================================================
    // Builder
    // ========================================================================

    #[test]
    fn test_create_starts_without_actions() {
        let tx = create_test_transaction();
        assert!(tx.actions().is_empty());
        assert_eq!(tx.nonce(), 1);
        assert_eq!(tx.signer_id().as_str(), "alice.testnet");
        assert_eq!(tx.receiver_id().as_str(), "bob.testnet");
        assert_eq!(tx.block_hash().to_string(), BLOCK_HASH);
    }

    #[test]
    fn test_create_accepts_prefixed_public_key() {
        let public = PublicKey::from_hex(PUBLIC_KEY_HEX).unwrap();
        let tx = Transaction::create("a", "b", &public.to_string(), BLOCK_HASH, 1u64).unwrap();
        assert_eq!(tx.public_key(), &public);
    }

    #[test]
    fn test_create_rejects_bad_public_key() {
        let long = format!("{}00", PUBLIC_KEY_HEX);
        for key in [&PUBLIC_KEY_HEX[..62], long.as_str(), "not hex", "ed25519:1"] {
            assert!(
                matches!(
                    Transaction::create("a", "b", key, BLOCK_HASH, 1u64),
                    Err(Error::InvalidPublicKey(_))
                ),
                "expected InvalidPublicKey for {:?}",
                key
            );
        }
    }

    #[test]
    fn test_create_rejects_bad_block_hash() {
        let short = bs58::encode([1u8; 31]).into_string();
        let long = bs58::encode([1u8; 33]).into_string();
        for hash in [short.as_str(), long.as_str(), "0OIl", ""] {
            assert!(
                matches!(
                    Transaction::create("a", "b", PUBLIC_KEY_HEX, hash, 1u64),
                    Err(Error::InvalidBlockHash(_))
                ),
                "expected InvalidBlockHash for {:?}",
                hash
            );
        }
    }

    #[test]
    fn test_create_rejects_bad_nonce() {
        assert!(matches!(
            Transaction::create("a", "b", PUBLIC_KEY_HEX, BLOCK_HASH, -1i64),
            Err(Error::InvalidNonce(_))
        ));
        assert!(matches!(
            Transaction::create("a", "b", PUBLIC_KEY_HEX, BLOCK_HASH, u64::MAX as u128 + 1),
            Err(Error::InvalidNonce(_))
        ));
        assert!(matches!(
            Transaction::create("a", "b", PUBLIC_KEY_HEX, BLOCK_HASH, "abc"),
            Err(Error::InvalidNonce(_))
        ));
    }

    #[test]
    fn test_create_accepts_nonce_bounds() {
        let tx = Transaction::create("a", "b", PUBLIC_KEY_HEX, BLOCK_HASH, 0i64).unwrap();
        assert_eq!(tx.nonce(), 0);
        let tx = Transaction::create("a", "b", PUBLIC_KEY_HEX, BLOCK_HASH, u64::MAX).unwrap();
        assert_eq!(tx.nonce(), u64::MAX);
    }

    #[test]
    fn test_create_rejects_empty_account() {
        assert!(matches!(
            Transaction::create("", "b", PUBLIC_KEY_HEX, BLOCK_HASH, 1u64),
            Err(Error::InvalidAccountId(_))
        ));
        assert!(matches!(
            Transaction::create("a", "", PUBLIC_KEY_HEX, BLOCK_HASH, 1u64),
            Err(Error::InvalidAccountId(_))
        ));
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    #[test]
    fn test_serialize_without_action_fails() {
        let tx = create_test_transaction();
        assert_eq!(tx.serialize(), Err(Error::MissingAction));
        assert_eq!(tx.to_base58(), Err(Error::MissingAction));
        assert_eq!(tx.get_hash(), Err(Error::MissingAction));
    }

    #[test]
    fn test_serialize_field_order() {
        let tx = create_test_transaction().with_action(Action::transfer(1u128).unwrap());
        let bytes = tx.serialize().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&13u32.to_le_bytes());
        expected.extend_from_slice(b"alice.testnet");
        expected.push(0);
        expected.extend_from_slice(&hex::decode(PUBLIC_KEY_HEX).unwrap());
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&11u32.to_le_bytes());
        expected.extend_from_slice(b"bob.testnet");
        expected.extend_from_slice(tx.block_hash().as_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.push(3);
        expected.extend_from_slice(&1u128.to_le_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_serialize_is_repeatable() {
        let tx = create_test_transaction().with_action(Action::transfer(1u128).unwrap());
        assert_eq!(tx.serialize().unwrap(), tx.serialize().unwrap());
    }

    #[test]
    fn test_actions_keep_order() {
        let mut tx = create_test_transaction();
        tx.set_action(Action::transfer(1u128).unwrap())
            .set_action(Action::function_call("m", vec![], 1u64, "0").unwrap());
        let discriminants: Vec<u8> = tx.actions().iter().map(Action::discriminant).collect();
        assert_eq!(discriminants, vec![3, 2]);
    }

    #[test]
    fn test_to_base58_roundtrip() {
        let tx = create_test_transaction().with_action(Action::transfer(1u128).unwrap());
        let text = tx.to_base58().unwrap();
        let bytes = bs58::decode(text).into_vec().unwrap();
        assert_eq!(bytes, tx.serialize().unwrap());
    }

    // ========================================================================
    // Signing and assembly
    // ========================================================================

    #[test]
    fn test_sign_transaction() {
        let secret = SecretKey::generate_ed25519();
        let tx = Transaction::create(
            "alice.testnet",
            "bob.testnet",
            &secret.public_key().to_hex(),
            BLOCK_HASH,
            1u64,
        )
        .unwrap()
        .with_action(Action::transfer(1u128).unwrap());

        let signed = tx.sign(&secret).unwrap();
        assert!(signed.verify());
        assert_eq!(signed.serialize().unwrap().len(), tx_len(&signed) + 65);
    }

    fn tx_len(signed: &SignedTransaction) -> usize {
        signed.transaction().serialize().unwrap().len()
    }

    #[test]
    fn test_sign_with_wrong_key_fails() {
        let tx = create_test_transaction().with_action(Action::transfer(1u128).unwrap());
        let other = SecretKey::generate_ed25519();
        assert!(matches!(tx.sign(&other), Err(Error::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_create_signed_rejects_wrong_width() {
        let tx = create_test_transaction().with_action(Action::transfer(1u128).unwrap());
        assert_eq!(
            SignedTransaction::create(tx.clone(), &[0u8; 63]),
            Err(Error::InvalidSignature { actual: 63 })
        );
        assert_eq!(
            SignedTransaction::create(tx, &[0u8; 65]),
            Err(Error::InvalidSignature { actual: 65 })
        );
    }

    #[test]
    fn test_signed_serialize_layout() {
        let tx = create_test_transaction().with_action(Action::transfer(1u128).unwrap());
        let unsigned = tx.serialize().unwrap();
        let signed = SignedTransaction::create(tx, &[7u8; 64]).unwrap();
        let bytes = signed.serialize().unwrap();

        assert_eq!(&bytes[..unsigned.len()], unsigned.as_slice());
        assert_eq!(bytes[unsigned.len()], 0, "ed25519 signature tag");
        assert_eq!(&bytes[unsigned.len() + 1..], &[7u8; 64]);
    }

    #[test]
    fn test_signed_serialize_without_action_fails() {
        let signed = SignedTransaction::create(create_test_transaction(), &[7u8; 64]).unwrap();
        assert_eq!(signed.serialize(), Err(Error::MissingAction));
    }

    #[test]
    fn test_signed_base64_roundtrip() {
        let secret = SecretKey::generate_ed25519();
        let tx = Transaction::new(
            "alice.testnet".parse().unwrap(),
            secret.public_key(),
            7,
            "bob.testnet".parse().unwrap(),
            BLOCK_HASH.parse().unwrap(),
            vec![Action::function_call("m", b"{}".to_vec(), 1u64, "5").unwrap()],
        );
        let signed = tx.sign(&secret).unwrap();

        let decoded = SignedTransaction::from_base64(&signed.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, signed);
        assert!(decoded.verify());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            SignedTransaction::from_bytes(&[1, 2, 3]),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            SignedTransaction::from_base64("not base64!"),
            Err(Error::Decode(_))
        ));
    }
}
