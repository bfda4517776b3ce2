//! Cryptographic key types for NEAR.
//!
//! Only ed25519 is supported. Keys and signatures carry a [`KeyType`] tag
//! because the protocol encodes them as a one-byte curve discriminant
//! followed by the raw key material.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding;
use crate::error::{Error, Result};

/// Length of an ed25519 public key or seed in bytes.
pub const ED25519_KEY_LEN: usize = 32;

/// Length of an ed25519 secret key in its combined form (seed + public key).
pub const ED25519_KEYPAIR_LEN: usize = 64;

/// Length of an ed25519 signature in bytes.
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Key type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    /// Ed25519 key. (discriminant = 0)
    Ed25519 = 0,
}

impl KeyType {
    /// Get the string prefix for this key type.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
        }
    }
}

impl TryFrom<u8> for KeyType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(KeyType::Ed25519),
            _ => Err(Error::Decode(format!("unsupported key type: {}", value))),
        }
    }
}

fn parse_key_type(s: &str) -> Result<KeyType> {
    match s {
        "ed25519" => Ok(KeyType::Ed25519),
        other => Err(Error::Decode(format!("unsupported key type: '{}'", other))),
    }
}

fn invalid_data(msg: &'static str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg)
}

// ============================================================================
// PublicKey
// ============================================================================

/// Ed25519 public key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: [u8; ED25519_KEY_LEN],
}

impl PublicKey {
    /// Create an Ed25519 public key from raw 32 bytes.
    ///
    /// The bytes must decode to a point on the curve.
    pub fn ed25519_from_bytes(bytes: [u8; ED25519_KEY_LEN]) -> Result<Self> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| {
            Error::InvalidPublicKey("not a valid ed25519 curve point".to_string())
        })?;
        Ok(Self {
            key_type: KeyType::Ed25519,
            data: bytes,
        })
    }

    /// Create an Ed25519 public key from a hex string of exactly 32 bytes.
    ///
    /// ```
    /// use near_tx::PublicKey;
    ///
    /// let key = PublicKey::from_hex(
    ///     "eefbba85caaa14cb87b83314d5b86895f2d4b7633e29012e65bfb037c885c804",
    /// )
    /// .unwrap();
    /// assert_eq!(key.to_string(), "ed25519:H5tfQNgpNBy2ra4xvCgjA1aPFGBZiqXGbNTYhAxx7U6P");
    /// ```
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::Decode(format!("invalid hex: {}", e)))?;
        Self::ed25519_from_bytes(encoding::fixed_bytes(&bytes)?)
    }

    /// Get the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; ED25519_KEY_LEN] {
        &self.data
    }

    /// Lowercase hex of the key bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.data)
    }

    /// The implicit account ID owned by this key (64 lowercase hex chars).
    pub fn implicit_account_id(&self) -> super::AccountId {
        super::AccountId::new(self.to_hex()).expect("hex of a 32-byte key is never empty")
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    /// Parse `ed25519:<base58>`.
    fn from_str(s: &str) -> Result<Self> {
        let (key_type, data_str) = s.split_once(':').ok_or_else(|| {
            Error::Decode("expected 'ed25519:<base58>' key format".to_string())
        })?;
        parse_key_type(key_type)?;

        let data = bs58::decode(data_str)
            .into_vec()
            .map_err(|e| Error::Decode(format!("invalid base58: {}", e)))?;

        Self::ed25519_from_bytes(encoding::fixed_bytes(&data)?)
    }
}

impl TryFrom<&str> for PublicKey {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.key_type.as_str(),
            bs58::encode(&self.data).into_string()
        )
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl BorshSerialize for PublicKey {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&(self.key_type as u8), writer)?;
        writer.write_all(&self.data)
    }
}

impl BorshDeserialize for PublicKey {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let key_type_byte = u8::deserialize_reader(reader)?;
        KeyType::try_from(key_type_byte)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut data = [0u8; ED25519_KEY_LEN];
        reader.read_exact(&mut data)?;

        Self::ed25519_from_bytes(data).map_err(|_| invalid_data("invalid ed25519 curve point"))
    }
}

// ============================================================================
// SecretKey
// ============================================================================

/// Ed25519 secret key.
///
/// Accepted in the combined 64-byte form (32-byte seed followed by its
/// 32-byte public key), as hex or as `ed25519:<base58>`. The key material is
/// never printed by `Debug`.
#[derive(Clone)]
pub struct SecretKey {
    signing_key: SigningKey,
}

impl SecretKey {
    /// Generate a new random Ed25519 key.
    pub fn generate_ed25519() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create an Ed25519 secret key from its raw 32-byte seed.
    pub fn ed25519_from_seed(seed: [u8; ED25519_KEY_LEN]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create an Ed25519 secret key from 64 bytes of seed + public key.
    ///
    /// Fails unless the trailing half is the public key of the seed.
    pub fn ed25519_from_keypair_bytes(bytes: &[u8]) -> Result<Self> {
        let keypair: [u8; ED25519_KEYPAIR_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                ED25519_KEYPAIR_LEN,
                bytes.len()
            ))
        })?;
        let signing_key = SigningKey::from_keypair_bytes(&keypair).map_err(|_| {
            Error::InvalidPrivateKey("public key half does not match the seed".to_string())
        })?;
        Ok(Self { signing_key })
    }

    /// Parse the 64-byte combined form from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|_| Error::InvalidPrivateKey("not a valid hex string".to_string()))?;
        Self::ed25519_from_keypair_bytes(&bytes)
    }

    /// Get the key type.
    pub fn key_type(&self) -> KeyType {
        KeyType::Ed25519
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            key_type: KeyType::Ed25519,
            data: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            key_type: KeyType::Ed25519,
            data: self.signing_key.sign(message).to_bytes(),
        }
    }
}

impl FromStr for SecretKey {
    type Err = Error;

    /// Parse `ed25519:<base58>` holding either the 32-byte seed or the
    /// 64-byte combined form.
    fn from_str(s: &str) -> Result<Self> {
        let (key_type, data_str) = s.split_once(':').ok_or_else(|| {
            Error::InvalidPrivateKey("expected 'ed25519:<base58>' key format".to_string())
        })?;
        parse_key_type(key_type).map_err(|e| Error::InvalidPrivateKey(e.to_string()))?;

        let data = bs58::decode(data_str)
            .into_vec()
            .map_err(|_| Error::InvalidPrivateKey("not a valid base58 string".to_string()))?;

        match data.len() {
            ED25519_KEY_LEN => {
                let seed: [u8; ED25519_KEY_LEN] = encoding::fixed_bytes(&data)?;
                Ok(Self::ed25519_from_seed(seed))
            }
            _ => Self::ed25519_from_keypair_bytes(&data),
        }
    }
}

impl TryFrom<&str> for SecretKey {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.key_type().as_str(),
            bs58::encode(self.signing_key.to_keypair_bytes()).into_string()
        )
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}:***)", self.key_type().as_str())
    }
}

// ============================================================================
// Signature
// ============================================================================

/// Cryptographic signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    key_type: KeyType,
    data: [u8; ED25519_SIGNATURE_LEN],
}

impl Signature {
    /// Create an Ed25519 signature from raw 64 bytes.
    pub fn ed25519_from_bytes(bytes: [u8; ED25519_SIGNATURE_LEN]) -> Self {
        Self {
            key_type: KeyType::Ed25519,
            data: bytes,
        }
    }

    /// Create an Ed25519 signature from a slice that must be exactly 64 bytes.
    pub fn ed25519_from_slice(bytes: &[u8]) -> Result<Self> {
        let data = bytes
            .try_into()
            .map_err(|_| Error::InvalidSignature {
                actual: bytes.len(),
            })?;
        Ok(Self::ed25519_from_bytes(data))
    }

    /// Get the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Get the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; ED25519_SIGNATURE_LEN] {
        &self.data
    }

    /// Verify this signature against a message and public key.
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        if self.key_type != public_key.key_type() {
            return false;
        }
        let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&self.data);
        verifying_key.verify_strict(message, &signature).is_ok()
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key_type, data_str) = s.split_once(':').ok_or_else(|| {
            Error::Decode("expected 'ed25519:<base58>' signature format".to_string())
        })?;
        parse_key_type(key_type)?;

        let data = bs58::decode(data_str)
            .into_vec()
            .map_err(|e| Error::Decode(format!("invalid base58: {}", e)))?;

        Self::ed25519_from_slice(&data)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.key_type.as_str(),
            bs58::encode(&self.data).into_string()
        )
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl BorshSerialize for Signature {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&(self.key_type as u8), writer)?;
        writer.write_all(&self.data)
    }
}

impl BorshDeserialize for Signature {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let key_type_byte = u8::deserialize_reader(reader)?;
        let key_type = KeyType::try_from(key_type_byte)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut data = [0u8; ED25519_SIGNATURE_LEN];
        reader.read_exact(&mut data)?;

        Ok(Self { key_type, data })
    }
}
