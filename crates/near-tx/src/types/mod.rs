//! Core types for NEAR transactions.
//!
//! Every type here has a canonical Borsh encoding matching the protocol
//! layout, and the text forms wallets and RPC nodes use.

mod account;
mod action;
mod hash;
mod key;
mod transaction;
mod units;

pub use account::AccountId;
pub use action::{Action, FUNCTION_CALL_TAG, FunctionCallAction, TRANSFER_TAG, TransferAction};
pub use hash::{CRYPTO_HASH_LEN, CryptoHash};
pub use key::{
    ED25519_KEY_LEN, ED25519_KEYPAIR_LEN, ED25519_SIGNATURE_LEN, KeyType, PublicKey, SecretKey,
    Signature,
};
pub use transaction::{IntoNonce, SignedTransaction, Transaction};
pub use units::{Gas, IntoGas, IntoNearToken, NEAR_DECIMALS, NearToken};
