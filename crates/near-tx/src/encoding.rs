//! Canonical binary encoding.
//!
//! NEAR nodes accept a transaction only if its bytes match the Borsh encoding
//! exactly. This module wraps the `borsh` crate with the checks the protocol
//! needs on top of it and maps every failure into [`Error`].
//!
//! # Rules
//!
//! | Value | Encoding |
//! |---|---|
//! | `u8`..`u128` | N/8 bytes, little-endian |
//! | `String` | `u32` LE byte length, then UTF-8 bytes |
//! | `[u8; N]` (keys, hashes) | raw bytes, no prefix |
//! | `Vec<u8>` (opaque payloads) | `u32` LE length, then raw bytes |
//! | `Vec<T>` | `u32` LE element count, then each element |
//! | enum | one discriminant byte, then the variant's fields |
//!
//! There is no padding and no alignment. Every length is prefixed, so the
//! format is unambiguous and [`from_slice`] can reverse it.

use std::num::IntErrorKind;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{Error, Result};

/// Encode a value into a fresh buffer.
pub fn to_vec<T: BorshSerialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_into(value, &mut buf)?;
    Ok(buf)
}

/// Append the encoding of `value` to `buf`.
///
/// On failure `buf` is restored to its previous length, so no partial
/// encoding is left behind.
pub fn encode_into<T: BorshSerialize + ?Sized>(value: &T, buf: &mut Vec<u8>) -> Result<()> {
    let start = buf.len();
    value.serialize(buf).map_err(|e| {
        buf.truncate(start);
        Error::EncodingOverflow(e.to_string())
    })
}

/// Decode a value, requiring that every input byte is consumed.
pub fn from_slice<T: BorshDeserialize>(bytes: &[u8]) -> Result<T> {
    borsh::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
}

/// Convert a length into the `u32` used for length prefixes.
pub fn checked_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        Error::EncodingOverflow(format!("length {} does not fit in a u32 prefix", len))
    })
}

/// Copy a slice into a fixed-width array.
///
/// Never truncates or pads: any other width is an [`Error::InvalidLength`].
pub fn fixed_bytes<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| Error::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// Parse a non-negative decimal integer string into a `u128`.
///
/// Only ASCII digits are accepted; signs, whitespace, separators and
/// fractional parts are rejected with [`Error::InvalidAmount`].
pub fn parse_u128_decimal(s: &str) -> Result<u128> {
    if is_negative_integer(s) {
        return Err(Error::InvalidAmount(format!("'{}' is negative", s)));
    }
    if !is_digits(s) {
        return Err(Error::InvalidAmount(format!(
            "'{}' is not a decimal integer",
            s
        )));
    }
    s.parse::<u128>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => {
            Error::InvalidAmount(format!("'{}' exceeds 2^128 - 1", s))
        }
        _ => Error::InvalidAmount(format!("'{}' is not a decimal integer", s)),
    })
}

/// Parse a non-negative decimal integer string into a `u64`.
///
/// Negative or too-wide values are an [`Error::EncodingOverflow`]; text that
/// is not an integer at all is an [`Error::Decode`].
pub fn parse_u64_decimal(s: &str) -> Result<u64> {
    if is_negative_integer(s) {
        return Err(Error::EncodingOverflow(format!(
            "'{}' is negative and cannot be encoded as u64",
            s
        )));
    }
    if !is_digits(s) {
        return Err(Error::Decode(format!("'{}' is not a decimal integer", s)));
    }
    s.parse::<u64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => {
            Error::EncodingOverflow(format!("'{}' exceeds 2^64 - 1", s))
        }
        _ => Error::Decode(format!("'{}' is not a decimal integer", s)),
    })
}

/// Narrow a signed 128-bit integer into a `u64`.
pub fn narrow_u64(value: i128) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        Error::EncodingOverflow(format!("{} is outside the u64 range", value))
    })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_negative_integer(s: &str) -> bool {
    s.strip_prefix('-').is_some_and(is_digits)
}
