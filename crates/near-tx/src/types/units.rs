//! Token amount and gas unit types.
//!
//! Amounts travel through this crate as exact integers. Decimal strings are
//! parsed digit by digit and never pass through floating point.

use std::fmt::{self, Display};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding;
use crate::error::{Error, Result};

/// Number of decimal places between NEAR and yoctoNEAR.
pub const NEAR_DECIMALS: u32 = 24;

/// One NEAR in yoctoNEAR (10^24).
const YOCTO_PER_NEAR: u128 = 1_000_000_000_000_000_000_000_000;

/// A token amount in minimal units (yoctoNEAR, 10^-24 NEAR).
///
/// ```
/// use near_tx::NearToken;
///
/// // Minimal units, as the protocol encodes them
/// let deposit: NearToken = "222000000000000000000000".parse().unwrap();
///
/// // Display units, scaled exactly by 24 decimal places
/// let same = NearToken::from_decimal("0.222", 24).unwrap();
/// assert_eq!(deposit, same);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NearToken(u128);

impl NearToken {
    /// Zero.
    pub const ZERO: Self = Self(0);
    /// One yoctoNEAR.
    pub const ONE_YOCTO: Self = Self(1);
    /// One NEAR.
    pub const ONE_NEAR: Self = Self(YOCTO_PER_NEAR);

    /// Create from minimal units.
    pub const fn from_yoctonear(yocto: u128) -> Self {
        Self(yocto)
    }

    /// Parse a non-negative decimal integer string of minimal units.
    pub fn from_yocto_str(s: &str) -> Result<Self> {
        encoding::parse_u128_decimal(s).map(Self)
    }

    /// Scale a decimal display amount into minimal units.
    ///
    /// `"0.222"` with 24 decimals becomes `222 * 10^21`. The conversion is
    /// exact: more fractional digits than `decimals` is an error rather than
    /// a silent rounding.
    pub fn from_decimal(s: &str, decimals: u32) -> Result<Self> {
        let (integer_part, fraction_part) = s.split_once('.').unwrap_or((s, ""));

        if integer_part.is_empty() && fraction_part.is_empty() {
            return Err(Error::InvalidAmount(format!("'{}' has no digits", s)));
        }
        if fraction_part.len() > decimals as usize {
            return Err(Error::InvalidAmount(format!(
                "'{}' has more than {} fractional digits",
                s, decimals
            )));
        }

        let integer = if integer_part.is_empty() {
            0
        } else {
            encoding::parse_u128_decimal(integer_part)
                .map_err(|_| Error::InvalidAmount(format!("'{}' is not a decimal number", s)))?
        };
        let fraction = if fraction_part.is_empty() {
            0
        } else {
            encoding::parse_u128_decimal(fraction_part)
                .map_err(|_| Error::InvalidAmount(format!("'{}' is not a decimal number", s)))?
        };

        let overflow = || Error::InvalidAmount(format!("'{}' exceeds 2^128 - 1 minimal units", s));
        let scale = 10u128.checked_pow(decimals).ok_or_else(overflow)?;
        let fraction_scale = 10u128
            .checked_pow(decimals - fraction_part.len() as u32)
            .ok_or_else(overflow)?;

        integer
            .checked_mul(scale)
            .and_then(|v| fraction.checked_mul(fraction_scale).and_then(|f| v.checked_add(f)))
            .map(Self)
            .ok_or_else(overflow)
    }

    /// Get the raw minimal-unit value.
    pub const fn as_yoctonear(&self) -> u128 {
        self.0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Check if zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for NearToken {
    type Err = Error;

    /// Parse minimal units (`"1000"`), or whole NEAR with an explicit
    /// suffix (`"1.5 NEAR"`).
    fn from_str(s: &str) -> Result<Self> {
        if let Some(value) = s.strip_suffix(" NEAR") {
            return Self::from_decimal(value, NEAR_DECIMALS);
        }
        Self::from_yocto_str(s)
    }
}

impl Display for NearToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} yoctoNEAR", self.0)
    }
}

// Serde: serialize as string for JSON compatibility with NEAR RPC
impl Serialize for NearToken {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for NearToken {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        Self::from_yocto_str(&s).map_err(serde::de::Error::custom)
    }
}

impl BorshSerialize for NearToken {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.0, writer)
    }
}

impl BorshDeserialize for NearToken {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self(u128::deserialize_reader(reader)?))
    }
}

// ============================================================================
// Gas
// ============================================================================

/// Gas per teragas.
const GAS_PER_TGAS: u64 = 1_000_000_000_000;

/// Gas units attached to a function call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Gas(u64);

impl Gas {
    /// Zero gas.
    pub const ZERO: Self = Self(0);
    /// One teragas (10^12).
    pub const ONE_TGAS: Self = Self(GAS_PER_TGAS);

    /// Create from raw gas units.
    pub const fn from_gas(gas: u64) -> Self {
        Self(gas)
    }

    /// Create from teragas (10^12).
    pub const fn from_tgas(tgas: u64) -> Self {
        Self(tgas * GAS_PER_TGAS)
    }

    /// Get raw gas value.
    pub const fn as_gas(&self) -> u64 {
        self.0
    }
}

impl FromStr for Gas {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        encoding::parse_u64_decimal(s).map(Self)
    }
}

impl Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gas", self.0)
    }
}

impl Serialize for Gas {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Gas {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v: u64 = serde::Deserialize::deserialize(d)?;
        Ok(Self(v))
    }
}

impl BorshSerialize for Gas {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.0, writer)
    }
}

impl BorshDeserialize for Gas {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self(u64::deserialize_reader(reader)?))
    }
}

// ============================================================================
// IntoNearToken trait
// ============================================================================

/// Trait for values that can be converted into a [`NearToken`].
///
/// Strings are minimal units as decimal integers. Negative, non-numeric and
/// overflowing inputs fail with [`Error::InvalidAmount`].
pub trait IntoNearToken {
    /// Convert into a NearToken.
    fn into_near_token(self) -> Result<NearToken>;
}

impl IntoNearToken for NearToken {
    fn into_near_token(self) -> Result<NearToken> {
        Ok(self)
    }
}

impl IntoNearToken for u128 {
    fn into_near_token(self) -> Result<NearToken> {
        Ok(NearToken(self))
    }
}

impl IntoNearToken for i128 {
    fn into_near_token(self) -> Result<NearToken> {
        u128::try_from(self)
            .map(NearToken)
            .map_err(|_| Error::InvalidAmount(format!("'{}' is negative", self)))
    }
}

impl IntoNearToken for &str {
    fn into_near_token(self) -> Result<NearToken> {
        NearToken::from_yocto_str(self)
    }
}

impl IntoNearToken for String {
    fn into_near_token(self) -> Result<NearToken> {
        NearToken::from_yocto_str(&self)
    }
}

impl IntoNearToken for &String {
    fn into_near_token(self) -> Result<NearToken> {
        NearToken::from_yocto_str(self)
    }
}

// ============================================================================
// IntoGas trait
// ============================================================================

/// Trait for values that can be converted into [`Gas`].
///
/// Wide integers are narrowed with a range check: negative values or values
/// above `2^64 - 1` fail with [`Error::EncodingOverflow`].
pub trait IntoGas {
    /// Convert into Gas.
    fn into_gas(self) -> Result<Gas>;
}

impl IntoGas for Gas {
    fn into_gas(self) -> Result<Gas> {
        Ok(self)
    }
}

impl IntoGas for u64 {
    fn into_gas(self) -> Result<Gas> {
        Ok(Gas(self))
    }
}

impl IntoGas for i64 {
    fn into_gas(self) -> Result<Gas> {
        encoding::narrow_u64(self.into()).map(Gas)
    }
}

impl IntoGas for u128 {
    fn into_gas(self) -> Result<Gas> {
        u64::try_from(self)
            .map(Gas)
            .map_err(|_| Error::EncodingOverflow(format!("gas {} exceeds 2^64 - 1", self)))
    }
}

impl IntoGas for i128 {
    fn into_gas(self) -> Result<Gas> {
        encoding::narrow_u64(self).map(Gas)
    }
}

impl IntoGas for &str {
    fn into_gas(self) -> Result<Gas> {
        self.parse()
    }
}

impl IntoGas for String {
    fn into_gas(self) -> Result<Gas> {
        self.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // NearToken
    // ========================================================================

    #[test]
    fn test_from_yocto_str() {
        let amount = NearToken::from_yocto_str("222000000000000000000000").unwrap();
        assert_eq!(amount.as_yoctonear(), 222_000_000_000_000_000_000_000);
        assert!(NearToken::from_yocto_str("0").unwrap().is_zero());
    }

    #[test]
    fn test_from_yocto_str_rejects() {
        for input in ["-1", "abc", "1.5", "", "340282366920938463463374607431768211456"] {
            assert!(
                matches!(NearToken::from_yocto_str(input), Err(Error::InvalidAmount(_))),
                "expected InvalidAmount for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_from_decimal_exact_scaling() {
        assert_eq!(
            NearToken::from_decimal("0.222", 24).unwrap().as_yoctonear(),
            222_000_000_000_000_000_000_000
        );
        assert_eq!(
            NearToken::from_decimal("1", 24).unwrap(),
            NearToken::ONE_NEAR
        );
        assert_eq!(
            NearToken::from_decimal(".5", 1).unwrap().as_yoctonear(),
            5
        );
        assert_eq!(
            NearToken::from_decimal("3.", 2).unwrap().as_yoctonear(),
            300
        );
        assert_eq!(
            NearToken::from_decimal("0.000000000000000000000001", 24).unwrap(),
            NearToken::ONE_YOCTO
        );
    }

    #[test]
    fn test_from_decimal_rejects_excess_precision() {
        assert!(matches!(
            NearToken::from_decimal("0.0000000000000000000000001", 24),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_from_decimal_rejects_bad_input() {
        for input in ["", ".", "-1", "1.-5", "1,5", "abc", "1.2.3"] {
            assert!(
                matches!(NearToken::from_decimal(input, 24), Err(Error::InvalidAmount(_))),
                "expected InvalidAmount for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_from_decimal_overflow() {
        assert!(matches!(
            NearToken::from_decimal("340282366920938463463375", 24),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_from_str_with_suffix() {
        let amount: NearToken = "0.222 NEAR".parse().unwrap();
        assert_eq!(amount.as_yoctonear(), 222_000_000_000_000_000_000_000);

        let raw: NearToken = "1000".parse().unwrap();
        assert_eq!(raw.as_yoctonear(), 1000);
    }

    #[test]
    fn test_into_near_token() {
        assert_eq!(5u128.into_near_token().unwrap().as_yoctonear(), 5);
        assert!(matches!(
            (-5i128).into_near_token(),
            Err(Error::InvalidAmount(_))
        ));
        assert_eq!("7".into_near_token().unwrap().as_yoctonear(), 7);
        assert_eq!(
            "7".to_string().into_near_token().unwrap().as_yoctonear(),
            7
        );
    }

    #[test]
    fn test_near_token_borsh_is_16_bytes_le() {
        let amount = NearToken::from_yoctonear(222_000_000_000_000_000_000_000);
        let bytes = borsh::to_vec(&amount).unwrap();
        assert_eq!(
            hex::encode(bytes),
            "0000c00e97b1e4a4022f000000000000"
        );
    }

    #[test]
    fn test_near_token_serde_as_string() {
        let amount = NearToken::from_yoctonear(u128::MAX);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"340282366920938463463374607431768211455\"");
        let parsed: NearToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, amount);
    }

    // ========================================================================
    // Gas
    // ========================================================================

    #[test]
    fn test_into_gas_in_range() {
        assert_eq!(1u64.into_gas().unwrap().as_gas(), 1);
        assert_eq!(1i64.into_gas().unwrap().as_gas(), 1);
        assert_eq!((u64::MAX as u128).into_gas().unwrap().as_gas(), u64::MAX);
        assert_eq!((u64::MAX as i128).into_gas().unwrap().as_gas(), u64::MAX);
        assert_eq!("30000000000000".into_gas().unwrap(), Gas::from_tgas(30));
    }

    #[test]
    fn test_into_gas_out_of_range() {
        assert!(matches!(
            (u64::MAX as u128 + 1).into_gas(),
            Err(Error::EncodingOverflow(_))
        ));
        assert!(matches!(
            (u64::MAX as i128 + 1).into_gas(),
            Err(Error::EncodingOverflow(_))
        ));
        assert!(matches!((-1i64).into_gas(), Err(Error::EncodingOverflow(_))));
        assert!(matches!((-1i128).into_gas(), Err(Error::EncodingOverflow(_))));
        assert!(matches!(
            "18446744073709551616".into_gas(),
            Err(Error::EncodingOverflow(_))
        ));
        assert!(matches!("-1".into_gas(), Err(Error::EncodingOverflow(_))));
    }

    #[test]
    fn test_gas_borsh_is_8_bytes_le() {
        let bytes = borsh::to_vec(&Gas::from_gas(1)).unwrap();
        assert_eq!(bytes, vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }
}
