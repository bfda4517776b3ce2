//! Transaction action types.

use borsh::{BorshDeserialize, BorshSerialize};

use super::{Gas, IntoGas, IntoNearToken, NearToken};
use crate::error::{Error, Result};

/// Protocol discriminant of [`Action::FunctionCall`].
pub const FUNCTION_CALL_TAG: u8 = 2;

/// Protocol discriminant of [`Action::Transfer`].
pub const TRANSFER_TAG: u8 = 3;

/// A transaction action.
///
/// The protocol's action union has more variants (0 = CreateAccount,
/// 1 = DeployContract, 4 = Stake, ...). Only the two below are built here,
/// and they keep their protocol tags: 2 = FunctionCall, 3 = Transfer. The
/// Borsh impls are written by hand so each tag is spelled out next to its
/// payload instead of being derived from variant order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Call a contract function. (discriminant = 2)
    FunctionCall(FunctionCallAction),
    /// Transfer tokens. (discriminant = 3)
    Transfer(TransferAction),
}

/// Call a contract function.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FunctionCallAction {
    /// Method name to call.
    pub method_name: String,
    /// Arguments, opaque to the protocol (usually JSON).
    pub args: Vec<u8>,
    /// Gas to attach.
    pub gas: Gas,
    /// Tokens to attach.
    pub deposit: NearToken,
}

/// Transfer tokens.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransferAction {
    /// Amount to transfer, in minimal units.
    pub deposit: NearToken,
}

impl Action {
    /// Create a Transfer action.
    ///
    /// ```
    /// use near_tx::Action;
    ///
    /// let action = Action::transfer("222000000000000000000000").unwrap();
    /// assert_eq!(action.discriminant(), 3);
    ///
    /// assert!(Action::transfer("-1").is_err());
    /// ```
    pub fn transfer(deposit: impl IntoNearToken) -> Result<Self> {
        Ok(Self::Transfer(TransferAction {
            deposit: deposit.into_near_token()?,
        }))
    }

    /// Create a FunctionCall action.
    ///
    /// `args` is passed through unvalidated.
    ///
    /// ```
    /// use near_tx::Action;
    ///
    /// let action = Action::function_call(
    ///     "storage_balance_of",
    ///     br#"{"account_id": "serhii.testnet"}"#.to_vec(),
    ///     1u64,
    ///     "0",
    /// )
    /// .unwrap();
    /// assert_eq!(action.discriminant(), 2);
    /// ```
    pub fn function_call(
        method_name: impl Into<String>,
        args: Vec<u8>,
        gas: impl IntoGas,
        deposit: impl IntoNearToken,
    ) -> Result<Self> {
        let method_name = method_name.into();
        if method_name.is_empty() {
            return Err(Error::InvalidMethodName(
                "method name is empty".to_string(),
            ));
        }
        Ok(Self::FunctionCall(FunctionCallAction {
            method_name,
            args,
            gas: gas.into_gas()?,
            deposit: deposit.into_near_token()?,
        }))
    }

    /// The protocol discriminant byte of this action.
    pub fn discriminant(&self) -> u8 {
        match self {
            Action::FunctionCall(_) => FUNCTION_CALL_TAG,
            Action::Transfer(_) => TRANSFER_TAG,
        }
    }

    /// Deposit attached by this action.
    pub fn deposit(&self) -> NearToken {
        match self {
            Action::FunctionCall(call) => call.deposit,
            Action::Transfer(transfer) => transfer.deposit,
        }
    }
}

impl From<TransferAction> for Action {
    fn from(action: TransferAction) -> Self {
        Self::Transfer(action)
    }
}

impl From<FunctionCallAction> for Action {
    fn from(action: FunctionCallAction) -> Self {
        Self::FunctionCall(action)
    }
}

impl BorshSerialize for Action {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.discriminant(), writer)?;
        match self {
            Action::FunctionCall(call) => call.serialize(writer),
            Action::Transfer(transfer) => transfer.serialize(writer),
        }
    }
}

impl BorshDeserialize for Action {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        match u8::deserialize_reader(reader)? {
            FUNCTION_CALL_TAG => Ok(Self::FunctionCall(
                FunctionCallAction::deserialize_reader(reader)?,
            )),
            TRANSFER_TAG => Ok(Self::Transfer(TransferAction::deserialize_reader(reader)?)),
            tag => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported action discriminant: {}", tag),
            )),
        }
    }
}
