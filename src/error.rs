//! Error types for the token ledger

use crate::crypto::{address_to_hex, Address};
use crate::ledger::{Amount, ItemId};
use std::fmt;

/// Field-less classification of a [`LedgerError`], used when callers only
/// care about which rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    InvalidAmount,
    InvalidAddress,
    InsufficientBalance,
    AllowanceExceeded,
    AllowanceUnderflow,
    Unauthorized,
    DuplicateItem,
    UnknownItem,
    OwnerMismatch,
    Overflow,
    InvariantViolation,
    InvalidCall,
    CryptoError,
    Serialization,
    IoError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InvalidAmount,
    InvalidAddress,
    InsufficientBalance { account: Address, balance: Amount, requested: Amount },
    AllowanceExceeded { owner: Address, spender: Address, allowance: Amount, requested: Amount },
    AllowanceUnderflow { owner: Address, spender: Address, allowance: Amount, subtracted: Amount },
    Unauthorized(String),
    DuplicateItem(ItemId),
    UnknownItem(ItemId),
    OwnerMismatch { id: ItemId, expected: Address, actual: Address },
    Overflow,
    InvariantViolation(String),
    InvalidCall(String),
    CryptoError(String),
    Serialization(String),
    IoError(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount => ErrorKind::InvalidAmount,
            LedgerError::InvalidAddress => ErrorKind::InvalidAddress,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::AllowanceExceeded { .. } => ErrorKind::AllowanceExceeded,
            LedgerError::AllowanceUnderflow { .. } => ErrorKind::AllowanceUnderflow,
            LedgerError::Unauthorized(_) => ErrorKind::Unauthorized,
            LedgerError::DuplicateItem(_) => ErrorKind::DuplicateItem,
            LedgerError::UnknownItem(_) => ErrorKind::UnknownItem,
            LedgerError::OwnerMismatch { .. } => ErrorKind::OwnerMismatch,
            LedgerError::Overflow => ErrorKind::Overflow,
            LedgerError::InvariantViolation(_) => ErrorKind::InvariantViolation,
            LedgerError::InvalidCall(_) => ErrorKind::InvalidCall,
            LedgerError::CryptoError(_) => ErrorKind::CryptoError,
            LedgerError::Serialization(_) => ErrorKind::Serialization,
            LedgerError::IoError(_) => ErrorKind::IoError,
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::InvalidAmount => write!(f, "Invalid amount: value must be greater than zero"),
            LedgerError::InvalidAddress => write!(f, "Invalid address: the null address is not allowed"),
            LedgerError::InsufficientBalance { account, balance, requested } => write!(
                f,
                "Insufficient balance: {} holds {}, requested {}",
                address_to_hex(account),
                balance,
                requested
            ),
            LedgerError::AllowanceExceeded { owner, spender, allowance, requested } => write!(
                f,
                "Allowance exceeded: {} may spend {} from {}, requested {}",
                address_to_hex(spender),
                allowance,
                address_to_hex(owner),
                requested
            ),
            LedgerError::AllowanceUnderflow { owner, spender, allowance, subtracted } => write!(
                f,
                "Allowance underflow: {} of {} for {} cannot be reduced by {}",
                allowance,
                address_to_hex(owner),
                address_to_hex(spender),
                subtracted
            ),
            LedgerError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            LedgerError::DuplicateItem(id) => write!(f, "Duplicate item: {} already exists", id),
            LedgerError::UnknownItem(id) => write!(f, "Unknown item: {}", id),
            LedgerError::OwnerMismatch { id, expected, actual } => write!(
                f,
                "Owner mismatch: item {} is owned by {}, not {}",
                id,
                address_to_hex(actual),
                address_to_hex(expected)
            ),
            LedgerError::Overflow => write!(f, "Arithmetic overflow"),
            LedgerError::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
            LedgerError::InvalidCall(msg) => write!(f, "Invalid call: {}", msg),
            LedgerError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for LedgerError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
