//! Engine-specific error types
//!
//! Error taxonomy for locker lifecycle, authorization, and balance
//! accounting. Every error aborts the enclosing operation with no partial
//! state change.

use thiserror::Error;

/// Balance-ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient balance for {token}: required {required}, available {available}")]
    InsufficientBalance {
        token: String,
        required: String,
        available: String,
    },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Vault-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VaultError {
    #[error("Unauthorized: caller is not the owner")]
    Unauthorized,

    #[error("Token not valid: {token}")]
    TokenNotValid { token: String },

    #[error("Locker already exists: {locker_id}")]
    AlreadyExists { locker_id: String },

    #[error("Locker not found: {locker_id}")]
    LockerNotFound { locker_id: String },

    #[error("Invalid locker state: expected {expected}, found {found}")]
    InvalidState { expected: String, found: String },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Token transfer failed for {token}")]
    TransferFailed { token: String },

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
