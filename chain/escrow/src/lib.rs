//! Escrow Locker Engine — stake custody, pooling, and winner resolution
//!
//! Participants lock equal stakes of a whitelisted token into named lockers;
//! the owner closes a locker and declares a winner, who is credited the
//! pooled stake minus a protocol fee. Winners and the protocol withdraw
//! accrued balances per token.
//!
//! The surrounding execution environment is expected to serialize calls and
//! authenticate callers; the fungible-token system is reached through the
//! [`token::TokenTransfer`] trait.
//!
//! # Modules
//! - `errors`: Engine error taxonomy
//! - `events`: Typed event records emitted by operations
//! - `security`: Owner guard and reentrancy guard
//! - `registry`: Token whitelist
//! - `fees`: Per-mille fee policy
//! - `ledger`: Withdrawable balance and fee-balance accounting
//! - `locker`: Locker record and state machine
//! - `token`: Token collaborator trait and in-memory implementation
//! - `vault`: The orchestrating engine exposing every public operation

pub mod errors;
pub mod events;
pub mod fees;
pub mod ledger;
pub mod locker;
pub mod registry;
pub mod security;
pub mod token;
pub mod vault;

/// Engine ABI version — frozen after release
pub const VAULT_ABI_VERSION: &str = "1.0.0";
