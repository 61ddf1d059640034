//! Locker records and lifecycle states
//!
//! A locker pools equal-sized stakes of one token pending a winner decision.
//! States move one way: `Open → Closed → Resolved`. A separate refund path
//! drains stakes out of an `Open` locker without a state change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::ids::AccountId;

use crate::errors::VaultError;

/// Lifecycle state of a locker. All transitions are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockerState {
    /// Accepting deposits and refunds
    Open,
    /// Closed to deposits, awaiting resolution
    Closed,
    /// Winner declared, funds moved to the ledger
    Resolved,
}

impl fmt::Display for LockerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LockerState::Open => "Open",
            LockerState::Closed => "Closed",
            LockerState::Resolved => "Resolved",
        };
        write!(f, "{}", name)
    }
}

/// An escrow record pooling equal stakes from multiple participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locker {
    /// Token the locker is denominated in; immutable after creation
    pub token: String,
    /// Fixed per-participant deposit; immutable after creation
    pub stake: Decimal,
    /// Pooled deposits currently attributed to the locker.
    /// Retains the pre-resolution pool after resolution for query.
    pub total_balance: Decimal,
    /// Number of deposits received, creator included
    pub players_count: u32,
    /// Depositors, one entry per deposit
    pub players: Vec<AccountId>,
    /// Lifecycle state
    pub state: LockerState,
    /// Set exactly once, at resolution
    pub winner: Option<AccountId>,
    /// Account that created the locker; informational
    pub creator: AccountId,
}

impl Locker {
    /// Create an open locker holding the creator's opening stake.
    pub fn new(token: impl Into<String>, stake: Decimal, creator: AccountId) -> Self {
        Self {
            token: token.into(),
            stake,
            total_balance: stake,
            players_count: 1,
            players: vec![creator],
            state: LockerState::Open,
            winner: None,
            creator,
        }
    }

    /// Guard: fail with `InvalidState` unless the locker is in `expected`.
    pub fn require_state(&self, expected: LockerState) -> Result<(), VaultError> {
        if self.state != expected {
            return Err(VaultError::InvalidState {
                expected: expected.to_string(),
                found: self.state.to_string(),
            });
        }
        Ok(())
    }
}
