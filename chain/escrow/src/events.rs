//! Engine events
//!
//! Events are immutable records emitted by successful operations. The vault
//! keeps them in an append-only log; failed operations emit nothing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{AccountId, LockerId};

/// A locker was created with the creator's opening stake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerCreated {
    pub locker_id: LockerId,
    pub token: String,
    pub creator: AccountId,
    pub stake: Decimal,
}

/// A participant matched the locker's stake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeDeposited {
    pub locker_id: LockerId,
    pub account: AccountId,
    pub amount: Decimal,
    pub players_count: u32,
}

/// A locker was closed to further deposits, pending resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerClosed {
    pub locker_id: LockerId,
}

/// A winner was declared and the pool split into payout and fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerDeclared {
    pub locker_id: LockerId,
    pub winner: AccountId,
    pub token: String,
    pub payout: Decimal,
    pub fee: Decimal,
}

/// A participant reclaimed their stake from an open locker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRefunded {
    pub locker_id: LockerId,
    pub account: AccountId,
    pub to: AccountId,
    pub token: String,
    pub amount: Decimal,
}

/// An accrued ledger balance was paid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceWithdrawn {
    pub account: AccountId,
    pub to: AccountId,
    pub token: String,
    pub amount: Decimal,
}

/// Accrued protocol fees were paid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeWithdrawn {
    pub to: AccountId,
    pub token: String,
    pub amount: Decimal,
}

/// Tokens were added to the whitelist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensListed {
    pub tokens: Vec<String>,
}

/// The protocol fee rate was changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRateUpdated {
    pub rate_per_mille: u32,
}

/// Enum wrapper for all engine events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowEvent {
    LockerCreated(LockerCreated),
    StakeDeposited(StakeDeposited),
    LockerClosed(LockerClosed),
    WinnerDeclared(WinnerDeclared),
    StakeRefunded(StakeRefunded),
    BalanceWithdrawn(BalanceWithdrawn),
    FeeWithdrawn(FeeWithdrawn),
    TokensListed(TokensListed),
    FeeRateUpdated(FeeRateUpdated),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locker_created_serialization() {
        let event = LockerCreated {
            locker_id: LockerId::from_label("match-7"),
            token: "USDT".to_string(),
            creator: AccountId::new(),
            stake: Decimal::from(100),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: LockerCreated = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_winner_declared_serialization() {
        let event = WinnerDeclared {
            locker_id: LockerId::from_label("match-7"),
            winner: AccountId::new(),
            token: "USDC".to_string(),
            payout: Decimal::from(198),
            fee: Decimal::from(2),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: WinnerDeclared = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_escrow_event_enum_variant() {
        let event = EscrowEvent::LockerClosed(LockerClosed {
            locker_id: LockerId::from_label("match-9"),
        });
        assert!(matches!(event, EscrowEvent::LockerClosed(_)));
    }
}
