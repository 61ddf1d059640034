//! Token collaborator seam
//!
//! The engine never implements a token standard; it moves funds through an
//! external fungible-token system expressed as the [`TokenTransfer`] trait.
//! Any failure from the collaborator is a hard abort of the enclosing
//! operation.
//!
//! [`InMemoryTokens`] is a multi-token balance/allowance ledger implementing
//! the trait; it backs the test suite and stands in for a real token system
//! at this layer.

use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;
use types::ids::AccountId;

/// Errors surfaced by a token collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Insufficient funds in {token}")]
    InsufficientFunds { token: String },

    #[error("Insufficient allowance for {token}")]
    InsufficientAllowance { token: String },

    #[error("Insufficient custody in {token}")]
    InsufficientCustody { token: String },
}

/// Interface the engine requires from the fungible-token system.
///
/// `transfer_from` pulls funds from an account into the engine's custody;
/// `transfer` pays funds out of custody to an account.
pub trait TokenTransfer {
    /// Pull `amount` of `token` from `from` into engine custody.
    fn transfer_from(
        &mut self,
        token: &str,
        from: &AccountId,
        amount: Decimal,
    ) -> Result<(), TokenError>;

    /// Pay `amount` of `token` out of engine custody to `to`.
    fn transfer(&mut self, token: &str, to: &AccountId, amount: Decimal)
        -> Result<(), TokenError>;

    /// Balance of `account` in `token`.
    fn balance_of(&self, token: &str, account: &AccountId) -> Decimal;
}

/// In-memory multi-token ledger with per-account balances and engine
/// allowances.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokens {
    /// token -> (account -> balance)
    balances: HashMap<String, HashMap<AccountId, Decimal>>,
    /// token -> (account -> amount the engine may pull)
    allowances: HashMap<String, HashMap<AccountId, Decimal>>,
    /// token -> amount held in engine custody
    custody: HashMap<String, Decimal>,
}

impl InMemoryTokens {
    /// Create an empty token ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `token` to `account`.
    pub fn mint(&mut self, token: impl Into<String>, account: AccountId, amount: Decimal) {
        let entry = self
            .balances
            .entry(token.into())
            .or_default()
            .entry(account)
            .or_insert(Decimal::ZERO);
        *entry += amount;
    }

    /// Grant the engine an allowance to pull up to `amount` from `account`.
    pub fn approve(&mut self, token: impl Into<String>, account: AccountId, amount: Decimal) {
        self.allowances
            .entry(token.into())
            .or_default()
            .insert(account, amount);
    }

    /// Remaining allowance the engine holds on `account`.
    pub fn allowance(&self, token: &str, account: &AccountId) -> Decimal {
        self.allowances
            .get(token)
            .and_then(|a| a.get(account))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Amount of `token` currently in engine custody.
    pub fn custody(&self, token: &str) -> Decimal {
        self.custody.get(token).copied().unwrap_or(Decimal::ZERO)
    }
}

impl TokenTransfer for InMemoryTokens {
    fn transfer_from(
        &mut self,
        token: &str,
        from: &AccountId,
        amount: Decimal,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(token, from);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                token: token.to_string(),
            });
        }
        let balance = self.balance_of(token, from);
        if balance < amount {
            return Err(TokenError::InsufficientFunds {
                token: token.to_string(),
            });
        }

        self.allowances
            .entry(token.to_string())
            .or_default()
            .insert(*from, allowance - amount);
        self.balances
            .entry(token.to_string())
            .or_default()
            .insert(*from, balance - amount);
        let custody = self.custody.entry(token.to_string()).or_insert(Decimal::ZERO);
        *custody += amount;
        Ok(())
    }

    fn transfer(
        &mut self,
        token: &str,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), TokenError> {
        let custody = self.custody(token);
        if custody < amount {
            return Err(TokenError::InsufficientCustody {
                token: token.to_string(),
            });
        }
        self.custody.insert(token.to_string(), custody - amount);
        let entry = self
            .balances
            .entry(token.to_string())
            .or_default()
            .entry(*to)
            .or_insert(Decimal::ZERO);
        *entry += amount;
        Ok(())
    }

    fn balance_of(&self, token: &str, account: &AccountId) -> Decimal {
        self.balances
            .get(token)
            .and_then(|b| b.get(account))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
