//! Balance ledger
//!
//! Per-(account, token) withdrawable balances and per-token protocol fee
//! balances. Entries are created implicitly at zero and are never negative.
//! All arithmetic is checked; mutation happens only through the vault's
//! operations.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::ids::AccountId;

use crate::errors::LedgerError;

/// Withdrawable credit accrued from resolutions, plus protocol fee accrual.
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    /// Balances: account -> (token -> amount)
    balances: HashMap<AccountId, HashMap<String, Decimal>>,
    /// Protocol fee accrued per token
    fee_balances: HashMap<String, Decimal>,
}

impl BalanceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            fee_balances: HashMap::new(),
        }
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Withdrawable balance for an account and token. Zero if absent.
    pub fn balance(&self, account: &AccountId, token: &str) -> Decimal {
        self.balances
            .get(account)
            .and_then(|tokens| tokens.get(token))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Accrued protocol fee for a token. Zero if absent.
    pub fn fee_balance(&self, token: &str) -> Decimal {
        self.fee_balances.get(token).copied().unwrap_or(Decimal::ZERO)
    }

    // ───────────────────────── Credits ─────────────────────────

    /// Credit an account's withdrawable balance, with overflow protection.
    pub(crate) fn credit(
        &mut self,
        account: &AccountId,
        token: &str,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let new_balance = self
            .balance(account, token)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances
            .entry(*account)
            .or_default()
            .insert(token.to_string(), new_balance);
        Ok(())
    }

    /// Credit a resolution's payout and fee together.
    ///
    /// Both additions are validated before either is applied, so a failure
    /// leaves the ledger untouched.
    pub(crate) fn credit_resolution(
        &mut self,
        winner: &AccountId,
        token: &str,
        payout: Decimal,
        fee: Decimal,
    ) -> Result<(), LedgerError> {
        let new_balance = self
            .balance(winner, token)
            .checked_add(payout)
            .ok_or(LedgerError::Overflow)?;
        let new_fee = self
            .fee_balance(token)
            .checked_add(fee)
            .ok_or(LedgerError::Overflow)?;
        self.balances
            .entry(*winner)
            .or_default()
            .insert(token.to_string(), new_balance);
        self.fee_balances.insert(token.to_string(), new_fee);
        Ok(())
    }

    // ───────────────────────── Debits ─────────────────────────

    /// Debit an account's withdrawable balance.
    ///
    /// Fails with `InsufficientBalance` if the stored balance (implicitly
    /// zero for unknown accounts) is less than `amount`.
    pub(crate) fn debit(
        &mut self,
        account: &AccountId,
        token: &str,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let current = self.balance(account, token);
        if current < amount {
            return Err(LedgerError::InsufficientBalance {
                token: token.to_string(),
                required: amount.to_string(),
                available: current.to_string(),
            });
        }
        let new_balance = current.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        self.balances
            .entry(*account)
            .or_default()
            .insert(token.to_string(), new_balance);
        Ok(())
    }

    /// Debit the protocol fee balance for a token.
    pub(crate) fn debit_fee(&mut self, token: &str, amount: Decimal) -> Result<(), LedgerError> {
        let current = self.fee_balance(token);
        if current < amount {
            return Err(LedgerError::InsufficientBalance {
                token: token.to_string(),
                required: amount.to_string(),
                available: current.to_string(),
            });
        }
        let new_balance = current.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        self.fee_balances.insert(token.to_string(), new_balance);
        Ok(())
    }

    // ───────────────────────── Unwind ─────────────────────────

    /// Restore an account balance to a previously observed value.
    ///
    /// Used only to unwind a debit after a failed outbound transfer.
    pub(crate) fn restore_balance(&mut self, account: &AccountId, token: &str, value: Decimal) {
        self.balances
            .entry(*account)
            .or_default()
            .insert(token.to_string(), value);
    }

    /// Restore a fee balance to a previously observed value.
    pub(crate) fn restore_fee_balance(&mut self, token: &str, value: Decimal) {
        self.fee_balances.insert(token.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_defaults_to_zero() {
        let ledger = BalanceLedger::new();
        assert_eq!(ledger.balance(&AccountId::new(), "USDT"), Decimal::ZERO);
        assert_eq!(ledger.fee_balance("USDT"), Decimal::ZERO);
    }

    #[test]
    fn test_credit_accumulates() {
        let mut ledger = BalanceLedger::new();
        let acc = AccountId::new();
        ledger.credit(&acc, "USDT", Decimal::from(100)).unwrap();
        ledger.credit(&acc, "USDT", Decimal::from(50)).unwrap();
        assert_eq!(ledger.balance(&acc, "USDT"), Decimal::from(150));
    }

    #[test]
    fn test_credit_overflow() {
        let mut ledger = BalanceLedger::new();
        let acc = AccountId::new();
        ledger.credit(&acc, "USDT", Decimal::MAX).unwrap();
        let result = ledger.credit(&acc, "USDT", Decimal::from(1));
        assert_eq!(result, Err(LedgerError::Overflow));
        assert_eq!(ledger.balance(&acc, "USDT"), Decimal::MAX);
    }

    #[test]
    fn test_credit_resolution_splits_exactly() {
        let mut ledger = BalanceLedger::new();
        let winner = AccountId::new();
        ledger
            .credit_resolution(&winner, "USDC", Decimal::from(198), Decimal::from(2))
            .unwrap();
        assert_eq!(ledger.balance(&winner, "USDC"), Decimal::from(198));
        assert_eq!(ledger.fee_balance("USDC"), Decimal::from(2));
    }

    #[test]
    fn test_credit_resolution_all_or_nothing() {
        let mut ledger = BalanceLedger::new();
        let winner = AccountId::new();
        ledger.credit(&winner, "USDC", Decimal::MAX).unwrap();
        // Payout addition overflows; the fee side must stay untouched.
        let result =
            ledger.credit_resolution(&winner, "USDC", Decimal::from(1), Decimal::from(1));
        assert_eq!(result, Err(LedgerError::Overflow));
        assert_eq!(ledger.fee_balance("USDC"), Decimal::ZERO);
    }

    #[test]
    fn test_debit_success() {
        let mut ledger = BalanceLedger::new();
        let acc = AccountId::new();
        ledger.credit(&acc, "USDT", Decimal::from(100)).unwrap();
        ledger.debit(&acc, "USDT", Decimal::from(40)).unwrap();
        assert_eq!(ledger.balance(&acc, "USDT"), Decimal::from(60));
    }

    #[test]
    fn test_debit_insufficient() {
        let mut ledger = BalanceLedger::new();
        let acc = AccountId::new();
        ledger.credit(&acc, "USDT", Decimal::from(10)).unwrap();
        let result = ledger.debit(&acc, "USDT", Decimal::from(11));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.balance(&acc, "USDT"), Decimal::from(10));
    }

    #[test]
    fn test_debit_unknown_account() {
        let mut ledger = BalanceLedger::new();
        let result = ledger.debit(&AccountId::new(), "USDT", Decimal::from(1));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_fee_debit_and_restore() {
        let mut ledger = BalanceLedger::new();
        let winner = AccountId::new();
        ledger
            .credit_resolution(&winner, "USDT", Decimal::from(95), Decimal::from(5))
            .unwrap();

        let prior = ledger.fee_balance("USDT");
        ledger.debit_fee("USDT", Decimal::from(5)).unwrap();
        assert_eq!(ledger.fee_balance("USDT"), Decimal::ZERO);

        ledger.restore_fee_balance("USDT", prior);
        assert_eq!(ledger.fee_balance("USDT"), Decimal::from(5));
    }

    #[test]
    fn test_fee_debit_insufficient() {
        let mut ledger = BalanceLedger::new();
        let result = ledger.debit_fee("USDT", Decimal::from(1));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_balances_isolated_per_account_and_token() {
        let mut ledger = BalanceLedger::new();
        let a = AccountId::new();
        let b = AccountId::new();
        ledger.credit(&a, "USDT", Decimal::from(10)).unwrap();
        ledger.credit(&a, "USDC", Decimal::from(20)).unwrap();
        ledger.credit(&b, "USDT", Decimal::from(30)).unwrap();

        assert_eq!(ledger.balance(&a, "USDT"), Decimal::from(10));
        assert_eq!(ledger.balance(&a, "USDC"), Decimal::from(20));
        assert_eq!(ledger.balance(&b, "USDT"), Decimal::from(30));
        assert_eq!(ledger.balance(&b, "USDC"), Decimal::ZERO);
    }
}
