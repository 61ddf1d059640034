//! Vault — locker lifecycle, balance accounting, fee split, access control
//!
//! The single engine instance owning all process-wide state: the locker
//! table, the balance ledger, the token whitelist, and the fee policy.
//! Every public operation is one atomic call; the execution environment
//! serializes invocations and supplies the authenticated caller.
//!
//! Operations that move tokens apply their internal mutations first, then
//! issue the collaborator call, and unwind the mutation if the call fails,
//! so no error path leaves partial state behind.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::ids::{AccountId, LockerId};

use crate::errors::{LedgerError, VaultError};
use crate::events::{
    BalanceWithdrawn, EscrowEvent, FeeRateUpdated, FeeWithdrawn, LockerClosed, LockerCreated,
    StakeDeposited, StakeRefunded, TokensListed, WinnerDeclared,
};
use crate::fees::FeePolicy;
use crate::ledger::BalanceLedger;
use crate::locker::{Locker, LockerState};
use crate::registry::TokenRegistry;
use crate::security::{AccessControl, ReentrancyGuard};
use crate::token::TokenTransfer;

/// The escrow engine.
///
/// All state-changing operations check, in order:
/// 1. Access control (where applicable)
/// 2. Operation-specific validation
/// 3. Reentrancy guard (where the token collaborator is invoked)
#[derive(Debug)]
pub struct Vault {
    /// Locker table: id -> record. Records persist after resolution.
    lockers: HashMap<LockerId, Locker>,
    /// Withdrawable balances and fee accrual
    ledger: BalanceLedger,
    /// Token whitelist
    registry: TokenRegistry,
    /// Protocol fee policy
    fees: FeePolicy,
    /// Owner identity
    access: AccessControl,
    /// Guard around operations that call out to the token system
    reentrancy: ReentrancyGuard,
    /// Emitted events log (append-only)
    events: Vec<EscrowEvent>,
}

impl Vault {
    /// Create a new vault with a fixed owner.
    pub fn new(owner: AccountId) -> Self {
        Self {
            lockers: HashMap::new(),
            ledger: BalanceLedger::new(),
            registry: TokenRegistry::new(),
            fees: FeePolicy::new(),
            access: AccessControl::new(owner),
            reentrancy: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Owner Operations ─────────────────────────

    /// Whitelist a batch of tokens. Owner-only; idempotent per element.
    pub fn add_tokens(
        &mut self,
        caller: &AccountId,
        tokens: Vec<String>,
    ) -> Result<(), VaultError> {
        self.access.require_owner(caller)?;
        for token in &tokens {
            self.registry.add(token.clone());
        }
        self.events
            .push(EscrowEvent::TokensListed(TokensListed { tokens }));
        Ok(())
    }

    /// Set the protocol fee rate in parts-per-thousand. Owner-only.
    pub fn set_fee(&mut self, caller: &AccountId, rate_per_mille: u32) -> Result<(), VaultError> {
        self.access.require_owner(caller)?;
        self.fees.set_rate(rate_per_mille)?;
        self.events
            .push(EscrowEvent::FeeRateUpdated(FeeRateUpdated { rate_per_mille }));
        Ok(())
    }

    // ───────────────────────── Locker Lifecycle ─────────────────────────

    /// Create a locker, pulling the creator's opening stake into custody.
    ///
    /// The stake fixes the per-participant deposit for the locker's life.
    pub fn create(
        &mut self,
        tokens: &mut impl TokenTransfer,
        caller: AccountId,
        id: LockerId,
        token: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        if !self.registry.is_whitelisted(token) {
            return Err(VaultError::TokenNotValid {
                token: token.to_string(),
            });
        }
        if self.lockers.contains_key(&id) {
            return Err(VaultError::AlreadyExists {
                locker_id: id.to_string(),
            });
        }
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }

        self.with_guard(|vault| {
            vault.lockers.insert(id, Locker::new(token, amount, caller));
            if tokens.transfer_from(token, &caller, amount).is_err() {
                vault.lockers.remove(&id);
                return Err(VaultError::TransferFailed {
                    token: token.to_string(),
                });
            }
            vault.events.push(EscrowEvent::LockerCreated(LockerCreated {
                locker_id: id,
                token: token.to_string(),
                creator: caller,
                stake: amount,
            }));
            Ok(())
        })
    }

    /// Join an open locker by matching its stake.
    pub fn deposit_locker(
        &mut self,
        tokens: &mut impl TokenTransfer,
        caller: AccountId,
        id: LockerId,
    ) -> Result<(), VaultError> {
        self.with_guard(|vault| {
            let locker = vault.lockers.get_mut(&id).ok_or_else(|| {
                VaultError::LockerNotFound {
                    locker_id: id.to_string(),
                }
            })?;
            locker.require_state(LockerState::Open)?;

            let token = locker.token.clone();
            let stake = locker.stake;
            locker.total_balance = locker
                .total_balance
                .checked_add(stake)
                .ok_or(LedgerError::Overflow)?;
            locker.players_count += 1;
            locker.players.push(caller);
            let players_count = locker.players_count;

            if tokens.transfer_from(&token, &caller, stake).is_err() {
                if let Some(locker) = vault.lockers.get_mut(&id) {
                    locker.total_balance -= stake;
                    locker.players_count -= 1;
                    locker.players.pop();
                }
                return Err(VaultError::TransferFailed { token });
            }
            vault.events.push(EscrowEvent::StakeDeposited(StakeDeposited {
                locker_id: id,
                account: caller,
                amount: stake,
                players_count,
            }));
            Ok(())
        })
    }

    /// Close an open locker to further deposits. Owner-only; no fund movement.
    pub fn close_locker(&mut self, caller: &AccountId, id: LockerId) -> Result<(), VaultError> {
        self.access.require_owner(caller)?;
        let locker = self
            .lockers
            .get_mut(&id)
            .ok_or_else(|| VaultError::LockerNotFound {
                locker_id: id.to_string(),
            })?;
        locker.require_state(LockerState::Open)?;
        locker.state = LockerState::Closed;
        self.events
            .push(EscrowEvent::LockerClosed(LockerClosed { locker_id: id }));
        Ok(())
    }

    /// Declare the winner of a closed locker. Owner-only; at most once.
    ///
    /// Splits the pooled balance into a winner payout and a protocol fee
    /// that sum to the pool exactly, credits both to the ledger, and moves
    /// the locker to `Resolved`.
    pub fn set_winner(
        &mut self,
        caller: &AccountId,
        id: LockerId,
        winner: AccountId,
    ) -> Result<(), VaultError> {
        self.access.require_owner(caller)?;
        let locker = self
            .lockers
            .get_mut(&id)
            .ok_or_else(|| VaultError::LockerNotFound {
                locker_id: id.to_string(),
            })?;
        locker.require_state(LockerState::Closed)?;

        let pool = locker.total_balance;
        let token = locker.token.clone();
        let fee = self.fees.calculate(pool);
        // The rate is capped at 1000 per-mille, so fee <= pool.
        let payout = pool - fee;

        self.ledger.credit_resolution(&winner, &token, payout, fee)?;
        locker.winner = Some(winner);
        locker.state = LockerState::Resolved;

        self.events.push(EscrowEvent::WinnerDeclared(WinnerDeclared {
            locker_id: id,
            winner,
            token,
            payout,
            fee,
        }));
        Ok(())
    }

    /// Reclaim a stake from an open locker, paying it straight to `to`.
    ///
    /// The refund path bypasses the ledger. The caller must hold a recorded
    /// deposit in the locker; one refund is allowed per recorded deposit.
    pub fn withdraw_locker(
        &mut self,
        tokens: &mut impl TokenTransfer,
        caller: AccountId,
        id: LockerId,
        to: AccountId,
    ) -> Result<(), VaultError> {
        self.with_guard(|vault| {
            let locker = vault.lockers.get_mut(&id).ok_or_else(|| {
                VaultError::LockerNotFound {
                    locker_id: id.to_string(),
                }
            })?;
            locker.require_state(LockerState::Open)?;

            let position = locker
                .players
                .iter()
                .position(|player| *player == caller)
                .ok_or(VaultError::Unauthorized)?;

            let token = locker.token.clone();
            let stake = locker.stake;
            locker.players.remove(position);
            locker.players_count -= 1;
            locker.total_balance -= stake;

            if tokens.transfer(&token, &to, stake).is_err() {
                if let Some(locker) = vault.lockers.get_mut(&id) {
                    locker.players.push(caller);
                    locker.players_count += 1;
                    locker.total_balance += stake;
                }
                return Err(VaultError::TransferFailed { token });
            }
            vault.events.push(EscrowEvent::StakeRefunded(StakeRefunded {
                locker_id: id,
                account: caller,
                to,
                token,
                amount: stake,
            }));
            Ok(())
        })
    }

    // ───────────────────────── Ledger Withdrawals ─────────────────────────

    /// Withdraw from the caller's accrued balance, paying out to `to`.
    ///
    /// The balance checked and debited is always the caller's own,
    /// independent of the destination.
    pub fn withdraw(
        &mut self,
        tokens: &mut impl TokenTransfer,
        caller: AccountId,
        to: AccountId,
        token: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }
        self.with_guard(|vault| {
            let prior = vault.ledger.balance(&caller, token);
            vault.ledger.debit(&caller, token, amount)?;
            if tokens.transfer(token, &to, amount).is_err() {
                vault.ledger.restore_balance(&caller, token, prior);
                return Err(VaultError::TransferFailed {
                    token: token.to_string(),
                });
            }
            vault
                .events
                .push(EscrowEvent::BalanceWithdrawn(BalanceWithdrawn {
                    account: caller,
                    to,
                    token: token.to_string(),
                    amount,
                }));
            Ok(())
        })
    }

    /// Withdraw accrued protocol fees. Owner-only.
    pub fn withdraw_fee(
        &mut self,
        tokens: &mut impl TokenTransfer,
        caller: &AccountId,
        to: AccountId,
        token: &str,
        amount: Decimal,
    ) -> Result<(), VaultError> {
        self.access.require_owner(caller)?;
        if amount <= Decimal::ZERO {
            return Err(VaultError::InvalidAmount);
        }
        self.with_guard(|vault| {
            let prior = vault.ledger.fee_balance(token);
            vault.ledger.debit_fee(token, amount)?;
            if tokens.transfer(token, &to, amount).is_err() {
                vault.ledger.restore_fee_balance(token, prior);
                return Err(VaultError::TransferFailed {
                    token: token.to_string(),
                });
            }
            vault.events.push(EscrowEvent::FeeWithdrawn(FeeWithdrawn {
                to,
                token: token.to_string(),
                amount,
            }));
            Ok(())
        })
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Look up a locker record.
    pub fn locker(&self, id: &LockerId) -> Option<&Locker> {
        self.lockers.get(id)
    }

    /// Withdrawable balance for an account and token. Zero if absent.
    pub fn balance(&self, account: &AccountId, token: &str) -> Decimal {
        self.ledger.balance(account, token)
    }

    /// Accrued protocol fee for a token. Zero if absent.
    pub fn fee_balance(&self, token: &str) -> Decimal {
        self.ledger.fee_balance(token)
    }

    /// Whitelist flag for a token.
    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.registry.is_whitelisted(token)
    }

    /// Current fee rate in parts-per-thousand.
    pub fn fee(&self) -> u32 {
        self.fees.rate_per_mille()
    }

    /// Compute the fee the current rate would take from `amount`. Pure.
    pub fn calculate_fee(&self, amount: Decimal) -> Decimal {
        self.fees.calculate(amount)
    }

    /// The vault owner.
    pub fn owner(&self) -> AccountId {
        self.access.owner()
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<EscrowEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn with_guard<T>(
        &mut self,
        operation: impl FnOnce(&mut Self) -> Result<T, VaultError>,
    ) -> Result<T, VaultError> {
        if !self.reentrancy.acquire() {
            return Err(VaultError::Reentrancy);
        }
        let result = operation(self);
        self.reentrancy.release();
        result
    }
}
