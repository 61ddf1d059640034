//! Security primitives for the engine
//!
//! A single-owner access check and a reentrancy guard. The owner is fixed at
//! construction; there is no ownership transfer and no role table.

use types::ids::AccountId;

use crate::errors::VaultError;

/// Owner identity and permission check.
///
/// Every owner-gated operation calls [`AccessControl::require_owner`] at the
/// top before touching any state.
#[derive(Debug, Clone)]
pub struct AccessControl {
    owner: AccountId,
}

impl AccessControl {
    /// Create access control with a fixed owner.
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }

    /// Check if a caller is the owner. Pure check, no side effects.
    pub fn is_owner(&self, caller: &AccountId) -> bool {
        *caller == self.owner
    }

    /// Guard: fail with `Unauthorized` unless the caller is the owner.
    pub fn require_owner(&self, caller: &AccountId) -> Result<(), VaultError> {
        if !self.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    /// Get the owner identifier.
    pub fn owner(&self) -> AccountId {
        self.owner
    }
}

/// Reentrancy guard preventing nested calls into protected operations.
///
/// An operation acquires the guard before mutating state around an external
/// token call and releases it on completion. Any nested attempt fails.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `true` if successfully acquired.
    /// Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the guard.
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}
