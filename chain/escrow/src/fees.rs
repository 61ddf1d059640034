//! Protocol fee policy
//!
//! A single process-wide rate expressed in parts-per-thousand. A rate of 10
//! on an amount of 100 units yields a fee of 1 unit. The computation floors,
//! so truncation favors the winner.

use rust_decimal::Decimal;

use crate::errors::VaultError;

/// Upper bound on the fee rate: 1000 per-mille = 100%.
pub const MAX_FEE_PER_MILLE: u32 = 1_000;

const FEE_SCALE: u32 = 1_000;

/// Fee-rate storage and fee computation. Defaults to zero.
#[derive(Debug, Clone, Default)]
pub struct FeePolicy {
    rate_per_mille: u32,
}

impl FeePolicy {
    /// Create a policy with a zero rate.
    pub fn new() -> Self {
        Self { rate_per_mille: 0 }
    }

    /// Store a new rate. Rates above [`MAX_FEE_PER_MILLE`] are rejected;
    /// beyond 100% the payout arithmetic would underflow.
    pub(crate) fn set_rate(&mut self, rate_per_mille: u32) -> Result<(), VaultError> {
        if rate_per_mille > MAX_FEE_PER_MILLE {
            return Err(VaultError::InvalidAmount);
        }
        self.rate_per_mille = rate_per_mille;
        Ok(())
    }

    /// The current rate in parts-per-thousand.
    pub fn rate_per_mille(&self) -> u32 {
        self.rate_per_mille
    }

    /// Compute `floor(amount * rate / 1000)`. Pure, no side effects.
    pub fn calculate(&self, amount: Decimal) -> Decimal {
        (amount * Decimal::from(self.rate_per_mille) / Decimal::from(FEE_SCALE)).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_is_zero() {
        let policy = FeePolicy::new();
        assert_eq!(policy.rate_per_mille(), 0);
        assert_eq!(policy.calculate(Decimal::from(1_000_000)), Decimal::ZERO);
    }

    #[test]
    fn test_per_mille_scale() {
        let mut policy = FeePolicy::new();
        policy.set_rate(10).unwrap();
        assert_eq!(policy.calculate(Decimal::from(100)), Decimal::from(1));
        assert_eq!(policy.calculate(Decimal::from(200)), Decimal::from(2));
    }

    #[test]
    fn test_fee_floors_toward_winner() {
        let mut policy = FeePolicy::new();
        policy.set_rate(15).unwrap();
        // 10 * 15 / 1000 = 0.15 -> 0
        assert_eq!(policy.calculate(Decimal::from(10)), Decimal::ZERO);
        // 150 * 15 / 1000 = 2.25 -> 2
        assert_eq!(policy.calculate(Decimal::from(150)), Decimal::from(2));
    }

    #[test]
    fn test_full_rate_takes_everything() {
        let mut policy = FeePolicy::new();
        policy.set_rate(MAX_FEE_PER_MILLE).unwrap();
        assert_eq!(policy.calculate(Decimal::from(77)), Decimal::from(77));
    }

    #[test]
    fn test_rate_above_cap_rejected() {
        let mut policy = FeePolicy::new();
        let result = policy.set_rate(MAX_FEE_PER_MILLE + 1);
        assert_eq!(result, Err(VaultError::InvalidAmount));
        assert_eq!(policy.rate_per_mille(), 0);
    }
}
