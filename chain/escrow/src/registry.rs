//! Token whitelist
//!
//! The set of token identifiers the engine accepts for new lockers.
//! Append-only; mutation is owner-gated at the vault layer.

use std::collections::HashSet;

/// Whitelist of accepted token identifiers.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashSet<String>,
}

impl TokenRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tokens: HashSet::new(),
        }
    }

    /// Add a token to the whitelist. Idempotent.
    pub(crate) fn add(&mut self, token: impl Into<String>) {
        self.tokens.insert(token.into());
    }

    /// Check if a token is whitelisted.
    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Number of whitelisted tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if nothing has been whitelisted yet.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_check() {
        let mut registry = TokenRegistry::new();
        registry.add("USDT");
        assert!(registry.is_whitelisted("USDT"));
        assert!(!registry.is_whitelisted("SHIB"));
    }

    #[test]
    fn test_readd_is_idempotent() {
        let mut registry = TokenRegistry::new();
        registry.add("USDC");
        registry.add("USDC");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = TokenRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_whitelisted("USDT"));
    }
}
