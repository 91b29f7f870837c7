//! In-memory wallet.

use super::DEFAULT_BALANCE;
use async_trait::async_trait;
use dashmap::DashMap;
use game_core::{DomainError, RepoResult, Wallet};

/// `Wallet` kept in process memory
#[derive(Debug)]
pub struct MemoryWallet {
    balances: DashMap<String, i64>,
    opening_balance: i64,
}

impl MemoryWallet {
    #[must_use]
    pub fn new() -> Self {
        Self::with_opening_balance(DEFAULT_BALANCE)
    }

    #[must_use]
    pub fn with_opening_balance(opening_balance: i64) -> Self {
        Self {
            balances: DashMap::new(),
            opening_balance,
        }
    }
}

impl Default for MemoryWallet {
    fn default() -> Self {
        Self::new()
    }
}

fn require_positive(op: &str, amount: i64) -> RepoResult<()> {
    if amount > 0 {
        Ok(())
    } else {
        Err(DomainError::InvalidRequest(format!(
            "{op} amount must be positive, got {amount}"
        )))
    }
}

#[async_trait]
impl Wallet for MemoryWallet {
    async fn get_balance(&self, user_id: &str) -> RepoResult<i64> {
        Ok(*self
            .balances
            .entry(user_id.to_string())
            .or_insert(self.opening_balance))
    }

    async fn deposit(&self, user_id: &str, amount: i64) -> RepoResult<i64> {
        require_positive("deposit", amount)?;
        let mut balance = self
            .balances
            .entry(user_id.to_string())
            .or_insert(self.opening_balance);
        *balance += amount;
        Ok(*balance)
    }

    async fn withdraw(&self, user_id: &str, amount: i64) -> RepoResult<i64> {
        require_positive("withdraw", amount)?;
        let mut balance = self
            .balances
            .entry(user_id.to_string())
            .or_insert(self.opening_balance);
        if *balance < amount {
            return Err(DomainError::InsufficientBalance {
                requested: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(*balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_opening_balance() {
        let wallet = MemoryWallet::new();
        assert_eq!(wallet.get_balance("u1").await.unwrap(), 1_000_000);
    }

    #[tokio::test]
    async fn test_deposit_and_withdraw() {
        let wallet = MemoryWallet::with_opening_balance(100);
        assert_eq!(wallet.deposit("u1", 50).await.unwrap(), 150);
        assert_eq!(wallet.withdraw("u1", 120).await.unwrap(), 30);

        let err = wallet.withdraw("u1", 31).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientBalance {
                requested: 31,
                available: 30
            }
        ));
        assert!(wallet.deposit("u1", 0).await.is_err());
    }
}
