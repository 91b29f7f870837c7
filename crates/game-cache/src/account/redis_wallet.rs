//! Wallet balances in Redis.
//!
//! `wallet:<user_id>` holds an integer balance, opened at
//! [`DEFAULT_BALANCE`](super::DEFAULT_BALANCE) on first access.

use super::DEFAULT_BALANCE;
use crate::pool::{CacheResult, RedisPool};
use async_trait::async_trait;
use game_core::{DomainError, RepoResult, Wallet};
use redis::AsyncCommands;

/// Key prefix for balances
const WALLET_PREFIX: &str = "wallet:";

/// Atomic check-and-decrement. Returns `{applied, balance}`.
const WITHDRAW_SCRIPT: &str = r"
local balance = tonumber(redis.call('GET', KEYS[1]) or ARGV[2])
local amount = tonumber(ARGV[1])
if balance < amount then
    return {0, balance}
end
balance = balance - amount
redis.call('SET', KEYS[1], balance)
return {1, balance}
";

/// `Wallet` over Redis
#[derive(Clone, Debug)]
pub struct RedisWallet {
    pool: RedisPool,
}

impl RedisWallet {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn wallet_key(user_id: &str) -> String {
        format!("{WALLET_PREFIX}{user_id}")
    }

    async fn open_and_get(&self, key: &str) -> CacheResult<i64> {
        let mut conn = self.pool.get().await?;
        let _: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(DEFAULT_BALANCE)
            .arg("NX")
            .query_async(&mut conn)
            .await?;
        let balance: i64 = conn.get(key).await?;
        Ok(balance)
    }

    async fn increment(&self, key: &str, amount: i64) -> CacheResult<i64> {
        self.open_and_get(key).await?;
        let mut conn = self.pool.get().await?;
        let balance: i64 = conn.incr(key, amount).await?;
        Ok(balance)
    }

    async fn decrement(&self, key: &str, amount: i64) -> CacheResult<(bool, i64)> {
        let mut conn = self.pool.get().await?;
        let result: Vec<i64> = redis::Script::new(WITHDRAW_SCRIPT)
            .key(key)
            .arg(amount)
            .arg(DEFAULT_BALANCE)
            .invoke_async(&mut conn)
            .await?;
        match result.as_slice() {
            [applied, balance] => Ok((*applied == 1, *balance)),
            _ => Err(crate::pool::CacheError::WrongType(key.to_string())),
        }
    }
}

#[async_trait]
impl Wallet for RedisWallet {
    async fn get_balance(&self, user_id: &str) -> RepoResult<i64> {
        Ok(self.open_and_get(&Self::wallet_key(user_id)).await?)
    }

    async fn deposit(&self, user_id: &str, amount: i64) -> RepoResult<i64> {
        if amount <= 0 {
            return Err(DomainError::InvalidRequest(format!(
                "deposit amount must be positive, got {amount}"
            )));
        }
        Ok(self.increment(&Self::wallet_key(user_id), amount).await?)
    }

    async fn withdraw(&self, user_id: &str, amount: i64) -> RepoResult<i64> {
        if amount <= 0 {
            return Err(DomainError::InvalidRequest(format!(
                "withdraw amount must be positive, got {amount}"
            )));
        }
        let (applied, balance) = self.decrement(&Self::wallet_key(user_id), amount).await?;
        if applied {
            Ok(balance)
        } else {
            Err(DomainError::InsufficientBalance {
                requested: amount,
                available: balance,
            })
        }
    }
}
