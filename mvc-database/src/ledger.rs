use std::fmt;

use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::Database;
use crate::models::Balance;

/// Failure modes of ledger operations.
#[derive(Debug)]
pub enum LedgerError {
    /// Amounts must be strictly positive.
    InvalidAmount(i64),
    InsufficientFunds { available: i64, requested: i64 },
    UnknownUser(i64),
    SelfTransfer,
    /// The resulting balance would not fit in an `i64`.
    Overflow,
    Database(sqlx::Error),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(amount) => write!(f, "amount must be positive, got {amount}"),
            Self::InsufficientFunds {
                available,
                requested,
            } => write!(
                f,
                "insufficient funds: {requested} requested, {available} available"
            ),
            Self::UnknownUser(user_id) => write!(f, "user {user_id} does not exist"),
            Self::SelfTransfer => write!(f, "cannot transfer to the same user"),
            Self::Overflow => write!(f, "balance overflow"),
            Self::Database(source) => write!(f, "database error: {source}"),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(source) => Some(source),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(source: sqlx::Error) -> Self {
        Self::Database(source)
    }
}

/// Current amount held by `user_id`; users without a balance row hold 0.
pub async fn balance_of(db: &Database, user_id: i64) -> Result<i64, LedgerError> {
    if !user_exists(db.pool(), user_id).await? {
        return Err(LedgerError::UnknownUser(user_id));
    }

    let amount = sqlx::query_scalar::<_, i64>("SELECT amount FROM balances WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db.pool())
        .await?;

    Ok(amount.unwrap_or(0))
}

/// Add `amount` to a user's balance.
pub async fn deposit(db: &Database, user_id: i64, amount: i64) -> Result<Balance, LedgerError> {
    validate_amount(amount)?;

    let mut tx = db.pool().begin().await?;
    let current = lock_balance(&mut tx, user_id).await?;
    let updated = store_amount(&mut tx, user_id, credit(current.amount, amount)?).await?;
    tx.commit().await?;

    info!(user_id, amount, balance = updated.amount, "deposit applied");
    Ok(updated)
}

/// Remove `amount` from a user's balance without going below zero.
pub async fn withdraw(db: &Database, user_id: i64, amount: i64) -> Result<Balance, LedgerError> {
    validate_amount(amount)?;

    let mut tx = db.pool().begin().await?;
    let current = lock_balance(&mut tx, user_id).await?;
    let updated = store_amount(&mut tx, user_id, debit(current.amount, amount)?).await?;
    tx.commit().await?;

    info!(user_id, amount, balance = updated.amount, "withdrawal applied");
    Ok(updated)
}

/// Move `amount` from one user to another atomically.
///
/// Returns the sender's and the receiver's balances after the transfer.
pub async fn transfer(
    db: &Database,
    from_user_id: i64,
    to_user_id: i64,
    amount: i64,
) -> Result<(Balance, Balance), LedgerError> {
    validate_amount(amount)?;
    if from_user_id == to_user_id {
        return Err(LedgerError::SelfTransfer);
    }

    let mut tx = db.pool().begin().await?;

    // Rows are always locked in ascending user order.
    let (first, second) = lock_order(from_user_id, to_user_id);
    let first_balance = lock_balance(&mut tx, first).await?;
    let second_balance = lock_balance(&mut tx, second).await?;
    let (sender, receiver) = if first == from_user_id {
        (first_balance, second_balance)
    } else {
        (second_balance, first_balance)
    };

    let sender_amount = debit(sender.amount, amount)?;
    let receiver_amount = credit(receiver.amount, amount)?;
    let sender = store_amount(&mut tx, from_user_id, sender_amount).await?;
    let receiver = store_amount(&mut tx, to_user_id, receiver_amount).await?;
    tx.commit().await?;

    info!(from_user_id, to_user_id, amount, "transfer applied");
    Ok((sender, receiver))
}

/// Reject zero and negative amounts.
pub fn validate_amount(amount: i64) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}

fn credit(current: i64, amount: i64) -> Result<i64, LedgerError> {
    current.checked_add(amount).ok_or(LedgerError::Overflow)
}

fn debit(current: i64, amount: i64) -> Result<i64, LedgerError> {
    if amount > current {
        return Err(LedgerError::InsufficientFunds {
            available: current,
            requested: amount,
        });
    }
    Ok(current - amount)
}

fn lock_order(left: i64, right: i64) -> (i64, i64) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}

async fn user_exists<'e, E>(executor: E, user_id: i64) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

async fn lock_balance(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
) -> Result<Balance, LedgerError> {
    if !user_exists(&mut **tx, user_id).await? {
        return Err(LedgerError::UnknownUser(user_id));
    }

    sqlx::query(
        "INSERT INTO balances (user_id, amount) VALUES ($1, 0) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    let balance = sqlx::query_as::<_, Balance>(
        "SELECT id, user_id, amount FROM balances WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(balance)
}

async fn store_amount(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    amount: i64,
) -> Result<Balance, LedgerError> {
    let balance = sqlx::query_as::<_, Balance>(
        "UPDATE balances SET amount = $1 WHERE user_id = $2 RETURNING id, user_id, amount",
    )
    .bind(amount)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(balance)
}
