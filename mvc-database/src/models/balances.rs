use std::fmt;

use serde::Serialize;

use crate::record::Record;

/// Amount held by a single user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Balance {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
}

impl Record for Balance {
    const TABLE: &'static str = "balances";
    const COLUMNS: &'static [&'static str] = &["user_id", "amount"];
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Balance(user_id={}, amount={})", self.user_id, self.amount)
    }
}
