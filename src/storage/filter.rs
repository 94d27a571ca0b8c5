//! Typed transaction filter. Handlers hand the parsed struct to the storage
//! layer, which renders it as a parameterized WHERE clause; filter values
//! never appear in query text.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::models::TranType;

/// Conjunction of optional predicates; an empty filter matches every row.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TransactionFilter {
    #[serde(default)]
    pub sender_ids: Vec<i64>,
    #[serde(default)]
    pub receiver_ids: Vec<i64>,
    #[serde(default)]
    pub amount: Option<AmountRange>,
    #[serde(default)]
    pub timestamp: Option<TimestampRange>,
    #[serde(default)]
    pub types: Vec<TranType>,
}

/// Inclusive amount range; either bound may be omitted for an open range.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AmountRange {
    pub from: Option<Decimal>,
    pub to: Option<Decimal>,
}

/// Inclusive timestamp range; either bound may be omitted.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TimestampRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        self.sender_ids.is_empty()
            && self.receiver_ids.is_empty()
            && self.amount.is_none()
            && self.timestamp.is_none()
            && self.types.is_empty()
    }

    /// Append `AND ...` predicates to a query ending in `WHERE 1=1`.
    /// Every value goes through `push_bind`.
    pub fn apply(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if !self.sender_ids.is_empty() {
            builder.push(" AND sender_id IN (");
            let mut ids = builder.separated(", ");
            for id in &self.sender_ids {
                ids.push_bind(*id);
            }
            builder.push(")");
        }

        if !self.receiver_ids.is_empty() {
            builder.push(" AND receiver_id IN (");
            let mut ids = builder.separated(", ");
            for id in &self.receiver_ids {
                ids.push_bind(*id);
            }
            builder.push(")");
        }

        if let Some(amount) = &self.amount {
            if let Some(from) = amount.from {
                builder.push(" AND amount >= ");
                builder.push_bind(from);
            }
            if let Some(to) = amount.to {
                builder.push(" AND amount <= ");
                builder.push_bind(to);
            }
        }

        if let Some(timestamp) = &self.timestamp {
            if let Some(from) = timestamp.from {
                builder.push(" AND date >= ");
                builder.push_bind(from);
            }
            if let Some(to) = timestamp.to {
                builder.push(" AND date <= ");
                builder.push_bind(to);
            }
        }

        if !self.types.is_empty() {
            builder.push(" AND tran_type IN (");
            let mut types = builder.separated(", ");
            for t in &self.types {
                types.push_bind(t.as_str());
            }
            builder.push(")");
        }
    }
}
