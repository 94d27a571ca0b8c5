//! Ledger entries. A transaction row is immutable once persisted; the sign of
//! a balance change is carried by the type, not by a signed amount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranType {
    Deposit,
    Withdraw,
    Transfer,
}

impl TranType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranType::Deposit => "deposit",
            TranType::Withdraw => "withdraw",
            TranType::Transfer => "transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(TranType::Deposit),
            "withdraw" => Some(TranType::Withdraw),
            "transfer" => Some(TranType::Transfer),
            _ => None,
        }
    }
}

impl std::fmt::Display for TranType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted ledger entry. For `deposit` and `withdraw`, sender and
/// receiver are the same wallet; for `transfer` they are distinct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub tran_type: TranType,
}

impl Transaction {
    /// Signed contribution of this entry to the given wallet's balance:
    /// positive when the wallet receives, negative when it sends.
    pub fn signed_amount_for(&self, wallet_id: i64) -> Decimal {
        match self.tran_type {
            TranType::Deposit if self.receiver_id == wallet_id => self.amount,
            TranType::Withdraw if self.sender_id == wallet_id => -self.amount,
            TranType::Transfer if self.receiver_id == wallet_id => self.amount,
            TranType::Transfer if self.sender_id == wallet_id => -self.amount,
            _ => Decimal::ZERO,
        }
    }
}

/// A pending ledger entry: produced by a domain operation, not yet durable.
/// It is either committed in the same storage transaction as the balance it
/// explains, or discarded without leaving any trace.
///
/// Entries produced before the wallet has an id (initial deposit on create)
/// carry zero ids; the storage layer stamps the assigned wallet id at insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub tran_type: TranType,
}
