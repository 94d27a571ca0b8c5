//! Wallet aggregate. Any balance change must produce exactly the ledger
//! entry that explains it; the pair travels together to the storage layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::models::transaction::{NewTransaction, TranType};

/// A persisted wallet. `balance` always equals the signed sum of the ledger
/// entries naming this wallet; the invariant is maintained incrementally,
/// never recomputed per call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    pub balance: Decimal,
}

/// A wallet that has not been assigned an id yet. Identity comes from the
/// storage layer at creation time, never from the domain.
#[derive(Clone, Debug, PartialEq)]
pub struct NewWallet {
    pub name: String,
    pub balance: Decimal,
}

impl Wallet {
    /// Validate a new wallet. A positive initial balance is explained by one
    /// pending `deposit` entry; the storage layer stamps the assigned wallet
    /// id on it at insert time.
    pub fn create(
        name: &str,
        initial_balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(NewWallet, Vec<NewTransaction>)> {
        if name.trim().is_empty() {
            return Err(LedgerError::MissingName);
        }
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::NegativeBalance);
        }

        let mut pending = Vec::new();
        if initial_balance > Decimal::ZERO {
            pending.push(NewTransaction {
                sender_id: 0,
                receiver_id: 0,
                amount: initial_balance,
                timestamp: now,
                tran_type: TranType::Deposit,
            });
        }

        Ok((
            NewWallet {
                name: name.to_owned(),
                balance: initial_balance,
            },
            pending,
        ))
    }

    /// Set the balance to `new_balance`, producing the single entry that
    /// explains the delta. A no-op update is a caller error, not silently
    /// accepted, so client bugs surface early.
    pub fn with_balance(
        &self,
        new_balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(Wallet, NewTransaction)> {
        if new_balance < Decimal::ZERO {
            return Err(LedgerError::NegativeBalance);
        }
        if new_balance == self.balance {
            return Err(LedgerError::NoBalanceChange);
        }

        let tran_type = if new_balance > self.balance {
            TranType::Deposit
        } else {
            TranType::Withdraw
        };
        let entry = NewTransaction {
            sender_id: self.id,
            receiver_id: self.id,
            amount: (self.balance - new_balance).abs(),
            timestamp: now,
            tran_type,
        };

        Ok((
            Wallet {
                id: self.id,
                name: self.name.clone(),
                balance: new_balance,
            },
            entry,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 10, 10, 10, 0, 0).unwrap()
    }

    fn wallet(id: i64, balance: Decimal) -> Wallet {
        Wallet {
            id,
            name: format!("wallet_{id}"),
            balance,
        }
    }

    #[test]
    fn create_rejects_empty_name() {
        assert!(matches!(
            Wallet::create("", dec!(10), ts()),
            Err(LedgerError::MissingName)
        ));
        assert!(matches!(
            Wallet::create("   ", dec!(10), ts()),
            Err(LedgerError::MissingName)
        ));
    }

    #[test]
    fn create_rejects_negative_balance() {
        assert!(matches!(
            Wallet::create("savings", dec!(-1), ts()),
            Err(LedgerError::NegativeBalance)
        ));
    }

    #[test]
    fn create_with_zero_balance_has_no_pending_entries() {
        let (wallet, pending) = Wallet::create("savings", Decimal::ZERO, ts()).unwrap();
        assert_eq!(wallet.balance, Decimal::ZERO);
        assert!(pending.is_empty());
    }

    #[test]
    fn create_with_positive_balance_produces_one_deposit() {
        let (wallet, pending) = Wallet::create("savings", dec!(100), ts()).unwrap();
        assert_eq!(wallet.balance, dec!(100));
        assert_eq!(
            pending,
            vec![NewTransaction {
                sender_id: 0,
                receiver_id: 0,
                amount: dec!(100),
                timestamp: ts(),
                tran_type: TranType::Deposit,
            }]
        );
    }

    #[test]
    fn update_rejects_negative_balance() {
        assert!(matches!(
            wallet(1, dec!(10)).with_balance(dec!(-1), ts()),
            Err(LedgerError::NegativeBalance)
        ));
    }

    #[test]
    fn update_rejects_unchanged_balance() {
        assert!(matches!(
            wallet(1, dec!(10)).with_balance(dec!(10), ts()),
            Err(LedgerError::NoBalanceChange)
        ));
    }

    #[test]
    fn update_to_zero_produces_withdraw_of_full_balance() {
        let (updated, entry) = wallet(1, dec!(100)).with_balance(Decimal::ZERO, ts()).unwrap();
        assert_eq!(updated.balance, Decimal::ZERO);
        assert_eq!(
            entry,
            NewTransaction {
                sender_id: 1,
                receiver_id: 1,
                amount: dec!(100),
                timestamp: ts(),
                tran_type: TranType::Withdraw,
            }
        );
    }

    #[test]
    fn update_upward_produces_deposit_of_delta() {
        let (updated, entry) = wallet(1, dec!(1)).with_balance(dec!(20), ts()).unwrap();
        assert_eq!(updated.balance, dec!(20));
        assert_eq!(entry.amount, dec!(19));
        assert_eq!(entry.tran_type, TranType::Deposit);
        assert_eq!(entry.sender_id, 1);
        assert_eq!(entry.receiver_id, 1);
    }
}
