//! Transfer protocol: move an amount between two distinct wallets as one
//! indivisible operation, or not at all.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::transaction::{NewTransaction, TranType};
use crate::models::wallet::Wallet;

/// The outcome of a validated transfer: both wallets with their post-transfer
/// balances and the single pending `transfer` entry. The storage layer must
/// commit all three as one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Transfer {
    pub sender: Wallet,
    pub receiver: Wallet,
    pub entry: NewTransaction,
}

impl Transfer {
    /// Validation order is fixed so failures are deterministic: missing
    /// sender, missing receiver, same wallet, non-positive amount, then
    /// insufficient funds.
    pub fn create(
        sender: Option<Wallet>,
        receiver: Option<Wallet>,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Transfer> {
        let sender = sender.ok_or(LedgerError::MissingSender)?;
        let receiver = receiver.ok_or(LedgerError::MissingReceiver)?;
        if sender.id == receiver.id {
            return Err(LedgerError::SameSenderAndReceiver);
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        if sender.balance - amount < Decimal::ZERO {
            return Err(LedgerError::NotEnoughMoney);
        }

        let entry = NewTransaction {
            sender_id: sender.id,
            receiver_id: receiver.id,
            amount,
            timestamp: now,
            tran_type: TranType::Transfer,
        };

        Ok(Transfer {
            sender: Wallet {
                balance: sender.balance - amount,
                ..sender
            },
            receiver: Wallet {
                balance: receiver.balance + amount,
                ..receiver
            },
            entry,
        })
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
    fn missing_sender() {
        let err = Transfer::create(None, Some(wallet(1, dec!(50))), dec!(10), ts()).unwrap_err();
        assert!(matches!(err, LedgerError::MissingSender));
    }

    #[test]
    fn missing_receiver() {
        let err = Transfer::create(Some(wallet(1, dec!(50))), None, dec!(10), ts()).unwrap_err();
        assert!(matches!(err, LedgerError::MissingReceiver));
    }

    #[test]
    fn same_sender_and_receiver() {
        let err = Transfer::create(
            Some(wallet(1, dec!(50))),
            Some(wallet(1, dec!(50))),
            dec!(10),
            ts(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::SameSenderAndReceiver));
    }

    #[test]
    fn zero_and_negative_amounts() {
        for amount in [Decimal::ZERO, dec!(-1)] {
            let err = Transfer::create(
                Some(wallet(1, dec!(50))),
                Some(wallet(2, dec!(50))),
                amount,
                ts(),
            )
            .unwrap_err();
            assert!(matches!(err, LedgerError::NonPositiveAmount));
        }
    }

    #[test]
    fn insufficient_funds() {
        let err = Transfer::create(
            Some(wallet(1, dec!(99))),
            Some(wallet(2, Decimal::ZERO)),
            dec!(100),
            ts(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::NotEnoughMoney));
    }

    #[test]
    fn validation_order_is_deterministic() {
        // Everything is wrong here; the missing sender must win.
        let err = Transfer::create(None, None, dec!(-5), ts()).unwrap_err();
        assert!(matches!(err, LedgerError::MissingSender));
    }

    #[test]
    fn successful_transfer_moves_balance_and_produces_entry() {
        let transfer = Transfer::create(
            Some(wallet(1, dec!(150))),
            Some(wallet(2, dec!(50))),
            dec!(100),
            ts(),
        )
        .unwrap();

        assert_eq!(transfer.sender.balance, dec!(50));
        assert_eq!(transfer.receiver.balance, dec!(150));
        assert_eq!(
            transfer.entry,
            NewTransaction {
                sender_id: 1,
                receiver_id: 2,
                amount: dec!(100),
                timestamp: ts(),
                tran_type: TranType::Transfer,
            }
        );
    }

    #[test]
    fn exact_balance_can_be_transferred() {
        let transfer = Transfer::create(
            Some(wallet(1, dec!(100))),
            Some(wallet(2, dec!(200))),
            dec!(100),
            ts(),
        )
        .unwrap();
        assert_eq!(transfer.sender.balance, Decimal::ZERO);
        assert_eq!(transfer.receiver.balance, dec!(300));
    }
}
