use std::sync::Arc;

use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::error::Result;
use crate::models::{Transaction, Transfer};
use crate::storage::LedgerStorage;

pub struct TransferService {
    storage: Arc<dyn LedgerStorage>,
    clock: Arc<dyn Clock>,
}

impl TransferService {
    pub fn new(storage: Arc<dyn LedgerStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Move `amount` from sender to receiver, or fail without touching
    /// either. Missing wallets surface through the protocol's validation
    /// order, so the failure kind is deterministic.
    pub async fn create(
        &self,
        sender_id: i64,
        receiver_id: i64,
        amount: Decimal,
    ) -> Result<Transaction> {
        let sender = self.storage.get_wallet(sender_id).await?;
        let receiver = self.storage.get_wallet(receiver_id).await?;

        let transfer = Transfer::create(sender, receiver, amount, self.clock.now())?;
        self.storage.create_transfer(&transfer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::LedgerError;
    use crate::models::{TranType, Wallet};
    use crate::storage::MockLedgerStorage;
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::predicate::eq;
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

    fn service(storage: MockLedgerStorage) -> TransferService {
        TransferService::new(Arc::new(storage), Arc::new(FixedClock::new(ts())))
    }

    #[tokio::test]
    async fn transfer_commits_mutated_wallets_and_entry() {
        let mut storage = MockLedgerStorage::new();
        storage
            .expect_get_wallet()
            .with(eq(1))
            .returning(|_| Ok(Some(wallet(1, dec!(150)))));
        storage
            .expect_get_wallet()
            .with(eq(2))
            .returning(|_| Ok(Some(wallet(2, dec!(50)))));
        storage
            .expect_create_transfer()
            .withf(|transfer| {
                transfer.sender.balance == dec!(50)
                    && transfer.receiver.balance == dec!(150)
                    && transfer.entry.amount == dec!(100)
                    && transfer.entry.tran_type == TranType::Transfer
            })
            .returning(|transfer| {
                Ok(Transaction {
                    id: 42,
                    sender_id: transfer.entry.sender_id,
                    receiver_id: transfer.entry.receiver_id,
                    amount: transfer.entry.amount,
                    timestamp: transfer.entry.timestamp,
                    tran_type: transfer.entry.tran_type,
                })
            });

        let entry = service(storage).create(1, 2, dec!(100)).await.unwrap();
        assert_eq!(entry.id, 42);
        assert_eq!(entry.sender_id, 1);
        assert_eq!(entry.receiver_id, 2);
    }

    #[tokio::test]
    async fn missing_sender_fails_before_storage_commit() {
        let mut storage = MockLedgerStorage::new();
        storage.expect_get_wallet().with(eq(1)).returning(|_| Ok(None));
        storage
            .expect_get_wallet()
            .with(eq(2))
            .returning(|_| Ok(Some(wallet(2, dec!(50)))));
        storage.expect_create_transfer().never();

        let err = service(storage).create(1, 2, dec!(10)).await.unwrap_err();
        assert!(matches!(err, LedgerError::MissingSender));
    }

    #[tokio::test]
    async fn insufficient_funds_never_reaches_storage() {
        let mut storage = MockLedgerStorage::new();
        storage
            .expect_get_wallet()
            .with(eq(1))
            .returning(|_| Ok(Some(wallet(1, dec!(5)))));
        storage
            .expect_get_wallet()
            .with(eq(2))
            .returning(|_| Ok(Some(wallet(2, dec!(50)))));
        storage.expect_create_transfer().never();

        let err = service(storage).create(1, 2, dec!(10)).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotEnoughMoney));
    }
}
