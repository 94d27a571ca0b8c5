use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use crate::clock::Clock;
use crate::error::{LedgerError, Result};
use crate::models::{Transaction, Wallet};
use crate::storage::LedgerStorage;

pub struct WalletService {
    storage: Arc<dyn LedgerStorage>,
    clock: Arc<dyn Clock>,
}

impl WalletService {
    pub fn new(storage: Arc<dyn LedgerStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Create a wallet; a positive initial balance is committed together
    /// with the deposit entry that explains it.
    ///
    /// The name check here is read-then-write: two concurrent creates with
    /// the same name can both pass it. The unique constraint on the wallet
    /// table settles that race; the loser gets the same `DuplicateName`.
    pub async fn create(&self, name: &str, initial_balance: Decimal) -> Result<Wallet> {
        if let Some(existing) = self.storage.get_wallet_by_name(name).await? {
            warn!("wallet name '{}' already taken by wallet {}", name, existing.id);
            return Err(LedgerError::DuplicateName(name.to_owned()));
        }

        let (wallet, pending) = Wallet::create(name, initial_balance, self.clock.now())?;
        self.storage.create_wallet(wallet, pending).await
    }

    pub async fn get(&self, id: i64) -> Result<Wallet> {
        self.storage
            .get_wallet(id)
            .await?
            .ok_or(LedgerError::WalletNotFound(id))
    }

    pub async fn get_with_ledger(
        &self,
        id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Wallet, Vec<Transaction>)> {
        self.storage
            .get_wallet_with_ledger(id, limit, offset)
            .await?
            .ok_or(LedgerError::WalletNotFound(id))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Wallet>> {
        self.storage.list_wallets(limit, offset).await
    }

    /// Set a wallet's balance. The domain produces the single ledger entry
    /// explaining the delta; entry and balance commit atomically.
    pub async fn update_balance(&self, id: i64, new_balance: Decimal) -> Result<Wallet> {
        let wallet = self.get(id).await?;
        let (updated, entry) = wallet.with_balance(new_balance, self.clock.now())?;
        self.storage.update_wallet(&updated, vec![entry]).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{NewTransaction, TranType};
    use crate::storage::MockLedgerStorage;
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 10, 10, 10, 0, 0).unwrap()
    }

    fn service(storage: MockLedgerStorage) -> WalletService {
        WalletService::new(Arc::new(storage), Arc::new(FixedClock::new(ts())))
    }

    #[tokio::test]
    async fn create_rejects_taken_name() {
        let mut storage = MockLedgerStorage::new();
        storage
            .expect_get_wallet_by_name()
            .withf(|name| name == "savings")
            .returning(|_| {
                Ok(Some(Wallet {
                    id: 7,
                    name: "savings".into(),
                    balance: dec!(1),
                }))
            });
        storage.expect_create_wallet().never();

        let err = service(storage).create("savings", dec!(10)).await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateName(name) if name == "savings"));
    }

    #[tokio::test]
    async fn create_commits_wallet_with_initial_deposit() {
        let mut storage = MockLedgerStorage::new();
        storage.expect_get_wallet_by_name().returning(|_| Ok(None));
        storage
            .expect_create_wallet()
            .withf(|wallet, pending| {
                wallet.name == "savings"
                    && wallet.balance == dec!(100)
                    && pending.len() == 1
                    && pending[0].tran_type == TranType::Deposit
                    && pending[0].amount == dec!(100)
            })
            .returning(|wallet, _| {
                Ok(Wallet {
                    id: 1,
                    name: wallet.name,
                    balance: wallet.balance,
                })
            });

        let wallet = service(storage).create("savings", dec!(100)).await.unwrap();
        assert_eq!(wallet.id, 1);
        assert_eq!(wallet.balance, dec!(100));
    }

    #[tokio::test]
    async fn create_validation_failure_never_reaches_storage() {
        let mut storage = MockLedgerStorage::new();
        storage.expect_get_wallet_by_name().returning(|_| Ok(None));
        storage.expect_create_wallet().never();

        let err = service(storage).create("savings", dec!(-5)).await.unwrap_err();
        assert!(matches!(err, LedgerError::NegativeBalance));
    }

    #[tokio::test]
    async fn update_balance_commits_entry_with_new_balance() {
        let mut storage = MockLedgerStorage::new();
        storage.expect_get_wallet().with(eq(3)).returning(|_| {
            Ok(Some(Wallet {
                id: 3,
                name: "rent".into(),
                balance: dec!(100),
            }))
        });
        storage
            .expect_update_wallet()
            .withf(|wallet, pending| {
                wallet.balance == dec!(0)
                    && pending
                        == &vec![NewTransaction {
                            sender_id: 3,
                            receiver_id: 3,
                            amount: dec!(100),
                            timestamp: Utc.with_ymd_and_hms(2021, 10, 10, 10, 0, 0).unwrap(),
                            tran_type: TranType::Withdraw,
                        }]
            })
            .returning(|_, _| Ok(()));

        let updated = service(storage).update_balance(3, dec!(0)).await.unwrap();
        assert_eq!(updated.balance, dec!(0));
    }

    #[tokio::test]
    async fn update_balance_missing_wallet() {
        let mut storage = MockLedgerStorage::new();
        storage.expect_get_wallet().returning(|_| Ok(None));
        storage.expect_update_wallet().never();

        let err = service(storage).update_balance(9, dec!(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::WalletNotFound(9)));
    }

    #[tokio::test]
    async fn update_balance_no_change_is_an_error() {
        let mut storage = MockLedgerStorage::new();
        storage.expect_get_wallet().returning(|_| {
            Ok(Some(Wallet {
                id: 3,
                name: "rent".into(),
                balance: dec!(100),
            }))
        });
        storage.expect_update_wallet().never();

        let err = service(storage).update_balance(3, dec!(100)).await.unwrap_err();
        assert!(matches!(err, LedgerError::NoBalanceChange));
    }
}
