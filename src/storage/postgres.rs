//! Postgres adapter for the persistence gateway.
//!
//! Balance writes run inside a database transaction with the wallet row(s)
//! locked `FOR UPDATE` until commit; transfers lock both rows in ascending id
//! order. A failed operation rolls back as a whole; on the error paths the
//! rollback is explicit so a rollback failure can be reported as its own
//! condition rather than folded into the error that triggered it.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{QueryBuilder, Row};

use crate::database::DatabasePool;
use crate::error::{is_unique_violation, LedgerError, Result};
use crate::models::{NewTransaction, NewWallet, TranType, Transaction, Transfer, Wallet};
use crate::storage::{LedgerStorage, TransactionFilter};

pub struct PgStorage {
    pool: DatabasePool,
}

impl PgStorage {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn wallet_from_row(row: PgRow) -> sqlx::Result<Wallet> {
    Ok(Wallet {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        balance: row.try_get("balance")?,
    })
}

fn transaction_from_row(row: PgRow) -> sqlx::Result<Transaction> {
    let raw_type: String = row.try_get("tran_type")?;
    let tran_type = TranType::from_str(&raw_type)
        .ok_or_else(|| sqlx::Error::Decode(format!("unknown tran_type '{raw_type}'").into()))?;
    Ok(Transaction {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        receiver_id: row.try_get("receiver_id")?,
        amount: row.try_get("amount")?,
        timestamp: row.try_get("date")?,
        tran_type,
    })
}

/// Roll back explicitly so a failed rollback surfaces as [`LedgerError::RollbackFailed`]
/// instead of being silently absorbed by the drop handler.
async fn rollback(
    tx: sqlx::Transaction<'_, sqlx::Postgres>,
    operation: &'static str,
) -> Result<()> {
    tx.rollback().await.map_err(|e| {
        tracing::error!("rollback failed during {operation}: {e:?}");
        LedgerError::RollbackFailed {
            operation,
            source: e,
        }
    })
}

#[async_trait]
impl LedgerStorage for PgStorage {
    async fn create_wallet(
        &self,
        wallet: NewWallet,
        pending: Vec<NewTransaction>,
    ) -> Result<Wallet> {
        const OP: &str = "create_wallet";

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        let id: i64 =
            sqlx::query_scalar("INSERT INTO wallet (name, balance) VALUES ($1, $2) RETURNING id")
                .bind(&wallet.name)
                .bind(wallet.balance)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        LedgerError::DuplicateName(wallet.name.clone())
                    } else {
                        LedgerError::storage(OP, e)
                    }
                })?;

        // Entries produced before id assignment are stamped with it here.
        for entry in &pending {
            sqlx::query(
                "INSERT INTO transaction (sender_id, receiver_id, amount, date, tran_type) \
                 VALUES ($1, $1, $2, $3, $4)",
            )
            .bind(id)
            .bind(entry.amount)
            .bind(entry.timestamp)
            .bind(entry.tran_type.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;
        }

        tx.commit().await.map_err(|e| LedgerError::storage(OP, e))?;

        Ok(Wallet {
            id,
            name: wallet.name,
            balance: wallet.balance,
        })
    }

    async fn get_wallet(&self, id: i64) -> Result<Option<Wallet>> {
        sqlx::query("SELECT id, name, balance FROM wallet WHERE id = $1")
            .bind(id)
            .try_map(wallet_from_row)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| LedgerError::storage("get_wallet", e))
    }

    async fn get_wallet_by_name(&self, name: &str) -> Result<Option<Wallet>> {
        sqlx::query("SELECT id, name, balance FROM wallet WHERE name = $1")
            .bind(name)
            .try_map(wallet_from_row)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| LedgerError::storage("get_wallet_by_name", e))
    }

    async fn get_wallet_with_ledger(
        &self,
        id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Option<(Wallet, Vec<Transaction>)>> {
        const OP: &str = "get_wallet_with_ledger";

        // One transaction so the balance and the ledger page are a
        // consistent snapshot.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        let wallet = sqlx::query("SELECT id, name, balance FROM wallet WHERE id = $1")
            .bind(id)
            .try_map(wallet_from_row)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        let Some(wallet) = wallet else {
            rollback(tx, OP).await?;
            return Ok(None);
        };

        let entries = sqlx::query(
            "SELECT id, sender_id, receiver_id, amount, date, tran_type FROM transaction \
             WHERE sender_id = $1 OR receiver_id = $1 ORDER BY id ASC LIMIT $2 OFFSET $3",
        )
        .bind(id)
        .bind(limit)
        .bind(offset)
        .try_map(transaction_from_row)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| LedgerError::storage(OP, e))?;

        tx.commit().await.map_err(|e| LedgerError::storage(OP, e))?;

        Ok(Some((wallet, entries)))
    }

    async fn update_wallet(&self, wallet: &Wallet, pending: Vec<NewTransaction>) -> Result<()> {
        const OP: &str = "update_wallet";

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        // Exclusive row lock, held until commit, so a concurrent update or
        // transfer cannot interleave with this balance write.
        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM wallet WHERE id = $1 FOR UPDATE")
            .bind(wallet.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        if locked.is_none() {
            rollback(tx, OP).await?;
            return Err(LedgerError::WalletNotFound(wallet.id));
        }

        sqlx::query("UPDATE wallet SET name = $1, balance = $2 WHERE id = $3")
            .bind(&wallet.name)
            .bind(wallet.balance)
            .bind(wallet.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        for entry in &pending {
            sqlx::query(
                "INSERT INTO transaction (sender_id, receiver_id, amount, date, tran_type) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(entry.sender_id)
            .bind(entry.receiver_id)
            .bind(entry.amount)
            .bind(entry.timestamp)
            .bind(entry.tran_type.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;
        }

        tx.commit().await.map_err(|e| LedgerError::storage(OP, e))
    }

    async fn create_transfer(&self, transfer: &Transfer) -> Result<Transaction> {
        const OP: &str = "create_transfer";

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        // Lock both rows in ascending id order; a concurrent transfer in the
        // opposite direction takes them in the same order and waits instead
        // of deadlocking.
        let mut lock_order = [transfer.sender.id, transfer.receiver.id];
        lock_order.sort_unstable();
        for wallet_id in lock_order {
            let locked: Option<i64> =
                sqlx::query_scalar("SELECT id FROM wallet WHERE id = $1 FOR UPDATE")
                    .bind(wallet_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| LedgerError::storage(OP, e))?;
            if locked.is_none() {
                rollback(tx, OP).await?;
                return Err(LedgerError::WalletNotFound(wallet_id));
            }
        }

        sqlx::query("UPDATE wallet SET balance = $1 WHERE id = $2")
            .bind(transfer.sender.balance)
            .bind(transfer.sender.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        sqlx::query("UPDATE wallet SET balance = $1 WHERE id = $2")
            .bind(transfer.receiver.balance)
            .bind(transfer.receiver.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerError::storage(OP, e))?;

        let entry = &transfer.entry;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transaction (sender_id, receiver_id, amount, date, tran_type) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(entry.sender_id)
        .bind(entry.receiver_id)
        .bind(entry.amount)
        .bind(entry.timestamp)
        .bind(entry.tran_type.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| LedgerError::storage(OP, e))?;

        tx.commit().await.map_err(|e| LedgerError::storage(OP, e))?;

        Ok(Transaction {
            id,
            sender_id: entry.sender_id,
            receiver_id: entry.receiver_id,
            amount: entry.amount,
            timestamp: entry.timestamp,
            tran_type: entry.tran_type,
        })
    }

    async fn list_wallets(&self, limit: i64, offset: i64) -> Result<Vec<Wallet>> {
        sqlx::query("SELECT id, name, balance FROM wallet ORDER BY id ASC LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .try_map(wallet_from_row)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| LedgerError::storage("list_wallets", e))
    }

    async fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        sqlx::query(
            "SELECT id, sender_id, receiver_id, amount, date, tran_type FROM transaction \
             WHERE id = $1",
        )
        .bind(id)
        .try_map(transaction_from_row)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| LedgerError::storage("get_transaction", e))
    }

    async fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        sqlx::query(
            "SELECT id, sender_id, receiver_id, amount, date, tran_type FROM transaction \
             ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .try_map(transaction_from_row)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| LedgerError::storage("list_transactions", e))
    }

    async fn list_filtered(
        &self,
        filter: &TransactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let mut builder: QueryBuilder<'_, sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, sender_id, receiver_id, amount, date, tran_type FROM transaction WHERE 1=1",
        );
        filter.apply(&mut builder);
        builder.push(" ORDER BY id ASC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| LedgerError::storage("list_filtered", e))?;

        rows.into_iter()
            .map(|row| {
                transaction_from_row(row).map_err(|e| LedgerError::storage("list_filtered", e))
            })
            .collect()
    }
}
