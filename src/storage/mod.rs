//! Persistence gateway. The domain produces `(new state, pending entries)`
//! pairs; this layer owns atomicity and the locking that keeps concurrent
//! balance mutations serializable. Implementations must never leave a
//! partial write behind: either the state and all its pending entries
//! commit, or nothing does.

pub mod filter;
pub mod postgres;

pub use filter::{AmountRange, TimestampRange, TransactionFilter};
pub use postgres::PgStorage;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewTransaction, NewWallet, Transaction, Transfer, Wallet};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Assign an identity and persist the wallet row together with all of
    /// its pending entries in one transaction.
    async fn create_wallet(
        &self,
        wallet: NewWallet,
        pending: Vec<NewTransaction>,
    ) -> Result<Wallet>;

    async fn get_wallet(&self, id: i64) -> Result<Option<Wallet>>;

    async fn get_wallet_by_name(&self, name: &str) -> Result<Option<Wallet>>;

    /// The wallet plus one page of its ledger (as sender or receiver),
    /// ordered by entry id ascending. An out-of-range offset yields an
    /// empty page, not an error.
    async fn get_wallet_with_ledger(
        &self,
        id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Option<(Wallet, Vec<Transaction>)>>;

    /// Write the new balance and pending entries atomically, holding an
    /// exclusive lock on the wallet row until commit.
    async fn update_wallet(&self, wallet: &Wallet, pending: Vec<NewTransaction>) -> Result<()>;

    /// Apply the debit, the credit and the single ledger insert as one
    /// transaction; returns the persisted entry.
    async fn create_transfer(&self, transfer: &Transfer) -> Result<Transaction>;

    async fn list_wallets(&self, limit: i64, offset: i64) -> Result<Vec<Wallet>>;

    async fn get_transaction(&self, id: i64) -> Result<Option<Transaction>>;

    async fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>>;

    async fn list_filtered(
        &self,
        filter: &TransactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>>;
}
