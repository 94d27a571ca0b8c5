use std::sync::Arc;

use crate::error::{LedgerError, Result};
use crate::models::Transaction;
use crate::storage::{LedgerStorage, TransactionFilter};

pub struct TransactionService {
    storage: Arc<dyn LedgerStorage>,
}

impl TransactionService {
    pub fn new(storage: Arc<dyn LedgerStorage>) -> Self {
        Self { storage }
    }

    pub async fn get(&self, id: i64) -> Result<Transaction> {
        self.storage
            .get_transaction(id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        self.storage.list_transactions(limit, offset).await
    }

    pub async fn list_filtered(
        &self,
        filter: &TransactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        self.storage.list_filtered(filter, limit, offset).await
    }
}
