// Library root - exports for integration tests and the bins

pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::LedgerError;

use std::sync::Arc;

use clock::{Clock, SystemClock};
use database::DatabasePool;
use services::{DemoDataService, TransactionService, TransferService, WalletService};
use storage::{LedgerStorage, PgStorage};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabasePool,
    pub config: Arc<Config>,
    pub wallets: Arc<WalletService>,
    pub transfers: Arc<TransferService>,
    pub transactions: Arc<TransactionService>,
    pub demo_data: Arc<DemoDataService>,
}

impl AppState {
    /// Wire the production graph: Postgres gateway, wall clock.
    pub fn new(db_pool: DatabasePool, config: Arc<Config>) -> Self {
        let storage: Arc<dyn LedgerStorage> = Arc::new(PgStorage::new(db_pool.clone()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Self {
            wallets: Arc::new(WalletService::new(storage.clone(), clock.clone())),
            transfers: Arc::new(TransferService::new(storage.clone(), clock.clone())),
            transactions: Arc::new(TransactionService::new(storage)),
            demo_data: Arc::new(DemoDataService::new(db_pool.clone(), clock)),
            db_pool,
            config,
        }
    }
}
