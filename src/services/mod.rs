//! Orchestration between handlers, the domain and the persistence gateway.
//! Services are constructed with their storage and clock dependencies; they
//! hold no other state and keep no caches.

pub mod demo_data;
pub mod transactions;
pub mod transfers;
pub mod wallets;

pub use demo_data::{DemoDataReport, DemoDataService};
pub use transactions::TransactionService;
pub use transfers::TransferService;
pub use wallets::WalletService;
