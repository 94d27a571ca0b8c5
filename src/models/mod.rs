//! Pure domain types: wallets, ledger entries, transfers. Operations here
//! never touch storage; they return the new state plus the pending ledger
//! entries the storage layer must commit atomically with it.

pub mod transaction;
pub mod transfer;
pub mod wallet;

pub use transaction::{NewTransaction, TranType, Transaction};
pub use transfer::Transfer;
pub use wallet::{NewWallet, Wallet};
