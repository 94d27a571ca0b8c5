//! Error taxonomy for the ledger core.
//!
//! Validation failures are distinct variants so callers can branch on them;
//! storage failures carry the operation name for logging but never leak
//! engine detail into match arms. The core performs no retries; a caller
//! that wants to retry must re-validate against current state first.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("wallet name must not be empty")]
    MissingName,

    #[error("a wallet named '{0}' already exists")]
    DuplicateName(String),

    #[error("balance can not be less than 0")]
    NegativeBalance,

    #[error("balance should be updated")]
    NoBalanceChange,

    #[error("missing sender wallet")]
    MissingSender,

    #[error("missing receiver wallet")]
    MissingReceiver,

    #[error("transfer can not be performed when sender and receiver is the same wallet")]
    SameSenderAndReceiver,

    #[error("amount should be greater than 0")]
    NonPositiveAmount,

    #[error("sender does not have enough money for transfer")]
    NotEnoughMoney,

    #[error("wallet {0} not found")]
    WalletNotFound(i64),

    #[error("transaction {0} not found")]
    TransactionNotFound(i64),

    #[error("storage error during {operation}")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A rollback that itself failed. The database may be in an inconsistent
    /// state; this is logged loudly and must never be conflated with the
    /// operation failure that triggered the rollback.
    #[error("rollback failed during {operation}")]
    RollbackFailed {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

/// True when a sqlx error is a Postgres unique-constraint violation (23505).
/// The wallet name is the only unique column, so storage code maps this to
/// [`LedgerError::DuplicateName`] with the offending name at hand.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

impl LedgerError {
    pub fn storage(operation: &'static str, source: sqlx::Error) -> Self {
        LedgerError::Storage { operation, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::MissingName
                | LedgerError::DuplicateName(_)
                | LedgerError::NegativeBalance
                | LedgerError::NoBalanceChange
                | LedgerError::MissingSender
                | LedgerError::MissingReceiver
                | LedgerError::SameSenderAndReceiver
                | LedgerError::NonPositiveAmount
                | LedgerError::NotEnoughMoney
        )
    }
}
