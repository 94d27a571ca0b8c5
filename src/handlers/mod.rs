pub mod demo;
pub mod transactions;
pub mod transfers;
pub mod wallets;

pub use demo::generate_fake_data;
pub use transactions::{
    filter_transactions, get_transaction, list_transactions, transactions_report,
};
pub use transfers::{create_transfer, CreateTransferRequest};
pub use wallets::{
    create_wallet, get_wallet, get_wallet_transactions, list_wallets, update_wallet,
    CreateWalletRequest, UpdateWalletRequest,
};

use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::LedgerError;

pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// Map a ledger error to a status code and JSON body. Validation failures
/// are the client's fault (422), name conflicts are 409, missing rows 404;
/// storage trouble is logged here and reported without engine detail.
pub fn error_response(err: LedgerError) -> ApiError {
    let status = match &err {
        LedgerError::WalletNotFound(_) | LedgerError::TransactionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        LedgerError::DuplicateName(_) => StatusCode::CONFLICT,
        LedgerError::Storage { .. } | LedgerError::RollbackFailed { .. } => {
            tracing::error!("storage failure: {err:?}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        e if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({"error": err.to_string()})))
}

/// Query-string pagination; missing values fall back to the configured page
/// size and offset 0.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn resolve(&self, default_limit: i64) -> (i64, i64) {
        let limit = self.limit.unwrap_or(default_limit).max(0);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}
