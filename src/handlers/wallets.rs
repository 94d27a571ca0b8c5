use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::handlers::{error_response, ApiError, Pagination};
use crate::models::{Transaction, Wallet};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateWalletRequest {
    pub name: String,
    /// Initial balance; omitted means an empty wallet.
    #[serde(default)]
    pub balance: Decimal,
}

#[derive(Deserialize)]
pub struct UpdateWalletRequest {
    pub balance: Decimal,
}

#[derive(Serialize)]
pub struct WalletWithTransactions {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub transactions: Vec<Transaction>,
}

pub async fn create_wallet(
    State(state): State<AppState>,
    Json(payload): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<Wallet>), ApiError> {
    let wallet = state
        .wallets
        .create(&payload.name, payload.balance)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(wallet)))
}

pub async fn get_wallet(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Wallet>, ApiError> {
    let wallet = state.wallets.get(id).await.map_err(error_response)?;
    Ok(Json(wallet))
}

/// Wallet plus one page of its ledger, ordered by entry id ascending.
pub async fn get_wallet_transactions(
    Path(id): Path<i64>,
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
) -> Result<Json<WalletWithTransactions>, ApiError> {
    let (limit, offset) = page.resolve(state.config.default_page_limit);
    let (wallet, transactions) = state
        .wallets
        .get_with_ledger(id, limit, offset)
        .await
        .map_err(error_response)?;

    Ok(Json(WalletWithTransactions {
        wallet,
        transactions,
    }))
}

pub async fn list_wallets(
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Wallet>>, ApiError> {
    let (limit, offset) = page.resolve(state.config.default_page_limit);
    let wallets = state
        .wallets
        .list(limit, offset)
        .await
        .map_err(error_response)?;
    Ok(Json(wallets))
}

pub async fn update_wallet(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateWalletRequest>,
) -> Result<Json<Wallet>, ApiError> {
    let wallet = state
        .wallets
        .update_balance(id, payload.balance)
        .await
        .map_err(error_response)?;
    Ok(Json(wallet))
}
