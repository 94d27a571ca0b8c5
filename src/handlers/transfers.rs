use axum::{extract::State, http::StatusCode, response::Json};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::handlers::{error_response, ApiError};
use crate::models::Transaction;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateTransferRequest {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub amount: Decimal,
}

pub async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let entry = state
        .transfers
        .create(payload.sender_id, payload.receiver_id, payload.amount)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(entry)))
}
