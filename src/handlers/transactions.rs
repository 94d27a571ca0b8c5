use axum::{
    extract::{Path, Query, State},
    http::header,
    response::Json,
};

use crate::handlers::{error_response, ApiError, Pagination};
use crate::models::Transaction;
use crate::storage::TransactionFilter;
use crate::AppState;

pub async fn get_transaction(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Transaction>, ApiError> {
    let entry = state.transactions.get(id).await.map_err(error_response)?;
    Ok(Json(entry))
}

pub async fn list_transactions(
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let (limit, offset) = page.resolve(state.config.default_page_limit);
    let entries = state
        .transactions
        .list(limit, offset)
        .await
        .map_err(error_response)?;
    Ok(Json(entries))
}

/// Filtered listing. The filter arrives as a JSON body already shaped like
/// the storage layer's typed filter; an empty body object matches all rows.
pub async fn filter_transactions(
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
    Json(filter): Json<TransactionFilter>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let (limit, offset) = page.resolve(state.config.default_page_limit);
    let entries = state
        .transactions
        .list_filtered(&filter, limit, offset)
        .await
        .map_err(error_response)?;
    Ok(Json(entries))
}

/// Same filtered listing rendered as a CSV attachment.
pub async fn transactions_report(
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
    Json(filter): Json<TransactionFilter>,
) -> Result<([(header::HeaderName, &'static str); 2], String), ApiError> {
    let (limit, offset) = page.resolve(state.config.default_page_limit);
    let entries = state
        .transactions
        .list_filtered(&filter, limit, offset)
        .await
        .map_err(error_response)?;

    let mut report = String::from("Transaction ID,Sender ID,Receiver ID,Amount,Timestamp,Type\n");
    for entry in &entries {
        report.push_str(&format!(
            "{},{},{},{},{},{}\n",
            entry.id,
            entry.sender_id,
            entry.receiver_id,
            entry.amount,
            entry.timestamp.to_rfc3339(),
            entry.tran_type
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=report.csv",
            ),
        ],
        report,
    ))
}
