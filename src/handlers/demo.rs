use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::handlers::ApiError;
use crate::services::DemoDataReport;
use crate::AppState;

const DEFAULT_RECORDS: usize = 10_000;

#[derive(Deserialize)]
pub struct GenerateQuery {
    pub records: Option<usize>,
    pub prefix: Option<String>,
}

/// Fill the database with random demo wallets. Worker errors come back in
/// the report body; the call only counts as failed when nothing was created.
pub async fn generate_fake_data(
    Query(params): Query<GenerateQuery>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DemoDataReport>), ApiError> {
    let records = params.records.unwrap_or(DEFAULT_RECORDS);
    let prefix = params.prefix.as_deref().unwrap_or("wallet");

    let report = state.demo_data.generate(records, prefix).await;

    if report.created == 0 && !report.errors.is_empty() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "demo data generation failed",
                "details": report.errors,
            })),
        ));
    }

    Ok((StatusCode::CREATED, Json(report)))
}
