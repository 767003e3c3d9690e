use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use taxlot_core::{compute_capital_gains, RenderedReport};
use taxlot_importer::{extract_from_string, RobinhoodCsv};
use taxlot_quotes::{fetch_batch, PriceSource, QuoteBatch};

use crate::models::{ErrorBody, PriceQuery};

/// Shared application state
pub struct AppState {
    /// Price source used by the price endpoint.
    pub quotes: Box<dyn PriceSource>,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (status, Json(ErrorBody::new(message)))
}

/// Handler for `POST /api/upload`.
///
/// Expects a multipart form with a `file` field containing the activity
/// CSV. Responds with the rendered capital gains report.
pub async fn upload(mut multipart: Multipart) -> Result<Json<RenderedReport>, HandlerError> {
    let mut content: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Invalid upload: {e}")))?
    {
        if field.name() == Some("file") {
            let text = field
                .text()
                .await
                .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Unreadable file: {e}")))?;
            content = Some(text);
            break;
        }
    }

    let Some(content) = content else {
        return Err(error(StatusCode::BAD_REQUEST, "No file part"));
    };
    if content.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "No selected file"));
    }

    let imported = extract_from_string(&content, &RobinhoodCsv::new())
        .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Unparseable CSV: {e:#}")))?;
    for warning in &imported.warnings {
        tracing::debug!(%warning, "import warning");
    }
    tracing::info!(
        records = imported.records.len(),
        warnings = imported.warnings.len(),
        "activity file imported"
    );

    let report = compute_capital_gains(&imported.records, Utc::now().date_naive())
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(RenderedReport::from(&report)))
}

/// Handler for `GET /api/get_price?tickers=AAPL,MSFT`.
///
/// Returns resolved prices plus a per-symbol error map; only fails
/// outright when no symbol resolves at all.
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<QuoteBatch>, HandlerError> {
    let raw = query.tickers.unwrap_or_default();
    let symbols = taxlot_quotes::normalize_symbols(&raw);
    if symbols.is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Ticker symbols are required",
        ));
    }

    // The quote client is blocking (ureq); keep it off the async runtime.
    let batch = tokio::task::spawn_blocking(move || {
        fetch_batch(state.quotes.as_ref(), &symbols)
    })
    .await
    .map_err(|e| {
        error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Price fetch task failed: {e}"),
        )
    })?;

    if batch.is_empty() {
        return Err(error(
            StatusCode::BAD_GATEWAY,
            "Unable to fetch prices for provided tickers",
        ));
    }

    tracing::info!(
        resolved = batch.prices.len(),
        failed = batch.errors.len(),
        "price batch served"
    );
    Ok(Json(batch))
}
