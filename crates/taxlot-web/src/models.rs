use serde::{Deserialize, Serialize};

/// Query parameters for the price endpoint.
#[derive(Deserialize, Debug)]
pub struct PriceQuery {
    /// Comma-separated ticker symbols, e.g. `AAPL,MSFT`.
    pub tickers: Option<String>,
}

/// JSON error body returned by all handlers.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

impl ErrorBody {
    /// Create an error body from a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
