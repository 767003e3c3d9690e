//! taxlot-web - HTTP API for capital gains computation.
//!
//! `POST /api/upload` takes a brokerage activity CSV and returns the
//! computed report; `GET /api/get_price` resolves latest closing prices
//! for a comma-separated ticker list.

mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::trace::TraceLayer;

use taxlot_quotes::YahooFinance;

use crate::handlers::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let state = Arc::new(AppState {
        quotes: Box::new(YahooFinance::new()),
    });

    // Build router
    let app = Router::new()
        .route("/api/upload", post(handlers::upload))
        .route("/api/get_price", get(handlers::get_price))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    println!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
