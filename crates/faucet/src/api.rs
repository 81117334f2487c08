//! HTTP API for the faucet service

use super::error::FaucetResult;
use super::ledger::{DisbursementReceipt, FaucetLedger, LedgerStatus};
use super::types::{mpn_address_valid, Amount, WalletAddress};
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
pub struct AppState {
    pub ledger: Arc<FaucetLedger>,
    pub default_amount: Amount,
}

/// Send request
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub address: String,
    pub amount: Option<f64>,
}

/// Success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    pub timestamp: String,
}

impl<T> SuccessResponse<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Send handler
pub async fn send_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendRequest>,
) -> FaucetResult<Json<SuccessResponse<DisbursementReceipt>>> {
    info!("Faucet request for address: {}", request.address);

    // Address format and amount are checked here, before any ledger
    // interaction.
    let to = WalletAddress::validated(&request.address, mpn_address_valid)?;
    let amount = match request.amount {
        Some(value) => Amount::new(value)?,
        None => state.default_amount,
    };

    match state.ledger.send(&to, amount).await {
        Ok(receipt) => Ok(Json(SuccessResponse::new(receipt))),
        Err(e) => {
            error!("Faucet send failed for {}: {}", to, e);
            Err(e)
        }
    }
}

/// Status handler
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Json<SuccessResponse<LedgerStatus>> {
    Json(SuccessResponse::new(state.ledger.status().await))
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Root handler with info
pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Ziesha Pool Faucet",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Faucet ledger service for the Ziesha mining pool",
        "endpoints": {
            "POST /api/send": "Request a disbursement",
            "GET /api/status": "Get faucet status",
            "GET /health": "Health check"
        }
    }))
}
