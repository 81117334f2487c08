//! Error types for the faucet service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Faucet service errors
#[derive(Error, Debug)]
pub enum FaucetError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("You have to wait {}.", format_wait(*.remaining_secs))]
    CooldownNotElapsed { remaining_secs: u64 },

    #[error("Disbursement rejected: {0}")]
    DisbursementRejected(String),

    #[error("Ledger store error: {0}")]
    Store(String),
}

/// Render a wait duration as `HH hours MM min SS sec` (floor division).
pub fn format_wait(secs: u64) -> String {
    let (m, s) = (secs / 60, secs % 60);
    let (h, m) = (m / 60, m % 60);
    format!("{:02} hours {:02} min {:02} sec", h, m, s)
}

impl IntoResponse for FaucetError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            FaucetError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, "INVALID_ADDRESS"),
            FaucetError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            FaucetError::CooldownNotElapsed { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "COOLDOWN_NOT_ELAPSED")
            }
            FaucetError::DisbursementRejected(_) => {
                (StatusCode::BAD_GATEWAY, "DISBURSEMENT_REJECTED")
            }
            FaucetError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
        };

        let mut body = json!({
            "error": error_code,
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if let FaucetError::CooldownNotElapsed { remaining_secs } = &self {
            body["retry_after_secs"] = json!(remaining_secs);
        }

        (status, Json(body)).into_response()
    }
}

pub type FaucetResult<T> = Result<T, FaucetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wait_floor_division() {
        assert_eq!(format_wait(25200), "07 hours 00 min 00 sec");
        assert_eq!(format_wait(3661), "01 hours 01 min 01 sec");
        assert_eq!(format_wait(59), "00 hours 00 min 59 sec");
        assert_eq!(format_wait(0), "00 hours 00 min 00 sec");
    }

    #[test]
    fn test_cooldown_message() {
        let err = FaucetError::CooldownNotElapsed {
            remaining_secs: 25200,
        };
        assert_eq!(err.to_string(), "You have to wait 07 hours 00 min 00 sec.");
    }
}
