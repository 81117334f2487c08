//! Disbursement executor collaborators

use crate::error::{FaucetError, FaucetResult};
use crate::types::{Amount, WalletAddress};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Status tokens the wallet backend returns for an accepted disbursement.
pub const ACCEPTED_STATUS_TOKENS: [&str; 2] =
    ["PostMpnDepositResponse", "PostMpnTransactionResponse"];

/// External backend that performs the actual fund transfer.
///
/// Returns the backend's raw status token; the ledger decides whether the
/// token means the transfer was accepted.
#[async_trait]
pub trait DisbursementExecutor: Send + Sync {
    async fn disburse(
        &self,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: Amount,
    ) -> FaucetResult<String>;
}

/// Executor that shells out to the `bazuka` wallet CLI.
pub struct BazukaCli {
    program: String,
    timeout: Duration,
}

impl BazukaCli {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DisbursementExecutor for BazukaCli {
    async fn disburse(
        &self,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: Amount,
    ) -> FaucetResult<String> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("wallet")
            .arg("send")
            .arg("--from")
            .arg(from.as_str())
            .arg("--to")
            .arg(to.as_str())
            .arg("--amount")
            .arg(amount.to_string())
            .kill_on_drop(true);

        debug!("Running {} wallet send --to {}", self.program, to);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| {
                FaucetError::DisbursementRejected(format!(
                    "failed to run {}: {}",
                    self.program, e
                ))
            })?,
            Err(_) => {
                warn!(
                    "{} wallet send timed out after {}s",
                    self.program,
                    self.timeout.as_secs()
                );
                return Err(FaucetError::DisbursementRejected(format!(
                    "{} timed out after {}s",
                    self.program,
                    self.timeout.as_secs()
                )));
            }
        };

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
