//! Faucet ledger core logic

use crate::error::{FaucetError, FaucetResult};
use crate::executor::{DisbursementExecutor, ACCEPTED_STATUS_TOKENS};
use crate::store::LedgerStore;
use crate::types::{Amount, WalletAddress};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Time source, injected so cooldown arithmetic is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System UTC clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Receipt for an accepted disbursement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisbursementReceipt {
    pub to: String,
    pub amount: f64,
    pub message: String,
}

/// Ledger counters for the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStatus {
    pub pool_wallet: String,
    pub cooldown_secs: u64,
    pub tracked_addresses: usize,
    pub cooling_down: usize,
}

/// Tracks the last disbursement time per wallet address and enforces a
/// minimum interval between disbursements to the same address.
///
/// One instance is constructed per process and shared behind an `Arc`;
/// every request goes through the same in-memory view.
pub struct FaucetLedger {
    pool_wallet: WalletAddress,
    cooldown: Duration,
    store: LedgerStore,
    executor: Arc<dyn DisbursementExecutor>,
    clock: Arc<dyn Clock>,
    /// Guards the whole check-execute-record-persist sequence. Held across
    /// the executor await so two requests for the same address cannot both
    /// pass the cooldown check.
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl FaucetLedger {
    /// Open the ledger, reloading persisted state from the store.
    pub fn open(
        pool_wallet: WalletAddress,
        cooldown: std::time::Duration,
        store: LedgerStore,
        executor: Arc<dyn DisbursementExecutor>,
    ) -> FaucetResult<Self> {
        Self::open_with_clock(pool_wallet, cooldown, store, executor, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        pool_wallet: WalletAddress,
        cooldown: std::time::Duration,
        store: LedgerStore,
        executor: Arc<dyn DisbursementExecutor>,
        clock: Arc<dyn Clock>,
    ) -> FaucetResult<Self> {
        let entries = store.load()?;
        info!(
            "Faucet ledger opened: {} tracked addresses, cooldown {}s",
            entries.len(),
            cooldown.as_secs()
        );

        Ok(Self {
            pool_wallet,
            cooldown: Duration::milliseconds(cooldown.as_millis() as i64),
            store,
            executor,
            clock,
            entries: Mutex::new(entries),
        })
    }

    /// Disburse `amount` to `to` if the address is out of its cooldown
    /// window. On an accepted transfer the ledger records the send time
    /// and rewrites the state file; on any failure the ledger is left
    /// untouched.
    pub async fn send(
        &self,
        to: &WalletAddress,
        amount: Amount,
    ) -> FaucetResult<DisbursementReceipt> {
        let mut entries = self.entries.lock().await;

        if let Some(last_sent) = entries.get(to.as_str()) {
            let elapsed = self.clock.now().signed_duration_since(*last_sent);
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                let remaining_secs = (remaining.num_milliseconds() / 1000) as u64;
                warn!(
                    "Address {} still cooling down, {}s remaining",
                    to, remaining_secs
                );
                return Err(FaucetError::CooldownNotElapsed { remaining_secs });
            }
        }

        let token = self
            .executor
            .disburse(&self.pool_wallet, to, amount)
            .await?;

        if !ACCEPTED_STATUS_TOKENS.contains(&token.as_str()) {
            warn!("Disbursement to {} rejected: {}", to, token);
            return Err(FaucetError::DisbursementRejected(token));
        }

        let now = self.clock.now();
        entries.insert(to.as_str().to_string(), now);
        self.persist(&mut entries, now)?;

        info!("Sent {}t\u{2124} to {}", amount, to);
        Ok(DisbursementReceipt {
            to: to.to_string(),
            amount: amount.value(),
            message: format!("Sent {}t\u{2124} to {}.", amount, to),
        })
    }

    /// Last recorded disbursement time for an address, if any.
    pub async fn last_sent(&self, to: &WalletAddress) -> Option<DateTime<Utc>> {
        self.entries.lock().await.get(to.as_str()).copied()
    }

    /// Drop entries whose cooldown has fully elapsed and persist if
    /// anything changed. Entries still inside their window are never
    /// removed. Returns the number of entries dropped.
    pub async fn prune_expired(&self) -> FaucetResult<usize> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        let now = self.clock.now();

        entries.retain(|_, last_sent| now.signed_duration_since(*last_sent) < self.cooldown);

        let removed = before - entries.len();
        if removed > 0 {
            self.store.save(&entries)?;
            debug!("Pruned {} expired ledger entries", removed);
        }
        Ok(removed)
    }

    pub async fn status(&self) -> LedgerStatus {
        let entries = self.entries.lock().await;
        let now = self.clock.now();
        let cooling_down = entries
            .values()
            .filter(|last_sent| now.signed_duration_since(**last_sent) < self.cooldown)
            .count();

        LedgerStatus {
            pool_wallet: self.pool_wallet.to_string(),
            cooldown_secs: self.cooldown.num_seconds() as u64,
            tracked_addresses: entries.len(),
            cooling_down,
        }
    }

    /// Prune-on-save housekeeping: entries past their cooldown carry no
    /// information, so they are dropped before the file is rewritten.
    fn persist(
        &self,
        entries: &mut HashMap<String, DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> FaucetResult<()> {
        entries.retain(|_, last_sent| now.signed_duration_since(*last_sent) < self.cooldown);
        self.store.save(entries)
    }
}
