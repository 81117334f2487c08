//! Faucet ledger service for the Ziesha mining pool
//!
//! Tracks the last disbursement time per wallet address, enforces a
//! cooldown window between disbursements to the same address, persists
//! the mapping to a flat JSON file, and delegates the actual transfer
//! to the `bazuka` wallet CLI.

pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod store;
pub mod types;

pub use config::FaucetConfig;
pub use error::{FaucetError, FaucetResult};
pub use executor::{BazukaCli, DisbursementExecutor, ACCEPTED_STATUS_TOKENS};
pub use ledger::{Clock, DisbursementReceipt, FaucetLedger, LedgerStatus, SystemClock};
pub use store::LedgerStore;
pub use types::{mpn_address_valid, Amount, WalletAddress};
