//! Flat-file persistence for the faucet ledger

use crate::error::{FaucetError, FaucetResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Timestamp layout written to disk (ISO-8601, microsecond precision).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Accepted on load, fraction optional.
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Older ledger files used a space separator; still accepted on load.
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// JSON file holding the address -> last-disbursement-time mapping.
///
/// The file is rewritten in full on every save, never appended.
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted mapping. A missing file is an empty ledger.
    pub fn load(&self) -> FaucetResult<HashMap<String, DateTime<Utc>>> {
        if !self.path.exists() {
            debug!("No ledger file at {}, starting empty", self.path.display());
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| FaucetError::Store(format!("read {}: {}", self.path.display(), e)))?;

        let map: Map<String, Value> = serde_json::from_str(&raw)
            .map_err(|e| FaucetError::Store(format!("parse {}: {}", self.path.display(), e)))?;

        let mut entries = HashMap::with_capacity(map.len());
        for (address, value) in map {
            let ts = value.as_str().ok_or_else(|| {
                FaucetError::Store(format!("entry for {} is not a timestamp string", address))
            })?;
            entries.insert(address, parse_timestamp(ts)?);
        }

        info!(
            "Loaded {} ledger entries from {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }

    /// Rewrite the ledger file in full with the given mapping.
    pub fn save(&self, entries: &HashMap<String, DateTime<Utc>>) -> FaucetResult<()> {
        let mut map = Map::with_capacity(entries.len());
        for (address, last_sent) in entries {
            map.insert(address.clone(), Value::String(format_timestamp(last_sent)));
        }

        let body = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| FaucetError::Store(e.to_string()))?;

        fs::write(&self.path, body)
            .map_err(|e| FaucetError::Store(format!("write {}: {}", self.path.display(), e)))?;

        debug!("Persisted {} ledger entries", entries.len());
        Ok(())
    }
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(s: &str) -> FaucetResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_PARSE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, LEGACY_TIMESTAMP_FORMAT))
        .map(|naive| naive.and_utc())
        .map_err(|e| FaucetError::Store(format!("bad timestamp '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn micros(ts: DateTime<Utc>) -> i64 {
        ts.timestamp_micros()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("faucet_wallets.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("faucet_wallets.json"));

        let mut entries = HashMap::new();
        entries.insert(
            "zabc123".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );
        entries.insert(
            "zdef456".to_string(),
            DateTime::from_timestamp_micros(1_700_000_000_123_456).unwrap(),
        );

        store.save(&entries).unwrap();
        let reloaded = store.load().unwrap();

        assert_eq!(reloaded.len(), entries.len());
        for (address, ts) in &entries {
            assert_eq!(micros(reloaded[address]), micros(*ts));
        }
    }

    #[test]
    fn test_file_format_is_pretty_json_with_iso_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("faucet_wallets.json"));

        let mut entries = HashMap::new();
        entries.insert(
            "zabc123".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );
        store.save(&entries).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"zabc123\": \"2024-01-01T12:00:00.000000\""));
    }

    #[test]
    fn test_save_rewrites_file_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("faucet_wallets.json"));

        let mut entries = HashMap::new();
        entries.insert("zaaa111".to_string(), Utc::now());
        store.save(&entries).unwrap();

        entries.remove("zaaa111");
        entries.insert("zbbb222".to_string(), Utc::now());
        store.save(&entries).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains_key("zbbb222"));
    }

    #[test]
    fn test_legacy_space_separated_timestamps_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faucet_wallets.json");
        fs::write(
            &path,
            "{\n    \"zabc123\": \"2024-01-01 12:00:00.500000\"\n}",
        )
        .unwrap();

        let entries = LedgerStore::new(&path).load().unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .unwrap()
            .timestamp_micros()
            + 500_000;
        assert_eq!(entries["zabc123"].timestamp_micros(), expected);
    }

    #[test]
    fn test_garbage_timestamp_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faucet_wallets.json");
        fs::write(&path, "{\"zabc123\": \"not-a-time\"}").unwrap();

        assert!(matches!(
            LedgerStore::new(&path).load(),
            Err(FaucetError::Store(_))
        ));
    }
}
