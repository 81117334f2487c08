//! Boundary types for the faucet ledger

use crate::error::{FaucetError, FaucetResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address format checker collaborator. The ledger core never re-checks
/// format; whoever constructs a [`WalletAddress`] supplies the rule.
pub type AddressValidator = fn(&str) -> bool;

/// Ziesha MPN (zk) address rule: `z` prefix, hex alphabet plus `z`.
///
/// Expects lowercase input; [`WalletAddress::validated`] lowercases before
/// calling the validator.
pub fn mpn_address_valid(s: &str) -> bool {
    if !s.starts_with('z') || s.len() < 2 {
        return false;
    }
    s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f' | 'z'))
}

/// Validated wallet address token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Build an address from caller input: trim, lowercase, then run the
    /// external format validator.
    pub fn validated(s: &str, validate: AddressValidator) -> FaucetResult<Self> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return Err(FaucetError::InvalidAddress(
                "address cannot be empty".to_string(),
            ));
        }
        if !validate(&s) {
            return Err(FaucetError::InvalidAddress(format!(
                "not a valid Ziesha address: {}",
                s
            )));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Disbursement amount in tℤ. Finite and strictly positive, validated once
/// at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> FaucetResult<Self> {
        if !value.is_finite() {
            return Err(FaucetError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        if value <= 0.0 {
            return Err(FaucetError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = FaucetError;

    fn try_from(value: f64) -> FaucetResult<Self> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> f64 {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = FaucetError;

    fn from_str(s: &str) -> FaucetResult<Self> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| FaucetError::InvalidAmount(format!("not a number: {}", s)))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpn_address_rules() {
        assert!(mpn_address_valid("zabc123"));
        assert!(mpn_address_valid("z0000"));
        assert!(mpn_address_valid("zzff00"));

        assert!(!mpn_address_valid("0xabc123"));
        assert!(!mpn_address_valid("abc123"));
        assert!(!mpn_address_valid("z"));
        assert!(!mpn_address_valid("zxyq12"));
    }

    #[test]
    fn test_address_lowercased_before_validation() {
        let addr = WalletAddress::validated(" ZAbC123 ", mpn_address_valid).unwrap();
        assert_eq!(addr.as_str(), "zabc123");
    }

    #[test]
    fn test_invalid_address_rejected() {
        assert!(matches!(
            WalletAddress::validated("0xdeadbeef", mpn_address_valid),
            Err(FaucetError::InvalidAddress(_))
        ));
        assert!(matches!(
            WalletAddress::validated("   ", mpn_address_valid),
            Err(FaucetError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_amount_bounds() {
        assert_eq!(Amount::new(1.0).unwrap().value(), 1.0);
        assert!(matches!(Amount::new(0.0), Err(FaucetError::InvalidAmount(_))));
        assert!(matches!(Amount::new(-2.5), Err(FaucetError::InvalidAmount(_))));
        assert!(matches!(
            Amount::new(f64::NAN),
            Err(FaucetError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(f64::INFINITY),
            Err(FaucetError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_amount_parsed_once_at_boundary() {
        assert_eq!("1.5".parse::<Amount>().unwrap().value(), 1.5);
        assert!(matches!(
            "abc".parse::<Amount>(),
            Err(FaucetError::InvalidAmount(_))
        ));
        assert!(matches!(
            "-1".parse::<Amount>(),
            Err(FaucetError::InvalidAmount(_))
        ));
    }
}
