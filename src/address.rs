//! Wallet input validation.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

pub use crate::error::AddressError;

/// Address injected by the "try an example wallet" shortcut.
pub const EXAMPLE_WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

static HEX_ADDRESS: Lazy<Regex> = Lazy::new(|| compile(r"^0x[a-fA-F0-9]{40}$"));
static ENS_NAME: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^[a-z0-9-]+\.eth$"));

#[allow(clippy::expect_used)] // patterns are literals
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static wallet pattern compiles")
}

/// A validated wallet identifier: raw hex address or ENS name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletId(String);

impl WalletId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_ens(&self) -> bool {
        self.0.contains(".eth")
    }

    /// `0xd8dA...6045` for hex addresses, ENS names verbatim.
    pub fn short_display(&self) -> String {
        if self.is_ens() {
            return self.0.clone();
        }
        let head = self.0.get(..6).unwrap_or(&self.0);
        let tail = self
            .0
            .len()
            .checked_sub(4)
            .and_then(|start| self.0.get(start..))
            .unwrap_or_default();
        format!("{head}...{tail}")
    }

    /// The fixed example wallet, kept in its checksummed casing.
    pub fn example() -> Self {
        Self(EXAMPLE_WALLET.to_owned())
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks a wallet input without normalizing its casing.
pub fn validate_address(input: &str) -> Result<WalletId, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }
    if HEX_ADDRESS.is_match(trimmed) || ENS_NAME.is_match(trimmed) {
        Ok(WalletId(trimmed.to_owned()))
    } else {
        Err(AddressError::Malformed)
    }
}

/// Validates and lower-cases typed input, the way submitted wallets are stored.
pub fn normalize_address(input: &str) -> Result<WalletId, AddressError> {
    validate_address(input).map(|id| WalletId(id.0.to_lowercase()))
}
