//! Player identity
//!
//! A connected wallet address, or anonymous play when no provider is
//! installed or the player has not connected.

use crate::shorten_address;

/// Label stored and displayed for players without a wallet
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    Wallet(String),
    #[default]
    Anonymous,
}

impl Identity {
    /// Identity for a provider account list: the first non-empty address wins
    pub fn from_accounts(accounts: &[String]) -> Option<Identity> {
        accounts
            .iter()
            .map(|a| a.trim())
            .find(|a| !a.is_empty())
            .map(|a| Identity::Wallet(a.to_string()))
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Identity::Wallet(_))
    }

    /// Value sent as `wallet` in score submissions
    pub fn wallet_str(&self) -> &str {
        match self {
            Identity::Wallet(address) => address,
            Identity::Anonymous => ANONYMOUS,
        }
    }

    /// `0x1234...abcd` style label for the wallet status line
    pub fn short_label(&self) -> String {
        match self {
            Identity::Wallet(address) => shorten_address(address),
            Identity::Anonymous => ANONYMOUS.to_string(),
        }
    }
}

/// What to do when the provider reports a new account list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountChange {
    /// The wallet disconnected; stop the run and show the connect screen
    Disconnected,
    /// A different (or the same) account is active; restart with it
    Switched(Identity),
}

impl AccountChange {
    pub fn from_accounts(accounts: &[String]) -> Self {
        match Identity::from_accounts(accounts) {
            Some(identity) => AccountChange::Switched(identity),
            None => AccountChange::Disconnected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

    #[test]
    fn test_first_account_wins() {
        let accounts = vec![String::new(), ADDR.to_string(), "0xother".to_string()];
        assert_eq!(
            Identity::from_accounts(&accounts),
            Some(Identity::Wallet(ADDR.to_string()))
        );
        assert_eq!(Identity::from_accounts(&[]), None);
    }

    #[test]
    fn test_anonymous_labels() {
        let anon = Identity::default();
        assert!(!anon.is_connected());
        assert_eq!(anon.wallet_str(), "Anonymous");
        assert_eq!(anon.short_label(), "Anonymous");
    }

    #[test]
    fn test_wallet_labels() {
        let id = Identity::Wallet(ADDR.to_string());
        assert_eq!(id.wallet_str(), ADDR);
        assert_eq!(id.short_label(), "0xAbCd...Ef01");
    }

    #[test]
    fn test_accounts_changed() {
        assert_eq!(AccountChange::from_accounts(&[]), AccountChange::Disconnected);
        assert_eq!(
            AccountChange::from_accounts(&[ADDR.to_string()]),
            AccountChange::Switched(Identity::Wallet(ADDR.to_string()))
        );
    }
}
