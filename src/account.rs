use std::fmt;

use crate::{
    errors::{Error, Result},
    proxy::ProxyDescriptor,
};

const MASKED_TOKEN_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Initializing,
    Connected,
    Errored,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Initializing => "Initializing",
            Self::Connected => "Connected",
            Self::Errored => "Errored",
        };
        f.write_str(label)
    }
}

pub struct Account {
    token: String,
    proxy: Option<ProxyDescriptor>,
    pub status: AccountStatus,
    pub username: Option<String>,
    pub email: Option<String>,
    pub points_today: f64,
    pub total_points: f64,
    pub last_update: Option<String>,
    pub last_error: Option<String>,
}

impl Account {
    pub fn new(token: String, proxy: Option<ProxyDescriptor>) -> Self {
        Self {
            token,
            proxy,
            status: AccountStatus::Initializing,
            username: None,
            email: None,
            points_today: 0.0,
            total_points: 0.0,
            last_update: None,
            last_error: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn proxy(&self) -> Option<&ProxyDescriptor> {
        self.proxy.as_ref()
    }

    /// Identity is fetched until both fields are cached, then never again.
    pub fn needs_profile(&self) -> bool {
        self.username.is_none() || self.email.is_none()
    }

    pub fn masked_token(&self) -> String {
        let prefix: String = self.token.chars().take(MASKED_TOKEN_CHARS).collect();
        format!("{prefix}...")
    }

    pub fn proxy_label(&self) -> String {
        self.proxy
            .as_ref()
            .map_or_else(|| "direct".to_string(), ProxyDescriptor::masked_label)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("token", &self.masked_token())
            .field("proxy", &self.proxy_label())
            .field("status", &self.status)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("points_today", &self.points_today)
            .field("total_points", &self.total_points)
            .field("last_update", &self.last_update)
            .field("last_error", &self.last_error)
            .finish()
    }
}

/// Read-only view of one account, handed to the dashboard between cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub number: usize,
    pub token: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub proxy: String,
    pub status: AccountStatus,
    pub points_today: f64,
    pub total_points: f64,
    pub last_update: Option<String>,
    pub last_error: Option<String>,
}

/// All configured accounts, in token-file order. Fixed for the life of the process.
#[derive(Debug)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    /// Account `i` is bound to `proxies[i % proxies.len()]`, or to no proxy when the list is empty.
    pub fn new(tokens: Vec<String>, proxies: &[ProxyDescriptor]) -> Result<Self> {
        if tokens.is_empty() {
            return Err(Error::Startup("no valid tokens found".into()));
        }

        let accounts = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| {
                let proxy = (!proxies.is_empty()).then(|| proxies[i % proxies.len()].clone());
                Account::new(token, proxy)
            })
            .collect();

        Ok(Self { accounts })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.iter_mut()
    }

    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        self.iter()
            .enumerate()
            .map(|(i, account)| AccountSnapshot {
                number: i + 1,
                token: account.masked_token(),
                username: account.username.clone(),
                email: account.email.clone(),
                proxy: account.proxy_label(),
                status: account.status,
                points_today: account.points_today,
                total_points: account.total_points,
                last_update: account.last_update.clone(),
                last_error: account.last_error.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("token-number-{i}")).collect()
    }

    #[test]
    fn proxies_are_assigned_round_robin() {
        let proxies = vec![
            ProxyDescriptor::parse("http://10.0.0.1:8080").unwrap(),
            ProxyDescriptor::parse("socks5://10.0.0.2:1080").unwrap(),
        ];
        let registry = AccountRegistry::new(tokens(5), &proxies).unwrap();

        let assigned: Vec<usize> = registry
            .iter()
            .map(|account| {
                let proxy = account.proxy().unwrap();
                proxies.iter().position(|p| p == proxy).unwrap()
            })
            .collect();

        assert_eq!(assigned, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn no_proxies_means_direct_connection() {
        let registry = AccountRegistry::new(tokens(3), &[]).unwrap();

        assert_eq!(registry.len(), 3);
        assert!(registry.iter().all(|account| account.proxy().is_none()));
        assert!(registry.snapshot().iter().all(|s| s.proxy == "direct"));
    }

    #[test]
    fn empty_token_list_is_startup_error() {
        let err = AccountRegistry::new(vec![], &[]).unwrap_err();
        assert!(matches!(err, Error::Startup(_)));
    }

    #[test]
    fn new_accounts_start_initializing() {
        let registry = AccountRegistry::new(tokens(1), &[]).unwrap();
        let account = registry.get(0).unwrap();

        assert_eq!(account.status, AccountStatus::Initializing);
        assert!(account.needs_profile());
        assert_eq!(account.last_update, None);
    }

    #[test]
    fn token_is_masked_everywhere_it_is_shown() {
        let registry = AccountRegistry::new(vec!["abcdefghijklmnop".into()], &[]).unwrap();
        let account = registry.get(0).unwrap();

        assert_eq!(account.masked_token(), "abcdefgh...");
        assert!(!format!("{account:?}").contains("ijklmnop"));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0].number, 1);
        assert_eq!(snapshot[0].token, "abcdefgh...");
    }
}
