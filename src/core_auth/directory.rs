use crate::config::AccountConfig;
use crate::core_auth::account::Account;
use crate::core_auth::error::AuthError;
use crate::core_auth::password::verify_password;
use crate::core_vfs::path::absolute_normalized;
use log::debug;

/// Read-only set of accounts, built once from the configuration.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
}

impl AccountDirectory {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn from_config(entries: &[AccountConfig]) -> Self {
        let accounts = entries
            .iter()
            .map(|entry| {
                Account::new(
                    &entry.username,
                    &entry.password,
                    absolute_normalized(&entry.home),
                    entry.permission,
                )
            })
            .collect();
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// `anonymous` is matched case-insensitively, every other name exactly.
    pub fn find(&self, username: &str) -> Option<&Account> {
        if username.eq_ignore_ascii_case("anonymous") {
            self.accounts.iter().find(|a| a.is_anonymous())
        } else {
            self.accounts.iter().find(|a| a.username() == username)
        }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let account = self
            .find(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;

        if account.is_anonymous() && account.stored_password().is_empty() {
            debug!("Anonymous login accepted for {}", username);
            return Ok(account.clone());
        }

        if verify_password(password, account.stored_password()) {
            Ok(account.clone())
        } else {
            Err(AuthError::InvalidPassword(username.to_string()))
        }
    }
}
