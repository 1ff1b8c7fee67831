//! Login and credential handling.
//!
//! Passwords are reduced to a SHA-256 hex digest before they reach the
//! store; neither the store nor the logs ever see clear text. An unseen
//! username registers a new account on its first login.

use notepad_types::{Account, NewAccount};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{NotepadError, RemoteError, StoreOp, ValidationError};
use crate::store::SharedStore;

/// Minimum credential lengths, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPolicy {
    pub min_username_len: usize,
    pub min_password_len: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            min_username_len: crate::constants::MIN_USERNAME_LEN,
            min_password_len: crate::constants::MIN_PASSWORD_LEN,
        }
    }
}

/// Check credential lengths against `policy`. Username is checked first.
pub fn validate_credentials(
    username: &str,
    password: &str,
    policy: &CredentialPolicy,
) -> Result<(), ValidationError> {
    let user_len = username.chars().count();
    if user_len < policy.min_username_len {
        return Err(ValidationError::UsernameTooShort {
            min: policy.min_username_len,
            got: user_len,
        });
    }
    let pass_len = password.chars().count();
    if pass_len < policy.min_password_len {
        return Err(ValidationError::PasswordTooShort {
            min: policy.min_password_len,
            got: pass_len,
        });
    }
    Ok(())
}

/// Hex SHA-256 digest of a credential.
pub fn hash_credential(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Resolves logins to accounts, registering unseen usernames.
pub struct AccountService {
    store: SharedStore,
    policy: CredentialPolicy,
}

impl AccountService {
    pub fn new(store: SharedStore, policy: CredentialPolicy) -> Self {
        Self { store, policy }
    }

    /// Log in, creating the account if the username has never been seen.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, NotepadError> {
        let username = username.trim();
        validate_credentials(username, password, &self.policy)?;
        let digest = hash_credential(password);

        match self.store.find_account(username).await? {
            Some(account) if account.credential_hash == digest => {
                info!(account = %account, "login");
                Ok(account)
            }
            Some(_) => {
                let err = RemoteError::auth(StoreOp::FindAccount, "invalid username or password");
                Err(err.into())
            }
            None => {
                let account = self
                    .store
                    .create_account(NewAccount::new(username, digest))
                    .await?;
                info!(account = %account, "registered new account");
                Ok(account)
            }
        }
    }
}
