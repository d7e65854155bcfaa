//! Authenticate Use Case
//!
//! Credential check for a login or email. Identifiers that parse as an email
//! are looked up by email only; everything else by login. The anonymous
//! account never authenticates.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_password::RawPassword, email::Email, login::Login};
use crate::error::{AccountError, AccountResult};

pub struct AuthenticateInput {
    /// Login or email
    pub identifier: String,
    pub password: String,
}

pub struct AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountConfig>,
}

impl<R> AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AccountResult<Account> {
        let password = RawPassword::for_verification(input.password);

        let account = self
            .lookup(&input.identifier)
            .await?
            .filter(|a| !self.config.is_anonymous(&a.login))
            .ok_or(AccountError::BadCredentials)?;

        // Checked before the password: right or wrong, an unactivated account is refused
        if !account.activated {
            return Err(AccountError::AccountNotActivated);
        }

        if !account.password.verify(&password, self.config.pepper()) {
            tracing::warn!(login = %account.login, "Authentication failed");
            return Err(AccountError::BadCredentials);
        }

        tracing::debug!(account_id = %account.account_id, "Authenticated");

        Ok(account)
    }

    async fn lookup(&self, identifier: &str) -> AccountResult<Option<Account>> {
        if identifier.contains('@') {
            if let Ok(email) = Email::new(identifier) {
                return self.repo.find_by_email(&email).await;
            }
        }

        match Login::new(identifier) {
            Ok(login) => self.repo.find_by_login(&login).await,
            Err(_) => Ok(None),
        }
    }
}
