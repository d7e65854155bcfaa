//! Activate Account Use Case

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::account_key::ActivationKey;
use crate::error::{AccountError, AccountResult};

pub struct ActivateAccountUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> ActivateAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Activation keys are single-use and do not expire
    pub async fn execute(&self, key: &str) -> AccountResult<Account> {
        let key = ActivationKey::parse(key).map_err(|_| AccountError::InvalidKey)?;

        let account = self
            .repo
            .activate(&key, Utc::now())
            .await?
            .ok_or(AccountError::InvalidKey)?;

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            "Account activated"
        );

        Ok(account)
    }
}
