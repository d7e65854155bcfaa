//! Update Account Use Case
//!
//! Self-service profile edit. Only email and profile fields change.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AccountConfig;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{email::Email, login::Login, profile::Profile};
use crate::error::{AccountError, AccountResult};

pub struct UpdateAccountInput {
    /// Login of the account being edited (the caller's own)
    pub login: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub lang_key: Option<String>,
}

pub struct UpdateAccountUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountConfig>,
}

impl<R> UpdateAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: UpdateAccountInput) -> AccountResult<Account> {
        let email = Email::new(&input.email)?;
        let profile = Profile::new(
            input.first_name,
            input.last_name,
            input.image_url,
            input.lang_key,
            &self.config.default_lang_key,
        )?;

        let login = Login::new(&input.login).map_err(|_| AccountError::AccountNotFound)?;
        let found = self
            .repo
            .find_by_login(&login)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        if let Some(holder) = self.repo.find_by_email(&email).await? {
            if holder.account_id != found.account_id {
                return Err(AccountError::EmailAlreadyUsed);
            }
        }

        let account = self
            .repo
            .update_profile(&found.account_id, &email, &profile, Utc::now())
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            "Account profile updated"
        );

        Ok(account)
    }
}
