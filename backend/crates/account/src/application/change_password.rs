//! Change Password Use Case

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AccountConfig;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    login::Login,
};
use crate::error::{AccountError, AccountResult};

pub struct ChangePasswordInput {
    pub login: String,
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountConfig>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountConfig>) -> Self {
        Self { repo, config }
    }

    /// A concurrent password change since the check counts as a wrong
    /// current password
    pub async fn execute(&self, input: ChangePasswordInput) -> AccountResult<Account> {
        let new_password = RawPassword::new(input.new_password, &self.config.password_policy)?;
        let current_password = RawPassword::for_verification(input.current_password);

        let login = Login::new(&input.login).map_err(|_| AccountError::AccountNotFound)?;
        let found = self
            .repo
            .find_by_login(&login)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        if !found.password.verify(&current_password, self.config.pepper()) {
            tracing::warn!(login = %found.login, "Password change with wrong current password");
            return Err(AccountError::InvalidPassword);
        }

        let password = AccountPassword::from_raw(&new_password, self.config.pepper())?;
        let account = self
            .repo
            .replace_password(&found.account_id, &found.password, &password, Utc::now())
            .await?
            .ok_or(AccountError::InvalidPassword)?;

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            "Password changed"
        );

        Ok(account)
    }
}
