//! Register Use Case
//!
//! Creates a new unactivated account and mails its activation key.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::notify;
use crate::domain::entity::account::Account;
use crate::domain::mailer::{MailKind, Mailer};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_key::ActivationKey,
    account_password::{AccountPassword, RawPassword},
    email::Email,
    login::Login,
    profile::Profile,
};
use crate::error::AccountResult;

/// Registration input
#[derive(Default)]
pub struct RegisterInput {
    pub login: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub lang_key: Option<String>,
    /// Ignored: new accounts always start with `ROLE_USER` only
    pub authorities: Vec<String>,
}

pub struct RegisterUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AccountConfig>,
}

impl<R, M> RegisterUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer + Sync + 'static,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AccountConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountResult<Account> {
        // Everything is validated and hashed before the store is touched
        let login = Login::new(&input.login)?;
        let email = Email::new(&input.email)?;
        let profile = Profile::new(
            input.first_name,
            input.last_name,
            input.image_url,
            input.lang_key,
            &self.config.default_lang_key,
        )?;
        let raw_password = RawPassword::new(input.password, &self.config.password_policy)?;
        let password = AccountPassword::from_raw(&raw_password, self.config.pepper())?;

        if !input.authorities.is_empty() {
            tracing::debug!(
                login = %login,
                requested = ?input.authorities,
                "Ignoring authorities requested at registration"
            );
        }

        let activation_key = ActivationKey::generate(self.config.activation_key_length);
        let account = Account::register(login, email, password, profile, activation_key);

        // Unactivated holders of the login or email are superseded; activated
        // ones make the whole registration fail
        let superseded = self.repo.create_replacing_unactivated(&account).await?;
        for stale in &superseded {
            tracing::info!(
                account_id = %stale.account_id,
                login = %stale.login,
                "Removed unactivated account superseded by new registration"
            );
        }

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            "Account registered"
        );

        notify::dispatch(&self.mailer, MailKind::Activation, account.clone());

        Ok(account)
    }
}
