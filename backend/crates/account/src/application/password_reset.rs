//! Password Reset Use Cases
//!
//! Two steps: issue a reset key and mail it, then trade the key for a new
//! password while it is still fresh.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AccountConfig;
use crate::application::notify;
use crate::domain::entity::account::{Account, PendingReset};
use crate::domain::mailer::{MailKind, Mailer};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_key::ResetKey,
    account_password::{AccountPassword, RawPassword},
    email::Email,
    login::Login,
};
use crate::error::{AccountError, AccountResult};

// ============================================================================
// Request
// ============================================================================

pub struct RequestPasswordResetUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AccountConfig>,
}

impl<R, M> RequestPasswordResetUseCase<R, M>
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

    /// `login_or_email` is matched against emails first, then logins.
    /// Unactivated accounts and the anonymous account are treated as missing.
    pub async fn execute(&self, login_or_email: &str) -> AccountResult<Account> {
        let found = self
            .find_activated(login_or_email)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        let reset = PendingReset {
            key: ResetKey::generate(self.config.reset_key_length),
            issued_at: Utc::now(),
        };
        // Deleted or deactivated since the lookup
        let account = self
            .repo
            .issue_reset(&found.account_id, &reset)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            "Password reset requested"
        );

        notify::dispatch(&self.mailer, MailKind::PasswordReset, account.clone());

        Ok(account)
    }

    async fn find_activated(&self, login_or_email: &str) -> AccountResult<Option<Account>> {
        let eligible = |a: &Account| a.activated && !self.config.is_anonymous(&a.login);

        if let Ok(email) = Email::new(login_or_email) {
            let by_email = self.repo.find_by_email(&email).await?;
            if let Some(account) = by_email.filter(|a| eligible(a)) {
                return Ok(Some(account));
            }
        }

        let Ok(login) = Login::new(login_or_email) else {
            return Ok(None);
        };
        let by_login = self.repo.find_by_login(&login).await?;
        Ok(by_login.filter(|a| eligible(a)))
    }
}

// ============================================================================
// Complete
// ============================================================================

pub struct CompletePasswordResetUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountConfig>,
}

impl<R> CompletePasswordResetUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountConfig>) -> Self {
        Self { repo, config }
    }

    /// Unknown and expired keys both yield `InvalidKey`
    pub async fn execute(&self, new_password: String, reset_key: &str) -> AccountResult<Account> {
        let raw_password = RawPassword::new(new_password, &self.config.password_policy)?;

        let key = ResetKey::parse(reset_key).map_err(|_| AccountError::InvalidKey)?;
        let ttl = self.config.reset_key_ttl_chrono();

        // Lookup only spares the hash for dead keys; the write re-checks
        let found = self
            .repo
            .find_by_reset_key(&key)
            .await?
            .ok_or(AccountError::InvalidKey)?;
        if found.is_reset_expired(Utc::now(), ttl) {
            tracing::debug!(login = %found.login, "Rejected expired reset key");
            return Err(AccountError::InvalidKey);
        }

        let password = AccountPassword::from_raw(&raw_password, self.config.pepper())?;

        let now = Utc::now();
        let issued_after = now
            .checked_sub_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let account = self
            .repo
            .complete_reset(&key, &password, issued_after, now)
            .await?
            .ok_or(AccountError::InvalidKey)?;

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            "Password reset completed"
        );

        Ok(account)
    }
}
