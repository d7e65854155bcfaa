//! Remove Not Activated Accounts Use Case
//!
//! Purges accounts that were never activated within the retention window.
//! Idempotent; safe to run alongside registrations.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AccountConfig;
use crate::domain::repository::AccountRepository;
use crate::error::AccountResult;

pub struct RemoveNotActivatedAccountsUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountConfig>,
}

impl<R> RemoveNotActivatedAccountsUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountConfig>) -> Self {
        Self { repo, config }
    }

    /// Returns the number of accounts removed
    pub async fn execute(&self) -> AccountResult<u64> {
        let cutoff = Utc::now()
            .checked_sub_signed(self.config.unactivated_retention_chrono())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let removed = self.repo.delete_stale_unactivated(cutoff).await?;

        for account in &removed {
            tracing::debug!(login = %account.login, "Deleted not activated account");
        }

        tracing::info!(
            accounts_deleted = removed.len(),
            cutoff = %cutoff,
            "Removed not activated accounts"
        );

        Ok(removed.len() as u64)
    }
}
