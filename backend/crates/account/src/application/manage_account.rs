//! Account Administration Use Cases
//!
//! Lookup, listing, editing and deletion of accounts by an administrator.
//! Authorization of the caller is the outer layer's concern.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::AccountId;

use crate::application::config::AccountConfig;
use crate::domain::entity::account::{Account, ManagedUpdate};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    authority::Authority, email::Email, login::Login, profile::Profile,
};
use crate::error::{AccountError, AccountResult};

// ============================================================================
// Get
// ============================================================================

pub struct GetAccountUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> GetAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, login: &str) -> AccountResult<Account> {
        let login = Login::new(login).map_err(|_| AccountError::AccountNotFound)?;
        self.repo
            .find_by_login(&login)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }
}

// ============================================================================
// List
// ============================================================================

pub struct ListManagedAccountsUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountConfig>,
}

impl<R> ListManagedAccountsUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountConfig>) -> Self {
        Self { repo, config }
    }

    /// Ordered by login; the anonymous account is never included
    pub async fn execute(&self, page: PageRequest) -> AccountResult<Page<Account>> {
        let anonymous = Login::new(&self.config.anonymous_login)?;
        self.repo.find_all_managed(&anonymous, page).await
    }
}

// ============================================================================
// Update
// ============================================================================

pub struct UpdateManagedAccountInput {
    pub account_id: AccountId,
    pub login: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub lang_key: Option<String>,
    pub activated: bool,
    /// Authority codes; unknown codes are dropped
    pub authorities: Vec<String>,
}

pub struct UpdateManagedAccountUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountConfig>,
}

impl<R> UpdateManagedAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: UpdateManagedAccountInput) -> AccountResult<Account> {
        let login = Login::new(&input.login)?;
        let email = Email::new(&input.email)?;
        let profile = Profile::new(
            input.first_name,
            input.last_name,
            input.image_url,
            input.lang_key,
            &self.config.default_lang_key,
        )?;
        let authorities = parse_authorities(&input.authorities);

        if self.repo.find_by_id(&input.account_id).await?.is_none() {
            return Err(AccountError::AccountNotFound);
        }

        if let Some(holder) = self.repo.find_by_login(&login).await? {
            if holder.account_id != input.account_id {
                return Err(AccountError::LoginAlreadyUsed);
            }
        }
        if let Some(holder) = self.repo.find_by_email(&email).await? {
            if holder.account_id != input.account_id {
                return Err(AccountError::EmailAlreadyUsed);
            }
        }

        let update = ManagedUpdate {
            login,
            email,
            profile,
            activated: input.activated,
            authorities,
        };
        let account = self
            .repo
            .update_managed(&input.account_id, &update, Utc::now())
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            activated = account.activated,
            "Managed account updated"
        );

        Ok(account)
    }
}

fn parse_authorities(codes: &[String]) -> BTreeSet<Authority> {
    codes
        .iter()
        .filter_map(|code| {
            let authority = Authority::from_code(code);
            if authority.is_none() {
                tracing::debug!(code = %code, "Dropping unknown authority");
            }
            authority
        })
        .collect()
}

// ============================================================================
// Delete
// ============================================================================

pub struct DeleteAccountUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, login: &str) -> AccountResult<()> {
        let login = Login::new(login).map_err(|_| AccountError::AccountNotFound)?;
        let account = self
            .repo
            .find_by_login(&login)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        if !self.repo.delete(&account.account_id).await? {
            return Err(AccountError::AccountNotFound);
        }

        tracing::info!(
            account_id = %account.account_id,
            login = %account.login,
            "Account deleted"
        );

        Ok(())
    }
}
