//! Repository Traits
//!
//! Interface for account persistence. Implementations are in the infra layer.
//!
//! Lookups by login and email are case-insensitive. Implementations must
//! reject a second account with the same login or email and report it as
//! `AccountError::LoginAlreadyUsed` / `AccountError::EmailAlreadyUsed`.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::entity::account::{Account, ManagedUpdate, PendingReset};
use crate::domain::page::{Page, PageRequest};
use crate::domain::value_object::{
    account_key::{ActivationKey, ResetKey},
    account_password::AccountPassword,
    email::Email,
    login::Login,
    profile::Profile,
};
use crate::error::AccountResult;

/// Account repository trait
///
/// Every write is a single conditional statement (or one transaction) against
/// the current row. Writes that take a condition return `None` when no row
/// satisfied it.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert `account`, first removing unactivated accounts that hold its
    /// login or email. All or nothing. Returns the removed accounts.
    async fn create_replacing_unactivated(&self, account: &Account) -> AccountResult<Vec<Account>>;

    /// Activate the account holding `key` and consume the key
    async fn activate(
        &self,
        key: &ActivationKey,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>>;

    /// Replace the pending reset of an activated account
    async fn issue_reset(
        &self,
        account_id: &AccountId,
        reset: &PendingReset,
    ) -> AccountResult<Option<Account>>;

    /// Set a new password and consume `key`, provided the key was issued
    /// strictly after `issued_after`
    async fn complete_reset(
        &self,
        key: &ResetKey,
        password: &AccountPassword,
        issued_after: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>>;

    /// Swap the password hash, provided it is still `current`
    async fn replace_password(
        &self,
        account_id: &AccountId,
        current: &AccountPassword,
        password: &AccountPassword,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>>;

    /// Write email and profile only
    async fn update_profile(
        &self,
        account_id: &AccountId,
        email: &Email,
        profile: &Profile,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>>;

    /// Write the administrator-editable fields only. Activating clears the
    /// activation key.
    async fn update_managed(
        &self,
        account_id: &AccountId,
        update: &ManagedUpdate,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>>;

    /// Returns whether a row was removed
    async fn delete(&self, account_id: &AccountId) -> AccountResult<bool>;

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>>;

    async fn find_by_login(&self, login: &Login) -> AccountResult<Option<Account>>;

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>>;

    async fn find_by_reset_key(&self, key: &ResetKey) -> AccountResult<Option<Account>>;

    /// Remove unactivated accounts that still hold an activation key and were
    /// created strictly before `created_before`. Returns the removed accounts.
    async fn delete_stale_unactivated(
        &self,
        created_before: DateTime<Utc>,
    ) -> AccountResult<Vec<Account>>;

    /// One page of accounts ordered by login, skipping `excluded_login`
    async fn find_all_managed(
        &self,
        excluded_login: &Login,
        page: PageRequest,
    ) -> AccountResult<Page<Account>>;
}
