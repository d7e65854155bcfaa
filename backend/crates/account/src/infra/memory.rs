//! In-Memory Repository Implementation
//!
//! Process-local store with the same uniqueness rules as the Postgres one.
//! Used by tests and for running without a database. Each operation holds
//! the lock from its check to its write.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use tokio::sync::Mutex;

use crate::domain::entity::account::{Account, ManagedUpdate, PendingReset};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_key::{ActivationKey, ResetKey},
    account_password::AccountPassword,
    email::Email,
    login::Login,
    profile::Profile,
};
use crate::error::{AccountError, AccountResult};

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.lock().await.is_empty()
    }

    /// Test hook for state no operation produces (aged rows, dropped keys)
    #[cfg(test)]
    pub(crate) async fn edit(&self, login: &Login, change: impl FnOnce(&mut Account)) {
        let _ = self.modify(|a| a.login == *login, change).await;
    }

    async fn find_first(&self, predicate: impl Fn(&Account) -> bool) -> Option<Account> {
        self.accounts
            .lock()
            .await
            .values()
            .find(|a| predicate(a))
            .cloned()
    }

    /// Apply `change` to the first account matching `predicate`
    async fn modify(
        &self,
        predicate: impl Fn(&Account) -> bool,
        change: impl FnOnce(&mut Account),
    ) -> AccountResult<Option<Account>> {
        let mut accounts = self.accounts.lock().await;
        let Some(current) = accounts.values().find(|a| predicate(a)) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        change(&mut updated);
        check_unique(
            accounts
                .values()
                .filter(|other| other.account_id != updated.account_id),
            &updated,
        )?;

        accounts.insert(updated.account_id, updated.clone());
        Ok(Some(updated))
    }
}

/// Login clashes are reported before email clashes
fn check_unique<'a>(
    others: impl Iterator<Item = &'a Account> + Clone,
    account: &Account,
) -> AccountResult<()> {
    if others.clone().any(|other| other.login == account.login) {
        return Err(AccountError::LoginAlreadyUsed);
    }
    if others.into_iter().any(|other| other.email == account.email) {
        return Err(AccountError::EmailAlreadyUsed);
    }
    Ok(())
}

impl AccountRepository for InMemoryAccountRepository {
    async fn create_replacing_unactivated(&self, account: &Account) -> AccountResult<Vec<Account>> {
        let mut accounts = self.accounts.lock().await;

        let superseded: Vec<AccountId> = accounts
            .values()
            .filter(|a| !a.activated && (a.login == account.login || a.email == account.email))
            .map(|a| a.account_id)
            .collect();

        check_unique(
            accounts
                .values()
                .filter(|a| !superseded.contains(&a.account_id)),
            account,
        )?;

        let removed = superseded
            .iter()
            .filter_map(|account_id| accounts.remove(account_id))
            .collect();
        accounts.insert(account.account_id, account.clone());

        Ok(removed)
    }

    async fn activate(
        &self,
        key: &ActivationKey,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        self.modify(
            |a| a.activation_key.as_ref() == Some(key),
            |a| a.activate(now),
        )
        .await
    }

    async fn issue_reset(
        &self,
        account_id: &AccountId,
        reset: &PendingReset,
    ) -> AccountResult<Option<Account>> {
        self.modify(
            |a| a.account_id == *account_id && a.activated,
            |a| a.issue_reset(reset.key.clone(), reset.issued_at),
        )
        .await
    }

    async fn complete_reset(
        &self,
        key: &ResetKey,
        password: &AccountPassword,
        issued_after: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        self.modify(
            |a| {
                a.pending_reset
                    .as_ref()
                    .is_some_and(|r| r.key == *key && r.issued_at > issued_after)
            },
            |a| a.complete_reset(password.clone(), now),
        )
        .await
    }

    async fn replace_password(
        &self,
        account_id: &AccountId,
        current: &AccountPassword,
        password: &AccountPassword,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        self.modify(
            |a| a.account_id == *account_id && a.password == *current,
            |a| a.change_password(password.clone(), now),
        )
        .await
    }

    async fn update_profile(
        &self,
        account_id: &AccountId,
        email: &Email,
        profile: &Profile,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        self.modify(
            |a| a.account_id == *account_id,
            |a| a.update_profile(email.clone(), profile.clone(), now),
        )
        .await
    }

    async fn update_managed(
        &self,
        account_id: &AccountId,
        update: &ManagedUpdate,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        self.modify(
            |a| a.account_id == *account_id,
            |a| a.apply_admin_update(update.clone(), now),
        )
        .await
    }

    async fn delete(&self, account_id: &AccountId) -> AccountResult<bool> {
        Ok(self.accounts.lock().await.remove(account_id).is_some())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        Ok(self.accounts.lock().await.get(account_id).cloned())
    }

    async fn find_by_login(&self, login: &Login) -> AccountResult<Option<Account>> {
        Ok(self.find_first(|a| a.login == *login).await)
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        Ok(self.find_first(|a| a.email == *email).await)
    }

    async fn find_by_reset_key(&self, key: &ResetKey) -> AccountResult<Option<Account>> {
        Ok(self
            .find_first(|a| a.pending_reset.as_ref().is_some_and(|r| r.key == *key))
            .await)
    }

    async fn delete_stale_unactivated(
        &self,
        created_before: DateTime<Utc>,
    ) -> AccountResult<Vec<Account>> {
        let mut accounts = self.accounts.lock().await;
        let stale: Vec<AccountId> = accounts
            .values()
            .filter(|a| a.is_stale_unactivated(created_before))
            .map(|a| a.account_id)
            .collect();

        Ok(stale
            .iter()
            .filter_map(|account_id| accounts.remove(account_id))
            .collect())
    }

    async fn find_all_managed(
        &self,
        excluded_login: &Login,
        page: PageRequest,
    ) -> AccountResult<Page<Account>> {
        let mut managed: Vec<Account> = self
            .accounts
            .lock()
            .await
            .values()
            .filter(|a| a.login != *excluded_login)
            .cloned()
            .collect();
        managed.sort_by(|a, b| a.login.cmp(&b.login));

        let total = managed.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = managed
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .collect();

        Ok(Page::new(items, page, total))
    }
}
