//! Account Manager
//!
//! Facade owning the store, the mailer and the configuration. Each method
//! builds the matching use case over shared handles.

use std::sync::Arc;

use crate::application::{
    activate::ActivateAccountUseCase,
    authenticate::{AuthenticateInput, AuthenticateUseCase},
    change_password::{ChangePasswordInput, ChangePasswordUseCase},
    cleanup::RemoveNotActivatedAccountsUseCase,
    config::AccountConfig,
    manage_account::{
        DeleteAccountUseCase, GetAccountUseCase, ListManagedAccountsUseCase,
        UpdateManagedAccountInput, UpdateManagedAccountUseCase,
    },
    password_reset::{CompletePasswordResetUseCase, RequestPasswordResetUseCase},
    register::{RegisterInput, RegisterUseCase},
    update_account::{UpdateAccountInput, UpdateAccountUseCase},
};
use crate::domain::entity::account::Account;
use crate::domain::mailer::Mailer;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::AccountRepository;
use crate::error::AccountResult;

pub struct AccountManager<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AccountConfig>,
}

impl<R, M> Clone for AccountManager<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            mailer: Arc::clone(&self.mailer),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R, M> AccountManager<R, M>
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

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    pub async fn register(&self, input: RegisterInput) -> AccountResult<Account> {
        RegisterUseCase::new(self.repo.clone(), self.mailer.clone(), self.config.clone())
            .execute(input)
            .await
    }

    pub async fn activate_account(&self, key: &str) -> AccountResult<Account> {
        ActivateAccountUseCase::new(self.repo.clone())
            .execute(key)
            .await
    }

    pub async fn request_password_reset(&self, login_or_email: &str) -> AccountResult<Account> {
        RequestPasswordResetUseCase::new(self.repo.clone(), self.mailer.clone(), self.config.clone())
            .execute(login_or_email)
            .await
    }

    pub async fn complete_password_reset(
        &self,
        new_password: String,
        reset_key: &str,
    ) -> AccountResult<Account> {
        CompletePasswordResetUseCase::new(self.repo.clone(), self.config.clone())
            .execute(new_password, reset_key)
            .await
    }

    pub async fn change_password(&self, input: ChangePasswordInput) -> AccountResult<Account> {
        ChangePasswordUseCase::new(self.repo.clone(), self.config.clone())
            .execute(input)
            .await
    }

    pub async fn authenticate(&self, input: AuthenticateInput) -> AccountResult<Account> {
        AuthenticateUseCase::new(self.repo.clone(), self.config.clone())
            .execute(input)
            .await
    }

    pub async fn update_account(&self, input: UpdateAccountInput) -> AccountResult<Account> {
        UpdateAccountUseCase::new(self.repo.clone(), self.config.clone())
            .execute(input)
            .await
    }

    pub async fn get_account(&self, login: &str) -> AccountResult<Account> {
        GetAccountUseCase::new(self.repo.clone()).execute(login).await
    }

    pub async fn get_all_managed_accounts(
        &self,
        page: PageRequest,
    ) -> AccountResult<Page<Account>> {
        ListManagedAccountsUseCase::new(self.repo.clone(), self.config.clone())
            .execute(page)
            .await
    }

    pub async fn update_managed_account(
        &self,
        input: UpdateManagedAccountInput,
    ) -> AccountResult<Account> {
        UpdateManagedAccountUseCase::new(self.repo.clone(), self.config.clone())
            .execute(input)
            .await
    }

    pub async fn delete_account(&self, login: &str) -> AccountResult<()> {
        DeleteAccountUseCase::new(self.repo.clone()).execute(login).await
    }

    pub async fn remove_not_activated_accounts(&self) -> AccountResult<u64> {
        RemoveNotActivatedAccountsUseCase::new(self.repo.clone(), self.config.clone())
            .execute()
            .await
    }
}
