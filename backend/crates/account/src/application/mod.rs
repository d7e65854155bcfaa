//! Application Layer
//!
//! Use cases and application services.

pub mod activate;
pub mod authenticate;
pub mod change_password;
pub mod cleanup;
pub mod config;
pub mod manage_account;
pub mod manager;
pub(crate) mod notify;
pub mod password_reset;
pub mod register;
pub mod update_account;

// Re-exports
pub use activate::ActivateAccountUseCase;
pub use authenticate::{AuthenticateInput, AuthenticateUseCase};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use cleanup::RemoveNotActivatedAccountsUseCase;
pub use config::AccountConfig;
pub use manage_account::{
    DeleteAccountUseCase, GetAccountUseCase, ListManagedAccountsUseCase,
    UpdateManagedAccountInput, UpdateManagedAccountUseCase,
};
pub use manager::AccountManager;
pub use password_reset::{CompletePasswordResetUseCase, RequestPasswordResetUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use update_account::{UpdateAccountInput, UpdateAccountUseCase};
