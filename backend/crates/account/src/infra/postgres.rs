//! PostgreSQL Repository Implementation
//!
//! Uniqueness of login and email is enforced by the `ux_accounts_login` and
//! `ux_accounts_email` indexes on `lower(...)`. Violations surface as
//! `LoginAlreadyUsed` / `EmailAlreadyUsed`.
//!
//! State transitions are single `UPDATE ... WHERE <condition> RETURNING`
//! statements, so a key is consumed by exactly one caller.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::{Account, ManagedUpdate, PendingReset};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_key::{ActivationKey, ResetKey},
    account_password::AccountPassword,
    authority::Authority,
    email::Email,
    login::Login,
    profile::Profile,
};
use crate::error::{AccountError, AccountResult};

const LOGIN_UNIQUE_INDEX: &str = "ux_accounts_login";
const EMAIL_UNIQUE_INDEX: &str = "ux_accounts_email";
const UNIQUE_VIOLATION: &str = "23505";

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    login,
    email,
    password_hash,
    first_name,
    last_name,
    image_url,
    lang_key,
    activated,
    activation_key,
    reset_key,
    reset_issued_at,
    authorities,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        condition: &str,
        value: &str,
    ) -> AccountResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {condition}");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }
}

/// Map unique index violations to the matching conflict
fn map_write_error(err: sqlx::Error) -> AccountError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            match db_err.constraint() {
                Some(LOGIN_UNIQUE_INDEX) => return AccountError::LoginAlreadyUsed,
                Some(EMAIL_UNIQUE_INDEX) => return AccountError::EmailAlreadyUsed,
                _ => {}
            }
        }
    }
    AccountError::Database(err)
}

fn into_updated(row: Option<AccountRow>) -> AccountResult<Option<Account>> {
    row.map(AccountRow::into_account).transpose()
}

impl AccountRepository for PgAccountRepository {
    async fn create_replacing_unactivated(&self, account: &Account) -> AccountResult<Vec<Account>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "DELETE FROM accounts
             WHERE activated = FALSE AND (lower(login) = lower($1) OR lower(email) = lower($2))
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let removed = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account.login.as_str())
            .bind(account.email.as_str())
            .fetch_all(&mut *tx)
            .await?;

        // Checked in order so a double clash reports the login; the indexes
        // still catch concurrent inserts
        let login_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE lower(login) = lower($1))",
        )
        .bind(account.login.as_str())
        .fetch_one(&mut *tx)
        .await?;
        if login_taken {
            return Err(AccountError::LoginAlreadyUsed);
        }

        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE lower(email) = lower($1))",
        )
        .bind(account.email.as_str())
        .fetch_one(&mut *tx)
        .await?;
        if email_taken {
            return Err(AccountError::EmailAlreadyUsed);
        }

        let (reset_key, reset_issued_at) = reset_columns(account);

        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                login,
                email,
                password_hash,
                first_name,
                last_name,
                image_url,
                lang_key,
                activated,
                activation_key,
                reset_key,
                reset_issued_at,
                authorities,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.login.as_str())
        .bind(account.email.as_str())
        .bind(account.password.as_phc_string())
        .bind(account.profile.first_name.as_deref())
        .bind(account.profile.last_name.as_deref())
        .bind(account.profile.image_url.as_deref())
        .bind(&account.profile.lang_key)
        .bind(account.activated)
        .bind(account.activation_key.as_ref().map(ActivationKey::as_str))
        .bind(reset_key)
        .bind(reset_issued_at)
        .bind(authority_codes(&account.authorities))
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        removed.into_iter().map(AccountRow::into_account).collect()
    }

    async fn activate(
        &self,
        key: &ActivationKey,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET activated = TRUE, activation_key = NULL, updated_at = $2
             WHERE activation_key = $1
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(key.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        into_updated(row)
    }

    async fn issue_reset(
        &self,
        account_id: &AccountId,
        reset: &PendingReset,
    ) -> AccountResult<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET reset_key = $2, reset_issued_at = $3, updated_at = $3
             WHERE account_id = $1 AND activated = TRUE
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account_id.as_uuid())
            .bind(reset.key.as_str())
            .bind(reset.issued_at)
            .fetch_optional(&self.pool)
            .await?;

        into_updated(row)
    }

    async fn complete_reset(
        &self,
        key: &ResetKey,
        password: &AccountPassword,
        issued_after: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET
                password_hash = $2,
                reset_key = NULL,
                reset_issued_at = NULL,
                updated_at = $4
             WHERE reset_key = $1 AND reset_issued_at > $3
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(key.as_str())
            .bind(password.as_phc_string())
            .bind(issued_after)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        into_updated(row)
    }

    async fn replace_password(
        &self,
        account_id: &AccountId,
        current: &AccountPassword,
        password: &AccountPassword,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET password_hash = $3, updated_at = $4
             WHERE account_id = $1 AND password_hash = $2
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account_id.as_uuid())
            .bind(current.as_phc_string())
            .bind(password.as_phc_string())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        into_updated(row)
    }

    async fn update_profile(
        &self,
        account_id: &AccountId,
        email: &Email,
        profile: &Profile,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET
                email = $2,
                first_name = $3,
                last_name = $4,
                image_url = $5,
                lang_key = $6,
                updated_at = $7
             WHERE account_id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account_id.as_uuid())
            .bind(email.as_str())
            .bind(profile.first_name.as_deref())
            .bind(profile.last_name.as_deref())
            .bind(profile.image_url.as_deref())
            .bind(&profile.lang_key)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        into_updated(row)
    }

    async fn update_managed(
        &self,
        account_id: &AccountId,
        update: &ManagedUpdate,
        now: DateTime<Utc>,
    ) -> AccountResult<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET
                login = $2,
                email = $3,
                first_name = $4,
                last_name = $5,
                image_url = $6,
                lang_key = $7,
                activated = $8,
                activation_key = CASE WHEN $8 THEN NULL ELSE activation_key END,
                authorities = $9,
                updated_at = $10
             WHERE account_id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account_id.as_uuid())
            .bind(update.login.as_str())
            .bind(update.email.as_str())
            .bind(update.profile.first_name.as_deref())
            .bind(update.profile.last_name.as_deref())
            .bind(update.profile.image_url.as_deref())
            .bind(&update.profile.lang_key)
            .bind(update.activated)
            .bind(authority_codes(&update.authorities))
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        into_updated(row)
    }

    async fn delete(&self, account_id: &AccountId) -> AccountResult<bool> {
        let deleted = sqlx::query("DELETE FROM accounts WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_login(&self, login: &Login) -> AccountResult<Option<Account>> {
        self.fetch_one_where("lower(login) = lower($1)", login.as_str())
            .await
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        self.fetch_one_where("lower(email) = lower($1)", email.as_str())
            .await
    }

    async fn find_by_reset_key(&self, key: &ResetKey) -> AccountResult<Option<Account>> {
        self.fetch_one_where("reset_key = $1", key.as_str()).await
    }

    async fn delete_stale_unactivated(
        &self,
        created_before: DateTime<Utc>,
    ) -> AccountResult<Vec<Account>> {
        let sql = format!(
            "DELETE FROM accounts
             WHERE activated = FALSE AND activation_key IS NOT NULL AND created_at < $1
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(created_before)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn find_all_managed(
        &self,
        excluded_login: &Login,
        page: PageRequest,
    ) -> AccountResult<Page<Account>> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts WHERE lower(login) <> lower($1)",
        )
        .bind(excluded_login.as_str())
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE lower(login) <> lower($1)
             ORDER BY login LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(excluded_login.as_str())
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(AccountRow::into_account)
            .collect::<AccountResult<Vec<_>>>()?;

        Ok(Page::new(items, page, u64::try_from(total).unwrap_or(0)))
    }
}

fn reset_columns(account: &Account) -> (Option<&str>, Option<DateTime<Utc>>) {
    match &account.pending_reset {
        Some(reset) => (Some(reset.key.as_str()), Some(reset.issued_at)),
        None => (None, None),
    }
}

fn authority_codes(authorities: &BTreeSet<Authority>) -> Vec<String> {
    authorities.iter().map(|a| a.code().to_string()).collect()
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    login: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
    lang_key: String,
    activated: bool,
    activation_key: Option<String>,
    reset_key: Option<String>,
    reset_issued_at: Option<DateTime<Utc>>,
    authorities: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccountResult<Account> {
        let password = AccountPassword::from_phc_string(self.password_hash)
            .map_err(|e| AccountError::Internal(format!("Invalid password_hash: {}", e)))?;

        let pending_reset = match (self.reset_key, self.reset_issued_at) {
            (Some(key), Some(issued_at)) => Some(PendingReset {
                key: ResetKey::from_db(key),
                issued_at,
            }),
            (None, None) => None,
            _ => {
                return Err(AccountError::Internal(format!(
                    "Half-set password reset on account {}",
                    self.account_id
                )));
            }
        };

        let authorities = self
            .authorities
            .iter()
            .map(|code| {
                Authority::from_code(code)
                    .ok_or_else(|| AccountError::Internal(format!("Invalid authority: {}", code)))
            })
            .collect::<AccountResult<BTreeSet<_>>>()?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            login: Login::from_db(self.login),
            email: Email::from_db(self.email),
            password,
            profile: Profile {
                first_name: self.first_name,
                last_name: self.last_name,
                image_url: self.image_url,
                lang_key: self.lang_key,
            },
            activated: self.activated,
            activation_key: self.activation_key.map(ActivationKey::from_db),
            pending_reset,
            authorities,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
