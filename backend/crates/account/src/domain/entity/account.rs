//! Account Entity
//!
//! Credentials, lifecycle state and profile of one user account. State
//! transitions live here; persistence and uniqueness are the store's job.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{
    account_key::{ActivationKey, ResetKey},
    account_password::AccountPassword,
    authority::Authority,
    email::Email,
    login::Login,
    profile::Profile,
};

/// Outstanding password reset. Key and issue time exist together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReset {
    pub key: ResetKey,
    pub issued_at: DateTime<Utc>,
}

impl PendingReset {
    /// A reset is expired once `ttl` has fully elapsed. Issue times in the
    /// future never count as expired.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at >= ttl
    }
}

/// Fields an administrator may overwrite
#[derive(Debug, Clone)]
pub struct ManagedUpdate {
    pub login: Login,
    pub email: Email,
    pub profile: Profile,
    pub activated: bool,
    pub authorities: BTreeSet<Authority>,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub login: Login,
    pub email: Email,
    pub password: AccountPassword,
    pub profile: Profile,
    pub activated: bool,
    pub activation_key: Option<ActivationKey>,
    pub pending_reset: Option<PendingReset>,
    pub authorities: BTreeSet<Authority>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// New unactivated account holding only [`Authority::User`]
    pub fn register(
        login: Login,
        email: Email,
        password: AccountPassword,
        profile: Profile,
        activation_key: ActivationKey,
    ) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            login,
            email,
            password,
            profile,
            activated: false,
            activation_key: Some(activation_key),
            pending_reset: None,
            authorities: BTreeSet::from([Authority::User]),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.activated = true;
        self.activation_key = None;
        self.updated_at = now;
    }

    /// Replaces any earlier reset
    pub fn issue_reset(&mut self, key: ResetKey, now: DateTime<Utc>) {
        self.pending_reset = Some(PendingReset {
            key,
            issued_at: now,
        });
        self.updated_at = now;
    }

    /// No pending reset counts as expired
    pub fn is_reset_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.pending_reset
            .as_ref()
            .is_none_or(|reset| reset.is_expired(now, ttl))
    }

    pub fn complete_reset(&mut self, password: AccountPassword, now: DateTime<Utc>) {
        self.password = password;
        self.pending_reset = None;
        self.updated_at = now;
    }

    pub fn change_password(&mut self, password: AccountPassword, now: DateTime<Utc>) {
        self.password = password;
        self.updated_at = now;
    }

    /// Self-service edit. Login, activation and authorities stay untouched.
    pub fn update_profile(&mut self, email: Email, profile: Profile, now: DateTime<Utc>) {
        self.email = email;
        self.profile = profile;
        self.updated_at = now;
    }

    /// Administrator edit. An activated account holds no activation key.
    pub fn apply_admin_update(&mut self, update: ManagedUpdate, now: DateTime<Utc>) {
        self.login = update.login;
        self.email = update.email;
        self.profile = update.profile;
        self.activated = update.activated;
        if update.activated {
            self.activation_key = None;
        }
        self.authorities = update.authorities;
        self.updated_at = now;
    }

    /// Unactivated, still holding its activation key, and created before `cutoff`
    pub fn is_stale_unactivated(&self, cutoff: DateTime<Utc>) -> bool {
        !self.activated && self.activation_key.is_some() && self.created_at < cutoff
    }

    pub fn is_admin(&self) -> bool {
        self.authorities.contains(&Authority::Admin)
    }
}
