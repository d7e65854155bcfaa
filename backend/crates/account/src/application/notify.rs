//! Fire-and-forget mail dispatch
//!
//! Mail runs on its own task. Failures are logged and never reach the
//! operation that triggered them.

use std::sync::Arc;

use crate::domain::entity::account::Account;
use crate::domain::mailer::{MailKind, Mailer};

pub(crate) fn dispatch<M>(mailer: &Arc<M>, kind: MailKind, account: Account)
where
    M: Mailer + Sync + 'static,
{
    let mailer = Arc::clone(mailer);
    tokio::spawn(async move {
        let result = match kind {
            MailKind::Activation => mailer.send_activation_email(&account).await,
            MailKind::PasswordReset => mailer.send_password_reset_email(&account).await,
        };

        match result {
            Ok(()) => tracing::debug!(kind = %kind, login = %account.login, "Mail dispatched"),
            Err(e) => tracing::warn!(
                error = %e,
                kind = %kind,
                login = %account.login,
                "Failed to send account mail"
            ),
        }
    });
}
