//! Account Maintenance Daemon
//!
//! Connects to Postgres, applies migrations, then purges stale unactivated
//! accounts at startup and on a fixed interval until interrupted.
//! Uses `anyhow` for startup errors only.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use account::{AccountConfig, AccountManager, LogMailer, PgAccountRepository};
use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Manager = AccountManager<PgAccountRepository, LogMailer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accountd=info,account=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    // Database connection
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let mail_base_url =
        env::var("ACCOUNT_MAIL_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let interval = config.cleanup_interval;

    let manager = AccountManager::new(
        Arc::new(PgAccountRepository::new(pool)),
        Arc::new(LogMailer::new(mail_base_url)),
        Arc::new(config),
    );

    // Startup purge; failures must not prevent the daemon from running
    purge(&manager).await;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    tracing::info!(interval_secs = interval.as_secs(), "Cleanup scheduled");

    loop {
        tokio::select! {
            _ = ticker.tick() => purge(&manager).await,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "Failed to listen for shutdown signal");
                }
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

async fn purge(manager: &Manager) {
    match manager.remove_not_activated_accounts().await {
        Ok(deleted) => {
            tracing::info!(accounts_deleted = deleted, "Account cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Account cleanup failed, retrying next interval"
            );
        }
    }
}

fn load_config() -> anyhow::Result<AccountConfig> {
    let mut config = if cfg!(debug_assertions) {
        AccountConfig::development()
    } else {
        AccountConfig::default()
    };

    match env::var("ACCOUNT_PASSWORD_PEPPER") {
        Ok(pepper_b64) => {
            let pepper = general_purpose::STANDARD
                .decode(pepper_b64.trim())
                .context("ACCOUNT_PASSWORD_PEPPER must be valid base64")?;
            config.password_pepper = Some(pepper);
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::debug!("No password pepper configured");
        }
        Err(_) => {
            tracing::warn!("ACCOUNT_PASSWORD_PEPPER not set, hashing without pepper");
        }
    }

    if let Ok(secs) = env::var("ACCOUNT_CLEANUP_INTERVAL_SECS") {
        let secs: u64 = secs
            .parse()
            .context("ACCOUNT_CLEANUP_INTERVAL_SECS must be a number of seconds")?;
        anyhow::ensure!(secs > 0, "ACCOUNT_CLEANUP_INTERVAL_SECS must be positive");
        config.cleanup_interval = Duration::from_secs(secs);
    }

    Ok(config)
}
