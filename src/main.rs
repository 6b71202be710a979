//! `user-context` - resolves the user context for one session and prints it.
//!
//! Reads backend settings from `USER_CONTEXT__*` variables and the session
//! from `USER_CONTEXT_ACCESS_TOKEN` / `USER_CONTEXT_USER_ID` (plus optional
//! `USER_CONTEXT_EMAIL`). Without a user id the session is signed out.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use user_context::adapters::postgrest::{PostgrestClient, PostgrestConfig};
use user_context::application::{use_user, UserContextProvider, UserSessionStore};
use user_context::config::AppConfig;
use user_context::domain::foundation::{AccessToken, SessionUser, UserId};
use user_context::domain::session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load_validated()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = Arc::new(PostgrestClient::new(PostgrestConfig::from(&config.backend))?);
    let store = UserSessionStore::new(client.clone(), client);
    let provider = UserContextProvider::new(store);

    let session = session_from_env()?;
    tracing::info!(signed_in = session.is_signed_in(), "Resolving user context");

    provider.store().reconcile(session);
    provider.store().wait_idle().await;

    let snapshot = provider.sync_scope(use_user)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    provider.unmount().await;
    Ok(())
}

fn session_from_env() -> Result<Session, Box<dyn Error>> {
    let Ok(user_id) = std::env::var("USER_CONTEXT_USER_ID") else {
        return Ok(Session::signed_out());
    };

    let token = std::env::var("USER_CONTEXT_ACCESS_TOKEN")
        .map_err(|_| "USER_CONTEXT_ACCESS_TOKEN is required when USER_CONTEXT_USER_ID is set")?;
    let email = std::env::var("USER_CONTEXT_EMAIL").ok();

    let user = SessionUser::new(UserId::new(user_id)?, email, None);
    Ok(Session::signed_in(user, AccessToken::new(token)?))
}
