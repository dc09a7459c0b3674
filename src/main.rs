//! Keygate - main application entry point.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Open the credential store (PostgreSQL + migrations, or in-memory)
//! 3. Prepare the shared secret for `/api/checkKey`
//! 4. Assemble the command registry (and the console adapter if enabled)
//! 5. Build the HTTP router and serve on the configured port

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use keygate::{
    AppState,
    auth::{AccessGuard, Actor, AuthorizationSecret},
    commands::CommandRegistry,
    config::Config,
    console, db,
    store::{CredentialStore, MemoryCredentialStore, PgCredentialStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting services...");

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PgCredentialStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, credentials are kept in memory");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let (secret, generated) = AuthorizationSecret::from_config(config.api_key.as_deref());
    if generated {
        tracing::warn!("API_KEY not set, generated a random shared secret for this process");
    }

    let state = AppState::new(store, secret);

    let commands = Arc::new(CommandRegistry::builtin(AccessGuard::new(
        state.engine.clone(),
        config.admin_role_id.clone(),
    ))?);
    tracing::info!(
        "Command registry ready: {}",
        commands
            .list()
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if config.console {
        let actor =
            Actor::new(config.console_user_id.clone()).with_roles(config.console_roles.clone());
        tokio::spawn(console::run(commands.clone(), actor));
    }

    let app = keygate::router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Key API ready at /api/checkKey");

    axum::serve(listener, app).await?;

    Ok(())
}
