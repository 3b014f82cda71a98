use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use pessoas_infra::{
    db, EnvSecretProvider, Environment, InMemoryUserStore, PostgresUserStore, SecretProvider,
    Settings, UserStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pessoas_observability::init();

    let environment = Environment::from_process_env();
    tracing::info!(environment = %environment, "starting Pessoas.API");

    let secrets = EnvSecretProvider::new();
    let settings_dir = std::env::current_dir().context("failed to resolve working directory")?;
    let settings = Settings::load(&settings_dir, &environment, &secrets)
        .context("failed to load settings")?;

    let jwt_secret = match settings.jwt.secret.clone() {
        Some(secret) => secret,
        None => match secrets.resolve("PESSOAS_JWT_SECRET")? {
            Some(secret) => secret,
            None => {
                tracing::warn!("jwt secret not configured; using insecure dev default");
                "dev-secret".to_string()
            }
        },
    };

    // Environment branch: local runs in-memory; anything else connects to
    // Postgres and brings the schema up to date before accepting traffic.
    let store: Arc<dyn UserStore> = if environment.is_local() {
        Arc::new(InMemoryUserStore::new())
    } else {
        let url = settings
            .database
            .url
            .as_deref()
            .context("database.url must be configured outside the local environment")?;
        let pool = db::connect(url)
            .await
            .context("failed to connect to Postgres")?;

        tracing::info!(environment = %environment, "running pending migrations");
        db::run_pending_migrations(&pool)
            .await
            .context("schema migration failed")?;
        tracing::info!("migrations up to date");

        Arc::new(PostgresUserStore::new(pool))
    };

    let app = pessoas_api::app::build_app(&settings, environment, jwt_secret, store);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server terminated unexpectedly")?;

    Ok(())
}
