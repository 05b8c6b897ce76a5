mod assistant;
mod auth;
mod config;
mod db;
mod documents;
mod errors;
mod job_search;
mod llm_client;
mod local_store;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{AuthEvent, AuthGateway, GoogleIdentityProvider};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::documents::PgDocumentStore;
use crate::job_search::JobSearchClient;
use crate::llm_client::LlmClient;
use crate::local_store::RecordStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{KeyValueStorage, MemoryStorage, RedisStorage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GradIndStud API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Per-user collections and sessions
    let storage: Arc<dyn KeyValueStorage> = match &config.redis_url {
        Some(url) => {
            let redis = RedisStorage::connect(url).await?;
            info!("Redis storage connected");
            Arc::new(redis)
        }
        None => {
            warn!("REDIS_URL not set; resumes and sessions live in process memory");
            Arc::new(MemoryStorage::new())
        }
    };

    let timeout = Duration::from_secs(config.http_timeout_secs);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
        timeout,
    )?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        warn!("GEMINI_API_KEY not set; AI features will answer with a configuration error");
    }

    let job_search = JobSearchClient::new(
        config.jsearch_api_key.clone(),
        config.jsearch_base_url.clone(),
        config.jsearch_host.clone(),
        timeout,
    )?;
    if config.jsearch_api_key.is_none() {
        warn!("JSEARCH_API_KEY not set; job search is disabled");
    }

    let identity = GoogleIdentityProvider::new(
        config.google_tokeninfo_url.clone(),
        config.google_client_id.clone(),
        timeout,
    )?;
    let auth = AuthGateway::new(
        Arc::new(identity),
        Arc::clone(&storage),
        Duration::from_secs(config.session_ttl_secs),
    );
    spawn_auth_logger(&auth);

    // Build app state
    let state = AppState {
        resumes: RecordStore::new(Arc::clone(&storage), Some(config.max_resumes)),
        external_jobs: RecordStore::new(Arc::clone(&storage), config.max_external_jobs),
        documents: Arc::new(PgDocumentStore::new(db)),
        llm: Arc::new(llm),
        job_search,
        auth,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Logs every sign-in and sign-out for the lifetime of the process.
fn spawn_auth_logger(auth: &AuthGateway) {
    let mut events = auth.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(AuthEvent::SignedIn(user)) => info!(uid = %user.uid, "auth state: signed in"),
                Ok(AuthEvent::SignedOut { uid }) => info!(uid = %uid, "auth state: signed out"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Auth event logger lagged, skipped {skipped} events")
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
