use std::sync::Arc;

use crate::auth::AuthGateway;
use crate::config::Config;
use crate::documents::DocumentStore;
use crate::job_search::JobSearchClient;
use crate::llm_client::TextGenerator;
use crate::local_store::{ExternalJob, RecordStore, StoredResume};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Per-user resume collection, capped at `config.max_resumes`.
    pub resumes: RecordStore<StoredResume>,
    pub external_jobs: RecordStore<ExternalJob>,
    pub documents: Arc<dyn DocumentStore>,
    /// Gemini in production. Tests inject a scripted generator.
    pub llm: Arc<dyn TextGenerator>,
    pub job_search: JobSearchClient,
    pub auth: AuthGateway,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// Memory-backed state with fake sign-in (`valid:<uid>` tokens).
    pub fn for_tests(llm: Arc<dyn TextGenerator>) -> Self {
        use std::time::Duration;

        use crate::documents::memory::MemoryDocumentStore;
        use crate::storage::{KeyValueStorage, MemoryStorage};
        use crate::test_support::FakeIdentityProvider;

        let config = Config::for_tests();
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let timeout = Duration::from_secs(config.http_timeout_secs);

        AppState {
            resumes: RecordStore::new(Arc::clone(&storage), Some(config.max_resumes)),
            external_jobs: RecordStore::new(Arc::clone(&storage), config.max_external_jobs),
            documents: Arc::new(MemoryDocumentStore::default()),
            llm,
            job_search: JobSearchClient::new(
                config.jsearch_api_key.clone(),
                config.jsearch_base_url.clone(),
                config.jsearch_host.clone(),
                timeout,
            )
            .expect("test HTTP client"),
            auth: AuthGateway::new(
                Arc::new(FakeIdentityProvider),
                storage,
                Duration::from_secs(config.session_ttl_secs),
            ),
            config,
        }
    }
}
