//! Policy Record Search — Binary Entrypoint
//! Loads every configured source once, then serves search over Axum.

use policy_record_search::{
    api::{self, AppState},
    config::ServiceConfig,
    metrics::Metrics,
    store::{start_hot_reload_thread, RecordStore},
};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default, JSON when LOG_FORMAT=json.
/// Uses `try_init` because the deployment runtime may already own a subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("policy_record_search=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        let _ = registry.with(fmt::layer().json()).try_init();
    } else {
        let _ = registry.with(fmt::layer().compact()).try_init();
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ServiceConfig::load_default()?;

    // Recorder first, so the startup load's counters and descriptions land in it.
    let metrics = match Metrics::init(config.sources.len()) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics endpoint disabled");
            None
        }
    };

    // --- Load every source once, before serving ---
    let store = RecordStore::load(config)?;
    start_hot_reload_thread(store.clone());

    let mut router = api::router(AppState::new(store));
    if let Some(m) = metrics {
        router = router.merge(m.router());
    }

    Ok(router.into())
}
