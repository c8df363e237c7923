//! Shared command bootstrap: config, store, gateway, engine.

use crate::output::CliRenderer;
use quadboard_core::{
    BackendGateway, Config, PollSettings, Renderer, SharedStore, Store, SyncEngine,
};
use std::sync::Arc;
use std::time::Duration;

pub const CONFIGURE_HINT: &str =
    "API base URL is not configured; run `quadboard config set api.base_url <url>`";

pub struct App {
    pub config: Config,
    pub store: SharedStore,
    pub gateway: Option<Arc<BackendGateway>>,
    pub engine: SyncEngine<Arc<BackendGateway>>,
}

impl App {
    pub fn bootstrap() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_or_default();
        let store = Store::shared();
        let session = store.lock().unwrap().session.clone();

        let gateway = if config.has_api() {
            Some(Arc::new(BackendGateway::from_config(&config, session)?))
        } else {
            None
        };

        let renderer: Arc<dyn Renderer> = Arc::new(CliRenderer);
        let engine = SyncEngine::new(gateway.clone(), Arc::clone(&store), renderer)
            .with_breakdown_poll(PollSettings {
                attempts: config.breakdown.poll_attempts,
                delay: Duration::from_millis(config.breakdown.poll_delay_ms),
            });

        Ok(Self {
            config,
            store,
            gateway,
            engine,
        })
    }

    /// Bail out early with a hint when no backend is configured.
    pub fn require_api(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.engine.is_configured() {
            Ok(())
        } else {
            Err(CONFIGURE_HINT.into())
        }
    }

    /// Sync local state before an operation that targets an existing task.
    pub async fn sync(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.engine.reload_tasks(false).await {
            Ok(())
        } else {
            Err("could not sync with the backend".into())
        }
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.config.monitor.probe_interval_secs)
    }
}
