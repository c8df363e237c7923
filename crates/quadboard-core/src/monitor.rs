//! Background connection monitor.
//!
//! Probes the backend immediately on start and then on a fixed interval.
//! Success flips the connection status to connected, failure to
//! disconnected; there is no backoff, so a flapping connection simply flips
//! status each interval. Probe failures are logged at debug level and never
//! raise a user-facing notification.

use crate::gateway::{BackendGateway, Gateway};
use crate::render::Renderer;
use crate::state::{ConnectionStatus, SharedStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const MSG_CONNECTED: &str = "Connected to backend";
const MSG_UNREACHABLE: &str = "Backend unreachable";

/// Periodic liveness loop over a shared gateway. `gateway` is `None` when
/// the backend is unconfigured, in which case `start` is a no-op.
pub struct ConnectionMonitor<G = BackendGateway> {
    gateway: Option<Arc<G>>,
    store: SharedStore,
    renderer: Arc<dyn Renderer>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl<G> ConnectionMonitor<G>
where
    G: Gateway + Send + Sync + 'static,
{
    pub fn new(
        gateway: Option<Arc<G>>,
        store: SharedStore,
        renderer: Arc<dyn Renderer>,
        interval: Duration,
    ) -> Self {
        Self {
            gateway,
            store,
            renderer,
            interval,
            handle: None,
        }
    }

    /// Begin probing. Any previous loop is stopped first; the first probe
    /// fires immediately.
    pub fn start(&mut self) {
        self.stop();
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let renderer = Arc::clone(&self.renderer);
        let period = self.interval.max(Duration::from_millis(1));
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                probe(gateway.as_ref(), &store, &renderer).await;
            }
        }));
    }

    /// Cancel the probe loop. Safe to call when not started.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Run a single probe outside the loop. Returns whether the backend
    /// answered; `false` when unconfigured.
    pub async fn probe_once(&self) -> bool {
        match &self.gateway {
            Some(gateway) => probe(gateway.as_ref(), &self.store, &self.renderer).await,
            None => false,
        }
    }
}

impl<G> Drop for ConnectionMonitor<G> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn probe<G: Gateway>(
    gateway: &G,
    store: &SharedStore,
    renderer: &Arc<dyn Renderer>,
) -> bool {
    let (status, detail) = match gateway.ping().await {
        Ok(true) => (ConnectionStatus::Connected, MSG_CONNECTED),
        Ok(false) => (ConnectionStatus::Disconnected, MSG_UNREACHABLE),
        Err(err) => {
            tracing::debug!(error = %err, "connection probe failed");
            (ConnectionStatus::Disconnected, MSG_UNREACHABLE)
        }
    };
    store.lock().unwrap().connection = status;
    renderer.connection_changed(status, detail);
    status == ConnectionStatus::Connected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::gateway::NewTaskRequest;
    use crate::render::NullRenderer;
    use crate::state::Store;
    use crate::stats::WeeklyStats;
    use crate::task::{Task, TaskStatus};
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct ScriptedGateway {
        healthy: AtomicBool,
        probes: AtomicUsize,
    }

    impl Gateway for ScriptedGateway {
        async fn load_tasks(&self) -> Result<Vec<Task>, GatewayError> {
            unimplemented!("monitor never loads tasks")
        }
        async fn create_task(&self, _: NewTaskRequest) -> Result<Option<Task>, GatewayError> {
            unimplemented!()
        }
        async fn update_status(
            &self,
            _: &str,
            _: &TaskStatus,
        ) -> Result<Option<Task>, GatewayError> {
            unimplemented!()
        }
        async fn complete_task(&self, _: &str) -> Result<Option<Task>, GatewayError> {
            unimplemented!()
        }
        async fn delete_task(&self, _: &str) -> Result<Value, GatewayError> {
            unimplemented!()
        }
        async fn fetch_weekly_stats(&self) -> Result<Option<WeeklyStats>, GatewayError> {
            unimplemented!()
        }
        async fn request_breakdown(&self, _: &str) -> Result<Value, GatewayError> {
            unimplemented!()
        }
        async fn ping(&self) -> Result<bool, GatewayError> {
            self.probes.fetch_add(1, Ordering::Relaxed);
            if self.healthy.load(Ordering::Relaxed) {
                Ok(true)
            } else {
                Err(GatewayError::RequestFailed {
                    status: 503,
                    body: String::new(),
                })
            }
        }
    }

    fn monitor(
        gateway: Option<Arc<ScriptedGateway>>,
        interval: Duration,
    ) -> (ConnectionMonitor<ScriptedGateway>, SharedStore) {
        let store = Store::shared();
        let monitor = ConnectionMonitor::new(
            gateway,
            Arc::clone(&store),
            Arc::new(NullRenderer),
            interval,
        );
        (monitor, store)
    }

    #[tokio::test]
    async fn start_without_backend_is_noop() {
        let (mut monitor, _store) = monitor(None, Duration::from_secs(30));
        monitor.start();
        assert!(!monitor.is_running());
        assert!(!monitor.probe_once().await);
    }

    #[tokio::test]
    async fn probe_once_flips_status_both_ways() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.healthy.store(true, Ordering::Relaxed);
        let (monitor, store) = monitor(Some(Arc::clone(&gateway)), Duration::from_secs(30));

        assert!(monitor.probe_once().await);
        assert_eq!(
            store.lock().unwrap().connection,
            ConnectionStatus::Connected
        );

        gateway.healthy.store(false, Ordering::Relaxed);
        assert!(!monitor.probe_once().await);
        assert_eq!(
            store.lock().unwrap().connection,
            ConnectionStatus::Disconnected
        );
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (mut monitor, _store) = monitor(Some(gateway), Duration::from_millis(5));
        monitor.stop();
        monitor.start();
        assert!(monitor.is_running());
        monitor.stop();
        monitor.stop();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn interval_loop_probes_repeatedly_until_stopped() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.healthy.store(true, Ordering::Relaxed);
        let (mut monitor, store) = monitor(Some(Arc::clone(&gateway)), Duration::from_millis(5));

        monitor.start();
        tokio::time::sleep(Duration::from_millis(40)).await;
        monitor.stop();

        let seen = gateway.probes.load(Ordering::Relaxed);
        assert!(seen >= 2, "expected repeated probes, saw {seen}");
        assert_eq!(
            store.lock().unwrap().connection,
            ConnectionStatus::Connected
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(gateway.probes.load(Ordering::Relaxed), seen);
    }

    #[tokio::test]
    async fn restart_replaces_previous_loop() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.healthy.store(true, Ordering::Relaxed);
        let (mut monitor, _store) = monitor(Some(Arc::clone(&gateway)), Duration::from_millis(5));

        monitor.start();
        monitor.start();
        assert!(monitor.is_running());
        monitor.stop();
    }
}
