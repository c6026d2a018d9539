//! Analytics dashboard embedded in the worker process.

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::error;

use catclip_analytics::PerformanceStore;
use catclip_api::{ApiConfig, AppState};

use crate::error::{WorkerError, WorkerResult};

/// A running dashboard serving the pipeline's store.
pub struct Dashboard {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    failed: Arc<Notify>,
    task: JoinHandle<WorkerResult<()>>,
}

impl Dashboard {
    /// Bind the listener and start serving in the background.
    ///
    /// A bind failure (port in use, bad host) is returned here, before any
    /// task is spawned.
    pub async fn start(
        config: ApiConfig,
        store: Arc<PerformanceStore>,
        metrics_handle: Option<PrometheusHandle>,
    ) -> WorkerResult<Self> {
        let listener = catclip_api::bind(&config).await?;
        let addr = listener.local_addr()?;

        let (shutdown, mut rx) = watch::channel(false);
        let failed = Arc::new(Notify::new());
        let on_failure = Arc::clone(&failed);
        let state = AppState::new(config, store);

        let task = tokio::spawn(async move {
            let stop = async move {
                let _ = rx.changed().await;
            };
            let result = catclip_api::serve_on(listener, state, metrics_handle, stop).await;
            if let Err(e) = &result {
                error!("Dashboard stopped: {}", e);
                on_failure.notify_one();
            }
            result.map_err(WorkerError::from)
        });

        Ok(Self {
            addr,
            shutdown,
            failed,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Resolves once the server has exited with an error.
    pub async fn failed(&self) {
        self.failed.notified().await;
    }

    /// Request graceful shutdown and wait for the server to exit.
    pub async fn stop(self) -> WorkerResult<()> {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(WorkerError::dashboard(format!("dashboard task failed: {}", e))),
        }
    }
}
