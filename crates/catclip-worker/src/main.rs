//! Content pipeline binary.

use std::sync::Arc;

use tracing::{error, info, warn};

use catclip_analytics::PerformanceStore;
use catclip_api::{metrics as api_metrics, ApiConfig};
use catclip_generation::GenerationConfig;
use catclip_instagram::InstagramConfig;
use catclip_worker::{init_tracing, ContentPipeline, Dashboard, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("rustls crypto provider already installed");
    }

    info!("Starting catclip-worker");

    let generation = match GenerationConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid generation config: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = generation.validate() {
        error!("Environment setup error: {}", e);
        std::process::exit(1);
    }

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);
    info!("Using video provider: {}", generation.provider);

    let pipeline_interval = config.pipeline_interval;
    let dashboard_enabled = config.dashboard_enabled;

    let store = Arc::new(PerformanceStore::new());
    let pipeline = match ContentPipeline::from_config(&generation, InstagramConfig::from_env(), store, config) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to build pipeline: {}", e);
            std::process::exit(1);
        }
    };

    let dashboard = if dashboard_enabled {
        let api_config = ApiConfig::from_env();

        let metrics_handle = if api_config.metrics_enabled {
            match api_metrics::init_metrics() {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!("Prometheus metrics disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        match Dashboard::start(api_config, Arc::clone(pipeline.store()), metrics_handle).await {
            Ok(d) => Some(d),
            Err(e) => {
                error!("Failed to start dashboard: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    {
        let stop = async {
            match &dashboard {
                Some(d) => tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = d.failed() => error!("Dashboard is down, stopping worker"),
                },
                None => shutdown_signal().await,
            }
        };

        match pipeline_interval {
            Some(interval) => {
                info!("Running pipeline every {:?}", interval);
                pipeline.run_every(interval, stop).await;
            }
            None => {
                pipeline.run_once().await;
                if dashboard.is_some() {
                    info!("Pipeline run complete, dashboard keeps serving until CTRL+C");
                    stop.await;
                }
            }
        }
    }

    if let Some(d) = dashboard {
        if let Err(e) = d.stop().await {
            error!("{}", e);
        }
    }

    info!("Worker shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
