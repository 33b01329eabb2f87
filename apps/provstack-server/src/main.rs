//! Provstack development server.
//!
//! Serves the provisioning façade over JSON/HTTP against the in-memory
//! backend pair. Production deployments embed the façade behind their own
//! RPC layer with a real client factory; this binary exists for local
//! development and conformance testing.
//!
//! # Usage
//!
//! ```text
//! LISTEN=0.0.0.0:9000 LOCAL_MODE=1 provstack-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PROVISIONER_NAME` | `provstack.objectstorage.io` | Registered driver name |
//! | `LISTEN` | `0.0.0.0:9000` | Bind address |
//! | `DEFAULT_REGION` | `default` | Region for issued credentials |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//! | `LOCAL_MODE` | `false` | Serve against the in-memory backend |

mod router;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use provstack_core::mem::MemoryClientFactory;
use provstack_core::{ProvisionerConfig, ProvisioningService};

use crate::router::ProvisionerHttpService;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: ProvisionerHttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ProvisionerConfig::from_env();
    init_tracing(&config.log_level)?;

    if !config.local_mode {
        bail!(
            "no production client factory is linked into this binary; \
             set LOCAL_MODE=1 to serve the in-memory backend"
        );
    }

    let factory = Arc::new(MemoryClientFactory::new());
    let service = Arc::new(ProvisioningService::new(config.clone(), factory));

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid listen address: {}", config.listen))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        listen = %addr,
        provisioner = %config.provisioner_name,
        "provstack server started"
    );

    serve(listener, ProvisionerHttpService::new(service)).await
}
