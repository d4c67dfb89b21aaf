//! tetherd — tether peer daemon.
//!
//! Runs one protocol role per process: `tetherd source` produces the shared
//! value, `tetherd mirror` converges to it and echoes acknowledgment.

use std::net::SocketAddr;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast;

use tether_core::config::TetherConfig;
use tether_core::{Mirror, PeerId, Source};

mod roles;
mod sensor;
mod transport;

use sensor::CounterReading;
use transport::FrameSocket;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = TetherConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = TetherConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        TetherConfig::default()
    });

    let role = std::env::args().nth(1).unwrap_or_else(|| "source".to_string());

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    let now = Instant::now();

    match role.as_str() {
        "source" => {
            let peer: SocketAddr =
                format!("{}:{}", config.network.peer_host, config.network.mirror_port)
                    .parse()
                    .context("invalid peer address")?;
            let socket = FrameSocket::open(config.network.source_port, peer)
                .await
                .context("failed to bind source socket")?;

            let source = Source::new(StdRng::from_entropy(), &config.timing.source_timing(), now);
            tracing::info!(
                local_id = %source.local_id(),
                port = config.network.source_port,
                peer = %peer,
                "source starting"
            );

            let reading = CounterReading::new(StdRng::from_entropy());
            roles::run_source(
                socket,
                source,
                reading,
                config.timing.source_receive_timeout(),
                shutdown_tx.subscribe(),
            )
            .await
        }

        "mirror" => {
            let peer: SocketAddr =
                format!("{}:{}", config.network.peer_host, config.network.source_port)
                    .parse()
                    .context("invalid peer address")?;
            let socket = FrameSocket::open(config.network.mirror_port, peer)
                .await
                .context("failed to bind mirror socket")?;

            let mut rng = StdRng::from_entropy();
            let local_id = PeerId::generate(&mut rng, &[]);
            let mirror = Mirror::new(local_id, &config.timing.mirror_timing(), now);
            tracing::info!(
                local_id = %mirror.local_id(),
                port = config.network.mirror_port,
                peer = %peer,
                "mirror starting"
            );

            roles::run_mirror(
                socket,
                mirror,
                config.timing.mirror_receive_timeout(),
                shutdown_tx.subscribe(),
            )
            .await
        }

        other => anyhow::bail!("unknown role '{other}' (expected 'source' or 'mirror')"),
    }
}
