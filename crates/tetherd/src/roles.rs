//! Per-role daemon loops.
//!
//! Each loop is one task: bounded receive, one state-machine step, at most
//! one send. Sends are best-effort — a failed write is logged and left to
//! the protocol's own retransmission.

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::broadcast;

use tether_core::{Frame, Mirror, Source};

use crate::sensor::{decode_value, Reading};
use crate::transport::FrameSocket;

async fn send_best_effort(socket: &FrameSocket, frame: &Frame) {
    if let Err(e) = socket.send(frame).await {
        tracing::warn!(error = %e, "send failed, leaving recovery to retransmission");
    }
}

pub async fn run_source(
    socket: FrameSocket,
    mut source: Source,
    mut reading: impl Reading,
    receive_timeout: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let startup = source.startup_frame(reading.sample());
    send_best_effort(&socket, &startup).await;

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("source loop shutting down");
                return Ok(());
            }

            inbound = socket.recv_timeout(receive_timeout) => {
                let now = Instant::now();
                let value = reading.sample();
                if let Some(outbound) = source.step(inbound, value, now) {
                    tracing::trace!(seq = %outbound.sequence(), "sending");
                    send_best_effort(&socket, &outbound).await;
                }
            }
        }
    }
}

pub async fn run_mirror(
    socket: FrameSocket,
    mut mirror: Mirror,
    receive_timeout: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let startup = mirror.startup_frame();
    send_best_effort(&socket, &startup).await;

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("mirror loop shutting down");
                return Ok(());
            }

            inbound = socket.recv_timeout(receive_timeout) => {
                let now = Instant::now();
                let before = mirror.value();
                if let Some(outbound) = mirror.step(inbound, now) {
                    send_best_effort(&socket, &outbound).await;
                }
                if mirror.value() != before {
                    tracing::info!(
                        value = decode_value(&mirror.value()),
                        raw = %hex::encode(mirror.value()),
                        "mirror value updated"
                    );
                }
            }
        }
    }
}
