// Server loop module
// Accepts connections until a shutdown signal, then drains in-flight work

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Longest wait for in-flight connections after the listener closes
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Interval between active connection checks while draining
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop until `signals` requests shutdown
///
/// Must run inside a `LocalSet`; connections are spawned with `spawn_local`.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = signals.shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let drained = drain_connections(&active_connections, SHUTDOWN_GRACE).await;
    if drained {
        logger::log_info("All connections closed, exiting");
    } else {
        logger::log_warning(&format!(
            "Grace period of {}s elapsed with {} connection(s) still open, exiting",
            SHUTDOWN_GRACE.as_secs(),
            active_connections.load(Ordering::SeqCst)
        ));
    }
    Ok(())
}

/// Wait until no connection is active; false when `grace` ran out first
async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + grace;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
    true
}
