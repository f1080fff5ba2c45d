use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_serial::SerialStream;
use uuid::Uuid;

use crate::error_handling::types::RelayError;

/// Per-direction transfer totals for a session, reported at teardown.
#[derive(Debug, Clone, Copy)]
pub struct SessionStats {
    /// Bytes relayed host -> device.
    pub bytes_incoming: u64,
    /// Bytes relayed device -> host.
    pub bytes_outgoing: u64,
    /// Time elapsed since the session started.
    pub duration: Duration,
}

/// A running relay session.
///
/// Created by `RelayEngine::start`; owns no global state, so any number of
/// sessions can coexist in one process. The session is over when either
/// endpoint closes, when an I/O error hits either direction, or when `stop`
/// is called — in every case both forwarding tasks are torn down together.
pub struct Session {
    id: Uuid,
    proxy_path: Option<String>,
    started_at: DateTime<Utc>,
    supervisor: Option<JoinHandle<Result<(), RelayError>>>,
    shutdown: Arc<Notify>,
    bytes_incoming: Arc<AtomicU64>,
    bytes_outgoing: Arc<AtomicU64>,
    /// Keeps the proxy pty's slave side open until the session ends.
    proxy_keepalive: Option<SerialStream>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: Uuid,
        proxy_path: Option<String>,
        supervisor: JoinHandle<Result<(), RelayError>>,
        shutdown: Arc<Notify>,
        bytes_incoming: Arc<AtomicU64>,
        bytes_outgoing: Arc<AtomicU64>,
        proxy_keepalive: Option<SerialStream>,
    ) -> Self {
        Self {
            id,
            proxy_path,
            started_at: Utc::now(),
            supervisor: Some(supervisor),
            shutdown,
            bytes_incoming,
            bytes_outgoing,
            proxy_keepalive,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Path the host application should open instead of the real device.
    /// `None` when the session was built from caller-supplied streams.
    pub fn proxy_path(&self) -> Option<&str> {
        self.proxy_path.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Requests teardown. Both forwarding tasks are unblocked from their
    /// pending reads and exit; `join` observes the result.
    pub fn stop(&self) {
        debug!("[{}] stop requested", self.id);
        self.shutdown.notify_one();
    }

    /// Waits until both forwarding tasks have fully exited and returns the
    /// session totals. The first transport error of the session surfaces
    /// here; a clean EOF or an explicit `stop` joins as success.
    ///
    /// Cancel-safe: a `join` interrupted by select can simply be called
    /// again.
    pub async fn join(&mut self) -> Result<SessionStats, RelayError> {
        let result = match self.supervisor.as_mut() {
            Some(handle) => {
                let joined = handle.await;
                self.supervisor = None;
                self.proxy_keepalive = None;
                match joined {
                    Ok(inner) => inner,
                    Err(e) => Err(RelayError::TaskFailed(e.to_string())),
                }
            }
            None => return Ok(self.stats()),
        };

        let stats = self.stats();
        info!(
            "[{}] session ended: {} byte(s) host->device, {} byte(s) device->host, duration={:?}",
            self.id, stats.bytes_incoming, stats.bytes_outgoing, stats.duration
        );
        result.map(|()| stats)
    }

    /// Current transfer totals; callable while the session is still running.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            bytes_incoming: self.bytes_incoming.load(Ordering::Relaxed),
            bytes_outgoing: self.bytes_outgoing.load(Ordering::Relaxed),
            duration: Utc::now() - self.started_at,
        }
    }
}
