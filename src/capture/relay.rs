//! The relay engine: lossless, order-preserving forwarding between the two
//! endpoints, with per-chunk capture fan-out.
//!
//! One task per direction, for the lifetime of the session:
//!
//! ```text
//! host app ──▶ proxy endpoint ──▶ [INCOMING task] ──▶ device endpoint ──▶ device
//! host app ◀── proxy endpoint ◀── [OUTGOING task] ◀── device endpoint ◀── device
//! ```
//!
//! Each task blocks only on its source read; the destination write happens
//! before the next read, so chunks within a direction are strictly FIFO. The
//! capture push is non-blocking and happens after the forwarded write — a
//! slow observer can never delay the primary path. The two directions run
//! independently; nothing orders records across directions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use tokio::io::{AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::Notify;
use tokio::task::JoinSet;
use tokio_serial::SerialStream;
use uuid::Uuid;

use crate::endpoint::EndpointPair;
use crate::error_handling::types::RelayError;
use crate::session_management::Session;

use super::sink::{record_channel, RecordSink, RecordStream};
use super::types::{CaptureRecord, Direction, SniffMode};

/// Default length of a forwarding task's read buffer. The transport decides
/// how much each read actually returns; this is only the upper bound.
pub const DEFAULT_READ_BUFFER_LEN: usize = 1024;

/// Immutable configuration for one relay session.
pub struct RelayConfig {
    pub endpoints: EndpointPair,
    pub mode: SniffMode,
    pub read_buffer_len: usize,
}

impl RelayConfig {
    pub fn new(endpoints: EndpointPair, mode: SniffMode) -> Self {
        Self {
            endpoints,
            mode,
            read_buffer_len: DEFAULT_READ_BUFFER_LEN,
        }
    }

    pub fn with_read_buffer_len(mut self, read_buffer_len: usize) -> Self {
        self.read_buffer_len = read_buffer_len;
        self
    }
}

pub struct RelayEngine;

impl RelayEngine {
    /// Spawns both forwarding tasks and returns the running session together
    /// with the consumer side of its observation sink.
    ///
    /// Both directions are forwarded regardless of the sniff mode; the mode
    /// only decides which directions produce capture records.
    pub fn start(config: RelayConfig) -> (Session, RecordStream) {
        let RelayConfig {
            endpoints,
            mode,
            read_buffer_len,
        } = config;
        let EndpointPair {
            device,
            proxy,
            proxy_path,
            proxy_keepalive,
        } = endpoints;

        let session_id = Uuid::new_v4();
        let (sink, stream) = record_channel();

        // Each handle is read by exactly one task and written by exactly one
        // task, so the halves need no locking.
        let (device_read, device_write) = tokio::io::split(device);
        let (proxy_read, proxy_write) = tokio::io::split(proxy);

        let bytes_incoming = Arc::new(AtomicU64::new(0));
        let bytes_outgoing = Arc::new(AtomicU64::new(0));

        let mut tasks = JoinSet::new();
        tasks.spawn(forward(
            proxy_read,
            device_write,
            Direction::Incoming,
            mode.captures(Direction::Incoming),
            sink.clone(),
            Arc::clone(&bytes_incoming),
            read_buffer_len,
            session_id,
        ));
        tasks.spawn(forward(
            device_read,
            proxy_write,
            Direction::Outgoing,
            mode.captures(Direction::Outgoing),
            sink,
            Arc::clone(&bytes_outgoing),
            read_buffer_len,
            session_id,
        ));

        let shutdown = Arc::new(Notify::new());
        let supervisor = tokio::spawn(supervise(tasks, Arc::clone(&shutdown), session_id));
        debug!("[{}] relay started, mode {:?}", session_id, mode);

        let session = Session::new(
            session_id,
            proxy_path,
            supervisor,
            shutdown,
            bytes_incoming,
            bytes_outgoing,
            proxy_keepalive,
        );
        (session, stream)
    }
}

/// Runs both forwarding tasks to completion. As soon as one of them ends —
/// EOF, I/O error or an external stop — the paired task is torn down too:
/// the channel is bidirectional at the physical layer, so one side failing
/// invalidates the pair.
async fn supervise(
    mut tasks: JoinSet<Result<(), RelayError>>,
    shutdown: Arc<Notify>,
    session_id: Uuid,
) -> Result<(), RelayError> {
    let first = tokio::select! {
        res = tasks.join_next() => res,
        _ = shutdown.notified() => {
            debug!("[{}] shutdown signal received", session_id);
            None
        }
    };

    tasks.abort_all();
    while let Some(res) = tasks.join_next().await {
        if let Ok(Err(e)) = res {
            debug!("[{}] paired task ended: {}", session_id, e);
        }
    }
    debug!("[{}] relay torn down", session_id);

    match first {
        None => Ok(()),
        Some(Ok(result)) => result,
        Some(Err(e)) if e.is_cancelled() => Ok(()),
        Some(Err(e)) => Err(RelayError::TaskFailed(e.to_string())),
    }
}

/// One direction's forwarding loop: read whatever is available from the
/// source, write exactly those bytes to the destination, then (if this
/// direction is sniffed) push a copy into the sink. Errors and EOF are
/// terminal; serial lines are not retried.
#[allow(clippy::too_many_arguments)]
async fn forward(
    mut source: ReadHalf<SerialStream>,
    mut dest: WriteHalf<SerialStream>,
    direction: Direction,
    sniffed: bool,
    records: RecordSink,
    bytes_total: Arc<AtomicU64>,
    read_buffer_len: usize,
    session_id: Uuid,
) -> Result<(), RelayError> {
    trace!("[{}] {} task started", session_id, direction);
    let mut buf = vec![0u8; read_buffer_len];
    loop {
        let n = match source.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => break Err(RelayError::EndpointIo(e)),
        };
        if n == 0 {
            trace!("[{}] {} EOF", session_id, direction);
            break Ok(());
        }
        if let Err(e) = dest.write_all(&buf[..n]).await {
            break Err(RelayError::EndpointIo(e));
        }
        bytes_total.fetch_add(n as u64, Ordering::Relaxed);
        if sniffed {
            records.push(CaptureRecord::new(direction, buf[..n].to_vec()));
        }
        let preview = &buf[..std::cmp::min(n, 64)];
        trace!(
            "[{}] relayed {} {} byte(s): {}{}",
            session_id,
            direction,
            n,
            String::from_utf8_lossy(preview),
            if n > 64 { " ..." } else { "" }
        );
    }
}
