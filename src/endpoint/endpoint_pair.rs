//! The two byte-stream handles a session relays between.
//!
//! The *device* endpoint is the real serial line. The *proxy* endpoint is the
//! master side of a pseudo-terminal pair; the slave side's path is what the
//! host application opens instead of the device. Both handles are opened
//! before any forwarding starts, so a session can never come up half-open.

use log::info;
use tokio_serial::{FlowControl, SerialPort, SerialPortBuilderExt, SerialStream};

use crate::error_handling::types::EndpointError;

pub struct EndpointPair {
    pub(crate) device: SerialStream,
    pub(crate) proxy: SerialStream,
    pub(crate) proxy_path: Option<String>,
    /// Slave side of the proxy pty. Held open for the lifetime of the
    /// session so the master never reads EOF while the host application is
    /// detached or reconnecting.
    pub(crate) proxy_keepalive: Option<SerialStream>,
}

impl EndpointPair {
    /// Opens the device port and creates the proxy pseudo-terminal.
    ///
    /// The device is opened with hardware flow control, matching the signal
    /// handling of the tapped line. Any failure here is fatal: no endpoint
    /// leaks, no forwarding task has started yet.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(port: &str, baud_rate: u32) -> Result<Self, EndpointError> {
        let device = tokio_serial::new(port, baud_rate)
            .flow_control(FlowControl::Hardware)
            .open_native_async()
            .map_err(EndpointError::DeviceOpenFailed)?;

        let (proxy, slave) = SerialStream::pair().map_err(EndpointError::ProxyCreationFailed)?;
        let proxy_path = slave.name();

        info!(
            "Endpoints ready: device={} @ {} baud, proxy={}",
            port,
            baud_rate,
            proxy_path.as_deref().unwrap_or("<unnamed>")
        );

        Ok(Self {
            device,
            proxy,
            proxy_path,
            proxy_keepalive: Some(slave),
        })
    }

    /// Builds a pair from two already-open streams. Used by tests and
    /// embedders that bring their own transport; no proxy path is available
    /// in that case.
    pub fn from_streams(device: SerialStream, proxy: SerialStream) -> Self {
        Self {
            device,
            proxy,
            proxy_path: None,
            proxy_keepalive: None,
        }
    }

    /// Path the host application should open instead of the device.
    pub fn proxy_path(&self) -> Option<&str> {
        self.proxy_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_fails_fast_on_bogus_port() {
        let result = EndpointPair::open("/dev/does-not-exist-9999", 115200);
        assert!(matches!(result, Err(EndpointError::DeviceOpenFailed(_))));
    }

    #[tokio::test]
    async fn pty_backed_pair_exposes_a_proxy_path() {
        let (master, slave) = SerialStream::pair().expect("pty pair");
        // Same wiring open() performs for the proxy side.
        let path = slave.name();
        assert!(path.is_some());
        drop((master, slave));
    }

    #[tokio::test]
    async fn from_streams_has_no_proxy_path() {
        let (a, b) = SerialStream::pair().expect("pty pair");
        let pair = EndpointPair::from_streams(a, b);
        assert!(pair.proxy_path().is_none());
    }
}
