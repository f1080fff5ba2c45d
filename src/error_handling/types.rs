use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    EmptyPortName,
    UnsupportedBaudRate(u32),
    InvalidColumnCount(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPortName => write!(f, "Serial port name is empty"),
            ConfigError::UnsupportedBaudRate(baud) => {
                write!(f, "Unsupported baud rate: {}", baud)
            }
            ConfigError::InvalidColumnCount(columns) => {
                write!(f, "Invalid display column count: {}", columns)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum EndpointError {
    DeviceOpenFailed(tokio_serial::Error),
    ProxyCreationFailed(tokio_serial::Error),
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::DeviceOpenFailed(e) => write!(f, "Device port open failed: {}", e),
            EndpointError::ProxyCreationFailed(e) => {
                write!(f, "Proxy endpoint creation failed: {}", e)
            }
        }
    }
}

impl std::error::Error for EndpointError {}

#[derive(Debug)]
pub enum RelayError {
    EndpointIo(std::io::Error),
    TaskFailed(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::EndpointIo(e) => write!(f, "Endpoint I/O error: {}", e),
            RelayError::TaskFailed(e) => write!(f, "Forwarding task failed: {}", e),
        }
    }
}

impl std::error::Error for RelayError {}

#[derive(Debug)]
pub enum StorageError {
    CreateFailed,
    WriteFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::CreateFailed => write!(f, "Capture log creation failed"),
            StorageError::WriteFailed => write!(f, "Capture log write failed"),
        }
    }
}

impl std::error::Error for StorageError {}
