use crate::docker::DockerError;
use crate::routing::RoutingError;
use crate::settings::SettingsError;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    ConfigError(SettingsError),
    IoError(std::io::Error),
    DockerError(DockerError),
    RoutingError(RoutingError),
    MetricsError(prometheus::Error),
}

impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Error::ConfigError(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<DockerError> for Error {
    fn from(err: DockerError) -> Self {
        Error::DockerError(err)
    }
}

impl From<RoutingError> for Error {
    fn from(err: RoutingError) -> Self {
        Error::RoutingError(err)
    }
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::MetricsError(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigError(e) => write!(f, "Config Error: {}", e),
            Error::IoError(e) => write!(f, "IO Error: {}", e),
            Error::DockerError(e) => write!(f, "Docker Error: {}", e),
            Error::RoutingError(e) => write!(f, "Routing Error: {}", e),
            Error::MetricsError(e) => write!(f, "Metrics Error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigError(e) => Some(e),
            Error::IoError(e) => Some(e),
            Error::DockerError(e) => Some(e),
            Error::RoutingError(e) => Some(e),
            Error::MetricsError(e) => Some(e),
        }
    }
}
