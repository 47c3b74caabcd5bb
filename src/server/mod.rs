pub mod handler;
pub mod listener;
pub mod exporter;
pub mod error;
pub mod manager;

pub type Result<T> = std::result::Result<T, Error>;

use error::Error;
pub use exporter::MetricsExporter;
pub use handler::RequestHandler;
pub use listener::ServerListener;
pub use manager::ServerManager;
