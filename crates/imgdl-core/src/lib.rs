pub mod config;
pub mod logging;

pub mod naming;
pub mod orchestrator;
pub mod report;
pub mod transfer;
pub mod transport;

pub use orchestrator::{download_all, download_all_async, RunOptions};
pub use report::{Outcome, Report, StatusRow};
pub use transport::{TlsMode, TransportConfig};
