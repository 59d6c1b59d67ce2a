//! Scrape engine: streaming transport, incremental decoding and CSV export.
mod decode;
mod endpoints;
mod engine;
mod export;
mod persist;
mod transport;
mod types;

pub use decode::StreamDecoder;
pub use endpoints::ServerEndpoints;
pub use engine::{EngineConfig, EngineHandle, EngineStopped};
pub use export::{ExportError, ExportSettings, Exporter, ReqwestExporter, DEFAULT_CSV_FILENAME};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use transport::{
    ChannelEventSink, EventSink, ReqwestTransport, ScrapeTransport, TransportSettings,
};
pub use types::{EngineEvent, FailureKind, StreamSummary, TransportError};
