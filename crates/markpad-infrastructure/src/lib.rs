pub mod config_service;
pub mod document_io;
pub mod notify_watch;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::document_io::TokioDocumentIo;
pub use crate::notify_watch::NotifyWatchBackend;
pub use crate::paths::MarkpadPaths;
