//! Settings persistence.
//!
//! - [`document`]: the stored settings shape and its defaults
//! - [`store`]: where documents are read from and written to, locally or
//!   through a remote endpoint
//! - [`worker`]: debounced background saving with retry
//! - [`share`]: base64 share codes

pub mod document;
pub mod error;
pub mod share;
pub mod store;
pub mod worker;

pub use document::{StoredSettings, UiSettings};
pub use error::{PersistError, PersistResult};
pub use share::{export_share_code, import_share_code};
pub use store::{LocalFileStore, MemoryStore, RemoteStore, SettingsStore};
pub use worker::{
    PersistHandle, PersistPolicy, PersistWorker, persistence_channel, retry_with_backoff,
};
