//! Opens the board stored in the local settings file for a single command.
//!
//! Mutating commands run the session with a persistence worker on a
//! current-thread runtime; dropping the session flushes the worker.

use tokio::runtime::Builder;

use crate::config;
use crate::error::StartpageError;
use crate::grid::{Session, SessionOptions};
use crate::persistence::{
    LocalFileStore, PersistPolicy, RemoteStore, SettingsStore, persistence_channel,
};

/// Cell size used to lay out synthetic pointer gestures.
const GESTURE_CELL_SIZE: f64 = 100.0;

/// Viewport width that yields `GESTURE_CELL_SIZE` cells.
fn viewport_width(options: &SessionOptions) -> f64 {
    let cols = options.dims.cols;
    f64::from(cols) * GESTURE_CELL_SIZE + f64::from(cols + 1) * options.gap
}

fn session_options() -> SessionOptions {
    let options = SessionOptions::from_config(config::get_config());
    options.with_viewport_width(viewport_width(&options))
}

/// The configured settings store.
///
/// The local settings file, synced with `persistence.remoteUrl` when set.
pub fn settings_store() -> Box<dyn SettingsStore> {
    let local = LocalFileStore::new(config::settings_path());
    let remote_url = config::get_config().persistence.remote_url.trim();
    if remote_url.is_empty() {
        Box::new(local)
    } else {
        Box::new(RemoteStore::new(remote_url, local))
    }
}

/// Loads the board without saving anything back.
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be read.
pub fn open() -> Result<Session, StartpageError> {
    let settings = settings_store().load_or_default()?;
    Ok(Session::restore(settings, session_options()))
}

/// Loads the board, runs `f` on it and persists every change it makes.
///
/// # Errors
///
/// Returns the error from `f`, a load error, or an error if changes were
/// made but could not be saved.
pub fn edit<T, F>(f: F) -> Result<T, StartpageError>
where F: FnOnce(&mut Session) -> Result<T, StartpageError> {
    let store = settings_store();
    let settings = store.load_or_default()?;
    let policy = PersistPolicy::from(&config::get_config().persistence);
    let runtime = Builder::new_current_thread().enable_time().build()?;

    runtime.block_on(async move {
        let (handle, worker) = persistence_channel(store, policy);
        let worker = tokio::spawn(worker.run());

        let mut session = Session::restore(settings, session_options()).with_persistence(handle);
        let before = session.snapshot();
        let result = f(&mut session);
        let changed = session.snapshot() != before;
        drop(session);

        let saved = worker.await.map_err(|err| StartpageError::CommandError(err.to_string()))?;
        if result.is_ok() && changed && saved == 0 {
            return Err(StartpageError::PersistError(format!(
                "changes could not be written to {}",
                config::settings_path().display()
            )));
        }
        result
    })
}
