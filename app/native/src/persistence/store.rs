//! Settings stores.
//!
//! The [`SettingsStore`] trait is what the persistence worker saves
//! through. [`LocalFileStore`] keeps the document as a JSON file; writes go
//! to a sibling temp file first and are renamed into place, so a crash never
//! leaves a half-written document behind. [`RemoteStore`] syncs the document
//! with a remote endpoint and keeps a local file as cache and fallback.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use super::document::StoredSettings;
use super::error::{PersistError, PersistResult};

/// Loads and saves the settings document.
pub trait SettingsStore: Send + Sync {
    /// Loads the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::NotFound`] if nothing has been stored yet,
    /// or another variant if the document cannot be read.
    fn load(&self) -> PersistResult<StoredSettings>;

    /// Replaces the stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn save(&self, settings: &StoredSettings) -> PersistResult<()>;

    /// Loads the stored document, falling back to the starter board when
    /// nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns any error other than [`PersistError::NotFound`].
    fn load_or_default(&self) -> PersistResult<StoredSettings> {
        match self.load() {
            Err(err) if err.is_not_found() => {
                tracing::debug!("no stored settings, using defaults");
                Ok(StoredSettings::default())
            }
            other => other,
        }
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn load(&self) -> PersistResult<StoredSettings> { (**self).load() }

    fn save(&self, settings: &StoredSettings) -> PersistResult<()> { (**self).save(settings) }
}

// ============================================================================
// Local File Store
// ============================================================================

/// Settings stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsStore for LocalFileStore {
    fn load(&self) -> PersistResult<StoredSettings> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(PersistError::NotFound(self.path.clone()));
            }
            Err(err) => return Err(PersistError::io(&self.path, err)),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, settings: &StoredSettings) -> PersistResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| PersistError::io(parent, err))?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|err| PersistError::io(&temp, err))?;
        fs::rename(&temp, &self.path).map_err(|err| PersistError::io(&self.path, err))?;

        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

// ============================================================================
// Remote Store
// ============================================================================

/// Timeout for a single request to the remote endpoint.
const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Key of the single settings record on the remote endpoint.
const REMOTE_SETTINGS_ID: &str = "1";

#[derive(Serialize)]
struct RemoteDocument<'a> {
    data: &'a StoredSettings,
}

/// Settings synced to a remote key-value endpoint.
///
/// The document lives at `<base>/settings/1`, wrapped in a `data` field.
/// Every save is written to the local file first; the local file is also
/// what loads fall back to while the endpoint is unavailable.
///
/// Requests block. The persistence worker calls stores from the blocking
/// pool; other callers must stay off the async runtime.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    endpoint: String,
    local: LocalFileStore,
}

impl RemoteStore {
    #[must_use]
    pub fn new(base_url: &str, local: LocalFileStore) -> Self {
        let endpoint = format!("{}/settings/{REMOTE_SETTINGS_ID}", base_url.trim().trim_end_matches('/'));
        Self { endpoint, local }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str { &self.endpoint }

    #[must_use]
    pub const fn local(&self) -> &LocalFileStore { &self.local }

    /// Fetches the remote document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Http`] if the endpoint cannot be reached,
    /// [`PersistError::Status`] for an error response (404 counts as not
    /// found) and [`PersistError::Parse`] for an unreadable body.
    pub fn fetch(&self) -> PersistResult<StoredSettings> {
        let response = self
            .client()?
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|err| self.http_error(err))?;
        let body = self.check(response)?.text().map_err(|err| self.http_error(err))?;

        // Records are normally wrapped in `data`; a bare document is accepted too.
        let mut value: Value = serde_json::from_str(&body)?;
        let document =
            if value.get("data").is_some_and(Value::is_object) { value["data"].take() } else { value };
        Ok(serde_json::from_value(document)?)
    }

    /// Replaces the remote document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Http`] or [`PersistError::Status`] if the
    /// endpoint does not accept the document.
    pub fn push(&self, settings: &StoredSettings) -> PersistResult<()> {
        let body = serde_json::to_string(&RemoteDocument { data: settings })?;
        let response = self
            .client()?
            .put(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| self.http_error(err))?;
        self.check(response)?;
        Ok(())
    }

    // Built per request: the blocking client owns a runtime that must not
    // be dropped from async code, and the worker drops stores there.
    fn client(&self) -> PersistResult<Client> {
        Client::builder().timeout(REMOTE_TIMEOUT).build().map_err(|err| self.http_error(err))
    }

    fn http_error(&self, source: reqwest::Error) -> PersistError {
        PersistError::Http { url: self.endpoint.clone(), source }
    }

    fn check(&self, response: Response) -> PersistResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(PersistError::Status { url: self.endpoint.clone(), status: status.as_u16() })
        }
    }
}

impl SettingsStore for RemoteStore {
    fn load(&self) -> PersistResult<StoredSettings> {
        match self.fetch() {
            Ok(settings) => {
                if let Err(err) = self.local.save(&settings) {
                    tracing::warn!(error = %err, "failed to cache remote settings locally");
                }
                Ok(settings)
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote settings unavailable, using local copy");
                self.local.load()
            }
        }
    }

    fn save(&self, settings: &StoredSettings) -> PersistResult<()> {
        self.local.save(settings)?;
        match self.push(settings) {
            Ok(()) => tracing::debug!(url = %self.endpoint, "settings synced"),
            Err(err) => tracing::warn!(error = %err, "remote sync failed, settings kept locally"),
        }
        Ok(())
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// Settings kept in memory; clones share the same document.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    settings: Option<StoredSettings>,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A store that already holds `settings`.
    #[must_use]
    pub fn with_settings(settings: StoredSettings) -> Self {
        let store = Self::new();
        store.lock().settings = Some(settings);
        store
    }

    /// The last saved document.
    #[must_use]
    pub fn current(&self) -> Option<StoredSettings> { self.lock().settings.clone() }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize { self.lock().saves }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> PersistResult<StoredSettings> {
        self.lock().settings.clone().ok_or_else(|| PersistError::NotFound(PathBuf::from("memory")))
    }

    fn save(&self, settings: &StoredSettings) -> PersistResult<()> {
        let mut state = self.lock();
        state.settings = Some(settings.clone());
        state.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::JoinHandle;

    use super::*;

    /// Answers one connection per canned `(status, body)` and returns the
    /// raw requests it received.
    fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| {
                    let (mut stream, _) = listener.accept().unwrap();
                    let request = read_request(&mut stream);
                    let reply = format!(
                        "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    stream.write_all(reply.as_bytes()).unwrap();
                    request
                })
                .collect()
        });
        (base, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut reader = BufReader::new(stream);
        let mut request = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().unwrap();
            }
            let end = line == "\r\n" || line.is_empty();
            request.push_str(&line);
            if end {
                break;
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();
        request + &String::from_utf8(body).unwrap()
    }

    fn edited_board() -> StoredSettings {
        let mut settings = StoredSettings::default();
        settings.ui.edit_mode = true;
        settings
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("settings.json"));
        assert!(store.load().unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load_or_default().unwrap(), StoredSettings::default());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("startpage").join("settings.json");
        let store = LocalFileStore::new(&path);

        let mut settings = StoredSettings::default();
        settings.ui.edit_mode = true;
        store.save(&settings).unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = LocalFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistError::Parse(_)));
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap_err().is_not_found());

        store.save(&StoredSettings::empty()).unwrap();
        store.save(&StoredSettings::default()).unwrap();

        assert_eq!(store.save_count(), 2);
        assert_eq!(store.current(), Some(StoredSettings::default()));
    }

    #[test]
    fn test_remote_endpoint_path() {
        let store = RemoteStore::new(" https://api.example.org/v1/ ", LocalFileStore::new("x.json"));
        assert_eq!(store.endpoint(), "https://api.example.org/v1/settings/1");
    }

    #[test]
    fn test_remote_load_unwraps_data_and_caches_locally() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({ "id": "1", "data": edited_board() }).to_string();
        let (base, server) = serve(vec![(200, body)]);
        let store = RemoteStore::new(&base, LocalFileStore::new(dir.path().join("settings.json")));

        assert_eq!(store.load().unwrap(), edited_board());
        assert_eq!(store.local().load().unwrap(), edited_board());

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("GET /settings/1 "));
    }

    #[test]
    fn test_remote_fetch_accepts_bare_document() {
        let body = serde_json::to_string(&edited_board()).unwrap();
        let (base, server) = serve(vec![(200, body)]);
        let store = RemoteStore::new(&base, LocalFileStore::new("unused.json"));

        assert_eq!(store.fetch().unwrap(), edited_board());
        server.join().unwrap();
    }

    #[test]
    fn test_remote_save_writes_local_then_remote() {
        let dir = tempfile::tempdir().unwrap();
        let (base, server) = serve(vec![(200, "{}".to_string())]);
        let store = RemoteStore::new(&base, LocalFileStore::new(dir.path().join("settings.json")));

        store.save(&edited_board()).unwrap();
        assert_eq!(store.local().load().unwrap(), edited_board());

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("PUT /settings/1 "));
        let body = &requests[0][requests[0].find("\r\n\r\n").unwrap() + 4..];
        let sent: Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["data"]["ui"]["editMode"], serde_json::json!(true));
    }

    #[test]
    fn test_remote_errors_fall_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalFileStore::new(dir.path().join("settings.json"));
        local.save(&edited_board()).unwrap();
        let (base, server) = serve(vec![(503, "{}".to_string()), (500, "{}".to_string())]);
        let store = RemoteStore::new(&base, local);

        assert_eq!(store.load().unwrap(), edited_board());

        let mut changed = edited_board();
        changed.ui.edit_mode = false;
        store.save(&changed).unwrap();
        assert_eq!(store.local().load().unwrap(), changed);
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_remote_not_found_is_not_found() {
        let (base, server) = serve(vec![(404, "\"Not found\"".to_string())]);
        let store = RemoteStore::new(&base, LocalFileStore::new("unused.json"));

        assert!(store.fetch().unwrap_err().is_not_found());
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_remote_uses_local_file() {
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let dir = tempfile::tempdir().unwrap();
        let store = RemoteStore::new(
            &format!("http://127.0.0.1:{port}"),
            LocalFileStore::new(dir.path().join("settings.json")),
        );

        assert!(matches!(store.fetch().unwrap_err(), PersistError::Http { .. }));
        assert_eq!(store.load_or_default().unwrap(), StoredSettings::default());
    }
}
