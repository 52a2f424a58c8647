//! Persistence for the single session credential.
//!
//! The backend issues an `access_token` cookie on login. The client keeps
//! that one value here and nothing else: logging out clears the same store
//! the requests read from.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Name of the cookie the backend sets on a successful login.
pub const SESSION_COOKIE: &str = "access_token";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unable to read session file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("unable to write session file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("session store unavailable")]
    Poisoned,
}

pub trait SessionStore: Debug + Send + Sync {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Keeps the token in a plain file so separate CLI invocations share it.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SessionError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        write_private(&self.path, token).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Owner-only on unix, tightening a file that already exists.
#[cfg(unix)]
fn write_private(path: &Path, token: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(token.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, token: &str) -> io::Result<()> {
    fs::write(path, token)
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Pulls the session token out of a `Set-Cookie` header value.
pub fn session_token_from_cookie(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.trim() != SESSION_COOKIE {
        return None;
    }
    let value = value.trim().trim_matches('"');
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_cookie() {
        let header = "access_token=abc.def; HttpOnly; Max-Age=3600; Path=/; SameSite=lax";
        assert_eq!(session_token_from_cookie(header).as_deref(), Some("abc.def"));
    }

    #[test]
    fn parses_quoted_cookie_value() {
        let header = "access_token=\"Bearer xyz\"; Path=/";
        assert_eq!(
            session_token_from_cookie(header).as_deref(),
            Some("Bearer xyz")
        );
    }

    #[test]
    fn ignores_other_cookies() {
        assert!(session_token_from_cookie("theme=dark; Path=/").is_none());
        assert!(session_token_from_cookie("access_token=; Path=/").is_none());
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session"));

        assert_eq!(store.load().expect("load"), None);
        store.save("token-1").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("token-1"));
        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("clearing twice is fine");
    }

    #[cfg(unix)]
    #[test]
    fn file_store_keeps_the_token_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session");
        let mode = |path: &Path| {
            fs::metadata(path).expect("metadata").permissions().mode() & 0o777
        };

        FileSessionStore::new(path.clone()).save("fresh").expect("save");
        assert_eq!(mode(&path), 0o600);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("widen");
        FileSessionStore::new(path.clone()).save("rotated").expect("save");
        assert_eq!(mode(&path), 0o600);
        assert_eq!(fs::read_to_string(&path).expect("read"), "rotated");
    }

    #[test]
    fn memory_store_shares_state_between_clones() {
        let store = MemorySessionStore::default();
        let clone = store.clone();
        store.save("shared").expect("save");
        assert_eq!(clone.load().expect("load").as_deref(), Some("shared"));
    }
}
