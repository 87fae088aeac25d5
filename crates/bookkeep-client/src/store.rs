//! Session storage.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use arc_swap::ArcSwap;
use bookkeep_common::{id::CompanyId, session::Session};

use crate::{error, Error};

/// Typed storage of the [Session] fields.
///
/// Readers get immutable snapshots; a write replaces the whole snapshot, so no
/// reader can observe a partially applied change such as a half-cleared session.
pub trait SessionStore: Send + Sync {
    /// The current session snapshot.
    fn session(&self) -> Arc<Session>;

    /// Replace the session with the result of `f` applied to the current one.
    ///
    /// The in-memory snapshot is always replaced; an error means only that persisting it failed.
    fn update(&self, f: &dyn Fn(&Session) -> Session) -> Result<(), Error>;

    /// Write any buffered state to its backing storage.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Store both tokens after a login.
    fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), Error> {
        self.update(&|session| session.with_tokens(access_token.into(), refresh_token.into()))
    }

    /// Replace the access token after a refresh.
    fn set_access_token(&self, access_token: &str) -> Result<(), Error> {
        self.update(&|session| Session {
            access_token: Some(access_token.into()),
            ..session.clone()
        })
    }

    /// Select a company, or clear the selection with `None`. Tokens are left untouched.
    fn set_selected_company(&self, company_id: Option<CompanyId>) -> Result<(), Error> {
        self.update(&|session| Session {
            selected_company_id: company_id,
            ..session.clone()
        })
    }

    /// Remove all session fields.
    fn clear(&self) -> Result<(), Error> {
        self.update(&|_| Session::default())
    }
}

/// A session store living only in memory.
#[derive(Default)]
pub struct MemorySessionStore {
    session: ArcSwap<Session>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given session.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: ArcSwap::from_pointee(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn session(&self) -> Arc<Session> {
        self.session.load_full()
    }

    fn update(&self, f: &dyn Fn(&Session) -> Session) -> Result<(), Error> {
        self.session.rcu(|current| f(&**current));
        Ok(())
    }
}

impl std::fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessionStore")
            .field("session", &self.session.load_full())
            .finish()
    }
}

/// A session store persisted as a JSON file, surviving process restarts.
///
/// The file holds a flat map of `accessToken`, `refreshToken` and
/// `selectedCompanyId`; unset fields are absent from the map.
pub struct FileSessionStore {
    path: PathBuf,
    session: ArcSwap<Session>,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open the store at `path`, hydrating the session from it.
    ///
    /// A missing file is an empty session; it is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let session = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Session>(&bytes).map_err(error::codec)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Session::default(),
            Err(err) => return Err(error::storage(err)),
        };

        tracing::debug!(path = %path.display(), ?session, "hydrated session store");

        Ok(Self {
            path,
            session: ArcSwap::from_pointee(session),
            write_lock: Mutex::new(()),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, session: &Session) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(session).map_err(error::codec)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(error::storage)?;
        }

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, bytes).map_err(error::storage)?;
        std::fs::rename(&tmp_path, &self.path).map_err(error::storage)?;

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn session(&self) -> Arc<Session> {
        self.session.load_full()
    }

    fn update(&self, f: &dyn Fn(&Session) -> Session) -> Result<(), Error> {
        // Writers are serialized so the file always ends with the latest snapshot.
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.session.rcu(|current| f(&**current));
        self.persist(&self.session.load())
    }

    fn flush(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.persist(&self.session.load())
    }
}

impl std::fmt::Debug for FileSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSessionStore")
            .field("path", &self.path)
            .field("session", &self.session.load_full())
            .finish()
    }
}
