//! Application context tying the session, favorites and clock together

use crate::clock::{Clock, SystemClock};
use crate::config::GalleryConfig;
use crate::directory::Directory;
use crate::error::Result;
use crate::favorites::Favorites;
use crate::session::Session;
use crate::storage::{LmdbStorage, Storage};

/// One running gallery: created at startup, torn down with [`Gallery::close`].
pub struct Gallery<S> {
    session: Session<S>,
    clock: Box<dyn Clock>,
}

impl<S: Storage> Gallery<S> {
    /// Built-in directory, real clock
    pub fn open(storage: S) -> Result<Self> {
        Self::with_parts(storage, Directory::builtin(), Box::new(SystemClock))
    }

    pub fn with_parts(storage: S, directory: Directory, clock: Box<dyn Clock>) -> Result<Self> {
        Ok(Self {
            session: Session::restore(storage, directory)?,
            clock,
        })
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn login(&mut self, email: &str) -> Result<bool> {
        self.session.login(email)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()
    }

    /// Favorites as seen by the current actor
    pub fn favorites(&self) -> Favorites<'_, S> {
        Favorites::new(&self.session, self.clock.as_ref())
    }

    pub fn close(self) -> S {
        self.session.into_storage()
    }
}

impl Gallery<LmdbStorage> {
    pub fn from_config(cfg: &GalleryConfig) -> Result<Self> {
        Self::open(LmdbStorage::open(&cfg.data_dir, cfg.map_size)?)
    }
}
