use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use thiserror::Error;

use crate::{
    config::{Cfg, CoreConfig},
    repository::db::Db,
    thumbnail::ImageLoader,
};

mod contact;
mod db;

pub use contact::{Contact, ContactFields, ContactId, ContactSummary};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Internal database error {0}")]
    Internal(#[from] agdb::DbError),
    #[error("Filesystem error {0}")]
    Io(#[from] std::io::Error),
    #[error("A contact must have a name")]
    MissingName,
    #[error("Path '{}' is not valid UTF-8", .0.display())]
    InvalidPath(PathBuf),
    #[error("The database is missing its '{0}' node")]
    MissingNode(&'static str),
    #[error("A successful query returned no elements")]
    EmptyResult,
    #[error("Database model version {found} is newer than the supported version {supported}")]
    UnsupportedModelVersion { found: u64, supported: u64 },
}

/// Central access point for all persistent data.
///
/// The [`Repository`] owns the contact database and the core configuration. Every mutating
/// call is committed before it returns, and every read returns an owned copy, so changes to a
/// returned [`Contact`] are never visible to the store until they are written back.
#[derive(Clone, Debug)]
pub struct Repository {
    db: Db,
    cfg: Cfg,
}

impl Repository {
    /// Open the repository described by the user's configuration file.
    pub fn new() -> crate::Result<Self> {
        Ok(Self::open(CoreConfig::load()?)?)
    }

    /// Open (or create) the database at the configured path and make sure its schema exists.
    pub fn open(cfg: CoreConfig) -> Result<Self> {
        let db = Db::new(cfg.database_path())?;
        let repo = Self {
            db,
            cfg: Arc::new(RwLock::new(cfg)),
        };

        repo.ensure_schema()?;

        Ok(repo)
    }

    /// Create the contact schema if it is absent. Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<()> {
        self.db.init()
    }

    /// Append a new contact and return its freshly allocated id.
    pub fn insert(&self, fields: &ContactFields) -> Result<ContactId> {
        Contact::insert(&self.db, fields)
    }

    /// Overwrite every field of the contact with `id`. Unknown ids are a no-op.
    pub fn update(&self, id: ContactId, fields: &ContactFields) -> Result<()> {
        Contact::update(&self.db, id, fields)
    }

    /// Remove the contact with `id`. Unknown ids are a no-op.
    pub fn delete(&self, id: ContactId) -> Result<()> {
        Contact::delete(&self.db, id)
    }

    pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        Contact::get(&self.db, id)
    }

    /// Every contact's id and name, ordered by name.
    pub fn list_summaries(&self) -> Result<Vec<ContactSummary>> {
        Contact::list_summaries(&self.db)
    }

    /// Write a timestamped copy of the database into `dir` and return its path.
    pub fn backup(&self, dir: &Path) -> Result<PathBuf> {
        self.db.backup(dir)
    }

    /// Directory the database file lives in.
    pub fn database_dir(&self) -> PathBuf {
        self.cfg
            .read()
            .database_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// An [`ImageLoader`] using the configured placeholder image.
    pub fn image_loader(&self) -> ImageLoader {
        ImageLoader::new(self.cfg.read().placeholder_path().clone())
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with an in-memory database and the default
    /// configuration.
    pub(crate) fn mock() -> Self {
        let db = Db::in_memory();
        db.init().unwrap();

        Self {
            db,
            cfg: Arc::new(RwLock::new(CoreConfig::default())),
        }
    }
}
