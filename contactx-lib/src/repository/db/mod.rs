use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use agdb::{DbAny, QueryBuilder};
use derive_more::Deref;
use parking_lot::RwLock;
use tracing::debug;

use crate::repository::{
    Error, Result,
    db::models::{CURRENT_MODEL_VERSION, ModelVersion},
};

pub(crate) mod models;

/// Root node every contact is linked from
pub(crate) const CONTACTS: &str = "contacts";
/// Root node linking to the [`ModelVersion`] element
pub(crate) const MODEL_VERSION: &str = "model_version";
/// Node holding the id the next inserted contact will receive
pub(crate) const NEXT_UID: &str = "next_uid";

const FIRST_UID: u64 = 1;

#[derive(Debug, Clone, Deref)]
pub(crate) struct Db {
    #[deref]
    db: Arc<RwLock<DbAny>>,
}

impl Db {
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let path_str = path
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.into()))?;

        Ok(Self {
            db: Arc::new(RwLock::new(DbAny::new_file(path_str)?)),
        })
    }

    /// Create the root nodes and record the model version. Existing data is left untouched.
    pub fn init(&self) -> Result<()> {
        let alias_count = self
            .db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            self.db.write().transaction_mut(|t| -> Result<()> {
                t.exec_mut(
                    QueryBuilder::insert()
                        .nodes()
                        .aliases([CONTACTS, MODEL_VERSION, NEXT_UID])
                        .query(),
                )?;

                // Ids are handed out from this counter and never decremented, so a deleted
                // contact's id is never given to another one.
                t.exec_mut(
                    QueryBuilder::insert()
                        .values([[(NEXT_UID, FIRST_UID).into()]])
                        .ids(NEXT_UID)
                        .query(),
                )?;

                Ok(())
            })?;

            debug!("Created contact schema");
        }

        // Fetch the current model version (if any)
        let versions: Vec<ModelVersion> = self
            .db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<ModelVersion>()
                    .search()
                    .from(MODEL_VERSION)
                    .where_()
                    .neighbor()
                    .query(),
            )?
            .try_into()?;

        match versions.first() {
            Some(mv) if mv.version() > CURRENT_MODEL_VERSION => {
                Err(Error::UnsupportedModelVersion {
                    found: mv.version(),
                    supported: CURRENT_MODEL_VERSION,
                })
            }
            Some(_) => Ok(()),
            None => self.db.write().transaction_mut(|t| -> Result<()> {
                let model_version_id = t
                    .exec_mut(
                        QueryBuilder::insert()
                            .element(ModelVersion::default())
                            .query(),
                    )?
                    .elements
                    .first()
                    .ok_or(Error::EmptyResult)?
                    .id;

                t.exec_mut(
                    QueryBuilder::insert()
                        .edges()
                        .from(MODEL_VERSION)
                        .to(model_version_id)
                        .query(),
                )?;

                Ok(())
            }),
        }
    }

    /// Perform a backup of the database into `dir`
    pub fn backup(&self, dir: &Path) -> Result<PathBuf> {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = dir.join(format!("contacts-{timestamp}.db.bak"));
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.clone()))?;

        self.db.write().backup(path_str)?;

        debug!("Backed up database to {}", path.display());

        Ok(path)
    }

    /// Create a memory backed database for use in tests
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self {
            db: Arc::new(RwLock::new(DbAny::new_memory("contacts").unwrap())),
        }
    }
}
