use std::path::PathBuf;

use agdb::{Comparison, DbId, DbKeyOrder, QueryBuilder};
use derive_more::{Deref, Display, From};
use tracing::{debug, warn};

use crate::repository::{
    Error, Result,
    db::{
        CONTACTS, Db, NEXT_UID,
        models::{ContactModel, NAME_KEY, UID_KEY},
    },
};

/// Stable identifier of a contact. Allocated by the store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct ContactId(u64);

impl ContactId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Every editable attribute of a contact.
///
/// Text fields are empty when unset. `emails` keeps one address per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub emails: String,
    pub telegram: String,
    pub github: String,
    pub discord: String,
    pub reddit: String,
    pub pgp_key: String,
    pub photo_path: Option<PathBuf>,
}

impl ContactFields {
    /// Whether the contact has a usable name. Whitespace alone doesn't count.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// The individual addresses stored in `emails`, skipping blank lines.
    pub fn email_list(&self) -> impl Iterator<Item = &str> {
        self.emails
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// A snapshot of a stored contact.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Contact {
    id: ContactId,
    #[deref]
    fields: ContactFields,
}

/// The two columns shown in the contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSummary {
    pub id: ContactId,
    pub name: String,
}

impl Contact {
    pub(crate) fn new(id: ContactId, fields: ContactFields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn into_fields(self) -> ContactFields {
        self.fields
    }

    /// Insert a new contact, allocating its id in the same transaction.
    pub(crate) fn insert(db: &Db, fields: &ContactFields) -> Result<ContactId> {
        if !fields.has_name() {
            return Err(Error::MissingName);
        }

        let id = db.write().transaction_mut(|t| -> Result<ContactId> {
            let uid = t
                .exec(QueryBuilder::select().values(NEXT_UID).ids(NEXT_UID).query())?
                .elements
                .pop()
                .and_then(|mut element| element.values.pop())
                .ok_or(Error::MissingNode(NEXT_UID))?
                .value
                .to_u64()?;

            t.exec_mut(
                QueryBuilder::insert()
                    .values([[(NEXT_UID, uid + 1).into()]])
                    .ids(NEXT_UID)
                    .query(),
            )?;

            let id = ContactId(uid);
            let model = ContactModel::new(id, fields)?;

            let contact_id = t
                .exec_mut(QueryBuilder::insert().element(model).query())?
                .elements
                .first()
                .ok_or(Error::EmptyResult)?
                .id;

            t.exec_mut(
                QueryBuilder::insert()
                    .edges()
                    .from(CONTACTS)
                    .to(contact_id)
                    .query(),
            )?;

            Ok(id)
        })?;

        debug!("Added contact {id}: {}", fields.name);

        Ok(id)
    }

    pub(crate) fn update(db: &Db, id: ContactId, fields: &ContactFields) -> Result<()> {
        if !fields.has_name() {
            return Err(Error::MissingName);
        }

        let updated = db.write().transaction_mut(|t| -> Result<bool> {
            let Some(db_id) = t
                .exec(find_query(id))?
                .elements
                .first()
                .map(|element| element.id)
            else {
                return Ok(false);
            };

            let model = ContactModel::new(id, fields)?.with_db_id(db_id);
            t.exec_mut(QueryBuilder::insert().element(model).query())?;

            Ok(true)
        })?;

        if updated {
            debug!("Updated contact {id}: {}", fields.name);
        } else {
            warn!("Attempted to update contact {id}, which does not exist");
        }

        Ok(())
    }

    pub(crate) fn delete(db: &Db, id: ContactId) -> Result<()> {
        let Some(db_id) = find(db, id)? else {
            warn!("Attempted to delete contact {id}, which does not exist");
            return Ok(());
        };

        db.write()
            .exec_mut(QueryBuilder::remove().ids(db_id).query())?;

        debug!("Removed contact {id}");

        Ok(())
    }

    pub(crate) fn get(db: &Db, id: ContactId) -> Result<Option<Contact>> {
        let models: Vec<ContactModel> = db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<ContactModel>()
                    .search()
                    .from(CONTACTS)
                    .where_()
                    .neighbor()
                    .and()
                    .key(UID_KEY)
                    .value(Comparison::Equal(id.0.into()))
                    .query(),
            )?
            .try_into()?;

        Ok(models.into_iter().next().map(Contact::from))
    }

    pub(crate) fn list_summaries(db: &Db) -> Result<Vec<ContactSummary>> {
        let models: Vec<ContactModel> = db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<ContactModel>()
                    .search()
                    .from(CONTACTS)
                    .order_by(DbKeyOrder::Asc(NAME_KEY.into()))
                    .where_()
                    .neighbor()
                    .query(),
            )?
            .try_into()?;

        Ok(models.into_iter().map(ContactSummary::from).collect())
    }
}

fn find_query(id: ContactId) -> agdb::SearchQuery {
    QueryBuilder::search()
        .from(CONTACTS)
        .where_()
        .neighbor()
        .and()
        .key(UID_KEY)
        .value(Comparison::Equal(id.0.into()))
        .query()
}

/// Resolve a [`ContactId`] to the database element currently holding it.
fn find(db: &Db, id: ContactId) -> Result<Option<DbId>> {
    Ok(db
        .read()
        .exec(find_query(id))?
        .elements
        .first()
        .map(|element| element.id))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_has_name() {
        let mut fields = ContactFields::default();
        assert!(!fields.has_name());

        fields.name = " \t ".into();
        assert!(!fields.has_name());

        fields.name = "Ana".into();
        assert!(fields.has_name());
    }

    #[test]
    fn test_email_list() {
        let fields = ContactFields {
            emails: "ana@example.com\n\n  ana@work.example  \n".into(),
            ..Default::default()
        };

        assert_eq!(
            fields.email_list().collect::<Vec<_>>(),
            vec!["ana@example.com", "ana@work.example"]
        );
    }
}
