use std::path::PathBuf;

use agdb::{DbElement, DbId};

use crate::repository::{
    Error, Result,
    contact::{Contact, ContactFields, ContactId, ContactSummary},
};

pub(crate) const UID_KEY: &str = "uid";
pub(crate) const NAME_KEY: &str = "name";

/// Stored form of a contact. Every key is always written, so an update replaces all of them.
#[derive(Debug, Clone, DbElement, PartialEq)]
pub(crate) struct ContactModel {
    db_id: Option<DbId>,
    uid: u64,
    name: String,
    phone: String,
    emails: String,
    telegram: String,
    github: String,
    discord: String,
    reddit: String,
    pgp_key: String,
    /// Empty when the contact has no photo
    photo_path: String,
}

impl ContactModel {
    pub fn new(id: ContactId, fields: &ContactFields) -> Result<Self> {
        let photo_path = match &fields.photo_path {
            Some(path) => path
                .to_str()
                .ok_or_else(|| Error::InvalidPath(path.clone()))?
                .to_string(),
            None => String::new(),
        };

        Ok(Self {
            db_id: None,
            uid: id.get(),
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            emails: fields.emails.clone(),
            telegram: fields.telegram.clone(),
            github: fields.github.clone(),
            discord: fields.discord.clone(),
            reddit: fields.reddit.clone(),
            pgp_key: fields.pgp_key.clone(),
            photo_path,
        })
    }

    /// Target an existing element, turning an insert of this model into an update.
    pub fn with_db_id(mut self, db_id: DbId) -> Self {
        self.db_id = Some(db_id);
        self
    }
}

impl From<ContactModel> for Contact {
    fn from(model: ContactModel) -> Self {
        let photo_path = (!model.photo_path.is_empty()).then(|| PathBuf::from(model.photo_path));

        Contact::new(
            ContactId::from(model.uid),
            ContactFields {
                name: model.name,
                phone: model.phone,
                emails: model.emails,
                telegram: model.telegram,
                github: model.github,
                discord: model.discord,
                reddit: model.reddit,
                pgp_key: model.pgp_key,
                photo_path,
            },
        )
    }
}

impl From<ContactModel> for ContactSummary {
    fn from(model: ContactModel) -> Self {
        Self {
            id: ContactId::from(model.uid),
            name: model.name,
        }
    }
}
