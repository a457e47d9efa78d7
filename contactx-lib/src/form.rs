//! State behind the contact editing form.
//!
//! [`ContactForm`] holds a copy of the contact being edited and decides whether saving
//! inserts a new contact or updates the selected one. Nothing is written to the
//! [`Repository`] until [`ContactForm::save`] or [`ContactForm::confirm_delete`] is called.

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    Repository,
    repository::{self, Contact, ContactFields, ContactId},
    thumbnail::{ImageLoader, Thumbnail},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The 'Name' field is required")]
    NameRequired,
    #[error("No contact is selected")]
    NothingSelected,
    #[error(transparent)]
    Repository(#[from] repository::Error),
}

/// Whether the form describes a contact that doesn't exist yet or an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    New,
    Editing(ContactId),
}

/// Outcome of a successful [`ContactForm::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Inserted(ContactId),
    Updated(ContactId),
}

impl Saved {
    pub fn id(self) -> ContactId {
        match self {
            Saved::Inserted(id) | Saved::Updated(id) => id,
        }
    }
}

/// A pending deletion, waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: ContactId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    mode: Mode,
    /// `photo_path` doubles as the pending photo, only persisted on save
    fields: ContactFields,
    loader: ImageLoader,
    thumbnail: Thumbnail,
}

impl ContactForm {
    /// Create a blank form in [`Mode::New`].
    pub fn new(loader: ImageLoader) -> Self {
        let thumbnail = loader.placeholder();

        Self {
            mode: Mode::New,
            fields: ContactFields::default(),
            loader,
            thumbnail,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    /// Mutable access to the fields for text input. Use [`ContactForm::set_photo`] to change
    /// the photo so the thumbnail follows.
    pub fn fields_mut(&mut self) -> &mut ContactFields {
        &mut self.fields
    }

    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    /// Heading describing what the form is doing.
    pub fn status(&self) -> String {
        match self.mode {
            Mode::New => "New contact".into(),
            Mode::Editing(_) => format!("Editing: {}", self.fields.name),
        }
    }

    /// Replace the form's contents with a stored contact and start editing it.
    pub fn load(&mut self, contact: Contact) {
        self.mode = Mode::Editing(contact.id());
        self.fields = contact.into_fields();
        self.thumbnail = self.loader.load_thumbnail(self.fields.photo_path.as_deref());
    }

    /// Reset to a blank form in [`Mode::New`].
    pub fn clear(&mut self) {
        self.mode = Mode::New;
        self.fields = ContactFields::default();
        self.thumbnail = self.loader.placeholder();
    }

    /// Choose a new photo. It is only stored once the form is saved.
    pub fn set_photo(&mut self, path: PathBuf) {
        self.thumbnail = self.loader.load_thumbnail(Some(&path));
        self.fields.photo_path = Some(path);
    }

    /// Insert or update the contact depending on the current [`Mode`]. A new contact's id is
    /// adopted, so saving again updates it.
    pub fn save(&mut self, repo: &Repository) -> Result<Saved> {
        if !self.fields.has_name() {
            return Err(Error::NameRequired);
        }

        match self.mode {
            Mode::New => {
                let id = repo.insert(&self.fields)?;
                self.mode = Mode::Editing(id);
                Ok(Saved::Inserted(id))
            }
            Mode::Editing(id) => {
                repo.update(id, &self.fields)?;
                Ok(Saved::Updated(id))
            }
        }
    }

    /// Start deleting the selected contact. The returned request has to be confirmed by the
    /// user and passed to [`ContactForm::confirm_delete`].
    pub fn request_delete(&self) -> Result<DeleteRequest> {
        match self.mode {
            Mode::New => Err(Error::NothingSelected),
            Mode::Editing(id) => Ok(DeleteRequest {
                id,
                name: self.fields.name.clone(),
            }),
        }
    }

    /// Delete a confirmed request and reset the form. Fails if the selection changed since the
    /// request was made.
    pub fn confirm_delete(&mut self, repo: &Repository, request: DeleteRequest) -> Result<()> {
        if self.mode != Mode::Editing(request.id) {
            return Err(Error::NothingSelected);
        }

        repo.delete(request.id)?;
        self.clear();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use tempfile::{TempDir, tempdir};

    use super::*;

    fn form() -> (ContactForm, TempDir) {
        let dir = tempdir().unwrap();
        let form = ContactForm::new(ImageLoader::new(dir.path().join("placeholder.png")));
        (form, dir)
    }

    #[test]
    fn test_new_form_is_blank() {
        let (form, _dir) = form();

        assert_eq!(form.mode(), Mode::New);
        assert_eq!(form.fields(), &ContactFields::default());
        assert!(form.thumbnail().is_placeholder());
        assert_eq!(form.status(), "New contact");
    }

    #[test]
    fn test_save_new() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        form.fields_mut().name = "Ana Silva".into();
        form.fields_mut().phone = "123".into();

        let saved = form.save(&repo).unwrap();

        assert_eq!(saved, Saved::Inserted(ContactId::from(1)));
        assert_eq!(form.mode(), Mode::Editing(saved.id()));
        assert_eq!(form.status(), "Editing: Ana Silva");

        let contact = repo.get(saved.id()).unwrap().unwrap();
        assert_eq!(contact.fields(), form.fields());
    }

    #[test]
    fn test_save_twice_updates() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        form.fields_mut().name = "Ana".into();
        let first = form.save(&repo).unwrap();

        form.fields_mut().github = "ana".into();
        let second = form.save(&repo).unwrap();

        assert_eq!(second, Saved::Updated(first.id()));
        assert_eq!(repo.list_summaries().unwrap().len(), 1);
        assert_eq!(repo.get(first.id()).unwrap().unwrap().github, "ana");
    }

    #[test]
    fn test_save_without_name() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        form.fields_mut().phone = "123".into();
        form.fields_mut().emails = "someone@example.com".into();

        assert!(matches!(form.save(&repo), Err(Error::NameRequired)));
        assert_eq!(form.mode(), Mode::New);
        assert!(repo.list_summaries().unwrap().is_empty());
    }

    #[test]
    fn test_edit_existing() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        let id = repo
            .insert(&ContactFields {
                name: "Ana".into(),
                phone: "123".into(),
                ..Default::default()
            })
            .unwrap();

        form.load(repo.get(id).unwrap().unwrap());
        assert_eq!(form.mode(), Mode::Editing(id));

        form.fields_mut().phone = "999".into();

        // Edits aren't visible to the store before saving
        assert_eq!(repo.get(id).unwrap().unwrap().phone, "123");

        assert_eq!(form.save(&repo).unwrap(), Saved::Updated(id));
        assert_eq!(repo.get(id).unwrap().unwrap().phone, "999");
        assert_eq!(repo.list_summaries().unwrap().len(), 1);
    }

    #[test]
    fn test_clearing_name_on_edit_is_rejected() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        let id = repo
            .insert(&ContactFields {
                name: "Ana".into(),
                ..Default::default()
            })
            .unwrap();
        form.load(repo.get(id).unwrap().unwrap());

        form.fields_mut().name.clear();

        assert!(matches!(form.save(&repo), Err(Error::NameRequired)));
        assert_eq!(repo.get(id).unwrap().unwrap().name, "Ana");
        assert_eq!(form.mode(), Mode::Editing(id));
    }

    #[test]
    fn test_clear() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        form.fields_mut().name = "Ana".into();
        form.save(&repo).unwrap();

        form.clear();

        assert_eq!(form.mode(), Mode::New);
        assert_eq!(form.fields(), &ContactFields::default());
        assert!(form.thumbnail().is_placeholder());
    }

    #[test]
    fn test_set_photo() {
        let repo = Repository::mock();
        let (mut form, dir) = form();
        let photo = dir.path().join("ana.png");
        image::RgbaImage::new(300, 300).save(&photo).unwrap();

        form.fields_mut().name = "Ana".into();
        form.set_photo(photo.clone());

        assert!(!form.thumbnail().is_placeholder());
        assert_eq!(form.thumbnail().width(), 150);

        let id = form.save(&repo).unwrap().id();
        assert_eq!(repo.get(id).unwrap().unwrap().photo_path, Some(photo));
    }

    #[test]
    fn test_set_invalid_photo() {
        let (mut form, dir) = form();

        form.set_photo(dir.path().join("missing.jpg"));

        assert!(form.thumbnail().is_placeholder());
        assert_eq!(
            form.fields().photo_path,
            Some(dir.path().join("missing.jpg"))
        );
    }

    #[test]
    fn test_delete_nothing_selected() {
        let (form, _dir) = form();

        assert!(matches!(form.request_delete(), Err(Error::NothingSelected)));
    }

    #[test]
    fn test_delete() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        let id = repo
            .insert(&ContactFields {
                name: "Ana".into(),
                ..Default::default()
            })
            .unwrap();
        repo.insert(&ContactFields {
            name: "Beto".into(),
            ..Default::default()
        })
        .unwrap();

        form.load(repo.get(id).unwrap().unwrap());

        let request = form.request_delete().unwrap();
        assert_eq!(
            request,
            DeleteRequest {
                id,
                name: "Ana".into()
            }
        );

        form.confirm_delete(&repo, request).unwrap();

        assert_eq!(repo.get(id).unwrap(), None);
        assert_eq!(repo.list_summaries().unwrap().len(), 1);
        assert_eq!(form.mode(), Mode::New);
    }

    #[test]
    fn test_stale_delete_request() {
        let repo = Repository::mock();
        let (mut form, _dir) = form();

        let id = repo
            .insert(&ContactFields {
                name: "Ana".into(),
                ..Default::default()
            })
            .unwrap();
        form.load(repo.get(id).unwrap().unwrap());

        let request = form.request_delete().unwrap();
        form.clear();

        assert!(matches!(
            form.confirm_delete(&repo, request),
            Err(Error::NothingSelected)
        ));
        assert!(repo.get(id).unwrap().is_some());
    }
}
