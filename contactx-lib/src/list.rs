//! State behind the contact list.

use crate::{
    Repository,
    repository::{Contact, ContactId, ContactSummary, Result},
};

/// The rows of the contact list and which one is highlighted.
#[derive(Debug, Clone, Default)]
pub struct ContactList {
    summaries: Vec<ContactSummary>,
    selected: Option<ContactId>,
}

impl ContactList {
    pub fn summaries(&self) -> &[ContactSummary] {
        &self.summaries
    }

    pub fn selected(&self) -> Option<ContactId> {
        self.selected
    }

    /// Re-query the rows. The highlight is dropped if its contact is gone.
    pub fn refresh(&mut self, repo: &Repository) -> Result<()> {
        self.summaries = repo.list_summaries()?;

        if let Some(selected) = self.selected
            && !self.summaries.iter().any(|s| s.id == selected)
        {
            self.selected = None;
        }

        Ok(())
    }

    /// Highlight `id` and fetch the full contact for the form. Returns `None`, clearing the
    /// highlight, if the contact no longer exists.
    pub fn on_selection(&mut self, repo: &Repository, id: ContactId) -> Result<Option<Contact>> {
        let contact = repo.get(id)?;
        self.selected = contact.as_ref().map(Contact::id);
        Ok(contact)
    }

    /// Highlight `id` without fetching anything, e.g. after the form saved a new contact.
    pub fn select(&mut self, id: ContactId) {
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod test {
    use crate::repository::ContactFields;

    use super::*;

    fn add(repo: &Repository, name: &str) -> ContactId {
        repo.insert(&ContactFields {
            name: name.into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_refresh() {
        let repo = Repository::mock();
        let mut list = ContactList::default();

        list.refresh(&repo).unwrap();
        assert!(list.summaries().is_empty());

        add(&repo, "Beto");
        add(&repo, "Ana");
        list.refresh(&repo).unwrap();

        let names: Vec<_> = list.summaries().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Beto"]);
    }

    #[test]
    fn test_on_selection() {
        let repo = Repository::mock();
        let mut list = ContactList::default();

        let id = add(&repo, "Ana");
        list.refresh(&repo).unwrap();

        let contact = list.on_selection(&repo, id).unwrap().unwrap();

        assert_eq!(contact.id(), id);
        assert_eq!(contact.name, "Ana");
        assert_eq!(list.selected(), Some(id));
    }

    #[test]
    fn test_on_selection_vanished() {
        let repo = Repository::mock();
        let mut list = ContactList::default();

        let id = add(&repo, "Ana");
        list.refresh(&repo).unwrap();
        list.select(id);
        repo.delete(id).unwrap();

        assert_eq!(list.on_selection(&repo, id).unwrap(), None);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_refresh_drops_deleted_selection() {
        let repo = Repository::mock();
        let mut list = ContactList::default();

        let ana = add(&repo, "Ana");
        add(&repo, "Beto");
        list.refresh(&repo).unwrap();
        list.on_selection(&repo, ana).unwrap();

        repo.delete(ana).unwrap();
        list.refresh(&repo).unwrap();

        assert_eq!(list.summaries().len(), 1);
        assert_eq!(list.selected(), None);
    }
}
