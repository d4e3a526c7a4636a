use crate::domain::{AccessOutcome, CanonicalContact, ContactId, PermissionStatus};
use crate::error::CoreError;
use crate::filter::ContactQuery;
use crate::normalize::{normalize_with_report, NormalizeReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    Denied(PermissionStatus),
}

/// State owned by one browsing session: the loaded contacts, the current
/// query and the selected contact.
///
/// The contact list only changes through [`ContactSession::load`], which
/// replaces it wholesale. The filtered view is recomputed when the list or
/// the query changes and cached as positions into the list.
#[derive(Debug, Clone)]
pub struct ContactSession {
    state: LoadState,
    contacts: Vec<CanonicalContact>,
    query: String,
    matches: Vec<usize>,
    selected: Option<ContactId>,
}

impl Default for ContactSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactSession {
    pub fn new() -> Self {
        Self {
            state: LoadState::NotLoaded,
            contacts: Vec::new(),
            query: String::new(),
            matches: Vec::new(),
            selected: None,
        }
    }

    pub fn load(&mut self, outcome: AccessOutcome) -> NormalizeReport {
        let report = match outcome {
            AccessOutcome::Granted(records) => {
                let report = normalize_with_report(&records);
                self.state = LoadState::Loaded;
                self.contacts = report.contacts.clone();
                report
            }
            other => {
                self.state = LoadState::Denied(other.status());
                self.contacts = Vec::new();
                NormalizeReport::default()
            }
        };

        if let Some(id) = &self.selected {
            if self.position(id.as_str()).is_none() {
                self.selected = None;
            }
        }
        self.refresh_matches();
        report
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refresh_matches();
    }

    /// Selects the contact with `id`, or clears the selection with `None`.
    pub fn set_selected(&mut self, id: Option<&str>) -> Result<(), CoreError> {
        let Some(id) = id else {
            self.selected = None;
            return Ok(());
        };
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::UnknownContact(id.to_string()))?;
        self.selected = Some(self.contacts[index].id.clone());
        Ok(())
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_denied(&self) -> bool {
        matches!(self.state, LoadState::Denied(_))
    }

    /// Fails with `PermissionDenied` when the store refused access.
    pub fn ensure_granted(&self) -> Result<(), CoreError> {
        match self.state {
            LoadState::Denied(status) => Err(CoreError::PermissionDenied(status)),
            LoadState::NotLoaded | LoadState::Loaded => Ok(()),
        }
    }

    pub fn contacts(&self) -> &[CanonicalContact] {
        &self.contacts
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filtered(&self) -> impl Iterator<Item = &CanonicalContact> + '_ {
        self.matches.iter().map(move |&index| &self.contacts[index])
    }

    pub fn filtered_len(&self) -> usize {
        self.matches.len()
    }

    pub fn selected(&self) -> Option<&CanonicalContact> {
        let id = self.selected.as_ref()?;
        self.position(id.as_str()).map(|index| &self.contacts[index])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.contacts
            .iter()
            .position(|contact| contact.id.as_str() == id)
    }

    fn refresh_matches(&mut self) {
        let query = ContactQuery::new(&self.query);
        self.matches = self
            .contacts
            .iter()
            .enumerate()
            .filter(|(_, contact)| query.matches(contact))
            .map(|(index, _)| index)
            .collect();
    }
}
