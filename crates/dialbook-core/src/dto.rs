use crate::domain::{CanonicalContact, ContactId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactListItemDto {
    pub id: ContactId,
    pub name: String,
    pub initials: String,
    pub primary_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetailDto {
    pub id: ContactId,
    pub name: String,
    pub initials: String,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
}

impl From<&CanonicalContact> for ContactListItemDto {
    fn from(contact: &CanonicalContact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            initials: contact.initials(),
            primary_phone: contact.primary_phone().map(str::to_string),
        }
    }
}

impl From<&CanonicalContact> for ContactDetailDto {
    fn from(contact: &CanonicalContact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            initials: contact.initials(),
            phones: contact.phones.clone(),
            emails: contact.emails.clone(),
        }
    }
}
