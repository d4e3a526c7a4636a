use crate::domain::PermissionStatus;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("contact id is required")]
    MissingId,
    #[error("duplicate contact id: {0}")]
    DuplicateId(String),
    #[error("contact not found: {0}")]
    UnknownContact(String),
    #[error("contacts permission {0}")]
    PermissionDenied(PermissionStatus),
}
