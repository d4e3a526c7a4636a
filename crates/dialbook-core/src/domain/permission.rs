use crate::domain::raw::RawContactRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of asking the platform store for its contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Granted(Vec<RawContactRecord>),
    Denied,
    Undetermined,
}

impl AccessOutcome {
    pub fn status(&self) -> PermissionStatus {
        match self {
            AccessOutcome::Granted(_) => PermissionStatus::Granted,
            AccessOutcome::Denied => PermissionStatus::Denied,
            AccessOutcome::Undetermined => PermissionStatus::Undetermined,
        }
    }
}
