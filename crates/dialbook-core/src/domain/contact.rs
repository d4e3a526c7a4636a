use crate::domain::ids::ContactId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NO_NAME_LABEL: &str = "(no name)";

/// Normalized contact. Built once by the normalizer and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalContact {
    pub id: ContactId,
    pub name: String,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
}

impl CanonicalContact {
    pub fn primary_phone(&self) -> Option<&str> {
        self.phones.first().map(String::as_str)
    }

    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    /// The name, or `fallback` when the contact has none.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.name.is_empty() {
            fallback
        } else {
            &self.name
        }
    }
}

/// Up to two upper-cased initials taken from the first words of `name`;
/// `"?"` when the name is blank.
pub fn initials(name: &str) -> String {
    let out: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if out.is_empty() {
        "?".to_string()
    } else {
        out
    }
}
