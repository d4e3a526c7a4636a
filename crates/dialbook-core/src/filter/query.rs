use crate::domain::{phone_contains_digits, phone_digits, CanonicalContact};

/// A prepared search query: trimmed, lower-cased, with its digits extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    text: String,
    digits: String,
}

impl ContactQuery {
    pub fn new(input: &str) -> Self {
        let text = input.trim().to_lowercase();
        let digits = phone_digits(&text);
        Self { text, digits }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// An empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn matches(&self, contact: &CanonicalContact) -> bool {
        if self.is_empty() {
            return true;
        }
        self.matches_name(contact) || self.matches_phones(contact)
    }

    fn matches_name(&self, contact: &CanonicalContact) -> bool {
        !contact.name.is_empty() && contact.name.to_lowercase().contains(&self.text)
    }

    fn matches_phones(&self, contact: &CanonicalContact) -> bool {
        if contact
            .phones
            .iter()
            .any(|phone| phone_contains_digits(phone, &self.digits))
        {
            return true;
        }
        contact.phones.join(" ").to_lowercase().contains(&self.text)
    }
}
