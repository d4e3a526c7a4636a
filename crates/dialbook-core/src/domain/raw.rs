use serde::{Deserialize, Deserializer, Serialize};

/// A contact exactly as the platform store hands it over.
///
/// Every field is optional. The JSON shape mirrors the one mobile contact
/// APIs return (`firstName`, `phoneNumbers`, ...); unknown fields are ignored
/// and `null` is accepted anywhere, including inside the entry lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContactRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "entries_or_empty")]
    pub phone_numbers: Vec<RawPhoneNumber>,
    #[serde(default, deserialize_with = "entries_or_empty")]
    pub emails: Vec<RawEmail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPhoneNumber {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmail {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl RawPhoneNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            label: None,
        }
    }
}

impl RawEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            label: None,
        }
    }
}

fn entries_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let entries: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default().into_iter().flatten().collect())
}
