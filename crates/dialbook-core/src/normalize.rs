use crate::domain::{CanonicalContact, ContactId, RawContactRecord};
use crate::error::CoreError;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the raw input.
    pub index: usize,
    pub reason: CoreError,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub contacts: Vec<CanonicalContact>,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub loaded: usize,
    pub skipped: usize,
}

impl NormalizeReport {
    pub fn summary(&self) -> NormalizeSummary {
        NormalizeSummary {
            loaded: self.contacts.len(),
            skipped: self.skipped.len(),
        }
    }
}

pub fn normalize(records: &[RawContactRecord]) -> Vec<CanonicalContact> {
    normalize_with_report(records).contacts
}

/// Converts raw records into canonical contacts, in input order.
///
/// Records without an id, or repeating an id seen earlier in the batch, are
/// left out and listed in `skipped`.
pub fn normalize_with_report(records: &[RawContactRecord]) -> NormalizeReport {
    let mut report = NormalizeReport {
        contacts: Vec::with_capacity(records.len()),
        skipped: Vec::new(),
    };
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let contact = match normalize_record(record) {
            Ok(contact) => contact,
            Err(reason) => {
                report.skipped.push(SkippedRecord { index, reason });
                continue;
            }
        };
        if !seen.insert(contact.id.as_str().to_string()) {
            report.skipped.push(SkippedRecord {
                index,
                reason: CoreError::DuplicateId(contact.id.to_string()),
            });
            continue;
        }
        report.contacts.push(contact);
    }

    report
}

pub fn normalize_record(record: &RawContactRecord) -> Result<CanonicalContact, CoreError> {
    let id = ContactId::new(record.id.clone().unwrap_or_default())?;
    Ok(CanonicalContact {
        id,
        name: resolve_name(record),
        phones: non_empty(record.phone_numbers.iter().map(|p| p.number.as_deref())),
        emails: non_empty(record.emails.iter().map(|e| e.email.as_deref())),
    })
}

/// `name` when present, else first and last name joined by a space.
pub fn resolve_name(record: &RawContactRecord) -> String {
    if let Some(name) = record.name.as_deref().filter(|name| !name.is_empty()) {
        return name.to_string();
    }

    [record.first_name.as_deref(), record.last_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn non_empty<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize, normalize_with_report, resolve_name};
    use crate::domain::{RawContactRecord, RawEmail, RawPhoneNumber};
    use crate::error::CoreError;

    fn record(id: &str) -> RawContactRecord {
        RawContactRecord {
            id: Some(id.to_string()),
            ..RawContactRecord::default()
        }
    }

    #[test]
    fn name_built_from_first_and_last() {
        let raw = RawContactRecord {
            first_name: Some("Ana".to_string()),
            last_name: Some("Ruiz".to_string()),
            ..record("1")
        };
        assert_eq!(resolve_name(&raw), "Ana Ruiz");
    }

    #[test]
    fn name_with_single_part_has_no_stray_space() {
        let raw = RawContactRecord {
            last_name: Some("Ruiz".to_string()),
            ..record("1")
        };
        assert_eq!(resolve_name(&raw), "Ruiz");

        let raw = RawContactRecord {
            first_name: Some(" Ana ".to_string()),
            last_name: Some(String::new()),
            ..record("1")
        };
        assert_eq!(resolve_name(&raw), "Ana");
    }

    #[test]
    fn empty_name_without_parts_is_empty_string() {
        let raw = RawContactRecord {
            name: Some(String::new()),
            ..record("1")
        };
        assert_eq!(resolve_name(&raw), "");
        assert_eq!(resolve_name(&record("2")), "");
    }

    #[test]
    fn explicit_name_wins_over_parts() {
        let raw = RawContactRecord {
            name: Some("Dr. Ana Ruiz".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: Some("Ruiz".to_string()),
            ..record("1")
        };
        assert_eq!(resolve_name(&raw), "Dr. Ana Ruiz");
    }

    #[test]
    fn phones_and_emails_drop_missing_and_empty_entries() {
        let raw = RawContactRecord {
            phone_numbers: vec![
                RawPhoneNumber::new("555-1234"),
                RawPhoneNumber::default(),
                RawPhoneNumber::new(""),
                RawPhoneNumber::new("555-1234"),
                RawPhoneNumber::new("(91) 555 00 00"),
            ],
            emails: vec![
                RawEmail::new(""),
                RawEmail::default(),
                RawEmail::new("ana@example.com"),
            ],
            ..record("1")
        };
        let contacts = normalize(&[raw]);
        assert_eq!(
            contacts[0].phones,
            vec!["555-1234", "555-1234", "(91) 555 00 00"]
        );
        assert_eq!(contacts[0].emails, vec!["ana@example.com"]);
    }

    #[test]
    fn records_without_entries_are_kept() {
        let contacts = normalize(&[record("1")]);
        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].phones.is_empty());
        assert!(contacts[0].emails.is_empty());
    }

    #[test]
    fn missing_and_duplicate_ids_are_skipped_in_order() {
        let records = vec![
            record("a"),
            RawContactRecord::default(),
            record("b"),
            record("a"),
            record("   "),
            record("c"),
        ];
        let report = normalize_with_report(&records);
        let ids: Vec<&str> = report.contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let skipped: Vec<(usize, CoreError)> = report
            .skipped
            .iter()
            .map(|s| (s.index, s.reason.clone()))
            .collect();
        assert_eq!(
            skipped,
            vec![
                (1, CoreError::MissingId),
                (3, CoreError::DuplicateId("a".to_string())),
                (4, CoreError::MissingId),
            ]
        );
        assert_eq!(report.summary().loaded, 3);
        assert_eq!(report.summary().skipped, 3);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(normalize(&[]).is_empty());
    }
}
