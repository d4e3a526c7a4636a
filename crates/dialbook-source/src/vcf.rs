use crate::error::Result;
use crate::source::{file_permission, ContactStore};
use dialbook_core::{PermissionStatus, RawContactRecord, RawEmail, RawPhoneNumber};
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::warn;

/// Contacts exported as a vCard file.
#[derive(Debug, Clone)]
pub struct VcfFileStore {
    pub path: PathBuf,
}

impl VcfFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContactStore for VcfFileStore {
    fn source_name(&self) -> &'static str {
        "vcf"
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        file_permission(&self.path).await
    }

    async fn fetch_contacts(&self) -> Result<Vec<RawContactRecord>> {
        let data = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse_vcf_logged(&data))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedVcf {
    pub records: Vec<RawContactRecord>,
    pub warnings: Vec<String>,
}

pub(crate) fn parse_vcf_logged(data: &str) -> Vec<RawContactRecord> {
    let parsed = parse_vcf(data);
    for warning in &parsed.warnings {
        warn!(%warning, "vcard");
    }
    parsed.records
}

/// Parses every vCard in `data` into a raw record.
///
/// Cards are never dropped here; a card without `UID` yields a record
/// without an id and is left for the normalizer to reject.
pub fn parse_vcf(data: &str) -> ParsedVcf {
    let mut parsed = ParsedVcf::default();
    let mut current: Option<RawCard> = None;

    for line in unfold_lines(data) {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("BEGIN:VCARD") {
            if let Some(card) = current.take() {
                parsed
                    .warnings
                    .push("nested BEGIN:VCARD encountered".to_string());
                parsed.records.push(card.into_record());
            }
            current = Some(RawCard::default());
            continue;
        }

        if trimmed.eq_ignore_ascii_case("END:VCARD") {
            match current.take() {
                Some(card) => parsed.records.push(card.into_record()),
                None => parsed
                    .warnings
                    .push("END:VCARD without matching BEGIN:VCARD".to_string()),
            }
            continue;
        }

        let Some(card) = current.as_mut() else {
            continue;
        };
        let Some(property) = split_property(trimmed) else {
            continue;
        };
        card.apply(property);
    }

    if let Some(card) = current.take() {
        parsed
            .warnings
            .push("missing END:VCARD at end of file".to_string());
        parsed.records.push(card.into_record());
    }

    parsed
}

#[derive(Default)]
struct RawCard {
    uid: Option<String>,
    apple_uid: Option<String>,
    fn_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phones: Vec<RawPhoneNumber>,
    emails: Vec<RawEmail>,
}

struct Property {
    name: String,
    label: Option<String>,
    value: String,
}

impl RawCard {
    fn apply(&mut self, property: Property) {
        match property.name.as_str() {
            "UID" => set_once(&mut self.uid, unescape_vcard_value(&property.value)),
            "X-ABUID" => set_once(&mut self.apple_uid, unescape_vcard_value(&property.value)),
            "FN" => set_once(&mut self.fn_name, unescape_vcard_value(&property.value)),
            "N" => {
                let parts = split_escaped(&property.value, ';');
                let mut parts = parts.iter().map(|part| unescape_vcard_value(part));
                if let Some(family) = parts.next() {
                    set_once(&mut self.last_name, family);
                }
                if let Some(given) = parts.next() {
                    set_once(&mut self.first_name, given);
                }
            }
            "TEL" => self.phones.push(RawPhoneNumber {
                number: Some(unescape_vcard_value(&property.value).trim().to_string()),
                label: property.label,
            }),
            "EMAIL" => self.emails.push(RawEmail {
                email: Some(unescape_vcard_value(&property.value).trim().to_string()),
                label: property.label,
            }),
            _ => {}
        }
    }

    fn into_record(self) -> RawContactRecord {
        RawContactRecord {
            id: self.uid.or(self.apple_uid),
            name: self.fn_name,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_numbers: self.phones,
            emails: self.emails,
        }
    }
}

fn set_once(slot: &mut Option<String>, value: String) {
    let value = value.trim();
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

fn unfold_lines(input: &str) -> Vec<String> {
    let input = normalize_line_endings(input);
    let mut lines: Vec<String> = Vec::new();
    for line in input.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&line[1..]);
            } else {
                lines.push(line[1..].to_string());
            }
        } else {
            lines.push(line.to_string());
        }
    }
    lines
}

fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn split_property(line: &str) -> Option<Property> {
    let (left, value) = line.split_once(':')?;
    let mut segments = left.split(';');
    let mut name = segments.next()?.trim();
    if let Some((_, ungrouped)) = name.rsplit_once('.') {
        name = ungrouped;
    }
    if name.is_empty() {
        return None;
    }
    Some(Property {
        name: name.to_ascii_uppercase(),
        label: type_label(segments),
        value: value.to_string(),
    })
}

/// First meaningful `TYPE` parameter, accepting both `TYPE=cell` and the
/// bare vCard 2.1 form `;CELL`.
fn type_label<'a>(params: impl Iterator<Item = &'a str>) -> Option<String> {
    params
        .flat_map(|param| {
            let param = param.trim();
            let values = match param.split_once('=') {
                Some((key, values)) if key.trim().eq_ignore_ascii_case("TYPE") => values,
                Some(_) => "",
                None => param,
            };
            values.split(',')
        })
        .map(|value| value.trim().trim_matches('"').to_ascii_lowercase())
        .find(|value| {
            !value.is_empty() && !matches!(value.as_str(), "pref" | "internet" | "voice")
        })
}

fn split_escaped(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in value.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }

        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }

        if ch == separator {
            items.push(current);
            current = String::new();
        } else {
            current.push(ch);
        }
    }

    items.push(current);
    items
}

fn unescape_vcard_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') | Some('N') => out.push('\n'),
                Some('r') | Some('R') => out.push('\n'),
                Some(other) => out.push(other),
                None => break,
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_vcf_basic() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nUID:abc-1\nFN:Jane Doe\nEMAIL:jane@example.com\nTEL:555-1234\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.warnings.is_empty());
        let record = &parsed.records[0];
        assert_eq!(record.id.as_deref(), Some("abc-1"));
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.emails, vec![RawEmail::new("jane@example.com")]);
        assert_eq!(record.phone_numbers, vec![RawPhoneNumber::new("555-1234")]);
    }

    #[test]
    fn parse_vcf_collects_every_number_and_email() {
        let data = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:1\r\nFN:Ana Ruiz\r\nTEL;TYPE=CELL:+34 600 11 22 33\r\nitem1.TEL;type=pref;type=WORK:91 555 00 00\r\nTEL;HOME:555\r\nEMAIL;TYPE=INTERNET,HOME:ana@example.com\r\nEMAIL:ana@work.example\r\nEND:VCARD\r\n";
        let record = &parse_vcf(data).records[0];
        let numbers: Vec<(&str, Option<&str>)> = record
            .phone_numbers
            .iter()
            .map(|p| (p.number.as_deref().unwrap(), p.label.as_deref()))
            .collect();
        assert_eq!(
            numbers,
            vec![
                ("+34 600 11 22 33", Some("cell")),
                ("91 555 00 00", Some("work")),
                ("555", Some("home")),
            ]
        );
        assert_eq!(record.emails.len(), 2);
        assert_eq!(record.emails[0].label.as_deref(), Some("home"));
    }

    #[test]
    fn parse_vcf_reads_structured_name() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nUID:1\nN:Ruiz;Ana;;;\nEND:VCARD\n";
        let record = &parse_vcf(data).records[0];
        assert_eq!(record.name, None);
        assert_eq!(record.first_name.as_deref(), Some("Ana"));
        assert_eq!(record.last_name.as_deref(), Some("Ruiz"));
    }

    #[test]
    fn parse_vcf_unescapes_name_parts() {
        let data = "BEGIN:VCARD\nUID:1\nN:O\\;Brien;Pat\nFN:Pat O\\, Brien\nEND:VCARD\n";
        let record = &parse_vcf(data).records[0];
        assert_eq!(record.last_name.as_deref(), Some("O;Brien"));
        assert_eq!(record.first_name.as_deref(), Some("Pat"));
        assert_eq!(record.name.as_deref(), Some("Pat O, Brien"));
    }

    #[test]
    fn parse_vcf_falls_back_to_apple_uid() {
        let data = "BEGIN:VCARD\nFN:Jane\nX-ABUID:5E1F:ABPerson\nEND:VCARD\n";
        let record = &parse_vcf(data).records[0];
        assert_eq!(record.id.as_deref(), Some("5E1F:ABPerson"));
    }

    #[test]
    fn parse_vcf_keeps_cards_without_uid() {
        let data = "BEGIN:VCARD\nFN:Nobody\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].id, None);
    }

    #[test]
    fn parse_vcf_unfolds_continuation_lines() {
        let data = "BEGIN:VCARD\nUID:1\nFN:Margaret Hamil\n ton\nEND:VCARD\n";
        let record = &parse_vcf(data).records[0];
        assert_eq!(record.name.as_deref(), Some("Margaret Hamilton"));
    }

    #[test]
    fn parse_vcf_handles_cr_only_line_endings() {
        let data = "BEGIN:VCARD\rVERSION:3.0\rUID:1\rFN:Jane Doe\rEMAIL:jane@example.com\rEND:VCARD\r";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn parse_vcf_warns_on_unterminated_card() {
        let data = "BEGIN:VCARD\nUID:1\nFN:Jane\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed
            .warnings
            .iter()
            .any(|warning| warning.contains("missing END:VCARD")));
    }

    #[test]
    fn parse_vcf_ignores_text_outside_cards() {
        let data = "garbage\nEND:VCARD\nBEGIN:VCARD\nUID:1\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[tokio::test]
    async fn vcf_store_reads_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("contacts.vcf");
        std::fs::write(
            &path,
            "BEGIN:VCARD\nUID:1\nFN:A\nEND:VCARD\nBEGIN:VCARD\nUID:2\nFN:B\nEND:VCARD\n",
        )
        .expect("write");

        let store = VcfFileStore::new(&path);
        assert_eq!(
            store.request_permission().await.expect("permission"),
            PermissionStatus::Granted
        );
        let records = store.fetch_contacts().await.expect("fetch");
        assert_eq!(records.len(), 2);
    }
}
