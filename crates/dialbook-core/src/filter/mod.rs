mod query;

use crate::domain::CanonicalContact;

pub use query::ContactQuery;

/// Returns the contacts matching `query`, keeping their relative order.
///
/// A contact matches when its name contains the query, when one of its
/// numbers contains the query's digits, or when its numbers joined by a
/// space contain the query text. A blank query returns every contact.
pub fn filter_contacts<'a, I>(contacts: I, query: &str) -> Vec<&'a CanonicalContact>
where
    I: IntoIterator<Item = &'a CanonicalContact>,
{
    let query = ContactQuery::new(query);
    contacts
        .into_iter()
        .filter(|contact| query.matches(contact))
        .collect()
}
