pub mod contact;
pub mod ids;
pub mod permission;
pub mod phone;
pub mod raw;

pub use contact::{initials, CanonicalContact, DEFAULT_NO_NAME_LABEL};
pub use ids::ContactId;
pub use permission::{AccessOutcome, PermissionStatus};
pub use phone::{phone_contains_digits, phone_digits};
pub use raw::{RawContactRecord, RawEmail, RawPhoneNumber};
