pub mod error;
pub mod json;
pub mod macos;
pub mod source;
pub mod vcf;

pub use error::{Result, SourceError};
pub use json::JsonFileStore;
pub use macos::MacosContactsStore;
pub use source::{request_access, ContactStore};
pub use vcf::VcfFileStore;
