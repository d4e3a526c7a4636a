pub mod domain;
pub mod dto;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod session;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use filter::{filter_contacts, ContactQuery};
pub use normalize::{normalize, normalize_with_report, NormalizeReport, SkippedRecord};
pub use session::{ContactSession, LoadState};
