//! cardparse-core: form inputs, request states and error kinds for the
//! statement-parser client. No networking lives here.

pub mod bank;
pub mod error;
pub mod file;
pub mod form;
pub mod state;
pub mod summary;

pub use bank::{BankId, UnknownBank};
pub use error::{FALLBACK_MESSAGE, SubmitError, VALIDATION_MESSAGE};
pub use file::{FileError, PDF_MEDIA_TYPE, SelectedFile};
pub use form::FormState;
pub use state::{ParsedResult, RequestState};
pub use summary::{EntryKind, StatementSummary, SummaryTransaction};
