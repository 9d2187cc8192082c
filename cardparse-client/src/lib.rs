//! cardparse-client: multipart transport, response interpretation and the
//! submission lifecycle on top of `cardparse-core`.

pub mod controller;
pub mod request;
pub mod response;
pub mod service;
pub mod worker;

pub use controller::{Settlement, Submission, SubmissionController};
pub use request::{BANK_FIELD, FILE_FIELD, ParseRequest};
pub use response::interpret;
pub use service::{DEFAULT_ENDPOINT, HttpParseService, ParseService};
pub use worker::run_worker;
