//! Outbound multipart payload.

use cardparse_core::{BankId, SelectedFile};
use reqwest::multipart::{Form, Part};

pub const BANK_FIELD: &str = "bank";
pub const FILE_FIELD: &str = "file";

/// Everything sent for one submission: the bank token and the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRequest {
    pub bank: BankId,
    pub file: SelectedFile,
}

impl ParseRequest {
    pub fn new(bank: BankId, file: SelectedFile) -> Self {
        Self { bank, file }
    }

    /// Exactly two parts: `bank` as text and `file` with its original name
    /// and media type.
    pub fn into_form(self) -> reqwest::Result<Form> {
        let file_part = Part::bytes(self.file.bytes)
            .file_name(self.file.file_name)
            .mime_str(&self.file.media_type)?;

        Ok(Form::new()
            .text(BANK_FIELD, self.bank.as_str())
            .part(FILE_FIELD, file_part))
    }
}
