//! Form inputs as the user left them, before submission.

use crate::bank::BankId;
use crate::error::SubmitError;
use crate::file::SelectedFile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub bank: BankId,
    pub file: Option<SelectedFile>,
}

impl FormState {
    pub fn new(bank: BankId) -> Self {
        Self { bank, file: None }
    }

    /// Local check run before any request is built.
    ///
    /// `BankId` cannot be empty, so only a missing file fails here; the error
    /// text still names both inputs.
    pub fn validate(&self) -> Result<(BankId, &SelectedFile), SubmitError> {
        match &self.file {
            Some(file) => Ok((self.bank, file)),
            None => Err(SubmitError::Validation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_fails_validation() {
        let form = FormState::new(BankId::Icici);
        assert_eq!(form.validate().unwrap_err(), SubmitError::Validation);
    }

    #[test]
    fn test_complete_form_validates() {
        let mut form = FormState::default();
        form.file = Some(SelectedFile::pdf("a.pdf", b"%PDF".to_vec()));
        let (bank, file) = form.validate().unwrap();
        assert_eq!(bank, BankId::Hdfc);
        assert_eq!(file.file_name, "a.pdf");
    }
}
