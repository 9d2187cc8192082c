//! Banks the parsing service knows a statement layout for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankId {
    #[default]
    Hdfc,
    Idfc,
    Axis,
    Icici,
}

impl BankId {
    /// Selector order.
    pub const ALL: [BankId; 4] = [BankId::Hdfc, BankId::Idfc, BankId::Axis, BankId::Icici];

    /// Token sent in the `bank` multipart field.
    pub fn as_str(self) -> &'static str {
        match self {
            BankId::Hdfc => "hdfc",
            BankId::Idfc => "idfc",
            BankId::Axis => "axis",
            BankId::Icici => "icici",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BankId::Hdfc => "HDFC Bank",
            BankId::Idfc => "IDFC First Bank",
            BankId::Axis => "Axis Bank",
            BankId::Icici => "ICICI Bank",
        }
    }

    /// Next bank in selector order, wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|b| *b == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|b| *b == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bank '{0}' (expected one of: hdfc, idfc, axis, icici)")]
pub struct UnknownBank(pub String);

impl FromStr for BankId {
    type Err = UnknownBank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        BankId::ALL
            .into_iter()
            .find(|b| b.as_str() == token)
            .ok_or_else(|| UnknownBank(s.to_string()))
    }
}
