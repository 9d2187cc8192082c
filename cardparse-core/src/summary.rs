//! Best-effort typed view over a parsed statement.
//!
//! The service usually answers with:
//!   { "issuer": "HDFC", "last_4_digits": "1234", "due_date": "05/03/2024",
//!     "total_balance": "12500.00",
//!     "transactions": [{"date", "description", "amount", "type"}] }
//!
//! Nothing here is validated; fields that are missing or shaped differently
//! come back as `None` and the raw dump stays the source of truth.

use serde::Serialize;
use serde_json::Value;

use crate::state::ParsedResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    Debit,
    Credit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTransaction {
    pub date: Option<String>,
    pub description: Option<String>,
    /// Amounts arrive as strings ("1,299.00") or numbers.
    pub amount: Option<f64>,
    pub kind: Option<EntryKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementSummary {
    pub issuer: Option<String>,
    pub last_4_digits: Option<String>,
    pub due_date: Option<String>,
    pub total_balance: Option<f64>,
    pub transactions: Vec<SummaryTransaction>,
}

impl StatementSummary {
    /// Returns `None` when the payload has none of the usual statement keys.
    pub fn from_result(result: &ParsedResult) -> Option<Self> {
        let obj = result.value().as_object()?;

        let known = ["issuer", "last_4_digits", "due_date", "total_balance", "transactions"];
        if !known.iter().any(|k| obj.contains_key(*k)) {
            return None;
        }

        let transactions = obj
            .get("transactions")
            .and_then(|t| t.as_array())
            .map(|rows| rows.iter().filter_map(transaction_from).collect())
            .unwrap_or_default();

        Some(Self {
            issuer: obj.get("issuer").and_then(text),
            last_4_digits: obj.get("last_4_digits").and_then(text),
            due_date: obj.get("due_date").and_then(text),
            total_balance: obj.get("total_balance").and_then(number),
            transactions,
        })
    }

    pub fn debit_total(&self) -> f64 {
        self.sum_kind(EntryKind::Debit)
    }

    pub fn credit_total(&self) -> f64 {
        self.sum_kind(EntryKind::Credit)
    }

    fn sum_kind(&self, kind: EntryKind) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.kind == Some(kind))
            .filter_map(|t| t.amount)
            .sum()
    }
}

fn transaction_from(row: &Value) -> Option<SummaryTransaction> {
    let obj = row.as_object()?;
    let kind = obj
        .get("type")
        .and_then(|v| v.as_str())
        .and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
            "debit" | "dr" => Some(EntryKind::Debit),
            "credit" | "cr" => Some(EntryKind::Credit),
            _ => None,
        });

    Some(SummaryTransaction {
        date: obj.get("date").and_then(text),
        description: obj.get("description").and_then(text),
        amount: obj.get("amount").and_then(number),
        kind,
    })
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_from_usual_shape() {
        let result = ParsedResult::new(json!({
            "issuer": "AXIS",
            "last_4_digits": "4321",
            "due_date": "05/03/2024",
            "total_balance": "1,250.50",
            "transactions": [
                {"date": "01/02/2024", "description": "SWIGGY", "amount": "250.50", "type": "Debit"},
                {"date": "02/02/2024", "description": "PAYMENT", "amount": 1000, "type": "Credit"},
                {"date": "03/02/2024", "description": "FUEL", "amount": "1,000.00", "type": "Debit"}
            ]
        }));

        let s = StatementSummary::from_result(&result).unwrap();
        assert_eq!(s.issuer.as_deref(), Some("AXIS"));
        assert_eq!(s.last_4_digits.as_deref(), Some("4321"));
        assert_eq!(s.total_balance, Some(1250.50));
        assert_eq!(s.transactions.len(), 3);
        assert_eq!(s.transactions[1].kind, Some(EntryKind::Credit));
        assert_eq!(s.debit_total(), 1250.50);
        assert_eq!(s.credit_total(), 1000.0);
    }

    #[test]
    fn test_missing_fields_are_none() {
        let result = ParsedResult::new(json!({
            "issuer": "ICICI",
            "last_4_digits": null,
            "transactions": [{"date": "01/02/2024", "amount": "oops"}]
        }));

        let s = StatementSummary::from_result(&result).unwrap();
        assert_eq!(s.last_4_digits, None);
        assert_eq!(s.due_date, None);
        assert_eq!(s.transactions[0].amount, None);
        assert_eq!(s.transactions[0].kind, None);
    }

    #[test]
    fn test_unrelated_payload_has_no_summary() {
        let result = ParsedResult::new(json!({"status": "ok"}));
        assert!(StatementSummary::from_result(&result).is_none());
        assert!(StatementSummary::from_result(&ParsedResult::new(json!([1, 2]))).is_none());
    }
}
