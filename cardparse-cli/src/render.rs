//! Plain-text rendering for the one-shot `parse` command.

use cardparse_core::{EntryKind, ParsedResult, StatementSummary};
use std::fmt::Write;

pub fn render_parsed(result: &ParsedResult, compact: bool) -> String {
    let body = if compact {
        result.render_compact()
    } else {
        result.render_pretty()
    };
    format!("Parsed Data\n\n{body}\n")
}

pub fn render_summary(summary: &StatementSummary) -> String {
    let dash = || "-".to_string();
    let mut s = String::new();

    let _ = writeln!(s, "Issuer:        {}", summary.issuer.clone().unwrap_or_else(dash));
    let _ = writeln!(
        s,
        "Card:          {}",
        summary
            .last_4_digits
            .as_ref()
            .map(|d| format!("XXXX {d}"))
            .unwrap_or_else(dash)
    );
    let _ = writeln!(s, "Due date:      {}", summary.due_date.clone().unwrap_or_else(dash));
    let _ = writeln!(
        s,
        "Total balance: {}",
        summary
            .total_balance
            .map(|b| format!("{b:.2}"))
            .unwrap_or_else(dash)
    );
    let _ = writeln!(
        s,
        "Transactions:  {} (debits {:.2}, credits {:.2})",
        summary.transactions.len(),
        summary.debit_total(),
        summary.credit_total()
    );

    for t in &summary.transactions {
        let kind = match t.kind {
            Some(EntryKind::Debit) => "Dr",
            Some(EntryKind::Credit) => "Cr",
            None => "  ",
        };
        let amount = t.amount.map(|a| format!("{a:>12.2}")).unwrap_or_else(|| format!("{:>12}", "?"));
        let _ = writeln!(
            s,
            "  {:<10} {} {}  {}",
            t.date.as_deref().unwrap_or("?"),
            amount,
            kind,
            t.description.as_deref().unwrap_or("")
        );
    }
    s
}
