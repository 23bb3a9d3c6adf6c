//! Plain-text summaries handed to the text-generation capability as
//! grounding for a question.

use std::fmt::Write;

use hisab_core::{share_percent, title_case, Rupees, Transaction};

use crate::aggregate::AnalysisSnapshot;
use crate::ledger::DebtLedger;

const RETRIEVAL_RECENT: usize = 15;
const DIRECT_RECENT: usize = 10;

pub const NO_DATA: &str = "No expense data available.";

/// Summary for the retrieval prompt. Loans are kept out of the expense and
/// income totals and reported per person instead.
pub fn retrieval_context(transactions: &[Transaction], ledger: &DebtLedger) -> String {
    if transactions.is_empty() {
        return NO_DATA.to_string();
    }

    let mut total_expense = 0i64;
    let mut total_income = 0i64;
    let mut categories: Vec<(String, i64, usize)> = Vec::new();

    for tx in transactions.iter().filter(|t| !t.category.is_loan()) {
        if tx.is_income() {
            total_income = total_income.saturating_add(tx.amount.saturating_abs());
        } else if tx.is_expense() {
            total_expense = total_expense.saturating_add(tx.amount);
            let name = tx.category.name().to_string();
            match categories.iter_mut().find(|(n, _, _)| *n == name) {
                Some((_, amount, count)) => {
                    *amount = amount.saturating_add(tx.amount);
                    *count += 1;
                }
                None => categories.push((name, tx.amount, 1)),
            }
        }
    }
    categories.sort_by(|a, b| b.1.cmp(&a.1));

    let net = total_income - total_expense;
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Total Expenses (excluding loans): {}", Rupees(total_expense));
    let _ = writeln!(out, "Total Income: {}", Rupees(total_income));
    let _ = writeln!(out, "Net Balance (Income - Expenses): {}", Rupees(net));
    let _ = writeln!(out, "Savings Rate: {:.1}%", share_percent(net, total_income));

    let _ = writeln!(out, "\nCategory Breakdown:");
    for (name, amount, count) in &categories {
        let _ = writeln!(out, "  {}: {} ({} transactions)", name, Rupees(*amount), count);
    }

    let balances = ledger.balances(transactions);
    if !balances.is_empty() {
        let _ = writeln!(out, "\nLoan Details by Person:");
        for balance in &balances {
            let _ = writeln!(out, "  {}", balance.context_line());
        }
    }

    let _ = writeln!(out, "\nRecent Transactions:");
    for tx in transactions.iter().take(RETRIEVAL_RECENT) {
        let paid = tx.payer().map(|p| format!(" (paid by {p})")).unwrap_or_default();
        let _ = writeln!(
            out,
            "  {} - {} [{}] on {}{}",
            tx.rupees(),
            tx.item,
            tx.category,
            tx.date.as_deref().unwrap_or("N/A"),
            paid
        );
    }

    out.trim_end().to_string()
}

/// Shorter summary for the direct prompt, built from an existing snapshot.
pub fn direct_summary(snapshot: &AnalysisSnapshot, transactions: &[Transaction]) -> String {
    let mut lines = vec![
        format!("Total Expenses: {}", Rupees(snapshot.total_expense)),
        format!("Total Transactions: {}", transactions.len()),
        format!("Income: {}", Rupees(snapshot.total_income)),
        format!("Net Balance: {}", Rupees(snapshot.net_balance)),
        "Category Breakdown:".to_string(),
    ];
    lines.extend(
        snapshot
            .category_totals
            .iter()
            .map(|c| format!("  - {}: {}", title_case(&c.key), Rupees(c.amount))),
    );
    lines.push("Recent Transactions:".to_string());
    lines.extend(transactions.iter().take(DIRECT_RECENT).map(|tx| {
        format!(
            "  - {} on {} ({}) on {}",
            tx.rupees(),
            tx.item,
            tx.category,
            tx.date.as_deref().unwrap_or("N/A")
        )
    }));
    lines.join("\n")
}
