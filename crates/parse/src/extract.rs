use hisab_core::{re, title_case, Transaction};
use serde::Serialize;
use tracing::debug;

use crate::cascade::PatternCascade;
use crate::ParseError;

pub const NO_EXPENSES_REPLY: &str = "No expenses found. Try: '500 on biryani, 400 on grocery'";

re!(re_segment_split, r"(?i),|\band\b");
re!(re_first_number, r"\d+");

/// Transactions pulled out of one message plus the acknowledgment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub transactions: Vec<Transaction>,
    pub reply: String,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// `Added Rs.<n> → <Category> (<remarks>)`, one line per transaction.
/// Income is shown as its absolute value.
pub fn acknowledge(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return NO_EXPENSES_REPLY.to_string();
    }
    transactions
        .iter()
        .map(|tx| format!("Added {} → {} ({})", tx.rupees().abs(), tx.category, tx.remarks))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Default)]
pub struct TransactionExtractor {
    cascade: PatternCascade,
}

impl TransactionExtractor {
    pub fn new(cascade: PatternCascade) -> Self {
        Self { cascade }
    }

    pub fn cascade(&self) -> &PatternCascade {
        &self.cascade
    }

    /// Splits `text` on commas and the word "and", runs every segment
    /// through the cascade and keeps the matches in input order.
    pub fn parse(&self, text: &str) -> Extraction {
        let transactions: Vec<Transaction> = re_segment_split()
            .split(text.trim())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|segment| match self.cascade.match_segment(segment) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    debug!(error = %e, "Dropping segment");
                    None
                }
            })
            .collect();

        let reply = acknowledge(&transactions);
        Extraction { transactions, reply }
    }

    /// Last-resort single transaction: the first integer is the amount and
    /// the remaining text, or `"expense"` when nothing remains, is the item.
    pub fn simple_extract(&self, text: &str) -> Result<Transaction, ParseError> {
        let number = re_first_number()
            .find(text)
            .ok_or(ParseError::NoTransactionsFound)?;
        let amount: i64 = number
            .as_str()
            .parse()
            .map_err(|_| ParseError::NoTransactionsFound)?;

        let rest = re_first_number().replace_all(text, "");
        let rest = rest.trim();
        let raw_item = if rest.is_empty() { "expense" } else { rest };

        let item = self.cascade.normalizer().normalize(raw_item);
        let category = self.cascade.categorizer().categorize(&item);
        Ok(Transaction::new(amount, &item.to_lowercase(), category, &title_case(&item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisab_core::Category;

    #[test]
    fn splits_on_commas_and_and() {
        let ex = TransactionExtractor::default().parse("500 on biryani, 400 on grocery");
        assert_eq!(ex.transactions.len(), 2);
        assert_eq!(ex.transactions[0].amount, 500);
        assert_eq!(ex.transactions[0].item, "biryani");
        assert_eq!(ex.transactions[0].category, Category::Food);
        assert_eq!(ex.transactions[1].amount, 400);
        assert_eq!(ex.transactions[1].item, "grocery");
        assert_eq!(ex.transactions[1].category, Category::Groceries);

        let ex = TransactionExtractor::default().parse("100 chiya AND 50 momo");
        assert_eq!(ex.transactions.len(), 2);
    }

    #[test]
    fn acknowledgment_lines() {
        let ex = TransactionExtractor::default().parse("500 on biryani, got salary 50000");
        assert_eq!(
            ex.reply,
            "Added Rs.500 → Food (Biryani)\nAdded Rs.50000 → Income (Salary received)"
        );
    }

    #[test]
    fn unmatched_segments_are_dropped() {
        let ex = TransactionExtractor::default().parse("hello, 100 tea");
        assert_eq!(ex.transactions.len(), 1);
        assert_eq!(ex.transactions[0].item, "tea");
    }

    #[test]
    fn empty_input_reports_no_expenses() {
        let ex = TransactionExtractor::default().parse("");
        assert!(ex.is_empty());
        assert_eq!(ex.reply, NO_EXPENSES_REPLY);
        let ex = TransactionExtractor::default().parse(" , and ,");
        assert!(ex.is_empty());
    }

    #[test]
    fn word_containing_and_is_not_split() {
        let ex = TransactionExtractor::default().parse("200 handbag");
        assert_eq!(ex.transactions.len(), 1);
        assert_eq!(ex.transactions[0].category, Category::Shopping);
    }

    #[test]
    fn simple_extract_uses_first_number() {
        let tx = TransactionExtractor::default().simple_extract("paid 250").unwrap();
        assert_eq!(tx.amount, 250);
        assert_eq!(tx.item, "paid");

        let tx = TransactionExtractor::default().simple_extract("250").unwrap();
        assert_eq!(tx.item, "expense");
        assert_eq!(tx.remarks, "Expense");
        assert_eq!(tx.category, Category::Other);
    }

    #[test]
    fn simple_extract_without_number_fails() {
        assert_eq!(
            TransactionExtractor::default().simple_extract("nothing here"),
            Err(ParseError::NoTransactionsFound)
        );
    }
}
