use std::collections::HashSet;

use hisab_core::{per_day, TimeWindow, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

const TOP_CATEGORY_LIMIT: usize = 5;
const RECENT_LIMIT: usize = 5;

/// Expense total for one lower-cased category key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub key: String,
    pub amount: i64,
    pub count: usize,
}

/// Aggregate view over one transaction set, rebuilt for every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSnapshot {
    pub total_expense: i64,
    pub total_income: i64,
    pub net_balance: i64,
    pub expense_count: usize,
    pub income_count: usize,
    /// First-seen order.
    pub category_totals: Vec<CategoryTotal>,
    /// Highest first; equal amounts keep first-seen order.
    pub top_categories: Vec<CategoryTotal>,
    /// The first expenses in input order.
    pub recent: Vec<Transaction>,
    pub distinct_days_observed: usize,
    pub average_per_day: Decimal,
}

impl AnalysisSnapshot {
    pub fn category(&self, key: &str) -> Option<&CategoryTotal> {
        self.category_totals.iter().find(|c| c.key == key)
    }

    pub fn category_amount(&self, key: &str) -> i64 {
        self.category(key).map_or(0, |c| c.amount)
    }

    pub fn top(&self) -> Option<&CategoryTotal> {
        self.top_categories.first()
    }

    pub fn surplus_label(&self) -> &'static str {
        if self.net_balance >= 0 {
            "surplus"
        } else {
            "deficit"
        }
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Builds a snapshot. A bounded `window` keeps only transactions whose
    /// date parses and falls inside it.
    pub fn analyze(transactions: &[Transaction], window: Option<&TimeWindow>) -> AnalysisSnapshot {
        match window.filter(|w| w.is_bounded()) {
            Some(w) => {
                let kept = Self::filter(transactions, w);
                debug!(window = %w, kept = kept.len(), of = transactions.len(), "Filtered by window");
                Self::summarize(&kept)
            }
            None => Self::summarize(transactions),
        }
    }

    /// Transactions dated inside `window`. Undated or unparseable entries
    /// are dropped.
    pub fn filter(transactions: &[Transaction], window: &TimeWindow) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|tx| match tx.parsed_date() {
                Ok(date) => window.contains(date),
                Err(e) => {
                    debug!(item = %tx.item, error = %e, "Excluded from dated aggregation");
                    false
                }
            })
            .cloned()
            .collect()
    }

    fn summarize(transactions: &[Transaction]) -> AnalysisSnapshot {
        let mut total_expense = 0i64;
        let mut total_income = 0i64;
        let mut expense_count = 0usize;
        let mut income_count = 0usize;
        let mut category_totals: Vec<CategoryTotal> = Vec::new();
        let mut recent = Vec::new();
        let mut days: HashSet<&str> = HashSet::new();

        for tx in transactions {
            if let Some(day) = tx.day_key() {
                days.insert(day);
            }

            if tx.is_income() {
                total_income = total_income.saturating_add(tx.amount.saturating_abs());
                income_count += 1;
            } else if tx.is_expense() {
                total_expense = total_expense.saturating_add(tx.amount);
                expense_count += 1;
                if recent.len() < RECENT_LIMIT {
                    recent.push(tx.clone());
                }

                let key = tx.category.key();
                match category_totals.iter_mut().find(|c| c.key == key) {
                    Some(entry) => {
                        entry.amount = entry.amount.saturating_add(tx.amount);
                        entry.count += 1;
                    }
                    None => category_totals.push(CategoryTotal {
                        key,
                        amount: tx.amount,
                        count: 1,
                    }),
                }
            }
        }

        // Stable sort keeps first-seen order among equal amounts.
        let mut top_categories = category_totals.clone();
        top_categories.sort_by(|a, b| b.amount.cmp(&a.amount));
        top_categories.truncate(TOP_CATEGORY_LIMIT);

        let distinct_days_observed = days.len().max(1);

        AnalysisSnapshot {
            total_expense,
            total_income,
            net_balance: total_income - total_expense,
            expense_count,
            income_count,
            category_totals,
            top_categories,
            recent,
            distinct_days_observed,
            average_per_day: per_day(total_expense, distinct_days_observed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hisab_core::Category;
    use std::str::FromStr;

    fn tx(amount: i64, category: Category, date: &str) -> Transaction {
        let t = Transaction::new(amount, "item", category, "Item");
        if date.is_empty() {
            t
        } else {
            t.with_date(date)
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(500, Category::Food, "2024-03-01"),
            tx(400, Category::Groceries, "2024-03-01T09:00:00"),
            tx(-50000, Category::Income, "2024-03-02"),
            tx(100, Category::Food, "2024-03-03 10:00:00"),
            tx(600, Category::Transport, ""),
        ]
    }

    #[test]
    fn totals_and_partition() {
        let s = Aggregator::analyze(&sample(), None);
        assert_eq!(s.total_expense, 1600);
        assert_eq!(s.total_income, 50000);
        assert_eq!(s.net_balance, 50000 - 1600);
        assert_eq!(s.expense_count, 4);
        assert_eq!(s.income_count, 1);
    }

    #[test]
    fn positive_income_category_counts_as_income() {
        let s = Aggregator::analyze(&[tx(2000, Category::Income, "")], None);
        assert_eq!(s.total_income, 2000);
        assert_eq!(s.total_expense, 0);
        assert!(s.category_totals.is_empty());
    }

    #[test]
    fn category_totals_keep_first_seen_order() {
        let s = Aggregator::analyze(&sample(), None);
        let keys: Vec<_> = s.category_totals.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["food", "groceries", "transport"]);
        assert_eq!(s.category("food").map(|c| (c.amount, c.count)), Some((600, 2)));
    }

    #[test]
    fn top_categories_break_ties_by_first_seen() {
        let txs = vec![
            tx(300, Category::Shopping, ""),
            tx(500, Category::Food, ""),
            tx(300, Category::Rent, ""),
            tx(300, Category::Medical, ""),
        ];
        let s = Aggregator::analyze(&txs, None);
        let keys: Vec<_> = s.top_categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["food", "shopping", "rent", "medical"]);
    }

    #[test]
    fn top_categories_capped_at_five() {
        let cats = [
            Category::Food,
            Category::Rent,
            Category::Medical,
            Category::Shopping,
            Category::Transport,
            Category::Fitness,
        ];
        let txs: Vec<_> = cats.iter().map(|c| tx(100, c.clone(), "")).collect();
        let s = Aggregator::analyze(&txs, None);
        assert_eq!(s.top_categories.len(), 5);
        assert_eq!(s.category_totals.len(), 6);
    }

    #[test]
    fn days_and_average() {
        let s = Aggregator::analyze(&sample(), None);
        // 2024-03-01 twice (one as datetime), 03-02, 03-03; one undated.
        assert_eq!(s.distinct_days_observed, 3);
        assert_eq!(s.average_per_day, Decimal::from_str("533.33").unwrap());
    }

    #[test]
    fn no_dates_means_one_day() {
        let s = Aggregator::analyze(&[tx(250, Category::Food, "")], None);
        assert_eq!(s.distinct_days_observed, 1);
        assert_eq!(s.average_per_day, Decimal::from(250));
    }

    #[test]
    fn recent_is_first_five_expenses() {
        let txs: Vec<_> = (1..=7).map(|i| tx(i, Category::Food, "")).collect();
        let s = Aggregator::analyze(&txs, None);
        let amounts: Vec<_> = s.recent.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn window_filters_by_parsed_date() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let window = TimeWindow::new(d(1), d(2), "test");
        let s = Aggregator::analyze(&sample(), Some(&window));
        // Undated transport and the 03-03 food are out.
        assert_eq!(s.total_expense, 900);
        assert_eq!(s.total_income, 50000);
        assert_eq!(s.expense_count, 2);
    }

    #[test]
    fn unbounded_window_is_no_filter() {
        let s = Aggregator::analyze(&sample(), Some(&TimeWindow::unbounded()));
        assert_eq!(s.expense_count, 4);
    }

    #[test]
    fn unparseable_dates_dropped_only_when_filtering() {
        let txs = vec![tx(100, Category::Food, "someday"), tx(200, Category::Food, "2024-03-01")];
        let all = Aggregator::analyze(&txs, None);
        assert_eq!(all.total_expense, 300);

        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let filtered = Aggregator::analyze(&txs, Some(&TimeWindow::new(d, d, "today")));
        assert_eq!(filtered.total_expense, 200);
    }

    #[test]
    fn empty_input() {
        let s = Aggregator::analyze(&[], None);
        assert_eq!(s.total_expense, 0);
        assert_eq!(s.distinct_days_observed, 1);
        assert!(s.top().is_none());
        assert_eq!(s.average_per_day, Decimal::ZERO);
    }
}
