use hisab_core::{per_day, share_percent, title_case, Rupees, TimeWindowResolver, Transaction};
use tracing::debug;

use crate::aggregate::{Aggregator, AnalysisSnapshot};
use crate::ledger::DebtLedger;
use crate::vocabulary::{QueryText, QueryVocabulary};

const INCOME_WORDS: &[&str] = &["income", "salary", "earning", "received", "got"];
const TOTAL_WORDS: &[&str] = &["total", "all", "overall", "everything", "entire", "whole"];
const ITEM_QUESTION_WORDS: &[&str] = &["spend", "spent", "much", "cost", "price"];
const GENERAL_WORDS: &[&str] = &["spent", "expense", "much"];
const BREAKDOWN_WORDS: &[&str] = &["category", "breakdown", "categories", "where", "what"];
const RECENT_WORDS: &[&str] = &["recent", "last", "latest"];
const AVERAGE_WORDS: &[&str] = &["average", "daily", "per day"];
const COUNT_WORDS: &[&str] = &["how many", "count", "number"];
const WHO_PAID_WORDS: &[&str] = &["who paid", "who payed", "paid by", "payed by"];
const HELP_WORDS: &[&str] = &["help", "what can", "options"];
const BALANCE_WORDS: &[&str] = &["balance", "net", "left", "remaining", "save", "saved"];
const DEBT_WORDS: &[&str] = &["owe", "lent", "lend", "borrowed", "debt", "udhar"];

/// Words after "on"/"for"/"spend"/"spent" that never name an item.
const NOT_ITEMS: &[&str] = &[
    "total", "all", "everything", "overall", "sum", "entire", "whole", "complete", "my", "the",
    "this", "last",
];
const COMMON_ITEMS: &[&str] = &[
    "momo", "biryani", "tea", "coffee", "lunch", "dinner", "grocery", "petrol", "taxi", "rent",
    "chicken", "lassi", "dahi", "ghee", "chiya",
];

const HELP_REPLY: &str = "You can ask me about:\n\
• Total expenses ('What are my expenses till now?')\n\
• Income tracking ('What's my total income?')\n\
• Net balance ('What's my balance?')\n\
• Category breakdowns ('Show me my food expenses')\n\
• Recent transactions ('What are my recent expenses?')\n\
• Daily averages ('What's my daily spending?')\n\
• Comparisons ('What did I spend the most on?')\n\
• Who paid ('Who paid for grocery last time?')\n\
• Loans ('Who owes me money?')";

/// Everything a branch may look at for one question.
struct Ask<'a> {
    query: QueryText,
    snapshot: &'a AnalysisSnapshot,
    transactions: &'a [Transaction],
    context_label: &'a str,
    /// Window label when a time phrase was found.
    period: Option<String>,
}

impl Ask<'_> {
    /// `" in <label>"` or empty.
    fn time_context(&self) -> String {
        self.period
            .as_deref()
            .map(|p| format!(" in {p}"))
            .unwrap_or_default()
    }

    fn income_suffix_with_count(&self) -> String {
        let s = self.snapshot;
        if s.total_income > 0 {
            format!(" Income: {} ({} txn).", Rupees(s.total_income), s.income_count)
        } else {
            String::new()
        }
    }

    /// "You spent Rs.X in <period> across N transactions." or the
    /// period-less form.
    fn spent_sentence(&self, suffix: &str) -> String {
        let s = self.snapshot;
        match &self.period {
            Some(p) => format!(
                "You spent {} in {} across {} transactions.{}",
                Rupees(s.total_expense),
                p,
                s.expense_count,
                suffix
            ),
            None => format!(
                "You spent {} across {} transactions.{}",
                Rupees(s.total_expense),
                s.expense_count,
                suffix
            ),
        }
    }
}

type Branch = fn(&IntentRouter, &Ask<'_>) -> Option<String>;

/// Answers questions about a transaction set with fixed templates. Branches
/// are tried in order and the first one that produces text wins.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    vocabulary: QueryVocabulary,
    resolver: TimeWindowResolver,
    ledger: DebtLedger,
}

impl IntentRouter {
    const BRANCHES: &'static [(&'static str, Branch)] = &[
        ("multi_category", Self::multi_category),
        ("single_category", Self::single_category),
        ("income", Self::income),
        ("total", Self::total),
        ("specific_item", Self::specific_item),
        ("general_spending", Self::general_spending),
        ("breakdown", Self::breakdown),
        ("recent", Self::recent),
        ("average", Self::average),
        ("most_spent", Self::most_spent),
        ("count", Self::count),
        ("who_paid", Self::who_paid),
        ("help", Self::help),
        ("balance", Self::balance),
        ("debts", Self::debts),
    ];

    pub fn new(vocabulary: QueryVocabulary, resolver: TimeWindowResolver, ledger: DebtLedger) -> Self {
        Self {
            vocabulary,
            resolver,
            ledger,
        }
    }

    /// Router with the built-in vocabulary anchored at the local date.
    pub fn today() -> Self {
        Self::new(QueryVocabulary::default(), TimeWindowResolver::today(), DebtLedger::default())
    }

    pub fn branch_names() -> Vec<&'static str> {
        Self::BRANCHES.iter().map(|(name, _)| *name).chain(["default"]).collect()
    }

    /// When the question names a period the transactions are re-filtered
    /// and `snapshot` is replaced by a fresh one over the filtered set.
    pub fn answer(
        &self,
        query: &str,
        snapshot: &AnalysisSnapshot,
        context_label: &str,
        transactions: &[Transaction],
    ) -> String {
        let window = self.resolver.resolve(query);

        let filtered;
        let windowed;
        let (snapshot, transactions, period) =
            match window.label.as_deref().filter(|_| window.is_bounded()) {
                Some(label) => {
                    filtered = Aggregator::filter(transactions, &window);
                    if filtered.is_empty() {
                        debug!(window = %window, "No transactions in window");
                        return format!("You haven't spent anything in {label}.");
                    }
                    windowed = Aggregator::analyze(&filtered, None);
                    (&windowed, filtered.as_slice(), Some(label.to_string()))
                }
                None => (snapshot, transactions, None),
            };

        let ask = Ask {
            query: QueryText::new(query),
            snapshot,
            transactions,
            context_label,
            period,
        };

        for (name, branch) in Self::BRANCHES {
            if let Some(reply) = branch(self, &ask) {
                debug!(branch = *name, "Answered by rules");
                return reply;
            }
        }
        debug!(branch = "default", "Answered by rules");
        Self::default_summary(&ask)
    }

    /// Category keys the question mentions: categories present in the data
    /// first, then vocabulary entries, without duplicates. Empty for "who
    /// paid" questions, which name a category only to narrow the payer search.
    fn mentioned_categories(&self, ask: &Ask<'_>) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        if ask.query.has_any(WHO_PAID_WORDS) {
            return found;
        }
        for total in &ask.snapshot.category_totals {
            if ask.query.has(&total.key) && !found.contains(&total.key) {
                found.push(total.key.clone());
            }
        }
        for entry in &self.vocabulary.entries {
            if !found.contains(&entry.name) && entry.mentioned_in(&ask.query) {
                found.push(entry.name.clone());
            }
        }
        found
    }

    fn multi_category(&self, ask: &Ask<'_>) -> Option<String> {
        let categories = self.mentioned_categories(ask);
        if categories.len() < 2 {
            return None;
        }
        let mut amount = 0i64;
        let mut count = 0usize;
        let mut details = Vec::new();
        for key in &categories {
            if let Some(total) = ask.snapshot.category(key).filter(|t| t.amount > 0) {
                amount = amount.saturating_add(total.amount);
                count += total.count;
                details.push(format!(
                    "{}: {} ({} txn)",
                    title_case(key),
                    Rupees(total.amount),
                    total.count
                ));
            }
        }
        if details.is_empty() {
            return None;
        }
        Some(format!(
            "You've spent {} on {} across {} transactions{}. Breakdown: {}.",
            Rupees(amount),
            categories.join(" and "),
            count,
            ask.time_context(),
            details.join(", ")
        ))
    }

    fn single_category(&self, ask: &Ask<'_>) -> Option<String> {
        let categories = self.mentioned_categories(ask);
        let [key] = categories.as_slice() else {
            return None;
        };
        let time = ask.time_context();
        let s = ask.snapshot;
        match s.category(key).filter(|t| t.amount > 0) {
            Some(total) if total.count > 1 => Some(format!(
                "You've spent {} on {} across {} transactions{}.",
                Rupees(total.amount),
                key,
                total.count,
                time
            )),
            Some(total) => Some(format!("You've spent {} on {}{}.", Rupees(total.amount), key, time)),
            None => match s.top().filter(|_| s.total_expense > 0) {
                Some(top) => Some(format!(
                    "You haven't spent anything on {}{}. Your main spending has been on {} ({}).",
                    key,
                    time,
                    top.key,
                    Rupees(top.amount)
                )),
                None => Some(format!("You haven't spent anything on {key}{time}.")),
            },
        }
    }

    fn income(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(INCOME_WORDS) {
            return None;
        }
        let s = ask.snapshot;
        let time = ask.time_context();
        if s.total_income > 0 {
            Some(format!(
                "Your total income{}: {} across {} transactions. Net balance: {} ({}).",
                time,
                Rupees(s.total_income),
                s.income_count,
                Rupees(s.net_balance),
                s.surplus_label()
            ))
        } else {
            Some(format!("No income recorded{time}."))
        }
    }

    fn total(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(TOTAL_WORDS) {
            return None;
        }
        Some(ask.spent_sentence(&ask.income_suffix_with_count()))
    }

    fn specific_item(&self, ask: &Ask<'_>) -> Option<String> {
        if ask.transactions.is_empty() || !ask.query.has_any(ITEM_QUESTION_WORDS) {
            return None;
        }
        let keywords = item_keywords(&ask.query);
        let name = keywords.first()?;

        let matches: Vec<&Transaction> = ask
            .transactions
            .iter()
            .filter(|tx| {
                let item = tx.item.to_lowercase();
                let remarks = tx.remarks.to_lowercase();
                keywords
                    .iter()
                    .any(|k| item.contains(k.as_str()) || remarks.contains(k.as_str()))
            })
            .collect();
        let total = matches.iter().map(|tx| tx.amount).fold(0i64, i64::saturating_add);
        let time = ask.time_context();

        match matches.as_slice() {
            [] => None,
            [tx] => {
                let date = tx.date.as_deref().map(|d| format!(" on {d}")).unwrap_or_default();
                let paid = tx.payer().map(|p| format!(" (paid by {p})")).unwrap_or_default();
                Some(format!(
                    "You spent {} on {}{}{}{}.",
                    Rupees(total),
                    title_case(name),
                    date,
                    paid,
                    time
                ))
            }
            many => Some(format!(
                "You spent {} on {} across {} transactions{}.",
                Rupees(total),
                title_case(name),
                many.len(),
                time
            )),
        }
    }

    fn general_spending(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(GENERAL_WORDS) {
            return None;
        }
        let income = if ask.snapshot.total_income > 0 {
            format!(" Income: {}.", Rupees(ask.snapshot.total_income))
        } else {
            String::new()
        };
        Some(ask.spent_sentence(&income))
    }

    fn breakdown(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(BREAKDOWN_WORDS) || ask.snapshot.top_categories.is_empty() {
            return None;
        }
        let s = ask.snapshot;
        let lines: Vec<String> = s
            .top_categories
            .iter()
            .map(|c| {
                format!(
                    "• {}: {} ({:.1}%)",
                    title_case(&c.key),
                    Rupees(c.amount),
                    share_percent(c.amount, s.total_expense)
                )
            })
            .collect();
        Some(format!(
            "Your {} expense breakdown:\n{}",
            ask.context_label,
            lines.join("\n")
        ))
    }

    fn recent(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(RECENT_WORDS) || ask.snapshot.recent.is_empty() {
            return None;
        }
        let lines: Vec<String> = ask
            .snapshot
            .recent
            .iter()
            .take(3)
            .map(|tx| {
                let date = tx.date.as_deref().map(|d| format!(" on {d}")).unwrap_or_default();
                format!("• {} on {} ({}){}", tx.rupees(), tx.item, tx.category, date)
            })
            .collect();
        Some(format!(
            "Your recent {} expenses:\n{}",
            ask.context_label,
            lines.join("\n")
        ))
    }

    fn average(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(AVERAGE_WORDS) {
            return None;
        }
        let s = ask.snapshot;
        let income = if s.total_income > 0 {
            format!(
                " Daily income average: Rs.{}.",
                per_day(s.total_income, s.distinct_days_observed)
            )
        } else {
            String::new()
        };
        Some(format!(
            "Your average daily {} spending is Rs.{} over {} days.{}",
            ask.context_label, s.average_per_day, s.distinct_days_observed, income
        ))
    }

    fn most_spent(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has("most") || !ask.query.has_any(&["spent", "expensive"]) {
            return None;
        }
        let top = ask.snapshot.top()?;
        Some(format!(
            "You've spent the most on {} with {} in your {} expenses.",
            title_case(&top.key),
            Rupees(top.amount),
            ask.context_label
        ))
    }

    fn count(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(COUNT_WORDS) {
            return None;
        }
        let s = ask.snapshot;
        let income = if s.total_income > 0 {
            format!(
                " and {} income transactions ({})",
                s.income_count,
                Rupees(s.total_income)
            )
        } else {
            String::new()
        };
        Some(format!(
            "You have {} expense transactions totaling {}{} in your {} records.",
            s.expense_count,
            Rupees(s.total_expense),
            income,
            ask.context_label
        ))
    }

    fn who_paid(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(WHO_PAID_WORDS) {
            return None;
        }
        let recent = &ask.snapshot.recent;
        let reply = match self.vocabulary.named_in(&ask.query) {
            Some(category) => {
                let in_category: Vec<&Transaction> = recent
                    .iter()
                    .filter(|tx| tx.category.key() == category)
                    .collect();
                if in_category.is_empty() {
                    format!("No recent {category} expenses found.")
                } else {
                    match in_category.iter().find_map(|tx| tx.payer().map(|p| (tx, p))) {
                        Some((tx, payer)) => format!(
                            "The last {} expense was {} for {} paid by {}.",
                            category,
                            tx.rupees(),
                            tx.item,
                            payer
                        ),
                        None => format!(
                            "I found recent {category} expenses but no payment information is recorded."
                        ),
                    }
                }
            }
            None => match recent.iter().find_map(|tx| tx.payer().map(|p| (tx, p))) {
                Some((tx, payer)) => format!(
                    "The most recent expense with payment info: {} for {} paid by {}.",
                    tx.rupees(),
                    tx.item,
                    payer
                ),
                None => "No recent expenses have payment information recorded.".to_string(),
            },
        };
        Some(reply)
    }

    fn help(&self, ask: &Ask<'_>) -> Option<String> {
        ask.query.has_any(HELP_WORDS).then(|| HELP_REPLY.to_string())
    }

    fn balance(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(BALANCE_WORDS) {
            return None;
        }
        let s = ask.snapshot;
        if s.total_income > 0 {
            Some(format!(
                "Your net balance{}: {} ({}). Income: {}, Expenses: {}.",
                ask.time_context(),
                Rupees(s.net_balance),
                s.surplus_label(),
                Rupees(s.total_income),
                Rupees(s.total_expense)
            ))
        } else {
            Some(format!(
                "No income data available to calculate balance. Total expenses: {}.",
                Rupees(s.total_expense)
            ))
        }
    }

    fn debts(&self, ask: &Ask<'_>) -> Option<String> {
        if !ask.query.has_any(DEBT_WORDS) {
            return None;
        }
        let balances = self.ledger.balances(ask.transactions);
        if balances.is_empty() {
            return Some(format!(
                "No loans with a named person are recorded{}.",
                ask.time_context()
            ));
        }
        let lines: Vec<String> = balances
            .iter()
            .map(|b| format!("• {}", b.summary_line()))
            .collect();
        Some(format!("Your loan balances{}:\n{}", ask.time_context(), lines.join("\n")))
    }

    fn default_summary(ask: &Ask<'_>) -> String {
        let s = ask.snapshot;
        let income = ask.income_suffix_with_count();
        let time = ask.time_context();
        match s.top() {
            Some(top) => format!(
                "You spent {}{} across {} transactions. Top spending: {} ({}, {:.1}%).{}",
                Rupees(s.total_expense),
                time,
                s.expense_count,
                title_case(&top.key),
                Rupees(top.amount),
                share_percent(top.amount, s.total_expense),
                income
            ),
            None => format!(
                "You spent {}{} across {} transactions.{}",
                Rupees(s.total_expense),
                time,
                s.expense_count,
                income
            ),
        }
    }
}

/// Candidate item words: whatever follows "on"/"for"/"spend"/"spent",
/// then any common item named in the question.
fn item_keywords(query: &QueryText) -> Vec<String> {
    let words = query.words();
    let mut keywords: Vec<String> = words
        .windows(2)
        .filter(|pair| matches!(pair[0].as_str(), "on" | "for" | "spend" | "spent"))
        .map(|pair| pair[1].clone())
        .filter(|next| !NOT_ITEMS.contains(&next.as_str()))
        .collect();
    keywords.extend(
        COMMON_ITEMS
            .iter()
            .filter(|item| query.has(item))
            .map(|item| item.to_string()),
    );
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hisab_core::Category;

    fn router() -> IntentRouter {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        IntentRouter::new(
            QueryVocabulary::default(),
            TimeWindowResolver::new(today),
            DebtLedger::default(),
        )
    }

    fn tx(amount: i64, item: &str, category: Category, date: &str) -> Transaction {
        Transaction::new(amount, item, category, &title_case(item)).with_date(date)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(500, "biryani", Category::Food, "2024-03-10"),
            tx(400, "grocery", Category::Groceries, "2024-03-11"),
            tx(200, "momo", Category::Food, "2024-02-20"),
            tx(300, "taxi", Category::Transport, "2024-02-21"),
            tx(-50000, "salary", Category::Income, "2024-03-01"),
        ]
    }

    fn ask(query: &str, txs: &[Transaction]) -> String {
        let snapshot = Aggregator::analyze(txs, None);
        router().answer(query, &snapshot, "personal", txs)
    }

    #[test]
    fn branch_order() {
        let names = IntentRouter::branch_names();
        assert_eq!(names.first(), Some(&"multi_category"));
        assert_eq!(names[13], "balance");
        assert_eq!(names[14], "debts");
        assert_eq!(names.last(), Some(&"default"));
    }

    #[test]
    fn empty_period() {
        let reply = ask("what did I spend in january", &sample());
        assert_eq!(reply, "You haven't spent anything in January 2024.");
    }

    #[test]
    fn multi_category() {
        let reply = ask("how much on food and groceries?", &sample());
        assert_eq!(
            reply,
            "You've spent Rs.1100 on food and groceries across 3 transactions. \
             Breakdown: Food: Rs.700 (2 txn), Groceries: Rs.400 (1 txn)."
        );
    }

    #[test]
    fn multi_category_with_period() {
        let reply = ask("food and grocery last month", &sample());
        assert_eq!(
            reply,
            "You've spent Rs.200 on food and groceries across 1 transactions in last month. \
             Breakdown: Food: Rs.200 (1 txn)."
        );
    }

    #[test]
    fn single_category() {
        assert_eq!(
            ask("how much did I spend on food", &sample()),
            "You've spent Rs.700 on food across 2 transactions."
        );
        assert_eq!(
            ask("transport costs?", &sample()),
            "You've spent Rs.300 on transport."
        );
        assert_eq!(
            ask("anything on medicine?", &sample()),
            "You haven't spent anything on medical. Your main spending has been on food (Rs.700)."
        );
    }

    #[test]
    fn income() {
        assert_eq!(
            ask("what is my salary", &sample()),
            "Your total income: Rs.50000 across 1 transactions. Net balance: Rs.48600 (surplus)."
        );
        let no_income = vec![tx(100, "pen", Category::Other, "2024-03-01")];
        assert_eq!(ask("income?", &no_income), "No income recorded.");
    }

    #[test]
    fn total() {
        assert_eq!(
            ask("total so far", &sample()),
            "You spent Rs.1400 across 4 transactions. Income: Rs.50000 (1 txn)."
        );
        assert_eq!(
            ask("total this month", &sample()),
            "You spent Rs.900 in this month across 2 transactions. Income: Rs.50000 (1 txn)."
        );
    }

    #[test]
    fn specific_item() {
        let mut txs = sample();
        txs.push(tx(60, "dahi", Category::Other, "2024-03-12").with_payer("Sonu"));
        assert_eq!(
            ask("how much for dahi", &txs),
            "You spent Rs.60 on Dahi on 2024-03-12 (paid by Sonu)."
        );
        txs.push(tx(40, "dahi", Category::Other, "2024-03-13"));
        assert_eq!(
            ask("how much for dahi", &txs),
            "You spent Rs.100 on Dahi across 2 transactions."
        );
    }

    #[test]
    fn huge_amounts_saturate() {
        let txs = vec![
            tx(i64::MAX, "biryani", Category::Food, "2024-03-10"),
            tx(i64::MAX, "taxi", Category::Transport, "2024-03-11"),
        ];
        let reply = ask("food and taxi", &txs);
        assert!(reply.contains(&Rupees(i64::MAX).to_string()), "{reply}");
        assert!(reply.contains("across 2 transactions"), "{reply}");

        let dahi = vec![
            tx(i64::MAX, "dahi", Category::Other, "2024-03-12"),
            tx(i64::MAX, "dahi", Category::Other, "2024-03-13"),
        ];
        assert_eq!(
            ask("how much for dahi", &dahi),
            format!("You spent {} on Dahi across 2 transactions.", Rupees(i64::MAX))
        );
    }

    #[test]
    fn out_of_range_day_count_is_all_time() {
        let reply = ask("how much did I spend in the last 200000000000000 days", &sample());
        assert!(!reply.contains("haven't spent anything in"), "{reply}");
        assert_eq!(
            ask("last 0 days", &sample()),
            "You haven't spent anything in last 0 days."
        );
    }

    #[test]
    fn general_spending() {
        assert_eq!(
            ask("how much have I spent", &sample()),
            "You spent Rs.1400 across 4 transactions. Income: Rs.50000."
        );
    }

    #[test]
    fn breakdown() {
        assert_eq!(
            ask("category breakdown", &sample()),
            "Your personal expense breakdown:\n\
             • Food: Rs.700 (50.0%)\n\
             • Groceries: Rs.400 (28.6%)\n\
             • Transport: Rs.300 (21.4%)"
        );
    }

    #[test]
    fn recent() {
        assert_eq!(
            ask("latest", &sample()),
            "Your recent personal expenses:\n\
             • Rs.500 on biryani (Food) on 2024-03-10\n\
             • Rs.400 on grocery (Groceries) on 2024-03-11\n\
             • Rs.200 on momo (Food) on 2024-02-20"
        );
    }

    #[test]
    fn average() {
        assert_eq!(
            ask("daily average", &sample()),
            "Your average daily personal spending is Rs.280 over 5 days. Daily income average: Rs.10000."
        );
    }

    #[test]
    fn most_spent() {
        assert_eq!(
            ask("most expensive", &sample()),
            "You've spent the most on Food with Rs.700 in your personal expenses."
        );
    }

    #[test]
    fn count() {
        assert_eq!(
            ask("how many", &sample()),
            "You have 4 expense transactions totaling Rs.1400 and 1 income transactions (Rs.50000) in your personal records."
        );
    }

    #[test]
    fn who_paid() {
        let txs = vec![
            tx(900, "rent share", Category::Rent, "2024-03-01").with_payer("Sonu"),
            tx(100, "bus", Category::Transport, "2024-03-01"),
        ];
        assert_eq!(
            ask("who paid rent", &txs),
            "The last rent expense was Rs.900 for rent share paid by Sonu."
        );
        assert_eq!(
            ask("who paid medical", &txs),
            "No recent medical expenses found."
        );
        assert_eq!(
            ask("who paid?", &txs),
            "The most recent expense with payment info: Rs.900 for rent share paid by Sonu."
        );
        let unpaid = vec![tx(100, "bus", Category::Transport, "2024-03-01")];
        assert_eq!(
            ask("who paid", &unpaid),
            "No recent expenses have payment information recorded."
        );
    }

    #[test]
    fn help() {
        assert!(ask("help", &sample()).starts_with("You can ask me about:"));
    }

    #[test]
    fn balance() {
        assert_eq!(
            ask("balance", &sample()),
            "Your net balance: Rs.48600 (surplus). Income: Rs.50000, Expenses: Rs.1400."
        );
        let no_income = vec![tx(100, "pen", Category::Other, "2024-03-01")];
        assert_eq!(
            ask("remaining", &no_income),
            "No income data available to calculate balance. Total expenses: Rs.100."
        );
    }

    #[test]
    fn debts() {
        let txs = vec![
            Transaction::new(400, "loan", Category::Loan, "Loan given to Sonu").with_payer("Sonu"),
            Transaction::new(-100, "loan repayment", Category::Loan, "Loan repaid by Sonu")
                .with_payer("sonu"),
        ];
        assert_eq!(
            ask("who owes me?", &txs),
            "Your loan balances:\n• Sonu: they owe you Rs.300"
        );
        assert_eq!(
            ask("who owes me?", &sample()),
            "No loans with a named person are recorded."
        );
    }

    #[test]
    fn default_summary() {
        assert_eq!(
            ask("hello", &sample()),
            "You spent Rs.1400 across 4 transactions. Top spending: Food (Rs.700, 50.0%). Income: Rs.50000 (1 txn)."
        );
        assert_eq!(ask("hello", &[]), "You spent Rs.0 across 0 transactions.");
    }

    #[test]
    fn time_phrase_over_empty_set() {
        assert_eq!(ask("hello today", &[]), "You haven't spent anything in today.");
    }

    #[test]
    fn unmatched_item_falls_through_to_general() {
        assert_eq!(
            ask("where have I spent most", &sample()),
            "You spent Rs.1400 across 4 transactions. Income: Rs.50000."
        );
    }
}
