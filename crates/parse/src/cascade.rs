use hisab_core::{re, title_case, Category, Transaction};
use regex::{Captures, Regex};
use std::fmt;
use tracing::debug;

use crate::normalize::{re_whitespace, Normalizer};
use crate::rules::Categorizer;
use crate::ParseError;

// ── Helper patterns ──────────────────────────────────────────────────────────

re!(re_connective_lead, r"(?i)^(?:(?:for|on)\s|spend\s+on\s)");
re!(re_digits, r"\d+");
re!(re_currency_amount, r"Rs\.?\d+");
re!(re_stop_words, r"(?i)\b(on|for|spent|the|paid|by)\b");

/// Words that read as a meal or container rather than a person in
/// "item person amount".
const FOOD_WORDS: &[&str] = &[
    "lunch", "dinner", "breakfast", "snack", "meal", "tea", "coffee", "food",
];
const CONTAINER_WORDS: &[&str] = &[
    "case", "cover", "stand", "holder", "bag", "box", "pack", "set", "kit",
];
/// Grammar words owned by later rules ("fan cost 4000", "tea for 50").
const CONNECTIVE_WORDS: &[&str] = &["cost", "costs", "of", "for", "on", "spend", "paid"];

// ── Rule plumbing ────────────────────────────────────────────────────────────

/// What an extractor sees: the raw segment plus the item pipeline.
pub struct RuleInput<'a> {
    pub text: &'a str,
    normalizer: &'a Normalizer,
    categorizer: &'a Categorizer,
}

impl RuleInput<'_> {
    /// Normalizes `raw_item` and builds an expense around it. An item that
    /// categorizes as income is stored negative.
    fn expense(&self, amount: i64, raw_item: &str) -> Transaction {
        let item = self.normalizer.normalize(raw_item);
        let category = self.categorizer.categorize(&item);
        let amount = if category.is_income() { -amount.abs() } else { amount };
        Transaction::new(amount, &item.to_lowercase(), category, &title_case(&item))
    }

    fn paid_expense(&self, amount: i64, raw_item: &str, person: &str) -> Transaction {
        let mut tx = self.expense(amount, raw_item);
        let person = title_case(person);
        tx.remarks = format!("{} - Paid by {}", tx.remarks, person);
        tx.with_payer(&person)
    }
}

/// Returns the transaction for a matched segment, or `None` when a guard
/// rejects it and the cascade should move on.
pub type Extractor = fn(&Captures<'_>, &RuleInput<'_>) -> Option<Transaction>;

pub struct GrammarRule {
    name: &'static str,
    pattern: Regex,
    extract: Extractor,
}

impl GrammarRule {
    pub fn new(name: &'static str, pattern: &str, extract: Extractor) -> Self {
        GrammarRule {
            name,
            pattern: Regex::new(pattern).expect("invalid regex"),
            extract,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, input: &RuleInput<'_>) -> Option<Transaction> {
        let caps = self.pattern.captures(input.text)?;
        (self.extract)(&caps, input)
    }
}

impl fmt::Debug for GrammarRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

fn amount(c: &Captures<'_>, i: usize) -> Option<i64> {
    c.get(i)?.as_str().parse().ok()
}

fn group<'t>(c: &Captures<'t>, i: usize) -> Option<&'t str> {
    c.get(i).map(|m| m.as_str())
}

fn loan(amount: i64, item: &str, remarks: String, person: Option<&str>) -> Transaction {
    let tx = Transaction::new(amount, item, Category::Loan, &remarks);
    match person {
        Some(p) => tx.with_payer(p),
        None => tx,
    }
}

fn income(amount: i64, item: &str, remarks: &str) -> Transaction {
    Transaction::new(-amount, item, Category::Income, remarks)
}

// ── Extractors, highest priority first ───────────────────────────────────────

fn amount_then_item(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    let item = group(c, 2)?;
    // "500 on biryani" belongs to the connective rules further down.
    if re_connective_lead().is_match(item) {
        return None;
    }
    Some(input.expense(amount(c, 1)?, item))
}

fn person_owes_person(c: &Captures<'_>, _: &RuleInput<'_>) -> Option<Transaction> {
    let debtor = group(c, 1)?;
    let creditor = group(c, 3)?;
    let item = format!("{} owes {}", debtor.to_lowercase(), creditor.to_lowercase());
    let remarks = format!("{} owes {}", title_case(debtor), title_case(creditor));
    Some(loan(amount(c, 2)?, &item, remarks, Some(&title_case(debtor))))
}

fn salary_received(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    let value = amount(c, 1).or_else(|| amount(c, 2))?;
    let remarks = if c.get(1).is_some() && input.text.to_lowercase().contains("today") {
        "Got Salary Today"
    } else {
        "Salary received"
    };
    Some(income(value, "salary", remarks))
}

fn income_noun(c: &Captures<'_>, _: &RuleInput<'_>) -> Option<Transaction> {
    let kind = group(c, 1)?;
    let remarks = format!("{} received", title_case(kind));
    Some(income(amount(c, 2)?, &kind.to_lowercase(), &remarks))
}

fn repayment_from_person(c: &Captures<'_>, _: &RuleInput<'_>) -> Option<Transaction> {
    let person = title_case(group(c, 2)?);
    let remarks = format!("Loan repaid by {person}");
    Some(loan(-amount(c, 1)?, "loan repayment", remarks, Some(&person)))
}

fn loan_taken_from_person(c: &Captures<'_>, _: &RuleInput<'_>) -> Option<Transaction> {
    let person = title_case(group(c, 1)?);
    let remarks = format!("Loan taken from {person}");
    Some(loan(-amount(c, 2)?, "loan", remarks, Some(&person)))
}

fn loan_given_for_duration(c: &Captures<'_>, _: &RuleInput<'_>) -> Option<Transaction> {
    let person = title_case(group(c, 1)?);
    let remarks = format!("Loan given to {} for {}", person, group(c, 3)?);
    Some(loan(amount(c, 2)?, "loan", remarks, Some(&person)))
}

fn loan_given(c: &Captures<'_>, _: &RuleInput<'_>) -> Option<Transaction> {
    let person = title_case(group(c, 1)?);
    let remarks = format!("Loan given to {person}");
    Some(loan(amount(c, 2)?, "loan", remarks, Some(&person)))
}

fn loan_paid(c: &Captures<'_>, _: &RuleInput<'_>) -> Option<Transaction> {
    Some(loan(amount(c, 1)?, "loan given", "Loan given".into(), None))
}

fn item_person_amount(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    let item = group(c, 1)?;
    let person = group(c, 2)?;
    let lowered = person.to_lowercase();
    let lowered = lowered.as_str();
    if [FOOD_WORDS, CONTAINER_WORDS, CONNECTIVE_WORDS]
        .iter()
        .any(|words| words.contains(&lowered))
    {
        return None;
    }
    if item.split_whitespace().count() != 1 {
        return None;
    }
    Some(input.paid_expense(amount(c, 3)?, item, person))
}

fn item_for_context(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    let item = format!("{} for {}", group(c, 1)?, group(c, 2)?);
    Some(input.expense(amount(c, 3)?, &item))
}

fn amount_item(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    Some(input.expense(amount(c, 1)?, group(c, 2)?))
}

fn item_amount(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    Some(input.expense(amount(c, 2)?, group(c, 1)?))
}

fn item_person_then_amount(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    Some(input.paid_expense(amount(c, 3)?, group(c, 1)?, group(c, 2)?))
}

fn item_amount_then_person(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    Some(input.paid_expense(amount(c, 2)?, group(c, 1)?, group(c, 3)?))
}

fn generic_item_amount(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    let value = amount(c, 2)?;
    let item = group(c, 1)?;
    if input.normalizer.normalize(item).to_lowercase() == "loan" {
        return Some(loan(value, "loan given", "Loan given".into(), None));
    }
    Some(input.expense(value, item))
}

fn any_number(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    let value: i64 = c.get(0)?.as_str().parse().ok()?;
    let rest = re_digits().replace_all(input.text, "");
    let rest = rest.trim();
    if rest.is_empty() || input.normalizer.normalize(rest).is_empty() {
        return None;
    }
    Some(input.expense(value, rest))
}

fn currency_marked(c: &Captures<'_>, input: &RuleInput<'_>) -> Option<Transaction> {
    let value = amount(c, 1)?;
    let rest = re_currency_amount().replace_all(input.text, "");
    let rest = re_stop_words().replace_all(&rest, "");
    let rest = re_whitespace().replace_all(&rest, " ");
    let rest = rest.trim();
    if value <= 0 || input.normalizer.normalize(rest).is_empty() {
        return None;
    }
    Some(input.expense(value, rest))
}

// ── Cascade ──────────────────────────────────────────────────────────────────

/// Ordered grammar rules for one expense segment. The first rule whose
/// pattern matches and whose extractor accepts wins.
#[derive(Debug)]
pub struct PatternCascade {
    rules: Vec<GrammarRule>,
    normalizer: Normalizer,
    categorizer: Categorizer,
}

impl Default for PatternCascade {
    fn default() -> Self {
        PatternCascade::new(Normalizer::default(), Categorizer::default())
    }
}

impl PatternCascade {
    pub fn new(normalizer: Normalizer, categorizer: Categorizer) -> Self {
        PatternCascade {
            rules: default_rules(),
            normalizer,
            categorizer,
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(GrammarRule::name).collect()
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn match_segment(&self, text: &str) -> Result<Transaction, ParseError> {
        let text = text.trim();
        let input = RuleInput {
            text,
            normalizer: &self.normalizer,
            categorizer: &self.categorizer,
        };
        for rule in &self.rules {
            if let Some(tx) = rule.apply(&input) {
                debug!(rule = rule.name, segment = text, amount = tx.amount, "Grammar rule matched");
                return Ok(tx);
            }
        }
        debug!(segment = text, "No grammar rule matched");
        Err(ParseError::NoMatch(text.to_string()))
    }
}

fn default_rules() -> Vec<GrammarRule> {
    vec![
        GrammarRule::new("amount_item_simple", r"^(\d+)\s+(.+)$", amount_then_item),
        GrammarRule::new(
            "person_owes_person",
            r"(?i)([a-zA-Z]+)\s+(?:owes?|ows?|owe|owz|owse|debt|borrows?|lends?|udhar|qarz)\s+(\d+)\s+(?:to|from)\s+([a-zA-Z]+)",
            person_owes_person,
        ),
        GrammarRule::new(
            "salary_received",
            r"(?i)^(?:(?:got|received)\s+salary\s+(?:today\s+)?(\d+)|salary\s+(\d+)\s+(?:received|got))$",
            salary_received,
        ),
        GrammarRule::new(
            "income_noun",
            r"(?i)^(salary|bonus|incentive|refund|income|earning|payment|received)\s+(\d+)$",
            income_noun,
        ),
        GrammarRule::new(
            "repayment_from_person",
            r"(?i)^(?:got\s+back|received|returned)\s+(\d+)\s+from\s+([a-zA-Z]+)",
            repayment_from_person,
        ),
        GrammarRule::new(
            "loan_taken_from_person",
            r"(?i)^(?:taken|took|borrowed)\s+(?:a\s+)?(?:loan\s+)?from\s+([a-zA-Z]+)\s+(\d+)$",
            loan_taken_from_person,
        ),
        GrammarRule::new(
            "loan_given_for_duration",
            r"(?i)^(?:gave|lend|lent)\s+([a-zA-Z]+)\s+(\d+)\s+for\s+(.+)$",
            loan_given_for_duration,
        ),
        GrammarRule::new(
            "loan_given",
            r"(?i)^(?:gave|lend|lent)\s+([a-zA-Z]+)\s+(\d+)\s*(?:loan|rin|udhar)?$",
            loan_given,
        ),
        GrammarRule::new("loan_paid", r"(?i)^loan\s+paid\s+(\d+)$", loan_paid),
        GrammarRule::new(
            "item_person_amount",
            r"^([a-zA-Z\s]+?)\s+([a-zA-Z]+)\s+(\d+)$",
            item_person_amount,
        ),
        GrammarRule::new(
            "item_for_context_amount",
            r"^([a-zA-Z\s]+?)\s+(?:for|on)\s+([a-zA-Z\s]+?)\s+(\d+)$",
            item_for_context,
        ),
        GrammarRule::new(
            "amount_for_item",
            r"(?i)^(\d+)\s+(?:for|on)\s+(?:the\s+)?(.+)$",
            amount_item,
        ),
        GrammarRule::new(
            "spend_amount_on_item",
            r"(?i)^spend\s+(\d+)\s+on\s+(?:the\s+)?(.+)$",
            amount_item,
        ),
        GrammarRule::new(
            "paid_amount_for_item",
            r"(?i)^(?:paid|payed)\s+(\d+)\s+for\s+(?:the\s+)?(.+)$",
            amount_item,
        ),
        GrammarRule::new(
            "amount_spend_on_item",
            r"(?i)^(\d+)\s+spend\s+on\s+(?:the\s+)?(.+)$",
            amount_item,
        ),
        GrammarRule::new(
            "item_dash_paid_by_person_amount",
            r"(?i)^(.+?)\s*-\s*paid\s+by\s+([a-zA-Z]+)\s+(\d+)$",
            item_person_then_amount,
        ),
        GrammarRule::new(
            "item_amount_paid_by_person",
            r"(?i)^([a-zA-Z\s]+?)\s+(\d+)\s+paid\s+by\s+([a-zA-Z]+)$",
            item_amount_then_person,
        ),
        GrammarRule::new("item_costs_amount", r"(?i)^([a-zA-Z\s]+?)\s+costs?\s+(\d+)$", item_amount),
        GrammarRule::new("item_of_amount", r"(?i)^(.+?)\s+of\s+(\d+)$", item_amount),
        GrammarRule::new("item_amount", r"^([a-zA-Z\s]+?)\s+(\d+)$", generic_item_amount),
        GrammarRule::new("any_number", r"\d+", any_number),
        GrammarRule::new("currency_marked", r"Rs\.?(\d+)", currency_marked),
    ]
}
