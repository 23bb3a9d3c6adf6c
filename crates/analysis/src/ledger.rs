use std::fmt;

use hisab_core::{title_case, Rupees, Transaction};
use serde::Serialize;
use tracing::debug;

use crate::util::similarity;

/// Shortest normalized name that may be merged by similarity; shorter
/// names must match exactly.
const MIN_FUZZY_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    TheyOweYou,
    YouOweThem,
    Settled,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::TheyOweYou => "they owe you",
            Direction::YouOweThem => "you owe them",
            Direction::Settled => "settled",
        })
    }
}

/// Net loan position with one counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtBalance {
    pub person: String,
    pub given: i64,
    pub taken: i64,
    pub net: i64,
    pub direction: Direction,
}

impl DebtBalance {
    /// Line used in the retrieval context, e.g.
    /// `Sonu: Lent Rs.400 to them, Received back Rs.100 = THEY OWE Rs.300`.
    pub fn context_line(&self) -> String {
        let (given, taken) = (Rupees(self.given), Rupees(self.taken));
        match self.direction {
            Direction::TheyOweYou => format!(
                "{}: Lent {} to them, Received back {} = THEY OWE {}",
                self.person,
                given,
                taken,
                Rupees(self.net)
            ),
            Direction::YouOweThem => format!(
                "{}: Borrowed {} from them, Repaid {} = YOU OWE {}",
                self.person,
                taken,
                given,
                Rupees(self.net).abs()
            ),
            Direction::Settled => {
                format!("{}: Settled (borrowed {}, repaid {})", self.person, taken, given)
            }
        }
    }

    /// Short form for chat replies, e.g. `Sonu: they owe you Rs.300`.
    pub fn summary_line(&self) -> String {
        match self.direction {
            Direction::Settled => format!("{}: settled", self.person),
            d => format!("{}: {} {}", self.person, d, Rupees(self.net).abs()),
        }
    }
}

struct Account {
    key: String,
    display: String,
    given: i64,
    taken: i64,
}

/// Nets Loan transactions per counterpart.
///
/// Names are compared after trimming, lower-casing and dropping anything
/// that is not a letter. Equal forms are the same person. Otherwise two
/// names of at least four letters merge when their edit-distance
/// similarity reaches `threshold`; the best-scoring earlier name wins and
/// the earliest one wins a tie. The first spelling seen is displayed.
#[derive(Debug, Clone, Copy)]
pub struct DebtLedger {
    threshold: f32,
}

impl Default for DebtLedger {
    fn default() -> Self {
        Self { threshold: 0.8 }
    }
}

impl DebtLedger {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn balances(&self, transactions: &[Transaction]) -> Vec<DebtBalance> {
        let mut accounts: Vec<Account> = Vec::new();

        for tx in transactions.iter().filter(|t| t.category.is_loan()) {
            let Some(name) = tx.payer() else { continue };
            let key = normalize_name(name);
            if key.is_empty() {
                continue;
            }

            let idx = match self.find_account(&accounts, &key) {
                Some(i) => i,
                None => {
                    accounts.push(Account {
                        key,
                        display: title_case(name),
                        given: 0,
                        taken: 0,
                    });
                    accounts.len() - 1
                }
            };

            let account = &mut accounts[idx];
            if tx.amount > 0 {
                account.given = account.given.saturating_add(tx.amount);
            } else {
                account.taken = account.taken.saturating_add(tx.amount.saturating_abs());
            }
        }

        accounts
            .into_iter()
            .map(|a| {
                let net = a.given - a.taken;
                let direction = match net {
                    n if n > 0 => Direction::TheyOweYou,
                    n if n < 0 => Direction::YouOweThem,
                    _ => Direction::Settled,
                };
                DebtBalance {
                    person: a.display,
                    given: a.given,
                    taken: a.taken,
                    net,
                    direction,
                }
            })
            .collect()
    }

    fn find_account(&self, accounts: &[Account], key: &str) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, account) in accounts.iter().enumerate() {
            let score = if account.key == key {
                1.0
            } else if account.key.chars().count() >= MIN_FUZZY_LEN
                && key.chars().count() >= MIN_FUZZY_LEN
            {
                similarity(&account.key, key)
            } else {
                continue;
            };
            if score >= self.threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        if let Some((i, score)) = best {
            if accounts[i].key != key {
                debug!(name = key, merged_into = %accounts[i].display, score, "Merged similar name");
            }
        }
        best.map(|(i, _)| i)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect()
}
