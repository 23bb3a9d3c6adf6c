use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::category::Category;
use super::money::Rupees;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Transaction has no date")]
    Missing,
    #[error("Unparseable date: '{0}'")]
    Unparseable(String),
}

/// One parsed financial event.
///
/// Sign convention: a positive amount is money spent or a loan given, a
/// negative amount is income received or money coming back from a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: i64,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Storage timestamp supplied by callers; only consulted when `date` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Transaction {
    pub fn new(amount: i64, item: &str, category: Category, remarks: &str) -> Self {
        Transaction {
            amount,
            item: item.to_string(),
            category,
            remarks: remarks.to_string(),
            paid_by: None,
            date: None,
            created_at: None,
        }
    }

    pub fn with_payer(mut self, paid_by: &str) -> Self {
        self.paid_by = Some(paid_by.to_string());
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn rupees(&self) -> Rupees {
        Rupees(self.amount)
    }

    /// Income is anything negative or explicitly categorized as income.
    pub fn is_income(&self) -> bool {
        self.amount < 0 || self.category.is_income()
    }

    pub fn is_expense(&self) -> bool {
        self.amount > 0 && !self.is_income()
    }

    pub fn payer(&self) -> Option<&str> {
        self.paid_by
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// `date`, falling back to `created_at`; blank values count as absent.
    pub fn timestamp(&self) -> Option<&str> {
        self.date
            .as_deref()
            .or(self.created_at.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Calendar-day part of the timestamp as written, e.g. `2024-03-15`
    /// for `2024-03-15T10:00:00Z` or `2024-03-15 10:00:00`.
    pub fn day_key(&self) -> Option<&str> {
        let ts = self.timestamp()?;
        let day = if ts.contains('T') {
            ts.split('T').next()
        } else {
            ts.split(' ').next()
        };
        day.filter(|d| !d.is_empty())
    }

    pub fn parsed_date(&self) -> Result<NaiveDate, DateError> {
        let ts = self.timestamp().ok_or(DateError::Missing)?;
        parse_date(ts)
    }
}

/// Accepts a bare `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive ISO-8601
/// datetime.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }
    let day = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| DateError::Unparseable(raw.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Generated payloads sometimes carry `400.0` or `"Rs.400"`; accept those too.
fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match AmountRepr::deserialize(deserializer)? {
        AmountRepr::Int(n) => Ok(n),
        AmountRepr::Float(f) if f.is_finite() => Ok(f.round() as i64),
        AmountRepr::Float(f) => Err(serde::de::Error::custom(format!("invalid amount: {f}"))),
        AmountRepr::Text(s) => {
            let clean: String = s
                .trim()
                .trim_start_matches("Rs.")
                .trim_start_matches("Rs")
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            clean
                .parse::<i64>()
                .or_else(|_| clean.parse::<f64>().map(|f| f.round() as i64))
                .map_err(|_| serde::de::Error::custom(format!("invalid amount: '{s}'")))
        }
    }
}
