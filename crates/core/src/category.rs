use serde::{Deserialize, Serialize};
use std::fmt;

use crate::text::title_case;

/// Classification label for a transaction.
///
/// The built-in variants form the working set the categorizer and the
/// query router know about. Anything else (for instance a label chosen by
/// the text-generation capability) is carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Transport,
    Groceries,
    Shopping,
    Utilities,
    Entertainment,
    Accommodation,
    Rent,
    Loan,
    Income,
    Education,
    Medical,
    Electronics,
    Travel,
    PersonalCare,
    Gifts,
    Finance,
    Maintenance,
    Fitness,
    Other,
    Custom(String),
}

impl Category {
    pub const BUILT_IN: [Category; 20] = [
        Category::Food,
        Category::Transport,
        Category::Groceries,
        Category::Shopping,
        Category::Utilities,
        Category::Entertainment,
        Category::Accommodation,
        Category::Rent,
        Category::Loan,
        Category::Income,
        Category::Education,
        Category::Medical,
        Category::Electronics,
        Category::Travel,
        Category::PersonalCare,
        Category::Gifts,
        Category::Finance,
        Category::Maintenance,
        Category::Fitness,
        Category::Other,
    ];

    /// Display form, e.g. `"Personal Care"`.
    pub fn name(&self) -> &str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Groceries => "Groceries",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Accommodation => "Accommodation",
            Category::Rent => "Rent",
            Category::Loan => "Loan",
            Category::Income => "Income",
            Category::Education => "Education",
            Category::Medical => "Medical",
            Category::Electronics => "Electronics",
            Category::Travel => "Travel",
            Category::PersonalCare => "Personal Care",
            Category::Gifts => "Gifts",
            Category::Finance => "Finance",
            Category::Maintenance => "Maintenance",
            Category::Fitness => "Fitness",
            Category::Other => "Other",
            Category::Custom(s) => s,
        }
    }

    /// Lower-cased grouping key used by aggregation.
    pub fn key(&self) -> String {
        self.name().to_lowercase()
    }

    /// Case-insensitive lookup; unknown labels become `Custom` (title-cased),
    /// blank labels become `Other`.
    pub fn parse(label: &str) -> Category {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Category::Other;
        }
        let lower = trimmed.to_lowercase();
        Category::BUILT_IN
            .iter()
            .find(|c| c.name().to_lowercase() == lower)
            .cloned()
            .unwrap_or_else(|| Category::Custom(title_case(trimmed)))
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Category::Income)
    }

    pub fn is_loan(&self) -> bool {
        matches!(self, Category::Loan)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::parse(&s)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::parse(s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_title_case_names() {
        assert_eq!(Category::PersonalCare.to_string(), "Personal Care");
        assert_eq!(Category::Groceries.to_string(), "Groceries");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Category::parse("food"), Category::Food);
        assert_eq!(Category::parse("  INCOME "), Category::Income);
        assert_eq!(Category::parse("personal care"), Category::PersonalCare);
    }

    #[test]
    fn parse_unknown_label_is_custom() {
        assert_eq!(
            Category::parse("subscriptions"),
            Category::Custom("Subscriptions".to_string())
        );
    }

    #[test]
    fn parse_blank_is_other() {
        assert_eq!(Category::parse("   "), Category::Other);
    }

    #[test]
    fn key_is_lowercase_name() {
        assert_eq!(Category::PersonalCare.key(), "personal care");
        assert_eq!(Category::Custom("Pets".into()).key(), "pets");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Category::PersonalCare).unwrap();
        assert_eq!(json, "\"Personal Care\"");
        let back: Category = serde_json::from_str("\"loan\"").unwrap();
        assert_eq!(back, Category::Loan);
    }

    #[test]
    fn built_in_names_are_unique() {
        let mut names: Vec<_> = Category::BUILT_IN.iter().map(|c| c.key()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Category::BUILT_IN.len());
    }
}
