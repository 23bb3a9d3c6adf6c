use hisab_core::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to parse keyword table TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Keyword table '{0}' has an entry with no keywords")]
    EmptyEntry(String),
}

/// One category and the substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl KeywordEntry {
    fn new(category: Category, keywords: &[&str]) -> Self {
        KeywordEntry {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn hits(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

/// Ordered keyword table. Entry order decides ties: the first entry with
/// a hit wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    #[serde(default)]
    pub entries: Vec<KeywordEntry>,
}

impl KeywordTable {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        KeywordTable { entries }
    }

    pub fn lookup(&self, text: &str) -> Option<&Category> {
        self.entries.iter().find(|e| e.hits(text)).map(|e| &e.category)
    }

    fn validate(&self, name: &str) -> Result<(), TableError> {
        if self.entries.iter().any(|e| e.keywords.is_empty()) {
            return Err(TableError::EmptyEntry(name.to_string()));
        }
        Ok(())
    }

    /// Built-in first-pass table.
    pub fn primary() -> Self {
        use Category::*;
        KeywordTable::new(vec![
            KeywordEntry::new(
                Food,
                &[
                    "biryani", "pizza", "restaurant", "meal", "lunch", "dinner", "food", "eat",
                    "cafe", "snack", "tea", "coffee", "breakfast", "momo", "momos", "noodles",
                    "chowmein", "chowmin", "chow", "ramen", "pasta", "rice", "dal", "curry",
                    "khana", "khaana", "chiya", "chai", "dudh", "milk", "bhat", "daal", "tarkari",
                    "sabji", "machha", "fish", "chicken", "mutton", "buff", "pork", "egg", "anda",
                    "roti", "chapati", "paratha", "samosa", "pakoda", "chaat", "lassi", "lasi",
                    "juice", "paani", "water", "drink", "beverage",
                ],
            ),
            KeywordEntry::new(
                Transport,
                &[
                    "petrol", "fuel", "taxi", "uber", "bus", "train", "auto", "rickshaw", "metro",
                    "flight", "travel", "tempo", "microbus", "bike", "scooter", "car", "gaadi",
                ],
            ),
            KeywordEntry::new(
                Groceries,
                &[
                    "grocery", "groceries", "vegetables", "fruits", "market", "supermarket",
                    "store", "milk", "bread", "apple", "garlic", "potato", "onion", "tomato",
                    "sabji", "tarkari", "phal", "alu", "pyaj", "lasun", "dhaniya", "hariyo",
                    "green",
                ],
            ),
            KeywordEntry::new(
                Shopping,
                &[
                    "clothes", "shoes", "shopping", "shirt", "dress", "bag", "accessories",
                    "kapada", "jutta", "chappals", "sandals",
                ],
            ),
            KeywordEntry::new(
                Utilities,
                &[
                    "electricity", "water", "internet", "phone", "mobile", "wifi", "bill",
                    "current", "paani", "net", "recharge",
                ],
            ),
            KeywordEntry::new(
                Entertainment,
                &["movie", "game", "party", "cinema", "show", "concert", "film", "picture", "khel"],
            ),
            KeywordEntry::new(
                Accommodation,
                &["hotel", "stay", "booking", "resort", "lodge", "guest house", "airbnb"],
            ),
            KeywordEntry::new(
                Rent,
                &["rent", "house", "apartment", "room", "ghar", "kotha", "bhada"],
            ),
            KeywordEntry::new(
                Loan,
                &["loan", "lend", "borrow", "debt", "rin", "gave", "diye", "liye", "udhar", "qarz"],
            ),
            KeywordEntry::new(
                Income,
                &[
                    "salary", "bonus", "incentive", "refund", "income", "earning", "payment",
                    "received",
                ],
            ),
            KeywordEntry::new(Education, EDUCATION_KEYWORDS),
        ])
    }

    /// Built-in fallback table for labels the first pass never assigns.
    pub fn secondary() -> Self {
        use Category::*;
        KeywordTable::new(vec![
            KeywordEntry::new(
                Electronics,
                &[
                    "fan", "ac", "tv", "fridge", "laptop", "phone", "mobile", "computer", "tablet",
                    "camera", "speaker", "headphone", "charger", "appliance", "electronic",
                ],
            ),
            KeywordEntry::new(
                Travel,
                &["hotel", "stay", "booking", "resort", "lodge", "airbnb", "hostel"],
            ),
            KeywordEntry::new(
                Medical,
                &["doctor", "medicine", "hospital", "clinic", "pharmacy", "medical", "health"],
            ),
            KeywordEntry::new(Education, EDUCATION_KEYWORDS),
            KeywordEntry::new(
                PersonalCare,
                &["salon", "haircut", "beauty", "cosmetic", "spa", "massage"],
            ),
            KeywordEntry::new(Gifts, &["gift", "present", "donation", "charity", "birthday"]),
            KeywordEntry::new(
                Finance,
                &["insurance", "premium", "policy", "bank", "fee", "charge"],
            ),
            KeywordEntry::new(
                Maintenance,
                &["repair", "fix", "maintenance", "service", "cleaning"],
            ),
            KeywordEntry::new(
                Fitness,
                &["gym", "fitness", "sport", "exercise", "yoga", "swimming"],
            ),
            KeywordEntry::new(
                Food,
                &["chiya", "chai", "tea", "coffee", "drink", "beverage", "snack"],
            ),
        ])
    }
}

const EDUCATION_KEYWORDS: &[&str] = &[
    "admission", "fee", "tuition", "school", "college", "university", "course", "class", "book",
    "study", "education", "exam", "test",
];

/// Layout of a keyword-table TOML file.
#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    primary: Vec<KeywordEntry>,
    #[serde(default)]
    secondary: Vec<KeywordEntry>,
}

/// Assigns a [`Category`] to a normalized item phrase from two ordered
/// keyword tables, falling back to `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorizer {
    primary: KeywordTable,
    secondary: KeywordTable,
}

impl Default for Categorizer {
    fn default() -> Self {
        Categorizer::new(KeywordTable::primary(), KeywordTable::secondary())
    }
}

impl Categorizer {
    pub fn new(primary: KeywordTable, secondary: KeywordTable) -> Self {
        Self { primary, secondary }
    }

    /// Loads both tables from TOML:
    ///
    /// ```toml
    /// [[primary]]
    /// category = "Food"
    /// keywords = ["momo", "tea"]
    ///
    /// [[secondary]]
    /// category = "Pets"
    /// keywords = ["vet"]
    /// ```
    ///
    /// A missing section leaves that pass empty.
    pub fn from_toml(toml_content: &str) -> Result<Self, TableError> {
        let file: TableFile = toml::from_str(toml_content)?;
        let primary = KeywordTable::new(file.primary);
        let secondary = KeywordTable::new(file.secondary);
        primary.validate("primary")?;
        secondary.validate("secondary")?;
        Ok(Self::new(primary, secondary))
    }

    pub fn categorize(&self, text: &str) -> Category {
        let text = text.to_lowercase();
        self.primary
            .lookup(&text)
            .or_else(|| self.secondary.lookup(&text))
            .cloned()
            .unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;

    #[test]
    fn primary_keywords() {
        let c = Categorizer::default();
        assert_eq!(c.categorize("biryani"), Category::Food);
        assert_eq!(c.categorize("grocery"), Category::Groceries);
        assert_eq!(c.categorize("petrol"), Category::Transport);
        assert_eq!(c.categorize("admission fee"), Category::Education);
        assert_eq!(c.categorize("Salary"), Category::Income);
    }

    #[test]
    fn table_order_breaks_ties() {
        // "milk" is listed under both Food and Groceries; Food comes first.
        let c = Categorizer::default();
        assert_eq!(c.categorize("milk"), Category::Food);
        // "water" is Food before Utilities.
        assert_eq!(c.categorize("water bill"), Category::Food);
    }

    #[test]
    fn secondary_pass_when_primary_misses() {
        let c = Categorizer::default();
        assert_eq!(c.categorize("laptop"), Category::Electronics);
        assert_eq!(c.categorize("doctor visit"), Category::Medical);
        assert_eq!(c.categorize("haircut"), Category::PersonalCare);
        assert_eq!(c.categorize("gym membership"), Category::Fitness);
    }

    #[test]
    fn unknown_is_other() {
        assert_eq!(Categorizer::default().categorize("xyzzy"), Category::Other);
        assert_eq!(Categorizer::default().categorize(""), Category::Other);
    }

    #[test]
    fn categorize_after_normalize_is_stable() {
        let n = Normalizer::default();
        let c = Categorizer::default();
        let first = c.categorize(&n.normalize("100 the chiya"));
        let second = c.categorize(&n.normalize("100 the chiya"));
        assert_eq!(first, Category::Food);
        assert_eq!(first, second);
    }

    #[test]
    fn from_toml_replaces_tables() {
        let toml = r#"
            [[primary]]
            category = "Pets"
            keywords = ["vet", "kibble"]

            [[secondary]]
            category = "food"
            keywords = ["momo"]
        "#;
        let c = Categorizer::from_toml(toml).unwrap();
        assert_eq!(c.categorize("vet visit"), Category::Custom("Pets".into()));
        assert_eq!(c.categorize("momo"), Category::Food);
        assert_eq!(c.categorize("biryani"), Category::Other);
    }

    #[test]
    fn from_toml_rejects_empty_keywords() {
        let toml = r#"
            [[primary]]
            category = "Food"
            keywords = []
        "#;
        assert!(matches!(
            Categorizer::from_toml(toml),
            Err(TableError::EmptyEntry(_))
        ));
    }

    #[test]
    fn from_toml_rejects_bad_syntax() {
        assert!(matches!(
            Categorizer::from_toml("[[primary"),
            Err(TableError::Toml(_))
        ));
    }
}
