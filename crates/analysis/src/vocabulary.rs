use serde::{Deserialize, Serialize};

/// A lower-cased question split into words for keyword detection.
///
/// A keyword matches when each of its words equals a consecutive query
/// word, where the query word may also carry a plural `s` or `es`.
#[derive(Debug, Clone)]
pub struct QueryText {
    lower: String,
    words: Vec<String>,
}

impl QueryText {
    pub fn new(query: &str) -> Self {
        let lower = query.to_lowercase();
        let words = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { lower, words }
    }

    pub fn as_str(&self) -> &str {
        &self.lower
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn has(&self, keyword: &str) -> bool {
        let parts: Vec<&str> = keyword.split_whitespace().collect();
        if parts.is_empty() || parts.len() > self.words.len() {
            return false;
        }
        self.words
            .windows(parts.len())
            .any(|window| window.iter().zip(&parts).all(|(w, k)| word_matches(w, k)))
    }

    pub fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.has(k))
    }
}

fn word_matches(word: &str, keyword: &str) -> bool {
    match word.strip_prefix(keyword) {
        Some(rest) => rest.is_empty() || rest == "s" || rest == "es",
        None => false,
    }
}

/// One category the router recognizes in questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Lower-cased category key, e.g. `"food"`.
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl VocabularyEntry {
    fn new(name: &str, keywords: &[&str]) -> Self {
        VocabularyEntry {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn mentioned_in(&self, query: &QueryText) -> bool {
        query.has(&self.name) || self.keywords.iter().any(|k| query.has(k))
    }
}

/// Category words used to detect what a question is about. Kept apart
/// from the categorizer tables: questions use a smaller, coarser set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVocabulary {
    pub entries: Vec<VocabularyEntry>,
}

impl Default for QueryVocabulary {
    fn default() -> Self {
        QueryVocabulary {
            entries: vec![
                VocabularyEntry::new(
                    "food",
                    &[
                        "food", "biryani", "pizza", "restaurant", "hotel", "meal", "lunch",
                        "dinner", "eat", "cafe", "snack", "breakfast", "tea", "coffee", "momo",
                        "chicken", "lassi", "chiya", "chai",
                    ],
                ),
                VocabularyEntry::new(
                    "groceries",
                    &[
                        "grocery", "groceries", "vegetables", "fruits", "market", "supermarket",
                        "store", "milk", "bread",
                    ],
                ),
                VocabularyEntry::new(
                    "transport",
                    &[
                        "petrol", "fuel", "taxi", "uber", "bus", "train", "auto", "rickshaw",
                        "metro", "flight", "travel",
                    ],
                ),
                VocabularyEntry::new(
                    "shopping",
                    &["clothes", "shoes", "shopping", "shirt", "dress", "bag", "accessories"],
                ),
                VocabularyEntry::new(
                    "utilities",
                    &["electricity", "water", "internet", "phone", "mobile", "wifi", "bill"],
                ),
                VocabularyEntry::new(
                    "entertainment",
                    &["movie", "game", "party", "cinema", "show", "concert", "entertainment"],
                ),
                VocabularyEntry::new("rent", &["rent", "house", "apartment", "room"]),
                VocabularyEntry::new(
                    "medical",
                    &["doctor", "medicine", "hospital", "medical", "health", "pharmacy"],
                ),
                VocabularyEntry::new("other", &[]),
            ],
        }
    }
}

impl QueryVocabulary {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self { entries }
    }

    /// First entry whose name (not keywords) appears in the question.
    pub fn named_in(&self, query: &QueryText) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| query.has(&e.name))
            .map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_words_only() {
        let q = QueryText::new("What did I spend this current month?");
        assert!(q.has("spend"));
        assert!(!q.has("rent"));
        assert!(!q.has("all"));
    }

    #[test]
    fn plural_suffix_tolerated() {
        let q = QueryText::new("show my expenses and momos");
        assert!(q.has("expense"));
        assert!(q.has("momo"));
        let q = QueryText::new("total earnings");
        assert!(q.has("earning"));
    }

    #[test]
    fn phrases_need_consecutive_words() {
        let q = QueryText::new("Who paid for grocery?");
        assert!(q.has("who paid"));
        assert!(!q.has("paid by"));
        let q = QueryText::new("how many times");
        assert!(q.has("how many"));
        assert!(!QueryText::new("how are there many").has("how many"));
    }

    #[test]
    fn vocabulary_entries() {
        let v = QueryVocabulary::default();
        let q = QueryText::new("how much on momo and groceries");
        let hits: Vec<_> = v
            .entries
            .iter()
            .filter(|e| e.mentioned_in(&q))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(hits, ["food", "groceries"]);
    }

    #[test]
    fn named_in_ignores_keywords() {
        let v = QueryVocabulary::default();
        assert_eq!(v.named_in(&QueryText::new("who paid for the biryani")), None);
        assert_eq!(v.named_in(&QueryText::new("who paid for rent")), Some("rent"));
    }
}
