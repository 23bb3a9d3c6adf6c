use hisab_core::re;
use serde::{Deserialize, Serialize};

re!(re_determiner, r"(?i)\b(the|a|an)\b");
re!(pub(crate) re_whitespace, r"\s+");

/// Ordered `(needle, replacement)` pairs. Needles are matched as substrings
/// of the lower-cased phrase; only the first hit is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymTable {
    pub entries: Vec<(String, String)>,
}

const BUILT_IN_SYNONYMS: &[(&str, &str)] = &[
    ("chowmin", "chowmein"),
    ("chow min", "chowmein"),
    ("khana", "food"),
    ("khaana", "food"),
    ("chiya", "tea"),
    ("chai", "tea"),
    ("dudh", "milk"),
    ("paani", "water"),
    ("bhat", "rice"),
    ("daal", "dal"),
    ("tarkari", "vegetables"),
    ("sabji", "vegetables"),
    ("machha", "fish"),
    ("anda", "egg"),
    ("lasi", "lassi"),
    ("phal", "fruits"),
    ("alu", "potato"),
    ("pyaj", "onion"),
    ("kapada", "clothes"),
    ("jutta", "shoes"),
    ("ghar", "house"),
    ("kotha", "room"),
    ("gaadi", "vehicle"),
    ("current", "electricity"),
    // Identity entries: they stop the pass before a shorter needle fires.
    ("admission fee", "admission fee"),
    ("fee", "fee"),
];

impl Default for SynonymTable {
    fn default() -> Self {
        SynonymTable {
            entries: BUILT_IN_SYNONYMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Cleans an item phrase before categorization.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    synonyms: SynonymTable,
}

impl Normalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Normalizer { synonyms }
    }

    /// Drops determiners, collapses whitespace and applies at most one
    /// synonym substitution. When a substitution fires the result is
    /// lower-cased; otherwise the original casing is kept.
    pub fn normalize(&self, phrase: &str) -> String {
        let stripped = re_determiner().replace_all(phrase.trim(), "");
        let collapsed = re_whitespace().replace_all(&stripped, " ").trim().to_string();

        let lower = collapsed.to_lowercase();
        for (needle, replacement) in &self.synonyms.entries {
            if lower.contains(needle.as_str()) {
                return lower.replace(needle.as_str(), replacement);
            }
        }
        collapsed
    }
}
