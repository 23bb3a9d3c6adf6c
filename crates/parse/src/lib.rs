pub mod cascade;
pub mod extract;
pub mod normalize;
pub mod rules;

pub use cascade::{GrammarRule, PatternCascade};
pub use extract::{acknowledge, Extraction, TransactionExtractor, NO_EXPENSES_REPLY};
pub use normalize::{Normalizer, SynonymTable};
pub use rules::{Categorizer, KeywordEntry, KeywordTable, TableError};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No grammar rule matched: '{0}'")]
    NoMatch(String),
    #[error("No transactions found in input")]
    NoTransactionsFound,
}
