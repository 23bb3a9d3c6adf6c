pub mod aggregate;
pub mod context;
pub mod intent;
pub mod ledger;
pub(crate) mod util;
pub mod vocabulary;

pub use aggregate::{Aggregator, AnalysisSnapshot, CategoryTotal};
pub use context::{direct_summary, retrieval_context, NO_DATA};
pub use intent::IntentRouter;
pub use ledger::{DebtBalance, DebtLedger, Direction};
pub use vocabulary::{QueryText, QueryVocabulary, VocabularyEntry};
