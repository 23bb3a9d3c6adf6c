//! Text-generation capability and the fallback chain that puts it in front
//! of the rule engines.

pub mod config;
pub mod generator;
pub mod orchestrator;
pub mod prompts;
pub mod structured;

pub use config::{AssistantConfig, ConfigError};
pub use generator::{CapabilityError, FailingGenerator, GeminiGenerator, MockGenerator, TextGenerator};
pub use orchestrator::{
    resolve_display_name, AnswerStrategy, ChatReply, FallbackOrchestrator, ParseReply,
    ParseStrategy, StrategyError,
};
pub use structured::{decode_expenses, StructuredParse};
