use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use hisab_analysis::{
    direct_summary, retrieval_context, Aggregator, DebtLedger, IntentRouter, QueryVocabulary,
};
use hisab_core::{Rupees, TimeWindowResolver, Transaction};
use hisab_parse::{acknowledge, ParseError, TransactionExtractor, NO_EXPENSES_REPLY};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AssistantConfig;
use crate::generator::{CapabilityError, GeminiGenerator, TextGenerator};
use crate::prompts::{direct_prompt, parse_prompt, retrieval_prompt};
use crate::structured::decode_expenses;

/// Why one strategy gave up.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Capability,
    Rules,
    SimpleExtraction,
}

impl ParseStrategy {
    pub const ORDER: [ParseStrategy; 3] = [
        ParseStrategy::Capability,
        ParseStrategy::Rules,
        ParseStrategy::SimpleExtraction,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStrategy {
    Retrieval,
    Direct,
    Rules,
}

impl AnswerStrategy {
    pub const ORDER: [AnswerStrategy; 3] = [
        AnswerStrategy::Retrieval,
        AnswerStrategy::Direct,
        AnswerStrategy::Rules,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReply {
    pub expenses: Vec<Transaction>,
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Runs parsing and question answering through the capability first and
/// the rule engines after it. Nothing here fails: every strategy error is
/// logged and the next strategy is tried.
pub struct FallbackOrchestrator {
    /// Parsing and the direct question prompt.
    generator: Option<Arc<dyn TextGenerator>>,
    retrieval: Option<Arc<dyn TextGenerator>>,
    extractor: TransactionExtractor,
    vocabulary: QueryVocabulary,
    ledger: DebtLedger,
    timeout: Duration,
    /// Fixed "today" for time phrases; the local date when `None`.
    reference_date: Option<NaiveDate>,
}

impl FallbackOrchestrator {
    /// Rules only.
    pub fn new(extractor: TransactionExtractor) -> Self {
        Self {
            generator: None,
            retrieval: None,
            extractor,
            vocabulary: QueryVocabulary::default(),
            ledger: DebtLedger::default(),
            timeout: AssistantConfig::default().timeout(),
            reference_date: None,
        }
    }

    /// Wires Gemini clients when the config carries an API key.
    pub fn from_config(config: &AssistantConfig, extractor: TransactionExtractor) -> Self {
        let mut orchestrator = Self::new(extractor).with_timeout(config.timeout());
        if let Some(g) = GeminiGenerator::from_config(config, &config.model) {
            orchestrator = orchestrator.with_generator(Arc::new(g));
        }
        if let Some(g) = GeminiGenerator::from_config(config, &config.retrieval_model) {
            orchestrator = orchestrator.with_retrieval(Arc::new(g));
        }
        info!(
            generator = orchestrator.generator.is_some(),
            retrieval = orchestrator.retrieval.is_some(),
            "Assistant configured"
        );
        orchestrator
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_retrieval(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.retrieval = Some(generator);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ledger(mut self, ledger: DebtLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: QueryVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.reference_date = Some(today);
        self
    }

    pub fn extractor(&self) -> &TransactionExtractor {
        &self.extractor
    }

    pub async fn parse_expenses(&self, text: &str) -> ParseReply {
        for strategy in ParseStrategy::ORDER {
            match self.try_parse(strategy, text).await {
                Ok(reply) => {
                    info!(?strategy, count = reply.expenses.len(), "Parsed expenses");
                    return reply;
                }
                Err(e) => warn!(?strategy, error = %e, "Parse strategy failed"),
            }
        }
        ParseReply {
            expenses: Vec::new(),
            reply: NO_EXPENSES_REPLY.to_string(),
        }
    }

    async fn try_parse(&self, strategy: ParseStrategy, text: &str) -> Result<ParseReply, StrategyError> {
        match strategy {
            ParseStrategy::Capability => {
                let generator = self.generator.as_deref().ok_or(CapabilityError::NotConfigured)?;
                let raw = self.generate(generator, &parse_prompt(text)).await?;
                let parsed = decode_expenses(&raw)?;
                if parsed.expenses.is_empty() {
                    return Err(ParseError::NoTransactionsFound.into());
                }
                let reply = match parsed.reply.filter(|r| !r.trim().is_empty()) {
                    Some(reply) => reply,
                    None => {
                        let total = parsed
                            .expenses
                            .iter()
                            .map(|t| t.amount)
                            .fold(0i64, i64::saturating_add);
                        format!(
                            "Added {} expenses totaling {}",
                            parsed.expenses.len(),
                            Rupees(total)
                        )
                    }
                };
                Ok(ParseReply {
                    expenses: parsed.expenses,
                    reply,
                })
            }
            ParseStrategy::Rules => {
                let extraction = self.extractor.parse(text);
                if extraction.is_empty() {
                    return Err(ParseError::NoTransactionsFound.into());
                }
                Ok(ParseReply {
                    expenses: extraction.transactions,
                    reply: extraction.reply,
                })
            }
            ParseStrategy::SimpleExtraction => {
                let tx = self.extractor.simple_extract(text)?;
                let expenses = vec![tx];
                Ok(ParseReply {
                    reply: acknowledge(&expenses),
                    expenses,
                })
            }
        }
    }

    /// `scope_label` is "personal" or "group '<name>'".
    pub async fn answer_query(
        &self,
        question: &str,
        transactions: &[Transaction],
        display_name: &str,
        scope_label: &str,
    ) -> ChatReply {
        if transactions.is_empty() {
            return ChatReply {
                reply: format!(
                    "Hi {display_name}! You don't have any {scope_label} expenses recorded yet. \
                     Start by adding some expenses to get insights!"
                ),
            };
        }

        // The direct prompt only stands in for a missing retrieval model.
        let plan = AnswerStrategy::ORDER
            .into_iter()
            .filter(|s| *s != AnswerStrategy::Direct || self.retrieval.is_none());

        for strategy in plan {
            match self
                .try_answer(strategy, question, transactions, display_name, scope_label)
                .await
            {
                Ok(reply) => {
                    info!(?strategy, "Answered question");
                    return ChatReply { reply };
                }
                Err(e) => warn!(?strategy, error = %e, "Answer strategy failed"),
            }
        }
        ChatReply {
            reply: self.rules_answer(question, transactions, display_name, scope_label),
        }
    }

    async fn try_answer(
        &self,
        strategy: AnswerStrategy,
        question: &str,
        transactions: &[Transaction],
        display_name: &str,
        scope_label: &str,
    ) -> Result<String, StrategyError> {
        match strategy {
            AnswerStrategy::Retrieval => {
                let generator = self.retrieval.as_deref().ok_or(CapabilityError::NotConfigured)?;
                let context = retrieval_context(transactions, &self.ledger);
                let prompt = retrieval_prompt(display_name, question, &context);
                Ok(self.generate(generator, &prompt).await?)
            }
            AnswerStrategy::Direct => {
                let generator = self.generator.as_deref().ok_or(CapabilityError::NotConfigured)?;
                let snapshot = Aggregator::analyze(transactions, None);
                let prompt = direct_prompt(display_name, question, &direct_summary(&snapshot, transactions));
                Ok(self.generate(generator, &prompt).await?)
            }
            AnswerStrategy::Rules => Ok(self.rules_answer(question, transactions, display_name, scope_label)),
        }
    }

    fn rules_answer(
        &self,
        question: &str,
        transactions: &[Transaction],
        display_name: &str,
        scope_label: &str,
    ) -> String {
        let resolver = match self.reference_date {
            Some(today) => TimeWindowResolver::new(today),
            None => TimeWindowResolver::today(),
        };
        let router = IntentRouter::new(self.vocabulary.clone(), resolver, self.ledger);
        let snapshot = Aggregator::analyze(transactions, None);
        let answer = router.answer(question, &snapshot, scope_label, transactions);
        format!("Hi {display_name}! {answer}")
    }

    /// One capability call under the deadline. Blank text counts as a failure.
    async fn generate(&self, generator: &dyn TextGenerator, prompt: &str) -> Result<String, CapabilityError> {
        let text = tokio::time::timeout(self.timeout, generator.generate(prompt))
            .await
            .map_err(|_| CapabilityError::Timeout(self.timeout))??;
        let text = text.trim();
        if text.is_empty() {
            return Err(CapabilityError::EmptyResponse);
        }
        debug!(len = text.len(), "Capability replied");
        Ok(text.to_string())
    }
}

/// Explicit name, else the capitalized local part of the e-mail address,
/// else "there".
pub fn resolve_display_name(user_name: Option<&str>, user_email: Option<&str>) -> String {
    if let Some(name) = user_name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    user_email
        .and_then(|e| e.split('@').next())
        .map(str::trim)
        .filter(|local| !local.is_empty())
        .map(capitalize)
        .unwrap_or_else(|| "there".to_string())
}

fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{FailingGenerator, MockGenerator};
    use async_trait::async_trait;
    use hisab_core::Category;

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, CapabilityError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn rules_only() -> FallbackOrchestrator {
        FallbackOrchestrator::new(TransactionExtractor::default())
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn expenses() -> Vec<Transaction> {
        vec![
            Transaction::new(500, "biryani", Category::Food, "Biryani").with_date("2024-03-10"),
            Transaction::new(300, "taxi", Category::Transport, "Taxi").with_date("2024-03-11"),
        ]
    }

    #[tokio::test]
    async fn capability_parse_used_as_is() {
        let mock = Arc::new(MockGenerator::new(
            r#"{"expenses":[{"amount":100,"item":"chiya","category":"Food","remarks":"Chiya"},
                            {"amount":50,"item":"bus","category":"Transport","remarks":"Bus"}]}"#,
        ));
        let o = rules_only().with_generator(mock.clone());
        let r = o.parse_expenses("100 chiya and 50 bus").await;
        assert_eq!(r.expenses.len(), 2);
        assert_eq!(r.reply, "Added 2 expenses totaling Rs.150");
        assert!(mock.prompts()[0].contains("Text: \"100 chiya and 50 bus\""));
    }

    #[tokio::test]
    async fn capability_total_saturates() {
        let mock = Arc::new(MockGenerator::new(
            r#"{"expenses":[{"amount":9223372036854775807,"item":"car","category":"Transport","remarks":"Car"},
                            {"amount":9223372036854775807,"item":"boat","category":"Transport","remarks":"Boat"}]}"#,
        ));
        let r = rules_only().with_generator(mock).parse_expenses("two big ones").await;
        assert_eq!(r.expenses.len(), 2);
        assert_eq!(r.reply, "Added 2 expenses totaling Rs.9223372036854775807");
    }

    #[tokio::test]
    async fn capability_reply_kept() {
        let mock = Arc::new(MockGenerator::new(
            r#"{"expenses":[{"amount":100,"item":"chiya","category":"Food","remarks":"Chiya"}],"reply":"Done"}"#,
        ));
        let r = rules_only().with_generator(mock).parse_expenses("100 chiya").await;
        assert_eq!(r.reply, "Done");
    }

    #[tokio::test]
    async fn parse_falls_back_to_rules() {
        for generator in [
            Arc::new(FailingGenerator) as Arc<dyn TextGenerator>,
            Arc::new(MockGenerator::new("no json here")),
            Arc::new(MockGenerator::new(r#"{"expenses":[]}"#)),
            Arc::new(MockGenerator::new("   ")),
        ] {
            let r = rules_only().with_generator(generator).parse_expenses("500 on biryani").await;
            assert_eq!(r.expenses.len(), 1);
            assert_eq!(r.expenses[0].item, "biryani");
            assert_eq!(r.reply, "Added Rs.500 → Food (Biryani)");
        }
    }

    #[tokio::test]
    async fn parse_timeout_falls_back() {
        let o = rules_only()
            .with_generator(Arc::new(SlowGenerator))
            .with_timeout(Duration::from_millis(20));
        let r = o.parse_expenses("500 on biryani").await;
        assert_eq!(r.expenses[0].amount, 500);
    }

    #[tokio::test]
    async fn parse_nothing_found() {
        let r = rules_only().parse_expenses("hello there").await;
        assert!(r.expenses.is_empty());
        assert_eq!(r.reply, NO_EXPENSES_REPLY);
    }

    #[tokio::test]
    async fn empty_transactions_short_circuit() {
        let mock = Arc::new(MockGenerator::new("should not be used"));
        let o = rules_only().with_retrieval(mock.clone());
        let r = o.answer_query("total?", &[], "Sonu", "group 'Trip'").await;
        assert_eq!(
            r.reply,
            "Hi Sonu! You don't have any group 'Trip' expenses recorded yet. \
             Start by adding some expenses to get insights!"
        );
        assert!(mock.prompts().is_empty());
    }

    #[tokio::test]
    async fn retrieval_answer_used_and_direct_skipped() {
        let retrieval = Arc::new(MockGenerator::new("Hi Sonu! Rs.500 on food."));
        let direct = Arc::new(MockGenerator::new("direct"));
        let o = rules_only()
            .with_retrieval(retrieval.clone())
            .with_generator(direct.clone());
        let r = o.answer_query("food?", &expenses(), "Sonu", "personal").await;
        assert_eq!(r.reply, "Hi Sonu! Rs.500 on food.");
        assert!(retrieval.prompts()[0].contains("Total Expenses (excluding loans): Rs.800"));

        let o = rules_only()
            .with_retrieval(Arc::new(FailingGenerator))
            .with_generator(direct.clone());
        let r = o.answer_query("how much on food", &expenses(), "Sonu", "personal").await;
        assert_eq!(r.reply, "Hi Sonu! You've spent Rs.500 on food.");
        assert!(direct.prompts().is_empty());
    }

    #[tokio::test]
    async fn direct_used_without_retrieval() {
        let direct = Arc::new(MockGenerator::new("Hi there! You spent Rs.800."));
        let o = rules_only().with_generator(direct.clone());
        let r = o.answer_query("total?", &expenses(), "there", "personal").await;
        assert_eq!(r.reply, "Hi there! You spent Rs.800.");
        assert!(direct.prompts()[0].contains("Total Expenses: Rs.800"));
    }

    #[tokio::test]
    async fn rules_answer_prefixed() {
        let r = rules_only()
            .with_generator(Arc::new(MockGenerator::new("")))
            .answer_query("total this month", &expenses(), "Sonu", "personal")
            .await;
        assert_eq!(r.reply, "Hi Sonu! You spent Rs.800 in this month across 2 transactions.");
    }

    #[test]
    fn display_names() {
        assert_eq!(resolve_display_name(Some(" Sonu "), Some("x@y.z")), "Sonu");
        assert_eq!(resolve_display_name(Some(""), Some("hARI.b@mail.com")), "Hari.b");
        assert_eq!(resolve_display_name(None, Some("@mail.com")), "there");
        assert_eq!(resolve_display_name(None, None), "there");
    }

    #[test]
    fn strategy_order() {
        assert_eq!(ParseStrategy::ORDER[0], ParseStrategy::Capability);
        assert_eq!(AnswerStrategy::ORDER[2], AnswerStrategy::Rules);
    }
}
