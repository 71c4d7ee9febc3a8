//! The support agent: knowledge-base matching with a fallback boundary.
//!
//! [`SupportAgent`] ties the pieces together. Matching is pure and
//! synchronous; only the fallback consultation is async. `answer` is
//! infallible by design — every responder failure is logged and downgraded
//! to [`GENERIC_REPLY`](crate::fallback::GENERIC_REPLY), so adversarial or
//! offline conditions never surface as errors to the caller.

use serde::Serialize;

use crate::config::Config;
use crate::fallback::{create_responder, FallbackResponder, GENERIC_REPLY};
use crate::knowledge::{knowledge_base_from_config, QAItem};
use crate::matcher::{find_best_match, MatchParams};

/// The reply to one user question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// The answer text shown to the user.
    pub text: String,
    /// True when the text came from the knowledge base rather than fallback.
    pub matched: bool,
    /// Best similarity score seen, whether or not it cleared the threshold.
    pub score: f64,
}

/// Answers questions from the knowledge base, consulting the fallback
/// responder when no entry scores confidently.
pub struct SupportAgent {
    knowledge: Vec<QAItem>,
    params: MatchParams,
    responder: Box<dyn FallbackResponder>,
}

impl SupportAgent {
    /// Assemble an agent from parts. Used by tests and embedders that want
    /// to inject a custom responder.
    pub fn new(
        knowledge: Vec<QAItem>,
        params: MatchParams,
        responder: Box<dyn FallbackResponder>,
    ) -> Self {
        Self {
            knowledge,
            params,
            responder,
        }
    }

    /// Wire up an agent from application config: built-in plus configured
    /// knowledge entries, `[matching]` params, and the configured responder.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            knowledge_base_from_config(config),
            config.matching.to_params(),
            create_responder(&config.fallback)?,
        ))
    }

    /// The knowledge base this agent answers from, in match order.
    pub fn knowledge(&self) -> &[QAItem] {
        &self.knowledge
    }

    /// Scoring parameters in effect.
    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Answer one question.
    ///
    /// A confident knowledge-base match returns the stored answer. Otherwise
    /// the fallback responder is consulted; any error there is swallowed and
    /// replaced with the generic reply. The reported score is the best score
    /// seen either way.
    pub async fn answer(&self, question: &str) -> Answer {
        let best = find_best_match(question, &self.knowledge, &self.params);

        if let Some(item) = best.item {
            return Answer {
                text: item.answer.clone(),
                matched: true,
                score: best.score,
            };
        }

        let text = match self.responder.reply(question).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(
                    responder = self.responder.name(),
                    error = %err,
                    "fallback responder failed, using generic reply"
                );
                GENERIC_REPLY.to_string()
            }
        };

        Answer {
            text,
            matched: false,
            score: best.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::default_knowledge_base;
    use anyhow::bail;
    use async_trait::async_trait;

    struct CannedResponder(&'static str);

    #[async_trait]
    impl FallbackResponder for CannedResponder {
        fn name(&self) -> &str {
            "canned"
        }
        async fn reply(&self, _question: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingResponder;

    #[async_trait]
    impl FallbackResponder for FailingResponder {
        fn name(&self) -> &str {
            "failing"
        }
        async fn reply(&self, _question: &str) -> anyhow::Result<String> {
            bail!("service unreachable")
        }
    }

    fn agent_with(responder: Box<dyn FallbackResponder>) -> SupportAgent {
        SupportAgent::new(default_knowledge_base(), MatchParams::default(), responder)
    }

    #[tokio::test]
    async fn test_confident_match_uses_knowledge_base() {
        let agent = agent_with(Box::new(FailingResponder));
        let answer = agent.answer("Can you tell me what EVA does?").await;
        assert!(answer.matched);
        assert!(answer.score > 0.40);
        assert!(answer.text.contains("verifying a patient"));
    }

    #[tokio::test]
    async fn test_unmatched_question_consults_responder() {
        let agent = agent_with(Box::new(CannedResponder("It rains a lot.")));
        let answer = agent.answer("What's the weather in Boston?").await;
        assert!(!answer.matched);
        assert!(answer.score < 0.40);
        assert_eq!(answer.text, "It rains a lot.");
    }

    #[tokio::test]
    async fn test_responder_failure_degrades_to_generic_reply() {
        let agent = agent_with(Box::new(FailingResponder));
        let answer = agent.answer("What's the weather in Boston?").await;
        assert!(!answer.matched);
        assert_eq!(answer.text, GENERIC_REPLY);
    }

    #[tokio::test]
    async fn test_acronym_only_question_falls_back() {
        let agent = agent_with(Box::new(FailingResponder));
        let answer = agent.answer("What is EVA pricing?").await;
        assert!(!answer.matched);
        assert!(answer.score < 0.40);
        assert_eq!(answer.text, GENERIC_REPLY);
    }

    #[tokio::test]
    async fn test_empty_knowledge_base_never_matches() {
        let agent = SupportAgent::new(
            Vec::new(),
            MatchParams::default(),
            Box::new(CannedResponder("fallback")),
        );
        let answer = agent.answer("anything at all").await;
        assert!(!answer.matched);
        assert_eq!(answer.score, 0.0);
        assert_eq!(answer.text, "fallback");
    }
}
