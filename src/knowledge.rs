//! The built-in knowledge base: question/answer pairs the agent can answer
//! without consulting the fallback model.
//!
//! The table is configuration data, not logic. It covers the product's three
//! automation agents (EVA, CAM, PHIL) plus a summary and a benefits entry.
//! Extra entries may be appended from `[[knowledge]]` blocks in the config
//! file; built-ins come first so they win score ties.

use crate::config::Config;

/// One question/answer pair. Immutable after load; both strings non-empty.
#[derive(Debug, Clone)]
pub struct QAItem {
    pub question: String,
    pub answer: String,
}

/// The built-in question/answer table, in fixed order.
const BUILTIN_ENTRIES: [(&str, &str); 5] = [
    (
        "What does the eligibility verification agent (EVA) do?",
        "EVA automates the process of verifying a patient’s eligibility and benefits \
         information in real-time, eliminating manual data entry errors and reducing \
         claim rejections.",
    ),
    (
        "What does the claims processing agent (CAM) do?",
        "CAM streamlines the submission and management of claims, improving \
         accuracy, reducing manual intervention, and accelerating reimbursements.",
    ),
    (
        "How does the payment posting agent (PHIL) work?",
        "PHIL automates the posting of payments to patient accounts, ensuring fast, \
         accurate reconciliation of payments and reducing administrative burden.",
    ),
    (
        "Tell me about Thoughtful AI's Agents.",
        "Thoughtful AI provides a suite of AI-powered automation agents designed to \
         streamline healthcare processes. These include Eligibility Verification \
         (EVA), Claims Processing (CAM), and Payment Posting (PHIL), among others.",
    ),
    (
        "What are the benefits of using Thoughtful AI's agents?",
        "Using Thoughtful AI's Agents can significantly reduce administrative costs, \
         improve operational efficiency, and reduce errors in critical processes \
         like claims management and payment posting.",
    ),
];

/// The built-in knowledge base as owned items.
pub fn default_knowledge_base() -> Vec<QAItem> {
    BUILTIN_ENTRIES
        .iter()
        .map(|(question, answer)| QAItem {
            question: question.to_string(),
            answer: answer.to_string(),
        })
        .collect()
}

/// Built-in entries followed by any `[[knowledge]]` entries from config.
pub fn knowledge_base_from_config(config: &Config) -> Vec<QAItem> {
    let mut items = default_knowledge_base();
    items.extend(config.knowledge.iter().map(|entry| QAItem {
        question: entry.question.clone(),
        answer: entry.answer.clone(),
    }));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_shape() {
        let kb = default_knowledge_base();
        assert_eq!(kb.len(), 5);
        for item in &kb {
            assert!(!item.question.is_empty());
            assert!(!item.answer.is_empty());
        }
    }

    #[test]
    fn test_builtin_order_is_stable() {
        let kb = default_knowledge_base();
        assert!(kb[0].question.contains("EVA"));
        assert!(kb[1].question.contains("CAM"));
        assert!(kb[2].question.contains("PHIL"));
    }

    #[test]
    fn test_config_entries_append_after_builtins() {
        let mut config = Config::default();
        config.knowledge.push(crate::config::KnowledgeEntry {
            question: "What is the support email?".to_string(),
            answer: "support@example.com".to_string(),
        });
        let kb = knowledge_base_from_config(&config);
        assert_eq!(kb.len(), 6);
        assert_eq!(kb[5].question, "What is the support email?");
    }
}
