//! # FAQ Agent
//!
//! A knowledge-base support agent with blended fuzzy matching and an LLM
//! fallback.
//!
//! User questions are scored against a small fixed table of question/answer
//! pairs. A confident match returns the stored answer; anything else falls
//! back to an external chat model when a credential is configured, or to a
//! fixed generic reply when it is not (or when the external call fails).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌─────────────────┐
//! │   CLI    │──▶│ SupportAgent  │──▶│ Matcher          │
//! │  (faq)   │   │ answer()      │   │ normalize/score  │
//! └──────────┘   └──────┬────────┘   └─────────────────┘
//!                       │ no confident match
//!                       ▼
//!               ┌────────────────┐
//!               │ Fallback       │
//!               │ openai/disabled│
//!               └────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`text`] | Normalization and word-set tokenization |
//! | [`matcher`] | Similarity scoring and best-match selection |
//! | [`knowledge`] | The built-in question/answer table |
//! | [`fallback`] | Fallback responder trait and implementations |
//! | [`agent`] | The `answer_question` entry point |
//! | [`config`] | TOML configuration parsing |

pub mod agent;
pub mod config;
pub mod fallback;
pub mod knowledge;
pub mod matcher;
pub mod text;

pub use agent::{Answer, SupportAgent};
pub use knowledge::{default_knowledge_base, QAItem};
pub use matcher::{find_best_match, similarity_score, BestMatch, MatchParams};
