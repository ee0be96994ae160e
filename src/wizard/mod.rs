// SPDX-License-Identifier: AGPL-3.0-or-later
//! Prompt engine
//!
//! The engine walks the questionnaire in declaration order, skipping
//! questions whose visibility predicate fails and re-asking a question until
//! its rule accepts the reply. Rendering and input reading live behind the
//! [`PromptBackend`] trait so the same engine drives a terminal session or a
//! scripted replay.

mod console;
mod engine;
mod script;

pub use console::ConsoleBackend;
pub use engine::Wizard;
pub use script::ScriptedBackend;

use async_trait::async_trait;

use crate::answers::AnswerMap;
use crate::error::Result;
use crate::schema::{Choice, Question};

/// Rendering and input-reading capability consumed by the engine
///
/// Backends present one prompt at a time and return the raw reply; default
/// substitution, validation, and coercion all stay in the engine.
#[async_trait]
pub trait PromptBackend: Send {
    /// Ask for a line of text; an empty reply means "take the default"
    async fn input(&mut self, message: &str, default: Option<&str>) -> Result<String>;

    /// Ask for one of `choices`, returning the picked index
    async fn select(&mut self, message: &str, choices: &[Choice], default: usize) -> Result<usize>;

    /// Surface a validation failure before the question is asked again
    async fn report_invalid(&mut self, message: &str) -> Result<()>;
}

/// Run the questionnaire on an interactive terminal
pub async fn run_console(questions: &[Question]) -> Result<AnswerMap> {
    Wizard::new(ConsoleBackend::new()).run(questions).await
}
