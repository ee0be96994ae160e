// SPDX-License-Identifier: AGPL-3.0-or-later
//! Questionnaire driver

use tracing::debug;

use crate::answers::{AnswerMap, AnswerValue};
use crate::error::{Result, SetupError};
use crate::schema::{Question, QuestionKind};
use crate::validate::Validation;

use super::PromptBackend;

/// Drives a questionnaire over a [`PromptBackend`]
pub struct Wizard<B: PromptBackend> {
    backend: B,
}

impl<B: PromptBackend> Wizard<B> {
    /// Create a wizard over the given backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Hand the backend back, consuming the wizard
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Ask every visible question in declaration order
    ///
    /// # Arguments
    ///
    /// * `questions` - The questionnaire, in prompting order
    ///
    /// # Returns
    ///
    /// The accumulated answer map; skipped questions leave no entry
    pub async fn run(&mut self, questions: &[Question]) -> Result<AnswerMap> {
        let mut answers = AnswerMap::new();

        for question in questions {
            if !question.is_visible(&answers) {
                debug!(key = %question.key, "Question skipped by visibility predicate");
                continue;
            }

            let value = self.ask(question, &answers).await?;
            debug!(key = %question.key, value = %value, "Answer recorded");

            if question.transient {
                answers.insert_transient(question.key.clone(), value);
            } else {
                answers.insert(question.key.clone(), value);
            }
        }

        Ok(answers)
    }

    /// Ask one question, looping until its rule accepts the reply
    async fn ask(&mut self, question: &Question, answers: &AnswerMap) -> Result<AnswerValue> {
        if let QuestionKind::Select { choices } = &question.kind {
            let index = self.backend.select(&question.message, choices, 0).await?;
            let choice = choices.get(index).ok_or(SetupError::InvalidSelection {
                reply: index.to_string(),
            })?;
            return Ok(choice.value.clone());
        }

        let default = question
            .effective_default(answers)
            .map(|value| value.to_string());

        loop {
            let typed = self
                .backend
                .input(&question.message, default.as_deref())
                .await?;

            let raw = if typed.is_empty() {
                default.clone().unwrap_or_default()
            } else {
                typed
            };

            let verdict = match &question.rule {
                Some(rule) => rule.check(&raw, answers).await,
                None => Validation::Valid,
            };

            if let Some(message) = verdict.message() {
                self.backend.report_invalid(message).await?;
                continue;
            }

            match question.coerce(&raw) {
                Ok(value) => return Ok(value),
                Err(error) => {
                    self.backend.report_invalid(&error.to_string()).await?;
                }
            }
        }
    }
}
