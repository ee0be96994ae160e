// SPDX-License-Identifier: AGPL-3.0-or-later
//! Scripted prompt backend
//!
//! Replays a predetermined list of replies instead of reading a terminal.
//! Used for non-interactive automation and throughout the test suite.
//! Replies are consumed in prompt order; an empty reply takes the default,
//! and a reply to a choice prompt is its 1-based list position.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::{Result, SetupError};
use crate::schema::Choice;

use super::PromptBackend;

/// Prompt backend replaying canned replies
pub struct ScriptedBackend {
    replies: VecDeque<String>,
    reported: Vec<String>,
}

impl ScriptedBackend {
    /// Create a backend over a reply list
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            reported: Vec::new(),
        }
    }

    fn next_reply(&mut self) -> Result<String> {
        self.replies.pop_front().ok_or(SetupError::PromptClosed)
    }

    /// Validation failures surfaced so far, in order
    pub fn reported(&self) -> &[String] {
        &self.reported
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

#[async_trait]
impl PromptBackend for ScriptedBackend {
    async fn input(&mut self, _message: &str, _default: Option<&str>) -> Result<String> {
        self.next_reply()
    }

    async fn select(&mut self, _message: &str, choices: &[Choice], default: usize) -> Result<usize> {
        let reply = self.next_reply()?;

        if reply.is_empty() {
            return Ok(default);
        }

        match reply.parse::<usize>() {
            Ok(number) if (1..=choices.len()).contains(&number) => Ok(number - 1),
            _ => Err(SetupError::InvalidSelection { reply }),
        }
    }

    async fn report_invalid(&mut self, message: &str) -> Result<()> {
        self.reported.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no() -> Vec<Choice> {
        vec![Choice::new("Yes", true), Choice::new("No", false)]
    }

    #[tokio::test]
    async fn test_replies_consumed_in_order() {
        let mut backend = ScriptedBackend::new(vec!["first", "second"]);
        assert_eq!(backend.input("a", None).await.unwrap(), "first");
        assert_eq!(backend.input("b", None).await.unwrap(), "second");
        assert!(matches!(
            backend.input("c", None).await,
            Err(SetupError::PromptClosed)
        ));
    }

    #[tokio::test]
    async fn test_select_replies() {
        let mut backend = ScriptedBackend::new(vec!["2", "", "7"]);
        assert_eq!(backend.select("q", &yes_no(), 0).await.unwrap(), 1);
        assert_eq!(backend.select("q", &yes_no(), 0).await.unwrap(), 0);
        assert!(matches!(
            backend.select("q", &yes_no(), 0).await,
            Err(SetupError::InvalidSelection { .. })
        ));
    }

    #[tokio::test]
    async fn test_reported_failures_collected() {
        let mut backend = ScriptedBackend::new(Vec::<String>::new());
        backend.report_invalid("Required field").await.unwrap();
        backend.report_invalid("Invalid email address").await.unwrap();
        assert_eq!(
            backend.reported(),
            ["Required field", "Invalid email address"]
        );
    }
}
