// SPDX-License-Identifier: AGPL-3.0-or-later
//! Terminal prompt backend

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::error::{Result, SetupError};
use crate::schema::Choice;

use super::PromptBackend;

/// Prompt backend reading replies from the terminal
pub struct ConsoleBackend {
    reader: BufReader<Stdin>,
}

impl ConsoleBackend {
    /// Create a backend over standard input
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }

    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Err(SetupError::PromptClosed);
        }
        Ok(line.trim().to_string())
    }

    fn show(prompt: &str) -> Result<()> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        Ok(())
    }
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptBackend for ConsoleBackend {
    async fn input(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) if !default.is_empty() => {
                Self::show(&format!("{} [{}]: ", message, default))?
            }
            _ => Self::show(&format!("{}: ", message))?,
        }
        self.read_line().await
    }

    async fn select(&mut self, message: &str, choices: &[Choice], default: usize) -> Result<usize> {
        println!("{}", message);
        for (index, choice) in choices.iter().enumerate() {
            println!("  {}) {}", index + 1, choice.label);
        }

        loop {
            Self::show(&format!("Select [{}]: ", default + 1))?;
            let reply = self.read_line().await?;

            if reply.is_empty() {
                return Ok(default);
            }

            match reply.parse::<usize>() {
                Ok(number) if (1..=choices.len()).contains(&number) => return Ok(number - 1),
                _ => println!("Enter a number between 1 and {}", choices.len()),
            }
        }
    }

    async fn report_invalid(&mut self, message: &str) -> Result<()> {
        println!("{}", message);
        Ok(())
    }
}
