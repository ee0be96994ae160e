// SPDX-License-Identifier: AGPL-3.0-or-later
//! Derivation pipeline
//!
//! Runs after the questionnaire completes, in two sequential stages: keypair
//! generation (the public-key path is injected into the answer map), then
//! settings-document rendering and write. Any failure aborts the run; a
//! keygen failure in particular means no settings document is written.

use std::path::PathBuf;

use tracing::info;

use crate::answers::AnswerMap;
use crate::config::Config;
use crate::error::{Result, SetupError};
use crate::keygen::{KeyGenerator, KeyPair};
use crate::schema::keys;

/// Interpreter marker heading the settings document
const INTERPRETER_LINE: &str = "#!/bin/bash";

/// Result of a completed pipeline run
#[derive(Debug)]
pub struct ProvisionOutcome {
    /// Locations of the generated keypair
    pub keypair: KeyPair,

    /// Where the settings document was (or would be) written
    pub settings_path: PathBuf,

    /// The rendered settings document
    pub document: String,
}

/// Executes the post-questionnaire derivation stages
pub struct Provisioner<G: KeyGenerator> {
    keygen: G,
    key_dir: PathBuf,
    settings_path: PathBuf,
    dry_run: bool,
}

impl<G: KeyGenerator> Provisioner<G> {
    /// Create a provisioner
    ///
    /// # Arguments
    ///
    /// * `keygen` - Keypair-generation capability
    /// * `config` - Supplies the key directory and settings path
    /// * `dry_run` - Skip the external keygen call and the filesystem write
    pub fn new(keygen: G, config: &Config, dry_run: bool) -> Self {
        Self {
            keygen,
            key_dir: config.key_dir.clone(),
            settings_path: config.settings_path.clone(),
            dry_run,
        }
    }

    /// Create the key output directory; idempotent, runs before prompting
    pub fn ensure_key_dir(&self) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        std::fs::create_dir_all(&self.key_dir)?;
        Ok(())
    }

    /// Run both derivation stages
    ///
    /// # Arguments
    ///
    /// * `answers` - Final answer map; gains a `PI_SSH_KEY` entry
    ///
    /// # Returns
    ///
    /// The outcome, or the first stage failure (later stages do not run)
    pub async fn run(&self, answers: &mut AnswerMap) -> Result<ProvisionOutcome> {
        let hostname = answers
            .get_str(keys::HOSTNAME)
            .ok_or_else(|| SetupError::MissingAnswer {
                key: keys::HOSTNAME.to_string(),
            })?
            .to_string();

        // Stage 1: keypair named after the hostname
        let location = self.key_dir.join(&hostname);
        let keypair = if self.dry_run {
            info!(location = %location.display(), "[DRY RUN] Would generate keypair");
            KeyPair::at(&location)
        } else {
            self.keygen.generate(&location, &hostname).await?
        };

        answers.insert(keys::SSH_KEY, keypair.public_key.display().to_string());

        // Stage 2: render and write the settings document
        let document = render_settings(answers);
        if self.dry_run {
            info!(
                path = %self.settings_path.display(),
                "[DRY RUN] Would write settings document"
            );
        } else {
            std::fs::write(&self.settings_path, &document)?;
            info!(path = %self.settings_path.display(), "Settings document written");
        }

        Ok(ProvisionOutcome {
            keypair,
            settings_path: self.settings_path.clone(),
            document,
        })
    }
}

/// Render the settings document from the final answer map
///
/// One `KEY="value"` assignment per non-transient entry, in original
/// insertion order, under the interpreter marker and with a trailing blank
/// line. Pure: identical maps render byte-identical documents.
pub fn render_settings(answers: &AnswerMap) -> String {
    let mut lines = vec![INTERPRETER_LINE.to_string()];
    for (key, value) in answers.public_entries() {
        lines.push(format!("{}=\"{}\"", key, value));
    }

    let mut document = lines.join("\n");
    document.push('\n');
    document.push('\n');
    document
}
