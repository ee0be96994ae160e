// SPDX-License-Identifier: AGPL-3.0-or-later
//! pi-provision: interactive provisioning wizard for headless Pi deployments
//!
//! Walks an operator through an ordered questionnaire, validating and
//! cross-validating replies, then derives the provisioning artifacts: a
//! keypair named after the chosen hostname and a flat `KEY="value"` settings
//! script consumed by the downstream provisioning scripts.
//!
//! # Components
//!
//! * **Schema:** ordered question descriptors with defaults, visibility
//!   predicates, and validation rules
//! * **Wizard:** the prompt engine, generic over a [`wizard::PromptBackend`]
//! * **Provisioner:** the post-questionnaire derivation pipeline

pub mod answers;
pub mod config;
pub mod error;
pub mod keygen;
pub mod provision;
pub mod schema;
pub mod validate;
pub mod wizard;

pub use answers::{AnswerMap, AnswerValue};
pub use config::Config;
pub use error::{Result, SetupError};
