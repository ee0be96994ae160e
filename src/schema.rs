// SPDX-License-Identifier: AGPL-3.0-or-later
//! Question schema for the provisioning wizard
//!
//! The questionnaire is an ordered list of immutable descriptors. Evaluation
//! order is declaration order, and a descriptor's default, visibility, and
//! validation may only read fields declared before it. A schema test
//! enforces that no descriptor references a later field.

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerMap, AnswerValue};
use crate::config::Config;
use crate::error::{Result, SetupError};
use crate::validate::Rule;

/// Question identities used by the shipped questionnaire
pub mod keys {
    /// Operating-system image URL
    pub const OS_IMAGE: &str = "PI_OS";
    /// Primary account username
    pub const USERNAME: &str = "PI_USERNAME";
    /// Machine hostname; also names the generated keypair
    pub const HOSTNAME: &str = "PI_HOSTNAME";
    /// Length of the generated account password
    pub const PASSWORD_LENGTH: &str = "PI_PASSWORD_LENGTH";
    /// Flow control: whether WiFi questions are asked
    pub const USE_WIFI: &str = "_useWifi";
    /// WiFi network name
    pub const WIFI_SSID: &str = "PI_WIFI_SSID";
    /// WiFi password
    pub const WIFI_PASSWORD: &str = "PI_WIFI_PASSWORD";
    /// Start of the static IP range
    pub const IP_RANGE_START: &str = "PI_IP_ADDRESS_RANGE_START";
    /// End of the static IP range
    pub const IP_RANGE_END: &str = "PI_IP_ADDRESS_RANGE_END";
    /// DNS provider address pair
    pub const DNS_SERVER: &str = "PI_DNS_SERVER";
    /// Whether the container runtime is installed
    pub const INSTALL_DOCKER: &str = "PI_INSTALL_DOCKER";
    /// GPU memory split
    pub const GPU_MEMORY: &str = "PI_GPU_MEMORY";
    /// Flow control: whether notification questions are asked
    pub const EMAIL_CONFIRM: &str = "_emailConfirm";
    /// Notification provider domain
    pub const MAILGUN_DOMAIN: &str = "PI_MAILGUN_DOMAIN";
    /// Notification provider API key
    pub const MAILGUN_API_KEY: &str = "PI_MAILGUN_API_KEY";
    /// Notification recipient
    pub const EMAIL_ADDRESS: &str = "PI_EMAIL_ADDRESS";
    /// Injected by the pipeline: path of the generated public key
    pub const SSH_KEY: &str = "PI_SSH_KEY";
}

/// One selectable option of a [`QuestionKind::Select`] question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the user
    pub label: String,

    /// Value recorded when this option is picked
    pub value: AnswerValue,
}

impl Choice {
    /// Create a choice from a label and its recorded value
    pub fn new(label: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Input affordance presented for a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Free-text input
    Input,

    /// Numeric input, recorded as an integer
    Number,

    /// Single choice from a fixed list
    Select {
        /// Available options
        choices: Vec<Choice>,
    },
}

/// Default applied when the user submits an empty reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DefaultValue {
    /// A fixed value
    Literal {
        /// The default itself
        value: AnswerValue,
    },

    /// The value of an earlier answer
    FromAnswer {
        /// Key of the earlier question
        key: String,
    },
}

/// Visibility predicate over the answers collected so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Condition {
    /// An earlier boolean answer is `true`
    IsTrue {
        /// Key of the earlier question
        key: String,
    },

    /// An earlier answer exists and is non-empty
    Answered {
        /// Key of the earlier question
        key: String,
    },
}

impl Condition {
    /// Evaluate the predicate against the accumulated answers
    pub fn holds(&self, answers: &AnswerMap) -> bool {
        match self {
            Condition::IsTrue { key } => answers.get_bool(key) == Some(true),
            Condition::Answered { key } => answers
                .get(key)
                .map(|value| !value.is_empty())
                .unwrap_or(false),
        }
    }
}

/// A single prompt descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identity within the questionnaire
    pub key: String,

    /// Message shown to the user
    pub message: String,

    /// Input affordance
    pub kind: QuestionKind,

    /// Optional default applied to an empty reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    /// Optional validation rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,

    /// Optional visibility predicate; the question is skipped when it fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,

    /// Whether the answer only drives flow and is excluded from the artifact
    #[serde(default)]
    pub transient: bool,
}

impl Question {
    /// Create a free-text question
    pub fn input(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(key, message, QuestionKind::Input)
    }

    /// Create a numeric question
    pub fn number(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(key, message, QuestionKind::Number)
    }

    /// Create a single-choice question
    pub fn select(
        key: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self::new(key, message, QuestionKind::Select { choices })
    }

    fn new(key: impl Into<String>, message: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            kind,
            default: None,
            rule: None,
            visible_when: None,
            transient: false,
        }
    }

    /// Attach a fixed default
    pub fn with_default(mut self, value: impl Into<AnswerValue>) -> Self {
        self.default = Some(DefaultValue::Literal {
            value: value.into(),
        });
        self
    }

    /// Default to the value of an earlier answer
    pub fn with_default_from(mut self, key: impl Into<String>) -> Self {
        self.default = Some(DefaultValue::FromAnswer { key: key.into() });
        self
    }

    /// Attach a validation rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Ask only when the condition holds
    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visible_when = Some(condition);
        self
    }

    /// Mark the answer as flow-control only
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Whether the question should be asked given the answers so far
    pub fn is_visible(&self, answers: &AnswerMap) -> bool {
        self.visible_when
            .as_ref()
            .map(|condition| condition.holds(answers))
            .unwrap_or(true)
    }

    /// Compute the effective default against the answers so far
    pub fn effective_default(&self, answers: &AnswerMap) -> Option<AnswerValue> {
        match &self.default {
            None => None,
            Some(DefaultValue::Literal { value }) => Some(value.clone()),
            Some(DefaultValue::FromAnswer { key }) => answers.get(key).cloned(),
        }
    }

    /// Convert an accepted text reply to the recorded value
    pub fn coerce(&self, raw: &str) -> Result<AnswerValue> {
        match &self.kind {
            QuestionKind::Number => {
                raw.parse::<i64>()
                    .map(AnswerValue::Int)
                    .map_err(|_| SetupError::BadAnswer {
                        key: self.key.clone(),
                        kind: "number".to_string(),
                        input: raw.to_string(),
                    })
            }
            _ => Ok(AnswerValue::Text(raw.to_string())),
        }
    }
}

fn yes_no() -> Vec<Choice> {
    vec![Choice::new("Yes", true), Choice::new("No", false)]
}

/// Build the shipped questionnaire
///
/// Declaration order is the prompting order; cross-field references only
/// point at earlier questions.
pub fn questionnaire(config: &Config) -> Vec<Question> {
    vec![
        Question::input(keys::OS_IMAGE, "Operating system image URL")
            .with_default(config.image_url.as_str())
            .with_rule(Rule::Required),
        Question::input(keys::USERNAME, "Username for the primary account")
            .with_rule(Rule::Required),
        Question::input(keys::HOSTNAME, "Hostname for this Pi")
            .with_default_from(keys::USERNAME)
            .with_rule(Rule::Required),
        Question::number(keys::PASSWORD_LENGTH, "Generated password length")
            .with_default(32i64)
            .with_rule(Rule::all(vec![Rule::Integer, Rule::gte(8.0)])),
        Question::select(keys::USE_WIFI, "Will this Pi connect over WiFi?", yes_no())
            .transient(),
        Question::input(keys::WIFI_SSID, "WiFi network name (SSID)")
            .with_rule(Rule::Required)
            .visible_when(Condition::IsTrue {
                key: keys::USE_WIFI.to_string(),
            }),
        Question::input(keys::WIFI_PASSWORD, "WiFi password")
            .with_rule(Rule::Required)
            .visible_when(Condition::IsTrue {
                key: keys::USE_WIFI.to_string(),
            }),
        Question::input(
            keys::IP_RANGE_START,
            "Start of the static IP range (leave empty to skip)",
        )
        .with_rule(Rule::Ip),
        Question::input(keys::IP_RANGE_END, "End of the static IP range")
            .with_rule(Rule::all(vec![
                Rule::Ip,
                Rule::ip_after(keys::IP_RANGE_START),
            ]))
            .visible_when(Condition::Answered {
                key: keys::IP_RANGE_START.to_string(),
            }),
        Question::select(
            keys::DNS_SERVER,
            "DNS provider",
            vec![
                Choice::new("Cloudflare", "1.1.1.1 1.0.0.1"),
                Choice::new("Google", "8.8.8.8 8.8.4.4"),
                Choice::new("Quad9", "9.9.9.9 149.112.112.112"),
            ],
        ),
        Question::select(
            keys::INSTALL_DOCKER,
            "Install Docker?",
            vec![Choice::new("Yes", "true"), Choice::new("No", "false")],
        ),
        Question::select(
            keys::GPU_MEMORY,
            "GPU memory allocation",
            vec![
                Choice::new("Default", "default"),
                Choice::new("16 MB", "16"),
                Choice::new("64 MB", "64"),
                Choice::new("128 MB", "128"),
                Choice::new("256 MB", "256"),
            ],
        ),
        Question::select(
            keys::EMAIL_CONFIRM,
            "Send an email notification when provisioning completes?",
            yes_no(),
        )
        .transient(),
        Question::input(keys::MAILGUN_DOMAIN, "Mailgun domain")
            .with_rule(Rule::Required)
            .visible_when(Condition::IsTrue {
                key: keys::EMAIL_CONFIRM.to_string(),
            }),
        Question::input(keys::MAILGUN_API_KEY, "Mailgun API key")
            .with_rule(Rule::Required)
            .visible_when(Condition::IsTrue {
                key: keys::EMAIL_CONFIRM.to_string(),
            }),
        Question::input(keys::EMAIL_ADDRESS, "Notification email address")
            .with_rule(Rule::all(vec![Rule::Required, Rule::Email]))
            .visible_when(Condition::IsTrue {
                key: keys::EMAIL_CONFIRM.to_string(),
            }),
    ]
}
