// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation rules for questionnaire replies
//!
//! A rule is checked against the raw reply text *and* the answers collected
//! so far, which is what lets cross-field rules such as [`Rule::IpAfter`]
//! read a peer field. Rules compose through [`Rule::All`], which evaluates
//! its members in order and stops at the first failure.

mod checks;

pub use checks::{email, file, gte, integer, ip, required};

use std::net::Ipv4Addr;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerMap;

/// Verdict of a validation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The reply is acceptable
    Valid,

    /// The reply was rejected; the message is shown to the user
    Invalid(String),
}

impl Validation {
    /// Build a failure verdict
    pub fn fail(message: impl Into<String>) -> Self {
        Validation::Invalid(message.into())
    }

    /// Whether the verdict is [`Validation::Valid`]
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    /// The failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(message) => Some(message),
        }
    }
}

/// A validation rule attached to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Rule {
    /// Reply must be non-empty
    Required,

    /// Reply must consist of decimal digits only
    Integer,

    /// Reply must be a number of at least `threshold`
    Gte {
        /// Inclusive lower bound
        threshold: f64,
    },

    /// Reply must be empty or a well-formed email address
    Email,

    /// Reply must be empty or a well-formed IP address
    Ip,

    /// Reply must name an existing regular file
    File,

    /// Reply must be an IPv4 address strictly above the peer field's value
    IpAfter {
        /// Key of the range-start answer
        peer: String,
    },

    /// Every member rule must pass; checked in order, first failure wins
    All {
        /// Member rules
        rules: Vec<Rule>,
    },
}

impl Rule {
    /// Shorthand for [`Rule::Gte`]
    pub fn gte(threshold: f64) -> Self {
        Rule::Gte { threshold }
    }

    /// Shorthand for [`Rule::IpAfter`]
    pub fn ip_after(peer: impl Into<String>) -> Self {
        Rule::IpAfter { peer: peer.into() }
    }

    /// Shorthand for [`Rule::All`]
    pub fn all(rules: Vec<Rule>) -> Self {
        Rule::All { rules }
    }

    /// Check a reply against this rule
    ///
    /// # Arguments
    ///
    /// * `input` - Raw reply text as typed by the user
    /// * `answers` - Answers collected so far (read by cross-field rules)
    ///
    /// # Returns
    ///
    /// The verdict; for composed rules, the first failing member's verdict
    pub fn check<'a>(&'a self, input: &'a str, answers: &'a AnswerMap) -> BoxFuture<'a, Validation> {
        Box::pin(async move {
            match self {
                Rule::Required => checks::required(input),
                Rule::Integer => checks::integer(input),
                Rule::Gte { threshold } => checks::gte(input, *threshold),
                Rule::Email => checks::email(input),
                Rule::Ip => checks::ip(input),
                Rule::File => checks::file(input).await,
                Rule::IpAfter { peer } => ip_after(input, peer, answers),
                Rule::All { rules } => {
                    for rule in rules {
                        let verdict = rule.check(input, answers).await;
                        if !verdict.is_valid() {
                            return verdict;
                        }
                    }
                    Validation::Valid
                }
            }
        })
    }
}

/// Cross-field range check: the end address must lie strictly above the start
///
/// An absent peer with an absent reply means no range was configured. The
/// questionnaire runs [`Rule::Ip`] ahead of this rule, so unparseable
/// operands are reported as the comparison failure rather than a panic.
fn ip_after(input: &str, peer: &str, answers: &AnswerMap) -> Validation {
    let start = answers.get_str(peer).unwrap_or("");

    match (start.is_empty(), input.is_empty()) {
        (false, true) => Validation::fail("Start range is set - end range is required"),
        (true, true) => Validation::Valid,
        (_, false) => match (ipv4_bits(start), ipv4_bits(input)) {
            (Some(start_bits), Some(end_bits)) if end_bits > start_bits => Validation::Valid,
            _ => Validation::fail("End IP must be greater than start IP"),
        },
    }
}

fn ipv4_bits(address: &str) -> Option<u32> {
    address.parse::<Ipv4Addr>().ok().map(u32::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers_with_start(start: &str) -> AnswerMap {
        let mut answers = AnswerMap::new();
        answers.insert("PI_IP_ADDRESS_RANGE_START", start);
        answers
    }

    #[tokio::test]
    async fn test_all_short_circuits_on_first_failure() {
        let rule = Rule::all(vec![Rule::Required, Rule::Email]);
        let answers = AnswerMap::new();

        let verdict = rule.check("", &answers).await;
        assert_eq!(verdict.message(), Some("Required field"));

        let verdict = rule.check("not-an-email", &answers).await;
        assert_eq!(verdict.message(), Some("Invalid email address"));

        assert!(rule.check("a@b.com", &answers).await.is_valid());
    }

    #[tokio::test]
    async fn test_ip_after_both_absent() {
        let answers = AnswerMap::new();
        let rule = Rule::ip_after("PI_IP_ADDRESS_RANGE_START");
        assert!(rule.check("", &answers).await.is_valid());
    }

    #[tokio::test]
    async fn test_ip_after_peer_set_reply_missing() {
        let answers = answers_with_start("10.0.0.5");
        let rule = Rule::ip_after("PI_IP_ADDRESS_RANGE_START");
        let verdict = rule.check("", &answers).await;
        assert_eq!(
            verdict.message(),
            Some("Start range is set - end range is required")
        );
    }

    #[tokio::test]
    async fn test_ip_after_ordering() {
        let rule = Rule::ip_after("PI_IP_ADDRESS_RANGE_START");

        let answers = answers_with_start("10.0.0.5");
        assert!(rule.check("10.0.0.10", &answers).await.is_valid());

        let answers = answers_with_start("10.0.0.10");
        let verdict = rule.check("10.0.0.5", &answers).await;
        assert_eq!(
            verdict.message(),
            Some("End IP must be greater than start IP")
        );
    }

    #[tokio::test]
    async fn test_ip_after_rejects_equal_addresses() {
        let answers = answers_with_start("10.0.0.5");
        let rule = Rule::ip_after("PI_IP_ADDRESS_RANGE_START");
        assert!(!rule.check("10.0.0.5", &answers).await.is_valid());
    }

    #[tokio::test]
    async fn test_ip_after_crosses_octet_boundaries() {
        // 10.0.1.0 is numerically above 10.0.0.255
        let answers = answers_with_start("10.0.0.255");
        let rule = Rule::ip_after("PI_IP_ADDRESS_RANGE_START");
        assert!(rule.check("10.0.1.0", &answers).await.is_valid());
    }

    #[tokio::test]
    async fn test_composed_range_rule() {
        let rule = Rule::all(vec![
            Rule::Ip,
            Rule::ip_after("PI_IP_ADDRESS_RANGE_START"),
        ]);
        let answers = answers_with_start("10.0.0.5");

        let verdict = rule.check("not-an-ip", &answers).await;
        assert_eq!(verdict.message(), Some("Invalid IP address"));

        assert!(rule.check("10.0.0.6", &answers).await.is_valid());
    }

    #[test]
    fn test_rule_serde_form() {
        let rule: Rule = serde_json::from_str(r#"{"type":"gte","threshold":8.0}"#).unwrap();
        assert_eq!(rule, Rule::gte(8.0));

        let rule: Rule =
            serde_json::from_str(r#"{"type":"ip-after","peer":"PI_IP_ADDRESS_RANGE_START"}"#)
                .unwrap();
        assert_eq!(rule, Rule::ip_after("PI_IP_ADDRESS_RANGE_START"));
    }
}
