// SPDX-License-Identifier: AGPL-3.0-or-later
//! Leaf validators
//!
//! Each check takes the raw reply text and returns an explicit
//! [`Validation`] verdict. Optional-field checks (`email`, `ip`) accept the
//! empty string; combine them with `required` when the field is mandatory.

use std::net::IpAddr;
use std::path::Path;

use tokio::fs;

use super::Validation;

/// Reject the empty string
pub fn required(input: &str) -> Validation {
    if input.is_empty() {
        Validation::fail("Required field")
    } else {
        Validation::Valid
    }
}

/// Accept one-or-more decimal digits only
pub fn integer(input: &str) -> Validation {
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        Validation::Valid
    } else {
        Validation::fail("Input must be an integer")
    }
}

/// Accept numbers greater than or equal to `threshold`
pub fn gte(input: &str, threshold: f64) -> Validation {
    match input.parse::<f64>() {
        Err(_) => Validation::fail("Must be a number"),
        Ok(number) if number < threshold => {
            Validation::fail(format!("Must be {} or greater", threshold))
        }
        Ok(_) => Validation::Valid,
    }
}

/// Accept an empty reply or a syntactically plausible email address
pub fn email(input: &str) -> Validation {
    if input.is_empty() || is_email(input) {
        Validation::Valid
    } else {
        Validation::fail("Invalid email address")
    }
}

fn is_email(input: &str) -> bool {
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || input.contains(char::is_whitespace) {
        return false;
    }
    // The domain needs at least one dot with labels on both sides.
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Accept an empty reply or a well-formed IP address (v4 or v6)
pub fn ip(input: &str) -> Validation {
    if input.is_empty() || input.parse::<IpAddr>().is_ok() {
        Validation::Valid
    } else {
        Validation::fail("Invalid IP address")
    }
}

/// Accept a path that exists and names a regular file
pub async fn file(input: &str) -> Validation {
    let path = Path::new(input);
    match fs::metadata(path).await {
        Err(_) => Validation::fail(format!("File {} does not exist", input)),
        Ok(metadata) if !metadata.is_file() => {
            Validation::fail(format!("{} is not a file", input))
        }
        Ok(_) => Validation::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(required("pi1").is_valid());
        assert_eq!(required("").message(), Some("Required field"));
    }

    #[test]
    fn test_integer_accepts_digits_only() {
        assert!(integer("0").is_valid());
        assert!(integer("32").is_valid());
        assert!(!integer("").is_valid());
        assert!(!integer("-3").is_valid());
        assert!(!integer("3.5").is_valid());
        assert!(!integer("3a").is_valid());
        assert_eq!(integer("x").message(), Some("Input must be an integer"));
    }

    #[test]
    fn test_gte() {
        assert!(gte("8", 8.0).is_valid());
        assert!(gte("32", 8.0).is_valid());
        assert_eq!(gte("7", 8.0).message(), Some("Must be 8 or greater"));
        assert_eq!(gte("abc", 8.0).message(), Some("Must be a number"));
        assert_eq!(gte("", 8.0).message(), Some("Must be a number"));
    }

    #[test]
    fn test_email_vacuous_on_empty() {
        assert!(email("").is_valid());
    }

    #[test]
    fn test_email_syntax() {
        assert!(email("a@b.com").is_valid());
        assert!(email("first.last@sub.example.org").is_valid());
        assert!(!email("not-an-email").is_valid());
        assert!(!email("@b.com").is_valid());
        assert!(!email("a@").is_valid());
        assert!(!email("a@nodot").is_valid());
        assert!(!email("a b@c.com").is_valid());
        assert_eq!(email("nope").message(), Some("Invalid email address"));
    }

    #[test]
    fn test_ip_vacuous_on_empty() {
        assert!(ip("").is_valid());
    }

    #[test]
    fn test_ip_syntax() {
        assert!(ip("10.0.0.5").is_valid());
        assert!(ip("::1").is_valid());
        assert!(!ip("10.0.0").is_valid());
        assert!(!ip("999.0.0.1").is_valid());
        assert_eq!(ip("nope").message(), Some("Invalid IP address"));
    }

    #[tokio::test]
    async fn test_file_missing() {
        let verdict = file("/definitely/not/here").await;
        assert_eq!(
            verdict.message(),
            Some("File /definitely/not/here does not exist")
        );
    }

    #[tokio::test]
    async fn test_file_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap().to_string();
        let verdict = file(&path).await;
        assert_eq!(verdict.message(), Some(format!("{} is not a file", path).as_str()));
    }

    #[tokio::test]
    async fn test_file_accepts_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("present.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(file(path.to_str().unwrap()).await.is_valid());
    }
}
