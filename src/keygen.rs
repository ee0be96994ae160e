// SPDX-License-Identifier: AGPL-3.0-or-later
//! Keypair generation
//!
//! Key generation is a consumed capability behind the [`KeyGenerator`]
//! trait; the production implementation shells out to `ssh-keygen`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::error::{Result, SetupError};

/// Filesystem locations of a generated keypair
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    /// Private key location
    pub private_key: PathBuf,

    /// Derived public key location (`<private>.pub`)
    pub public_key: PathBuf,
}

impl KeyPair {
    /// Derive both paths from the private key location
    pub fn at(location: &Path) -> Self {
        let mut public = OsString::from(location.as_os_str());
        public.push(".pub");
        Self {
            private_key: location.to_path_buf(),
            public_key: PathBuf::from(public),
        }
    }
}

/// Capability producing a keypair at a requested location
#[async_trait]
pub trait KeyGenerator: Send + Sync {
    /// Generate a keypair
    ///
    /// # Arguments
    ///
    /// * `location` - Private key path; the public key lands at `<location>.pub`
    /// * `comment` - Comment embedded in the key
    async fn generate(&self, location: &Path, comment: &str) -> Result<KeyPair>;
}

/// Production generator invoking the `ssh-keygen` tool
pub struct SshKeygen {
    key_type: String,
}

impl SshKeygen {
    /// Create a generator for the given key type (e.g. `ed25519`)
    pub fn new(key_type: impl Into<String>) -> Self {
        Self {
            key_type: key_type.into(),
        }
    }
}

#[async_trait]
impl KeyGenerator for SshKeygen {
    async fn generate(&self, location: &Path, comment: &str) -> Result<KeyPair> {
        let pair = KeyPair::at(location);

        if pair.private_key.exists() {
            return Err(SetupError::KeygenFailed {
                comment: comment.to_string(),
                message: format!("{} already exists", pair.private_key.display()),
            });
        }

        info!(
            location = %location.display(),
            key_type = %self.key_type,
            "Generating keypair"
        );

        let output = Command::new("ssh-keygen")
            .arg("-q")
            .arg("-t")
            .arg(&self.key_type)
            .arg("-N")
            .arg("")
            .arg("-C")
            .arg(comment)
            .arg("-f")
            .arg(location)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|error| SetupError::KeygenFailed {
                comment: comment.to_string(),
                message: format!("Failed to run ssh-keygen: {}", error),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(SetupError::KeygenFailed {
                comment: comment.to_string(),
                message: format!("ssh-keygen exited with {}: {}", output.status, stderr),
            });
        }

        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ssh_keygen_available() -> bool {
        std::process::Command::new("ssh-keygen")
            .arg("-?")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    #[test]
    fn test_public_key_path_appends_suffix() {
        let pair = KeyPair::at(Path::new("/tmp/keys/pi1"));
        assert_eq!(pair.private_key, PathBuf::from("/tmp/keys/pi1"));
        assert_eq!(pair.public_key, PathBuf::from("/tmp/keys/pi1.pub"));
    }

    #[test]
    fn test_public_key_path_keeps_dotted_names() {
        // A hostname with a dot must not lose its tail to extension handling
        let pair = KeyPair::at(Path::new("/tmp/keys/pi.lan"));
        assert_eq!(pair.public_key, PathBuf::from("/tmp/keys/pi.lan.pub"));
    }

    #[tokio::test]
    async fn test_generate_writes_both_keys() {
        if !ssh_keygen_available() {
            eprintln!("ssh-keygen not available, skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("pi1");

        let generator = SshKeygen::new("ed25519");
        let pair = generator.generate(&location, "pi1").await.unwrap();

        assert!(pair.private_key.is_file());
        assert!(pair.public_key.is_file());
        let public = std::fs::read_to_string(&pair.public_key).unwrap();
        assert!(public.trim_end().ends_with("pi1"));
    }

    #[tokio::test]
    async fn test_generate_refuses_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("pi1");
        std::fs::write(&location, "occupied").unwrap();

        let generator = SshKeygen::new("ed25519");
        let result = generator.generate(&location, "pi1").await;
        assert!(matches!(result, Err(SetupError::KeygenFailed { .. })));
    }
}
