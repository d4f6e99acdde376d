//! Submitter configuration (TOML).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::submit::DEFAULT_CONFIRMATIONS;

/// Settings a deployment passes to [`Submitter::from_config`](crate::Submitter::from_config).
///
/// Missing fields default to a single-confirmation run against
/// `transaction-history.json` that keeps existing history.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SubmitterConfig {
    /// History file bound to the submitter.
    pub history_path: PathBuf,

    /// Ignore a loaded history and start from scratch.
    pub discard_existing: bool,

    /// Confirming blocks to wait for before recording a receipt.
    pub confirmations: u32,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from("transaction-history.json"),
            discard_existing: false,
            confirmations: DEFAULT_CONFIRMATIONS,
        }
    }
}

impl SubmitterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.history_path.as_os_str().is_empty() {
            bail!("history_path must not be empty");
        }
        if self.confirmations == 0 {
            bail!("confirmations must be > 0");
        }
        Ok(())
    }
}

/// Load config from a TOML file; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<SubmitterConfig> {
    let cfg = match fs::read_to_string(path) {
        Ok(contents) => {
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
        }
        Err(err) if err.kind() == ErrorKind::NotFound => SubmitterConfig::default(),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, SubmitterConfig::default());
    }

    #[test]
    fn full_file_overrides_every_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("submitter.toml");
        fs::write(
            &path,
            "history_path = \"deploy-factory-gw-devnet.json\"\ndiscard_existing = true\nconfirmations = 3\n",
        )
        .expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(
            loaded,
            SubmitterConfig {
                history_path: PathBuf::from("deploy-factory-gw-devnet.json"),
                discard_existing: true,
                confirmations: 3,
            }
        );
    }

    #[test]
    fn mistyped_value_is_a_parse_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("submitter.toml");
        fs::write(&path, "confirmations = \"two\"\n").expect("write");
        let err = load_config(&path).expect_err("bad type");
        assert!(err.to_string().starts_with("parse "));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("submitter.toml");
        fs::write(&path, "confirmations = 2\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.confirmations, 2);
        assert_eq!(cfg.history_path, PathBuf::from("transaction-history.json"));
        assert!(!cfg.discard_existing);
    }

    #[test]
    fn zero_confirmations_is_invalid() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("submitter.toml");
        fs::write(&path, "confirmations = 0\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(err.to_string().contains("confirmations"));
    }
}
