//! History file load/persist (`<script>[-<network>].json`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::history::History;
use crate::error::HistoryError;
use crate::io::write_atomic;

/// Load a history, treating a missing file as an empty one (first run).
pub fn load_history(path: &Path) -> Result<History, HistoryError> {
    match load_history_strict(path) {
        Err(HistoryError::NotFound { .. }) => {
            debug!(path = %path.display(), "no history file, starting empty");
            Ok(History::new())
        }
        other => other,
    }
}

/// Load a history that must already exist.
pub fn load_history_strict(path: &Path) -> Result<History, HistoryError> {
    debug!(path = %path.display(), "loading history");
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            HistoryError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            HistoryError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let history: History =
        serde_json::from_str(&contents).map_err(|source| HistoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(entries = history.len(), "history loaded");
    Ok(history)
}

/// Atomically replace the history file with the full `history` (temp file + rename).
pub fn write_history(path: &Path, history: &History) -> Result<(), HistoryError> {
    debug!(path = %path.display(), entries = history.len(), "writing history");
    let mut buf = serde_json::to_string_pretty(history).map_err(|source| HistoryError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    buf.push('\n');
    write_atomic(path, &buf).map_err(|source| HistoryError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// File name for a deployment script's history on a given network.
///
/// `("deploy-factory", Some("gw-devnet"))` gives `deploy-factory-gw-devnet.json`.
pub fn history_file_name(script: &str, network_suffix: Option<&str>) -> PathBuf {
    match network_suffix.filter(|suffix| !suffix.is_empty()) {
        Some(suffix) => PathBuf::from(format!("{script}-{suffix}.json")),
        None => PathBuf::from(format!("{script}.json")),
    }
}
