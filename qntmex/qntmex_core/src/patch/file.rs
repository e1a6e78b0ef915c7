//! Filesystem boundary of the patch protocol.
//!
//! Reads a target fully, runs the pure [`patch`](super::patch), and writes the
//! result back only when a rule changed something. Before the first write to
//! a target a verbatim copy is saved as `<target>.backup`, unless a backup is
//! already there: the oldest snapshot always wins.
//!
//! Properties files are read as UTF-8 when valid and as ISO-8859-1 otherwise,
//! and written back in the encoding they were read with.

use super::{patch, Rule};
use crate::error::PatchError;
use crate::log_event;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What happened to a target file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum FileOutcome {
    /// The file does not exist; nothing was written.
    NotFound,

    /// Every rule found the file already correct; nothing was written.
    Unchanged,

    /// The file was rewritten.
    Patched {
        /// Rules that changed the content, as [`Rule::describe`] prints them.
        applied: Vec<String>,

        /// Backup created by this call, if none existed before.
        backup: Option<PathBuf>,
    },

    /// The file did not exist and was created from default content.
    Created {
        /// Rules that changed the default content before it was written.
        applied: Vec<String>,
    },
}

impl FileOutcome {
    /// Whether the file on disk was written.
    pub fn wrote(&self) -> bool {
        matches!(self, FileOutcome::Patched { .. } | FileOutcome::Created { .. })
    }

    /// Whether a given rule changed the file.
    pub fn applied(&self, rule: &Rule) -> bool {
        match self {
            FileOutcome::Patched { applied, .. } | FileOutcome::Created { applied } => {
                applied.iter().any(|d| *d == rule.describe())
            }
            _ => false,
        }
    }
}

/// Character encoding a target was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Latin1,
}

impl Encoding {
    fn decode(raw: &[u8]) -> (String, Encoding) {
        match std::str::from_utf8(raw) {
            Ok(text) => (text.to_string(), Encoding::Utf8),
            Err(_) => (raw.iter().map(|&b| char::from(b)).collect(), Encoding::Latin1),
        }
    }

    /// Characters outside Latin-1 become `\uXXXX` escapes, as Java
    /// properties files expect.
    fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for c in text.chars() {
                    match u8::try_from(c) {
                        Ok(b) => out.push(b),
                        Err(_) => {
                            let mut units = [0u16; 2];
                            for unit in c.encode_utf16(&mut units) {
                                out.extend_from_slice(format!("\\u{:04X}", unit).as_bytes());
                            }
                        }
                    }
                }
                out
            }
        }
    }
}

/// Read a properties file as text, accepting ISO-8859-1 content.
pub fn read_properties(path: &Path) -> io::Result<String> {
    fs::read(path).map(|raw| Encoding::decode(&raw).0)
}

/// Path of the backup kept next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

/// Patch an existing file in place.
///
/// A missing file yields [`FileOutcome::NotFound`] and performs no write.
pub fn patch_file(path: &Path, rules: &[Rule]) -> Result<FileOutcome, PatchError> {
    if !path.is_file() {
        log_event!(LogLevel::Debug, "Target not found", path => path.display());
        return Ok(FileOutcome::NotFound);
    }

    let raw = fs::read(path).map_err(|source| PatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (content, encoding) = Encoding::decode(&raw);

    let outcome = patch(&content, rules)?;
    if !outcome.changed() {
        log_event!(LogLevel::Debug, "Target already correct", path => path.display());
        return Ok(FileOutcome::Unchanged);
    }

    let backup = write_backup_once(path, &raw)?;
    write(path, &encoding.encode(&outcome.content))?;

    log_event!(LogLevel::Info, "Patched file",
        path => path.display(),
        rules => outcome.applied.join(","),
    );

    Ok(FileOutcome::Patched {
        applied: outcome.applied,
        backup,
    })
}

/// Patch a file, creating it from `default_content` first when it is missing.
///
/// Parent directories are created as needed. A freshly created file has no
/// prior content worth preserving, so no backup is written for it.
pub fn patch_or_create(
    path: &Path,
    rules: &[Rule],
    default_content: &str,
) -> Result<FileOutcome, PatchError> {
    if path.is_file() {
        return patch_file(path, rules);
    }

    let outcome = patch(default_content, rules)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PatchError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    write(path, outcome.content.as_bytes())?;

    log_event!(LogLevel::Info, "Created file", path => path.display());

    Ok(FileOutcome::Created {
        applied: outcome.applied,
    })
}

fn write_backup_once(path: &Path, original: &[u8]) -> Result<Option<PathBuf>, PatchError> {
    let backup = backup_path(path);
    if backup.exists() {
        log_event!(LogLevel::Debug, "Keeping existing backup", path => backup.display());
        return Ok(None);
    }
    write(&backup, original)?;
    Ok(Some(backup))
}

fn write(path: &Path, content: &[u8]) -> Result<(), PatchError> {
    fs::write(path, content).map_err(|source| PatchError::Write {
        path: path.to_path_buf(),
        source,
    })
}
