//! Repairs that modify the project, the global Gradle tree, or run build tools.
//!
//! Fixers share one shape: check preconditions, run idempotent patches through
//! [`patch_file`](crate::patch::patch_file), report one line per outcome, and
//! keep going when a single target fails. Only a missing project directory
//! aborts a fixer.

pub mod android;
pub mod clean;
pub mod properties;
pub mod wrapper;

pub use android::{run_android, run_with_fix, setup_android};
pub use clean::{clean_build, clean_cache};
pub use properties::{fix_daemon, fix_java17, fix_jvm};
pub use wrapper::{fix_settings, fix_version};

use crate::error::PatchError;
use crate::patch::{FileOutcome, Rule, JVM_ARGS_KEY};
use crate::report::Report;
use crate::utils::ToolConfig;
use std::fs;
use std::path::Path;

/// Header written to a global `gradle.properties` created by a fixer.
pub const CREATED_HEADER: &str = "# Gradle properties\n# Created by QNTMEX Wallet fix script\n";

/// Rules that make a properties file safe for Java 17: drop the banned
/// argument, and supply default JVM arguments when none are set.
pub fn jvm_rules(config: &ToolConfig) -> Vec<Rule> {
    vec![
        Rule::strip_jvm_arg(&config.banned_jvm_arg),
        Rule::default_property(
            JVM_ARGS_KEY,
            &config.default_jvm_args,
            "JVM arguments optimized for Java 17",
        ),
    ]
}

/// A rule paired with the line reported when it changes a file.
pub(crate) struct Step {
    pub rule: Rule,
    pub message: String,
}

impl Step {
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Report a patch result. Returns the outcome, or `None` when the patch failed.
pub(crate) fn report_outcome(
    report: &mut Report,
    path: &Path,
    result: Result<FileOutcome, PatchError>,
) -> Option<FileOutcome> {
    match result {
        Ok(outcome) => {
            match &outcome {
                FileOutcome::NotFound => {
                    report.info(format!("File not found: {}", path.display()));
                }
                FileOutcome::Unchanged => {
                    report.pass(format!("{} already correct", path.display()));
                }
                FileOutcome::Patched { backup, .. } => {
                    let check = report.fixed(format!("Updated {}", path.display()));
                    if let Some(backup) = backup {
                        check.hint(format!("Created backup at: {}", backup.display()));
                    }
                }
                FileOutcome::Created { .. } => {
                    report.fixed(format!("Created {}", path.display()));
                }
            }
            Some(outcome)
        }
        Err(e) => {
            report.warn(e.to_string());
            None
        }
    }
}

/// Report one line per step that changed the file.
pub(crate) fn report_steps(report: &mut Report, outcome: &FileOutcome, steps: &[Step]) {
    for step in steps {
        if outcome.applied(&step.rule) {
            report.fixed(step.message.as_str());
        }
    }
}

/// Remove a directory tree, reporting the result. Returns whether it was removed.
pub(crate) fn remove_dir(report: &mut Report, path: &Path, label: &str) -> bool {
    if !path.exists() {
        report.info(format!("{} does not exist, nothing to clean", label));
        return false;
    }
    match fs::remove_dir_all(path) {
        Ok(()) => {
            report.fixed(format!("Removed {}: {}", label, path.display()));
            true
        }
        Err(e) => {
            report
                .warn(format!("Error removing {}: {}", path.display(), e))
                .hint("You may need to delete it manually or stop running Gradle daemons first");
            false
        }
    }
}
