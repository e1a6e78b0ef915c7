//! Human-readable status reporting.
//!
//! Every check a command performs produces exactly one [`Check`], whatever
//! its outcome. Checks are grouped into titled sections and rendered either
//! as console lines or as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The check passed.
    Pass,
    /// The check failed; the build is likely to break.
    Fail,
    /// Something looks off but may be fine.
    Warn,
    /// Informational line, no judgement.
    Info,
    /// A repair was applied.
    Fixed,
}

impl Status {
    /// Console marker for this status.
    pub fn marker(&self) -> &'static str {
        match self {
            Status::Pass => "✓",
            Status::Fail => "✗",
            Status::Warn => "⚠",
            Status::Info => "•",
            Status::Fixed => "✅",
        }
    }
}

/// One status line plus remediation hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Outcome.
    pub status: Status,
    /// Status line.
    pub message: String,
    /// Indented guidance printed under the line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl Check {
    /// Attach a remediation hint.
    pub fn hint(&mut self, hint: impl Into<String>) -> &mut Self {
        self.hints.push(hint.into());
        self
    }
}

/// A titled group of checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section heading.
    pub title: String,
    /// Checks in the order they ran.
    pub checks: Vec<Check>,
}

/// Full output of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Banner line.
    pub title: String,
    /// When the command started.
    pub started_at: DateTime<Utc>,
    /// Sections in order.
    pub sections: Vec<Section>,
    /// Closing guidance.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
}

impl Report {
    /// Start a report with the given banner.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            started_at: Utc::now(),
            sections: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    /// Open a new section; subsequent checks land in it.
    pub fn section(&mut self, title: impl Into<String>) -> &mut Self {
        self.sections.push(Section {
            title: title.into(),
            checks: Vec::new(),
        });
        self
    }

    /// Record a check and return it for hint chaining.
    pub fn push(&mut self, status: Status, message: impl Into<String>) -> &mut Check {
        if self.sections.is_empty() {
            self.section("");
        }
        let message = message.into();
        match status {
            Status::Fail => log::warn!("{}", message),
            Status::Fixed => log::info!("{}", message),
            _ => log::debug!("{}", message),
        }
        let current = self.sections.len() - 1;
        let checks = &mut self.sections[current].checks;
        checks.push(Check {
            status,
            message,
            hints: Vec::new(),
        });
        let last = checks.len() - 1;
        &mut checks[last]
    }

    /// Shorthand for a passing check.
    pub fn pass(&mut self, message: impl Into<String>) -> &mut Check {
        self.push(Status::Pass, message)
    }

    /// Shorthand for a failing check.
    pub fn fail(&mut self, message: impl Into<String>) -> &mut Check {
        self.push(Status::Fail, message)
    }

    /// Shorthand for a warning.
    pub fn warn(&mut self, message: impl Into<String>) -> &mut Check {
        self.push(Status::Warn, message)
    }

    /// Shorthand for an informational line.
    pub fn info(&mut self, message: impl Into<String>) -> &mut Check {
        self.push(Status::Info, message)
    }

    /// Shorthand for an applied repair.
    pub fn fixed(&mut self, message: impl Into<String>) -> &mut Check {
        self.push(Status::Fixed, message)
    }

    /// Append a closing next-step line.
    pub fn next_step(&mut self, step: impl Into<String>) -> &mut Self {
        self.next_steps.push(step.into());
        self
    }

    /// All checks across sections.
    pub fn checks(&self) -> impl Iterator<Item = &Check> {
        self.sections.iter().flat_map(|s| s.checks.iter())
    }

    /// Number of checks with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.checks().filter(|c| c.status == status).count()
    }

    /// Whether any check with the given status mentions `needle`.
    pub fn has(&self, status: Status, needle: &str) -> bool {
        self.checks()
            .any(|c| c.status == status && c.message.contains(needle))
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        for section in &self.sections {
            if !section.title.is_empty() {
                writeln!(f, "\n{}", section.title)?;
            }
            for check in &section.checks {
                writeln!(f, "{} {}", check.status.marker(), check.message)?;
                for hint in &check.hints {
                    writeln!(f, "  {}", hint)?;
                }
            }
        }
        if !self.next_steps.is_empty() {
            writeln!(f, "\nNext steps:")?;
            for (i, step) in self.next_steps.iter().enumerate() {
                writeln!(f, "{}. {}", i + 1, step)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sections_and_hints() {
        let mut report = Report::new("Checker");
        report.section("Checking gradle.properties...");
        report.pass("Gradle daemon is enabled");
        report
            .fail("Socket timeout is not configured")
            .hint("Add org.gradle.internal.http.socketTimeout=120000");
        report.next_step("node run-android.js");

        let text = report.to_string();
        assert!(text.starts_with("=== Checker ===\n"));
        assert!(text.contains("\nChecking gradle.properties...\n✓ Gradle daemon is enabled\n"));
        assert!(text.contains("✗ Socket timeout is not configured\n  Add org.gradle"));
        assert!(text.ends_with("Next steps:\n1. node run-android.js\n"));
    }

    #[test]
    fn test_counts_and_lookup() {
        let mut report = Report::new("t");
        report.pass("a");
        report.fail("b missing");
        report.fail("c missing");
        assert_eq!(report.count(Status::Fail), 2);
        assert_eq!(report.count(Status::Pass), 1);
        assert!(report.has(Status::Fail, "c missing"));
        assert!(!report.has(Status::Pass, "missing"));
    }

    #[test]
    fn test_json_shape() {
        let mut report = Report::new("t");
        report.section("s").warn("careful");
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["sections"][0]["checks"][0]["status"], "warn");
        assert!(value["sections"][0]["checks"][0].get("hints").is_none());
        assert!(value.get("next_steps").is_none());
    }
}
