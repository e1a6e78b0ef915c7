//! Idempotent text patching.
//!
//! A patch is a list of [`Rule`]s applied in order to the full text of a
//! configuration file. [`patch`] is pure: it takes the content and returns the
//! new content together with the names of the rules that changed something.
//! File I/O lives in [`file`].
//!
//! Every rule is idempotent. It first tests for a marker, and once its edit
//! has been made the marker test no longer fires, so applying the same rules
//! to their own output returns that output unchanged.

pub mod file;

pub use file::{backup_path, patch_file, patch_or_create, read_properties, FileOutcome};

use crate::error::PatchError;
use crate::utils::Version;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Key of the Gradle JVM arguments property.
pub const JVM_ARGS_KEY: &str = "org.gradle.jvmargs";

/// A single textual correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Rule {
    /// Remove a `-XX:<token>=<value>` JVM argument from every line carrying it.
    StripJvmArg {
        /// Option name, e.g. `MaxPermSize`
        token: String,
    },

    /// Append `key=value` when no line defines `key`.
    DefaultProperty {
        /// Property key
        key: String,
        /// Value written when absent
        value: String,
        /// Comment line written above the new property
        comment: Option<String>,
    },

    /// Ensure `key` has exactly `value`, rewriting the line in place or appending it.
    RequireProperty {
        /// Property key
        key: String,
        /// Required value
        value: String,
        /// Comment line written above the property when appended
        comment: Option<String>,
    },

    /// Point the wrapper `distributionUrl` at another Gradle version.
    PinDistribution {
        /// Target version
        version: Version,
    },

    /// Insert a block of text once, keyed by a marker substring.
    InjectBlock {
        /// Substring whose presence means the block is already there
        marker: String,
        /// Insert right after the first occurrence of this text, if present
        anchor: Option<String>,
        /// Text to insert
        block: String,
    },
}

impl Rule {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::StripJvmArg { .. } => "strip-jvm-arg",
            Rule::DefaultProperty { .. } => "default-property",
            Rule::RequireProperty { .. } => "require-property",
            Rule::PinDistribution { .. } => "pin-distribution",
            Rule::InjectBlock { .. } => "inject-block",
        }
    }

    /// Name plus the key or token the rule targets, e.g. `require-property org.gradle.daemon`.
    pub fn describe(&self) -> String {
        let target = match self {
            Rule::StripJvmArg { token } => token.as_str(),
            Rule::DefaultProperty { key, .. } | Rule::RequireProperty { key, .. } => key.as_str(),
            Rule::PinDistribution { version } => return format!("{} {}", self.name(), version),
            Rule::InjectBlock { marker, .. } => marker.as_str(),
        };
        format!("{} {}", self.name(), target)
    }

    /// Strip a JVM argument.
    pub fn strip_jvm_arg(token: impl Into<String>) -> Self {
        Rule::StripJvmArg {
            token: token.into(),
        }
    }

    /// Add a property only when the key is missing.
    pub fn default_property(
        key: impl Into<String>,
        value: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Rule::DefaultProperty {
            key: key.into(),
            value: value.into(),
            comment: Some(comment.into()),
        }
    }

    /// Require a property to hold a specific value.
    pub fn require_property(
        key: impl Into<String>,
        value: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Rule::RequireProperty {
            key: key.into(),
            value: value.into(),
            comment: Some(comment.into()),
        }
    }

    /// Apply this rule. Returns `None` when the text is already correct.
    pub fn apply(&self, content: &str) -> Result<Option<String>, PatchError> {
        match self {
            Rule::StripJvmArg { token } => strip_jvm_arg(content, token),
            Rule::DefaultProperty {
                key,
                value,
                comment,
            } => Ok(if find_property(content, key).is_some() {
                None
            } else {
                Some(append_property(content, key, value, comment.as_deref()))
            }),
            Rule::RequireProperty {
                key,
                value,
                comment,
            } => Ok(require_property(content, key, value, comment.as_deref())),
            Rule::PinDistribution { version } => Ok(pin_distribution(content, version)),
            Rule::InjectBlock {
                marker,
                anchor,
                block,
            } => Ok(inject_block(content, marker, anchor.as_deref(), block)),
        }
    }
}

/// Result of running a rule list over some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Text after every rule ran.
    pub content: String,

    /// Descriptions of the rules that changed the text, in application order.
    pub applied: Vec<String>,
}

impl PatchOutcome {
    /// Whether any rule changed the text.
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Apply `rules` in order to `content`.
pub fn patch(content: &str, rules: &[Rule]) -> Result<PatchOutcome, PatchError> {
    let mut current = content.to_string();
    let mut applied = Vec::new();

    for rule in rules {
        if let Some(next) = rule.apply(&current)? {
            if next != current {
                log::trace!("Rule {} changed {} bytes", rule.name(), next.len());
                applied.push(rule.describe());
                current = next;
            }
        }
    }

    Ok(PatchOutcome {
        content: current,
        applied,
    })
}

/// Find the value of a `key=value` property, skipping comment lines.
pub fn find_property<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content
        .lines()
        .find_map(|line| split_property(line).filter(|(k, _)| *k == key).map(|(_, v)| v))
}

fn split_property(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') || trimmed.starts_with('!') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn append_property(content: &str, key: &str, value: &str, comment: Option<&str>) -> String {
    let mut out = String::with_capacity(content.len() + key.len() + value.len() + 64);
    out.push_str(content);
    out.push('\n');
    if let Some(comment) = comment {
        out.push_str("# ");
        out.push_str(comment);
        out.push('\n');
    }
    out.push_str(key);
    out.push('=');
    out.push_str(value);
    out.push('\n');
    out
}

fn require_property(content: &str, key: &str, value: &str, comment: Option<&str>) -> Option<String> {
    match find_property(content, key) {
        Some(current) if current == value => None,
        Some(_) => {
            let mut replaced = false;
            let out = content
                .split_inclusive('\n')
                .map(|line| {
                    if replaced || !split_property(line).is_some_and(|(k, _)| k == key) {
                        return line.to_string();
                    }
                    replaced = true;
                    let ending = line_ending(line);
                    format!("{}={}{}", key, value, ending)
                })
                .collect();
            Some(out)
        }
        None => Some(append_property(content, key, value, comment)),
    }
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

fn horizontal_runs() -> &'static Regex {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    RUNS.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("valid whitespace regex"))
}

fn strip_jvm_arg(content: &str, token: &str) -> Result<Option<String>, PatchError> {
    if !content.contains(token) {
        return Ok(None);
    }

    let flag = Regex::new(&format!(r#"[ \t]*-XX:{}=[^\s"']*"#, regex::escape(token)))
        .map_err(|e| PatchError::InvalidRule(e.to_string()))?;

    let mut changed = false;
    let out: String = content
        .split_inclusive('\n')
        .map(|line| {
            if !line.contains(token) {
                return line.to_string();
            }
            let ending = line_ending(line);
            let body = &line[..line.len() - ending.len()];

            let edited = match body.split_once('=') {
                Some((key, rest)) if key.trim() == JVM_ARGS_KEY => {
                    let value = rest.trim();
                    let separator = &rest[..rest.len() - rest.trim_start().len()];
                    strip_jvm_words(value, token)
                        .map(|value| format!("{}={}{}", key, separator, value))
                }
                _ => {
                    let edited = flag.replace_all(body, "");
                    (edited != body).then(|| {
                        horizontal_runs().replace_all(&edited, " ").trim_end().to_string()
                    })
                }
            };

            match edited {
                Some(edited) => {
                    changed = true;
                    format!("{}{}", edited, ending)
                }
                None => line.to_string(),
            }
        })
        .collect();

    Ok(changed.then_some(out))
}

/// Drop every word of a jvmargs value carrying `<token>=`, whatever its prefix.
///
/// A value wrapped in matching quotes keeps them. Returns `None` when no word
/// was dropped.
fn strip_jvm_words(value: &str, token: &str) -> Option<String> {
    let needle = format!("{}=", token);
    let quote = value
        .chars()
        .next()
        .filter(|q| matches!(*q, '"' | '\'') && value.len() > 1 && value.ends_with(*q));
    let inner = match quote {
        Some(_) => &value[1..value.len() - 1],
        None => value,
    };

    let words: Vec<&str> = inner.split_whitespace().collect();
    let kept: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !w.contains(needle.as_str()))
        .collect();
    if kept.len() == words.len() {
        return None;
    }

    let joined = kept.join(" ");
    Some(match quote {
        Some(q) => format!("{}{}{}", q, joined, q),
        None => joined,
    })
}

fn distribution_url() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r"(?m)^([ \t]*distributionUrl[ \t]*=[^\n]*/gradle-)([^/\s]+?)(-(?:all|bin)\.zip)")
            .expect("valid distribution url regex")
    })
}

/// Extract the Gradle version referenced by a wrapper `distributionUrl`.
pub fn distribution_version(content: &str) -> Option<&str> {
    distribution_url()
        .captures(content)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

fn pin_distribution(content: &str, version: &Version) -> Option<String> {
    let caps = distribution_url().captures(content)?;
    let current = caps.get(2)?;
    let target = version.to_string();
    if current.as_str() == target {
        return None;
    }

    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..current.start()]);
    out.push_str(&target);
    out.push_str(&content[current.end()..]);
    Some(out)
}

fn inject_block(content: &str, marker: &str, anchor: Option<&str>, block: &str) -> Option<String> {
    if content.contains(marker) {
        return None;
    }
    match anchor {
        Some(anchor) if content.contains(anchor) => {
            Some(content.replacen(anchor, &format!("{}{}", anchor, block), 1))
        }
        _ => Some(format!("{}{}", block, content)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> Vec<Rule> {
        vec![Rule::strip_jvm_arg("MaxPermSize")]
    }

    #[test]
    fn test_strip_worked_example() {
        let input = "org.gradle.jvmargs=-Xmx2048m -XX:MaxPermSize=512m -Dfile.encoding=UTF-8";
        let out = patch(input, &strip()).unwrap();
        assert_eq!(out.content, "org.gradle.jvmargs=-Xmx2048m -Dfile.encoding=UTF-8");
        assert_eq!(out.applied, vec!["strip-jvm-arg MaxPermSize"]);
    }

    #[test]
    fn test_strip_is_idempotent_and_keeps_other_lines() {
        let input = "# Project-wide Gradle settings.\n\
                     org.gradle.jvmargs=-XX:MaxPermSize=256m   -Xmx2048m\n\
                     android.useAndroidX=true\n";
        let first = patch(input, &strip()).unwrap();
        assert_eq!(
            first.content,
            "# Project-wide Gradle settings.\norg.gradle.jvmargs=-Xmx2048m\nandroid.useAndroidX=true\n"
        );
        let second = patch(&first.content, &strip()).unwrap();
        assert!(!second.changed());
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn test_strip_bare_token_inside_jvmargs() {
        let input = "org.gradle.jvmargs=-Xmx1g MaxPermSize=128m\n";
        let out = patch(input, &strip()).unwrap();
        assert_eq!(out.content, "org.gradle.jvmargs=-Xmx1g\n");
    }

    #[test]
    fn test_strip_keeps_quotes_balanced() {
        let input = "org.gradle.jvmargs=\"-Xmx2g -XX:MaxPermSize=512m\"\n";
        let out = patch(input, &strip()).unwrap();
        assert_eq!(out.content, "org.gradle.jvmargs=\"-Xmx2g\"\n");

        let out = patch("jvmArgs='-Xmx1g -XX:MaxPermSize=256m'\n", &strip()).unwrap();
        assert_eq!(out.content, "jvmArgs='-Xmx1g'\n");
    }

    #[test]
    fn test_strip_keeps_separator_whitespace() {
        let input = "org.gradle.jvmargs = -Xmx2g MaxPermSize=512m\n";
        let out = patch(input, &strip()).unwrap();
        assert_eq!(out.content, "org.gradle.jvmargs = -Xmx2g\n");
        assert!(!patch(&out.content, &strip()).unwrap().changed());
    }

    #[test]
    fn test_strip_leaves_comment_mentions_alone() {
        let input = "# MaxPermSize was removed in Java 8\norg.gradle.jvmargs=-Xmx1g\n";
        let out = patch(input, &strip()).unwrap();
        assert!(!out.changed());
        assert_eq!(out.content, input);
    }

    #[test]
    fn test_default_property_appends_once() {
        let rules = vec![Rule::default_property(
            JVM_ARGS_KEY,
            "-Xmx4096m",
            "JVM arguments optimized for Java 17",
        )];
        let input = "org.gradle.daemon=true\n";
        let first = patch(input, &rules).unwrap();
        assert_eq!(
            first.content,
            "org.gradle.daemon=true\n\n# JVM arguments optimized for Java 17\norg.gradle.jvmargs=-Xmx4096m\n"
        );
        let second = patch(&first.content, &rules).unwrap();
        assert_eq!(second.content, first.content);
        assert_eq!(second.content.matches("org.gradle.jvmargs=").count(), 1);
    }

    #[test]
    fn test_default_property_ignores_commented_key() {
        let rules = vec![Rule::default_property("org.gradle.parallel", "true", "parallel")];
        let out = patch("# org.gradle.parallel=false\n", &rules).unwrap();
        assert!(out.changed());
        assert_eq!(find_property(&out.content, "org.gradle.parallel"), Some("true"));
    }

    #[test]
    fn test_require_property_rewrites_in_place() {
        let rules = vec![Rule::require_property("org.gradle.daemon", "true", "daemon")];
        let input = "a=1\norg.gradle.daemon=false\r\nb=2\n";
        let out = patch(input, &rules).unwrap();
        assert_eq!(out.content, "a=1\norg.gradle.daemon=true\r\nb=2\n");
        assert!(!patch(&out.content, &rules).unwrap().changed());
    }

    #[test]
    fn test_pin_distribution_touches_only_version() {
        let input = "distributionBase=GRADLE_USER_HOME\n\
                     distributionUrl=https\\://services.gradle.org/distributions/gradle-8.3-all.zip\n\
                     networkTimeout=10000\n";
        let rules = vec![Rule::PinDistribution {
            version: Version::new(7, 6),
        }];
        let out = patch(input, &rules).unwrap();
        let before: Vec<&str> = input.lines().collect();
        let after: Vec<&str> = out.content.lines().collect();
        assert_eq!(before.len(), after.len());
        assert_eq!(before[0], after[0]);
        assert_eq!(before[2], after[2]);
        assert_eq!(
            after[1],
            "distributionUrl=https\\://services.gradle.org/distributions/gradle-7.6-all.zip"
        );
        assert!(!patch(&out.content, &rules).unwrap().changed());
    }

    #[test]
    fn test_distribution_version_handles_patch_and_bin() {
        assert_eq!(
            distribution_version("distributionUrl=https\\://x/gradle-7.5.1-bin.zip\n"),
            Some("7.5.1")
        );
        assert_eq!(distribution_version("networkTimeout=10000\n"), None);
    }

    #[test]
    fn test_inject_block_after_anchor_or_at_start() {
        let rules = vec![Rule::InjectBlock {
            marker: "repositories {".into(),
            anchor: Some("pluginManagement {".into()),
            block: "\nrepositories {\n}\n".into(),
        }];

        let with_anchor = patch("pluginManagement {\n}\n", &rules).unwrap();
        assert_eq!(with_anchor.content, "pluginManagement {\nrepositories {\n}\n\n}\n");

        let without = patch("include ':app'\n", &rules).unwrap();
        assert_eq!(without.content, "\nrepositories {\n}\ninclude ':app'\n");

        assert!(!patch(&without.content, &rules).unwrap().changed());
    }

    #[test]
    fn test_rules_compose_in_order() {
        let rules = vec![
            Rule::strip_jvm_arg("MaxPermSize"),
            Rule::default_property(JVM_ARGS_KEY, "-Xmx4096m", "jvm"),
            Rule::require_property("org.gradle.daemon", "true", "daemon"),
        ];
        let input = "org.gradle.jvmargs=-XX:MaxPermSize=1024m -Xmx2g\n";
        let first = patch(input, &rules).unwrap();
        assert_eq!(
            first.applied,
            vec!["strip-jvm-arg MaxPermSize", "require-property org.gradle.daemon"]
        );
        assert_eq!(find_property(&first.content, JVM_ARGS_KEY), Some("-Xmx2g"));
        assert_eq!(patch(&first.content, &rules).unwrap().content, first.content);
    }

    #[test]
    fn test_rule_serialization_uses_kind_tag() {
        let json = serde_json::to_string(&Rule::strip_jvm_arg("MaxPermSize")).unwrap();
        assert_eq!(json, r#"{"kind":"strip-jvm-arg","token":"MaxPermSize"}"#);
    }
}
