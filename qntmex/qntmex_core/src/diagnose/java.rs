//! Java toolchain checks.

use crate::context::Context;
use crate::error::ProcessError;
use crate::process::{CommandRunner, CommandSpec};
use crate::report::Report;
use crate::Result;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// A Java runtime version as printed by `java -version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaVersion {
    /// Version string as printed, e.g. `1.8.0_292` or `17.0.2`.
    pub raw: String,

    /// Feature release number: 8 for `1.8.0_292`, 17 for `17.0.2`.
    pub feature: u32,
}

impl JavaVersion {
    /// Interpret a raw version string, handling the legacy `1.x` scheme.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let mut parts = raw.split(['.', '_', '-', '+']);
        let first: u32 = parts.next()?.parse().ok()?;
        let feature = if first == 1 {
            parts.next()?.parse().ok()?
        } else {
            first
        };
        Some(Self {
            raw: raw.to_string(),
            feature,
        })
    }

    /// Extract the version from `java -version` output.
    pub fn parse_output(output: &str) -> Option<Self> {
        static VERSION: OnceLock<Regex> = OnceLock::new();
        let re = VERSION.get_or_init(|| {
            Regex::new(r#"(?i)version "([\d._]+)"#).expect("valid java version regex")
        });
        let raw = re.captures(output)?.get(1)?.as_str();
        Self::from_raw(raw)
    }
}

/// Runtime implementation, e.g. `OpenJDK Runtime Environment`.
pub fn parse_implementation(output: &str) -> Option<&str> {
    static IMPL: OnceLock<Regex> = OnceLock::new();
    let re = IMPL.get_or_init(|| {
        Regex::new(r"(?i)(?:Java\(TM\)|OpenJDK)(?:\s+SE)?\s+Runtime Environment")
            .expect("valid java runtime regex")
    });
    re.find(output).map(|m| m.as_str())
}

/// Run `java -version` and return its combined output.
pub fn probe_java(runner: &mut dyn CommandRunner) -> std::result::Result<String, ProcessError> {
    runner.capture(&CommandSpec::new("java").args(["-version"]))
}

/// A JDK or JRE found in a standard install directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledJdk {
    /// Directory name.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// Feature release guessed from the name.
    pub feature: Option<u32>,
}

/// Directories where JDKs are conventionally installed on this platform.
pub fn jdk_search_dirs(ctx: &Context) -> Vec<PathBuf> {
    let mut dirs = if ctx.env.windows {
        vec![
            PathBuf::from(r"C:\Program Files\Java"),
            PathBuf::from(r"C:\Program Files (x86)\Java"),
        ]
    } else {
        vec![
            PathBuf::from("/usr/lib/jvm"),
            PathBuf::from("/Library/Java/JavaVirtualMachines"),
        ]
    };
    if let Some(home) = &ctx.env.home {
        dirs.push(home.join(".jdks"));
    }
    dirs
}

/// List JDK/JRE directories under `dirs`. Unreadable directories are skipped.
pub fn find_installed(dirs: &[PathBuf]) -> Vec<InstalledJdk> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let number =
        NUMBER.get_or_init(|| Regex::new(r"\d+(?:[._]\d+)*").expect("valid jdk number regex"));

    let mut found = Vec::new();
    for dir in dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            continue;
        };
        let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        entries.sort();
        for path in entries {
            let name = match path.file_name() {
                Some(n) => n.to_string_lossy().into_owned(),
                None => continue,
            };
            if !path.is_dir() || !(name.contains("jdk") || name.contains("jre")) {
                continue;
            }
            let feature = number
                .find(&name)
                .and_then(|m| JavaVersion::from_raw(m.as_str()))
                .map(|v| v.feature);
            found.push(InstalledJdk {
                name,
                path,
                feature,
            });
        }
    }
    found
}

/// Add the Java version section to a report. Returns the parsed version.
pub(crate) fn report_java_version(
    runner: &mut dyn CommandRunner,
    report: &mut Report,
) -> Option<JavaVersion> {
    report.section("Checking Java version...");
    let output = match probe_java(runner) {
        Ok(output) => output,
        Err(e) => {
            log::debug!("java probe failed: {}", e);
            report
                .fail("Java is not installed or not in PATH")
                .hint("Please install the Java Development Kit (JDK) to continue")
                .hint("Download from: https://adoptium.net/ or https://www.oracle.com/java/technologies/downloads/");
            return None;
        }
    };

    let Some(version) = JavaVersion::parse_output(&output) else {
        report.warn("Could not determine Java version");
        return None;
    };

    report.info(format!(
        "Detected Java version: {} (Java {})",
        version.raw, version.feature
    ));
    if let Some(implementation) = parse_implementation(&output) {
        report.info(format!("Implementation: {}", implementation));
    }
    Some(version)
}

/// Detect the active Java version and list installed JDKs.
pub fn check_java(ctx: &Context, runner: &mut dyn CommandRunner) -> Result<Report> {
    let mut report = Report::new(ctx.banner("Java Version Checker"));

    if let Some(version) = report_java_version(runner, &mut report) {
        match version.feature {
            17 => {
                report
                    .pass("You are using Java 17, which requires the Gradle fix for MaxPermSize")
                    .hint("Run the fix: qntmex fix-java17");
            }
            11 | 8 => {
                report
                    .pass(format!(
                        "You are using Java {}, which is compatible with Android builds",
                        version.feature
                    ))
                    .hint("You can proceed with: qntmex run-with-fix");
            }
            f if f > 17 => {
                report
                    .warn("You are using a newer Java version which may not be fully compatible with the build tools")
                    .hint("Consider switching to Java 11 or 17 for better compatibility");
            }
            f => {
                report
                    .warn(format!("Java {} may have compatibility issues with the build tools", f))
                    .hint("Consider upgrading to Java 11 or 17 for better compatibility");
            }
        }
    }

    report.section("Checking for multiple Java installations...");
    let installed = find_installed(&jdk_search_dirs(ctx));
    if installed.is_empty() {
        report.info("No additional Java installations found in standard locations");
    }
    for jdk in &installed {
        let feature = jdk
            .feature
            .map(|f| f.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        report.info(format!(
            "{} (Java {}) at {}",
            jdk.name,
            feature,
            jdk.path.display()
        ));
    }
    if !installed.is_empty() {
        add_switch_hints(ctx, &mut report);
    }

    report
        .next_step("Run the Gradle fix: qntmex fix-java17")
        .next_step("Then run the Android app: qntmex run-with-fix");

    Ok(report)
}

fn add_switch_hints(ctx: &Context, report: &mut Report) {
    let check = report.info("To switch Java versions:");
    if ctx.env.windows {
        check
            .hint("Open System Properties > Advanced System Settings > Environment Variables")
            .hint("Move the desired Java bin directory to the top of Path")
            .hint("Set JAVA_HOME to the JDK root directory")
            .hint(r"For the current terminal only: set JAVA_HOME=C:\path\to\your\jdk && set PATH=%JAVA_HOME%\bin;%PATH%");
    } else {
        check
            .hint("Run: update-alternatives --display java")
            .hint("Or export JAVA_HOME=/path/to/jdk and put $JAVA_HOME/bin first on PATH");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Environment;
    use crate::process::fake::FakeRunner;
    use crate::report::Status;
    use crate::utils::ToolConfig;

    const OPENJDK_17: &str = "openjdk version \"17.0.2\" 2022-01-18\n\
        OpenJDK Runtime Environment (build 17.0.2+8-86)\n\
        OpenJDK 64-Bit Server VM (build 17.0.2+8-86, mixed mode, sharing)\n";

    const ORACLE_8: &str = "java version \"1.8.0_292\"\n\
        Java(TM) SE Runtime Environment (build 1.8.0_292-b10)\n";

    #[test]
    fn test_parse_versions() {
        let v = JavaVersion::parse_output(OPENJDK_17).unwrap();
        assert_eq!(v.raw, "17.0.2");
        assert_eq!(v.feature, 17);

        let v = JavaVersion::parse_output(ORACLE_8).unwrap();
        assert_eq!(v.raw, "1.8.0_292");
        assert_eq!(v.feature, 8);

        assert_eq!(JavaVersion::from_raw("21").unwrap().feature, 21);
        assert!(JavaVersion::parse_output("command not found").is_none());
    }

    #[test]
    fn test_parse_implementation() {
        assert_eq!(
            parse_implementation(OPENJDK_17),
            Some("OpenJDK Runtime Environment")
        );
        assert_eq!(
            parse_implementation(ORACLE_8),
            Some("Java(TM) SE Runtime Environment")
        );
    }

    #[test]
    fn test_find_installed_guesses_feature() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["java-17-openjdk-amd64", "jdk1.8.0_292", "temurin-21", "jdk-unknown"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        let found = find_installed(&[dir.path().to_path_buf(), dir.path().join("missing")]);
        let summary: Vec<(String, Option<u32>)> =
            found.into_iter().map(|j| (j.name, j.feature)).collect();
        assert_eq!(
            summary,
            vec![
                ("java-17-openjdk-amd64".to_string(), Some(17)),
                ("jdk-unknown".to_string(), None),
                ("jdk1.8.0_292".to_string(), Some(8)),
            ]
        );
    }

    #[test]
    fn test_check_java_classifies_17() {
        let ctx = Context::new("/nonexistent", Environment::default(), ToolConfig::default());
        let mut runner = FakeRunner::default().ok(OPENJDK_17);
        let report = check_java(&ctx, &mut runner).unwrap();
        assert!(report.has(Status::Info, "Detected Java version: 17.0.2 (Java 17)"));
        assert!(report.has(Status::Pass, "requires the Gradle fix"));
        assert_eq!(runner.calls[0].to_string(), "java -version");
    }

    #[test]
    fn test_check_java_missing_is_advisory() {
        let ctx = Context::new("/nonexistent", Environment::default(), ToolConfig::default());
        let mut runner = FakeRunner::default().failing("");
        let report = check_java(&ctx, &mut runner).unwrap();
        assert!(report.has(Status::Fail, "Java is not installed"));
    }
}
