//! Gradle configuration checks.

use crate::context::Context;
use crate::patch::{distribution_version, find_property, read_properties};
use crate::report::Report;
use crate::Result;
use regex::Regex;
use std::fs;
use std::sync::OnceLock;

fn source_dir() -> &'static Regex {
    static SOURCE_DIR: OnceLock<Regex> = OnceLock::new();
    SOURCE_DIR.get_or_init(|| {
        Regex::new(r#"sourceDir\s*:\s*['"]([^'"]+)['"]"#).expect("valid sourceDir regex")
    })
}

/// Inspect the React Native config, wrapper properties and gradle.properties.
pub fn check_gradle(ctx: &Context) -> Result<Report> {
    let layout = &ctx.layout;
    let config = &ctx.config;
    layout.require_android()?;

    let mut report = Report::new(ctx.banner("Gradle Configuration Checker"));
    report.section(format!("Root directory: {}", layout.root.display()));

    if layout.react_native_config.is_file() {
        report.section("Checking react-native.config.js...");
        let expected = format!("./{}/android", config.project_dir);
        match fs::read_to_string(&layout.react_native_config) {
            Ok(text) => match source_dir().captures(&text).and_then(|c| c.get(1)) {
                Some(dir) if dir.as_str() == expected => {
                    report.info(format!("Android sourceDir: {}", dir.as_str()));
                    report.pass("react-native.config.js is correctly configured");
                }
                found => {
                    report.info(format!(
                        "Android sourceDir: {}",
                        found.map(|m| m.as_str()).unwrap_or("undefined")
                    ));
                    report.fail(format!(
                        "react-native.config.js needs to be updated to point to {}",
                        expected
                    ));
                }
            },
            Err(e) => {
                report.warn(format!("Could not read react-native.config.js: {}", e));
            }
        }
    }

    if layout.wrapper_properties.is_file() {
        report.section("Checking gradle-wrapper.properties...");
        match read_properties(&layout.wrapper_properties) {
            Ok(text) => check_wrapper(ctx, &text, &mut report),
            Err(e) => {
                report.warn(format!("Could not read gradle-wrapper.properties: {}", e));
            }
        }
    }

    if layout.gradle_properties.is_file() {
        report.section("Checking gradle.properties...");
        match read_properties(&layout.gradle_properties) {
            Ok(text) => check_properties(&text, &mut report),
            Err(e) => {
                report.warn(format!("Could not read gradle.properties: {}", e));
            }
        }
    }

    report
        .next_step("If you're still experiencing Gradle download issues, check your internet connection")
        .next_step("Try using a VPN if your network blocks Gradle downloads")
        .next_step("You can manually download the Gradle distribution and place it in the Gradle cache")
        .next_step("Make sure your Android SDK is properly installed and configured");

    Ok(report)
}

fn check_wrapper(ctx: &Context, text: &str, report: &mut Report) {
    let recommended = &ctx.config.recommended_gradle;

    if let Some(version) = distribution_version(text) {
        report.info(format!("Gradle version: {}", version));
        if version == recommended.to_string() {
            report.pass(format!("Using compatible Gradle version {}", recommended));
        } else {
            report.fail(format!(
                "Gradle version {} may not be compatible with React Native. Consider using {}",
                version, recommended
            ));
        }
    }

    if let Some(raw) = find_property(text, "networkTimeout") {
        match raw.parse::<u64>() {
            Ok(timeout) if timeout >= ctx.config.min_network_timeout_ms => {
                report.info(format!("Network timeout: {} ms", timeout));
                report.pass("Network timeout is sufficient");
            }
            Ok(timeout) => {
                report.info(format!("Network timeout: {} ms", timeout));
                report.fail(format!(
                    "Network timeout is too low. Consider increasing to at least {} ms",
                    ctx.config.min_network_timeout_ms
                ));
            }
            Err(_) => {
                report.warn(format!("Network timeout is not a number: {}", raw));
            }
        }
    }
}

fn check_properties(text: &str, report: &mut Report) {
    if find_property(text, "org.gradle.internal.http.connectionTimeout").is_some() {
        report.pass("Connection timeout is configured");
    } else {
        report.fail("Connection timeout is not configured");
    }

    if find_property(text, "org.gradle.internal.http.socketTimeout").is_some() {
        report.pass("Socket timeout is configured");
    } else {
        report.fail("Socket timeout is not configured");
    }

    if find_property(text, "org.gradle.daemon") == Some("true") {
        report.pass("Gradle daemon is enabled");
    } else {
        report.fail("Gradle daemon is not enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Environment;
    use crate::report::Status;
    use crate::utils::ToolConfig;

    fn project() -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Environment::default(), ToolConfig::default());
        fs::create_dir_all(ctx.layout.wrapper_properties.parent().unwrap()).unwrap();
        (dir, ctx)
    }

    #[test]
    fn test_missing_android_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Environment::default(), ToolConfig::default());
        assert!(matches!(
            check_gradle(&ctx),
            Err(crate::Error::Precondition(_))
        ));
    }

    #[test]
    fn test_wrapper_version_and_timeout() {
        let (_dir, ctx) = project();
        fs::write(
            &ctx.layout.wrapper_properties,
            "distributionUrl=https\\://services.gradle.org/distributions/gradle-7.6-all.zip\nnetworkTimeout=10000\n",
        )
        .unwrap();

        let report = check_gradle(&ctx).unwrap();
        assert!(report.has(Status::Info, "Gradle version: 7.6"));
        assert!(report.has(Status::Fail, "Consider using 8.3"));
        assert!(report.has(Status::Fail, "Network timeout is too low"));
    }

    #[test]
    fn test_wrapper_version_must_match_exactly() {
        let (_dir, ctx) = project();
        fs::write(
            &ctx.layout.wrapper_properties,
            "distributionUrl=https\\://services.gradle.org/distributions/gradle-8.4-bin.zip\n",
        )
        .unwrap();
        let report = check_gradle(&ctx).unwrap();
        assert!(report.has(Status::Fail, "Gradle version 8.4 may not be compatible"));

        fs::write(
            &ctx.layout.wrapper_properties,
            "distributionUrl=https\\://services.gradle.org/distributions/gradle-8.3-all.zip\n",
        )
        .unwrap();
        let report = check_gradle(&ctx).unwrap();
        assert!(report.has(Status::Pass, "Using compatible Gradle version 8.3"));
    }

    #[test]
    fn test_gradle_properties_flags() {
        let (_dir, ctx) = project();
        fs::write(
            &ctx.layout.gradle_properties,
            "org.gradle.daemon=true\norg.gradle.internal.http.socketTimeout=120000\n",
        )
        .unwrap();

        let report = check_gradle(&ctx).unwrap();
        assert!(report.has(Status::Pass, "Gradle daemon is enabled"));
        assert!(report.has(Status::Pass, "Socket timeout is configured"));
        assert!(report.has(Status::Fail, "Connection timeout is not configured"));
    }

    #[test]
    fn test_react_native_source_dir() {
        let (_dir, ctx) = project();
        fs::write(
            &ctx.layout.react_native_config,
            "module.exports = { project: { android: { sourceDir: './qntmex-wallet/android' } } };\n",
        )
        .unwrap();
        let report = check_gradle(&ctx).unwrap();
        assert!(report.has(Status::Pass, "correctly configured"));

        fs::write(&ctx.layout.react_native_config, "module.exports = {};\n").unwrap();
        let report = check_gradle(&ctx).unwrap();
        assert!(report.has(Status::Info, "Android sourceDir: undefined"));
        assert!(report.has(Status::Fail, "needs to be updated"));
    }
}
