//! Android SDK checks.

use crate::context::Context;
use crate::layout::list_names;
use crate::patch::{find_property, read_properties};
use crate::report::Report;
use crate::Result;
use std::path::{Path, PathBuf};

/// SDK subdirectories a build needs, with the component to install when missing.
const COMPONENTS: &[(&str, &str, &str)] = &[
    ("platforms", "Platforms", "Android SDK Platform"),
    ("build-tools", "Build Tools", "Android SDK Build Tools"),
    ("cmdline-tools", "Command-line Tools", "Android SDK Command-line Tools"),
];

/// Decode a Java properties value: `\\` becomes `\` and `\:` becomes `:`.
pub fn unescape_property(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Encode a path for a Java properties value.
pub fn escape_property(value: &str) -> String {
    value.replace('\\', "\\\\").replace(':', "\\:")
}

/// Places Android Studio installs the SDK by default.
fn suggested_locations(ctx: &Context) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(home) = &ctx.env.home {
        out.push(home.join("AppData").join("Local").join("Android").join("Sdk"));
        out.push(home.join("Android").join("Sdk"));
        out.push(home.join("Library").join("Android").join("sdk"));
    }
    if ctx.env.windows {
        out.push(PathBuf::from(r"C:\Android\Sdk"));
    }
    out
}

/// Check the SDK environment variables, SDK components and `local.properties`.
pub fn check_sdk(ctx: &Context) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_wallet()?;

    let mut report = Report::new(ctx.banner("Android SDK Checker"));
    report.section("Checking Android SDK environment variables...");

    let sdk = ctx.env.android_sdk();
    match sdk {
        Some(sdk) => check_sdk_dir(sdk, &mut report),
        None => {
            report
                .fail("ANDROID_HOME/ANDROID_SDK_ROOT environment variable is not set")
                .hint("Please set it to your Android SDK location");

            report.section("Possible Android SDK locations to check:");
            for location in suggested_locations(ctx) {
                if location.is_dir() {
                    report
                        .pass(format!("{} (EXISTS)", location.display()))
                        .hint("Set ANDROID_HOME to this location in your environment variables");
                } else {
                    report.info(format!("{} (not found)", location.display()));
                }
            }
        }
    }

    report.section("Checking local.properties file...");
    if layout.local_properties.is_file() {
        report.pass("local.properties file exists");
        match read_properties(&layout.local_properties) {
            Ok(text) => match find_property(&text, "sdk.dir") {
                Some(raw) => {
                    let dir = unescape_property(raw);
                    report.info(format!("SDK directory in local.properties: {}", dir));
                    if Path::new(&dir).is_dir() {
                        report.pass("SDK directory in local.properties exists");
                    } else {
                        report
                            .fail("SDK directory in local.properties does not exist")
                            .hint("Update local.properties with the correct SDK path");
                    }
                }
                None => {
                    report
                        .fail("sdk.dir property not found in local.properties")
                        .hint("Add sdk.dir=<path-to-your-android-sdk> to local.properties");
                }
            },
            Err(e) => {
                report.warn(format!("Could not read local.properties: {}", e));
            }
        }
    } else {
        let value = sdk
            .map(|p| escape_property(&p.to_string_lossy()))
            .unwrap_or_else(|| "<path-to-your-android-sdk>".to_string());
        report
            .fail("local.properties file not found")
            .hint("Create a local.properties file in the android directory with:")
            .hint(format!("sdk.dir={}", value));
    }

    report
        .next_step("Make sure Android SDK is properly installed")
        .next_step("Set ANDROID_HOME environment variable to your Android SDK location")
        .next_step("Install Android SDK Platform (API level 33 or higher), Build-Tools, Command-line Tools and Platform-Tools using Android Studio SDK Manager")
        .next_step("Create or update local.properties in the android directory")
        .next_step("Run the app again: qntmex run-android");

    Ok(report)
}

fn check_sdk_dir(sdk: &Path, report: &mut Report) {
    report.pass(format!(
        "ANDROID_HOME/ANDROID_SDK_ROOT is set to: {}",
        sdk.display()
    ));

    if !sdk.is_dir() {
        report
            .fail(format!("Android SDK directory does not exist at: {}", sdk.display()))
            .hint("Please install Android SDK or correct the environment variable");
        return;
    }
    report.pass("Android SDK directory exists");

    for (dir, label, component) in COMPONENTS {
        let path = sdk.join(dir);
        if path.is_dir() {
            let check = report.pass(format!("Android SDK {} directory exists", label));
            match list_names(&path) {
                Some(names) => check.hint(format!("Available: {}", names.join(", "))),
                None => check.hint(format!("Could not read {} directory", dir)),
            };
        } else {
            report
                .fail(format!("Android SDK {} directory not found", label))
                .hint(format!(
                    "Run Android Studio SDK Manager and install {}",
                    component
                ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::layout::Environment;
    use crate::report::Status;
    use crate::utils::ToolConfig;

    #[test]
    fn test_property_escaping() {
        assert_eq!(
            unescape_property(r"C\:\\Users\\dev\\AppData\\Local\\Android\\Sdk"),
            r"C:\Users\dev\AppData\Local\Android\Sdk"
        );
        assert_eq!(unescape_property("/opt/android-sdk"), "/opt/android-sdk");
        assert_eq!(
            escape_property(r"C:\Android\Sdk"),
            r"C\:\\Android\\Sdk"
        );
    }

    #[test]
    fn test_sdk_components_and_local_properties() {
        let dir = tempfile::tempdir().unwrap();
        let sdk = dir.path().join("sdk");
        fs::create_dir_all(sdk.join("platforms").join("android-34")).unwrap();
        fs::create_dir_all(sdk.join("build-tools").join("34.0.0")).unwrap();

        let env = Environment {
            android_home: Some(sdk.clone()),
            ..Environment::default()
        };
        let ctx = Context::new(dir.path(), env, ToolConfig::default());
        fs::create_dir_all(&ctx.layout.android).unwrap();
        fs::write(
            &ctx.layout.local_properties,
            format!("sdk.dir={}\n", escape_property(&sdk.to_string_lossy())),
        )
        .unwrap();

        let report = check_sdk(&ctx).unwrap();
        assert!(report.has(Status::Pass, "Android SDK Platforms directory exists"));
        assert!(report.has(Status::Fail, "Command-line Tools directory not found"));
        assert!(report.has(Status::Pass, "SDK directory in local.properties exists"));
        let platforms = report
            .checks()
            .find(|c| c.message.contains("Platforms"))
            .unwrap();
        assert_eq!(platforms.hints, vec!["Available: android-34".to_string()]);
    }

    #[test]
    fn test_unset_sdk_suggests_locations() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        fs::create_dir_all(home.join("Android").join("Sdk")).unwrap();
        let env = Environment {
            home: Some(home.clone()),
            ..Environment::default()
        };
        let ctx = Context::new(dir.path(), env, ToolConfig::default());
        fs::create_dir_all(&ctx.layout.wallet).unwrap();

        let report = check_sdk(&ctx).unwrap();
        assert!(report.has(Status::Fail, "environment variable is not set"));
        assert!(report.has(Status::Pass, "(EXISTS)"));
        assert!(report.has(Status::Fail, "local.properties file not found"));
    }
}
