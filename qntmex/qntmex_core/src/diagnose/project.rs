//! Project-level troubleshooting and setup verification.

use super::java::report_java_version;
use crate::context::Context;
use crate::process::CommandRunner;
use crate::report::Report;
use crate::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn compile_sdk() -> &'static Regex {
    static COMPILE_SDK: OnceLock<Regex> = OnceLock::new();
    COMPILE_SDK.get_or_init(|| {
        Regex::new(r"compileSdk(?:Version)?\s*=?\s*(\d+)").expect("valid compileSdk regex")
    })
}

fn ndk_version() -> &'static Regex {
    static NDK: OnceLock<Regex> = OnceLock::new();
    NDK.get_or_init(|| {
        Regex::new(r#"ndkVersion\s*=?\s*["']([^"']+)["']"#).expect("valid ndkVersion regex")
    })
}

/// Find a literal `compileSdk`/`compileSdkVersion` in Gradle build script text.
pub fn find_compile_sdk(text: &str) -> Option<u32> {
    compile_sdk()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Find the `ndkVersion` in Gradle build script text.
pub fn find_ndk_version(text: &str) -> Option<&str> {
    ndk_version()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Broad troubleshooting pass over SDK, Java, build scripts and Metro.
pub fn troubleshoot(ctx: &Context, runner: &mut dyn CommandRunner) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_android()?;

    let mut report = Report::new(ctx.banner("Advanced Android Troubleshooter"));

    report.section("Checking Android SDK environment...");
    match ctx.env.android_sdk() {
        Some(sdk) => {
            report.pass(format!(
                "ANDROID_HOME/ANDROID_SDK_ROOT is set to: {}",
                sdk.display()
            ));
            if sdk.is_dir() {
                report.pass("Android SDK directory exists");
            } else {
                report
                    .fail(format!("Android SDK directory does not exist at: {}", sdk.display()))
                    .hint("Please install Android SDK or correct the environment variable");
            }
        }
        None => {
            report
                .fail("ANDROID_HOME/ANDROID_SDK_ROOT environment variable is not set")
                .hint("Please set it to your Android SDK location");
        }
    }

    if let Some(version) = report_java_version(runner, &mut report) {
        if matches!(version.feature, 11 | 17) {
            report.pass("Using compatible Java version (11 or 17)");
        } else {
            report
                .fail("Java version may not be compatible with React Native")
                .hint("Recommended: Java 11 or 17");
        }
    }

    report.section("Checking for common build issues...");
    check_build_scripts(ctx, &mut report);

    report.section("Checking Metro bundler configuration...");
    if layout.metro_config.is_file() {
        report.pass("metro.config.js exists");
    } else {
        report.fail("metro.config.js not found, may need to create it");
    }

    report
        .next_step("Clean the project: qntmex clean-build")
        .next_step("Clear Metro bundler cache: npx react-native start --reset-cache")
        .next_step(format!(
            "Run with verbose logging: cd {} && npx expo run:android --verbose",
            ctx.config.project_dir
        ))
        .next_step("Reinstall dependencies if problems persist: npm ci")
        .next_step("Rebuild the Android project: qntmex setup-android");

    Ok(report)
}

fn read_optional(path: &Path, report: &mut Report) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            report.warn(format!("Could not read {}: {}", path.display(), e));
            None
        }
    }
}

fn check_build_scripts(ctx: &Context, report: &mut Report) {
    let layout = &ctx.layout;
    let Some(app) = read_optional(&layout.app_build_gradle, report) else {
        report.fail("app/build.gradle file not found");
        return;
    };

    // Expo templates set compileSdkVersion through rootProject.ext in the top-level script.
    let root = read_optional(&layout.build_gradle, report);
    let sdk = find_compile_sdk(&app).or_else(|| root.as_deref().and_then(find_compile_sdk));

    match sdk {
        Some(version) if version >= ctx.config.min_compile_sdk => {
            report.info(format!("compileSdkVersion: {}", version));
            report.pass("compileSdkVersion is sufficient");
        }
        Some(version) => {
            report.info(format!("compileSdkVersion: {}", version));
            report.fail(format!(
                "compileSdkVersion is too low, should be at least {}",
                ctx.config.min_compile_sdk
            ));
        }
        None => {
            report.info("compileSdkVersion is not set to a literal value");
        }
    }

    let ndk = find_ndk_version(&app).or_else(|| root.as_deref().and_then(find_ndk_version));
    if let Some(ndk) = ndk {
        report.info(format!("ndkVersion: {}", ndk));
    }
}

/// Verify the generated Android project and print run instructions.
pub fn verify(ctx: &Context) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_wallet()?;

    let mut report = Report::new(ctx.banner("Android Setup Verification"));
    report.section(format!("{} directory: {}", ctx.config.project_dir, layout.wallet.display()));

    if !layout.android.is_dir() {
        report
            .warn(format!(
                "Android directory does not exist in {} folder",
                ctx.config.project_dir
            ))
            .hint("Please run the setup first: qntmex setup-android");
    } else {
        report.pass(format!("Android directory exists at: {}", layout.android.display()));
        for (path, name) in [
            (&layout.settings_gradle, "settings.gradle"),
            (&layout.build_gradle, "build.gradle"),
        ] {
            if path.is_file() {
                report.pass(format!("{} file exists", name));
            } else {
                report.warn(format!("{} file is missing!", name));
            }
        }
    }

    report
        .next_step("Make sure you have an Android device connected or emulator running")
        .next_step("Run from the root directory: qntmex run-android")
        .next_step(format!(
            "This changes to the {} directory and runs: npx expo run:android",
            ctx.config.project_dir
        ));

    Ok(report)
}
