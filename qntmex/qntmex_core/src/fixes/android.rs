//! Expo prebuild and app launch.

use super::properties::{global_jvm_steps, patch_global, patch_project};
use super::CREATED_HEADER;
use crate::context::Context;
use crate::process::{CommandRunner, CommandSpec};
use crate::report::Report;
use crate::Result;

/// React Native version whose reinstall restores `native_modules.gradle`.
const REACT_NATIVE_VERSION: &str = "0.72.10";

fn expo(ctx: &Context, args: &[&str]) -> CommandSpec {
    CommandSpec::npx()
        .args(["expo"])
        .args(args.iter().copied())
        .current_dir(&ctx.layout.wallet)
}

/// Generate the Android project with Expo when it is missing.
pub fn setup_android(ctx: &Context, runner: &mut dyn CommandRunner) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_wallet()?;

    let mut report = Report::new(ctx.banner("Android Setup"));
    report.section("Checking Android project...");

    if layout.android.is_dir() {
        report.info(format!(
            "Android directory already exists at: {}",
            layout.android.display()
        ));
    } else {
        report.info("Android directory does not exist, initializing it with Expo prebuild");
        let prebuild = expo(ctx, &["prebuild", "--platform", "android"]);
        match runner.run_streaming(&prebuild) {
            Ok(()) => {
                report.fixed("Android project created successfully");
            }
            Err(e) => {
                report
                    .fail(format!("Error creating Android project: {}", e))
                    .hint(format!("Navigate to the wallet directory: cd {}", ctx.config.project_dir))
                    .hint("Run: npx expo prebuild --platform android");
            }
        }
    }

    report.section("Checking native_modules.gradle...");
    if layout.native_modules_gradle.is_file() {
        report.pass(format!(
            "native_modules.gradle exists at: {}",
            layout.native_modules_gradle.display()
        ));
    } else {
        report
            .warn("native_modules.gradle is still missing")
            .hint("Try reinstalling React Native:")
            .hint("npm uninstall react-native")
            .hint(format!("npm install react-native@{}", REACT_NATIVE_VERSION));
    }

    report.next_step("Run the project: qntmex run-android");
    Ok(report)
}

fn launch(ctx: &Context, runner: &mut dyn CommandRunner, report: &mut Report) -> Option<String> {
    report.section("Starting Android app...");
    report.info("This may take a few minutes. Please be patient.");
    match runner.run_streaming(&expo(ctx, &["run:android"])) {
        Ok(()) => {
            report.pass("Android app started");
            None
        }
        Err(e) => {
            let message = e.to_string();
            report.fail(format!("Error running Android app: {}", message));
            Some(message)
        }
    }
}

fn general_hints(report: &mut Report) {
    report
        .next_step("Make sure you have Android Studio installed and configured")
        .next_step("Ensure you have an Android device connected or emulator running")
        .next_step("Run the setup again: qntmex setup-android")
        .next_step("Check that your Android SDK is properly configured: qntmex check-sdk");
}

/// Build and launch the app with `npx expo run:android`.
pub fn run_android(ctx: &Context, runner: &mut dyn CommandRunner) -> Result<Report> {
    ctx.layout.require_android()?;

    let mut report = Report::new(ctx.banner("Android Runner"));
    if launch(ctx, runner, &mut report).is_some() {
        general_hints(&mut report);
    }
    Ok(report)
}

/// Apply the JVM argument fix globally and to the project, then launch the app.
pub fn run_with_fix(ctx: &Context, runner: &mut dyn CommandRunner) -> Result<Report> {
    ctx.layout.require_android()?;

    let mut report = Report::new(ctx.banner("Android Runner with Gradle Fix"));
    report.section("Fixing Gradle JVM arguments issue...");
    patch_global(ctx, &mut report, &global_jvm_steps(ctx), CREATED_HEADER);

    report.section("Checking project gradle.properties...");
    patch_project(ctx, &mut report, Vec::new());

    let Some(error) = launch(ctx, runner, &mut report) else {
        return Ok(report);
    };

    let token = &ctx.config.banned_jvm_arg;
    if error.contains(token.as_str()) {
        let daemon = ctx
            .layout
            .gradle_home
            .as_ref()
            .map(|g| g.daemon.display().to_string())
            .unwrap_or_else(|| "~/.gradle/daemon".to_string());
        report
            .next_step(format!(
                "The {} error is still occurring. Delete {} to force a new daemon",
                token, daemon
            ))
            .next_step("Restart your computer to ensure all Gradle daemons are stopped")
            .next_step("Try using Java 11 instead of Java 17 if problems persist");
    } else {
        general_hints(&mut report);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Environment;
    use crate::patch::{find_property, JVM_ARGS_KEY};
    use crate::process::fake::FakeRunner;
    use crate::report::Status;
    use crate::utils::ToolConfig;
    use std::fs;
    use std::path::Path;

    fn context(root: &Path) -> Context {
        let env = Environment {
            home: Some(root.join("home")),
            ..Environment::default()
        };
        Context::new(root, env, ToolConfig::default())
    }

    #[test]
    fn test_setup_runs_prebuild_only_when_android_missing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        fs::create_dir_all(&ctx.layout.wallet).unwrap();

        let mut runner = FakeRunner::default();
        let report = setup_android(&ctx, &mut runner).unwrap();
        assert_eq!(runner.calls.len(), 1);
        assert_eq!(
            runner.calls[0].args,
            vec!["expo", "prebuild", "--platform", "android"]
        );
        assert_eq!(runner.calls[0].cwd.as_deref(), Some(ctx.layout.wallet.as_path()));
        assert!(report.has(Status::Fixed, "Android project created"));
        assert!(report.has(Status::Warn, "native_modules.gradle is still missing"));

        fs::create_dir_all(&ctx.layout.android).unwrap();
        let mut runner = FakeRunner::default();
        setup_android(&ctx, &mut runner).unwrap();
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_run_android_failure_is_advisory() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        fs::create_dir_all(&ctx.layout.android).unwrap();

        let mut runner = FakeRunner::default().failing("");
        let report = run_android(&ctx, &mut runner).unwrap();
        assert!(report.has(Status::Fail, "Error running Android app"));
        assert!(!report.next_steps.is_empty());
        assert_eq!(runner.calls[0].args, vec!["expo", "run:android"]);
    }

    #[test]
    fn test_run_with_fix_patches_then_tailors_max_perm_size_advice() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        fs::create_dir_all(&ctx.layout.android).unwrap();
        fs::write(
            &ctx.layout.gradle_properties,
            "org.gradle.jvmargs=-Xmx2048m -XX:MaxPermSize=512m\n",
        )
        .unwrap();

        let mut runner =
            FakeRunner::default().failing("Unrecognized VM option 'MaxPermSize=512m'");
        let report = run_with_fix(&ctx, &mut runner).unwrap();

        let project = fs::read_to_string(&ctx.layout.gradle_properties).unwrap();
        assert_eq!(find_property(&project, JVM_ARGS_KEY), Some("-Xmx2048m"));
        let global = ctx.layout.gradle_home.as_ref().unwrap().properties.clone();
        assert!(fs::read_to_string(global).unwrap().starts_with(CREATED_HEADER));
        assert!(report.next_steps[0].contains("MaxPermSize error is still occurring"));
    }
}
