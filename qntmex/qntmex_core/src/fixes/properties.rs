//! JVM argument repairs for `gradle.properties` files.

use super::{jvm_rules, remove_dir, report_outcome, report_steps, Step, CREATED_HEADER};
use crate::context::Context;
use crate::patch::{patch_file, patch_or_create, FileOutcome, Rule};
use crate::report::Report;
use crate::Result;

/// Header written by the daemon fixer when it creates the global file.
const DAEMON_HEADER: &str = "# Gradle properties\n# Modified by QNTMEX Wallet fix script\n";

/// Steps applied to the global `~/.gradle/gradle.properties` by most fixers.
pub(crate) fn global_jvm_steps(ctx: &Context) -> Vec<Step> {
    let messages = [
        format!("Removed {} JVM argument", ctx.config.banned_jvm_arg),
        "Added new JVM arguments optimized for Java 17".to_string(),
    ];
    jvm_rules(&ctx.config)
        .into_iter()
        .zip(messages)
        .map(|(rule, message)| Step::new(rule, message))
        .collect()
}

/// Patch the global properties file, creating it with `header` when missing.
pub(crate) fn patch_global(
    ctx: &Context,
    report: &mut Report,
    steps: &[Step],
    header: &str,
) -> Option<FileOutcome> {
    let Some(gradle_home) = &ctx.layout.gradle_home else {
        report
            .warn("Home directory is unknown, skipping the global gradle.properties")
            .hint("Set HOME (or USERPROFILE on Windows) and run again");
        return None;
    };

    let rules: Vec<Rule> = steps.iter().map(|s| s.rule.clone()).collect();
    let path = &gradle_home.properties;
    let outcome = report_outcome(report, path, patch_or_create(path, &rules, header))?;
    report_steps(report, &outcome, steps);
    Some(outcome)
}

/// Strip the banned JVM argument from the project's `gradle.properties`.
pub(crate) fn patch_project(ctx: &Context, report: &mut Report, extra: Vec<Step>) {
    let mut steps = vec![Step::new(
        Rule::strip_jvm_arg(&ctx.config.banned_jvm_arg),
        format!(
            "Removed {} JVM argument from project gradle.properties",
            ctx.config.banned_jvm_arg
        ),
    )];
    steps.extend(extra);

    let rules: Vec<Rule> = steps.iter().map(|s| s.rule.clone()).collect();
    let path = &ctx.layout.gradle_properties;
    if let Some(outcome) = report_outcome(report, path, patch_file(path, &rules)) {
        report_steps(report, &outcome, &steps);
    }
}

/// Remove the banned JVM argument from every file that may carry JVM arguments.
pub fn fix_jvm(ctx: &Context) -> Result<Report> {
    let mut report = Report::new(ctx.banner("Gradle JVM Fix"));
    report.section(format!("Root directory: {}", ctx.layout.root.display()));
    report.section("Searching for gradle.properties files...");

    let rules = [Rule::strip_jvm_arg(&ctx.config.banned_jvm_arg)];
    let mut fixed_any = false;
    for path in ctx.layout.jvm_args_candidates() {
        if let Some(outcome) = report_outcome(&mut report, &path, patch_file(&path, &rules)) {
            fixed_any |= outcome.wrote();
        }
    }

    report.section("Result");
    if fixed_any {
        report.fixed("Fixed Gradle JVM arguments issue");
        report.next_step("Run the app again: qntmex run-android");
    } else {
        report
            .warn(format!(
                "Could not find any gradle.properties files with the {} argument",
                ctx.config.banned_jvm_arg
            ))
            .hint("Look for any gradle.properties files in your system")
            .hint(format!(
                "Remove any -XX:{}=... arguments and save the files",
                ctx.config.banned_jvm_arg
            ))
            .hint("Run the app again");
    }

    report.next_step(format!(
        "The {} JVM argument is not supported in Java 17. If problems persist, consider Java 11",
        ctx.config.banned_jvm_arg
    ));
    Ok(report)
}

/// Fix the JVM arguments in the global Gradle properties, creating the file if needed.
pub fn fix_daemon(ctx: &Context) -> Result<Report> {
    let mut report = Report::new(ctx.banner("Gradle Daemon Fix"));
    report.section("Checking global Gradle properties...");

    let steps = global_jvm_steps(ctx);
    patch_global(ctx, &mut report, &steps, DAEMON_HEADER);

    report
        .next_step("Run the app again: qntmex run-android")
        .next_step("If problems persist, delete ~/.gradle/daemon to force a new daemon")
        .next_step("Restart your computer to ensure all Gradle daemons are stopped")
        .next_step("Consider using Java 11 instead of Java 17");
    Ok(report)
}

/// Full Java 17 compatibility pass over global and project properties.
pub fn fix_java17(ctx: &Context) -> Result<Report> {
    ctx.layout.require_android()?;

    let mut report = Report::new(ctx.banner("Gradle Java 17 Compatibility Fix"));
    report.section("Fixing Gradle JVM arguments for Java 17 compatibility...");

    let mut steps = global_jvm_steps(ctx);
    steps.push(Step::new(
        Rule::require_property(
            "org.gradle.daemon",
            "true",
            "Enable Gradle daemon for better performance",
        ),
        "Enabled Gradle daemon for better performance",
    ));
    steps.push(Step::new(
        Rule::require_property("org.gradle.parallel", "true", "Enable parallel project builds"),
        "Enabled parallel project builds",
    ));
    patch_global(ctx, &mut report, &steps, CREATED_HEADER);

    report.section("Checking project gradle.properties...");
    patch_project(
        ctx,
        &mut report,
        vec![Step::new(
            Rule::require_property("android.useAndroidX", "true", "Enable AndroidX"),
            "Enabled AndroidX support",
        )],
    );

    report.section("Cleaning Gradle daemon directory...");
    match &ctx.layout.gradle_home {
        Some(gradle_home) => {
            remove_dir(&mut report, &gradle_home.daemon, "Gradle daemon directory");
        }
        None => {
            report.warn("Home directory is unknown, skipping the Gradle daemon directory");
        }
    }

    report
        .next_step("If you still encounter issues, restart your computer to stop all Gradle daemons")
        .next_step("Run the Android app: qntmex run-with-fix")
        .next_step("If problems persist, consider using Java 11 instead of Java 17");
    Ok(report)
}
