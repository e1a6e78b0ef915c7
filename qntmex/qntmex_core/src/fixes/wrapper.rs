//! Wrapper version pinning and `settings.gradle` repair.

use super::report_outcome;
use crate::context::Context;
use crate::patch::{distribution_version, patch_file, read_properties, FileOutcome, Rule};
use crate::report::Report;
use crate::Result;
use std::path::Path;

/// Repositories block added to `settings.gradle`.
const REPOSITORIES_BLOCK: &str = "\n// Add repositories block for React Native\n\
repositories {\n    google()\n    mavenCentral()\n    maven { url \"https://www.jitpack.io\" }\n}\n";

/// Pin the project and root wrappers to the configured Gradle version.
pub fn fix_version(ctx: &Context) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_android()?;

    let mut report = Report::new(ctx.banner("Gradle Version Fixer"));
    report.section(format!("Root directory: {}", layout.root.display()));

    report.section("Fixing gradle-wrapper.properties in the wallet project...");
    if layout.wrapper_properties.is_file() {
        pin_wrapper(ctx, &layout.wrapper_properties, &mut report);
    } else {
        report.warn("gradle-wrapper.properties file is missing in the wallet project");
    }

    if layout.root_wrapper_properties.is_file() {
        report.section("Fixing gradle-wrapper.properties in the root project...");
        pin_wrapper(ctx, &layout.root_wrapper_properties, &mut report);
    }

    if let Some(gradle_home) = &layout.gradle_home {
        report.next_step(format!(
            "Delete {} to force a download of the correct Gradle version: qntmex clean-cache",
            gradle_home.caches.display()
        ));
    }
    report.next_step("Run the app again: qntmex run-with-fix");
    Ok(report)
}

fn pin_wrapper(ctx: &Context, path: &Path, report: &mut Report) {
    let pinned = &ctx.config.pinned_gradle;
    let current = match read_properties(path) {
        Ok(text) => distribution_version(&text).map(str::to_string),
        Err(e) => {
            report.warn(format!("Could not read {}: {}", path.display(), e));
            return;
        }
    };

    let Some(current) = current else {
        report.warn(format!("No distributionUrl found in {}", path.display()));
        return;
    };

    let rules = [Rule::PinDistribution {
        version: pinned.clone(),
    }];
    match patch_file(path, &rules) {
        Ok(FileOutcome::Unchanged) => {
            report.pass(format!("Already using Gradle {}", pinned));
        }
        result => {
            if let Some(FileOutcome::Patched { .. }) = report_outcome(report, path, result) {
                report.fixed(format!("Updated Gradle version from {} to {}", current, pinned));
            }
        }
    }
}

/// Make sure `settings.gradle` declares the repositories React Native needs.
pub fn fix_settings(ctx: &Context) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_android()?;

    let mut report = Report::new(ctx.banner("Gradle Settings Fixer"));
    report.section(format!(
        "{} directory: {}",
        ctx.config.project_dir,
        layout.wallet.display()
    ));

    report.section("Fixing settings.gradle file...");
    let rules = [Rule::InjectBlock {
        marker: "repositories {".to_string(),
        anchor: Some("pluginManagement {".to_string()),
        block: REPOSITORIES_BLOCK.to_string(),
    }];
    match patch_file(&layout.settings_gradle, &rules) {
        Ok(FileOutcome::NotFound) => {
            report
                .warn("settings.gradle file is missing")
                .hint("Please run the setup first: qntmex setup-android");
        }
        Ok(FileOutcome::Unchanged) => {
            report.pass("settings.gradle already has repositories block");
        }
        result => {
            if report_outcome(&mut report, &layout.settings_gradle, result).is_some() {
                report.fixed("Added repositories block to settings.gradle");
            }
        }
    }

    report.next_step("Run the app again: qntmex run-android");
    Ok(report)
}
