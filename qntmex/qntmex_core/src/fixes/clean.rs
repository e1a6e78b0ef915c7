//! Build output and Gradle cache cleanup.

use super::remove_dir;
use crate::context::Context;
use crate::patch::{distribution_version, read_properties};
use crate::process::{CommandRunner, CommandSpec};
use crate::report::Report;
use crate::utils::Version;
use crate::Result;

/// Run `gradlew clean` and remove the Android build directories.
///
/// The build directories are removed even when `gradlew clean` fails.
pub fn clean_build(ctx: &Context, runner: &mut dyn CommandRunner) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_android()?;

    let mut report = Report::new(ctx.banner("Android Build Cleaner"));
    report.section(format!("Running: gradlew clean in {}", layout.android.display()));

    let gradlew = CommandSpec::new(layout.gradlew.to_string_lossy())
        .args(["clean"])
        .current_dir(&layout.android);
    match runner.run_streaming(&gradlew) {
        Ok(()) => {
            report.pass("gradlew clean finished");
        }
        Err(e) => {
            report
                .fail(format!("Error cleaning Android build: {}", e))
                .hint(format!(
                    "Run Gradle clean manually: cd {}/android && gradlew clean",
                    ctx.config.project_dir
                ));
        }
    }

    report.section("Cleaning build directories...");
    for dir in &layout.build_dirs {
        if dir.exists() {
            remove_dir(&mut report, dir, "build directory");
        }
    }

    report.section("Cleaning Gradle cache...");
    if let Some(gradle_home) = &layout.gradle_home {
        if gradle_home.caches.is_dir() {
            report
                .info(format!(
                    "To completely clean the Gradle cache, delete: {}",
                    gradle_home.caches.display()
                ))
                .hint("Or run: qntmex clean-cache");
        }
    }

    report
        .next_step("Run the troubleshooter: qntmex troubleshoot")
        .next_step("Build the app again: qntmex run-android");
    Ok(report)
}

/// Remove the global Gradle caches and incompatible wrapper distributions.
///
/// Refuses to delete anything while the project wrapper points at a version
/// outside the compatible set, since the next build would re-download it.
pub fn clean_cache(ctx: &Context) -> Result<Report> {
    let layout = &ctx.layout;
    layout.require_android()?;

    let mut report = Report::new(ctx.banner("Gradle Cache Cleaner"));
    report.section(format!("Root directory: {}", layout.root.display()));

    if layout.wrapper_properties.is_file() {
        report.section("Checking gradle-wrapper.properties...");
        let text = match read_properties(&layout.wrapper_properties) {
            Ok(text) => text,
            Err(e) => {
                report.warn(format!("Could not read gradle-wrapper.properties: {}", e));
                return Ok(report);
            }
        };
        let version = distribution_version(&text).and_then(|v| v.parse::<Version>().ok());
        match version {
            Some(v) if ctx.config.is_compatible(&v) => {
                report.pass(format!("Using compatible Gradle version {}", v));
            }
            found => {
                report
                    .fail(format!(
                        "gradle-wrapper.properties is not using a compatible Gradle version ({})",
                        found.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string())
                    ))
                    .hint("Run the version fix first: qntmex fix-version");
                return Ok(report);
            }
        }
    }

    let Some(gradle_home) = &layout.gradle_home else {
        report.warn("Home directory is unknown, nothing to clean");
        return Ok(report);
    };

    report.section("Cleaning Gradle caches...");
    remove_dir(&mut report, &gradle_home.caches, "Gradle caches directory");

    for name in &ctx.config.incompatible_dists {
        let dist = gradle_home.wrapper_dists.join(name);
        if dist.exists() {
            remove_dir(&mut report, &dist, &format!("{} wrapper directory", name));
        }
    }

    report.next_step("Run the app again: qntmex run-with-fix");
    report.next_step(format!(
        "The build should now use Gradle {} instead of downloading an incompatible version",
        ctx.config.pinned_gradle
    ));
    Ok(report)
}
