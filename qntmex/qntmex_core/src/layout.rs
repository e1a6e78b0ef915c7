//! Project layout resolution.
//!
//! Every command works against the same fixed directory layout: a root that
//! contains the wallet project, whose `android/` directory was generated by
//! Expo, plus the user-global `~/.gradle` tree. [`ProjectLayout`] resolves all
//! of those paths once from an [`Environment`] snapshot and is passed to every
//! check and fix.

use crate::error::PreconditionError;
use crate::utils::ToolConfig;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment inputs, captured once from the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Environment {
    /// User home directory (`USERPROFILE` on Windows, `HOME` elsewhere).
    pub home: Option<PathBuf>,

    /// `ANDROID_HOME`.
    pub android_home: Option<PathBuf>,

    /// `ANDROID_SDK_ROOT`.
    pub android_sdk_root: Option<PathBuf>,

    /// Whether the host is Windows.
    pub windows: bool,
}

impl Environment {
    /// Capture the relevant variables from the current process.
    pub fn from_process() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            home: var("USERPROFILE").or_else(|| var("HOME")),
            android_home: var("ANDROID_HOME"),
            android_sdk_root: var("ANDROID_SDK_ROOT"),
            windows: cfg!(windows),
        }
    }

    /// The SDK location from `ANDROID_HOME`, falling back to `ANDROID_SDK_ROOT`.
    pub fn android_sdk(&self) -> Option<&Path> {
        self.android_home
            .as_deref()
            .or(self.android_sdk_root.as_deref())
    }
}

/// Locations inside the user-global Gradle directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradleHome {
    /// `~/.gradle`
    pub dir: PathBuf,
    /// `~/.gradle/gradle.properties`
    pub properties: PathBuf,
    /// `~/.gradle/caches`
    pub caches: PathBuf,
    /// `~/.gradle/daemon`
    pub daemon: PathBuf,
    /// `~/.gradle/wrapper/dists`
    pub wrapper_dists: PathBuf,
}

impl GradleHome {
    fn new(home: &Path) -> Self {
        let dir = home.join(".gradle");
        Self {
            properties: dir.join("gradle.properties"),
            caches: dir.join("caches"),
            daemon: dir.join("daemon"),
            wrapper_dists: dir.join("wrapper").join("dists"),
            dir,
        }
    }
}

/// Every path the toolbelt reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    /// Root directory the tool was pointed at.
    pub root: PathBuf,
    /// Wallet project directory (`<root>/qntmex-wallet`).
    pub wallet: PathBuf,
    /// Generated Android project.
    pub android: PathBuf,
    /// `android/gradle/wrapper/gradle-wrapper.properties`
    pub wrapper_properties: PathBuf,
    /// `android/gradle.properties`
    pub gradle_properties: PathBuf,
    /// `<wallet>/gradle.properties`
    pub wallet_gradle_properties: PathBuf,
    /// `android/local.properties`
    pub local_properties: PathBuf,
    /// `android/settings.gradle`
    pub settings_gradle: PathBuf,
    /// `android/build.gradle`
    pub build_gradle: PathBuf,
    /// `android/app/build.gradle`
    pub app_build_gradle: PathBuf,
    /// Build output directories removed by the cleaner.
    pub build_dirs: Vec<PathBuf>,
    /// `<wallet>/metro.config.js`
    pub metro_config: PathBuf,
    /// `<root>/react-native.config.js`
    pub react_native_config: PathBuf,
    /// `<root>/android/gradle/wrapper/gradle-wrapper.properties`
    pub root_wrapper_properties: PathBuf,
    /// `<root>/node_modules/react-native/android/native_modules.gradle`
    pub native_modules_gradle: PathBuf,
    /// Gradle wrapper script inside the android project.
    pub gradlew: PathBuf,
    /// User-global Gradle tree, when a home directory is known.
    pub gradle_home: Option<GradleHome>,
}

impl ProjectLayout {
    /// Resolve the layout under `root`.
    pub fn resolve(root: impl Into<PathBuf>, env: &Environment, config: &ToolConfig) -> Self {
        let root = root.into();
        let wallet = root.join(&config.project_dir);
        let android = wallet.join("android");
        let gradlew = if env.windows {
            android.join("gradlew.bat")
        } else {
            android.join("gradlew")
        };

        Self {
            wrapper_properties: android
                .join("gradle")
                .join("wrapper")
                .join("gradle-wrapper.properties"),
            gradle_properties: android.join("gradle.properties"),
            wallet_gradle_properties: wallet.join("gradle.properties"),
            local_properties: android.join("local.properties"),
            settings_gradle: android.join("settings.gradle"),
            build_gradle: android.join("build.gradle"),
            app_build_gradle: android.join("app").join("build.gradle"),
            build_dirs: vec![android.join("app").join("build"), android.join("build")],
            metro_config: wallet.join("metro.config.js"),
            react_native_config: root.join("react-native.config.js"),
            root_wrapper_properties: root
                .join("android")
                .join("gradle")
                .join("wrapper")
                .join("gradle-wrapper.properties"),
            native_modules_gradle: root
                .join("node_modules")
                .join("react-native")
                .join("android")
                .join("native_modules.gradle"),
            gradlew,
            gradle_home: env.home.as_deref().map(GradleHome::new),
            android,
            wallet,
            root,
        }
    }

    /// Fail unless the wallet project directory exists.
    pub fn require_wallet(&self) -> Result<(), PreconditionError> {
        if self.wallet.is_dir() {
            Ok(())
        } else {
            Err(PreconditionError::MissingProject {
                name: self
                    .wallet
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: self.wallet.clone(),
            })
        }
    }

    /// Fail unless both the wallet and its android directory exist.
    pub fn require_android(&self) -> Result<(), PreconditionError> {
        self.require_wallet()?;
        if self.android.is_dir() {
            Ok(())
        } else {
            Err(PreconditionError::MissingAndroid(self.android.clone()))
        }
    }

    /// Every file that may carry Gradle JVM arguments, in scan order.
    ///
    /// Fixed candidates come first, then `gradle.properties` in each direct
    /// subdirectory of `~/.gradle`, then every `daemon.properties.txt` below
    /// `~/.gradle/daemon`. Fixed candidates are listed even when missing so
    /// the caller can report them; discovered ones exist by construction.
    /// Unreadable directories are skipped with a warning.
    pub fn jvm_args_candidates(&self) -> Vec<PathBuf> {
        let mut out = vec![
            self.gradle_properties.clone(),
            self.wallet_gradle_properties.clone(),
        ];

        if let Some(gh) = &self.gradle_home {
            out.push(gh.properties.clone());

            match sorted_entries(&gh.dir) {
                Ok(entries) => out.extend(
                    entries
                        .into_iter()
                        .filter(|p| p.is_dir())
                        .map(|p| p.join("gradle.properties"))
                        .filter(|p| p.is_file()),
                ),
                Err(e) if gh.dir.exists() => {
                    log::warn!("Error reading {}: {}", gh.dir.display(), e)
                }
                Err(_) => {}
            }

            if gh.daemon.is_dir() {
                find_named(&gh.daemon, "daemon.properties.txt", &mut out);
            }
        }

        out
    }
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

fn find_named(dir: &Path, name: &str, out: &mut Vec<PathBuf>) {
    let entries = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Error reading {}: {}", dir.display(), e);
            return;
        }
    };
    for path in entries {
        if path.is_dir() {
            find_named(&path, name, out);
        } else if path.file_name().is_some_and(|n| n == name) {
            out.push(path);
        }
    }
}

/// List directory entry names, sorted. Missing or unreadable directories give `None`.
pub fn list_names(dir: &Path) -> Option<Vec<String>> {
    let mut names = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    Some(names)
}
