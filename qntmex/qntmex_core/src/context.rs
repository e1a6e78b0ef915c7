//! Shared command context.

use crate::layout::{Environment, ProjectLayout};
use crate::utils::ToolConfig;
use std::path::PathBuf;

/// Everything a check or fix needs, resolved once per invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Environment snapshot.
    pub env: Environment,
    /// Effective configuration.
    pub config: ToolConfig,
    /// Resolved paths.
    pub layout: ProjectLayout,
}

impl Context {
    /// Resolve a context for `root`.
    pub fn new(root: impl Into<PathBuf>, env: Environment, config: ToolConfig) -> Self {
        let layout = ProjectLayout::resolve(root, &env, &config);
        Self {
            env,
            config,
            layout,
        }
    }

    /// Banner shown at the top of every report.
    pub fn banner(&self, tool: &str) -> String {
        format!("QNTMEX Wallet {}", tool)
    }
}
