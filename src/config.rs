//! External tool configuration for subproject builds

/// Programs and platform behavior used by the subproject cache builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Generator executable, invoked as `<generator> build`
    pub generator: String,
    /// Git executable used for `describe`
    pub git: String,
    /// Apply the Windows path/line-ending override pass
    pub windows_overrides: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            generator: "lbuild".to_string(),
            git: "git".to_string(),
            windows_overrides: cfg!(windows),
        }
    }
}

impl ToolConfig {
    /// Build a config from command-line values, falling back to defaults
    pub fn from_options(
        generator: Option<String>,
        git: Option<String>,
        force_windows_overrides: bool,
    ) -> Self {
        let defaults = Self::default();
        Self {
            generator: generator.unwrap_or(defaults.generator),
            git: git.unwrap_or(defaults.git),
            windows_overrides: defaults.windows_overrides || force_windows_overrides,
        }
    }
}
