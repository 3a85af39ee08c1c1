//! Configuration for shapformel.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment -> explicit overrides.
//! Files are `~/.config/shapformel/config.toml` and
//! `.shapformel/config.toml` in the workspace directory.

use crate::model::ModelFamily;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainConfig {
    /// Model families accepted by input validation.
    #[serde(default = "default_supported_families")]
    pub supported_families: Vec<ModelFamily>,
    /// Text report rendering.
    #[serde(default)]
    pub report: ReportConfig,
    /// Python runtime used by the bridged oracles.
    #[serde(default)]
    pub python: PythonConfig,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            supported_families: default_supported_families(),
            report: ReportConfig::default(),
            python: PythonConfig::default(),
        }
    }
}

fn default_supported_families() -> Vec<ModelFamily> {
    vec![ModelFamily::RandomForestClassifier]
}

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Render the attribution waterfall chart.
    #[serde(default = "default_true")]
    pub plot: bool,
    /// Number of features drawn individually in the chart; the rest are summed.
    #[serde(default = "default_max_display")]
    pub max_display: usize,
    /// Width in characters of the longest bar.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
    /// Width of the horizontal rules between sections.
    #[serde(default = "default_rule_width")]
    pub rule_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            plot: true,
            max_display: default_max_display(),
            bar_width: default_bar_width(),
            rule_width: default_rule_width(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_display() -> usize {
    10
}

fn default_bar_width() -> usize {
    30
}

fn default_rule_width() -> usize {
    70
}

/// Python runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Path to Python executable (`python3` if not set).
    #[serde(default)]
    pub python_path: Option<PathBuf>,
    /// Path to virtual environment.
    #[serde(default)]
    pub venv_path: Option<PathBuf>,
    /// Timeout for a single oracle call (seconds).
    #[serde(default = "default_python_timeout")]
    pub timeout_secs: u64,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            python_path: None,
            venv_path: None,
            timeout_secs: default_python_timeout(),
        }
    }
}

fn default_python_timeout() -> u64 {
    300
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides
/// 2. Environment variables (prefixed with `SHAPFORMEL_`, nested with `__`)
/// 3. Workspace-local config (`.shapformel/config.toml`)
/// 4. User config (`~/.config/shapformel/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ExplainConfig>,
) -> Result<ExplainConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(ExplainConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "shapformel", "shapformel") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".shapformel").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // SHAPFORMEL_REPORT__MAX_DISPLAY, SHAPFORMEL_PYTHON__TIMEOUT_SECS, ...
    figment = figment.merge(Env::prefixed("SHAPFORMEL_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExplainConfig::default();
        assert_eq!(
            config.supported_families,
            vec![ModelFamily::RandomForestClassifier]
        );
        assert_eq!(config.report.max_display, 10);
        assert_eq!(config.report.rule_width, 70);
        assert_eq!(config.python.timeout_secs, 300);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ExplainConfig = toml::from_str(
            r#"
            supported_families = ["RandomForestClassifier", "XGBClassifier"]

            [report]
            plot = false
            "#,
        )
        .unwrap();
        assert_eq!(config.supported_families.len(), 2);
        assert!(!config.report.plot);
        assert_eq!(config.report.bar_width, 30);
        assert_eq!(config.python.timeout_secs, 300);
    }

    #[test]
    fn test_load_workspace_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".shapformel");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[python]\ntimeout_secs = 42\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.python.timeout_secs, 42);
    }

    #[test]
    fn test_overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        let mut overrides = ExplainConfig::default();
        overrides.report.max_display = 5;
        let config = load_config(Some(dir.path()), Some(&overrides)).unwrap();
        assert_eq!(config.report.max_display, 5);
    }
}
