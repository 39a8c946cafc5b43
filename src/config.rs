//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/taskmap/taskmap.toml`
//! 3. Environment variables: `TASKMAP_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{LayoutConfig, DEFAULT_NODE_TITLE};

/// Geometry constants of the node map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Minimum node diameter per depth, non-increasing
    pub base_sizes: Vec<u32>,
    /// Space between child cells
    pub gap: u32,
    /// Room reserved for a node's title
    pub header: u32,
    /// Margin around a node's content
    pub padding: u32,
    /// Minimum content width relative to the node's base size
    pub min_width_ratio: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let LayoutConfig {
            base_sizes,
            gap,
            header,
            padding,
            min_width_ratio,
        } = LayoutConfig::default();
        Self {
            base_sizes,
            gap,
            header,
            padding,
            min_width_ratio,
        }
    }
}

/// Titles given to nodes created without one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TitleSettings {
    /// Default title per depth (top-level first)
    pub by_depth: Vec<String>,
    /// Title for depths beyond `by_depth`
    pub fallback: String,
}

impl Default for TitleSettings {
    fn default() -> Self {
        Self {
            by_depth: vec![
                "New top-level task".into(),
                "New mid-level task".into(),
                "New sub-task".into(),
            ],
            fallback: DEFAULT_NODE_TITLE.into(),
        }
    }
}

/// Text substituted by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Labels {
    /// Shown in place of an empty title
    pub unnamed: String,
    /// Shown in table cells without a node
    pub empty_cell: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            unnamed: "Unnamed".into(),
            empty_cell: "—".into(),
        }
    }
}

/// Raw layout section; `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub base_sizes: Option<Vec<u32>>,
    pub gap: Option<u32>,
    pub header: Option<u32>,
    pub padding: Option<u32>,
    pub min_width_ratio: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTitleSettings {
    pub by_depth: Option<Vec<String>>,
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLabels {
    pub unnamed: Option<String>,
    pub empty_cell: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
    pub titles: RawTitleSettings,
    pub labels: RawLabels,
}

/// Unified configuration for taskmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub titles: TitleSettings,
    pub labels: Labels,
}

/// Get the XDG config directory for taskmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taskmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("taskmap.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings from defaults, the global config file and `TASKMAP_*`
    /// environment variables.
    pub fn load() -> ApplicationResult<Self> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using `config_path` as the global config file.
    ///
    /// A missing file is skipped; a malformed one is an error.
    pub fn load_from(config_path: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                debug!("load_from: reading {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.apply(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Overlay `raw` onto self: specified values replace, others are kept.
    pub fn apply(&self, raw: &RawSettings) -> Self {
        let layout = &raw.layout;
        let titles = &raw.titles;
        let labels = &raw.labels;
        Self {
            layout: LayoutSettings {
                base_sizes: layout
                    .base_sizes
                    .clone()
                    .unwrap_or_else(|| self.layout.base_sizes.clone()),
                gap: layout.gap.unwrap_or(self.layout.gap),
                header: layout.header.unwrap_or(self.layout.header),
                padding: layout.padding.unwrap_or(self.layout.padding),
                min_width_ratio: layout
                    .min_width_ratio
                    .unwrap_or(self.layout.min_width_ratio),
            },
            titles: TitleSettings {
                by_depth: titles
                    .by_depth
                    .clone()
                    .unwrap_or_else(|| self.titles.by_depth.clone()),
                fallback: titles
                    .fallback
                    .clone()
                    .unwrap_or_else(|| self.titles.fallback.clone()),
            },
            labels: Labels {
                unnamed: labels
                    .unnamed
                    .clone()
                    .unwrap_or_else(|| self.labels.unnamed.clone()),
                empty_cell: labels
                    .empty_cell
                    .clone()
                    .unwrap_or_else(|| self.labels.empty_cell.clone()),
            },
        }
    }

    /// Apply TASKMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TASKMAP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("layout.base_sizes")
                .with_list_parse_key("titles.by_depth")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<u32>>("layout.base_sizes") {
            settings.layout.base_sizes = val;
        }
        if let Ok(val) = config.get::<u32>("layout.gap") {
            settings.layout.gap = val;
        }
        if let Ok(val) = config.get::<u32>("layout.header") {
            settings.layout.header = val;
        }
        if let Ok(val) = config.get::<u32>("layout.padding") {
            settings.layout.padding = val;
        }
        if let Ok(val) = config.get_float("layout.min_width_ratio") {
            settings.layout.min_width_ratio = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("titles.by_depth") {
            settings.titles.by_depth = val;
        }
        if let Ok(val) = config.get_string("titles.fallback") {
            settings.titles.fallback = val;
        }
        if let Ok(val) = config.get_string("labels.unnamed") {
            settings.labels.unnamed = val;
        }
        if let Ok(val) = config.get_string("labels.empty_cell") {
            settings.labels.empty_cell = val;
        }

        Ok(settings)
    }

    /// Reject geometry the layout engine cannot work with.
    pub fn validate(&self) -> ApplicationResult<()> {
        let sizes = &self.layout.base_sizes;
        if sizes.is_empty() {
            return Err(ApplicationError::Config {
                message: "layout.base_sizes must not be empty".into(),
            });
        }
        if sizes.windows(2).any(|pair| pair[1] > pair[0]) {
            return Err(ApplicationError::Config {
                message: format!("layout.base_sizes must be non-increasing: {:?}", sizes),
            });
        }
        let ratio = self.layout.min_width_ratio;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ApplicationError::Config {
                message: format!("layout.min_width_ratio must be a non-negative number: {ratio}"),
            });
        }
        Ok(())
    }

    /// Layout engine constants.
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            base_sizes: self.layout.base_sizes.clone(),
            gap: self.layout.gap,
            header: self.layout.header,
            padding: self.layout.padding,
            min_width_ratio: self.layout.min_width_ratio,
        }
    }

    /// Title for a node created at `depth` without an explicit one.
    pub fn default_title(&self, depth: usize) -> &str {
        self.titles
            .by_depth
            .get(depth)
            .map(String::as_str)
            .unwrap_or(self.titles.fallback.as_str())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# taskmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/taskmap/taskmap.toml
#   Env:    TASKMAP_* environment variables, e.g. TASKMAP_LAYOUT__GAP=24

[layout]
# Minimum node diameter per depth; deeper levels reuse the last value
# base_sizes = [320, 220, 150, 100, 72]
# gap = 16
# header = 40
# padding = 20
# min_width_ratio = 0.6

[titles]
# Titles for nodes created without one, by depth
# by_depth = ["New top-level task", "New mid-level task", "New sub-task"]
# fallback = "New task"

[labels]
# unnamed = "Unnamed"
# empty_cell = "—"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
