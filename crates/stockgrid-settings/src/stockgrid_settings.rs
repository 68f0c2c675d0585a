//! Stockgrid settings
//!
//! Persisted defaults for grids built by an application:
//! - page size and the sizes offered in the size picker
//! - pagination mode
//! - editor and page strip limits
//!
//! Also owns the on-disk locations for settings, saved filter sets and logs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stockgrid_core::ColumnDescriptor;
use stockgrid_grid::{GridConfig, PaginationMode};
use stockgrid_storage::SqliteStore;

pub mod logging;
mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub pagination_mode: PaginationMode,
    /// Cap on the values offered in the filter editor's value list
    pub max_distinct_values: usize,
    pub max_page_links: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            page_size_options: vec![10, 20, 50, 100],
            pagination_mode: PaginationMode::Client,
            max_distinct_values: 100,
            max_page_links: 5,
        }
    }
}

impl GridSettings {
    /// Load from the user's settings file, or defaults if there is none
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: Self =
            serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")?;
        Ok(settings.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn settings_path() -> Result<PathBuf> {
        settings_file()
    }

    pub fn is_allowed_page_size(&self, page_size: usize) -> bool {
        self.page_size_options.contains(&page_size)
    }

    /// Grid configuration for `columns` using these defaults
    pub fn grid_config(&self, columns: Vec<ColumnDescriptor>) -> GridConfig {
        let mut config = GridConfig::new(columns)
            .with_page_size(self.default_page_size)
            .with_mode(self.pagination_mode);
        config.max_distinct_values = self.max_distinct_values;
        config.max_page_links = self.max_page_links;
        config
    }

    // Zero limits in a hand-edited file fall back to the defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.default_page_size == 0 {
            tracing::warn!("Ignoring zero default page size in settings");
            self.default_page_size = defaults.default_page_size;
        }
        self.page_size_options.retain(|&size| size > 0);
        if self.page_size_options.is_empty() {
            self.page_size_options = defaults.page_size_options;
        }
        if self.max_distinct_values == 0 {
            self.max_distinct_values = defaults.max_distinct_values;
        }
        if self.max_page_links == 0 {
            self.max_page_links = defaults.max_page_links;
        }
        self
    }
}

/// Open the SQLite store that holds saved filter sets
pub fn open_preset_store() -> Result<SqliteStore> {
    let path = presets_db_file()?;
    tracing::debug!(path = %path.display(), "Opening saved filter store");
    SqliteStore::open(path)
}
