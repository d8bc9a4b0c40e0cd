//! Command-line overrides applied on top of layered config.

use log::{debug, info};
use pantry_rs_config::{ConfigError, LayeredConfigOptions, PantryConfig};
use std::path::PathBuf;

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Extra config file applied after the user and cwd layers.
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub storage_path: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Apply the flag values to `config`.
    pub fn apply(&self, config: &mut PantryConfig) {
        if let Some(model) = &self.model {
            config.inference.model.clone_from(model);
        }
        if let Some(base_url) = &self.base_url {
            config.inference.base_url.clone_from(base_url);
        }
        if let Some(path) = &self.storage_path {
            config.storage.path = Some(path.display().to_string());
        }
    }
}

/// Load the layered config described by `options`, apply `overrides` and
/// validate the result.
pub fn resolve_config(
    mut options: LayeredConfigOptions,
    overrides: &ConfigOverrides,
) -> Result<PantryConfig, ConfigError> {
    if let Some(path) = &overrides.config_path {
        options = options.with_runtime_path(path);
    }
    let layered = PantryConfig::load_layered_with_options(options)?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let mut config = layered.config;
    overrides.apply(&mut config);
    config.validate()?;
    info!(
        "resolved config (model={}, base_url={}, min_ingredients={})",
        config.inference.model, config.inference.base_url, config.generation.min_ingredients
    );
    Ok(config)
}
