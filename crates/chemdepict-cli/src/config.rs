use crate::cli::LayoutArgs;
use crate::error::{CliError, Result};
use chemdepict::engine::config::{DepictionSettings, DepictionSettingsBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Settings as read from a TOML file or `--set` flags; unset fields fall
/// through to the next layer.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialSettings {
    pub bond_dist: Option<f64>,
    pub padding: Option<f64>,
    pub symbol_half_width: Option<f64>,
    pub symbol_half_height: Option<f64>,
    pub slot_margin: Option<f64>,
    pub angle_tolerance: Option<f64>,
    pub stereo_parallel_limit: Option<f64>,
}

impl PartialSettings {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading settings file {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Option<f64>> {
        match key {
            "bond-dist" => Some(&mut self.bond_dist),
            "padding" => Some(&mut self.padding),
            "symbol-half-width" => Some(&mut self.symbol_half_width),
            "symbol-half-height" => Some(&mut self.symbol_half_height),
            "slot-margin" => Some(&mut self.slot_margin),
            "angle-tolerance" => Some(&mut self.angle_tolerance),
            "stereo-parallel-limit" => Some(&mut self.stereo_parallel_limit),
            _ => None,
        }
    }

    /// Applies `KEY=VALUE` overrides on top of the file values.
    pub fn apply_set_values(mut self, set_values: &[String]) -> Result<Self> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value = value_str.trim().parse::<f64>().map_err(|_| {
                CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
            })?;
            let field = self
                .field_mut(key)
                .ok_or_else(|| CliError::Config(format!("Unknown settings key: '{}'", key)))?;
            *field = Some(value);
        }
        Ok(self)
    }

    pub fn into_builder(self) -> DepictionSettingsBuilder {
        let mut builder = DepictionSettings::builder();
        if let Some(v) = self.bond_dist {
            builder = builder.bond_dist(v);
        }
        if let Some(v) = self.padding {
            builder = builder.padding(v);
        }
        if let Some(v) = self.symbol_half_width {
            builder = builder.symbol_half_width(v);
        }
        if let Some(v) = self.symbol_half_height {
            builder = builder.symbol_half_height(v);
        }
        if let Some(v) = self.slot_margin {
            builder = builder.slot_margin(v);
        }
        if let Some(v) = self.angle_tolerance {
            builder = builder.angle_tolerance(v);
        }
        if let Some(v) = self.stereo_parallel_limit {
            builder = builder.stereo_parallel_limit(v);
        }
        builder
    }
}

/// Merges built-in defaults, the settings file, `--set` overrides and
/// dedicated flags, in increasing priority.
pub fn build_settings(args: &LayoutArgs) -> Result<DepictionSettings> {
    let file_settings = match &args.config {
        Some(path) => PartialSettings::from_file(path)?,
        None => PartialSettings::default(),
    };
    let mut merged = file_settings.apply_set_values(&args.set_values)?;
    if let Some(dist) = args.bond_dist {
        merged.bond_dist = Some(dist);
    }
    Ok(merged.into_builder().build()?)
}
