use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Geometric constants used when laying out a drawing.
///
/// All distances are in document units; angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DepictionSettings {
    /// Spacing between the parallel lines of a multiple bond.
    pub bond_dist: f64,
    /// Clearance kept around a drawn symbol when trimming bonds.
    pub padding: f64,
    pub symbol_half_width: f64,
    pub symbol_half_height: f64,
    /// Extra radial distance for slots placed off the compass directions.
    pub slot_margin: f64,
    /// Angular tolerance added to the 45° exclusion window of a bond.
    pub angle_tolerance: f64,
    /// Two tied stereo bonds closer than this angle both get a depiction.
    pub stereo_parallel_limit: f64,
}

impl Default for DepictionSettings {
    fn default() -> Self {
        Self {
            bond_dist: 5.0,
            padding: 2.0,
            symbol_half_width: 5.0,
            symbol_half_height: 7.0,
            slot_margin: 2.0,
            angle_tolerance: 0.1,
            stereo_parallel_limit: 90.0,
        }
    }
}

impl DepictionSettings {
    pub fn builder() -> DepictionSettingsBuilder {
        DepictionSettingsBuilder::new()
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let settings: DepictionSettings =
            toml::from_str(&content).map_err(|e| SettingsError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let non_negative = [
            ("bond_dist", self.bond_dist),
            ("padding", self.padding),
            ("symbol_half_width", self.symbol_half_width),
            ("symbol_half_height", self.symbol_half_height),
            ("slot_margin", self.slot_margin),
            ("angle_tolerance", self.angle_tolerance),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidValue {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }
        if !(0.0..=180.0).contains(&self.stereo_parallel_limit) {
            return Err(SettingsError::InvalidValue {
                field: "stereo_parallel_limit",
                reason: format!("must lie in [0, 180], got {}", self.stereo_parallel_limit),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DepictionSettingsBuilder {
    bond_dist: Option<f64>,
    padding: Option<f64>,
    symbol_half_width: Option<f64>,
    symbol_half_height: Option<f64>,
    slot_margin: Option<f64>,
    angle_tolerance: Option<f64>,
    stereo_parallel_limit: Option<f64>,
}

impl DepictionSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_dist(mut self, dist: f64) -> Self {
        self.bond_dist = Some(dist);
        self
    }
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }
    pub fn symbol_half_width(mut self, hw: f64) -> Self {
        self.symbol_half_width = Some(hw);
        self
    }
    pub fn symbol_half_height(mut self, hh: f64) -> Self {
        self.symbol_half_height = Some(hh);
        self
    }
    pub fn slot_margin(mut self, margin: f64) -> Self {
        self.slot_margin = Some(margin);
        self
    }
    pub fn angle_tolerance(mut self, tolerance: f64) -> Self {
        self.angle_tolerance = Some(tolerance);
        self
    }
    pub fn stereo_parallel_limit(mut self, limit: f64) -> Self {
        self.stereo_parallel_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<DepictionSettings, SettingsError> {
        let d = DepictionSettings::default();
        let settings = DepictionSettings {
            bond_dist: self.bond_dist.unwrap_or(d.bond_dist),
            padding: self.padding.unwrap_or(d.padding),
            symbol_half_width: self.symbol_half_width.unwrap_or(d.symbol_half_width),
            symbol_half_height: self.symbol_half_height.unwrap_or(d.symbol_half_height),
            slot_margin: self.slot_margin.unwrap_or(d.slot_margin),
            angle_tolerance: self.angle_tolerance.unwrap_or(d.angle_tolerance),
            stereo_parallel_limit: self
                .stereo_parallel_limit
                .unwrap_or(d.stereo_parallel_limit),
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builder_fills_defaults() {
        let s = DepictionSettings::builder().bond_dist(3.0).build().unwrap();
        assert_eq!(s.bond_dist, 3.0);
        assert_eq!(s.padding, DepictionSettings::default().padding);
    }

    #[test]
    fn builder_rejects_negative_spacing() {
        let err = DepictionSettings::builder().bond_dist(-1.0).build().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                field: "bond_dist",
                ..
            }
        ));
    }

    #[test]
    fn builder_rejects_out_of_range_parallel_limit() {
        assert!(
            DepictionSettings::builder()
                .stereo_parallel_limit(200.0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn load_reads_kebab_case_toml_and_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bond-dist = 4.5\nslot-margin = 1.0").unwrap();
        let s = DepictionSettings::load(file.path()).unwrap();
        assert_eq!(s.bond_dist, 4.5);
        assert_eq!(s.slot_margin, 1.0);
        assert_eq!(s.symbol_half_height, 7.0);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bond-spacing = 4.5").unwrap();
        assert!(matches!(
            DepictionSettings::load(file.path()),
            Err(SettingsError::Toml { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = DepictionSettings::load(Path::new("/nonexistent/settings.toml"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }
}
