use std::env;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error_codes::{CodedError, CONFIG_INVALID};

pub const CONFIG_ENV_VAR: &str = "FONTSCALE_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const DEFAULT_MIN_GLYPHS: usize = 64;
pub const DEFAULT_WIDTHS: SizeRange = SizeRange { min: 4, max: 32 };
pub const DEFAULT_HEIGHTS: SizeRange = SizeRange { min: 4, max: 64 };
/// Upper bound accepted for either glyph dimension.
pub const MAX_GLYPH_DIMENSION: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

impl SizeRange {
    pub fn as_range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

/// Search bounds for glyph grid detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub min_glyphs: usize,
    pub width: SizeRange,
    pub height: SizeRange,
    /// Threads used for the candidate search. `None` lets the caller pick.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_glyphs: DEFAULT_MIN_GLYPHS,
            width: DEFAULT_WIDTHS,
            height: DEFAULT_HEIGHTS,
            workers: None,
        }
    }
}

impl DetectorConfig {
    pub fn with_min_glyphs(mut self, min_glyphs: usize) -> Self {
        self.min_glyphs = min_glyphs;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn widths(&self) -> RangeInclusive<usize> {
        self.width.as_range()
    }

    pub fn heights(&self) -> RangeInclusive<usize> {
        self.height.as_range()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or(1).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_glyphs == 0 {
            bail!("min_glyphs must be at least 1");
        }
        for (name, range) in [("width", self.width), ("height", self.height)] {
            if range.min == 0 {
                bail!("{name}.min must be at least 1");
            }
            if range.min > range.max {
                bail!(
                    "{name} range is empty: min {} exceeds max {}",
                    range.min,
                    range.max
                );
            }
            if range.max > MAX_GLYPH_DIMENSION {
                bail!(
                    "{name}.max {} exceeds the {MAX_GLYPH_DIMENSION} px limit",
                    range.max
                );
            }
        }
        if self.workers == Some(0) {
            bail!("workers must be at least 1 when set");
        }
        Ok(())
    }
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<DetectorConfig> {
    let config: DetectorConfig = serde_yaml::from_str(contents).map_err(|error| {
        let location = error
            .location()
            .map(|location| format!("line {}, column {}", location.line(), location.column()))
            .unwrap_or_else(|| "unknown location".to_owned());
        anyhow!(CodedError::new(
            CONFIG_INVALID,
            format!(
                "failed to parse yaml in {} at {}: {}",
                origin.display(),
                location,
                error
            ),
        ))
    })?;

    config.validate().map_err(|error| {
        anyhow!(CodedError::new(
            CONFIG_INVALID,
            format!("invalid config {}: {error}", origin.display()),
        ))
    })?;
    Ok(config)
}

pub fn load_config_file(path: &Path) -> Result<DetectorConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents, path)
}

/// Resolves the config from `FONTSCALE_CONFIG`, then the user config
/// directory, then built-in defaults.
pub fn load_config() -> Result<DetectorConfig> {
    let explicit = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    load_config_with(explicit.as_deref(), user_config_dir().as_deref())
}

pub fn load_config_with(
    explicit: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<DetectorConfig> {
    if let Some(path) = explicit {
        return load_config_file(path)
            .with_context(|| format!("{CONFIG_ENV_VAR} points at {}", path.display()));
    }

    if let Some(dir) = config_dir {
        let path = dir.join("fontscale").join(CONFIG_FILE_NAME);
        if path.is_file() {
            return load_config_file(&path);
        }
    }

    Ok(DetectorConfig::default())
}

/// Platform config root: `APPDATA` on Windows, `Application Support` on
/// macOS, `XDG_CONFIG_HOME` or `~/.config` elsewhere.
fn user_config_dir() -> Option<PathBuf> {
    let var = |name: &str| {
        env::var_os(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    };

    if cfg!(target_os = "windows") {
        var("APPDATA")
            .or_else(|| var("USERPROFILE").map(|home| home.join("AppData").join("Roaming")))
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| home.join("Library").join("Application Support"))
    } else {
        var("XDG_CONFIG_HOME").or_else(|| var("HOME").map(|home| home.join(".config")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes::error_code;
    use tempfile::tempdir;

    #[test]
    fn omitted_fields_fall_back_to_defaults() {
        let config = parse_config("min_glyphs: 32\n", Path::new("inline.yaml")).unwrap();
        assert_eq!(config.min_glyphs, 32);
        assert_eq!(config.widths(), 4..=32);
        assert_eq!(config.heights(), 4..=64);
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn empty_range_is_rejected_with_code() {
        let err =
            parse_config("width: { min: 12, max: 8 }\n", Path::new("inline.yaml")).unwrap_err();
        assert_eq!(error_code(&err), Some(CONFIG_INVALID));
        assert!(err.to_string().contains("width range is empty"));
    }

    #[test]
    fn zero_min_glyphs_is_rejected() {
        let err = parse_config("min_glyphs: 0\n", Path::new("inline.yaml")).unwrap_err();
        assert!(err.to_string().contains("min_glyphs"));
    }

    #[test]
    fn oversized_range_is_rejected_with_code() {
        let err = parse_config(
            "width: { min: 4, max: 18446744073709551615 }\nworkers: 2\n",
            Path::new("inline.yaml"),
        )
        .unwrap_err();
        assert_eq!(error_code(&err), Some(CONFIG_INVALID));
        assert!(err.to_string().contains("width.max"));

        let config = parse_config("height: { min: 4, max: 4096 }\n", Path::new("inline.yaml"))
            .unwrap();
        assert_eq!(config.heights(), 4..=MAX_GLYPH_DIMENSION);
    }

    #[test]
    fn huge_worker_count_is_accepted_and_detects() {
        let config =
            parse_config("workers: 18446744073709551615\n", Path::new("inline.yaml")).unwrap();
        let detected = crate::glyph_grid::detect(&[1u8; 4096], &config).unwrap();
        assert_eq!((detected.width, detected.height), (4, 4));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = parse_config("min_glyph: 3\n", Path::new("inline.yaml")).unwrap_err();
        assert_eq!(error_code(&err), Some(CONFIG_INVALID));
        assert!(err.to_string().contains("min_glyph"));
    }

    #[test]
    fn config_dir_file_is_used_when_present() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join("fontscale");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join(CONFIG_FILE_NAME), "workers: 3\n").unwrap();

        let config = load_config_with(None, Some(dir.path())).unwrap();
        assert_eq!(config.worker_count(), 3);
        assert_eq!(config.min_glyphs, DEFAULT_MIN_GLYPHS);
    }

    #[test]
    fn missing_default_file_means_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config_with(None, Some(dir.path())).unwrap();
        assert_eq!(config, DetectorConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = load_config_with(Some(&missing), None).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_ENV_VAR));
    }
}
