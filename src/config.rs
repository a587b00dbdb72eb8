//! Run configuration for the loader and the report generator.
//!
//! Values come from built-in defaults, then an optional JSON file named by
//! `WAFER_CONFIG`, then one environment variable per field.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FEATURE_SOURCE: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/secom/secom.data";
pub const DEFAULT_LABEL_SOURCE: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/secom/secom_labels.data";
pub const DEFAULT_OUTPUT_PATH: &str = "../raw_wafer_data.csv";

pub const DEFAULT_NOTEBOOK_PATH: &str = "../notebooks/01_exploratory_analysis.ipynb";
pub const DEFAULT_REPORT_PATH: &str = "../reports/01_exploratory_analysis.html";
pub const DEFAULT_NOTEBOOK_TIMEOUT_SECS: u64 = 600;

const CONFIG_FILE_VAR: &str = "WAFER_CONFIG";

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Sensor matrix location (URL, `file://` URL, or path).
    pub feature_source: String,
    /// Pass/fail label location.
    pub label_source: String,
    /// Where the CSV backup is written.
    pub output_path: PathBuf,
    /// Per-request HTTP timeout. `None` waits indefinitely.
    pub http_timeout_secs: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            feature_source: DEFAULT_FEATURE_SOURCE.into(),
            label_source: DEFAULT_LABEL_SOURCE.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            http_timeout_secs: None,
        }
    }
}

impl LoaderConfig {
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = env("WAFER_FEATURE_SOURCE") {
            self.feature_source = v;
        }
        if let Some(v) = env("WAFER_LABEL_SOURCE") {
            self.label_source = v;
        }
        if let Some(v) = env("WAFER_OUTPUT_PATH") {
            self.output_path = PathBuf::from(v);
        }
        if let Some(v) = env("WAFER_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = Some(parse_secs("WAFER_HTTP_TIMEOUT_SECS", &v)?);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ReportConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub notebook_path: PathBuf,
    pub output_path: PathBuf,
    /// Per-cell execution limit handed to the notebook engine.
    pub timeout_secs: u64,
    pub kernel_name: String,
    /// Executable providing `nbconvert`.
    pub jupyter_bin: String,
    /// The dataset backup the notebook reads; only checked to warn early.
    /// When unset, [`Settings::resolve`] fills in the loader's output path.
    pub dataset_path: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            notebook_path: PathBuf::from(DEFAULT_NOTEBOOK_PATH),
            output_path: PathBuf::from(DEFAULT_REPORT_PATH),
            timeout_secs: DEFAULT_NOTEBOOK_TIMEOUT_SECS,
            kernel_name: "python3".into(),
            jupyter_bin: "jupyter".into(),
            dataset_path: None,
        }
    }
}

impl ReportConfig {
    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = env("WAFER_NOTEBOOK_PATH") {
            self.notebook_path = PathBuf::from(v);
        }
        if let Some(v) = env("WAFER_REPORT_PATH") {
            self.output_path = PathBuf::from(v);
        }
        if let Some(v) = env("WAFER_NOTEBOOK_TIMEOUT_SECS") {
            self.timeout_secs = parse_secs("WAFER_NOTEBOOK_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = env("WAFER_JUPYTER_BIN") {
            self.jupyter_bin = v;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Combined file + environment resolution
// ---------------------------------------------------------------------------

/// Both sections of the optional config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub loader: LoaderConfig,
    pub report: ReportConfig,
}

impl Settings {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(&|name: &str| std::env::var(name).ok())
    }

    /// Resolve against an arbitrary variable lookup.
    pub fn resolve(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = match env(CONFIG_FILE_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        settings.loader.apply_env(env)?;
        settings.report.apply_env(env)?;
        if settings.report.dataset_path.is_none() {
            settings.report.dataset_path = Some(settings.loader.output_path.clone());
        }
        Ok(settings)
    }

    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(settings)
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSeconds {
            name,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_the_uci_archive() {
        let settings = Settings::resolve(&lookup(&[])).unwrap();
        assert_eq!(settings.loader.feature_source, DEFAULT_FEATURE_SOURCE);
        assert_eq!(settings.loader.label_source, DEFAULT_LABEL_SOURCE);
        assert_eq!(settings.loader.output_path, PathBuf::from("../raw_wafer_data.csv"));
        assert_eq!(settings.loader.http_timeout(), None);
        assert_eq!(settings.report.timeout_secs, 600);
    }

    #[test]
    fn each_field_is_overridable_on_its_own() {
        let settings =
            Settings::resolve(&lookup(&[("WAFER_LABEL_SOURCE", "labels.txt")])).unwrap();
        assert_eq!(settings.loader.label_source, "labels.txt");
        assert_eq!(settings.loader.feature_source, DEFAULT_FEATURE_SOURCE);

        let settings = Settings::resolve(&lookup(&[
            ("WAFER_OUTPUT_PATH", "/tmp/out.csv"),
            ("WAFER_HTTP_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(settings.loader.output_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(settings.loader.http_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.report.dataset_path, Some(PathBuf::from("/tmp/out.csv")));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::resolve(&lookup(&[("WAFER_NOTEBOOK_TIMEOUT_SECS", "ten")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSeconds {
                name: "WAFER_NOTEBOOK_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wafer.json");
        std::fs::write(
            &path,
            r#"{ "loader": { "feature_source": "features.txt" }, "report": { "timeout_secs": 60 } }"#,
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let settings = Settings::resolve(&lookup(&[
            ("WAFER_CONFIG", path_str.as_str()),
            ("WAFER_JUPYTER_BIN", "/opt/conda/bin/jupyter"),
        ]))
        .unwrap();
        assert_eq!(settings.loader.feature_source, "features.txt");
        assert_eq!(settings.loader.label_source, DEFAULT_LABEL_SOURCE);
        assert_eq!(settings.report.timeout_secs, 60);
        assert_eq!(settings.report.kernel_name, "python3");
        assert_eq!(settings.report.jupyter_bin, "/opt/conda/bin/jupyter");
    }

    #[test]
    fn report_dataset_follows_loader_output_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wafer.json");
        std::fs::write(&path, r#"{ "loader": { "output_path": "/data/secom.csv" } }"#).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let settings = Settings::resolve(&lookup(&[("WAFER_CONFIG", path_str.as_str())])).unwrap();
        assert_eq!(settings.loader.output_path, PathBuf::from("/data/secom.csv"));
        assert_eq!(settings.report.dataset_path, Some(PathBuf::from("/data/secom.csv")));
    }

    #[test]
    fn explicit_report_dataset_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wafer.json");
        std::fs::write(
            &path,
            r#"{ "loader": { "output_path": "/data/secom.csv" },
                 "report": { "dataset_path": "/shared/raw_wafer_data.csv" } }"#,
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let settings = Settings::resolve(&lookup(&[("WAFER_CONFIG", path_str.as_str())])).unwrap();
        assert_eq!(
            settings.report.dataset_path,
            Some(PathBuf::from("/shared/raw_wafer_data.csv"))
        );
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let err = Settings::resolve(&lookup(&[("WAFER_CONFIG", "/nonexistent/wafer.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
