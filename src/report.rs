//! Executes the analysis notebook and exports it as an HTML report.
//!
//! Notebook execution and HTML rendering are delegated to `jupyter nbconvert`;
//! this module resolves paths, prepares the output directory, runs the engine
//! in the notebook's own directory and checks what it produced.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::ReportConfig;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("notebook not found: {}", .0.display())]
    NotebookMissing(PathBuf),

    #[error("creating report directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("notebook execution failed ({status}): {stderr}")]
    Execution { status: String, stderr: String },

    #[error("engine finished but {} was not written", .0.display())]
    MissingOutput(PathBuf),
}

impl ReportError {
    /// Failures of the notebook run itself, as opposed to bad inputs.
    /// These end the report run without failing the process.
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            ReportError::Spawn { .. } | ReportError::Execution { .. } | ReportError::MissingOutput(_)
        )
    }
}

/// Paths the engine is invoked with, all absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub notebook: PathBuf,
    pub working_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Output base name without extension; the engine appends `.html`.
    pub output_stem: String,
}

impl ReportPlan {
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.html", self.output_stem))
    }
}

/// Arguments for `jupyter nbconvert` that execute every cell and render HTML.
pub fn nbconvert_args(config: &ReportConfig, plan: &ReportPlan) -> Vec<OsString> {
    vec![
        "nbconvert".into(),
        "--to".into(),
        "html".into(),
        "--execute".into(),
        format!("--ExecutePreprocessor.timeout={}", config.timeout_secs).into(),
        format!("--ExecutePreprocessor.kernel_name={}", config.kernel_name).into(),
        "--output-dir".into(),
        plan.output_dir.clone().into_os_string(),
        "--output".into(),
        plan.output_stem.clone().into(),
        plan.notebook.clone().into_os_string(),
    ]
}

/// Check inputs and create the output directory.
pub fn prepare(config: &ReportConfig) -> Result<ReportPlan, ReportError> {
    let notebook = config
        .notebook_path
        .canonicalize()
        .map_err(|_| ReportError::NotebookMissing(config.notebook_path.clone()))?;
    if !notebook.is_file() {
        return Err(ReportError::NotebookMissing(notebook));
    }
    let working_dir = notebook
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if let Some(dataset) = &config.dataset_path {
        if !dataset.exists() {
            log::warn!(
                "dataset backup {} is missing; the notebook may fail to load its data",
                dataset.display()
            );
        }
    }

    let requested_dir = match config.output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&requested_dir).map_err(|source| ReportError::OutputDir {
        path: requested_dir.clone(),
        source,
    })?;
    let output_dir = requested_dir
        .canonicalize()
        .map_err(|source| ReportError::OutputDir {
            path: requested_dir.clone(),
            source,
        })?;

    let output_stem = config
        .output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());

    Ok(ReportPlan {
        notebook,
        working_dir,
        output_dir,
        output_stem,
    })
}

/// Execute the notebook and write the HTML export. Returns the report path.
pub fn generate_report(config: &ReportConfig) -> Result<PathBuf, ReportError> {
    log::info!("Reading notebook: {}", config.notebook_path.display());
    let plan = prepare(config)?;

    log::info!(
        "Executing notebook (cell timeout {}s, kernel {})...",
        config.timeout_secs,
        config.kernel_name
    );
    let output = Command::new(&config.jupyter_bin)
        .args(nbconvert_args(config, &plan))
        .current_dir(&plan.working_dir)
        .output()
        .map_err(|source| ReportError::Spawn {
            program: config.jupyter_bin.clone(),
            source,
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        log::debug!("nbconvert: {line}");
    }
    if !output.status.success() {
        return Err(ReportError::Execution {
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    let html = plan.html_path();
    if !html.is_file() {
        return Err(ReportError::MissingOutput(html));
    }
    log::info!("Report generated successfully: {}", html.display());
    Ok(html)
}
