//! Wafer Loader – acquisition of the SECOM semiconductor process dataset.
//!
//! [`loader::fetch_and_merge`] downloads the sensor matrix and the pass/fail
//! labels, and returns them as one [`CombinedTable`]. Saving the table is a
//! separate step ([`persist_if_present`]). The [`report`] module drives the
//! external notebook engine that turns the analysis notebook into HTML.

pub mod config;
pub mod data;
pub mod error;
pub mod loader;
pub mod report;
pub mod source;

pub use config::{LoaderConfig, ReportConfig, Settings};
pub use data::model::{CombinedTable, FeatureTable, LabelTable, TARGET_COLUMN};
pub use data::writer::persist_if_present;
pub use error::AcquisitionError;
pub use loader::{fetch_and_merge, load_process_data};
pub use source::{Fetcher, TextSource};
