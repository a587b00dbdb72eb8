//! Fetch-and-merge for the SECOM dataset.

use crate::config::LoaderConfig;
use crate::data::merge::merge;
use crate::data::model::CombinedTable;
use crate::data::parser::{parse_feature_table, parse_label_table};
use crate::error::AcquisitionError;
use crate::source::TextSource;

/// Download both tables, keep the first label column as `Target`, and join
/// them side by side.
///
/// The two fetches run one after the other. Nothing is written to disk.
pub fn fetch_and_merge(
    config: &LoaderConfig,
    source: &dyn TextSource,
) -> Result<CombinedTable, AcquisitionError> {
    log::info!("Connecting to wafer data source...");

    log::info!("Downloading sensor data from {}", config.feature_source);
    let text = source.fetch_text(&config.feature_source)?;
    let features = parse_feature_table(&text)
        .map_err(|e| AcquisitionError::malformed(&config.feature_source, e))?;
    log::debug!(
        "parsed {} x {} sensor table ({} missing cells)",
        features.len(),
        features.width(),
        features.missing_cells()
    );

    log::info!("Downloading label data from {}", config.label_source);
    let text = source.fetch_text(&config.label_source)?;
    let labels = parse_label_table(&text)
        .map_err(|e| AcquisitionError::malformed(&config.label_source, e))?;

    let combined = merge(features, &labels)?;

    log::debug!("combined table: {combined}");
    log::info!("Data loaded successfully.");
    log::info!("Total wafers (rows): {}", combined.len());
    log::info!("Total sensors (columns): {}", combined.sensor_count());
    Ok(combined)
}

/// Like [`fetch_and_merge`], but a failure is logged and reported as `None`.
pub fn load_process_data(
    config: &LoaderConfig,
    source: &dyn TextSource,
) -> Option<CombinedTable> {
    match fetch_and_merge(config, source) {
        Ok(table) => Some(table),
        Err(e) => {
            log::error!("Error downloading data: {e}");
            None
        }
    }
}
