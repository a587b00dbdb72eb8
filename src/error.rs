//! Error types shared across the loader.

use thiserror::Error;

use crate::data::merge::MergeError;
use crate::data::parser::ParseError;

/// Why the dataset could not be acquired. Any of these ends a load with no
/// table; nothing is retried and no partial result is kept.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("{location} is unreachable: {reason}")]
    Unreachable { location: String, reason: String },

    #[error("{location} was not found")]
    NotFound { location: String },

    #[error("{location} is malformed: {source}")]
    Malformed {
        location: String,
        #[source]
        source: ParseError,
    },

    #[error("tables cannot be aligned: {0}")]
    Misaligned(#[from] MergeError),
}

impl AcquisitionError {
    pub(crate) fn unreachable(location: &str, reason: impl ToString) -> Self {
        AcquisitionError::Unreachable {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn not_found(location: &str) -> Self {
        AcquisitionError::NotFound {
            location: location.to_string(),
        }
    }

    pub(crate) fn malformed(location: &str, source: ParseError) -> Self {
        AcquisitionError::Malformed {
            location: location.to_string(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("environment variable {name}='{value}' is not a whole number of seconds")]
    InvalidSeconds { name: &'static str, value: String },
}
