//! Data layer: table types, text parsing, merging, and the CSV backup.
//!
//! Architecture:
//! ```text
//!  secom.data          secom_labels.data
//!        │                    │
//!        ▼                    ▼
//!   ┌──────────┐        ┌──────────┐
//!   │  parser   │        │  parser   │  whitespace text → tables
//!   └──────────┘        └──────────┘
//!        │ FeatureTable       │ LabelTable
//!        └─────────┬──────────┘
//!                  ▼
//!            ┌──────────┐
//!            │  merge    │  append first label column as `Target`
//!            └──────────┘
//!                  │ CombinedTable
//!                  ▼
//!            ┌──────────┐
//!            │  writer   │  CSV backup (explicit, caller-invoked)
//!            └──────────┘
//! ```

pub mod merge;
pub mod model;
pub mod parser;
pub mod writer;
