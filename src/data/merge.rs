use thiserror::Error;

use super::model::{CombinedTable, FeatureTable, LabelTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("feature table has {features} rows but label table has {labels}")]
    RowCountMismatch { features: usize, labels: usize },
}

/// Append the first label column to the feature table, row by row.
///
/// Rows are matched by position only, so both tables must have the same
/// number of rows. Label columns after the first are dropped.
pub fn merge(features: FeatureTable, labels: &LabelTable) -> Result<CombinedTable, MergeError> {
    if features.len() != labels.len() {
        return Err(MergeError::RowCountMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }
    Ok(CombinedTable::new(features, labels.outcomes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LabelRecord, TARGET_COLUMN};

    fn labels(outcomes: &[i64]) -> LabelTable {
        LabelTable {
            records: outcomes
                .iter()
                .map(|&outcome| LabelRecord {
                    outcome,
                    rest: vec!["19/07/2008 11:55:00".into()],
                })
                .collect(),
        }
    }

    #[test]
    fn appends_one_target_column() {
        let rows = 4;
        let cols = 6;
        let features = FeatureTable::from_rows(vec![vec![Some(1.25); cols]; rows]);
        let combined = merge(features, &labels(&[1; 4])).unwrap();

        assert_eq!(combined.len(), rows);
        assert_eq!(combined.column_count(), cols + 1);
        assert_eq!(combined.column_names().last().map(String::as_str), Some(TARGET_COLUMN));
        assert!(combined.target().iter().all(|&t| t == 1));
    }

    #[test]
    fn timestamps_never_reach_the_combined_table() {
        let features = FeatureTable::from_rows(vec![vec![Some(0.0)]; 2]);
        let combined = merge(features, &labels(&[-1, 1])).unwrap();
        assert_eq!(combined.column_names(), vec!["0", TARGET_COLUMN]);
        assert_eq!(combined.target(), &[-1, 1]);
    }

    #[test]
    fn row_count_mismatch_fails_loudly() {
        let features = FeatureTable::from_rows(vec![vec![Some(0.0)]; 3]);
        assert_eq!(
            merge(features, &labels(&[-1, 1])),
            Err(MergeError::RowCountMismatch {
                features: 3,
                labels: 2
            })
        );
    }
}
