//! Dataset Analytics
//!
//! Aggregates the training dataset once at startup into two immutable
//! tables and the chart descriptors drawn on the analytics page.
//!
//! - **Dataset**: CSV loading and row parsing
//! - **Chart**: Plotly figure descriptors built from the tables

mod chart;
mod dataset;
mod error;

pub use chart::{sex_label, Axis, ChartDescriptor, Layout, Title, Trace};
pub use dataset::{read_dataset, read_dataset_from, DatasetRow};
pub use error::{DatasetError, DatasetResult};

use std::collections::BTreeMap;
use std::path::Path;

/// Aggregated view of the training dataset
#[derive(Debug, Clone)]
pub struct Analytics {
    rows: usize,
    count_by_boneage: BTreeMap<u32, usize>,
    count_by_sex: BTreeMap<bool, usize>,
    boneage_chart: ChartDescriptor,
    sex_chart: ChartDescriptor,
}

impl Analytics {
    /// Load the dataset at `path` and aggregate it
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let rows = read_dataset(path)?;
        let analytics = Self::from_rows(&rows);

        tracing::info!(
            path = %path.display(),
            rows = analytics.rows,
            distinct_ages = analytics.count_by_boneage.len(),
            "Dataset loaded"
        );
        tracing::debug!(counts = ?analytics.count_by_sex, "Images per sex");

        Ok(analytics)
    }

    /// Aggregate rows that are already in memory
    pub fn from_rows(rows: &[DatasetRow]) -> Self {
        let mut count_by_boneage = BTreeMap::new();
        let mut count_by_sex = BTreeMap::new();

        for row in rows {
            *count_by_boneage.entry(row.boneage).or_insert(0) += 1;
            *count_by_sex.entry(row.male).or_insert(0) += 1;
        }

        let boneage_chart = ChartDescriptor::boneage_bar(&count_by_boneage);
        let sex_chart = ChartDescriptor::sex_pie(&count_by_sex);

        Self {
            rows: rows.len(),
            count_by_boneage,
            count_by_sex,
            boneage_chart,
            sex_chart,
        }
    }

    /// Number of rows that were aggregated
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Image count per bone age (months)
    pub fn count_by_boneage(&self) -> &BTreeMap<u32, usize> {
        &self.count_by_boneage
    }

    /// Image count per sex (`true` = male)
    pub fn count_by_sex(&self) -> &BTreeMap<bool, usize> {
        &self.count_by_sex
    }

    pub fn boneage_chart(&self) -> &ChartDescriptor {
        &self.boneage_chart
    }

    pub fn sex_chart(&self) -> &ChartDescriptor {
        &self.sex_chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_rows() -> Vec<DatasetRow> {
        vec![
            DatasetRow::new(36, true),
            DatasetRow::new(36, false),
            DatasetRow::new(48, true),
        ]
    }

    #[test]
    fn test_aggregation() {
        let analytics = Analytics::from_rows(&sample_rows());

        assert_eq!(analytics.row_count(), 3);
        assert_eq!(
            analytics.count_by_boneage(),
            &BTreeMap::from([(36, 2), (48, 1)])
        );
        assert_eq!(
            analytics.count_by_sex(),
            &BTreeMap::from([(true, 2), (false, 1)])
        );
    }

    #[test]
    fn test_charts_follow_tables() {
        let analytics = Analytics::from_rows(&sample_rows());

        assert_eq!(
            analytics.boneage_chart().data,
            vec![Trace::Bar {
                x: vec![36, 48],
                y: vec![2, 1]
            }]
        );
        assert_eq!(
            analytics.sex_chart().data,
            vec![Trace::Pie {
                labels: vec!["False".to_string(), "True".to_string()],
                values: vec![1, 2]
            }]
        );
    }

    #[test]
    fn test_empty_dataset() {
        let analytics = Analytics::from_rows(&[]);
        assert_eq!(analytics.row_count(), 0);
        assert!(analytics.count_by_boneage().is_empty());
        assert!(analytics.count_by_sex().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id,boneage,male\n1,36,True\n2,36,False\n3,48,True\n").unwrap();

        let analytics = Analytics::load(file.path()).unwrap();
        assert_eq!(analytics.count_by_boneage().get(&36), Some(&2));
        assert_eq!(analytics.count_by_sex().get(&true), Some(&2));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id,age\n1,36\n").unwrap();

        assert!(Analytics::load(file.path()).is_err());
    }
}
