//! Chart Descriptors
//!
//! Figures are described in Plotly's JSON figure format and drawn in the
//! browser by Plotly.js. Nothing here does any rendering.

use serde::Serialize;
use std::collections::BTreeMap;

/// A complete figure: traces plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// A single data series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar { x: Vec<u32>, y: Vec<usize> },
    Pie { labels: Vec<String>, values: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl ChartDescriptor {
    /// Bar chart of image counts per bone age in months
    pub fn boneage_bar(counts: &BTreeMap<u32, usize>) -> Self {
        Self {
            data: vec![Trace::Bar {
                x: counts.keys().copied().collect(),
                y: counts.values().copied().collect(),
            }],
            layout: Layout {
                title: Title::new("Cantidad de imágenes por cantidad de meses"),
                xaxis: Some(Axis {
                    title: Title::new("Edad Ósea (meses)"),
                }),
                yaxis: Some(Axis {
                    title: Title::new("Cantidad de imágenes"),
                }),
            },
        }
    }

    /// Pie chart of image counts per sex
    pub fn sex_pie(counts: &BTreeMap<bool, usize>) -> Self {
        Self {
            data: vec![Trace::Pie {
                labels: counts.keys().map(|&male| sex_label(male)).collect(),
                values: counts.values().copied().collect(),
            }],
            layout: Layout {
                title: Title::new("Cantidad de imágenes por género"),
                xaxis: None,
                yaxis: None,
            },
        }
    }

    /// Figure JSON for `Plotly.newPlot`. A figure that fails to serialize
    /// is logged and drawn as an empty plot.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(
                    title = %self.layout.title.text,
                    error = %e,
                    "Failed to serialize chart"
                );
                "{}".to_string()
            }
        }
    }
}

/// Category label for the `male` column, matching the dataset's spelling
pub fn sex_label(male: bool) -> String {
    let label = if male { "True" } else { "False" };
    label.to_string()
}
