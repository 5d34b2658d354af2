//! Data Transfer Objects
//!
//! Request and response bodies of the JSON endpoints.

use serde::{Deserialize, Serialize};

use crate::analytics::ChartDescriptor;
use crate::upload::UploadedFile;

/// Upload request sent by the prediction page
#[derive(Debug, Default, Deserialize)]
pub struct UploadRequest {
    /// Absent and `null` are both accepted and mean "no files"
    #[serde(default)]
    pub files: Option<Vec<UploadedFile>>,
}

/// Chart descriptors of the analytics page
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub boneage: ChartDescriptor,
    pub sex: ChartDescriptor,
}

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub dataset_rows: usize,
    pub models: Vec<String>,
    pub uptime_seconds: u64,
    pub version: String,
}
