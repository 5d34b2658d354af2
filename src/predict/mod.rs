//! Bone-Age Predictors
//!
//! The prediction models live outside this process. Each one is reached
//! through the [`Predictor`] trait so the dashboard can be exercised with
//! stand-ins.
//!
//! - [`RemotePredictor`]: POSTs the image to a model service over HTTP
//! - [`FixedPredictor`]: always answers with the same value

mod decode;
mod remote;

pub use decode::{base64_decode, DataUrl, DecodeError, DecodedImage};
pub use remote::{RemotePredictor, RemotePredictorConfig};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ModelsConfig;

/// Display name of the first model
pub const MODEL_1: &str = "Modelo 1";
/// Display name of the second model
pub const MODEL_2: &str = "Modelo 2";

/// A model output. Only its text form is used.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction(String);

impl Prediction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors from a model invocation
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Model request timed out")]
    Timeout,

    #[error("Model service unavailable")]
    Unavailable,

    #[error("Model service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not encode image: {0}")]
    Encode(#[from] DecodeError),

    #[error("{0}")]
    Other(String),
}

/// A bone-age model
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Label shown next to the prediction
    fn name(&self) -> &str;

    /// Predict from a decoded image
    async fn predict(&self, image: &DecodedImage) -> Result<Prediction, PredictError>;
}

/// Predictor that ignores its input
#[derive(Debug, Clone)]
pub struct FixedPredictor {
    name: String,
    value: String,
}

impl FixedPredictor {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
impl Predictor for FixedPredictor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn predict(&self, _image: &DecodedImage) -> Result<Prediction, PredictError> {
        Ok(Prediction::new(self.value.clone()))
    }
}

/// The two models shown on the prediction page, in display order
#[derive(Clone)]
pub struct ModelPair {
    pub first: Arc<dyn Predictor>,
    pub second: Arc<dyn Predictor>,
}

impl ModelPair {
    pub fn new(first: Arc<dyn Predictor>, second: Arc<dyn Predictor>) -> Self {
        Self { first, second }
    }

    /// Build the pair from configuration. An empty URL leaves that slot
    /// with a placeholder that reports the model as unavailable.
    pub fn from_config(config: &ModelsConfig) -> Result<Self, PredictError> {
        Ok(Self {
            first: build_predictor(MODEL_1, &config.model1_url, config)?,
            second: build_predictor(MODEL_2, &config.model2_url, config)?,
        })
    }

    pub fn names(&self) -> [&str; 2] {
        [self.first.name(), self.second.name()]
    }

    /// Run both models on the same image concurrently
    pub async fn predict(
        &self,
        image: &DecodedImage,
    ) -> (
        Result<Prediction, PredictError>,
        Result<Prediction, PredictError>,
    ) {
        tokio::join!(self.first.predict(image), self.second.predict(image))
    }
}

fn build_predictor(
    name: &str,
    url: &str,
    config: &ModelsConfig,
) -> Result<Arc<dyn Predictor>, PredictError> {
    if url.trim().is_empty() {
        tracing::warn!(model = name, "No endpoint configured, model disabled");
        return Ok(Arc::new(FixedPredictor::new(name, "no disponible")));
    }

    let predictor = RemotePredictor::new(RemotePredictorConfig {
        name: name.to_string(),
        url: url.to_string(),
        timeout_secs: config.timeout_secs,
    })?;
    tracing::info!(model = name, url = %url, "Model endpoint configured");
    Ok(Arc::new(predictor))
}
