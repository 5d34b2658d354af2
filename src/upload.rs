//! Upload Handling
//!
//! Turns a batch of uploaded X-rays into result fragments for the
//! prediction page. Files are processed one after another, in order, and
//! each yields exactly one fragment:
//!
//! - decode failure: an error fragment naming the file
//! - otherwise: the image plus one line per model, where a failed model
//!   shows its error in place of a prediction

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::predict::{DecodedImage, ModelPair, PredictError, Prediction};
use crate::views::html_escape;

/// A file as sent by the upload widget
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Data URL: `data:<mime>;base64,<payload>`
    pub contents: String,
    pub filename: String,
    /// Seconds since the Unix epoch, as reported by the browser
    #[serde(default)]
    pub last_modified: Option<f64>,
}

impl UploadedFile {
    pub fn new(contents: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            filename: filename.into(),
            last_modified: None,
        }
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.last_modified?;
        if !secs.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis((secs * 1000.0) as i64)
    }
}

/// One model's line in a result fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ModelLine {
    pub model: String,
    pub outcome: Result<String, String>,
}

impl ModelLine {
    fn new(model: &str, result: Result<Prediction, PredictError>) -> Self {
        Self {
            model: model.to_string(),
            outcome: result
                .map(|p| p.to_string())
                .map_err(|e| e.to_string()),
        }
    }

    /// Text shown to the user, e.g. `Modelo 1: 120.5`
    pub fn text(&self) -> String {
        match &self.outcome {
            Ok(prediction) => format!("{}: {}", self.model, prediction),
            Err(error) => format!("{}: error ({})", self.model, error),
        }
    }
}

/// Result fragment for one uploaded file
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedResult {
    /// The image decoded and both models were invoked
    Predicted {
        filename: String,
        image_src: String,
        lines: [ModelLine; 2],
    },
    /// The upload could not be decoded
    Failed { filename: String, error: String },
}

impl RenderedResult {
    pub fn filename(&self) -> &str {
        match self {
            RenderedResult::Predicted { filename, .. }
            | RenderedResult::Failed { filename, .. } => filename,
        }
    }

    pub fn is_predicted(&self) -> bool {
        matches!(self, RenderedResult::Predicted { .. })
    }

    pub fn to_html(&self) -> String {
        match self {
            RenderedResult::Predicted {
                filename,
                image_src,
                lines,
            } => format!(
                r#"<div class="upload-result">
    <img src="{src}" alt="{filename}">
    <hr>
    <div>Predicciones: </div>
    <pre>{first}</pre>
    <pre>{second}</pre>
</div>"#,
                src = html_escape(image_src),
                filename = html_escape(filename),
                first = html_escape(&lines[0].text()),
                second = html_escape(&lines[1].text()),
            ),
            RenderedResult::Failed { filename, error } => format!(
                r#"<div class="upload-result alert alert-danger">
    <strong>{filename}</strong>: no se pudo procesar la imagen ({error})
</div>"#,
                filename = html_escape(filename),
                error = html_escape(error),
            ),
        }
    }
}

/// Concatenate result fragments in order
pub fn render_results(results: &[RenderedResult]) -> String {
    results
        .iter()
        .map(RenderedResult::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs uploads through the model pair
#[derive(Clone)]
pub struct UploadHandler {
    models: ModelPair,
    input_size: u32,
}

impl UploadHandler {
    /// `input_size` is the square side length images are resized to
    pub fn new(models: ModelPair, input_size: u32) -> Self {
        Self { models, input_size }
    }

    pub fn models(&self) -> &ModelPair {
        &self.models
    }

    /// Process a batch. Absent or empty input yields no fragments.
    pub async fn handle_upload(&self, files: Option<&[UploadedFile]>) -> Vec<RenderedResult> {
        let files = match files {
            Some(files) if !files.is_empty() => files,
            _ => return Vec::new(),
        };

        tracing::info!(files = files.len(), "Processing upload");

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(self.process(file).await);
        }
        results
    }

    async fn process(&self, file: &UploadedFile) -> RenderedResult {
        tracing::debug!(
            filename = %file.filename,
            last_modified = ?file.last_modified_at(),
            "Decoding uploaded file"
        );

        let image = match decode_upload(&file.contents, self.input_size).await {
            Ok(image) => image,
            Err(error) => {
                tracing::warn!(
                    filename = %file.filename,
                    error = %error,
                    "Failed to decode upload"
                );
                return RenderedResult::Failed {
                    filename: file.filename.clone(),
                    error,
                };
            }
        };

        let (first, second) = self.models.predict(&image).await;
        let [first_name, second_name] = self.models.names();
        let lines = [
            ModelLine::new(first_name, first),
            ModelLine::new(second_name, second),
        ];

        for line in &lines {
            if let Err(error) = &line.outcome {
                tracing::warn!(
                    filename = %file.filename,
                    model = %line.model,
                    error = %error,
                    "Model invocation failed"
                );
            }
        }

        RenderedResult::Predicted {
            filename: file.filename.clone(),
            image_src: file.contents.clone(),
            lines,
        }
    }
}

/// Decode a data URL on the blocking pool. A full-size X-ray takes long
/// enough to decode and resize that it must not run on an async worker.
async fn decode_upload(contents: &str, size: u32) -> Result<DecodedImage, String> {
    let contents = contents.to_string();
    match tokio::task::spawn_blocking(move || DecodedImage::from_data_url(&contents, size)).await {
        Ok(decoded) => decoded.map_err(|e| e.to_string()),
        Err(e) => Err(format!("decoding task failed: {}", e)),
    }
}
