//! Model Service Client
//!
//! HTTP client for a bone-age model served behind a REST endpoint.
//! The image is POSTed as `image/png`; the service answers either with
//! `{"prediction": <value>}` or with a plain-text body.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;

use super::{DecodedImage, PredictError, Prediction, Predictor};

/// Configuration for one model endpoint
#[derive(Debug, Clone)]
pub struct RemotePredictorConfig {
    /// Display name ("Modelo 1")
    pub name: String,
    /// Full URL of the prediction endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Predictor backed by a model service
pub struct RemotePredictor {
    client: Client,
    config: RemotePredictorConfig,
}

impl RemotePredictor {
    pub fn new(config: RemotePredictorConfig) -> Result<Self, PredictError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemotePredictorConfig {
        &self.config
    }
}

#[async_trait]
impl Predictor for RemotePredictor {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn predict(&self, image: &DecodedImage) -> Result<Prediction, PredictError> {
        // PNG encoding is CPU work, keep it off the async workers
        let image = image.clone();
        let body = tokio::task::spawn_blocking(move || image.to_png())
            .await
            .map_err(|e| PredictError::Other(format!("PNG encoding task failed: {}", e)))??;

        let response = self
            .client
            .post(&self.config.url)
            .header(header::CONTENT_TYPE, "image/png")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PredictError::Timeout
                } else if e.is_connect() {
                    PredictError::Unavailable
                } else {
                    PredictError::Request(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(PredictError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        tracing::debug!(model = %self.config.name, bytes = text.len(), "Model responded");
        parse_response(&text)
    }
}

/// Turn a model service response body into a prediction
fn parse_response(body: &str) -> Result<Prediction, PredictError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(PredictError::Other("Empty model response".to_string()));
    }

    // Only an object carrying `prediction` is unwrapped; every other body is shown as sent
    let prediction = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut map)) => map.remove("prediction"),
        _ => None,
    };

    Ok(match prediction {
        Some(Value::String(s)) => Prediction::new(s),
        Some(other) => Prediction::new(other.to_string()),
        None => Prediction::new(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    #[test]
    fn test_parse_json_number() {
        let prediction = parse_response(r#"{"prediction": 132.7}"#).unwrap();
        assert_eq!(prediction.as_str(), "132.7");
    }

    #[test]
    fn test_parse_json_string_and_array() {
        let prediction = parse_response(r#"{"prediction": "11 años"}"#).unwrap();
        assert_eq!(prediction.as_str(), "11 años");

        let prediction = parse_response(r#"{"prediction": [[96.25]]}"#).unwrap();
        assert_eq!(prediction.as_str(), "[[96.25]]");
    }

    #[test]
    fn test_parse_plain_text() {
        let prediction = parse_response("  [[101.3]]\n").unwrap();
        assert_eq!(prediction.as_str(), "[[101.3]]");
    }

    #[test]
    fn test_parse_json_without_prediction_key() {
        let prediction = parse_response(r#"{"age": 96}"#).unwrap();
        assert_eq!(prediction.as_str(), r#"{"age": 96}"#);

        let prediction = parse_response("[101.3, 99.0]").unwrap();
        assert_eq!(prediction.as_str(), "[101.3, 99.0]");
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(parse_response("  ").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let predictor = RemotePredictor::new(RemotePredictorConfig {
            name: "Modelo 1".to_string(),
            // Port 9 (discard) is not expected to be listening
            url: "http://127.0.0.1:9/predict".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let image = DecodedImage::from_data_url(&crate::predict::tests::png_data_url(4, 4), 8)
            .unwrap();

        assert_eq!(predictor.name(), "Modelo 1");
        assert!(predictor.predict(&image).await.is_err());
    }

    async fn model_endpoint(headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
        let is_png = headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            == Some("image/png");
        if !is_png || image::guess_format(&body).ok() != Some(image::ImageFormat::Png) {
            return (StatusCode::UNSUPPORTED_MEDIA_TYPE, Json(json!({"error": "expected PNG"})));
        }
        (StatusCode::OK, Json(json!({"prediction": 120})))
    }

    async fn failing_endpoint() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "model crashed")
    }

    /// Start a model service on an ephemeral port and return its base URL
    async fn spawn_model_service() -> String {
        let app = Router::new()
            .route("/ok", post(model_endpoint))
            .route("/fail", post(failing_endpoint));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn predictor_for(url: String) -> RemotePredictor {
        RemotePredictor::new(RemotePredictorConfig {
            name: "Modelo 1".to_string(),
            url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_predict_against_model_service() {
        let base = spawn_model_service().await;
        let image = DecodedImage::from_data_url(&crate::predict::tests::png_data_url(4, 4), 8)
            .unwrap();

        let prediction = predictor_for(format!("{}/ok", base))
            .predict(&image)
            .await
            .unwrap();
        assert_eq!(prediction.as_str(), "120");

        let err = predictor_for(format!("{}/fail", base))
            .predict(&image)
            .await
            .unwrap_err();
        match err {
            PredictError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model crashed");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }
}
