//! # Bone Age App
//!
//! A web dashboard for the RSNA bone-age dataset: project information,
//! dataset charts, and bone-age predictions for uploaded hand X-rays.
//!
//! ## Modules
//!
//! - [`analytics`]: Dataset loading and aggregation into chart descriptors
//! - [`predict`]: The `Predictor` abstraction and upload decoding
//! - [`upload`]: Batch processing of uploaded X-rays
//! - [`views`]: Path routing and server-rendered pages
//! - [`web`]: HTTP server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boneage_dashboard::{Analytics, AppState, Config, ModelPair};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!
//!     // Load the dataset once, before serving
//!     let analytics = Analytics::load(&config.dataset.path)?;
//!     let models = ModelPair::from_config(&config.models)?;
//!
//!     let state = AppState::new(analytics, models, config.models.input_size, config.server);
//!     boneage_dashboard::serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod predict;
pub mod upload;
pub mod views;
pub mod web;

// Re-export top-level types for convenience
pub use analytics::{Analytics, ChartDescriptor, DatasetError, DatasetRow};

pub use config::{
    Config, ConfigError, ConfigSource, DatasetConfig, LoggingConfig, ModelsConfig, ServerConfig,
};

pub use predict::{
    DecodeError, DecodedImage, FixedPredictor, ModelPair, PredictError, Prediction, Predictor,
    RemotePredictor, RemotePredictorConfig,
};

pub use upload::{RenderedResult, UploadHandler, UploadedFile};

pub use views::{active_links, route, Layout, ViewTag};

pub use web::{build_router, serve, AppState, WebError};
