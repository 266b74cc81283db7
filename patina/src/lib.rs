//! # Patina
//!
//! A multi-stage model pipeline that turns one vintage car photo plus two
//! preference selections into a composed restoration report.
//!
//! Four stages run in a fixed order, each binding a role, a fixed
//! instruction set ending in a literal output template, and a prompt built
//! from prior stage outputs:
//!
//! - **Identification**: identifies make, model, and era from the photo
//! - **Contextualization**: explains the model's historical significance
//! - **Strategy**: proposes a restoration direction from the preferences
//! - **Sourcing**: finds real parts, with web search bound as a model tool
//!
//! The assembled report is a fixed title block, the four sections in order
//! separated by horizontal rules, and a fixed closing block.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use patina::prelude::*;
//!
//! let pipeline = RestorationPipeline::from_credentials(
//!     Credentials::new(model_key, search_key),
//! );
//! let request = RestorationRequest::new(
//!     CarImage::new(photo_bytes, ImageFormat::Jpeg),
//!     DesignApproach::SubtleModernTouches,
//!     StylingFlavor::RetroSport,
//! );
//! let report = pipeline.generate_report(&request).await?;
//! report.write_to(Path::new("car_restoration_report.md"))?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod context;
pub mod errors;
pub mod inference;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod request;
pub mod search;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{Credentials, ModelConfig, SearchConfig};
    pub use crate::context::{PipelineContext, StageName, StageOutput};
    pub use crate::errors::{
        PreconditionError, ProviderError, RestorationError, TemplateWarning,
    };
    pub use crate::inference::{InferenceClient, InferenceRequest, OpenAiClient};
    pub use crate::pipeline::RestorationPipeline;
    pub use crate::report::{RestorationReport, SECTION_DELIMITER, TITLE_BLOCK};
    pub use crate::request::{
        CarImage, DesignApproach, ImageFormat, RestorationRequest, StylingFlavor,
    };
    pub use crate::search::{SearchHit, SearchTool, SerpApiTool};
    pub use crate::stages::{stage_catalog, StageSpec};
}
