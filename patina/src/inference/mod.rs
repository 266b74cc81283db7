//! Language-model invocation.
//!
//! One [`InferenceRequest`] is one round trip to the hosted model: a role
//! label, a fixed instruction list ending in the literal output template,
//! a prompt built from prior stage outputs, and optionally the uploaded
//! image. The returned text is passed through unvalidated - there is no
//! schema-enforcement layer, by design.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::request::CarImage;
use crate::search::SearchTool;

/// One model invocation.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Short role label; used for logging only, never semantics.
    pub role: String,
    /// What the model is, in one or two sentences.
    pub description: String,
    /// Ordered instructions; the final entry is the literal output
    /// template downstream display depends on.
    pub instructions: Vec<String>,
    /// The prompt text built from prior stage outputs.
    pub prompt: String,
    /// The uploaded image, when the stage analyzes it.
    pub image: Option<CarImage>,
}

impl InferenceRequest {
    /// Creates a request with no image.
    #[must_use]
    pub fn new(
        role: impl Into<String>,
        description: impl Into<String>,
        instructions: Vec<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            description: description.into(),
            instructions,
            prompt: prompt.into(),
            image: None,
        }
    }

    /// Attaches the uploaded image.
    #[must_use]
    pub fn with_image(mut self, image: CarImage) -> Self {
        self.image = Some(image);
        self
    }

    /// The full instruction block sent as the system message.
    #[must_use]
    pub fn system_text(&self) -> String {
        let mut text = self.description.clone();
        for instruction in &self.instructions {
            text.push('\n');
            text.push_str(instruction);
        }
        text
    }
}

/// A hosted language model.
///
/// When a tool is passed, the model - not the caller - decides whether to
/// invoke it; implementations must handle both the tool-called and the
/// tool-not-called paths.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Runs one invocation and returns the generated text.
    async fn invoke(
        &self,
        request: InferenceRequest,
        tool: Option<&dyn SearchTool>,
    ) -> Result<String, ProviderError>;
}
