//! The pipeline orchestrator.
//!
//! Strictly linear: identification, contextualization, strategy, sourcing,
//! then assembly. Each stage runs only after its required upstream output
//! exists. Any provider failure halts the run with no partial report. The
//! cancellation token is checked between stages only - a provider request
//! in flight cannot be interrupted without leaking the remote operation.


use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cancellation::CancellationToken;
use crate::config::{Credentials, ModelConfig, SearchConfig};
use crate::context::{PipelineContext, StageOutput};
use crate::errors::{PreconditionError, RestorationError};
use crate::inference::{InferenceClient, InferenceRequest, OpenAiClient};
use crate::report::{assemble_from_context, RestorationReport};
use crate::request::RestorationRequest;
use crate::search::{SearchTool, SerpApiTool};
use crate::stages::{check_template, stage_catalog, StageSpec};

/// The restoration pipeline.
///
/// One instance can serve many runs; each run owns its own
/// [`PipelineContext`] exclusively.
pub struct RestorationPipeline {
    client: Arc<dyn InferenceClient>,
    search: Arc<dyn SearchTool>,
    credentials: Credentials,
}

impl RestorationPipeline {
    /// Creates a pipeline with injected provider implementations.
    #[must_use]
    pub fn new(
        client: Arc<dyn InferenceClient>,
        search: Arc<dyn SearchTool>,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            search,
            credentials,
        }
    }

    /// Creates a pipeline over the hosted providers with default
    /// configuration.
    #[must_use]
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self::with_configs(credentials, ModelConfig::default(), SearchConfig::default())
    }

    /// Creates a pipeline over the hosted providers with explicit
    /// configuration.
    #[must_use]
    pub fn with_configs(
        credentials: Credentials,
        model_config: ModelConfig,
        search_config: SearchConfig,
    ) -> Self {
        let client = OpenAiClient::new(credentials.model_api_key.clone(), model_config);
        let search = SerpApiTool::new(credentials.search_api_key.clone(), search_config);
        Self::new(Arc::new(client), Arc::new(search), credentials)
    }

    /// Runs the pipeline with a fresh cancellation token.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn generate_report(
        &self,
        request: &RestorationRequest,
    ) -> Result<RestorationReport, RestorationError> {
        self.run(request, &CancellationToken::new()).await
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    ///
    /// - [`RestorationError::Precondition`] when a credential or the image
    ///   is missing; no remote call is made.
    /// - [`RestorationError::Provider`] when a stage's model call fails;
    ///   downstream stages do not run and no partial report is emitted.
    /// - [`RestorationError::Cancelled`] when the token is cancelled
    ///   between stages.
    pub async fn run(
        &self,
        request: &RestorationRequest,
        token: &CancellationToken,
    ) -> Result<RestorationReport, RestorationError> {
        self.validate_preconditions(request)?;

        let mut ctx = PipelineContext::new();
        info!(run_id = %ctx.run_id(), "starting restoration pipeline");

        for spec in stage_catalog() {
            if token.is_cancelled() {
                let reason = token.reason().unwrap_or_else(|| "no reason given".to_string());
                info!(run_id = %ctx.run_id(), stage = %spec.name, %reason, "run cancelled");
                return Err(RestorationError::Cancelled { reason });
            }
            if let Some(upstream) = spec.requires {
                if ctx.get(upstream).is_none() {
                    return Err(RestorationError::Internal(format!(
                        "stage '{}' scheduled before upstream '{upstream}' produced output",
                        spec.name
                    )));
                }
            }

            let output = self.run_stage(&spec, request, &ctx).await?;
            ctx.record(output).map_err(|stage| {
                RestorationError::Internal(format!("stage '{stage}' produced output twice"))
            })?;
        }

        let report = assemble_from_context(&ctx)?;
        info!(
            run_id = %ctx.run_id(),
            bytes = report.as_markdown().len(),
            warnings = report.warnings().len(),
            "restoration report assembled"
        );
        Ok(report)
    }

    /// Checks that both credentials and the image are present, in the
    /// order they are requested from the caller.
    fn validate_preconditions(
        &self,
        request: &RestorationRequest,
    ) -> Result<(), PreconditionError> {
        self.credentials.validate()?;
        if request.image.is_empty() {
            return Err(PreconditionError::MissingImage);
        }
        Ok(())
    }

    async fn run_stage(
        &self,
        spec: &StageSpec,
        request: &RestorationRequest,
        ctx: &PipelineContext,
    ) -> Result<StageOutput, RestorationError> {
        debug!(stage = %spec.name, role = spec.role, "running stage");

        let mut inference = InferenceRequest::new(
            spec.role,
            spec.description,
            spec.instructions(),
            spec.build_prompt(request, ctx),
        );
        if spec.attach_image {
            inference = inference.with_image(request.image.clone());
        }
        let tool: Option<&dyn SearchTool> = if spec.bind_search {
            Some(self.search.as_ref())
        } else {
            None
        };

        let content = self.client.invoke(inference, tool).await?;

        let warnings = check_template(spec.name, &content);
        for warning in &warnings {
            warn!(stage = %spec.name, %warning, "template mismatch");
        }

        debug!(stage = %spec.name, bytes = content.len(), "stage complete");
        Ok(StageOutput::new(spec.name, content).with_warnings(warnings))
    }
}

impl std::fmt::Debug for RestorationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestorationPipeline")
            .field("credentials", &self.credentials)
            .finish()
    }
}
