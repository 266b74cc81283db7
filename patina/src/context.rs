//! Run-scoped context: stage names, stage outputs, and the append-only
//! accumulation of outputs a run builds up as it progresses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TemplateWarning;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageName {
    /// Identify the car's make, model, and era from the photo.
    Identification,
    /// Explain the historical and cultural significance of the model.
    Contextualization,
    /// Propose a restoration direction from the user's preferences.
    Strategy,
    /// Find real parts and accessories for the restoration.
    Sourcing,
}

impl StageName {
    /// All stages in execution order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::Identification,
            Self::Contextualization,
            Self::Strategy,
            Self::Sourcing,
        ]
    }

    /// The stage's snake_case identifier, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identification => "identification",
            Self::Contextualization => "contextualization",
            Self::Strategy => "strategy",
            Self::Sourcing => "sourcing",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text a stage produced, tagged with its origin.
///
/// Immutable once created; ownership moves to the pipeline context, which
/// hands out read-only references to downstream stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    /// The stage that produced this output.
    pub stage: StageName,
    /// The raw generated text, assumed (not verified) to follow the
    /// stage's requested template.
    pub content: String,
    /// Non-fatal template mismatches detected in the content.
    pub warnings: Vec<TemplateWarning>,
}

impl StageOutput {
    /// Creates a stage output with no warnings.
    #[must_use]
    pub fn new(stage: StageName, content: impl Into<String>) -> Self {
        Self {
            stage,
            content: content.into(),
            warnings: Vec::new(),
        }
    }

    /// Attaches template warnings.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<TemplateWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Accumulates stage outputs over one pipeline run.
///
/// Append-only: a stage's slot is written exactly once and never mutated
/// afterwards. Scoped to a single run; there is no cross-run sharing.
#[derive(Debug)]
pub struct PipelineContext {
    run_id: Uuid,
    outputs: Vec<StageOutput>,
}

impl PipelineContext {
    /// Creates an empty context with a fresh run id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            outputs: Vec::with_capacity(StageName::all().len()),
        }
    }

    /// The run id, used to correlate log lines for one invocation.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Records a stage's output.
    ///
    /// # Errors
    ///
    /// Returns the stage name if that stage already wrote an output; a
    /// second write is a sequencing bug in the orchestrator, never
    /// something to resolve by overwriting.
    pub fn record(&mut self, output: StageOutput) -> Result<(), StageName> {
        if self.get(output.stage).is_some() {
            return Err(output.stage);
        }
        self.outputs.push(output);
        Ok(())
    }

    /// Returns the recorded output for a stage, if any.
    #[must_use]
    pub fn get(&self, stage: StageName) -> Option<&StageOutput> {
        self.outputs.iter().find(|o| o.stage == stage)
    }

    /// Returns the recorded content for a stage, if any.
    #[must_use]
    pub fn content(&self, stage: StageName) -> Option<&str> {
        self.get(stage).map(|o| o.content.as_str())
    }

    /// All outputs in the order they were recorded.
    #[must_use]
    pub fn outputs(&self) -> &[StageOutput] {
        &self.outputs
    }

    /// Whether every stage has produced output.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        StageName::all().iter().all(|s| self.get(*s).is_some())
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stage_order() {
        let stages = StageName::all();
        assert_eq!(stages[0], StageName::Identification);
        assert_eq!(stages[1], StageName::Contextualization);
        assert_eq!(stages[2], StageName::Strategy);
        assert_eq!(stages[3], StageName::Sourcing);
    }

    #[test]
    fn test_record_and_read_back() {
        let mut ctx = PipelineContext::new();
        ctx.record(StageOutput::new(StageName::Identification, "a 1967 Mustang"))
            .unwrap();

        assert_eq!(ctx.content(StageName::Identification), Some("a 1967 Mustang"));
        assert_eq!(ctx.content(StageName::Strategy), None);
        assert!(!ctx.is_complete());
    }

    #[test]
    fn test_record_rejects_double_write() {
        let mut ctx = PipelineContext::new();
        ctx.record(StageOutput::new(StageName::Strategy, "first"))
            .unwrap();

        let err = ctx.record(StageOutput::new(StageName::Strategy, "second"));
        assert_eq!(err, Err(StageName::Strategy));
        // First write is preserved.
        assert_eq!(ctx.content(StageName::Strategy), Some("first"));
    }

    #[test]
    fn test_is_complete_after_all_stages() {
        let mut ctx = PipelineContext::new();
        for stage in StageName::all() {
            ctx.record(StageOutput::new(stage, "text")).unwrap();
        }
        assert!(ctx.is_complete());
        assert_eq!(ctx.outputs().len(), 4);
    }

    #[test]
    fn test_fresh_contexts_have_distinct_run_ids() {
        assert_ne!(PipelineContext::new().run_id(), PipelineContext::new().run_id());
    }
}
