//! The declarative stage table.
//!
//! Each stage is one row: a role label, a fixed instruction list ending in
//! the literal output template, a prompt builder over prior context, and
//! the image/tool bindings. A generic orchestrator loop consumes the table,
//! so each stage can also be unit-tested without running the whole chain.

mod catalog;
mod template;

pub use catalog::stage_catalog;
pub use template::check_template;

use chrono::Local;

use crate::context::{PipelineContext, StageName};
use crate::request::RestorationRequest;

/// Builds a stage's prompt from the request and the accumulated context.
pub type PromptBuilder = fn(&RestorationRequest, &PipelineContext) -> String;

/// One row of the stage table.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The stage this row defines.
    pub name: StageName,
    /// Role label, used for logging and identification only.
    pub role: &'static str,
    /// What the model is, sent at the top of the system message.
    pub description: &'static str,
    /// Ordered instructions; the final entry is the literal output
    /// template the report display depends on.
    pub instructions: &'static [&'static str],
    /// Builds the prompt from prior stage outputs.
    pub prompt: PromptBuilder,
    /// Whether the uploaded image is attached to the invocation.
    pub attach_image: bool,
    /// Whether the search tool is bound to the invocation.
    pub bind_search: bool,
    /// Whether the current date is appended to the instructions.
    pub add_datetime: bool,
    /// Upstream stage that must have produced output before this one runs.
    pub requires: Option<StageName>,
}

impl StageSpec {
    /// The instruction list for one invocation, with the current date
    /// appended when the stage asked for it.
    #[must_use]
    pub fn instructions(&self) -> Vec<String> {
        let mut instructions: Vec<String> =
            self.instructions.iter().map(ToString::to_string).collect();
        if self.add_datetime {
            instructions.push(format!(
                "The current date is {}.",
                Local::now().format("%Y-%m-%d")
            ));
        }
        instructions
    }

    /// Builds the prompt for this stage.
    #[must_use]
    pub fn build_prompt(&self, request: &RestorationRequest, ctx: &PipelineContext) -> String {
        (self.prompt)(request, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CarImage, DesignApproach, ImageFormat, StylingFlavor};
    use pretty_assertions::assert_eq;

    fn sample_request() -> RestorationRequest {
        RestorationRequest::new(
            CarImage::new(vec![1], ImageFormat::Jpeg),
            DesignApproach::FullRestomod,
            StylingFlavor::RetroSport,
        )
    }

    fn spec_for(name: StageName) -> StageSpec {
        stage_catalog()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn test_catalog_order_matches_execution_order() {
        let names: Vec<StageName> = stage_catalog().iter().map(|s| s.name).collect();
        assert_eq!(names, StageName::all().to_vec());
    }

    #[test]
    fn test_only_identification_attaches_image() {
        for spec in stage_catalog() {
            assert_eq!(
                spec.attach_image,
                spec.name == StageName::Identification,
                "unexpected image binding for {}",
                spec.name
            );
        }
    }

    #[test]
    fn test_only_sourcing_binds_search() {
        for spec in stage_catalog() {
            assert_eq!(
                spec.bind_search,
                spec.name == StageName::Sourcing,
                "unexpected tool binding for {}",
                spec.name
            );
        }
    }

    #[test]
    fn test_downstream_stages_require_identification() {
        assert_eq!(spec_for(StageName::Identification).requires, None);
        for stage in [
            StageName::Contextualization,
            StageName::Strategy,
            StageName::Sourcing,
        ] {
            assert_eq!(spec_for(stage).requires, Some(StageName::Identification));
        }
    }

    #[test]
    fn test_sourcing_instructions_carry_the_date() {
        let spec = spec_for(StageName::Sourcing);
        let instructions = spec.instructions();
        let last = instructions.last().unwrap();
        assert!(last.starts_with("The current date is "));
        // Static entries are unchanged ahead of the date line.
        assert_eq!(instructions.len(), spec.instructions.len() + 1);
    }

    #[test]
    fn test_identification_prompt_ignores_context() {
        let spec = spec_for(StageName::Identification);
        let prompt = spec.build_prompt(&sample_request(), &PipelineContext::new());
        assert_eq!(prompt, "Analyze the car and identify its model and decade.");
    }

    #[test]
    fn test_contextualization_prompt_is_identification_output_verbatim() {
        use crate::context::StageOutput;

        let raw = "### 🧭 Detected Model & Era: **Ford Mustang, 1960s**\nodd formatting  kept";
        let mut ctx = PipelineContext::new();
        ctx.record(StageOutput::new(StageName::Identification, raw))
            .unwrap();

        let spec = spec_for(StageName::Contextualization);
        assert_eq!(spec.build_prompt(&sample_request(), &ctx), raw);
    }

    #[test]
    fn test_strategy_and_sourcing_share_the_same_prompt() {
        use crate::context::StageOutput;

        let mut ctx = PipelineContext::new();
        ctx.record(StageOutput::new(StageName::Identification, "the car"))
            .unwrap();
        ctx.record(StageOutput::new(StageName::Contextualization, "history"))
            .unwrap();

        let request = sample_request();
        let strategy = spec_for(StageName::Strategy).build_prompt(&request, &ctx);
        let sourcing = spec_for(StageName::Sourcing).build_prompt(&request, &ctx);

        assert_eq!(strategy, sourcing);
        assert_eq!(
            strategy,
            "the car\n\nApproach: Full Restomod Makeover\nStyling: Retro Sport"
        );
    }
}
