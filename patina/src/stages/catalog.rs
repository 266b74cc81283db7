//! The four concrete stage definitions.
//!
//! Instruction texts end in the literal output templates the report
//! depends on; change a template here and the report changes with it.

use super::{StageSpec, PromptBuilder};
use crate::context::{PipelineContext, StageName};
use crate::request::RestorationRequest;

const IDENTIFICATION_INSTRUCTIONS: &[&str] = &[
    "Carefully examine the uploaded car photo.",
    "Identify the likely make, model, and decade of origin.",
    "Describe visual elements such as body style, grille, headlights, trim, and wheels.",
    "Output format:\n\n\
     ### 🧭 Detected Model & Era: **<Make + Model, Decade>**\n\n\
     *Based on visual analysis of the uploaded car image.*\n\n\
     ### 🔍 Key Exterior Features\n\n\
     | Feature | Description |\n|---------|-------------|\n| ... | ... |",
];

const CONTEXTUALIZATION_INSTRUCTIONS: &[&str] = &[
    "Read the identified car model and decade.",
    "Describe what made this car historically or culturally significant.",
    "Include its role in automotive design history, pop culture, or innovation.",
    "Format using:\n\n### 📚 Historical & Cultural Significance",
];

const STRATEGY_INSTRUCTIONS: &[&str] = &[
    "Based on the detected car and user preferences, suggest a restoration direction.",
    "Balance originality with the desired makeover level (preservation, blend, or modern).",
    "Include suggestions for paint colors, trims, tires, interior styling, etc.",
    "Use the following format:\n\n\
     ### ✨ Restoration Strategy\n\n\
     | Element | Recommendation |\n|---------|------------------|\n| ... | ... |\n\n\
     > 🔧 Styling Tip: [Give a one-line strategy summary here]\n\n\
     ### 🚘 How to Bring It Back\n\n\
     - Bullet points for paint, interior, tires, emblems, etc.",
];

const SOURCING_INSTRUCTIONS: &[&str] = &[
    "Use the restoration context and generate a focused parts search query.",
    "Use `search_google` to fetch part links based on model and styling preference.",
    "Extract 6–8 relevant product links to body panels, lights, tires, badges, or trim.",
    "Do not show ads or blog links. Use:\n\n\
     ### 🛠️ Recommended Parts & Accessories\n\n\
     > *Helpful for completing your restoration:*\n\n\
     - [Part Name or Type](https://example.com)",
];

fn identification_prompt(_request: &RestorationRequest, _ctx: &PipelineContext) -> String {
    "Analyze the car and identify its model and decade.".to_string()
}

fn contextualization_prompt(_request: &RestorationRequest, ctx: &PipelineContext) -> String {
    // Identification's raw output, verbatim. No reformatting.
    ctx.content(StageName::Identification)
        .unwrap_or_default()
        .to_string()
}

fn upstream_with_preferences(request: &RestorationRequest, ctx: &PipelineContext) -> String {
    format!(
        "{}\n\n{}",
        ctx.content(StageName::Identification).unwrap_or_default(),
        request.preference_lines()
    )
}

/// The full stage table in execution order.
///
/// Strategy and sourcing are siblings over the same upstream context:
/// both consume identification's output plus the preference lines, not
/// each other's output.
#[must_use]
pub fn stage_catalog() -> Vec<StageSpec> {
    vec![
        StageSpec {
            name: StageName::Identification,
            role: "Car Historian",
            description:
                "You analyze the uploaded car image and identify its model, year, and design features.",
            instructions: IDENTIFICATION_INSTRUCTIONS,
            prompt: identification_prompt as PromptBuilder,
            attach_image: true,
            bind_search: false,
            add_datetime: false,
            requires: None,
        },
        StageSpec {
            name: StageName::Contextualization,
            role: "Design Context Agent",
            description:
                "You provide context about the car's design influence, usage, and collector appeal.",
            instructions: CONTEXTUALIZATION_INSTRUCTIONS,
            prompt: contextualization_prompt as PromptBuilder,
            attach_image: false,
            bind_search: false,
            add_datetime: false,
            requires: Some(StageName::Identification),
        },
        StageSpec {
            name: StageName::Strategy,
            role: "Restoration Stylist",
            description:
                "You provide design advice for restoration based on the original car style and user customization goals.",
            instructions: STRATEGY_INSTRUCTIONS,
            prompt: upstream_with_preferences as PromptBuilder,
            attach_image: false,
            bind_search: false,
            add_datetime: false,
            requires: Some(StageName::Identification),
        },
        StageSpec {
            name: StageName::Sourcing,
            role: "Parts Finder Agent",
            description:
                "You assist in finding real restoration parts based on the car model and restoration strategy. \
                 Source usable links from platforms like eBay, Summit Racing, Classic Industries, or Etsy.",
            instructions: SOURCING_INSTRUCTIONS,
            prompt: upstream_with_preferences as PromptBuilder,
            attach_image: false,
            bind_search: true,
            add_datetime: true,
            requires: Some(StageName::Identification),
        },
    ]
}
