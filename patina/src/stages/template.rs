//! Lightweight template-compliance check.
//!
//! Stage output is free-form text for human reading; template compliance
//! is a documented convention, not a contract. This check only looks for
//! the required headings and reports misses as warnings - it never fails
//! the pipeline.

use regex::Regex;

use crate::context::StageName;
use crate::errors::TemplateWarning;

/// The headings each stage's template mandates.
const fn required_headings(stage: StageName) -> &'static [&'static str] {
    match stage {
        StageName::Identification => &[
            "### 🧭 Detected Model & Era",
            "### 🔍 Key Exterior Features",
        ],
        StageName::Contextualization => &["### 📚 Historical & Cultural Significance"],
        StageName::Strategy => &["### ✨ Restoration Strategy", "### 🚘 How to Bring It Back"],
        StageName::Sourcing => &["### 🛠️ Recommended Parts & Accessories"],
    }
}

/// Checks a stage's output against its required headings.
///
/// Returns one warning per missing heading. An empty result means the
/// output at least carries the expected structure.
#[must_use]
pub fn check_template(stage: StageName, content: &str) -> Vec<TemplateWarning> {
    required_headings(stage)
        .iter()
        .filter(|heading| !heading_present(content, heading))
        .map(|heading| TemplateWarning {
            stage,
            missing_heading: (*heading).to_string(),
        })
        .collect()
}

fn heading_present(content: &str, heading: &str) -> bool {
    // Anchored at line start so a heading quoted mid-sentence does not count.
    let pattern = format!("(?m)^{}", regex::escape(heading));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(content))
}
