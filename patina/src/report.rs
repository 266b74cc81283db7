//! Report assembly and export.
//!
//! A pure concatenation: fixed title block, the four stage sections in
//! fixed order separated by a horizontal-rule delimiter, and a fixed
//! closing-remarks block. Stage content is trusted entirely; nothing is
//! transformed on the way through.

use std::io::Write as _;
use std::path::Path;

use crate::context::{PipelineContext, StageName};
use crate::errors::{RestorationError, TemplateWarning};

/// The report's fixed title block.
pub const TITLE_BLOCK: &str = "## 🚗 Vintage Car Restoration Report";

/// The delimiter between report sections.
pub const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// The fixed closing-remarks block.
pub const CLOSING_REMARKS: &str = "### 💬 Restoration Reflection\n\n\
    > “This vintage gem carries the spirit of a bygone era. Whether you're restoring it \
    for the road or for display, balance form and function to let its story roll on.”\n";

/// The default export file name.
pub const REPORT_FILE_NAME: &str = "car_restoration_report.md";

/// The assembled restoration report.
///
/// Immutable; held by the caller for display and export. The exported
/// file carries exactly the same bytes as the in-memory markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorationReport {
    markdown: String,
    warnings: Vec<TemplateWarning>,
}

impl RestorationReport {
    /// The full report as markdown.
    #[must_use]
    pub fn as_markdown(&self) -> &str {
        &self.markdown
    }

    /// Template warnings collected across all stages, in stage order.
    #[must_use]
    pub fn warnings(&self) -> &[TemplateWarning] {
        &self.warnings
    }

    /// The file name to export under.
    #[must_use]
    pub const fn file_name() -> &'static str {
        REPORT_FILE_NAME
    }

    /// Writes the report to a file, byte-identical to [`Self::as_markdown`].
    ///
    /// # Errors
    ///
    /// Returns any underlying IO error.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(self.markdown.as_bytes())
    }
}

/// Assembles the final report from the four stage sections.
#[must_use]
pub fn assemble(identification: &str, context: &str, strategy: &str, sourcing: &str) -> String {
    format!(
        "{TITLE_BLOCK}\n\n\
         {identification}{SECTION_DELIMITER}\
         {context}{SECTION_DELIMITER}\
         {strategy}{SECTION_DELIMITER}\
         {sourcing}{SECTION_DELIMITER}\
         {CLOSING_REMARKS}"
    )
}

/// Assembles a report from a completed pipeline context.
///
/// # Errors
///
/// Returns [`RestorationError::Internal`] if any stage output is missing;
/// the orchestrator only calls this once all four stages have run.
pub fn assemble_from_context(ctx: &PipelineContext) -> Result<RestorationReport, RestorationError> {
    let section = |stage: StageName| {
        ctx.content(stage).ok_or_else(|| {
            RestorationError::Internal(format!("stage '{stage}' produced no output"))
        })
    };

    let markdown = assemble(
        section(StageName::Identification)?,
        section(StageName::Contextualization)?,
        section(StageName::Strategy)?,
        section(StageName::Sourcing)?,
    );

    let warnings = ctx
        .outputs()
        .iter()
        .flat_map(|o| o.warnings.iter().cloned())
        .collect();

    Ok(RestorationReport { markdown, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StageOutput;
    use pretty_assertions::assert_eq;

    fn completed_context() -> PipelineContext {
        let mut ctx = PipelineContext::new();
        for (stage, content) in StageName::all().into_iter().zip(["A", "B", "C", "D"]) {
            ctx.record(StageOutput::new(stage, content)).unwrap();
        }
        ctx
    }

    #[test]
    fn test_assemble_layout_is_byte_exact() {
        let markdown = assemble("A", "B", "C", "D");
        assert_eq!(
            markdown,
            format!(
                "## 🚗 Vintage Car Restoration Report\n\n\
                 A\n\n---\n\nB\n\n---\n\nC\n\n---\n\nD\n\n---\n\n{CLOSING_REMARKS}"
            )
        );
    }

    #[test]
    fn test_assemble_is_reproducible() {
        assert_eq!(assemble("A", "B", "C", "D"), assemble("A", "B", "C", "D"));
    }

    #[test]
    fn test_report_has_five_sections_in_fixed_order() {
        let report = assemble_from_context(&completed_context()).unwrap();
        let sections: Vec<&str> = report.as_markdown().split(SECTION_DELIMITER).collect();

        assert_eq!(sections.len(), 5);
        assert_eq!(sections[0], format!("{TITLE_BLOCK}\n\nA"));
        assert_eq!(sections[1], "B");
        assert_eq!(sections[2], "C");
        assert_eq!(sections[3], "D");
        assert_eq!(sections[4], CLOSING_REMARKS);
    }

    #[test]
    fn test_assemble_from_incomplete_context_fails() {
        let mut ctx = PipelineContext::new();
        ctx.record(StageOutput::new(StageName::Identification, "A"))
            .unwrap();

        let err = assemble_from_context(&ctx).unwrap_err();
        assert!(matches!(err, RestorationError::Internal(_)));
        assert!(err.to_string().contains("contextualization"));
    }

    #[test]
    fn test_report_collects_stage_warnings() {
        let mut ctx = PipelineContext::new();
        for (stage, content) in StageName::all().into_iter().zip(["A", "B", "C", "D"]) {
            let warnings = crate::stages::check_template(stage, content);
            ctx.record(StageOutput::new(stage, content).with_warnings(warnings))
                .unwrap();
        }

        let report = assemble_from_context(&ctx).unwrap();
        // None of the placeholder sections carry their required headings.
        assert!(!report.warnings().is_empty());
    }

    #[test]
    fn test_write_to_exports_identical_bytes() {
        let report = assemble_from_context(&completed_context()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RestorationReport::file_name());

        report.write_to(&path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, report.as_markdown().as_bytes());
    }
}
