pub mod json;
pub mod pretty;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::media::ScoredItem;
use crate::pipeline::Filters;
use crate::sources::SourceKind;

/// Terminal width assumed when stdout is not a terminal
pub const DEFAULT_WIDTH: usize = 100;

/// What was analyzed and how, for report headings and footers
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub sources: &'a [SourceKind],
    pub filters: &'a Filters,
    /// Columns available for the table
    pub width: usize,
}

/// Format ranked items based on output format
pub fn format_report(
    items: &[ScoredItem],
    context: &ReportContext<'_>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_report(items, context)),
        OutputFormat::Json => json::format_items(items),
    }
}

/// Current terminal width, or [`DEFAULT_WIDTH`] when unknown
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| usize::from(w))
        .unwrap_or(DEFAULT_WIDTH)
}
