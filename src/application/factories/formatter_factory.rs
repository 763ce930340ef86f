use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter, TextFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// FormatterFactory - Creates the formatter for the selected output format
///
/// Keeps the format-to-adapter mapping in one place so main.rs does not
/// need to know the concrete formatter types.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter for the given output format
    pub fn create(format: OutputFormat) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Text => Box::new(TextFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
        }
    }

    /// Returns the progress message for formatting in the given format
    pub fn progress_message(format: OutputFormat) -> String {
        format!("📝 Formatting report as {}...", format)
    }
}
