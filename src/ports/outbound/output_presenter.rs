use crate::shared::Result;

/// OutputPresenter port for delivering the rendered report
///
/// Implementations write to stdout or to a file.
pub trait OutputPresenter {
    /// Presents the formatted report content
    ///
    /// # Errors
    /// Returns an error if the content cannot be written
    fn present(&self, content: &str) -> Result<()>;
}
