/// ProgressReporter port for audit step messages
///
/// Abstracts the line-based step messages emitted while an audit runs
/// (loading the lock file, filtering, advisory summary). The advisory
/// fetch itself reports per-request progress through a ProgressCallback,
/// not through this port.
pub trait ProgressReporter {
    /// Reports a step message
    fn report(&self, message: &str);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of the audit's advisory check
    fn report_completion(&self, message: &str);
}
