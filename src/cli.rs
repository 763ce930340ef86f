use clap::Parser;

use crate::application::dto::OutputFormat;
use crate::audit::domain::Severity;

/// Audit npm lock files for known vulnerable dependencies
#[derive(Parser, Debug)]
#[command(name = "lockcheck")]
#[command(version)]
#[command(about = "Audit npm lock files for known vulnerable dependencies", long_about = None)]
pub struct Args {
    /// Output format: text, json, or markdown
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Path to the project directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exclude packages matching patterns (supports wildcards: *)
    /// Can be specified multiple times: -e "pkg-a" -e "@types/*"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Fail the audit at or above this severity: low, medium, high, critical
    #[arg(long, value_name = "SEVERITY", default_value = "high")]
    pub severity_threshold: Severity,

    /// Fail the audit at or above this CVSS base score (0.0-10.0)
    #[arg(long, value_name = "SCORE")]
    pub cvss_threshold: Option<f32>,

    /// Ignore an advisory ID (reported but never fails the audit)
    /// Can be specified multiple times: --ignore GHSA-xxxx --ignore CVE-2024-1234
    #[arg(long = "ignore", value_name = "ADVISORY_ID")]
    pub ignore: Vec<String>,

    /// Path to a configuration file (defaults to lockcheck.config.yml in the project directory)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Skip packages the lock file marks as dev dependencies
    #[arg(long)]
    pub omit_dev: bool,

    /// Skip dependency graph analysis
    #[arg(long = "no-deps")]
    pub no_deps: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
