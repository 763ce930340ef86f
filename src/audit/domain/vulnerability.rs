use crate::shared::Result;

/// CVSS base score, constrained to the 0.0-10.0 scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvssScore(f32);

impl CvssScore {
    pub fn new(score: f32) -> Result<Self> {
        if !(0.0..=10.0).contains(&score) || score.is_nan() {
            anyhow::bail!("CVSS score must be between 0.0 and 10.0, got {}", score);
        }
        Ok(Self(score))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl std::fmt::Display for CvssScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Advisory severity levels, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Maps a CVSS base score to a severity level using the CVSS v3 bands
    pub fn from_cvss_score(score: CvssScore) -> Self {
        let value = score.value();
        if value >= 9.0 {
            Severity::Critical
        } else if value >= 7.0 {
            Severity::High
        } else if value >= 4.0 {
            Severity::Medium
        } else if value > 0.0 {
            Severity::Low
        } else {
            Severity::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Severity::None),
            "low" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!(
                "Invalid severity: {}. Please specify 'low', 'medium', 'high', or 'critical'",
                s
            )),
        }
    }
}

/// A single advisory affecting a package version
#[derive(Debug, Clone, PartialEq)]
pub struct Vulnerability {
    id: String,
    cvss_score: Option<CvssScore>,
    severity: Severity,
    fixed_version: Option<String>,
    summary: Option<String>,
}

impl Vulnerability {
    pub fn new(
        id: String,
        cvss_score: Option<CvssScore>,
        severity: Severity,
        fixed_version: Option<String>,
        summary: Option<String>,
    ) -> Result<Self> {
        if id.trim().is_empty() {
            anyhow::bail!("Advisory ID cannot be empty");
        }
        Ok(Self {
            id,
            cvss_score,
            severity,
            fixed_version,
            summary,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cvss_score(&self) -> Option<CvssScore> {
        self.cvss_score
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn fixed_version(&self) -> Option<&str> {
        self.fixed_version.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

/// All advisories found for one locked package
#[derive(Debug, Clone, PartialEq)]
pub struct PackageVulnerabilities {
    package_name: String,
    package_version: String,
    vulnerabilities: Vec<Vulnerability>,
}

impl PackageVulnerabilities {
    pub fn new(
        package_name: String,
        package_version: String,
        vulnerabilities: Vec<Vulnerability>,
    ) -> Self {
        Self {
            package_name,
            package_version,
            vulnerabilities,
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        &self.vulnerabilities
    }

    /// Highest severity among this package's advisories
    pub fn max_severity(&self) -> Severity {
        self.vulnerabilities
            .iter()
            .map(|v| v.severity())
            .max()
            .unwrap_or(Severity::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cvss_score_valid() {
        let score = CvssScore::new(9.8).unwrap();
        assert_eq!(score.value(), 9.8);
    }

    #[test]
    fn test_cvss_score_boundaries() {
        assert!(CvssScore::new(0.0).is_ok());
        assert!(CvssScore::new(10.0).is_ok());
        assert!(CvssScore::new(-0.1).is_err());
        assert!(CvssScore::new(10.1).is_err());
        assert!(CvssScore::new(f32::NAN).is_err());
    }

    #[test]
    fn test_cvss_score_display() {
        let score = CvssScore::new(7.5).unwrap();
        assert_eq!(format!("{}", score), "7.5");
    }

    #[test]
    fn test_severity_from_cvss_score() {
        assert_eq!(
            Severity::from_cvss_score(CvssScore::new(9.8).unwrap()),
            Severity::Critical
        );
        assert_eq!(
            Severity::from_cvss_score(CvssScore::new(9.0).unwrap()),
            Severity::Critical
        );
        assert_eq!(
            Severity::from_cvss_score(CvssScore::new(8.9).unwrap()),
            Severity::High
        );
        assert_eq!(
            Severity::from_cvss_score(CvssScore::new(7.0).unwrap()),
            Severity::High
        );
        assert_eq!(
            Severity::from_cvss_score(CvssScore::new(5.0).unwrap()),
            Severity::Medium
        );
        assert_eq!(
            Severity::from_cvss_score(CvssScore::new(2.0).unwrap()),
            Severity::Low
        );
        assert_eq!(
            Severity::from_cvss_score(CvssScore::new(0.0).unwrap()),
            Severity::None
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::None);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!(Severity::from_str("critical").unwrap(), Severity::Critical);
        assert_eq!(Severity::from_str("HIGH").unwrap(), Severity::High);
        assert_eq!(Severity::from_str("moderate").unwrap(), Severity::Medium);
        assert_eq!(Severity::from_str("Medium").unwrap(), Severity::Medium);
        assert_eq!(Severity::from_str("low").unwrap(), Severity::Low);
        assert!(Severity::from_str("bogus").is_err());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(Severity::None.to_string(), "none");
    }

    #[test]
    fn test_vulnerability_new() {
        let vuln = Vulnerability::new(
            "GHSA-jf85-cpcp-j695".to_string(),
            Some(CvssScore::new(9.1).unwrap()),
            Severity::Critical,
            Some("4.17.12".to_string()),
            Some("Prototype pollution in lodash".to_string()),
        )
        .unwrap();
        assert_eq!(vuln.id(), "GHSA-jf85-cpcp-j695");
        assert_eq!(vuln.severity(), Severity::Critical);
        assert_eq!(vuln.fixed_version(), Some("4.17.12"));
    }

    #[test]
    fn test_vulnerability_empty_id() {
        let result = Vulnerability::new("  ".to_string(), None, Severity::None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_package_vulnerabilities_max_severity() {
        let vulns = vec![
            Vulnerability::new("CVE-2024-0001".to_string(), None, Severity::Low, None, None)
                .unwrap(),
            Vulnerability::new("CVE-2024-0002".to_string(), None, Severity::High, None, None)
                .unwrap(),
        ];
        let pkg_vulns =
            PackageVulnerabilities::new("lodash".to_string(), "4.17.11".to_string(), vulns);
        assert_eq!(pkg_vulns.max_severity(), Severity::High);
    }

    #[test]
    fn test_package_vulnerabilities_max_severity_empty() {
        let pkg_vulns =
            PackageVulnerabilities::new("lodash".to_string(), "4.17.21".to_string(), vec![]);
        assert_eq!(pkg_vulns.max_severity(), Severity::None);
    }
}
