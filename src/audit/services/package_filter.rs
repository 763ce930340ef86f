use crate::audit::domain::Package;
use crate::shared::Result;
use std::cell::RefCell;
use std::collections::HashMap;

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// PackageFilter - Filters packages based on exclusion patterns
///
/// Supports wildcard patterns using '*' to match zero or more characters.
/// Patterns are case-sensitive and validated against a character whitelist.
#[derive(Debug)]
pub struct PackageFilter {
    patterns: Vec<ExcludePattern>,
}

impl PackageFilter {
    /// Creates a new PackageFilter from raw pattern strings
    ///
    /// # Arguments
    /// * `patterns` - Vector of pattern strings (e.g., "@types/*", "*-polyfill")
    ///
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern format (length, characters)
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let mut compiled_patterns = Vec::new();
        for pattern in patterns {
            let exclude_pattern = ExcludePattern::new(pattern)?;
            compiled_patterns.push(exclude_pattern);
        }

        Ok(Self {
            patterns: compiled_patterns,
        })
    }

    /// Filters packages, returning only those that don't match exclusion patterns
    pub fn filter_packages(&self, packages: Vec<Package>) -> Vec<Package> {
        packages
            .into_iter()
            .filter(|pkg| !self.matches(pkg.name()))
            .collect()
    }

    /// Filters dependency map by removing excluded packages
    ///
    /// Removes excluded packages from both map keys and dependency lists
    pub fn filter_dependency_map(
        &self,
        mut dependency_map: HashMap<String, Vec<String>>,
    ) -> HashMap<String, Vec<String>> {
        dependency_map.retain(|package_name, _| !self.matches(package_name));

        for deps in dependency_map.values_mut() {
            deps.retain(|dep_name| !self.matches(dep_name));
        }

        dependency_map
    }

    /// Filters a list of package names, dropping those that match a pattern
    pub fn filter_names(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| !self.matches(name))
            .collect()
    }

    /// Checks if a package name matches any exclusion pattern
    fn matches(&self, package_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(package_name))
    }

    /// Returns a list of patterns that did not match any packages
    ///
    /// This method should be called after filtering to identify patterns
    /// that had no effect on the package list.
    pub fn get_unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !*p.matched.borrow())
            .map(|p| p.original.clone())
            .collect()
    }
}

/// Represents a single exclusion pattern with its compiled matcher
#[derive(Debug)]
struct ExcludePattern {
    original: String,
    matcher: PatternMatcher,
    matched: RefCell<bool>,
}

impl ExcludePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;

        let matcher = compile_pattern(&pattern);

        Ok(Self {
            original: pattern,
            matcher,
            matched: RefCell::new(false),
        })
    }

    fn matches(&self, package_name: &str) -> bool {
        let is_match = self.matcher.matches(package_name);
        if is_match {
            *self.matched.borrow_mut() = true;
        }
        is_match
    }
}

/// Pattern matcher types for efficient matching
#[derive(Debug)]
enum PatternMatcher {
    /// Exact match: "package-name"
    Exact(String),
    /// Prefix wildcard: "*-suffix"
    Prefix(String),
    /// Suffix wildcard: "prefix-*"
    Suffix(String),
    /// Contains wildcard: "*middle*"
    Contains(String),
    /// Multiple wildcards: "pre*fix*suf"
    Multiple(Vec<String>),
}

impl PatternMatcher {
    fn matches(&self, package_name: &str) -> bool {
        match self {
            PatternMatcher::Exact(s) => package_name == s,
            PatternMatcher::Prefix(suffix) => package_name.ends_with(suffix),
            PatternMatcher::Suffix(prefix) => package_name.starts_with(prefix),
            PatternMatcher::Contains(middle) => package_name.contains(middle),
            PatternMatcher::Multiple(parts) => {
                // Match multiple wildcards by checking if all parts appear in order
                let mut current_pos = 0;
                for part in parts {
                    if let Some(pos) = package_name[current_pos..].find(part) {
                        current_pos += pos + part.len();
                    } else {
                        return false;
                    }
                }
                true
            }
        }
    }
}

/// Validates a pattern string
fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    for ch in pattern.chars() {
        if !is_valid_pattern_char(ch) {
            anyhow::bail!(
                "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
                 Only alphanumeric, hyphens, underscores, dots, '@', '/', and asterisks (*) are allowed.",
                ch,
                pattern
            );
        }
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}

/// Checks if a character is valid in an exclusion pattern
///
/// '@' and '/' are allowed so scoped npm packages can be matched.
fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/' | '*')
}

/// Compiles a pattern string into an optimized matcher
fn compile_pattern(pattern: &str) -> PatternMatcher {
    let wildcard_count = pattern.matches('*').count();

    match wildcard_count {
        0 => PatternMatcher::Exact(pattern.to_string()),
        1 => {
            if let Some(stripped) = pattern.strip_prefix('*') {
                // "*-suffix" -> ends_with check
                PatternMatcher::Prefix(stripped.to_string())
            } else if let Some(stripped) = pattern.strip_suffix('*') {
                // "prefix-*" -> starts_with check
                PatternMatcher::Suffix(stripped.to_string())
            } else {
                // "prefix*suffix" -> split and use Multiple
                let parts: Vec<String> = pattern.split('*').map(|s| s.to_string()).collect();
                PatternMatcher::Multiple(parts)
            }
        }
        2 => {
            if pattern.starts_with('*') && pattern.ends_with('*') {
                // "*middle*" -> contains check
                let middle = &pattern[1..pattern.len() - 1];
                PatternMatcher::Contains(middle.to_string())
            } else {
                let parts: Vec<String> = pattern
                    .split('*')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect();
                PatternMatcher::Multiple(parts)
            }
        }
        _ => {
            let parts: Vec<String> = pattern
                .split('*')
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
            PatternMatcher::Multiple(parts)
        }
    }
}
