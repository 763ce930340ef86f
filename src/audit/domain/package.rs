use crate::shared::Result;

/// Maximum length for package names (npm registry limit is 214, padded for scopes)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// NewType wrapper for npm package name with validation
///
/// Accepts plain names ("lodash") and scoped names ("@babel/core").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        // Security: Validate characters. New npm names are lowercase URL-safe
        // strings; legacy registry names may additionally contain ~'!()* and
        // uppercase letters. '@' and '/' appear only in scoped names
        // ("@scope/name").
        if !name.chars().all(|c| {
            c.is_alphanumeric()
                || matches!(
                    c,
                    '-' | '_' | '.' | '@' | '/' | '~' | '\'' | '!' | '(' | ')' | '*'
                )
        }) {
            anyhow::bail!(
                "Package name contains invalid characters. Only alphanumeric characters, '-', '_', '.', '@', '/' and the legacy characters ~'!()* are allowed."
            );
        }

        // A scoped name must look like "@scope/name", nothing more exotic
        if name.starts_with('@') && name.matches('/').count() != 1 {
            anyhow::bail!("Scoped package name must have the form '@scope/name': {}", name);
        }
        if !name.starts_with('@') && name.contains('/') {
            anyhow::bail!("'/' is only allowed in scoped package names: {}", name);
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for package version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        if version.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        // Security: Validate characters (semver plus pre-release/build tags)
        if !version
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+'))
        {
            anyhow::bail!(
                "Package version contains invalid characters. Only alphanumeric, dots, hyphens, and plus signs are allowed."
            );
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Package value object representing one resolved lock file entry
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    name: PackageName,
    version: Version,
    integrity: Option<String>,
    dev: bool,
}

impl Package {
    pub fn new(name: String, version: String) -> Result<Self> {
        Ok(Self {
            name: PackageName::new(name)?,
            version: Version::new(version)?,
            integrity: None,
            dev: false,
        })
    }

    /// Creates a package carrying the full lock entry metadata
    pub fn with_metadata(
        name: String,
        version: String,
        integrity: Option<String>,
        dev: bool,
    ) -> Result<Self> {
        Ok(Self {
            name: PackageName::new(name)?,
            version: Version::new(version)?,
            integrity,
            dev,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Subresource integrity hash from the lock entry (e.g. "sha512-...")
    pub fn integrity(&self) -> Option<&str> {
        self.integrity.as_deref()
    }

    /// Whether the lock file marks this entry as a dev dependency
    pub fn is_dev(&self) -> bool {
        self.dev
    }
}
