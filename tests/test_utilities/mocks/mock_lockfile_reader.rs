use lockcheck::audit::domain::{parse_lockfile, LockfileParseResult};
use lockcheck::prelude::*;
use std::path::Path;

/// Mock LockfileReader for testing
///
/// Holds raw package-lock.json content and parses it on demand, so
/// tests can exercise parse failures as well as the happy path.
pub struct MockLockfileReader {
    pub content: String,
    pub should_fail: bool,
}

impl MockLockfileReader {
    pub fn new(content: String) -> Self {
        Self {
            content,
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            content: String::new(),
            should_fail: true,
        }
    }
}

impl LockfileReader for MockLockfileReader {
    fn read_and_parse_lockfile(&self, _project_path: &Path) -> Result<LockfileParseResult> {
        if self.should_fail {
            anyhow::bail!("Mock lockfile read failure");
        }
        parse_lockfile(&self.content)
    }
}
