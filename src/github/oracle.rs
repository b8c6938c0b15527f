//! Status oracle trait and the GitHub CLI implementation.
//!
//! The engine only ever sees the [`StatusOracle`] trait; the default
//! implementation shells out to `gh pr view` once per reference and parses
//! the JSON it prints. No retry or timeout policy lives here.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use super::error::ResolveError;
use super::locator::PullRequestLocator;
use super::models::ReviewRecord;
use super::status::PrInfo;

/// JSON fields requested from `gh pr view`.
const REQUESTED_FIELDS: &str = "mergedAt,reviewDecision,author,reviews,title";

/// Capability that classifies a pull request reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusOracle: Send + Sync {
    /// Resolve the current review state of `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the lookup fails or produces
    /// unparseable data. Implementations never retry.
    async fn resolve(&self, locator: &PullRequestLocator) -> Result<PrInfo, ResolveError>;
}

/// Oracle backed by the `gh` command-line tool.
#[derive(Debug, Clone)]
pub struct GhCliOracle {
    program: PathBuf,
}

impl GhCliOracle {
    /// Creates an oracle that invokes `gh` from the search path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("gh"),
        }
    }

    /// Creates an oracle that invokes a specific executable.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GhCliOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusOracle for GhCliOracle {
    async fn resolve(&self, locator: &PullRequestLocator) -> Result<PrInfo, ResolveError> {
        let output = Command::new(&self.program)
            .arg("pr")
            .arg("view")
            .arg(locator.number().get().to_string())
            .arg("--repo")
            .arg(locator.repo_slug())
            .arg("--json")
            .arg(REQUESTED_FIELDS)
            .output()
            .await
            .map_err(|error| ResolveError::Launch {
                message: error.to_string(),
            })?;

        if !output.status.success() {
            return Err(ResolveError::Lookup {
                reference: locator.canonical_url(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let record = parse_record(&output.stdout).map_err(|error| ResolveError::MalformedRecord {
            reference: locator.canonical_url(),
            message: error.to_string(),
        })?;

        Ok(PrInfo::from_record(locator.clone(), &record))
    }
}

/// Parses the JSON document printed by `gh pr view --json`.
fn parse_record(bytes: &[u8]) -> Result<ReviewRecord, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::parse_record;
    use crate::github::status::PrStatus;
    use crate::github::{PrInfo, PullRequestLocator};

    #[test]
    fn parses_a_full_record() {
        let body = br#"{
            "mergedAt": null,
            "reviewDecision": "APPROVED",
            "author": {"login": "alice", "is_bot": false},
            "reviews": [{"author": {"login": "bob"}}],
            "title": "Add widgets"
        }"#;
        let record = parse_record(body).expect("record should parse");
        assert_eq!(record.review_decision.as_deref(), Some("APPROVED"));
        assert_eq!(record.reviews.len(), 1);
        assert_eq!(record.title.as_deref(), Some("Add widgets"));
    }

    #[test]
    fn tolerates_missing_fields() {
        let record = parse_record(b"{}").expect("empty record should parse");
        assert!(record.merged_at.is_none());
        assert!(record.reviews.is_empty());
    }

    #[test]
    fn rejects_non_json_output() {
        assert!(parse_record(b"not json").is_err());
    }

    #[test]
    fn full_record_classifies_through_from_record() {
        let body = br#"{"mergedAt": "2025-06-01T12:00:00Z", "title": "Ship it"}"#;
        let record = parse_record(body).expect("record should parse");
        let locator = PullRequestLocator::parse("https://github.com/acme/widgets/pull/9")
            .expect("URL should parse");
        let info = PrInfo::from_record(locator, &record);
        assert_eq!(info.status, PrStatus::Merged);
        assert_eq!(info.title, "Ship it");
        assert_eq!(info.author, "unknown");
    }
}

#[cfg(all(test, unix))]
mod process_tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use super::{GhCliOracle, StatusOracle};
    use crate::github::error::ResolveError;
    use crate::github::status::PrStatus;
    use crate::github::PullRequestLocator;

    fn write_stub(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("gh-stub");
        fs::write(&path, body).expect("stub should be written");
        let mut permissions = fs::metadata(&path)
            .expect("stub metadata should be readable")
            .permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).expect("stub should be executable");
        path
    }

    fn locator() -> PullRequestLocator {
        PullRequestLocator::parse("https://github.com/acme/widgets/pull/42")
            .expect("URL should parse")
    }

    #[tokio::test]
    async fn resolves_via_a_stub_executable() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let stub = write_stub(
            dir.path(),
            "#!/bin/sh\necho '{\"reviewDecision\": \"APPROVED\", \"author\": {\"login\": \"alice\"}, \"title\": \"Add widgets\"}'\n",
        );

        let oracle = GhCliOracle::with_program(stub);
        let info = oracle
            .resolve(&locator())
            .await
            .expect("resolution should succeed");
        assert_eq!(info.status, PrStatus::Approved);
        assert_eq!(info.author, "alice");
    }

    #[tokio::test]
    async fn reports_command_failure_with_stderr() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let stub = write_stub(dir.path(), "#!/bin/sh\necho 'no such PR' >&2\nexit 1\n");

        let oracle = GhCliOracle::with_program(stub);
        let error = oracle
            .resolve(&locator())
            .await
            .expect_err("resolution should fail");
        assert!(matches!(
            error,
            ResolveError::Lookup { ref message, .. } if message == "no such PR"
        ));
    }

    #[tokio::test]
    async fn reports_unparseable_output() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let stub = write_stub(dir.path(), "#!/bin/sh\necho 'not json'\n");

        let oracle = GhCliOracle::with_program(stub);
        let error = oracle
            .resolve(&locator())
            .await
            .expect_err("resolution should fail");
        assert!(matches!(error, ResolveError::MalformedRecord { .. }));
    }

    #[tokio::test]
    async fn reports_launch_failure_for_missing_program() {
        let oracle = GhCliOracle::with_program("/nonexistent/gh-missing");
        let error = oracle
            .resolve(&locator())
            .await
            .expect_err("resolution should fail");
        assert!(matches!(error, ResolveError::Launch { .. }));
    }
}
