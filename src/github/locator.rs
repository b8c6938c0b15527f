//! URL parsing and identity wrappers for pull request references.

use std::fmt;

use url::Url;

use super::error::ReferenceError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, ReferenceError> {
        if value.is_empty() {
            return Err(ReferenceError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, ReferenceError> {
        if value.is_empty() {
            return Err(ReferenceError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, ReferenceError> {
        if value == 0 {
            return Err(ReferenceError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Normalized pull request reference parsed from message text.
///
/// Holds the host so that enterprise GitHub links resolve against the right
/// instance; the canonical URL derived from these fields is the dedup key
/// for a channel scan. Never persisted beyond a single run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestLocator {
    host: String,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Parses a pull request URL in the form
    /// `https://<host>/<owner>/<repo>/pull/<number>`.
    ///
    /// Path segments after the number (`/files`, a trailing slash) are
    /// ignored so review-tab links still normalize to the same reference.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidUrl` when URL parsing fails,
    /// `UnsupportedScheme` for non-HTTPS links, `MissingPathSegments` when
    /// the path is not `/owner/repo/pull/<number>`, and
    /// `InvalidPullRequestNumber` when the final segment is not a positive
    /// integer.
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let parsed =
            Url::parse(input).map_err(|error| ReferenceError::InvalidUrl(error.to_string()))?;

        if parsed.scheme() != "https" {
            return Err(ReferenceError::UnsupportedScheme);
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| ReferenceError::InvalidUrl("URL must include a host".to_owned()))?
            .to_owned();

        let mut segments = parsed
            .path_segments()
            .ok_or(ReferenceError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(ReferenceError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(ReferenceError::MissingPathSegments)?;
        let marker = segments.next().ok_or(ReferenceError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(ReferenceError::MissingPathSegments)?;

        if marker != "pull" {
            return Err(ReferenceError::MissingPathSegments);
        }

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;
        let number = number_segment
            .parse::<u64>()
            .map_err(|_| ReferenceError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;

        Ok(Self {
            host,
            owner,
            repository,
            number,
        })
    }

    /// Host the pull request lives on (`github.com` or an enterprise host).
    #[must_use]
    pub const fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// Canonical URL used as the dedup key within a channel scan.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!(
            "https://{}/{}/{}/pull/{}",
            self.host,
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }

    /// Repository slug accepted by `gh --repo`.
    ///
    /// Plain `owner/repo` for github.com; prefixed with the host for
    /// enterprise instances (`HOST/owner/repo`).
    #[must_use]
    pub fn repo_slug(&self) -> String {
        if self.host.eq_ignore_ascii_case("github.com") {
            format!("{}/{}", self.owner.as_str(), self.repository.as_str())
        } else {
            format!(
                "{}/{}/{}",
                self.host,
                self.owner.as_str(),
                self.repository.as_str()
            )
        }
    }

    /// Synthetic title used when the review record omits one.
    #[must_use]
    pub fn fallback_title(&self) -> String {
        format!(
            "{}/{}#{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}

impl fmt::Display for PullRequestLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.canonical_url())
    }
}
