use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::foundation::error::{SplashError, SplashResult};

/// Normalized `major.minor` release version.
///
/// Ordering is numeric on `(major, minor)`, so `3.2 < 3.10 < 10.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
}

impl Version {
    /// Construct a version from its components.
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A tag or branch reported by the remote, paired with its normalized version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRecord {
    /// Identifier exactly as the remote reports it (used to build download URLs).
    pub raw_tag: String,
    /// Normalized version (used for ordering and de-duplication only).
    pub version: Version,
}

/// Extracts a [`Version`] from names shaped like `<prefix>-<major>_<minor>[_<patch>]`.
///
/// The match is anchored at the start of the name only, so trailing suffixes such as `-rc1` are
/// accepted.
#[derive(Clone, Debug)]
pub struct VersionPattern {
    re: Regex,
}

impl VersionPattern {
    /// Build a pattern for `prefix`. With `require_patch`, a third `_<patch>` group must follow.
    pub fn new(prefix: &str, require_patch: bool) -> SplashResult<Self> {
        if prefix.is_empty() {
            return Err(SplashError::validation("version prefix must be non-empty"));
        }
        let patch = if require_patch { r"_\d+" } else { r"(?:_\d+)?" };
        let src = format!(r"^{}-(\d+)_(\d+){patch}", regex::escape(prefix));
        let re = Regex::new(&src)
            .map_err(|e| SplashError::validation(format!("invalid version pattern: {e}")))?;
        Ok(Self { re })
    }

    /// Pattern for tags such as `final-3_22_0`.
    pub fn tag(prefix: &str) -> SplashResult<Self> {
        Self::new(prefix, true)
    }

    /// Pattern for branches such as `release-3_22`.
    pub fn branch(prefix: &str) -> SplashResult<Self> {
        Self::new(prefix, false)
    }

    /// Parse the version out of `name`, or `None` when it is not a release name.
    pub fn extract(&self, name: &str) -> Option<Version> {
        let caps = self.re.captures(name)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        Some(Version::new(major, minor))
    }

    /// Build a [`VersionRecord`] for `name` when it is a release name.
    pub fn record(&self, name: &str) -> Option<VersionRecord> {
        self.extract(name).map(|version| VersionRecord {
            raw_tag: name.to_string(),
            version,
        })
    }
}

/// Drop records whose version was already seen; the first occurrence wins.
pub fn dedup_versions(records: impl IntoIterator<Item = VersionRecord>) -> Vec<VersionRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.version))
        .collect()
}

/// Stable numeric sort by version.
pub fn sort_versions(records: &mut [VersionRecord]) {
    records.sort_by_key(|r| r.version);
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/version.rs"]
mod tests;
