//! Version values and user-facing version specifiers.
//!
//! [`parse`] accepts everything a user may type for `install`
//! (`18.5.1`, `v18`, `18.5`, `latest`), while [`strict_parse`] only accepts a
//! fully qualified `X.Y.Z` and is used wherever partial forms make no sense.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Literal token that resolves to the highest version of a universe.
pub const LATEST: &str = "latest";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid version format: '{0}'")]
    Malformed(String),

    #[error("'{0}' is not a full version; name it exactly (e.g. 18.5.1) or use 'latest'")]
    Incomplete(String),
}

/// A three-component release number.
///
/// Field order drives the derived ordering, so comparison is lexicographic
/// over (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Directory name used for this version under the storage root.
    pub fn dir_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strict_parse(s)
    }
}

/// Leading one or two components of a version, e.g. `18` or `18.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPrefix {
    pub major: u32,
    pub minor: Option<u32>,
}

impl VersionPrefix {
    pub fn matches(&self, version: &Version) -> bool {
        self.major == version.major && self.minor.map_or(true, |minor| minor == version.minor)
    }
}

impl fmt::Display for VersionPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{}", self.major, minor),
            None => write!(f, "{}", self.major),
        }
    }
}

/// A parsed but unresolved request for a version.
///
/// The same value resolves against either the installed set or the remote
/// catalog; it carries nothing about where it will be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpec {
    Exact(Version),
    Prefix(VersionPrefix),
    Latest,
}

impl VersionSpec {
    /// Whether `version` satisfies this spec, ignoring which one is highest.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionSpec::Exact(exact) => exact == version,
            VersionSpec::Prefix(prefix) => prefix.matches(version),
            VersionSpec::Latest => true,
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Exact(version) => write!(f, "{version}"),
            VersionSpec::Prefix(prefix) => write!(f, "{prefix}"),
            VersionSpec::Latest => f.write_str(LATEST),
        }
    }
}

impl std::str::FromStr for VersionSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Strip surrounding whitespace and a single leading `v`/`V`.
fn clean(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
}

pub fn is_latest(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(LATEST)
}

fn parse_components(raw: &str, cleaned: &str) -> Result<Vec<u32>, ParseError> {
    if cleaned.is_empty() {
        return Err(ParseError::Malformed(raw.to_string()));
    }

    cleaned
        .split('.')
        .map(|part| {
            // u32::from_str accepts a leading '+', which is not a version digit
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::Malformed(raw.to_string()));
            }
            part.parse::<u32>()
                .map_err(|_| ParseError::Malformed(raw.to_string()))
        })
        .collect()
}

/// Parse any specifier a user may pass to `install`.
pub fn parse(raw: &str) -> Result<VersionSpec, ParseError> {
    if is_latest(raw) {
        return Ok(VersionSpec::Latest);
    }

    let cleaned = clean(raw);
    match parse_components(raw, cleaned)?.as_slice() {
        [major] => Ok(VersionSpec::Prefix(VersionPrefix {
            major: *major,
            minor: None,
        })),
        [major, minor] => Ok(VersionSpec::Prefix(VersionPrefix {
            major: *major,
            minor: Some(*minor),
        })),
        [major, minor, patch] => Ok(VersionSpec::Exact(Version::new(*major, *minor, *patch))),
        _ => Err(ParseError::Malformed(raw.to_string())),
    }
}

/// Parse a fully qualified `X.Y.Z` (optionally `v`-prefixed) and nothing else.
pub fn strict_parse(raw: &str) -> Result<Version, ParseError> {
    match parse(raw)? {
        VersionSpec::Exact(version) => Ok(version),
        VersionSpec::Prefix(_) | VersionSpec::Latest => Err(ParseError::Incomplete(raw.to_string())),
    }
}
