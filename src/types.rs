//! Core identifier types used throughout the project.
//!
//! Both identifiers validate their format on construction, so any
//! `LocaleCode` or `KeyId` that exists is well-formed and storage code never
//! re-checks formats.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Errors produced when an identifier fails its format check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Locale codes must be of the form `ab-XY`.
    #[error("{code} is not a valid locale code. It must be in the form of ab-XY")]
    InvalidLocaleCode {
        /// The rejected input.
        code: String,
    },
    /// Key ids must be dotted paths of letters, like `abc.def.xyz`.
    #[error("invalid key id '{id}'; should be of form 'abc.def.xyz'")]
    InvalidKeyId {
        /// The rejected input.
        id: String,
    },
}

/// A language/region identifier such as `en-US`.
///
/// The accepted form is two lowercase letters, a hyphen, two uppercase
/// letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Parse and validate a locale code.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        if is_valid_locale_code(&code) {
            Ok(Self(code))
        } else {
            Err(ValidationError::InvalidLocaleCode { code })
        }
    }

    /// The code as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `ab-XY`: two lowercase letters, a hyphen, two uppercase letters.
fn is_valid_locale_code(code: &str) -> bool {
    let mut chars = code.chars();
    let lower: Vec<char> = chars.by_ref().take(2).collect();
    let hyphen = chars.next();
    let upper: Vec<char> = chars.by_ref().take(2).collect();
    chars.next().is_none()
        && lower.len() == 2
        && lower.iter().all(|c| c.is_ascii_lowercase())
        && hyphen == Some('-')
        && upper.len() == 2
        && upper.iter().all(|c| c.is_ascii_uppercase())
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocaleCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocaleCode> for String {
    fn from(code: LocaleCode) -> Self {
        code.0
    }
}

/// A dotted-path identifier naming one translatable string, independent of
/// language (e.g. `app.name`).
///
/// The id encodes the key's position in the hierarchical namespace:
/// splitting on `.` yields the tree path. Accepted ids are non-empty
/// dot-separated segments of ASCII letters (internal hyphens allowed, as in
/// `added-ok`), at least two characters overall, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyId(String);

impl KeyId {
    /// Parse and validate a key id.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if is_valid_key_id(&id) {
            Ok(Self(id))
        } else {
            Err(ValidationError::InvalidKeyId { id })
        }
    }

    /// Build a key id by joining an optional prefix with path segments.
    ///
    /// A leaf flattened at the tree root has an empty path; the prefix alone
    /// is the id in that case.
    pub fn from_path(prefix: Option<&Self>, segments: &[String]) -> Result<Self, ValidationError> {
        let tail = segments.join(".");
        let id = match prefix {
            Some(prefix) if tail.is_empty() => prefix.as_str().to_string(),
            Some(prefix) => format!("{prefix}.{tail}"),
            None => tail,
        };
        Self::new(id)
    }

    /// The id as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tree path encoded in the id.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Whether this key sits at or under `prefix` in the namespace tree.
    ///
    /// `app.name` is under `app`; `application` is not.
    #[must_use]
    pub fn is_under(&self, prefix: &Self) -> bool {
        self.0 == prefix.0
            || (self.0.len() > prefix.0.len()
                && self.0.starts_with(prefix.as_str())
                && self.0.as_bytes().get(prefix.0.len()) == Some(&b'.'))
    }

    /// The path segments remaining after `prefix`, or `None` when this key
    /// is not under `prefix`. A key equal to the prefix yields an empty
    /// path.
    #[must_use]
    pub fn path_under(&self, prefix: &Self) -> Option<Vec<String>> {
        if !self.is_under(prefix) {
            return None;
        }
        if self.0 == prefix.0 {
            return Some(Vec::new());
        }
        let tail = self.0.get(prefix.0.len() + 1..)?;
        Some(tail.split('.').map(str::to_string).collect())
    }
}

/// Dot-separated non-empty segments of letters with internal hyphens, two
/// characters minimum overall.
fn is_valid_key_id(id: &str) -> bool {
    id.len() >= 2 && id.split('.').all(is_valid_key_segment)
}

/// Letters with internal hyphens; a segment never starts or ends with one.
fn is_valid_key_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
        && !segment.starts_with('-')
        && !segment.ends_with('-')
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for KeyId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for KeyId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KeyId> for String {
    fn from(id: KeyId) -> Self {
        id.0
    }
}
