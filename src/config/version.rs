//! API version tokens.
//!
//! This module provides the [`ApiVersion`] type used to select the schema a
//! remote call returns for a given resource type.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A management API version token.
///
/// Versions are date-like tokens such as `2021-04-01`, optionally followed by
/// a pre-release label (`2021-04-01-preview`). Dotted versions such as `1.0`
/// are also accepted.
///
/// # Ordering
///
/// Versions compare their numeric components numerically, not
/// lexicographically, so `2021-10-01` sorts after `2021-9-01`. A version with
/// a pre-release label sorts below the same version without one.
///
/// # Example
///
/// ```rust
/// use resource_manager::ApiVersion;
///
/// let stable: ApiVersion = "2021-06-01".parse().unwrap();
/// let preview: ApiVersion = "2021-06-01-preview".parse().unwrap();
/// let older: ApiVersion = "2020-03-01".parse().unwrap();
///
/// assert!(stable > preview);
/// assert!(preview > older);
/// assert!(preview.is_preview());
/// assert_eq!(stable.to_string(), "2021-06-01");
/// ```
#[derive(Clone, Debug)]
pub struct ApiVersion {
    raw: String,
    numbers: Vec<u64>,
    label: Option<String>,
}

impl ApiVersion {
    /// Parses and validates a version token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] if the token is empty or
    /// does not begin with a numeric component.
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = version.into().trim().to_string();
        let invalid = || ConfigError::InvalidApiVersion {
            version: raw.clone(),
        };

        if raw.is_empty() {
            return Err(invalid());
        }

        let mut numbers = Vec::new();
        let mut label_parts: Vec<&str> = Vec::new();

        for part in raw.split(['-', '.']) {
            if part.is_empty() {
                return Err(invalid());
            }
            if label_parts.is_empty() && part.chars().all(|c| c.is_ascii_digit()) {
                numbers.push(part.parse::<u64>().map_err(|_| invalid())?);
            } else {
                label_parts.push(part);
            }
        }

        if numbers.is_empty() {
            return Err(invalid());
        }

        let label = if label_parts.is_empty() {
            None
        } else {
            Some(label_parts.join("-").to_ascii_lowercase())
        };

        Ok(Self {
            raw,
            numbers,
            label,
        })
    }

    /// Returns the version exactly as it was supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the version carries a pre-release label.
    #[must_use]
    pub const fn is_preview(&self) -> bool {
        self.label.is_some()
    }

    fn cmp_numbers(&self, other: &Self) -> Ordering {
        let len = self.numbers.len().max(other.numbers.len());
        for i in 0..len {
            let a = self.numbers.get(i).copied().unwrap_or(0);
            let b = other.numbers.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ApiVersion {}

impl Hash for ApiVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.to_ascii_lowercase().hash(state);
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_numbers(other)
            .then_with(|| match (&self.label, &other.label) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            // Keeps Ord consistent with Eq for tokens like "2021-6-1" vs "2021-06-01"
            .then_with(|| {
                self.raw
                    .to_ascii_lowercase()
                    .cmp(&other.raw.to_ascii_lowercase())
            })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ApiVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_parses_date_versions() {
        let version = v("2021-04-01");
        assert_eq!(version.as_str(), "2021-04-01");
        assert!(!version.is_preview());
    }

    #[test]
    fn test_parses_preview_versions() {
        let version = v("2015-05-01-preview");
        assert!(version.is_preview());
        assert_eq!(version.to_string(), "2015-05-01-preview");
    }

    #[test]
    fn test_rejects_invalid_versions() {
        assert!(matches!(
            ApiVersion::new(""),
            Err(ConfigError::InvalidApiVersion { .. })
        ));
        assert!(matches!(
            ApiVersion::new("preview"),
            Err(ConfigError::InvalidApiVersion { .. })
        ));
        assert!(matches!(
            ApiVersion::new("2021--01"),
            Err(ConfigError::InvalidApiVersion { .. })
        ));
    }

    #[test]
    fn test_maximum_of_date_versions() {
        let versions = [v("2019-01-01"), v("2021-06-01"), v("2020-03-01")];
        let max = versions.iter().max().unwrap();
        assert_eq!(max.as_str(), "2021-06-01");
    }

    #[test]
    fn test_numeric_components_compare_numerically() {
        assert!(v("2021-10-01") > v("2021-9-01"));
        assert!(v("1.10") > v("1.9"));
        assert!(v("2") > v("1.9.9"));
    }

    #[test]
    fn test_preview_sorts_below_stable_of_same_date() {
        assert!(v("2021-06-01-preview") < v("2021-06-01"));
        assert!(v("2021-06-01-preview") > v("2021-05-01"));
        assert!(v("2021-06-01-alpha") < v("2021-06-01-beta"));
    }

    #[test]
    fn test_equality_is_case_insensitive_on_label() {
        assert_eq!(v("2021-06-01-Preview"), v("2021-06-01-preview"));
        assert_ne!(v("2021-6-1"), v("2021-06-01"));
    }

    #[test]
    fn test_serde_uses_raw_string() {
        let version = v("2022-09-01");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, r#""2022-09-01""#);

        let parsed: ApiVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, version);

        let invalid: Result<ApiVersion, _> = serde_json::from_str(r#""latest""#);
        assert!(invalid.is_err());
    }
}
