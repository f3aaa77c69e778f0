use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Casing applied to fragments that survive the length filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePolicy {
    Preserve,
    Lowercase,
}

impl CasePolicy {
    pub fn from_lowercase_flag(lowercase: bool) -> Self {
        if lowercase {
            Self::Lowercase
        } else {
            Self::Preserve
        }
    }
}

impl FromStr for CasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "lowercase" | "lower" => Ok(Self::Lowercase),
            other => Err(format!("unknown case policy '{other}'")),
        }
    }
}

impl fmt::Display for CasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preserve => write!(f, "preserve"),
            Self::Lowercase => write!(f, "lowercase"),
        }
    }
}

/// Drops fragments of at most one character and applies `policy` to the rest.
///
/// Length is counted in characters, so a lone `ö` is dropped even though it
/// spans two bytes. Order is kept; nothing is trimmed or deduplicated.
pub fn normalize_texts(fragments: &[String], policy: CasePolicy) -> Vec<String> {
    fragments
        .iter()
        .filter(|fragment| fragment.chars().count() > 1)
        .map(|fragment| match policy {
            CasePolicy::Preserve => fragment.clone(),
            CasePolicy::Lowercase => fragment.to_lowercase(),
        })
        .collect()
}
