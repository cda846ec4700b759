//! Breakpoints and dotted setting paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Breakpoint
// ============================================================================

/// One of the three inheriting layers of a [`SettingsTree`](super::SettingsTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "tsify",
    derive(tsify_next::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum Breakpoint {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    /// All breakpoints, widest first.
    pub const ALL: [Breakpoint; 3] = [Self::Desktop, Self::Tablet, Self::Mobile];

    /// The breakpoint this one inherits from, if any.
    pub fn parent(self) -> Option<Breakpoint> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(Self::Desktop),
            Self::Mobile => Some(Self::Tablet),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "desktop" => Ok(Self::Desktop),
            "tablet" => Ok(Self::Tablet),
            "mobile" => Ok(Self::Mobile),
            other => Err(Error::invalid_path(other, "unknown breakpoint")),
        }
    }
}

// ============================================================================
// SettingPath
// ============================================================================

/// A parsed dotted path such as `container.padding.top`.
///
/// Parsing only checks the syntax; whether the path addresses a schema leaf
/// is decided by the [`CascadeResolver`](crate::CascadeResolver).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingPath {
    raw: String,
    segments: Vec<String>,
}

impl SettingPath {
    /// Parses a dotted path. Empty paths and empty segments are rejected.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_path(path, "path is empty"));
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::invalid_path(path, "path has an empty segment"));
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SettingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SettingPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
