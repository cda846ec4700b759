//! Tagged leaf values of a settings tree.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// LeafKind
// ============================================================================

/// The type a schema leaf holds.
///
/// Every leaf of the defaults schema has exactly one kind, and values written
/// into a tree (by loading JSON or by an editor `set`) are coerced to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// A plain number (pixels, milliseconds, unitless factors).
    Number,
    /// Any CSS color string (`#rrggbbaa`, `rgba(...)`, `transparent`).
    Color,
    /// One of a closed set of words (`left`, `slide`, `container`).
    Keyword,
    /// Free text (font stacks, icon class names).
    Text,
    /// A boolean switch.
    Flag,
}

// ============================================================================
// SettingValue
// ============================================================================

/// A single leaf in a settings tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Number(f64),
    Color(String),
    Keyword(String),
    Text(String),
    Flag(bool),
}

impl SettingValue {
    /// Creates a color leaf.
    pub fn color(value: impl Into<String>) -> Self {
        Self::Color(value.into())
    }

    /// Creates a keyword leaf.
    pub fn keyword(value: impl Into<String>) -> Self {
        Self::Keyword(value.into())
    }

    /// Creates a free-text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> LeafKind {
        match self {
            Self::Number(_) => LeafKind::Number,
            Self::Color(_) => LeafKind::Color,
            Self::Keyword(_) => LeafKind::Keyword,
            Self::Text(_) => LeafKind::Text,
            Self::Flag(_) => LeafKind::Flag,
        }
    }

    /// Reads the value as a number.
    ///
    /// Strings that do not parse as a finite number read as `0`.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            Self::Number(_) => 0.0,
            Self::Flag(b) => f64::from(u8::from(*b)),
            Self::Color(s) | Self::Keyword(s) | Self::Text(s) => parse_number(s).unwrap_or(0.0),
        }
    }

    /// Reads the value as a boolean.
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Color(s) | Self::Keyword(s) | Self::Text(s) => parse_flag(s).unwrap_or(false),
        }
    }

    /// Returns the string payload of string-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Color(s) | Self::Keyword(s) | Self::Text(s) => Some(s),
            Self::Number(_) | Self::Flag(_) => None,
        }
    }

    /// Converts to the JSON representation used by the persisted format.
    ///
    /// Whole numbers are written as integers so that `120` stays `120`
    /// rather than becoming `120.0`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => number_to_json(*n),
            Self::Color(s) | Self::Keyword(s) | Self::Text(s) => Value::String(s.clone()),
            Self::Flag(b) => Value::Bool(*b),
        }
    }

    /// Builds a leaf of the given kind from loosely-typed JSON.
    ///
    /// Scalars are coerced to `kind`; numbers that cannot be read become `0`
    /// and a warning is logged. Arrays and objects are rejected because they
    /// mean a group was supplied where the schema has a leaf.
    pub fn from_json(value: &Value, kind: LeafKind, path: &str) -> Result<Self> {
        if value.is_array() || value.is_object() {
            return Err(Error::invalid_settings(path, "expected a value, found a group"));
        }

        let coerced = match kind {
            LeafKind::Number => Self::Number(match value {
                Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
                Value::String(s) => parse_number(s).unwrap_or_else(|| {
                    tracing::warn!(path, value = %s, "non-numeric value coerced to 0");
                    0.0
                }),
                Value::Bool(b) => f64::from(u8::from(*b)),
                _ => {
                    tracing::warn!(path, "null number coerced to 0");
                    0.0
                }
            }),
            LeafKind::Flag => Self::Flag(match value {
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                Value::String(s) => parse_flag(s).unwrap_or_else(|| {
                    tracing::warn!(path, value = %s, "unrecognised flag coerced to false");
                    false
                }),
                _ => false,
            }),
            LeafKind::Color | LeafKind::Keyword | LeafKind::Text => {
                let text = match value {
                    Value::String(s) => s.trim().to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => String::new(),
                };
                match kind {
                    LeafKind::Color => Self::Color(text),
                    LeafKind::Keyword => Self::Keyword(text),
                    _ => Self::Text(text),
                }
            }
        };

        Ok(coerced)
    }

    /// Coerces this value to `kind`, using the same rules as [`from_json`](Self::from_json).
    pub fn coerce_to(&self, kind: LeafKind, path: &str) -> Result<Self> {
        if self.kind() == kind {
            return Ok(self.clone());
        }
        Self::from_json(&self.to_json(), kind, path)
    }
}

impl fmt::Display for SettingValue {
    /// Formats the value the way it appears in CSS.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Color(s) | Self::Keyword(s) | Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for SettingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Strings become [`SettingValue::Text`] and are re-tagged to the schema's
/// kind when written into a tree.
impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Formats a number for CSS output: shortest round-trip form, no `-0`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() || n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

fn number_to_json(n: f64) -> Value {
    if !n.is_finite() {
        return Value::from(0);
    }
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_are_coerced() {
        let v = SettingValue::from_json(&json!("42"), LeafKind::Number, "container.width").unwrap();
        assert_eq!(v, SettingValue::Number(42.0));
    }

    #[test]
    fn malformed_number_becomes_zero() {
        let v = SettingValue::from_json(&json!("wide"), LeafKind::Number, "container.width").unwrap();
        assert_eq!(v, SettingValue::Number(0.0));
        assert_eq!(v.to_string(), "0");
    }

    #[test]
    fn group_in_leaf_position_is_rejected() {
        let err = SettingValue::from_json(&json!({"a": 1}), LeafKind::Number, "z_index").unwrap_err();
        assert!(matches!(err, Error::InvalidSettings { .. }));
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        assert_eq!(SettingValue::Number(120.0).to_json(), json!(120));
        assert_eq!(SettingValue::Number(1.4).to_json(), json!(1.4));
        assert_eq!(SettingValue::Number(-8.0).to_json(), json!(-8));
    }

    #[test]
    fn css_formatting() {
        assert_eq!(SettingValue::Number(120.0).to_string(), "120");
        assert_eq!(SettingValue::Number(1.4).to_string(), "1.4");
        assert_eq!(SettingValue::Number(-0.0).to_string(), "0");
        assert_eq!(SettingValue::color("#fff").to_string(), "#fff");
    }

    #[test]
    fn coerce_text_to_flag_and_number() {
        let flag = SettingValue::from("false").coerce_to(LeafKind::Flag, "toggle.enabled").unwrap();
        assert_eq!(flag, SettingValue::Flag(false));

        let num = SettingValue::from("16").coerce_to(LeafKind::Number, "icon.size").unwrap();
        assert_eq!(num, SettingValue::Number(16.0));

        let kw = SettingValue::from("left").coerce_to(LeafKind::Keyword, "position.side").unwrap();
        assert_eq!(kw, SettingValue::keyword("left"));
    }
}
