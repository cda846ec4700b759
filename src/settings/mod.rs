//! The settings tree: a fully-populated desktop layer plus sparse tablet and
//! mobile override layers.
//!
//! Trees are validated against the [defaults schema](defaults::schema) at the
//! boundary. Loading JSON backfills every missing desktop leaf from the
//! defaults, drops unknown keys, coerces leaves to the schema's kind and
//! prunes empty override branches, so everything downstream can rely on a
//! well-formed tree.
//!
//! # Persisted format
//!
//! ```json
//! {
//!   "position": { "side": "right", "vertical": 50, ... },
//!   "container": { "width": 120, ... },
//!   ...
//!   "tablet": { "container": { "width": 100 } },
//!   "mobile": {}
//! }
//! ```

pub mod defaults;
mod path;
mod value;

pub use path::{Breakpoint, SettingPath};
pub use value::{LeafKind, SettingValue, format_number};

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ============================================================================
// SettingNode / SettingGroup
// ============================================================================

/// A node in a settings tree: either a nested group or a leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingNode {
    Group(SettingGroup),
    Leaf(SettingValue),
}

impl SettingNode {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Group(group) => group.to_json(),
            Self::Leaf(value) => value.to_json(),
        }
    }
}

/// A group of named settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingGroup {
    entries: BTreeMap<String, SettingNode>,
}

impl SettingGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a group from `(key, node)` pairs.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, SettingNode)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, node)| (key.to_string(), node))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the direct child named `key`.
    pub fn get(&self, key: &str) -> Option<&SettingNode> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Walks `segments` and returns the node found there.
    pub fn node(&self, segments: &[String]) -> Option<&SettingNode> {
        let (first, rest) = segments.split_first()?;
        let node = self.entries.get(first)?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            SettingNode::Group(group) => group.node(rest),
            SettingNode::Leaf(_) => None,
        }
    }

    /// Returns the leaf at `segments`, or `None` if the path is absent or
    /// ends on a group.
    pub fn leaf(&self, segments: &[String]) -> Option<&SettingValue> {
        match self.node(segments)? {
            SettingNode::Leaf(value) => Some(value),
            SettingNode::Group(_) => None,
        }
    }

    /// Convenience lookup by dotted path.
    pub fn leaf_at(&self, path: &str) -> Option<&SettingValue> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        self.leaf(&segments)
    }

    /// Returns true if at least one leaf exists anywhere below this group.
    pub fn has_leaves(&self) -> bool {
        self.entries.values().any(|node| match node {
            SettingNode::Leaf(_) => true,
            SettingNode::Group(group) => group.has_leaves(),
        })
    }

    /// Lists the dotted paths of every leaf, in key order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_leaf_paths("", &mut paths);
        paths
    }

    fn collect_leaf_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, node) in &self.entries {
            let path = join_path(prefix, key);
            match node {
                SettingNode::Leaf(_) => out.push(path),
                SettingNode::Group(group) => group.collect_leaf_paths(&path, out),
            }
        }
    }

    /// Recursively merges `over` on top of `self`; leaves in `over` win.
    pub fn merged_with(&self, over: &SettingGroup) -> SettingGroup {
        let mut merged = self.clone();
        for (key, node) in &over.entries {
            let next = match (merged.entries.get(key), node) {
                (Some(SettingNode::Group(base)), SettingNode::Group(top)) => {
                    SettingNode::Group(base.merged_with(top))
                }
                _ => node.clone(),
            };
            merged.entries.insert(key.clone(), next);
        }
        merged
    }

    /// Writes a leaf, creating intermediate groups as needed.
    pub(crate) fn set_leaf(&mut self, segments: &[String], value: SettingValue) {
        match segments {
            [] => {}
            [last] => {
                self.entries.insert(last.clone(), SettingNode::Leaf(value));
            }
            [head, rest @ ..] => {
                let entry = self
                    .entries
                    .entry(head.clone())
                    .or_insert_with(|| SettingNode::Group(SettingGroup::new()));
                if let SettingNode::Leaf(_) = entry {
                    *entry = SettingNode::Group(SettingGroup::new());
                }
                if let SettingNode::Group(child) = entry {
                    child.set_leaf(rest, value);
                }
            }
        }
    }

    /// Removes the leaf at `segments` and prunes ancestors left empty.
    ///
    /// Returns true if a leaf was removed.
    pub(crate) fn remove_leaf(&mut self, segments: &[String]) -> bool {
        match segments {
            [] => false,
            [last] => {
                if matches!(self.entries.get(last), Some(SettingNode::Leaf(_))) {
                    self.entries.remove(last);
                    true
                } else {
                    false
                }
            }
            [head, rest @ ..] => {
                let Some(SettingNode::Group(child)) = self.entries.get_mut(head) else {
                    return false;
                };
                let removed = child.remove_leaf(rest);
                if removed && child.is_empty() {
                    self.entries.remove(head);
                }
                removed
            }
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_json()))
                .collect(),
        )
    }

    /// Overlays `saved` onto `schema`, producing a fully-populated group.
    fn overlay_full(schema: &SettingGroup, saved: &Map<String, Value>, prefix: &str) -> Result<Self> {
        let mut out = schema.clone();

        for (key, value) in saved {
            let path = join_path(prefix, key);
            match schema.entries.get(key) {
                None => {
                    if !(prefix.is_empty() && (key == "tablet" || key == "mobile")) {
                        tracing::warn!(path = %path, "dropping unknown setting");
                    }
                }
                Some(SettingNode::Group(sub)) => match value {
                    Value::Object(map) => {
                        let merged = Self::overlay_full(sub, map, &path)?;
                        out.entries.insert(key.clone(), SettingNode::Group(merged));
                    }
                    Value::Array(items) if items.is_empty() => {}
                    _ => {
                        tracing::warn!(path = %path, "expected a group, keeping defaults");
                    }
                },
                Some(SettingNode::Leaf(default)) => {
                    let leaf = SettingValue::from_json(value, default.kind(), &path)?;
                    out.entries.insert(key.clone(), SettingNode::Leaf(leaf));
                }
            }
        }

        Ok(out)
    }

    /// Validates a sparse override document against `schema`.
    ///
    /// Only schema paths survive; `null` leaves and empty groups are dropped.
    fn overlay_sparse(schema: &SettingGroup, saved: &Map<String, Value>, prefix: &str) -> Result<Self> {
        let mut out = SettingGroup::new();

        for (key, value) in saved {
            let path = join_path(prefix, key);
            match schema.entries.get(key) {
                None => {
                    tracing::warn!(path = %path, "dropping unknown override");
                }
                Some(SettingNode::Group(sub)) => match value {
                    Value::Object(map) => {
                        let child = Self::overlay_sparse(sub, map, &path)?;
                        if !child.is_empty() {
                            out.entries.insert(key.clone(), SettingNode::Group(child));
                        }
                    }
                    Value::Null => {}
                    Value::Array(items) if items.is_empty() => {}
                    _ => {
                        tracing::warn!(path = %path, "expected a group, dropping override");
                    }
                },
                Some(SettingNode::Leaf(default)) => {
                    if value.is_null() {
                        continue;
                    }
                    let leaf = SettingValue::from_json(value, default.kind(), &path)?;
                    out.entries.insert(key.clone(), SettingNode::Leaf(leaf));
                }
            }
        }

        Ok(out)
    }
}

impl Serialize for SettingGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

// ============================================================================
// SettingsTree
// ============================================================================

/// The complete settings document for the widget.
///
/// # Example
///
/// ```
/// use floatmenu_styler::{Breakpoint, SettingsTree};
///
/// let json = r#"{ "container": { "width": "96" }, "tablet": { "container": { "width": 80 } } }"#;
/// let tree = SettingsTree::from_json(json).unwrap();
///
/// // Desktop is backfilled from defaults and coerced to the schema kinds.
/// assert_eq!(tree.desktop().leaf_at("container.width").unwrap().as_number(), 96.0);
/// assert_eq!(tree.desktop().leaf_at("position.side").unwrap().to_string(), "right");
/// assert!(tree.layer(Breakpoint::Tablet).has_leaves());
/// assert!(tree.mobile().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsTree {
    desktop: SettingGroup,
    tablet: SettingGroup,
    mobile: SettingGroup,
}

impl Default for SettingsTree {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SettingsTree {
    /// A tree holding the defaults and no overrides.
    pub fn defaults() -> Self {
        Self {
            desktop: defaults::schema().clone(),
            tablet: SettingGroup::new(),
            mobile: SettingGroup::new(),
        }
    }

    pub fn desktop(&self) -> &SettingGroup {
        &self.desktop
    }

    pub fn tablet(&self) -> &SettingGroup {
        &self.tablet
    }

    pub fn mobile(&self) -> &SettingGroup {
        &self.mobile
    }

    /// The layer that stores values for `breakpoint`.
    pub fn layer(&self, breakpoint: Breakpoint) -> &SettingGroup {
        match breakpoint {
            Breakpoint::Desktop => &self.desktop,
            Breakpoint::Tablet => &self.tablet,
            Breakpoint::Mobile => &self.mobile,
        }
    }

    pub(crate) fn layer_mut(&mut self, breakpoint: Breakpoint) -> &mut SettingGroup {
        match breakpoint {
            Breakpoint::Desktop => &mut self.desktop,
            Breakpoint::Tablet => &mut self.tablet,
            Breakpoint::Mobile => &mut self.mobile,
        }
    }

    /// Validates a settings document.
    ///
    /// `null` and PHP-style empty arrays are read as "nothing saved".
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let empty = Map::new();
        let saved = match value {
            Value::Object(map) => map,
            Value::Null => &empty,
            Value::Array(items) if items.is_empty() => &empty,
            _ => return Err(Error::invalid_settings("", "settings must be an object")),
        };

        let schema = defaults::schema();
        let desktop = SettingGroup::overlay_full(schema, saved, "")?;
        let tablet = Self::read_override(schema, saved.get("tablet"), "tablet")?;
        let mobile = Self::read_override(schema, saved.get("mobile"), "mobile")?;

        Ok(Self {
            desktop,
            tablet,
            mobile,
        })
    }

    fn read_override(schema: &SettingGroup, value: Option<&Value>, name: &str) -> Result<SettingGroup> {
        match value {
            None | Some(Value::Null) => Ok(SettingGroup::new()),
            Some(Value::Array(items)) if items.is_empty() => Ok(SettingGroup::new()),
            Some(Value::Object(map)) => SettingGroup::overlay_sparse(schema, map, name),
            Some(_) => Err(Error::invalid_settings(name, "overrides must be an object")),
        }
    }

    /// Converts to the persisted JSON shape, with `tablet` and `mobile`
    /// always present as objects.
    pub fn to_json_value(&self) -> Value {
        let mut root = match self.desktop.to_json() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        root.insert("tablet".to_string(), self.tablet.to_json());
        root.insert("mobile".to_string(), self.mobile.to_json());
        Value::Object(root)
    }

    /// Parses and validates a JSON settings document.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value())?)
    }
}

impl Serialize for SettingsTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SettingsTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for SettingsTree {
    fn schema_name() -> String {
        "SettingsTree".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <Map<String, Value>>::json_schema(generator)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segments(path: &str) -> Vec<String> {
        path.split('.').map(str::to_string).collect()
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(SettingsTree::from_json("{}").unwrap(), SettingsTree::defaults());
        assert_eq!(SettingsTree::from_json("[]").unwrap(), SettingsTree::defaults());
    }

    #[test]
    fn saved_values_merge_over_defaults() {
        let tree = SettingsTree::from_json_value(&json!({
            "container": { "padding": { "top": 4 } },
            "z_index": "50"
        }))
        .unwrap();

        let desktop = tree.desktop();
        assert_eq!(desktop.leaf_at("container.padding.top"), Some(&SettingValue::Number(4.0)));
        assert_eq!(desktop.leaf_at("container.padding.left"), Some(&SettingValue::Number(14.0)));
        assert_eq!(desktop.leaf_at("z_index"), Some(&SettingValue::Number(50.0)));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let tree = SettingsTree::from_json_value(&json!({
            "legacy": { "x": 1 },
            "tablet": { "nonsense": 3, "icon": { "size": 18, "bogus": 1 } }
        }))
        .unwrap();

        assert!(tree.desktop().get("legacy").is_none());
        assert_eq!(tree.tablet().leaf_paths(), vec!["icon.size".to_string()]);
    }

    #[test]
    fn php_empty_arrays_are_empty_overrides() {
        let tree = SettingsTree::from_json_value(&json!({ "tablet": [], "mobile": [] })).unwrap();
        assert!(tree.tablet().is_empty());
        assert!(tree.mobile().is_empty());
    }

    #[test]
    fn empty_override_groups_are_pruned_on_load() {
        let tree = SettingsTree::from_json_value(&json!({
            "mobile": { "container": { "padding": {} } }
        }))
        .unwrap();
        assert!(tree.mobile().is_empty());
    }

    #[test]
    fn group_where_leaf_expected_is_rejected() {
        let err = SettingsTree::from_json_value(&json!({ "z_index": { "value": 1 } })).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings { ref path, .. } if path == "z_index"));
    }

    #[test]
    fn json_roundtrip_keeps_integers() {
        let tree = SettingsTree::defaults();
        let json = tree.to_json().unwrap();
        assert!(json.contains("\"width\":120"));
        assert!(json.contains("\"line_height\":1.4"));
        assert!(json.contains("\"tablet\":{}"));
        assert_eq!(SettingsTree::from_json(&json).unwrap(), tree);
    }

    #[test]
    fn remove_leaf_prunes_to_first_non_empty_ancestor() {
        let mut group = SettingGroup::new();
        group.set_leaf(&segments("container.padding.top"), SettingValue::Number(1.0));
        group.set_leaf(&segments("container.width"), SettingValue::Number(90.0));

        assert!(group.remove_leaf(&segments("container.padding.top")));
        assert!(group.node(&segments("container.padding")).is_none());
        assert!(group.leaf_at("container.width").is_some());

        assert!(group.remove_leaf(&segments("container.width")));
        assert!(group.is_empty());
        assert!(!group.remove_leaf(&segments("container.width")));
    }

    #[test]
    fn merge_is_leaf_granular() {
        let mut tablet = SettingGroup::new();
        tablet.set_leaf(&segments("container.padding.top"), SettingValue::Number(2.0));
        tablet.set_leaf(&segments("container.padding.left"), SettingValue::Number(3.0));
        let mut mobile = SettingGroup::new();
        mobile.set_leaf(&segments("container.padding.top"), SettingValue::Number(9.0));

        let merged = tablet.merged_with(&mobile);
        assert_eq!(merged.leaf_at("container.padding.top"), Some(&SettingValue::Number(9.0)));
        assert_eq!(merged.leaf_at("container.padding.left"), Some(&SettingValue::Number(3.0)));
    }
}
