//! Settings export and import.
//!
//! An export bundle is `{ settings, items, version }`. Imports apply each
//! half independently: a bundle without `items` only replaces the settings
//! and vice versa. Image icons hosted on another origin cannot be trusted to
//! stay reachable, so their `icon_url` is cleared and reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::{Origin, Url};

use crate::error::{Error, Result};
use crate::items::{IconType, MenuItem};
use crate::settings::SettingsTree;

/// Version written into every export.
pub const EXPORT_VERSION: &str = "2.0.0";

/// A complete, portable configuration.
///
/// # Example
///
/// ```
/// use floatmenu_styler::{default_items, ExportBundle, SettingsTree};
///
/// let bundle = ExportBundle::new(SettingsTree::defaults(), default_items(""));
/// let json = bundle.to_json_pretty().unwrap();
/// assert!(json.contains("\"version\": \"2.0.0\""));
///
/// let restored = ExportBundle::from_json(&json).unwrap();
/// assert_eq!(restored, bundle);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub settings: SettingsTree,
    pub items: Vec<MenuItem>,
    pub version: String,
}

impl ExportBundle {
    pub fn new(settings: SettingsTree, items: Vec<MenuItem>) -> Self {
        Self {
            settings,
            items,
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a complete bundle. Use [`import`] for partial bundles.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What an import changed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    pub settings_applied: bool,
    pub items_applied: bool,
    /// Top-level keys the bundle did not contain.
    pub missing: Vec<&'static str>,
    /// Ids of image items whose foreign `icon_url` was cleared.
    pub scrubbed_items: Vec<u32>,
    pub version: Option<String>,
}

/// The state after an import, with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub settings: SettingsTree,
    pub items: Vec<MenuItem>,
    pub report: ImportReport,
}

/// Applies an exported bundle on top of the current settings and items.
///
/// Fails with [`Error::MalformedImport`] if the text is not a JSON object or
/// a present half has the wrong shape; nothing is applied in that case.
///
/// # Example
///
/// ```
/// use floatmenu_styler::{default_items, import, SettingsTree};
///
/// let json = r#"{ "items": [
///     { "id": 1, "icon_type": "image", "icon_url": "https://cdn.other.net/a.svg", "label": "A" }
/// ] }"#;
/// let outcome = import(json, &SettingsTree::defaults(), &default_items(""), "https://example.com").unwrap();
///
/// assert!(!outcome.report.settings_applied);
/// assert_eq!(outcome.report.missing, vec!["settings"]);
/// assert_eq!(outcome.report.scrubbed_items, vec![1]);
/// assert_eq!(outcome.items[0].icon_url, "");
/// ```
pub fn import(
    json: &str,
    current_settings: &SettingsTree,
    current_items: &[MenuItem],
    site_url: &str,
) -> Result<ImportOutcome> {
    let malformed = |reason: String| Error::MalformedImport { reason };

    let value: Value = serde_json::from_str(json).map_err(|e| malformed(e.to_string()))?;
    let Value::Object(mut bundle) = value else {
        return Err(malformed("expected a JSON object".to_string()));
    };

    let mut report = ImportReport {
        version: bundle.get("version").and_then(Value::as_str).map(str::to_string),
        ..ImportReport::default()
    };

    let settings = match bundle.remove("settings").filter(|v| !v.is_null()) {
        Some(value) => {
            report.settings_applied = true;
            SettingsTree::from_json_value(&value).map_err(|e| malformed(format!("settings: {e}")))?
        }
        None => {
            report.missing.push("settings");
            current_settings.clone()
        }
    };

    let items = match bundle.remove("items").filter(|v| !v.is_null()) {
        Some(value) => {
            report.items_applied = true;
            let mut items: Vec<MenuItem> =
                serde_json::from_value(value).map_err(|e| malformed(format!("items: {e}")))?;
            report.scrubbed_items = scrub_foreign_icons(&mut items, site_url);
            items
        }
        None => {
            report.missing.push("items");
            current_items.to_vec()
        }
    };

    if !report.scrubbed_items.is_empty() {
        tracing::warn!(items = ?report.scrubbed_items, "cleared icons hosted on another origin");
    }
    tracing::info!(
        settings = report.settings_applied,
        items = report.items_applied,
        version = report.version.as_deref().unwrap_or("unknown"),
        "import applied"
    );

    Ok(ImportOutcome {
        settings,
        items,
        report,
    })
}

/// Clears `icon_url` of image items not served from `site_url`'s origin and
/// returns their ids. Relative addresses are kept.
fn scrub_foreign_icons(items: &mut [MenuItem], site_url: &str) -> Vec<u32> {
    let site: Option<Origin> = Url::parse(site_url).ok().map(|u| u.origin());
    let mut scrubbed = Vec::new();

    for item in items.iter_mut() {
        if item.icon_type != IconType::Image || item.icon_url.is_empty() {
            continue;
        }
        let local = match Url::parse(&item.icon_url) {
            Ok(url) => site.as_ref().is_some_and(|origin| *origin == url.origin()),
            Err(url::ParseError::RelativeUrlWithoutBase) => true,
            Err(_) => false,
        };
        if !local {
            item.icon_url.clear();
            scrubbed.push(item.id);
        }
    }
    scrubbed
}
