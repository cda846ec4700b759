//! Menu items and the editor-side item list.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Item Fields
// ============================================================================

/// Where an item's icon comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "tsify",
    derive(tsify_next::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum IconType {
    /// A WordPress Dashicons class (`dashicons-admin-home`).
    Dashicons,
    /// An uploaded or remote image addressed by `icon_url`.
    Image,
    /// A Font Awesome class (`fa-home`). Unknown types fall back to this.
    #[default]
    #[serde(other)]
    Fontawesome,
}

/// Link target of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "tsify",
    derive(tsify_next::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum LinkTarget {
    #[serde(rename = "_blank")]
    NewTab,
    #[default]
    #[serde(rename = "_self", other)]
    SameTab,
}

impl LinkTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SameTab => "_self",
            Self::NewTab => "_blank",
        }
    }
}

// ============================================================================
// MenuItem
// ============================================================================

/// One entry of the floating menu, rendered in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "tsify",
    derive(tsify_next::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct MenuItem {
    pub id: u32,

    #[serde(default)]
    pub icon_type: IconType,

    /// Icon class for font icon types.
    #[serde(default)]
    pub icon: String,

    /// Image address for [`IconType::Image`].
    #[serde(default)]
    pub icon_url: String,

    /// Per-item icon size in pixels, overriding `icon.size`.
    #[serde(default, deserialize_with = "lenient_icon_size")]
    pub icon_size: Option<u32>,

    #[serde(default)]
    pub label: String,

    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub target: LinkTarget,
}

impl MenuItem {
    /// Creates a Font Awesome item linking to `#`.
    pub fn new(id: u32, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id,
            icon_type: IconType::Fontawesome,
            icon: icon.into(),
            icon_url: String::new(),
            icon_size: None,
            label: label.into(),
            url: default_url(),
            target: LinkTarget::SameTab,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_target(mut self, target: LinkTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_icon_size(mut self, size: u32) -> Self {
        self.icon_size = Some(size);
        self
    }

    /// Switches the item to an image icon.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.icon_type = IconType::Image;
        self.icon_url = url.into();
        self
    }

    pub fn with_dashicon(mut self, class: impl Into<String>) -> Self {
        self.icon_type = IconType::Dashicons;
        self.icon = class.into();
        self
    }

    /// True for image icons that are recolored with a CSS filter.
    pub fn is_svg_image(&self) -> bool {
        self.icon_type == IconType::Image
            && (self.icon_url.contains(".svg") || self.icon_url.contains("image/svg"))
    }
}

fn default_url() -> String {
    "#".to_string()
}

/// Accepts `null`, `""`, numbers and numeric strings; zero means unset.
fn lenient_icon_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let size = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(size
        .filter(|s| s.is_finite() && *s >= 1.0)
        .map(|s| s.round().min(f64::from(u32::MAX)) as u32))
}

/// The items created on first activation.
pub fn default_items(site_url: &str) -> Vec<MenuItem> {
    let home = if site_url.is_empty() {
        "/".to_string()
    } else {
        format!("{}/", site_url.trim_end_matches('/'))
    };

    vec![
        MenuItem::new(1, "Home", "fa-home").with_url(home),
        MenuItem::new(2, "About", "fa-info-circle"),
        MenuItem::new(3, "Contact", "fa-envelope"),
    ]
}

// ============================================================================
// MenuItems
// ============================================================================

/// An ordered item list with an id allocator.
///
/// Ids are allocated as one past the highest id ever seen in this list, so an
/// id freed by [`remove`](Self::remove) is never handed out again.
///
/// # Example
///
/// ```
/// use floatmenu_styler::{MenuItem, MenuItems};
///
/// let mut items = MenuItems::from_items(vec![MenuItem::new(4, "Docs", "fa-book")]);
/// let id = items.add(MenuItem::new(0, "Blog", "fa-rss"));
/// assert_eq!(id, 5);
///
/// items.remove(5);
/// assert_eq!(items.next_id(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItems {
    items: Vec<MenuItem>,
    high_water: u32,
}

impl MenuItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<MenuItem>) -> Self {
        let high_water = items.iter().map(|i| i.id).max().unwrap_or(0);
        Self { items, high_water }
    }

    pub fn as_slice(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<MenuItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The id the next added item will receive.
    pub fn next_id(&self) -> u32 {
        self.high_water.saturating_add(1)
    }

    /// Appends `item` with a freshly allocated id and returns that id.
    pub fn add(&mut self, mut item: MenuItem) -> u32 {
        let id = self.next_id();
        item.id = id;
        self.high_water = id;
        self.items.push(item);
        id
    }

    pub fn get(&self, id: u32) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Removes the item with `id`, returning it.
    pub fn remove(&mut self, id: u32) -> Option<MenuItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Moves the item at `from` to position `to`.
    ///
    /// Returns false, leaving the list as it is, if either index is out of
    /// range or they are equal.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() || from == to {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Replaces the whole list, keeping the high-water mark monotonic.
    pub fn replace(&mut self, items: Vec<MenuItem>) {
        let max = items.iter().map(|i| i.id).max().unwrap_or(0);
        self.high_water = self.high_water.max(max);
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_deserialization() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": 7,
            "icon_type": "svg-sprite",
            "icon_size": "",
            "label": "Shop",
            "target": "_top"
        }))
        .unwrap();

        assert_eq!(item.icon_type, IconType::Fontawesome);
        assert_eq!(item.icon_size, None);
        assert_eq!(item.url, "#");
        assert_eq!(item.target, LinkTarget::SameTab);

        let sized: MenuItem = serde_json::from_value(json!({ "id": 1, "icon_size": "18" })).unwrap();
        assert_eq!(sized.icon_size, Some(18));
    }

    #[test]
    fn unknown_enum_values_fall_back() {
        let icon = |v: &str| serde_json::from_value::<IconType>(json!(v)).unwrap();
        assert_eq!(icon("image"), IconType::Image);
        assert_eq!(icon("dashicons"), IconType::Dashicons);
        assert_eq!(icon("svg"), IconType::Fontawesome);

        let target = |v: &str| serde_json::from_value::<LinkTarget>(json!(v)).unwrap();
        assert_eq!(target("_blank"), LinkTarget::NewTab);
        assert_eq!(target("_parent"), LinkTarget::SameTab);
        assert_eq!(serde_json::to_value(LinkTarget::SameTab).unwrap(), "_self");
    }

    #[test]
    fn serializes_wire_names() {
        let item = MenuItem::new(1, "Home", "fa-home").with_target(LinkTarget::NewTab);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["target"], "_blank");
        assert_eq!(json["icon_type"], "fontawesome");
        assert_eq!(json["icon_size"], Value::Null);
    }

    #[test]
    fn default_items_link_home() {
        let items = default_items("https://example.com/");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].url, "https://example.com/");
        assert_eq!(items[2].icon, "fa-envelope");
    }

    #[test]
    fn ids_are_not_reused() {
        let mut items = MenuItems::from_items(default_items(""));
        assert_eq!(items.next_id(), 4);

        items.remove(3);
        assert_eq!(items.add(MenuItem::new(0, "New", "fa-star")), 4);

        items.replace(vec![MenuItem::new(2, "Only", "fa-star")]);
        assert_eq!(items.next_id(), 5);
    }

    #[test]
    fn reorder() {
        let mut items = MenuItems::from_items(default_items(""));
        assert!(items.move_item(0, 2));
        assert!(!items.move_item(0, 3));
        let ids: Vec<u32> = items.as_slice().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn svg_detection() {
        assert!(MenuItem::new(1, "a", "").with_image("https://x.test/i.svg").is_svg_image());
        assert!(!MenuItem::new(1, "a", "").with_image("https://x.test/i.png").is_svg_image());
    }
}
