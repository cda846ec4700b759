//! HTML fragment for the widget.
//!
//! The stylesheet targets the class and id names produced here, so both
//! sides must change together.

use std::fmt::Write;

use crate::cascade::CascadeResolver;
use crate::error::Result;
use crate::items::{IconType, MenuItem};
use crate::settings::{Breakpoint, SettingsTree};

/// Kind of page the widget is about to be rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PageKind {
    Home,
    Archive,
    Single,
    Other,
}

/// Whether the widget is shown on `page`.
///
/// Only visibility mode `all` consults the per-page flags; any other mode
/// always displays.
pub fn should_display(tree: &SettingsTree, page: PageKind) -> Result<bool> {
    let view = CascadeResolver::new().view(tree, Breakpoint::Desktop);
    if view.css("visibility.mode")? != "all" {
        return Ok(true);
    }
    let flag = match page {
        PageKind::Home => "visibility.show_on_home",
        PageKind::Archive => "visibility.show_on_archive",
        PageKind::Single => "visibility.show_on_single",
        PageKind::Other => return Ok(true),
    };
    view.flag(flag)
}

/// Renders the menu markup for `items`, in order.
///
/// # Example
///
/// ```
/// use floatmenu_styler::{default_items, render_menu, SettingsTree};
///
/// let html = render_menu(&SettingsTree::defaults(), &default_items("https://example.com")).unwrap();
/// assert!(html.starts_with("<div class=\"fsm-menu fsm-side-right\" id=\"fsm-menu\">"));
/// assert!(html.contains("href=\"https://example.com/\""));
/// assert!(html.contains("<i class=\"fas fa-home\"></i>"));
/// ```
pub fn render_menu(tree: &SettingsTree, items: &[MenuItem]) -> Result<String> {
    let view = CascadeResolver::new().view(tree, Breakpoint::Desktop);
    let side = view.css("position.side")?;
    let position = view.css("icon.position")?;

    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(html, "<div class=\"fsm-menu fsm-side-{}\" id=\"fsm-menu\">", escape_html(&side));

    if view.flag("toggle.enabled")? {
        let open = escape_html(&view.css("toggle.icon_open")?);
        let closed = escape_html(&view.css("toggle.icon_closed")?);
        let _ = writeln!(
            html,
            "<button class=\"fsm-toggle\" id=\"fsm-toggle\" aria-label=\"Toggle menu\" data-icon-open=\"{open}\" data-icon-closed=\"{closed}\"><i class=\"fas {open}\"></i></button>"
        );
    }

    html.push_str("<nav class=\"fsm-nav\" id=\"fsm-nav\">\n");
    for item in items {
        let style = match item.icon_size {
            Some(size) if size > 0 => format!(" style=\"--fsm-icon-size: {size}px;\""),
            _ => String::new(),
        };
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"fsm-item fsm-item-{} fsm-icon-{}\" target=\"{}\"{style}><span class=\"fsm-icon\">{}</span><span class=\"fsm-label\">{}</span></a>",
            escape_html(&item.url),
            item.id,
            escape_html(&position),
            item.target.as_str(),
            render_icon(item),
            escape_html(&item.label),
        );
    }
    html.push_str("</nav>\n</div>\n");

    Ok(html)
}

fn render_icon(item: &MenuItem) -> String {
    match item.icon_type {
        IconType::Image if !item.icon_url.is_empty() => {
            let class = if item.is_svg_image() {
                "fsm-icon-img fsm-icon-svg"
            } else {
                "fsm-icon-img"
            };
            format!("<img src=\"{}\" alt=\"\" class=\"{class}\">", escape_html(&item.icon_url))
        }
        IconType::Dashicons if !item.icon.is_empty() => {
            format!("<span class=\"dashicons {}\"></span>", escape_html(&item.icon))
        }
        _ if !item.icon.is_empty() => {
            let class = if item.icon.starts_with("fa-") {
                format!("fas {}", item.icon)
            } else {
                item.icon.clone()
            };
            format!("<i class=\"{}\"></i>", escape_html(&class))
        }
        _ => "<i class=\"fas fa-link\"></i>".to_string(),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::LinkTarget;

    fn set(tree: &SettingsTree, path: &str, value: impl Into<crate::SettingValue>) -> SettingsTree {
        CascadeResolver::new().set(tree, path, Breakpoint::Desktop, value).unwrap()
    }

    #[test]
    fn icon_variants() {
        let svg = MenuItem::new(1, "Logo", "").with_image("https://example.com/logo.svg");
        assert_eq!(
            render_icon(&svg),
            "<img src=\"https://example.com/logo.svg\" alt=\"\" class=\"fsm-icon-img fsm-icon-svg\">"
        );

        let png = MenuItem::new(2, "Photo", "").with_image("/uploads/me.png");
        assert!(render_icon(&png).ends_with("class=\"fsm-icon-img\">"));

        let dash = MenuItem::new(3, "Admin", "").with_dashicon("dashicons-admin-home");
        assert_eq!(render_icon(&dash), "<span class=\"dashicons dashicons-admin-home\"></span>");

        let brand = MenuItem::new(4, "GitHub", "fab fa-github");
        assert_eq!(render_icon(&brand), "<i class=\"fab fa-github\"></i>");

        let empty = MenuItem::new(5, "Nothing", "").with_image("");
        assert_eq!(render_icon(&empty), "<i class=\"fas fa-link\"></i>");
    }

    #[test]
    fn items_render_in_order_and_escaped() {
        let items = vec![
            MenuItem::new(7, "Q&A <live>", "fa-question").with_target(LinkTarget::NewTab),
            MenuItem::new(2, "Shop", "fa-cart").with_url("/shop?a=1&b=\"2\"").with_icon_size(30),
        ];
        let html = render_menu(&SettingsTree::defaults(), &items).unwrap();

        let qa = html.find("fsm-item-7").unwrap();
        let shop = html.find("fsm-item-2").unwrap();
        assert!(qa < shop);
        assert!(html.contains("<span class=\"fsm-label\">Q&amp;A &lt;live&gt;</span>"));
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("href=\"/shop?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains("style=\"--fsm-icon-size: 30px;\""));
        assert!(html.contains("fsm-icon-top"));
    }

    #[test]
    fn toggle_follows_settings() {
        let html = render_menu(&SettingsTree::defaults(), &[]).unwrap();
        assert!(html.contains("data-icon-open=\"fa-chevron-left\" data-icon-closed=\"fa-chevron-right\""));

        let tree = set(&SettingsTree::defaults(), "toggle.enabled", false);
        let tree = set(&tree, "position.side", "left");
        let html = render_menu(&tree, &[]).unwrap();
        assert!(!html.contains("fsm-toggle"));
        assert!(html.contains("fsm-side-left"));
    }

    #[test]
    fn visibility_rules() {
        let tree = set(&SettingsTree::defaults(), "visibility.show_on_archive", false);
        assert!(should_display(&tree, PageKind::Home).unwrap());
        assert!(!should_display(&tree, PageKind::Archive).unwrap());
        assert!(should_display(&tree, PageKind::Other).unwrap());

        let tree = set(&tree, "visibility.mode", "custom");
        assert!(should_display(&tree, PageKind::Archive).unwrap());
    }
}
