//! The defaults schema.
//!
//! The schema is itself a fully-populated [`SettingGroup`]: its shape defines
//! which paths are valid and the tag of each leaf defines the kind values are
//! coerced to.

use std::sync::LazyLock;

use super::{SettingGroup, SettingNode, SettingValue};

static DEFAULTS: LazyLock<SettingGroup> = LazyLock::new(build);

/// Returns the shared defaults schema.
pub fn schema() -> &'static SettingGroup {
    &DEFAULTS
}

fn num(n: f64) -> SettingNode {
    SettingNode::Leaf(SettingValue::Number(n))
}

fn color(c: &str) -> SettingNode {
    SettingNode::Leaf(SettingValue::color(c))
}

fn keyword(k: &str) -> SettingNode {
    SettingNode::Leaf(SettingValue::keyword(k))
}

fn text(t: &str) -> SettingNode {
    SettingNode::Leaf(SettingValue::text(t))
}

fn flag(b: bool) -> SettingNode {
    SettingNode::Leaf(SettingValue::Flag(b))
}

fn group<const N: usize>(entries: [(&str, SettingNode); N]) -> SettingNode {
    SettingNode::Group(SettingGroup::from_entries(entries))
}

fn sides(value: f64) -> SettingNode {
    group([
        ("top", num(value)),
        ("right", num(value)),
        ("bottom", num(value)),
        ("left", num(value)),
    ])
}

fn build() -> SettingGroup {
    SettingGroup::from_entries([
        (
            "position",
            group([
                ("side", keyword("right")),
                ("vertical", num(50.0)),
                ("vertical_unit", keyword("%")),
                ("margin", num(0.0)),
            ]),
        ),
        (
            "container",
            group([
                ("background_color", color("#1A1A18")),
                ("width", num(120.0)),
                ("gap", num(0.0)),
                ("padding", sides(14.0)),
                (
                    "border_radius",
                    group([
                        ("top_left", num(16.0)),
                        ("top_right", num(0.0)),
                        ("bottom_right", num(0.0)),
                        ("bottom_left", num(16.0)),
                    ]),
                ),
                (
                    "box_shadow",
                    group([
                        ("x", num(-8.0)),
                        ("y", num(0.0)),
                        ("blur", num(32.0)),
                        ("spread", num(0.0)),
                        ("color", color("#00000026")),
                    ]),
                ),
            ]),
        ),
        (
            "typography",
            group([
                ("font_family", text("inherit")),
                ("font_size", num(11.0)),
                ("font_weight", num(500.0)),
                ("line_height", num(1.4)),
                ("text_color", color("#ffffffe6")),
                ("hover_text_color", color("#ffffff")),
                ("active_text_color", color("#ffffff")),
                ("text_align", keyword("center")),
            ]),
        ),
        (
            "icon",
            group([
                ("size", num(22.0)),
                ("color", color("#ffffffd9")),
                ("hover_color", color("#ffffff")),
                ("active_color", color("#ffffff")),
                ("spacing", num(8.0)),
                ("position", keyword("top")),
                ("align", keyword("center")),
            ]),
        ),
        (
            "item",
            group([
                ("padding", sides(12.0)),
                ("border_radius", num(8.0)),
                ("first_last_radius", keyword("container")),
                ("background_color", color("transparent")),
                ("hover_background", color("#ffffff1a")),
                ("active_background", color("#ffffff26")),
                ("transition_duration", num(200.0)),
            ]),
        ),
        (
            "toggle",
            group([
                ("enabled", flag(true)),
                ("icon_open", text("fa-chevron-left")),
                ("icon_closed", text("fa-chevron-right")),
                ("icon_size", num(14.0)),
                ("icon_rotate", num(0.0)),
                ("background_color", color("#1A1A18")),
                ("icon_color", color("#ffffff")),
                ("hover_background", color("#ffffff1a")),
                ("hover_icon_color", color("#ffffff")),
                ("active_background", color("#ffffff26")),
                ("active_icon_color", color("#ffffff")),
                ("size", num(40.0)),
                ("width", num(28.0)),
                ("border_radius", num(8.0)),
                ("align", keyword("middle")),
            ]),
        ),
        (
            "animation",
            group([
                ("duration", num(300.0)),
                ("easing", keyword("ease-out")),
                ("type", keyword("slide")),
            ]),
        ),
        (
            "hover",
            group([
                ("background_color", color("#ffffff1a")),
                ("text_color", color("#ffffff")),
                ("scale", num(1.0)),
                ("transition_duration", num(200.0)),
            ]),
        ),
        (
            "responsive",
            group([
                ("hide_on_mobile", flag(false)),
                ("breakpoint", num(768.0)),
                ("auto_collapse_mobile", flag(true)),
            ]),
        ),
        (
            "visibility",
            group([
                ("mode", keyword("all")),
                ("show_on_home", flag(true)),
                ("show_on_archive", flag(true)),
                ("show_on_single", flag(true)),
            ]),
        ),
        ("z_index", num(9999.0)),
        (
            "breakpoints",
            group([("tablet", num(1024.0)), ("mobile", num(768.0))]),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LeafKind;

    #[test]
    fn schema_covers_every_group() {
        let schema = schema();
        for key in [
            "position",
            "container",
            "typography",
            "icon",
            "item",
            "toggle",
            "animation",
            "hover",
            "responsive",
            "visibility",
            "breakpoints",
            "z_index",
        ] {
            assert!(schema.get(key).is_some(), "missing group {key}");
        }
    }

    #[test]
    fn leaf_kinds() {
        let schema = schema();
        let kind = |path: &str| {
            let segments: Vec<String> = path.split('.').map(str::to_string).collect();
            schema.leaf(&segments).map(SettingValue::kind)
        };

        assert_eq!(kind("container.padding.top"), Some(LeafKind::Number));
        assert_eq!(kind("container.box_shadow.color"), Some(LeafKind::Color));
        assert_eq!(kind("toggle.enabled"), Some(LeafKind::Flag));
        assert_eq!(kind("position.side"), Some(LeafKind::Keyword));
        assert_eq!(kind("typography.font_family"), Some(LeafKind::Text));
        assert_eq!(kind("container.padding"), None);
    }
}
