//! Breakpoint `@media` blocks.
//!
//! A block restates only the declarations whose leaves the breakpoint
//! overrides. Compound values (padding, corner radii, shadows, `top`) are
//! completed from the cascade at that breakpoint, so overriding one side of
//! the padding still yields a full `padding` shorthand.
//!
//! The mobile block diffs the tablet overrides merged with the mobile ones,
//! because mobile screens also match the tablet query's range only when the
//! tablet block is emitted before it.

use super::{
    ACTIVE_STATE, ALL_FONT_ICONS, DASHICON, FONT_ICONS, HOVER_STATE, ICON_IMG, ICON_SVG, ITEM, ITEM_ACTIVE,
    ITEM_HOVER, LABEL, MENU, MENU_COLLAPSED, NAV, TOGGLE, TOGGLE_ACTIVE, TOGGLE_ACTIVE_ICON, TOGGLE_HOVER, TOGGLE_HOVER_ICON,
    TOGGLE_ICON, Scope, animation_rules, box_shadow, container_radius, edge_radius_rules, font_stack, padding,
    top,
};
use super::keywords::{AnimationKind, IconPosition, ItemAlign, Keyword, Side, ToggleAlign};
use crate::cascade::{CascadeResolver, ResolvedView};
use crate::error::Result;
use crate::filter::color_to_filter;
use crate::settings::{Breakpoint, SettingGroup, SettingNode, SettingsTree};
use crate::stylesheet::{CssRule, MediaBlock, Stylesheet};

/// Appends the tablet and mobile blocks for `tree`.
///
/// A block is only considered when that breakpoint's own override layer has
/// at least one leaf, and is dropped if it ends up without rules.
pub(super) fn append_blocks(
    sheet: &mut Stylesheet,
    resolver: &CascadeResolver<'_>,
    tree: &SettingsTree,
    base_side: Side,
) -> Result<()> {
    let desktop = resolver.view(tree, Breakpoint::Desktop);

    if tree.tablet().has_leaves() {
        let width = desktop.css("breakpoints.tablet")?;
        let view = resolver.view(tree, Breakpoint::Tablet);
        let rules = breakpoint_rules(tree.tablet(), &view, base_side)?;
        sheet.push_media(block("Tablet", &width, rules));
    }

    if tree.mobile().has_leaves() {
        let width = desktop.css("breakpoints.mobile")?;
        let merged = tree.tablet().merged_with(tree.mobile());
        let view = resolver.view(tree, Breakpoint::Mobile);
        let rules = breakpoint_rules(&merged, &view, base_side)?;
        sheet.push_media(block("Mobile", &width, rules));
    }

    Ok(())
}

fn block(name: &str, width: &str, rules: Vec<CssRule>) -> MediaBlock {
    let query = format!("(max-width: {width}px)");
    let mut block = MediaBlock::new(query.clone()).with_comment(format!("{name} Responsive {query}"));
    for rule in rules {
        block.push(rule);
    }
    block
}

/// Presence checks against an override layer.
struct Overrides<'a>(&'a SettingGroup);

impl Overrides<'_> {
    fn has(&self, path: &str) -> bool {
        self.0.leaf_at(path).is_some()
    }

    /// True if any leaf exists below the group at `path`.
    fn any(&self, path: &str) -> bool {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        match self.0.node(&segments) {
            Some(SettingNode::Group(group)) => group.has_leaves(),
            Some(SettingNode::Leaf(_)) => true,
            None => false,
        }
    }
}

fn breakpoint_rules(layer: &SettingGroup, view: &ResolvedView<'_, '_>, base_side: Side) -> Result<Vec<CssRule>> {
    let o = Overrides(layer);
    let scope = Scope::Boosted;
    let side = Side::from_keyword(&view.css("position.side")?);
    let side_changed = side != base_side;
    let mut rules = Vec::new();

    // Menu position.
    let mut menu = CssRule::new(MENU);
    if o.has("position.vertical") || o.has("position.vertical_unit") {
        menu.push("top", top(view)?);
    }
    if side_changed {
        menu.push(base_side.as_str(), "auto");
        menu.push(side.as_str(), view.px("position.margin")?);
    } else if o.has("position.margin") {
        menu.push(side.as_str(), view.px("position.margin")?);
    }
    if o.has("z_index") {
        menu.push("z-index", view.css("z_index")?);
    }
    rules.push(menu);

    // Nav container.
    let mut nav = scope.rule(&NAV);
    if o.has("container.width") {
        nav.push("width", view.px("container.width")?);
    }
    if o.has("container.background_color") {
        nav.push("background", view.css("container.background_color")?);
    }
    if o.has("container.gap") {
        nav.push("gap", view.px("container.gap")?);
    }
    if o.any("container.padding") {
        nav.push("padding", padding(view, "container.padding")?);
    }
    if o.any("container.border_radius") {
        nav.push("border-radius", container_radius(view)?);
    }
    if o.any("container.box_shadow") {
        nav.push("box-shadow", box_shadow(view)?);
    }
    if side_changed {
        nav.push("order", side.orders().0);
    }
    rules.push(nav);

    rules.extend(toggle_rules(&o, view, side, side_changed)?);
    rules.extend(item_rules(&o, view)?);

    if o.has("item.first_last_radius") || o.has("item.border_radius") || o.any("container.border_radius") {
        rules.extend(edge_radius_rules(view, scope, true)?);
    }

    if o.any("animation") || side_changed {
        let previous = side_changed.then_some(base_side);
        rules.extend(animation_rules(view, side, scope, previous)?);
    } else if o.has("container.width")
        && AnimationKind::from_keyword(&view.css("animation.type")?) == AnimationKind::Slide
    {
        // The slide offset hides the nav by its own width.
        rules.push(CssRule::new(MENU_COLLAPSED).decl(side.as_str(), format!("-{}", view.px("container.width")?)));
    }

    Ok(rules)
}

fn toggle_rules(o: &Overrides<'_>, view: &ResolvedView<'_, '_>, side: Side, side_changed: bool) -> Result<Vec<CssRule>> {
    let scope = Scope::Boosted;
    let mut toggle = scope.rule(&TOGGLE);
    let enabled = view.flag("toggle.enabled")?;

    if o.has("toggle.enabled") {
        toggle.push("display", if enabled { "flex" } else { "none" });
    }
    if !enabled {
        return Ok(vec![toggle]);
    }

    if o.has("toggle.width") {
        toggle.push("width", view.px("toggle.width")?);
    }
    if o.has("toggle.size") {
        toggle.push("height", view.px("toggle.size")?);
    }
    if o.has("toggle.background_color") {
        toggle.push("background", view.css("toggle.background_color")?);
    }
    if o.has("toggle.icon_color") {
        toggle.push("color", view.css("toggle.icon_color")?);
    }
    if o.has("toggle.border_radius") || side_changed {
        toggle.push("border-radius", side.toggle_radius(&view.css("toggle.border_radius")?));
    }
    if o.has("toggle.align") {
        toggle.push("align-self", ToggleAlign::from_keyword(&view.css("toggle.align")?).flex_value());
    }
    if side_changed {
        toggle.push("order", side.orders().1);
    }

    let mut icon = scope.rule(&TOGGLE_ICON);
    if o.has("toggle.icon_color") {
        icon.push("color", view.css("toggle.icon_color")?);
    }
    if o.has("toggle.icon_size") {
        icon.push("font-size", view.px("toggle.icon_size")?);
    }
    if o.has("toggle.icon_rotate") {
        icon.push("transform", format!("rotate({}deg)", view.css("toggle.icon_rotate")?));
    }

    let mut rules = vec![toggle, icon];
    if o.has("toggle.hover_background") {
        rules.push(scope.rule(&TOGGLE_HOVER).decl("background", view.css("toggle.hover_background")?));
    }
    if o.has("toggle.hover_icon_color") {
        rules.push(scope.rule(&TOGGLE_HOVER_ICON).decl("color", view.css("toggle.hover_icon_color")?));
    }
    if o.has("toggle.active_background") {
        rules.push(scope.rule(&TOGGLE_ACTIVE).decl("background", view.css("toggle.active_background")?));
    }
    if o.has("toggle.active_icon_color") {
        rules.push(scope.rule(&TOGGLE_ACTIVE_ICON).decl("color", view.css("toggle.active_icon_color")?));
    }
    Ok(rules)
}

fn item_rules(o: &Overrides<'_>, view: &ResolvedView<'_, '_>) -> Result<Vec<CssRule>> {
    let scope = Scope::Boosted;
    let mut item = scope.rule(&ITEM);
    let mut label = scope.rule(&LABEL);

    if o.has("typography.font_family") {
        let font = font_stack(&view.css("typography.font_family")?);
        item.push("font-family", font.clone());
        label.push("font-family", font);
    }
    if o.has("typography.font_size") {
        item.push("font-size", view.px("typography.font_size")?);
        label.push("font-size", view.px("typography.font_size")?);
    }
    if o.has("typography.font_weight") {
        item.push("font-weight", view.css("typography.font_weight")?);
        label.push("font-weight", view.css("typography.font_weight")?);
    }
    if o.has("typography.text_color") {
        item.push("color", view.css("typography.text_color")?);
        label.push("color", view.css("typography.text_color")?);
    }
    if o.has("typography.line_height") {
        label.push("line-height", view.css("typography.line_height")?);
    }
    if o.has("typography.text_align") {
        item.push("text-align", view.css("typography.text_align")?);
        label.push("text-align", view.css("typography.text_align")?);
    }
    if o.has("icon.spacing") {
        item.push("gap", view.px("icon.spacing")?);
    }
    if o.has("icon.position") {
        item.push(
            "flex-direction",
            IconPosition::from_keyword(&view.css("icon.position")?).flex_direction(),
        );
    }
    if o.has("icon.align") {
        let align = ItemAlign::from_keyword(&view.css("icon.align")?).flex_value();
        item.push("align-items", align);
        item.push("justify-content", align);
    }
    if o.any("item.padding") {
        item.push("padding", padding(view, "item.padding")?);
    }
    if o.has("item.border_radius") {
        item.push("border-radius", view.px("item.border_radius")?);
    }
    if o.has("item.background_color") {
        item.push("background", view.css("item.background_color")?);
    }
    if o.has("item.transition_duration") {
        item.push("transition", format!("all {}ms ease", view.css("item.transition_duration")?));
    }

    let mut rules = vec![item, label];

    if o.has("icon.size") {
        let size = view.px("icon.size")?;
        rules.push(scope.rule(&FONT_ICONS).decl("font-size", size.clone()));
        rules.push(
            scope
                .rule(&DASHICON)
                .decl("font-size", size.clone())
                .decl("width", size.clone())
                .decl("height", size.clone()),
        );
        rules.push(scope.rule(&ICON_IMG).decl("width", size.clone()).decl("height", size));
    }
    if o.has("icon.color") {
        let color = view.css("icon.color")?;
        rules.push(scope.rule(&ALL_FONT_ICONS).decl("color", color.clone()));
        rules.push(scope.rule(&ICON_SVG).decl("filter", color_to_filter(&color)));
    }

    // Hover state.
    let mut hover = scope.rule(&ITEM_HOVER);
    if o.has("item.hover_background") {
        hover.push("background", view.css("item.hover_background")?);
    }
    if o.has("typography.hover_text_color") {
        let color = view.css("typography.hover_text_color")?;
        hover.push("color", color.clone());
        rules.push(scope.nested(&HOVER_STATE, &LABEL).decl("color", color));
    }
    rules.push(hover);
    if o.has("icon.hover_color") {
        let color = view.css("icon.hover_color")?;
        rules.push(scope.nested(&HOVER_STATE, &ALL_FONT_ICONS).decl("color", color.clone()));
        rules.push(scope.nested(&HOVER_STATE, &ICON_SVG).decl("filter", color_to_filter(&color)));
    }

    // Active state.
    let mut active = scope.rule(&ITEM_ACTIVE);
    if o.has("item.active_background") {
        active.push("background", view.css("item.active_background")?);
    }
    if o.has("typography.active_text_color") {
        let color = view.css("typography.active_text_color")?;
        active.push("color", color.clone());
        rules.push(scope.nested(&ACTIVE_STATE, &LABEL).decl("color", color));
    }
    rules.push(active);
    if o.has("icon.active_color") {
        let color = view.css("icon.active_color")?;
        rules.push(scope.nested(&ACTIVE_STATE, &ALL_FONT_ICONS).decl("color", color.clone()));
        rules.push(scope.nested(&ACTIVE_STATE, &ICON_SVG).decl("filter", color_to_filter(&color)));
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use crate::cascade::CascadeResolver;
    use crate::compiler::compile;
    use crate::items::default_items;
    use crate::settings::{Breakpoint, SettingValue, SettingsTree};
    use crate::stylesheet::Stylesheet;

    fn with(edits: &[(&str, Breakpoint, SettingValue)]) -> Stylesheet {
        let resolver = CascadeResolver::new();
        let mut tree = SettingsTree::defaults();
        for (path, bp, value) in edits {
            tree = resolver.set(&tree, path, *bp, value.clone()).unwrap();
        }
        compile(&tree, &default_items("")).unwrap()
    }

    #[test]
    fn tablet_width_only_emits_tablet_block() {
        let sheet = with(&[("container.width", Breakpoint::Tablet, SettingValue::Number(100.0))]);

        let tablet = sheet.media("(max-width: 1024px)").unwrap();
        assert!(tablet.values_of("width").any(|w| w == "100px"));
        assert!(tablet.values_of("background").next().is_none());
        assert!(tablet.values_of("padding").next().is_none());
        assert!(sheet.media("(max-width: 768px)").is_none());

        let collapsed = tablet.rule("#fsm-menu.fsm-menu.fsm-collapsed").unwrap();
        assert_eq!(collapsed.value_of("right"), Some("-100px"));
        assert_eq!(collapsed.declarations().len(), 1);
        for untouched in ["transition", "transform", "opacity", "visibility"] {
            assert!(tablet.values_of(untouched).next().is_none(), "{untouched} re-emitted");
        }

        let css = sheet.to_css();
        assert!(css.contains("/* Tablet Responsive (max-width: 1024px) */"));
        assert!(css.contains("        width: 100px !important;"));
    }

    #[test]
    fn width_override_under_fade_keeps_margin_offset() {
        let sheet = with(&[
            ("animation.type", Breakpoint::Desktop, SettingValue::keyword("fade")),
            ("container.width", Breakpoint::Tablet, SettingValue::Number(100.0)),
        ]);

        let tablet = sheet.media("(max-width: 1024px)").unwrap();
        assert!(tablet.rule("#fsm-menu.fsm-menu.fsm-collapsed").is_none());
        assert!(tablet.values_of("opacity").next().is_none());
    }

    #[test]
    fn mobile_block_merges_tablet_overrides() {
        let sheet = with(&[
            ("container.background_color", Breakpoint::Tablet, SettingValue::color("#222222")),
            ("icon.size", Breakpoint::Mobile, SettingValue::Number(16.0)),
        ]);

        let mobile = sheet.media("(max-width: 768px)").unwrap();
        assert!(mobile.values_of("background").any(|b| b == "#222222"));
        assert!(mobile.values_of("font-size").any(|s| s == "16px"));

        let tablet = sheet.media("(max-width: 1024px)").unwrap();
        assert!(tablet.values_of("font-size").next().is_none());
    }

    #[test]
    fn no_mobile_block_without_mobile_leaves() {
        let sheet = with(&[("icon.size", Breakpoint::Tablet, SettingValue::Number(18.0))]);
        assert!(sheet.media("(max-width: 1024px)").is_some());
        assert!(sheet.media("(max-width: 768px)").is_none());
    }

    #[test]
    fn partial_padding_is_completed_from_cascade() {
        let sheet = with(&[
            ("container.padding.top", Breakpoint::Tablet, SettingValue::Number(4.0)),
            ("container.padding.left", Breakpoint::Mobile, SettingValue::Number(2.0)),
        ]);

        let tablet = sheet.media("(max-width: 1024px)").unwrap();
        assert_eq!(tablet.values_of("padding").collect::<Vec<_>>(), vec!["4px 14px 14px 14px"]);

        let mobile = sheet.media("(max-width: 768px)").unwrap();
        assert_eq!(mobile.values_of("padding").collect::<Vec<_>>(), vec!["4px 14px 14px 2px"]);
    }

    #[test]
    fn selectors_carry_menu_class() {
        let sheet = with(&[("container.gap", Breakpoint::Tablet, SettingValue::Number(6.0))]);
        let tablet = sheet.media("(max-width: 1024px)").unwrap();
        let nav = tablet
            .rules
            .iter()
            .find(|r| r.value_of("gap").is_some())
            .unwrap();
        assert_eq!(nav.selectors, vec!["#fsm-menu.fsm-menu .fsm-nav".to_string()]);
    }

    #[test]
    fn toggle_can_be_hidden_per_breakpoint() {
        let sheet = with(&[("toggle.enabled", Breakpoint::Mobile, SettingValue::Flag(false))]);
        let mobile = sheet.media("(max-width: 768px)").unwrap();
        assert_eq!(mobile.values_of("display").collect::<Vec<_>>(), vec!["none"]);

        let sheet = with(&[
            ("toggle.enabled", Breakpoint::Desktop, SettingValue::Flag(false)),
            ("toggle.enabled", Breakpoint::Tablet, SettingValue::Flag(true)),
        ]);
        let tablet = sheet.media("(max-width: 1024px)").unwrap();
        assert_eq!(tablet.values_of("display").collect::<Vec<_>>(), vec!["flex"]);
    }

    #[test]
    fn side_change_releases_old_edge() {
        let sheet = with(&[("position.side", Breakpoint::Mobile, SettingValue::keyword("left"))]);
        let mobile = sheet.media("(max-width: 768px)").unwrap();
        let menu = mobile.rules.first().unwrap();
        assert_eq!(menu.value_of("right"), Some("auto"));
        assert_eq!(menu.value_of("left"), Some("0px"));
        assert!(mobile.values_of("border-radius").any(|r| r == "0 8px 8px 0"));
        assert!(mobile.values_of("left").any(|l| l == "-120px"));
    }

    #[test]
    fn vertical_uses_inherited_unit() {
        let sheet = with(&[
            ("position.vertical_unit", Breakpoint::Tablet, SettingValue::keyword("px")),
            ("position.vertical", Breakpoint::Mobile, SettingValue::Number(200.0)),
        ]);
        let tablet = sheet.media("(max-width: 1024px)").unwrap();
        assert_eq!(tablet.values_of("top").collect::<Vec<_>>(), vec!["50px"]);
        let mobile = sheet.media("(max-width: 768px)").unwrap();
        assert_eq!(mobile.values_of("top").collect::<Vec<_>>(), vec!["200px"]);
    }

    #[test]
    fn override_only_of_non_visual_groups_emits_nothing() {
        let sheet = with(&[("visibility.show_on_home", Breakpoint::Tablet, SettingValue::Flag(false))]);
        assert_eq!(sheet.media_blocks().count(), 0);
    }
}
