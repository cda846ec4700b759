//! Stylesheet compiler.
//!
//! Turns a [`SettingsTree`] and the item list into a [`Stylesheet`]. The
//! desktop cascade produces the base rules; tablet and mobile overrides
//! produce `@media` blocks that only restate what those breakpoints change.
//!
//! Base rules, in order:
//!
//! 1. reset of host theme styles, re-asserting icon font properties
//! 2. positioning of the fixed menu
//! 3. the nav container box
//! 4. the toggle button
//! 5. items, icons, labels and per-item icon sizes
//! 6. first/last item corner rounding
//! 7. hover and active states
//! 8. collapse animation
//! 9. optional hide-below-breakpoint query

mod keywords;
mod responsive;

pub use keywords::{AnimationKind, EdgeRadius, IconPosition, ItemAlign, Keyword, Side, ToggleAlign};

use crate::cascade::{CascadeResolver, ResolvedView};
use crate::error::Result;
use crate::filter::color_to_filter;
use crate::items::MenuItem;
use crate::settings::{Breakpoint, SettingsTree};
use crate::stylesheet::{CssRule, MediaBlock, Stylesheet};

/// Selector of the menu root element.
pub const MENU: &str = "#fsm-menu.fsm-menu";

/// Selector of the menu root while collapsed.
pub const MENU_COLLAPSED: &str = "#fsm-menu.fsm-menu.fsm-collapsed";

const THEME_FONT: &str =
    "var(--e-global-typography-primary-font-family, var(--wp--preset--font-family--body, inherit))";

const ITEM: [&str; 2] = [".fsm-item", "a.fsm-item"];
const ITEM_HOVER: [&str; 2] = [
    ".fsm-item:hover:not(:active):not(.active)",
    "a.fsm-item:hover:not(:active):not(.active)",
];
const ITEM_ACTIVE: [&str; 4] = [".fsm-item:active", "a.fsm-item:active", ".fsm-item.active", "a.fsm-item.active"];
const HOVER_STATE: [&str; 1] = [".fsm-item:hover:not(:active):not(.active)"];
const ACTIVE_STATE: [&str; 2] = [".fsm-item:active", ".fsm-item.active"];
const FONT_ICONS: [&str; 4] = [".fsm-icon i", ".fsm-icon .fas", ".fsm-icon .far", ".fsm-icon .fab"];
const ALL_FONT_ICONS: [&str; 5] = [
    ".fsm-icon i",
    ".fsm-icon .fas",
    ".fsm-icon .far",
    ".fsm-icon .fab",
    ".fsm-icon .dashicons",
];
const DASHICON: [&str; 1] = [".fsm-icon .dashicons"];
const ICON_IMG: [&str; 1] = [".fsm-icon-img"];
const ICON_SVG: [&str; 1] = [".fsm-icon-svg"];
const LABEL: [&str; 1] = [".fsm-label"];
const NAV: [&str; 1] = [".fsm-nav"];
const TOGGLE: [&str; 2] = [".fsm-toggle", "button.fsm-toggle"];
const TOGGLE_ICON: [&str; 1] = [".fsm-toggle i"];
const TOGGLE_HOVER: [&str; 2] = [".fsm-toggle:hover:not(:active)", ".fsm-toggle:focus:not(:active)"];
const TOGGLE_HOVER_ICON: [&str; 2] = [".fsm-toggle:hover:not(:active) i", ".fsm-toggle:focus:not(:active) i"];
const TOGGLE_ACTIVE: [&str; 1] = [".fsm-toggle:active"];
const TOGGLE_ACTIVE_ICON: [&str; 1] = [".fsm-toggle:active i"];

// ============================================================================
// Selector Scope
// ============================================================================

/// Selector prefix: base rules use the id alone, breakpoint rules add the
/// `.fsm-menu` class so they outrank the base rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Base,
    Boosted,
}

impl Scope {
    fn prefix(self) -> &'static str {
        match self {
            Self::Base => "#fsm-menu",
            Self::Boosted => MENU,
        }
    }

    fn rule(self, suffixes: &[&str]) -> CssRule {
        CssRule::with_selectors(suffixes.iter().map(|s| format!("{} {s}", self.prefix())))
    }

    /// Rule for every `state inner` descendant combination.
    fn nested(self, states: &[&str], inner: &[&str]) -> CssRule {
        CssRule::with_selectors(
            states
                .iter()
                .flat_map(|state| inner.iter().map(move |i| format!("{} {state} {i}", self.prefix()))),
        )
    }
}

// ============================================================================
// StyleCompiler
// ============================================================================

/// Compiles settings and items into a stylesheet.
///
/// # Example
///
/// ```
/// use floatmenu_styler::{default_items, Breakpoint, CascadeResolver, SettingsTree, StyleCompiler};
///
/// let resolver = CascadeResolver::new();
/// let tree = resolver.set(&SettingsTree::defaults(), "container.width", Breakpoint::Tablet, 100).unwrap();
///
/// let sheet = StyleCompiler::new().compile(&tree, &default_items("")).unwrap();
/// let tablet = sheet.media("(max-width: 1024px)").unwrap();
/// assert!(tablet.values_of("width").any(|w| w == "100px"));
/// assert!(sheet.media("(max-width: 768px)").is_none());
/// assert!(sheet.to_css().contains("@media (max-width: 1024px)"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StyleCompiler<'s> {
    resolver: CascadeResolver<'s>,
}

impl Default for StyleCompiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleCompiler<'static> {
    pub fn new() -> Self {
        Self {
            resolver: CascadeResolver::new(),
        }
    }
}

impl<'s> StyleCompiler<'s> {
    pub fn with_resolver(resolver: CascadeResolver<'s>) -> Self {
        Self { resolver }
    }

    /// Compiles the complete stylesheet.
    pub fn compile(&self, tree: &SettingsTree, items: &[MenuItem]) -> Result<Stylesheet> {
        let view = self.resolver.view(tree, Breakpoint::Desktop);
        let side = Side::from_keyword(&view.css("position.side")?);
        let font = font_stack(&view.css("typography.font_family")?);

        let mut sheet = Stylesheet::new();
        sheet.extend_rules(reset_rules());
        sheet.push_rule(menu_rule(&view, side, &font)?);
        sheet.push_rule(nav_rule(&view, side)?);
        sheet.extend_rules(toggle_rules(&view, side)?);
        sheet.extend_rules(item_rules(&view, &font)?);
        sheet.extend_rules(item_icon_size_rules(items));
        sheet.extend_rules(edge_radius_rules(&view, Scope::Base, false)?);
        sheet.extend_rules(state_rules(&view)?);
        sheet.extend_rules(animation_rules(&view, side, Scope::Base, None)?);

        if view.flag("responsive.hide_on_mobile")? {
            let mut block = MediaBlock::new(format!("(max-width: {}px)", view.css("responsive.breakpoint")?))
                .with_comment("Hide on small screens");
            block.push(CssRule::new(MENU).decl("display", "none"));
            sheet.push_media(block);
        }

        responsive::append_blocks(&mut sheet, &self.resolver, tree, side)?;

        tracing::debug!(
            items = sheet.items().len(),
            breakpoints = sheet.media_blocks().count(),
            "stylesheet compiled"
        );
        Ok(sheet)
    }
}

/// Compiles `tree` and `items` with the default schema.
pub fn compile(tree: &SettingsTree, items: &[MenuItem]) -> Result<Stylesheet> {
    StyleCompiler::new().compile(tree, items)
}

// ============================================================================
// Shared Values
// ============================================================================

fn font_stack(family: &str) -> String {
    if family == "inherit" {
        THEME_FONT.to_string()
    } else {
        family.to_string()
    }
}

/// Four pixel lengths from `group.{a,b,c,d}`.
fn px4(view: &ResolvedView<'_, '_>, group: &str, keys: [&str; 4]) -> Result<String> {
    let parts = keys
        .iter()
        .map(|key| view.px(&format!("{group}.{key}")))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(" "))
}

fn padding(view: &ResolvedView<'_, '_>, group: &str) -> Result<String> {
    px4(view, group, ["top", "right", "bottom", "left"])
}

fn container_radius(view: &ResolvedView<'_, '_>) -> Result<String> {
    px4(
        view,
        "container.border_radius",
        ["top_left", "top_right", "bottom_right", "bottom_left"],
    )
}

fn box_shadow(view: &ResolvedView<'_, '_>) -> Result<String> {
    Ok(format!(
        "{} {}",
        px4(view, "container.box_shadow", ["x", "y", "blur", "spread"])?,
        view.css("container.box_shadow.color")?
    ))
}

fn top(view: &ResolvedView<'_, '_>) -> Result<String> {
    Ok(format!("{}{}", view.css("position.vertical")?, view.css("position.vertical_unit")?))
}

// ============================================================================
// Base Rules
// ============================================================================

fn reset_rules() -> Vec<CssRule> {
    const RESET: [(&str, &str); 43] = [
        ("margin", "0"),
        ("padding", "0"),
        ("border", "none"),
        ("border-width", "0"),
        ("border-style", "none"),
        ("outline", "none"),
        ("box-sizing", "border-box"),
        ("text-decoration", "none"),
        ("list-style", "none"),
        ("background", "transparent"),
        ("background-image", "none"),
        ("box-shadow", "none"),
        ("text-shadow", "none"),
        ("text-transform", "none"),
        ("gap", "0"),
        ("letter-spacing", "normal"),
        ("word-spacing", "normal"),
        ("line-height", "1.4"),
        ("vertical-align", "baseline"),
        ("float", "none"),
        ("clear", "none"),
        ("text-indent", "0"),
        ("white-space", "normal"),
        ("visibility", "visible"),
        ("opacity", "1"),
        ("min-width", "0"),
        ("min-height", "0"),
        ("max-width", "none"),
        ("max-height", "none"),
        ("overflow", "visible"),
        ("clip", "auto"),
        ("filter", "none"),
        ("transform", "none"),
        ("animation", "none"),
        ("transition", "none"),
        ("-webkit-text-fill-color", "initial"),
        ("-webkit-text-stroke", "initial"),
        ("position", "static"),
        ("top", "auto"),
        ("right", "auto"),
        ("bottom", "auto"),
        ("left", "auto"),
        ("z-index", "auto"),
    ];

    let mut reset = CssRule::with_selectors(["#fsm-menu", "#fsm-menu *", "#fsm-menu *::before", "#fsm-menu *::after"])
        .with_comment("Reset host theme styles, keeping icon fonts intact");
    for (property, value) in RESET {
        reset.push(property, value);
    }

    let font_awesome = Scope::Base
        .rule(&[".fas", ".far", ".fab", ".fa", "i[class*='fa-']"])
        .with_comment("Font Awesome")
        .decl("font-family", "'Font Awesome 6 Free'")
        .decl("font-style", "normal")
        .decl("font-variant", "normal")
        .decl("text-rendering", "auto")
        .decl("-webkit-font-smoothing", "antialiased")
        .decl("-moz-osx-font-smoothing", "grayscale")
        .decl("display", "inline-block");

    let dashicons = Scope::Base
        .rule(&[".dashicons", "[class*='dashicons-']"])
        .with_comment("Dashicons")
        .decl("font-family", "dashicons")
        .decl("font-style", "normal")
        .decl("font-weight", "normal")
        .decl("font-variant", "normal")
        .decl("text-transform", "none")
        .decl("text-rendering", "auto")
        .decl("-webkit-font-smoothing", "antialiased")
        .decl("-moz-osx-font-smoothing", "grayscale")
        .decl("display", "inline-block")
        .decl("speak", "never");

    vec![
        reset,
        font_awesome,
        Scope::Base.rule(&[".fas", "i.fas"]).decl("font-weight", "900"),
        Scope::Base.rule(&[".far"]).decl("font-weight", "400"),
        Scope::Base
            .rule(&[".fab"])
            .decl("font-family", "'Font Awesome 6 Brands'")
            .decl("font-weight", "400"),
        dashicons,
    ]
}

fn menu_rule(view: &ResolvedView<'_, '_>, side: Side, font: &str) -> Result<CssRule> {
    Ok(CssRule::new(MENU)
        .with_comment("Menu")
        .decl("position", "fixed")
        .decl(side.as_str(), view.px("position.margin")?)
        .decl("top", top(view)?)
        .decl("transform", "translateY(-50%)")
        .decl("z-index", view.css("z_index")?)
        .decl("display", "flex")
        .decl("align-items", "center")
        .decl("gap", "0")
        .decl("font-family", font))
}

fn nav_rule(view: &ResolvedView<'_, '_>, side: Side) -> Result<CssRule> {
    Ok(Scope::Base
        .rule(&NAV)
        .with_comment("Navigation")
        .decl("display", "flex")
        .decl("flex-direction", "column")
        .decl("gap", view.px("container.gap")?)
        .decl("background", view.css("container.background_color")?)
        .decl("width", view.px("container.width")?)
        .decl("padding", padding(view, "container.padding")?)
        .decl("border-radius", container_radius(view)?)
        .decl("box-shadow", box_shadow(view)?)
        .decl("order", side.orders().0))
}

fn toggle_rules(view: &ResolvedView<'_, '_>, side: Side) -> Result<Vec<CssRule>> {
    if !view.flag("toggle.enabled")? {
        return Ok(vec![
            Scope::Boosted
                .rule(&TOGGLE)
                .with_comment("Toggle")
                .decl("display", "none"),
        ]);
    }

    let align = ToggleAlign::from_keyword(&view.css("toggle.align")?);
    let toggle = Scope::Base
        .rule(&TOGGLE)
        .with_comment("Toggle")
        .decl("display", "flex")
        .decl("align-items", "center")
        .decl("justify-content", "center")
        .decl("background", view.css("toggle.background_color")?)
        .decl("color", view.css("toggle.icon_color")?)
        .decl("width", view.px("toggle.width")?)
        .decl("height", view.px("toggle.size")?)
        .decl("border-radius", side.toggle_radius(&view.css("toggle.border_radius")?))
        .decl("cursor", "pointer")
        .decl("order", side.orders().1)
        .decl("align-self", align.flex_value())
        .decl("transition", "all 0.2s ease");

    Ok(vec![
        toggle,
        Scope::Base
            .rule(&TOGGLE_HOVER)
            .decl("background", view.css("toggle.hover_background")?),
        Scope::Base
            .rule(&TOGGLE_HOVER_ICON)
            .decl("color", view.css("toggle.hover_icon_color")?),
        Scope::Base
            .rule(&TOGGLE_ACTIVE)
            .decl("background", view.css("toggle.active_background")?),
        Scope::Base
            .rule(&TOGGLE_ACTIVE_ICON)
            .decl("color", view.css("toggle.active_icon_color")?),
        Scope::Base
            .rule(&TOGGLE_ICON)
            .decl("color", view.css("toggle.icon_color")?)
            .decl("font-size", view.px("toggle.icon_size")?)
            .decl("transform", format!("rotate({}deg)", view.css("toggle.icon_rotate")?))
            .decl("transition", "transform 0.2s ease"),
    ])
}

fn item_rules(view: &ResolvedView<'_, '_>, font: &str) -> Result<Vec<CssRule>> {
    let position = IconPosition::from_keyword(&view.css("icon.position")?);
    let align = ItemAlign::from_keyword(&view.css("icon.align")?);
    let icon_size = view.px("icon.size")?;
    let icon_color = view.css("icon.color")?;

    let item = Scope::Base
        .rule(&ITEM)
        .with_comment("Items")
        .decl("display", "flex")
        .decl("flex-direction", position.flex_direction())
        .decl("align-items", align.flex_value())
        .decl("justify-content", align.flex_value())
        .decl("text-align", view.css("typography.text_align")?)
        .decl("gap", view.px("icon.spacing")?)
        .decl("padding", padding(view, "item.padding")?)
        .decl("background", view.css("item.background_color")?)
        .decl("color", view.css("typography.text_color")?)
        .decl("font-family", font)
        .decl("font-size", view.px("typography.font_size")?)
        .decl("font-weight", view.css("typography.font_weight")?)
        .decl("border-radius", view.px("item.border_radius")?)
        .decl("transition", format!("all {}ms ease", view.css("item.transition_duration")?))
        .decl("cursor", "pointer");

    let label = Scope::Base
        .rule(&LABEL)
        .with_comment("Labels")
        .decl("color", view.css("typography.text_color")?)
        .decl("font-family", font)
        .decl("font-size", view.px("typography.font_size")?)
        .decl("font-weight", view.css("typography.font_weight")?)
        .decl("line-height", view.css("typography.line_height")?)
        .decl("text-align", view.css("typography.text_align")?)
        .decl("white-space", "normal")
        .decl("overflow-wrap", "break-word")
        .decl("width", "100%");

    Ok(vec![
        item,
        Scope::Base
            .rule(&[".fsm-icon"])
            .with_comment("Icons")
            .decl("display", "flex")
            .decl("align-items", "center")
            .decl("justify-content", "center")
            .decl("line-height", "1"),
        Scope::Base
            .rule(&FONT_ICONS)
            .decl("font-size", icon_size.clone())
            .decl("color", icon_color.clone())
            .decl("width", "auto")
            .decl("height", "auto"),
        Scope::Base
            .rule(&DASHICON)
            .decl("font-size", icon_size.clone())
            .decl("color", icon_color.clone())
            .decl("width", icon_size.clone())
            .decl("height", icon_size.clone()),
        Scope::Base
            .rule(&ICON_IMG)
            .decl("width", icon_size.clone())
            .decl("height", icon_size)
            .decl("object-fit", "contain")
            .decl("border-radius", "4px"),
        Scope::Base
            .rule(&ICON_SVG)
            .decl("filter", color_to_filter(&icon_color)),
        label,
    ])
}

/// Size rules for items carrying their own `icon_size`.
fn item_icon_size_rules(items: &[MenuItem]) -> Vec<CssRule> {
    let mut rules = Vec::new();
    for item in items {
        let Some(size) = item.icon_size.filter(|s| *s > 0) else {
            continue;
        };
        let size = format!("{size}px");
        let scoped = |inner: &[&str]| {
            CssRule::with_selectors(
                inner
                    .iter()
                    .map(|s| format!("{MENU} .fsm-item-{} {s}", item.id)),
            )
        };

        rules.push(
            scoped(&FONT_ICONS)
                .with_comment(format!("Item {} icon size", item.id))
                .decl("font-size", size.clone()),
        );
        rules.push(
            scoped(&DASHICON)
                .decl("font-size", size.clone())
                .decl("width", size.clone())
                .decl("height", size.clone()),
        );
        rules.push(scoped(&ICON_IMG).decl("width", size.clone()).decl("height", size));
    }
    rules
}

/// Corner rounding of the first, last and only item.
///
/// In `item` mode nothing is needed at the base level; with `restate` set
/// (breakpoint blocks) the item radius is written out to undo a wider
/// breakpoint's container-shaped corners.
fn edge_radius_rules(view: &ResolvedView<'_, '_>, scope: Scope, restate: bool) -> Result<Vec<CssRule>> {
    let first = scope.rule(&[".fsm-item:first-child", "a.fsm-item:first-child"]);
    let last = scope.rule(&[".fsm-item:last-child", "a.fsm-item:last-child"]);
    let only = scope.rule(&[".fsm-item:only-child", "a.fsm-item:only-child"]);
    let item_radius = view.px("item.border_radius")?;

    let rules = match EdgeRadius::from_keyword(&view.css("item.first_last_radius")?) {
        EdgeRadius::None => vec![
            first.decl("border-radius", "0"),
            last.decl("border-radius", "0"),
            only.decl("border-radius", "0"),
        ],
        EdgeRadius::Item if restate => vec![
            first.decl("border-radius", item_radius.clone()),
            last.decl("border-radius", item_radius.clone()),
            only.decl("border-radius", item_radius),
        ],
        EdgeRadius::Item => Vec::new(),
        EdgeRadius::Container => {
            let corner = |key: &str| view.px(&format!("container.border_radius.{key}"));
            let (tl, tr, br, bl) = (
                corner("top_left")?,
                corner("top_right")?,
                corner("bottom_right")?,
                corner("bottom_left")?,
            );
            vec![
                first.decl("border-radius", format!("{tl} {tr} {item_radius} {item_radius}")),
                last.decl("border-radius", format!("{item_radius} {item_radius} {br} {bl}")),
                only.decl("border-radius", format!("{tl} {tr} {br} {bl}")),
            ]
        }
    };
    Ok(rules)
}

/// Hover and active rules. Hover selectors exclude the active state so an
/// active item never shows hover colors.
fn state_rules(view: &ResolvedView<'_, '_>) -> Result<Vec<CssRule>> {
    let hover_text = view.css("typography.hover_text_color")?;
    let active_text = view.css("typography.active_text_color")?;
    let hover_icon = view.css("icon.hover_color")?;
    let active_icon = view.css("icon.active_color")?;

    Ok(vec![
        Scope::Base
            .rule(&ITEM_HOVER)
            .with_comment("Hover")
            .decl("background", view.css("item.hover_background")?)
            .decl("color", hover_text.clone()),
        Scope::Base.nested(&HOVER_STATE, &ALL_FONT_ICONS).decl("color", hover_icon.clone()),
        Scope::Base
            .nested(&HOVER_STATE, &ICON_SVG)
            .decl("filter", color_to_filter(&hover_icon)),
        Scope::Base.nested(&HOVER_STATE, &LABEL).decl("color", hover_text),
        Scope::Base
            .rule(&ITEM_ACTIVE)
            .with_comment("Active")
            .decl("background", view.css("item.active_background")?)
            .decl("color", active_text.clone()),
        Scope::Base.nested(&ACTIVE_STATE, &ALL_FONT_ICONS).decl("color", active_icon.clone()),
        Scope::Base
            .nested(&ACTIVE_STATE, &ICON_SVG)
            .decl("filter", color_to_filter(&active_icon)),
        Scope::Base.nested(&ACTIVE_STATE, &LABEL).decl("color", active_text),
    ])
}

/// Open, collapsed and transition rules for `animation.type`.
///
/// `previous_side` is set when a breakpoint moves the menu to the other edge;
/// the old edge is then released with `auto`.
fn animation_rules(
    view: &ResolvedView<'_, '_>,
    side: Side,
    scope: Scope,
    previous_side: Option<Side>,
) -> Result<Vec<CssRule>> {
    let kind = AnimationKind::from_keyword(&view.css("animation.type")?);
    let timing = format!("{}ms {}", view.css("animation.duration")?, view.css("animation.easing")?);
    let edge = side.as_str();

    let mut menu = CssRule::new(MENU).with_comment("Animation");
    let mut collapsed = CssRule::new(MENU_COLLAPSED);
    if let Some(old) = previous_side.filter(|old| *old != side) {
        menu.push(old.as_str(), "auto");
        collapsed.push(old.as_str(), "auto");
    }

    let mut nav = scope.rule(&NAV);
    let collapsed_nav = CssRule::new(format!("{MENU_COLLAPSED} .fsm-nav"));

    let collapsed_nav = match kind {
        AnimationKind::Slide => {
            menu.push("transition", format!("{edge} {timing}"));
            collapsed.push(edge, format!("-{}", view.px("container.width")?));
            nav.push("transform", "translateX(0)");
            nav.push("opacity", "1");
            nav.push("visibility", "visible");
            collapsed_nav.decl("opacity", "1").decl("visibility", "visible")
        }
        AnimationKind::Fade => {
            menu.push("transition", "none");
            collapsed.push(edge, view.px("position.margin")?);
            nav.push("opacity", "1");
            nav.push("visibility", "visible");
            nav.push("transition", format!("opacity {timing}, visibility {timing}"));
            collapsed_nav.decl("opacity", "0").decl("visibility", "hidden")
        }
        AnimationKind::Scale => {
            menu.push("transition", "none");
            collapsed.push(edge, view.px("position.margin")?);
            nav.push("transform", "scale(1)");
            nav.push("opacity", "1");
            nav.push("visibility", "visible");
            nav.push(
                "transition",
                format!("transform {timing}, opacity {timing}, visibility {timing}"),
            );
            collapsed_nav
                .decl("transform", "scale(0.8)")
                .decl("opacity", "0")
                .decl("visibility", "hidden")
        }
    };

    Ok(vec![menu, collapsed, nav, collapsed_nav])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::default_items;
    use crate::stylesheet::StyleItem;

    fn compile_tree(tree: &SettingsTree) -> Stylesheet {
        compile(tree, &default_items("")).unwrap()
    }

    fn set(tree: &SettingsTree, path: &str, bp: Breakpoint, value: impl Into<crate::SettingValue>) -> SettingsTree {
        CascadeResolver::new().set(tree, path, bp, value).unwrap()
    }

    #[test]
    fn reset_comes_first() {
        let sheet = compile_tree(&SettingsTree::defaults());
        let StyleItem::Rule(first) = &sheet.items()[0] else {
            panic!("first item should be a rule");
        };
        assert!(first.matches_selector("#fsm-menu *"));
        assert_eq!(first.value_of("transition"), Some("none"));
    }

    #[test]
    fn base_positioning_and_container() {
        let sheet = compile_tree(&SettingsTree::defaults());
        let menu = sheet.rule(MENU).unwrap();
        assert_eq!(menu.value_of("right"), Some("0px"));
        assert_eq!(menu.value_of("top"), Some("50%"));
        assert_eq!(menu.value_of("z-index"), Some("9999"));

        let nav = sheet.rule("#fsm-menu .fsm-nav").unwrap();
        assert_eq!(nav.value_of("width"), Some("120px"));
        assert_eq!(nav.value_of("padding"), Some("14px 14px 14px 14px"));
        assert_eq!(nav.value_of("border-radius"), Some("16px 0px 0px 16px"));
        assert_eq!(nav.value_of("box-shadow"), Some("-8px 0px 32px 0px #00000026"));
        assert_eq!(nav.value_of("order"), Some("2"));
    }

    #[test]
    fn toggle_radius_follows_side() {
        let sheet = compile_tree(&SettingsTree::defaults());
        assert_eq!(
            sheet.rule("#fsm-menu .fsm-toggle").unwrap().value_of("border-radius"),
            Some("8px 0 0 8px")
        );

        let left = set(&SettingsTree::defaults(), "position.side", Breakpoint::Desktop, "left");
        let sheet = compile_tree(&left);
        let toggle = sheet.rule("#fsm-menu .fsm-toggle").unwrap();
        assert_eq!(toggle.value_of("border-radius"), Some("0 8px 8px 0"));
        assert_eq!(toggle.value_of("order"), Some("2"));
        assert_eq!(sheet.rule(MENU).unwrap().value_of("left"), Some("0px"));
    }

    #[test]
    fn disabled_toggle_is_hidden() {
        let tree = set(&SettingsTree::defaults(), "toggle.enabled", Breakpoint::Desktop, false);
        let sheet = compile_tree(&tree);
        let toggle = sheet.rule("#fsm-menu.fsm-menu .fsm-toggle").unwrap();
        assert_eq!(toggle.value_of("display"), Some("none"));
        assert!(sheet.rule("#fsm-menu .fsm-toggle:active").is_none());
    }

    #[test]
    fn item_layout_keywords() {
        let tree = set(&SettingsTree::defaults(), "icon.position", Breakpoint::Desktop, "left");
        let tree = set(&tree, "icon.align", Breakpoint::Desktop, "right");
        let sheet = compile_tree(&tree);
        let item = sheet.rule("#fsm-menu .fsm-item").unwrap();
        assert_eq!(item.value_of("flex-direction"), Some("row"));
        assert_eq!(item.value_of("align-items"), Some("flex-end"));

        let sheet = compile_tree(&SettingsTree::defaults());
        let item = sheet.rule("#fsm-menu .fsm-item").unwrap();
        assert_eq!(item.value_of("flex-direction"), Some("column"));
        assert_eq!(item.value_of("align-items"), Some("center"));
    }

    #[test]
    fn per_item_icon_sizes() {
        let mut items = default_items("");
        items[1].icon_size = Some(30);
        let sheet = compile(&SettingsTree::defaults(), &items).unwrap();

        let rule = sheet.rule("#fsm-menu.fsm-menu .fsm-item-2 .fsm-icon i").unwrap();
        assert_eq!(rule.value_of("font-size"), Some("30px"));
        assert!(sheet.rule("#fsm-menu.fsm-menu .fsm-item-1 .fsm-icon i").is_none());
    }

    #[test]
    fn edge_radius_modes() {
        let sheet = compile_tree(&SettingsTree::defaults());
        let first = sheet.rule("#fsm-menu .fsm-item:first-child").unwrap();
        assert_eq!(first.value_of("border-radius"), Some("16px 0px 8px 8px"));
        let last = sheet.rule("#fsm-menu .fsm-item:last-child").unwrap();
        assert_eq!(last.value_of("border-radius"), Some("8px 8px 0px 16px"));
        let only = sheet.rule("#fsm-menu .fsm-item:only-child").unwrap();
        assert_eq!(only.value_of("border-radius"), Some("16px 0px 0px 16px"));

        let none = set(&SettingsTree::defaults(), "item.first_last_radius", Breakpoint::Desktop, "none");
        let sheet = compile_tree(&none);
        assert_eq!(
            sheet.rule("#fsm-menu .fsm-item:first-child").unwrap().value_of("border-radius"),
            Some("0")
        );

        let item = set(&SettingsTree::defaults(), "item.first_last_radius", Breakpoint::Desktop, "item");
        assert!(compile_tree(&item).rule("#fsm-menu .fsm-item:first-child").is_none());

        let unknown = set(&SettingsTree::defaults(), "item.first_last_radius", Breakpoint::Desktop, "pill");
        assert_eq!(
            compile_tree(&unknown).rule("#fsm-menu .fsm-item:only-child").unwrap().value_of("border-radius"),
            Some("16px 0px 0px 16px")
        );
    }

    #[test]
    fn hover_never_shadows_active() {
        let sheet = compile_tree(&SettingsTree::defaults());
        let hover = sheet
            .rule("#fsm-menu .fsm-item:hover:not(:active):not(.active)")
            .unwrap();
        assert_eq!(hover.value_of("background"), Some("#ffffff1a"));
        assert!(sheet.rule("#fsm-menu .fsm-item:hover").is_none());

        let active = sheet.rule("#fsm-menu .fsm-item.active").unwrap();
        assert_eq!(active.value_of("background"), Some("#ffffff26"));
    }

    #[test]
    fn svg_icons_use_filters() {
        let tree = set(&SettingsTree::defaults(), "icon.color", Breakpoint::Desktop, "rgba(26,26,24,1)");
        let sheet = compile_tree(&tree);
        assert_eq!(
            sheet.rule("#fsm-menu .fsm-icon-svg").unwrap().value_of("filter"),
            Some("brightness(0) saturate(100%) invert(10%) sepia(100%) saturate(80%) hue-rotate(30deg) brightness(0.5)")
        );
        assert_eq!(
            sheet
                .rule("#fsm-menu .fsm-item:active .fsm-icon-svg")
                .unwrap()
                .value_of("filter"),
            Some(crate::filter::WHITE_FILTER)
        );
    }

    #[test]
    fn animation_types() {
        let sheet = compile_tree(&SettingsTree::defaults());
        let collapsed = sheet.rule(MENU_COLLAPSED).unwrap();
        assert_eq!(collapsed.value_of("right"), Some("-120px"));
        let menu = sheet.rules().filter(|r| r.matches_selector(MENU)).last().unwrap();
        assert_eq!(menu.value_of("transition"), Some("right 300ms ease-out"));

        let fade = set(&SettingsTree::defaults(), "animation.type", Breakpoint::Desktop, "fade");
        let sheet = compile_tree(&fade);
        let nav = sheet.rule("#fsm-menu.fsm-menu.fsm-collapsed .fsm-nav").unwrap();
        assert_eq!(nav.value_of("opacity"), Some("0"));

        let scale = set(&SettingsTree::defaults(), "animation.type", Breakpoint::Desktop, "scale");
        let sheet = compile_tree(&scale);
        let nav = sheet.rule("#fsm-menu.fsm-menu.fsm-collapsed .fsm-nav").unwrap();
        assert_eq!(nav.value_of("transform"), Some("scale(0.8)"));

        let unknown = set(&SettingsTree::defaults(), "animation.type", Breakpoint::Desktop, "spin");
        assert_eq!(compile_tree(&unknown).rule(MENU_COLLAPSED).unwrap().value_of("right"), Some("-120px"));
    }

    #[test]
    fn hide_on_mobile_query() {
        let sheet = compile_tree(&SettingsTree::defaults());
        assert_eq!(sheet.media_blocks().count(), 0);

        let tree = set(&SettingsTree::defaults(), "responsive.hide_on_mobile", Breakpoint::Desktop, true);
        let tree = set(&tree, "responsive.breakpoint", Breakpoint::Desktop, 600);
        let sheet = compile_tree(&tree);
        let block = sheet.media("(max-width: 600px)").unwrap();
        assert_eq!(block.values_of("display").collect::<Vec<_>>(), vec!["none"]);
    }

    #[test]
    fn theme_font_variable() {
        let sheet = compile_tree(&SettingsTree::defaults());
        assert_eq!(sheet.rule(MENU).unwrap().value_of("font-family"), Some(THEME_FONT));

        let tree = set(&SettingsTree::defaults(), "typography.font_family", Breakpoint::Desktop, "Inter, sans-serif");
        let sheet = compile_tree(&tree);
        assert_eq!(sheet.rule("#fsm-menu .fsm-label").unwrap().value_of("font-family"), Some("Inter, sans-serif"));
    }

    #[test]
    fn compile_is_deterministic() {
        let tree = set(&SettingsTree::defaults(), "icon.size", Breakpoint::Mobile, 18);
        let a = compile_tree(&tree).to_css();
        let b = compile_tree(&tree).to_css();
        assert_eq!(a, b);
    }
}
