//! Structured stylesheet objects and their text rendering.
//!
//! The compiler builds [`CssRule`]s and [`MediaBlock`]s and never formats
//! strings itself; [`Stylesheet`]'s `Display` implementation is the single
//! place where CSS text is produced. Every declaration is emitted with
//! `!important` so the widget wins against host theme styles.

use std::fmt;

// ============================================================================
// CssRule
// ============================================================================

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// A selector list with its declarations, in source order.
///
/// # Example
///
/// ```
/// use floatmenu_styler::CssRule;
///
/// let rule = CssRule::new("#fsm-menu .fsm-nav")
///     .decl("width", "120px")
///     .decl("gap", "0px");
///
/// assert_eq!(rule.value_of("width"), Some("120px"));
/// assert_eq!(
///     rule.to_string(),
///     "#fsm-menu .fsm-nav {\n    width: 120px !important;\n    gap: 0px !important;\n}\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CssRule {
    pub comment: Option<String>,
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

impl CssRule {
    /// Creates a rule with one selector.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            comment: None,
            selectors: vec![selector.into()],
            declarations: Vec::new(),
        }
    }

    /// Creates a rule matching any of `selectors`.
    pub fn with_selectors<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            comment: None,
            selectors: selectors.into_iter().map(Into::into).collect(),
            declarations: Vec::new(),
        }
    }

    /// Adds another selector to the list.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Appends a declaration.
    pub fn decl(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(property, value);
        self
    }

    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.push(Declaration {
            property: property.into(),
            value: value.into(),
        });
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// The value of the last declaration of `property`, if any.
    pub fn value_of(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    pub fn matches_selector(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        if let Some(comment) = &self.comment {
            writeln!(f, "{indent}/* {comment} */")?;
        }
        let separator = format!(",\n{indent}");
        writeln!(f, "{indent}{} {{", self.selectors.join(&separator))?;
        for decl in &self.declarations {
            writeln!(f, "{indent}    {}: {} !important;", decl.property, decl.value)?;
        }
        writeln!(f, "{indent}}}")
    }
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, "")
    }
}

// ============================================================================
// MediaBlock
// ============================================================================

/// An `@media` block wrapping nested rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlock {
    pub comment: Option<String>,
    pub query: String,
    pub rules: Vec<CssRule>,
}

impl MediaBlock {
    /// Creates an empty block for `query`, e.g. `(max-width: 768px)`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            comment: None,
            query: query.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Adds `rule` unless it has no declarations.
    pub fn push(&mut self, rule: CssRule) {
        if !rule.is_empty() {
            self.rules.push(rule);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The first rule in this block listing `selector`.
    pub fn rule(&self, selector: &str) -> Option<&CssRule> {
        self.rules.iter().find(|rule| rule.matches_selector(selector))
    }

    /// All declarations of `property` in this block, in order.
    pub fn values_of<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rules.iter().flat_map(move |rule| {
            rule.declarations
                .iter()
                .filter(move |d| d.property == property)
                .map(|d| d.value.as_str())
        })
    }
}

impl fmt::Display for MediaBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(comment) = &self.comment {
            writeln!(f, "/* {comment} */")?;
        }
        writeln!(f, "@media {} {{", self.query)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            rule.write_indented(f, "    ")?;
        }
        writeln!(f, "}}")
    }
}

// ============================================================================
// Stylesheet
// ============================================================================

/// A top-level stylesheet entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleItem {
    Rule(CssRule),
    Media(MediaBlock),
}

/// An ordered list of rules and media blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    items: Vec<StyleItem>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rule` unless it has no declarations.
    pub fn push_rule(&mut self, rule: CssRule) {
        if !rule.is_empty() {
            self.items.push(StyleItem::Rule(rule));
        }
    }

    /// Appends `block` unless it has no rules.
    pub fn push_media(&mut self, block: MediaBlock) {
        if !block.is_empty() {
            self.items.push(StyleItem::Media(block));
        }
    }

    pub fn extend_rules(&mut self, rules: impl IntoIterator<Item = CssRule>) {
        for rule in rules {
            self.push_rule(rule);
        }
    }

    pub fn items(&self) -> &[StyleItem] {
        &self.items
    }

    /// Top-level rules, skipping media blocks.
    pub fn rules(&self) -> impl Iterator<Item = &CssRule> {
        self.items.iter().filter_map(|item| match item {
            StyleItem::Rule(rule) => Some(rule),
            StyleItem::Media(_) => None,
        })
    }

    pub fn media_blocks(&self) -> impl Iterator<Item = &MediaBlock> {
        self.items.iter().filter_map(|item| match item {
            StyleItem::Media(block) => Some(block),
            StyleItem::Rule(_) => None,
        })
    }

    /// The first media block whose query is exactly `query`.
    pub fn media(&self, query: &str) -> Option<&MediaBlock> {
        self.media_blocks().find(|block| block.query == query)
    }

    /// The first top-level rule listing `selector`.
    pub fn rule(&self, selector: &str) -> Option<&CssRule> {
        self.rules().find(|rule| rule.matches_selector(selector))
    }

    /// Renders the stylesheet as CSS text.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match item {
                StyleItem::Rule(rule) => write!(f, "{rule}")?,
                StyleItem::Media(block) => write!(f, "{block}")?,
            }
        }
        Ok(())
    }
}
