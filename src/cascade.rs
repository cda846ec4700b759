//! Breakpoint cascade: value resolution and copy-on-write mutation.
//!
//! A [`SettingsTree`] stores a complete desktop layer and sparse tablet and
//! mobile layers. Reading a value at a breakpoint walks
//! `mobile → tablet → desktop` and takes the first leaf present at exactly
//! that path. Writing never touches a wider layer than the one requested.

use crate::error::{Error, Result};
use crate::settings::{Breakpoint, LeafKind, SettingGroup, SettingPath, SettingValue, SettingsTree};
use crate::settings::defaults;

// ============================================================================
// CascadeResolver
// ============================================================================

/// Resolves and edits values across the breakpoint layers of a tree.
///
/// Every path must address a leaf of the schema; anything else fails with
/// [`Error::InvalidPath`].
///
/// # Example
///
/// ```
/// use floatmenu_styler::{Breakpoint, CascadeResolver, SettingsTree};
///
/// let resolver = CascadeResolver::new();
/// let tree = SettingsTree::defaults();
///
/// let tree = resolver.set(&tree, "container.width", Breakpoint::Tablet, 100).unwrap();
/// assert_eq!(resolver.get(&tree, "container.width", Breakpoint::Mobile).unwrap().as_number(), 100.0);
/// assert_eq!(resolver.get(&tree, "container.width", Breakpoint::Desktop).unwrap().as_number(), 120.0);
///
/// let tree = resolver.remove_override(&tree, "container.width", Breakpoint::Tablet).unwrap();
/// assert!(tree.tablet().is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CascadeResolver<'s> {
    schema: &'s SettingGroup,
}

impl Default for CascadeResolver<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl CascadeResolver<'static> {
    /// A resolver over the built-in defaults schema.
    pub fn new() -> Self {
        Self {
            schema: defaults::schema(),
        }
    }
}

impl<'s> CascadeResolver<'s> {
    /// A resolver validating paths against a custom schema.
    pub fn with_schema(schema: &'s SettingGroup) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s SettingGroup {
        self.schema
    }

    /// Parses `path` and checks that it names a schema leaf.
    pub fn validate(&self, path: &str) -> Result<(SettingPath, LeafKind)> {
        let parsed = SettingPath::parse(path)?;
        let kind = self
            .schema
            .leaf(parsed.segments())
            .map(SettingValue::kind)
            .ok_or_else(|| Error::invalid_path(path, "not a leaf of the settings schema"))?;
        Ok((parsed, kind))
    }

    /// Resolves the effective value of `path` at `breakpoint`.
    pub fn get<'t>(&self, tree: &'t SettingsTree, path: &str, breakpoint: Breakpoint) -> Result<&'t SettingValue> {
        let (parsed, _) = self.validate(path)?;
        self.lookup(tree, &parsed, breakpoint)
    }

    fn lookup<'t>(&self, tree: &'t SettingsTree, path: &SettingPath, breakpoint: Breakpoint) -> Result<&'t SettingValue> {
        let mut layer = Some(breakpoint);
        while let Some(bp) = layer {
            if let Some(value) = tree.layer(bp).leaf(path.segments()) {
                return Ok(value);
            }
            layer = bp.parent();
        }
        Err(Error::MissingPath {
            path: path.to_string(),
        })
    }

    /// Returns a new tree with `value` written at `breakpoint`.
    ///
    /// The value is coerced to the schema's leaf kind first.
    pub fn set(
        &self,
        tree: &SettingsTree,
        path: &str,
        breakpoint: Breakpoint,
        value: impl Into<SettingValue>,
    ) -> Result<SettingsTree> {
        let (parsed, kind) = self.validate(path)?;
        let value = value.into().coerce_to(kind, path)?;

        let mut next = tree.clone();
        next.layer_mut(breakpoint).set_leaf(parsed.segments(), value);
        tracing::debug!(path, %breakpoint, "setting written");
        Ok(next)
    }

    /// True if `breakpoint` has its own value at `path`. Always false for desktop.
    pub fn has_override(&self, tree: &SettingsTree, path: &str, breakpoint: Breakpoint) -> Result<bool> {
        let (parsed, _) = self.validate(path)?;
        Ok(breakpoint != Breakpoint::Desktop && tree.layer(breakpoint).leaf(parsed.segments()).is_some())
    }

    /// Returns a new tree without the override at `path`, pruning empty groups.
    ///
    /// Desktop values cannot be removed; the tree is returned unchanged.
    pub fn remove_override(&self, tree: &SettingsTree, path: &str, breakpoint: Breakpoint) -> Result<SettingsTree> {
        let (parsed, _) = self.validate(path)?;
        let mut next = tree.clone();
        if breakpoint != Breakpoint::Desktop && next.layer_mut(breakpoint).remove_leaf(parsed.segments()) {
            tracing::debug!(path, %breakpoint, "override removed");
        }
        Ok(next)
    }

    /// Where the effective value at `breakpoint` comes from.
    ///
    /// `None` means the breakpoint has its own value (desktop always does);
    /// otherwise the nearest wider breakpoint holding the value.
    pub fn inheritance_source(
        &self,
        tree: &SettingsTree,
        path: &str,
        breakpoint: Breakpoint,
    ) -> Result<Option<Breakpoint>> {
        let (parsed, _) = self.validate(path)?;
        if breakpoint == Breakpoint::Desktop || tree.layer(breakpoint).leaf(parsed.segments()).is_some() {
            return Ok(None);
        }

        let mut layer = breakpoint.parent();
        while let Some(bp) = layer {
            if bp == Breakpoint::Desktop || tree.layer(bp).leaf(parsed.segments()).is_some() {
                return Ok(Some(bp));
            }
            layer = bp.parent();
        }
        Ok(Some(Breakpoint::Desktop))
    }

    /// A read-only view of `tree` resolved at `breakpoint`.
    pub fn view<'t>(&self, tree: &'t SettingsTree, breakpoint: Breakpoint) -> ResolvedView<'t, 's> {
        ResolvedView {
            resolver: *self,
            tree,
            breakpoint,
        }
    }
}

// ============================================================================
// ResolvedView
// ============================================================================

/// Typed accessors over a tree at a fixed breakpoint.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedView<'t, 's> {
    resolver: CascadeResolver<'s>,
    tree: &'t SettingsTree,
    breakpoint: Breakpoint,
}

impl<'t> ResolvedView<'t, '_> {
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn value(&self, path: &str) -> Result<&'t SettingValue> {
        self.resolver.get(self.tree, path, self.breakpoint)
    }

    pub fn number(&self, path: &str) -> Result<f64> {
        Ok(self.value(path)?.as_number())
    }

    pub fn flag(&self, path: &str) -> Result<bool> {
        Ok(self.value(path)?.as_flag())
    }

    /// The value formatted for CSS.
    pub fn css(&self, path: &str) -> Result<String> {
        Ok(self.value(path)?.to_string())
    }

    /// The value as a CSS pixel length (`12px`).
    pub fn px(&self, path: &str) -> Result<String> {
        Ok(format!("{}px", self.value(path)?))
    }
}

// ============================================================================
// Tests
// ============================================================================
