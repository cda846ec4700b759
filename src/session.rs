//! Editor session: the working copy behind the live preview.

use crate::cascade::CascadeResolver;
use crate::compiler::StyleCompiler;
use crate::error::Result;
use crate::items::{MenuItem, MenuItems};
use crate::markup::render_menu;
use crate::revision::{Revision, RevisionStore, Snapshot};
use crate::settings::{Breakpoint, SettingValue, SettingsTree};
use crate::store::OptionStore;
use crate::stylesheet::Stylesheet;
use crate::transfer::{ExportBundle, ImportReport, import};

// ============================================================================
// Transferable Trait
// ============================================================================

/// Types whose configuration can be moved through an [`ExportBundle`].
pub trait Transferable {
    /// Replaces this instance's settings and items with the bundle's.
    fn apply_bundle(&mut self, bundle: &ExportBundle);

    /// Exports the current settings and items.
    fn export_bundle(&self) -> ExportBundle;
}

// ============================================================================
// EditorSession
// ============================================================================

/// Settings, items and the breakpoint being edited.
///
/// Edits go through the cascade at the current breakpoint. Every change that
/// alters the settings or items bumps [`version`](Self::version); the
/// compiled preview is cached against that version and only rebuilt when it
/// is stale.
///
/// # Example
///
/// ```
/// use floatmenu_styler::{default_items, Breakpoint, EditorSession, SettingsTree};
///
/// let mut session = EditorSession::new(SettingsTree::defaults(), default_items(""));
/// session.set_breakpoint(Breakpoint::Tablet);
/// session.set("container.width", 100).unwrap();
///
/// assert!(session.has_override("container.width").unwrap());
/// assert!(session.preview_css().unwrap().contains("width: 100px !important;"));
/// ```
#[derive(Debug, Clone)]
pub struct EditorSession {
    settings: SettingsTree,
    items: MenuItems,
    breakpoint: Breakpoint,
    resolver: CascadeResolver<'static>,
    version: u64,
    preview: Option<(u64, Stylesheet)>,
}

impl EditorSession {
    pub fn new(settings: SettingsTree, items: Vec<MenuItem>) -> Self {
        Self {
            settings,
            items: MenuItems::from_items(items),
            breakpoint: Breakpoint::Desktop,
            resolver: CascadeResolver::new(),
            version: 0,
            preview: None,
        }
    }

    /// Starts editing what the revision store considers editable.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(snapshot.settings.clone(), snapshot.items.clone())
    }

    pub fn settings(&self) -> &SettingsTree {
        &self.settings
    }

    pub fn items(&self) -> &[MenuItem] {
        self.items.as_slice()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Switches the breakpoint that reads and writes address.
    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
    }

    /// Increments on every effective change.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
        self.preview = None;
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// The effective value at the current breakpoint.
    pub fn get(&self, path: &str) -> Result<&SettingValue> {
        self.resolver.get(&self.settings, path, self.breakpoint)
    }

    /// Writes at the current breakpoint. Returns true if the tree changed.
    pub fn set(&mut self, path: &str, value: impl Into<SettingValue>) -> Result<bool> {
        let next = self.resolver.set(&self.settings, path, self.breakpoint, value)?;
        Ok(self.replace_settings(next))
    }

    pub fn has_override(&self, path: &str) -> Result<bool> {
        self.resolver.has_override(&self.settings, path, self.breakpoint)
    }

    /// Where the current breakpoint inherits `path` from, if it does.
    pub fn inheritance_source(&self, path: &str) -> Result<Option<Breakpoint>> {
        self.resolver.inheritance_source(&self.settings, path, self.breakpoint)
    }

    /// Drops the current breakpoint's override. Returns true if one existed.
    pub fn remove_override(&mut self, path: &str) -> Result<bool> {
        let next = self.resolver.remove_override(&self.settings, path, self.breakpoint)?;
        Ok(self.replace_settings(next))
    }

    fn replace_settings(&mut self, next: SettingsTree) -> bool {
        if next == self.settings {
            return false;
        }
        self.settings = next;
        self.touch();
        true
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    /// Appends `item` with a freshly allocated id and returns the id.
    pub fn add_item(&mut self, item: MenuItem) -> u32 {
        let id = self.items.add(item);
        self.touch();
        id
    }

    pub fn remove_item(&mut self, id: u32) -> Option<MenuItem> {
        let removed = self.items.remove(id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Moves the item at index `from` to index `to`. Returns false if the
    /// list did not change.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let moved = self.items.move_item(from, to);
        if moved {
            self.touch();
        }
        moved
    }

    /// Edits item `id` in place. Returns false if there is no such item.
    pub fn update_item(&mut self, id: u32, edit: impl FnOnce(&mut MenuItem)) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        edit(item);
        self.touch();
        true
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// The compiled stylesheet, rebuilt only after a change.
    pub fn preview(&mut self) -> Result<&Stylesheet> {
        let fresh = match self.preview.take() {
            Some((version, sheet)) if version == self.version => (version, sheet),
            _ => {
                let sheet = StyleCompiler::with_resolver(self.resolver).compile(&self.settings, self.items.as_slice())?;
                tracing::debug!(version = self.version, "preview recompiled");
                (self.version, sheet)
            }
        };
        Ok(&self.preview.insert(fresh).1)
    }

    pub fn preview_css(&mut self) -> Result<String> {
        Ok(self.preview()?.to_css())
    }

    /// True if [`preview`](Self::preview) would return the cached sheet.
    pub fn is_preview_fresh(&self) -> bool {
        matches!(&self.preview, Some((version, _)) if *version == self.version)
    }

    pub fn markup(&self) -> Result<String> {
        render_menu(&self.settings, self.items.as_slice())
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Imports an exported bundle into the session.
    ///
    /// Missing halves keep the session's current values. The breakpoint is
    /// reset to desktop.
    pub fn import_json(&mut self, json: &str, site_url: &str) -> Result<ImportReport> {
        let outcome = import(json, &self.settings, self.items.as_slice(), site_url)?;
        self.settings = outcome.settings;
        self.items.replace(outcome.items);
        self.breakpoint = Breakpoint::Desktop;
        self.touch();
        Ok(outcome.report)
    }

    pub fn save_draft<'a, S: OptionStore>(&self, store: &'a mut RevisionStore<S>) -> Result<&'a Revision> {
        store.save_draft(&self.settings, self.items.as_slice())
    }

    pub fn publish<'a, S: OptionStore>(
        &self,
        store: &'a mut RevisionStore<S>,
        label: Option<&str>,
    ) -> Result<&'a Revision> {
        store.publish(&self.settings, self.items.as_slice(), label)
    }
}

impl Transferable for EditorSession {
    fn apply_bundle(&mut self, bundle: &ExportBundle) {
        self.settings = bundle.settings.clone();
        self.items.replace(bundle.items.clone());
        self.breakpoint = Breakpoint::Desktop;
        self.touch();
    }

    fn export_bundle(&self) -> ExportBundle {
        ExportBundle::new(self.settings.clone(), self.items.as_slice().to_vec())
    }
}
