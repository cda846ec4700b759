//! floatmenu-styler: settings cascade, stylesheet compiler and revision store
//! for a floating side menu widget.
//!
//! Settings live in a [`SettingsTree`]: a fully populated desktop layer plus
//! sparse tablet and mobile override layers. [`CascadeResolver`] reads and
//! writes values at a breakpoint, [`StyleCompiler`] turns a tree and its
//! [`MenuItem`]s into a [`Stylesheet`], and [`RevisionStore`] keeps the
//! published and draft configurations with a bounded history.
//!
//! # Example
//!
//! ```
//! use floatmenu_styler::{compile, default_items, Breakpoint, CascadeResolver, SettingsTree};
//!
//! let resolver = CascadeResolver::new();
//! let tree = resolver.set(&SettingsTree::defaults(), "icon.size", Breakpoint::Tablet, 18).unwrap();
//!
//! // Mobile inherits the tablet override.
//! assert_eq!(resolver.get(&tree, "icon.size", Breakpoint::Mobile).unwrap().as_number(), 18.0);
//!
//! let css = compile(&tree, &default_items("")).unwrap().to_css();
//! assert!(css.contains("@media (max-width: 1024px)"));
//! ```
//!
//! # Publishing
//!
//! The editor works on an [`EditorSession`] and hands its state to a
//! [`RevisionStore`] backed by any [`OptionStore`]:
//!
//! ```
//! use floatmenu_styler::{EditorSession, MemoryStore, RevisionStore, StoreConfig};
//!
//! let mut store = RevisionStore::open(MemoryStore::new(), StoreConfig::default()).unwrap();
//! let mut session = EditorSession::from_snapshot(store.editable());
//! session.set("container.background_color", "#222222").unwrap();
//!
//! let draft = session.save_draft(&mut store).unwrap().id.clone();
//! store.rollback(&draft, false).unwrap();
//! assert!(store.current_live().unwrap().label.starts_with("Rollback from"));
//! ```

mod cascade;
mod compiler;
mod error;
mod filter;
mod items;
mod markup;
mod revision;
mod session;
mod settings;
mod store;
mod transfer;

pub mod stylesheet;

#[cfg(feature = "tsify")]
mod wasm;

pub use cascade::{CascadeResolver, ResolvedView};
pub use compiler::{
    AnimationKind, EdgeRadius, IconPosition, ItemAlign, Keyword, MENU, MENU_COLLAPSED, Side, StyleCompiler,
    ToggleAlign, compile,
};
pub use error::{Error, Result};
pub use filter::{BLACK_FILTER, WHITE_FILTER, color_to_filter, parse_rgb, rgb_to_filter};
pub use items::{IconType, LinkTarget, MenuItem, MenuItems, default_items};
pub use markup::{PageKind, render_menu, should_display};
pub use revision::{
    DEFAULT_MAX_HISTORY, HistoryFilter, PublicationState, PublishStatus, Revision, RevisionKind, RevisionStore,
    Snapshot, StoreConfig, keys,
};
pub use session::{EditorSession, Transferable};
pub use settings::{
    Breakpoint, LeafKind, SettingGroup, SettingNode, SettingPath, SettingValue, SettingsTree, defaults,
    format_number,
};
pub use store::{JsonFileStore, MemoryStore, OptionStore};
pub use stylesheet::{CssRule, Declaration, MediaBlock, StyleItem, Stylesheet};
pub use transfer::{EXPORT_VERSION, ExportBundle, ImportOutcome, ImportReport, import};

#[cfg(feature = "tsify")]
pub use wasm::{PreviewSession, color_to_filter_js};
