//! Draft/publish state machine with a bounded history log.
//!
//! [`RevisionStore`] owns the published snapshot, an optional draft snapshot
//! and a newest-first list of immutable [`Revision`]s. Every save and publish
//! appends an entry; entries are only ever removed by eviction past
//! [`StoreConfig::max_history`], [`RevisionStore::delete_entry`] or
//! [`RevisionStore::clear_all`].
//!
//! Mutations compute the complete next state, write every affected option
//! key, and only then replace the in-memory state. A failing write therefore
//! leaves the store exactly as it was, although keys written before the
//! failure may already hold the new value. Concurrent editors sharing one
//! option store race with last-write-wins semantics.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::items::{MenuItem, default_items};
use crate::settings::SettingsTree;
use crate::store::OptionStore;

/// Option names used in the host store.
pub mod keys {
    pub const SETTINGS: &str = "fsm_settings";
    pub const ITEMS: &str = "fsm_items";
    pub const SETTINGS_DRAFT: &str = "fsm_settings_draft";
    pub const ITEMS_DRAFT: &str = "fsm_items_draft";
    pub const HAS_DRAFT: &str = "fsm_has_draft";
    pub const STATUS: &str = "fsm_status";
    pub const HISTORY: &str = "fsm_history";
    pub const VERSION_TIMESTAMP: &str = "fsm_version_timestamp";
    pub const DRAFT_TIMESTAMP: &str = "fsm_draft_timestamp";
}

pub const DEFAULT_MAX_HISTORY: usize = 20;

const DRAFT_LABEL: &str = "Draft saved";
const PUBLISH_LABEL: &str = "Published";

// ============================================================================
// Types
// ============================================================================

/// Whether a history entry came from a draft save or a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "tsify",
    derive(tsify_next::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum RevisionKind {
    Draft,
    Publish,
}

impl RevisionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
        }
    }
}

/// Editor-facing status of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PublishStatus {
    Draft,
    #[default]
    Published,
}

impl PublishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// An immutable history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RevisionKind,
    /// Epoch seconds.
    pub timestamp: i64,
    pub label: String,
    pub settings: SettingsTree,
    pub items: Vec<MenuItem>,
    #[serde(default)]
    pub items_count: usize,
}

/// Which history entries to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum HistoryFilter {
    #[default]
    All,
    Draft,
    Publish,
}

impl HistoryFilter {
    pub fn matches(self, revision: &Revision) -> bool {
        match self {
            Self::All => true,
            Self::Draft => revision.kind == RevisionKind::Draft,
            Self::Publish => revision.kind == RevisionKind::Publish,
        }
    }
}

/// Settings and items saved together.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    pub settings: SettingsTree,
    pub items: Vec<MenuItem>,
}

/// Published snapshot, optional draft and their bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationState {
    pub status: PublishStatus,
    pub has_draft: bool,
    pub published: Snapshot,
    /// Present only while `has_draft` is true.
    pub draft: Option<Snapshot>,
    /// Epoch seconds of the last publish, used for cache busting.
    pub version_timestamp: i64,
    pub draft_timestamp: Option<i64>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Revision store settings.
///
/// # Example
///
/// ```
/// use floatmenu_styler::StoreConfig;
///
/// let config: StoreConfig = serde_json::from_str(r#"{ "max_history": 5 }"#).unwrap();
/// assert_eq!(config.max_history, 5);
/// assert_eq!(config.site_url, "");
///
/// let config = StoreConfig::default().with_site_url("https://example.com");
/// assert_eq!(config.max_history, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// History entries kept; older ones are evicted.
    pub max_history: usize,
    /// Site address, used for the default Home item.
    pub site_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            site_url: String::new(),
        }
    }
}

impl StoreConfig {
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }
}

// ============================================================================
// RevisionStore
// ============================================================================

enum Write {
    Set(&'static str, Value),
    Delete(&'static str),
}

/// The publication state machine over an [`OptionStore`].
///
/// # Example
///
/// ```
/// use floatmenu_styler::{MemoryStore, PublishStatus, RevisionStore, StoreConfig};
///
/// let mut store = RevisionStore::open(MemoryStore::new(), StoreConfig::default()).unwrap();
/// let editable = store.editable().clone();
///
/// store.save_draft(&editable.settings, &editable.items).unwrap();
/// assert_eq!(store.state().status, PublishStatus::Draft);
///
/// store.publish(&editable.settings, &editable.items, None).unwrap();
/// assert!(!store.state().has_draft);
/// assert_eq!(store.history().len(), 2);
/// assert_eq!(store.current_live().unwrap().label, "Published");
/// ```
pub struct RevisionStore<S: OptionStore> {
    store: S,
    config: StoreConfig,
    state: PublicationState,
    history: Vec<Revision>,
    clock: fn() -> i64,
}

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

impl<S: OptionStore> RevisionStore<S> {
    /// Loads the state from `store`.
    ///
    /// Missing published settings or items are initialised with the defaults
    /// and written back, as on first activation. A `max_history` of zero is
    /// raised to one so the entry just written is always retrievable.
    pub fn open(mut store: S, mut config: StoreConfig) -> Result<Self> {
        if config.max_history == 0 {
            tracing::warn!("max_history of 0 raised to 1");
            config.max_history = 1;
        }
        let settings = match store.get(keys::SETTINGS)? {
            Some(value) => SettingsTree::from_json_value(&value)?,
            None => {
                let defaults = SettingsTree::defaults();
                store.set(keys::SETTINGS, defaults.to_json_value())?;
                tracing::info!("initialised default settings");
                defaults
            }
        };
        let items = match store.get(keys::ITEMS)? {
            Some(value) => serde_json::from_value(value)?,
            None => {
                let items = default_items(&config.site_url);
                store.set(keys::ITEMS, serde_json::to_value(&items)?)?;
                items
            }
        };

        let has_draft = store.get(keys::HAS_DRAFT)?.and_then(|v| v.as_bool()).unwrap_or(false);
        let status = match store.get(keys::STATUS)? {
            Some(value) => serde_json::from_value(value)?,
            None => PublishStatus::Published,
        };

        let draft = if has_draft {
            let draft_settings = store.get(keys::SETTINGS_DRAFT)?;
            let draft_items = store.get(keys::ITEMS_DRAFT)?;
            match (draft_settings, draft_items) {
                (Some(settings), Some(items)) => Some(Snapshot {
                    settings: SettingsTree::from_json_value(&settings)?,
                    items: serde_json::from_value(items)?,
                }),
                _ => {
                    tracing::warn!("draft flag set without draft snapshot");
                    None
                }
            }
        } else {
            None
        };

        let history: Vec<Revision> = match store.get(keys::HISTORY)? {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        let timestamp = |key| -> Result<Option<i64>> { Ok(store.get(key)?.and_then(|v| v.as_i64())) };
        let version_timestamp = timestamp(keys::VERSION_TIMESTAMP)?.unwrap_or(0);
        let draft_timestamp = timestamp(keys::DRAFT_TIMESTAMP)?;

        let state = PublicationState {
            status,
            has_draft: draft.is_some(),
            published: Snapshot { settings, items },
            draft,
            version_timestamp,
            draft_timestamp,
        };
        tracing::debug!(entries = history.len(), status = state.status.as_str(), "revision store opened");

        Ok(Self {
            store,
            config,
            state,
            history,
            clock: system_clock,
        })
    }

    /// Replaces the clock used for timestamps.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn state(&self) -> &PublicationState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// History, newest first.
    pub fn history(&self) -> &[Revision] {
        &self.history
    }

    pub fn history_filtered(&self, filter: HistoryFilter) -> impl Iterator<Item = &Revision> {
        self.history.iter().filter(move |r| filter.matches(r))
    }

    pub fn entry(&self, id: &str) -> Option<&Revision> {
        self.history.iter().find(|r| r.id == id)
    }

    /// The most recent publish entry still in the history.
    pub fn current_live(&self) -> Option<&Revision> {
        self.history.iter().find(|r| r.kind == RevisionKind::Publish)
    }

    pub fn is_current_live(&self, id: &str) -> bool {
        self.current_live().is_some_and(|r| r.id == id)
    }

    /// What the editor should load: the draft if there is one, else the
    /// published snapshot.
    pub fn editable(&self) -> &Snapshot {
        self.state.draft.as_ref().unwrap_or(&self.state.published)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Stores a draft without touching the published snapshot.
    pub fn save_draft(&mut self, settings: &SettingsTree, items: &[MenuItem]) -> Result<&Revision> {
        let now = (self.clock)();
        let mut state = self.state.clone();
        state.draft = Some(Snapshot {
            settings: settings.clone(),
            items: items.to_vec(),
        });
        state.has_draft = true;
        state.status = PublishStatus::Draft;
        state.draft_timestamp = Some(now);

        let entry = self.new_entry(RevisionKind::Draft, now, DRAFT_LABEL, settings, items);
        let history = self.with_entry(entry);

        let writes = vec![
            Write::Set(keys::SETTINGS_DRAFT, settings.to_json_value()),
            Write::Set(keys::ITEMS_DRAFT, serde_json::to_value(items)?),
            Write::Set(keys::HAS_DRAFT, Value::Bool(true)),
            Write::Set(keys::STATUS, Value::from(PublishStatus::Draft.as_str())),
            Write::Set(keys::DRAFT_TIMESTAMP, Value::from(now)),
            Write::Set(keys::HISTORY, serde_json::to_value(&history)?),
        ];
        self.commit(writes, state, history)?;

        tracing::info!(items = items.len(), "draft saved");
        self.newest()
    }

    /// Publishes `settings` and `items`, discarding any draft.
    ///
    /// An empty or missing `label` becomes `Published`.
    pub fn publish(&mut self, settings: &SettingsTree, items: &[MenuItem], label: Option<&str>) -> Result<&Revision> {
        let now = (self.clock)();
        let label = label.filter(|l| !l.is_empty()).unwrap_or(PUBLISH_LABEL);
        let state = PublicationState {
            status: PublishStatus::Published,
            has_draft: false,
            published: Snapshot {
                settings: settings.clone(),
                items: items.to_vec(),
            },
            draft: None,
            version_timestamp: now,
            draft_timestamp: self.state.draft_timestamp,
        };

        let entry = self.new_entry(RevisionKind::Publish, now, label, settings, items);
        let history = self.with_entry(entry);

        let writes = vec![
            Write::Set(keys::SETTINGS, settings.to_json_value()),
            Write::Set(keys::ITEMS, serde_json::to_value(items)?),
            Write::Set(keys::HAS_DRAFT, Value::Bool(false)),
            Write::Set(keys::STATUS, Value::from(PublishStatus::Published.as_str())),
            Write::Set(keys::VERSION_TIMESTAMP, Value::from(now)),
            Write::Delete(keys::SETTINGS_DRAFT),
            Write::Delete(keys::ITEMS_DRAFT),
            Write::Set(keys::HISTORY, serde_json::to_value(&history)?),
        ];
        self.commit(writes, state, history)?;

        tracing::info!(label, items = items.len(), "published");
        self.newest()
    }

    /// Drops the draft. History is untouched.
    pub fn discard_draft(&mut self) -> Result<()> {
        let mut state = self.state.clone();
        state.draft = None;
        state.has_draft = false;
        state.status = PublishStatus::Published;

        let writes = vec![
            Write::Delete(keys::SETTINGS_DRAFT),
            Write::Delete(keys::ITEMS_DRAFT),
            Write::Set(keys::HAS_DRAFT, Value::Bool(false)),
            Write::Set(keys::STATUS, Value::from(PublishStatus::Published.as_str())),
        ];
        let history = self.history.clone();
        self.commit(writes, state, history)?;

        tracing::info!("draft discarded");
        Ok(())
    }

    /// Replays entry `id` as a new draft or a new publish.
    ///
    /// The source entry is left as it is; the replay is always a new entry.
    pub fn rollback(&mut self, id: &str, as_draft: bool) -> Result<&Revision> {
        let source = self.entry(id).cloned().ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        tracing::info!(id, as_draft, "rolling back");

        if as_draft {
            self.save_draft(&source.settings, &source.items)
        } else {
            let label = rollback_label(source.timestamp);
            self.publish(&source.settings, &source.items, Some(&label))
        }
    }

    /// Removes entry `id` from the history. Snapshots are unaffected.
    pub fn delete_entry(&mut self, id: &str) -> Result<()> {
        if self.entry(id).is_none() {
            return Err(Error::NotFound { id: id.to_string() });
        }
        let history: Vec<Revision> = self.history.iter().filter(|r| r.id != id).cloned().collect();

        let writes = vec![Write::Set(keys::HISTORY, serde_json::to_value(&history)?)];
        let state = self.state.clone();
        self.commit(writes, state, history)?;

        tracing::info!(id, "history entry deleted");
        Ok(())
    }

    /// Empties the history. Snapshots are unaffected.
    pub fn clear_all(&mut self) -> Result<()> {
        let writes = vec![Write::Set(keys::HISTORY, Value::Array(Vec::new()))];
        let state = self.state.clone();
        self.commit(writes, state, Vec::new())?;

        tracing::info!("history cleared");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn new_entry(
        &self,
        kind: RevisionKind,
        timestamp: i64,
        label: &str,
        settings: &SettingsTree,
        items: &[MenuItem],
    ) -> Revision {
        Revision {
            id: format!("fsm_{}", uuid::Uuid::now_v7().simple()),
            kind,
            timestamp,
            label: label.to_string(),
            settings: settings.clone(),
            items: items.to_vec(),
            items_count: items.len(),
        }
    }

    /// The history with `entry` prepended and the tail evicted.
    fn with_entry(&self, entry: Revision) -> Vec<Revision> {
        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.push(entry);
        history.extend(self.history.iter().cloned());
        if history.len() > self.config.max_history {
            tracing::debug!(evicted = history.len() - self.config.max_history, "history trimmed");
            history.truncate(self.config.max_history);
        }
        history
    }

    fn commit(&mut self, writes: Vec<Write>, state: PublicationState, history: Vec<Revision>) -> Result<()> {
        for write in writes {
            match write {
                Write::Set(key, value) => self.store.set(key, value)?,
                Write::Delete(key) => self.store.delete(key)?,
            }
        }
        self.state = state;
        self.history = history;
        Ok(())
    }

    fn newest(&self) -> Result<&Revision> {
        self.history.first().ok_or_else(|| Error::NotFound {
            id: "newest history entry".to_string(),
        })
    }
}

/// `Rollback from Nov 14, 22:13` for the source entry's UTC timestamp.
fn rollback_label(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(when) => format!("Rollback from {}", when.format("%b %-d, %H:%M")),
        None => format!("Rollback from {timestamp}"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::CascadeResolver;
    use crate::settings::Breakpoint;
    use crate::store::MemoryStore;
    use serde_json::json;

    const T0: i64 = 1_700_000_000;

    fn fixed_clock() -> i64 {
        T0
    }

    fn open() -> RevisionStore<MemoryStore> {
        RevisionStore::open(MemoryStore::new(), StoreConfig::default())
            .unwrap()
            .with_clock(fixed_clock)
    }

    fn wide(width: u32) -> SettingsTree {
        CascadeResolver::new()
            .set(&SettingsTree::defaults(), "container.width", Breakpoint::Desktop, width)
            .unwrap()
    }

    /// Fails every write to one key once armed.
    struct FailingStore {
        inner: MemoryStore,
        fail_on: Option<&'static str>,
    }

    impl OptionStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<Value>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: Value) -> Result<()> {
            if self.fail_on == Some(key) {
                return Err(Error::storage(key, "disk full"));
            }
            self.inner.set(key, value)
        }

        fn delete(&mut self, key: &str) -> Result<()> {
            self.inner.delete(key)
        }
    }

    #[test]
    fn first_open_writes_defaults() {
        let store = RevisionStore::open(
            MemoryStore::new(),
            StoreConfig::default().with_site_url("https://example.com/"),
        )
        .unwrap();
        assert_eq!(store.state().status, PublishStatus::Published);
        assert!(store.history().is_empty());
        assert_eq!(store.editable().items[0].url, "https://example.com/");

        let inner = store.into_inner();
        assert!(inner.get(keys::SETTINGS).unwrap().is_some());
        assert_eq!(inner.get(keys::ITEMS).unwrap().unwrap()[2]["label"], json!("Contact"));
    }

    #[test]
    fn draft_then_publish() {
        let mut store = open();
        let items = default_items("");

        let draft = store.save_draft(&wide(200), &items).unwrap();
        assert_eq!(draft.kind, RevisionKind::Draft);
        assert_eq!(draft.label, "Draft saved");
        assert_eq!(draft.items_count, 3);
        assert!(draft.id.starts_with("fsm_"));

        assert!(store.state().has_draft);
        assert_eq!(store.state().published.settings, SettingsTree::defaults());
        assert_eq!(store.editable().settings, wide(200));
        assert!(store.current_live().is_none());

        let published = store.publish(&wide(200), &items, Some("")).unwrap().id.clone();
        assert_eq!(store.state().status, PublishStatus::Published);
        assert!(store.state().draft.is_none());
        assert_eq!(store.state().version_timestamp, T0);
        assert!(store.is_current_live(&published));
        assert_eq!(store.entry(&published).unwrap().label, "Published");
        assert!(store.store().get(keys::SETTINGS_DRAFT).unwrap().is_none());
    }

    #[test]
    fn history_is_capped_newest_first() {
        let mut store = open();
        let items = default_items("");
        let mut ids = Vec::new();
        for width in 0..25 {
            ids.push(store.save_draft(&wide(100 + width), &items).unwrap().id.clone());
        }

        let history = store.history();
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].id, ids[24]);
        assert_eq!(history[19].id, ids[5]);
        for evicted in &ids[..5] {
            assert!(store.entry(evicted).is_none());
        }
    }

    #[test]
    fn zero_history_keeps_latest_entry() {
        let config = StoreConfig::default().with_max_history(0);
        let mut store = RevisionStore::open(MemoryStore::new(), config)
            .unwrap()
            .with_clock(fixed_clock);
        assert_eq!(store.config().max_history, 1);
        let items = default_items("");

        let first = store.save_draft(&wide(130), &items).unwrap().id.clone();
        let second = store.publish(&wide(140), &items, None).unwrap().id.clone();

        assert_eq!(store.history().len(), 1);
        assert!(store.entry(&first).is_none());
        assert!(store.is_current_live(&second));
        assert_eq!(store.editable().settings, wide(140));
    }

    #[test]
    fn rollback_of_draft_as_publish() {
        let mut store = open();
        let items = default_items("");
        let source = store.save_draft(&wide(150), &items).unwrap().clone();
        store.discard_draft().unwrap();

        let replay = store.rollback(&source.id, false).unwrap().clone();
        assert_eq!(replay.kind, RevisionKind::Publish);
        assert_eq!(replay.label, "Rollback from Nov 14, 22:13");
        assert_ne!(replay.id, source.id);

        assert_eq!(store.state().status, PublishStatus::Published);
        assert_eq!(store.state().published.settings, wide(150));
        assert_eq!(store.entry(&source.id), Some(&source));
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn rollback_as_draft_appends_draft() {
        let mut store = open();
        let items = default_items("");
        let published = store.publish(&wide(90), &items, Some("v1")).unwrap().id.clone();
        store.publish(&wide(95), &items, None).unwrap();

        let replay = store.rollback(&published, true).unwrap();
        assert_eq!(replay.kind, RevisionKind::Draft);
        assert_eq!(store.state().published.settings, wide(95));
        assert_eq!(store.editable().settings, wide(90));

        assert!(matches!(store.rollback("fsm_missing", true), Err(Error::NotFound { .. })));
    }

    #[test]
    fn delete_and_clear_keep_snapshots() {
        let mut store = open();
        let items = default_items("");
        let a = store.publish(&wide(130), &items, None).unwrap().id.clone();
        store.save_draft(&wide(140), &items).unwrap();

        assert!(matches!(store.delete_entry("nope"), Err(Error::NotFound { .. })));
        assert_eq!(store.history().len(), 2);

        store.delete_entry(&a).unwrap();
        assert!(store.current_live().is_none());
        assert_eq!(store.state().published.settings, wide(130));

        store.clear_all().unwrap();
        assert!(store.history().is_empty());
        assert_eq!(store.editable().settings, wide(140));
    }

    #[test]
    fn history_filter() {
        let mut store = open();
        let items = default_items("");
        store.save_draft(&wide(100), &items).unwrap();
        store.publish(&wide(100), &items, None).unwrap();
        store.save_draft(&wide(110), &items).unwrap();

        assert_eq!(store.history_filtered(HistoryFilter::All).count(), 3);
        assert_eq!(store.history_filtered(HistoryFilter::Draft).count(), 2);
        assert_eq!(store.history_filtered(HistoryFilter::Publish).count(), 1);
    }

    #[test]
    fn reopen_restores_state() {
        let mut store = open();
        let items = default_items("");
        store.publish(&wide(100), &items, None).unwrap();
        store.save_draft(&wide(300), &items).unwrap();

        let reopened = RevisionStore::open(store.into_inner(), StoreConfig::default()).unwrap();
        assert_eq!(reopened.state().status, PublishStatus::Draft);
        assert_eq!(reopened.editable().settings, wide(300));
        assert_eq!(reopened.state().published.settings, wide(100));
        assert_eq!(reopened.history().len(), 2);
        assert_eq!(reopened.history()[0].kind, RevisionKind::Draft);
    }

    #[test]
    fn failed_write_leaves_state_unchanged() {
        let inner = RevisionStore::open(MemoryStore::new(), StoreConfig::default())
            .unwrap()
            .into_inner();
        let mut store = RevisionStore::open(
            FailingStore {
                inner,
                fail_on: Some(keys::HISTORY),
            },
            StoreConfig::default(),
        )
        .unwrap();

        let before = store.state().clone();
        let err = store.save_draft(&wide(500), &default_items("")).unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert_eq!(store.state(), &before);
        assert!(store.history().is_empty());

        assert!(store.publish(&wide(500), &default_items(""), None).is_err());
        assert_eq!(store.state().published.settings, SettingsTree::defaults());
    }

    #[test]
    fn history_serializes_with_type_key() {
        let mut store = open();
        store.publish(&SettingsTree::defaults(), &default_items(""), None).unwrap();
        let stored = store.store().get(keys::HISTORY).unwrap().unwrap();
        assert_eq!(stored[0]["type"], json!("publish"));
        assert_eq!(stored[0]["timestamp"], json!(T0));
        assert_eq!(stored[0]["items_count"], json!(3));
    }
}
