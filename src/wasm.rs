//! Live preview bindings for the browser editor.
//!
//! Only available with the `tsify` feature. [`PreviewSession`] wraps an
//! [`EditorSession`] so the editor can apply edits and read back the compiled
//! stylesheet and markup without a server round trip.
//!
//! ```javascript
//! import init, { PreviewSession } from 'floatmenu-styler';
//!
//! await init();
//! const session = PreviewSession.fromJson(settingsJson, itemsJson);
//! session.setBreakpoint('tablet');
//! session.set('container.width', 100);
//! style.textContent = session.css();
//! ```

use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::filter::color_to_filter;
use crate::items::MenuItem;
use crate::session::{EditorSession, Transferable};
use crate::settings::{Breakpoint, SettingValue, SettingsTree};
use crate::transfer::ExportBundle;

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Editor state exposed to JavaScript.
#[wasm_bindgen]
pub struct PreviewSession {
    session: EditorSession,
}

#[wasm_bindgen]
impl PreviewSession {
    /// Starts from a settings document and an items JSON array.
    #[wasm_bindgen(js_name = "fromJson")]
    pub fn from_json(settings_json: &str, items_json: &str) -> Result<PreviewSession, JsError> {
        let settings = SettingsTree::from_json(settings_json).map_err(js_error)?;
        let items: Vec<MenuItem> = serde_json::from_str(items_json).map_err(js_error)?;
        Ok(Self {
            session: EditorSession::new(settings, items),
        })
    }

    #[wasm_bindgen(js_name = "setBreakpoint")]
    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.session.set_breakpoint(breakpoint);
    }

    /// Writes a number, string or boolean at the current breakpoint.
    pub fn set(&mut self, path: &str, value: JsValue) -> Result<bool, JsError> {
        let value: Value = serde_wasm_bindgen::from_value(value).map_err(js_error)?;
        let value = match value {
            Value::Number(n) => SettingValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::Bool(b) => SettingValue::Flag(b),
            Value::String(s) => SettingValue::Text(s),
            other => return Err(JsError::new(&format!("unsupported value for '{path}': {other}"))),
        };
        self.session.set(path, value).map_err(js_error)
    }

    /// The effective value at the current breakpoint.
    pub fn get(&self, path: &str) -> Result<JsValue, JsError> {
        let value = self.session.get(path).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&value.to_json()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "removeOverride")]
    pub fn remove_override(&mut self, path: &str) -> Result<bool, JsError> {
        self.session.remove_override(path).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "hasOverride")]
    pub fn has_override(&self, path: &str) -> Result<bool, JsError> {
        self.session.has_override(path).map_err(js_error)
    }

    /// `"tablet"`, `"desktop"`, or `undefined` when the value is not inherited.
    #[wasm_bindgen(js_name = "inheritedFrom")]
    pub fn inherited_from(&self, path: &str) -> Result<Option<String>, JsError> {
        let source = self.session.inheritance_source(path).map_err(js_error)?;
        Ok(source.map(|bp| bp.as_str().to_string()))
    }

    #[wasm_bindgen(js_name = "addItem")]
    pub fn add_item(&mut self, item: MenuItem) -> u32 {
        self.session.add_item(item)
    }

    #[wasm_bindgen(js_name = "removeItem")]
    pub fn remove_item(&mut self, id: u32) -> bool {
        self.session.remove_item(id).is_some()
    }

    #[wasm_bindgen(js_name = "moveItem")]
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        self.session.move_item(from, to)
    }

    pub fn items(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.session.items()).map_err(js_error)
    }

    /// The compiled stylesheet text.
    pub fn css(&mut self) -> Result<String, JsError> {
        self.session.preview_css().map_err(js_error)
    }

    pub fn markup(&self) -> Result<String, JsError> {
        self.session.markup().map_err(js_error)
    }

    #[wasm_bindgen(js_name = "settingsJson")]
    pub fn settings_json(&self) -> Result<String, JsError> {
        self.session.settings().to_json().map_err(js_error)
    }

    #[wasm_bindgen(js_name = "exportJson")]
    pub fn export_json(&self) -> Result<String, JsError> {
        self.session.export_bundle().to_json_pretty().map_err(js_error)
    }

    /// Imports a bundle; returns the import report.
    #[wasm_bindgen(js_name = "importJson")]
    pub fn import_json(&mut self, json: &str, site_url: &str) -> Result<JsValue, JsError> {
        let report = self.session.import_json(json, site_url).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&report).map_err(js_error)
    }

    /// Replaces everything with a complete bundle.
    #[wasm_bindgen(js_name = "applyBundleJson")]
    pub fn apply_bundle_json(&mut self, json: &str) -> Result<(), JsError> {
        let bundle = ExportBundle::from_json(json).map_err(js_error)?;
        self.session.apply_bundle(&bundle);
        Ok(())
    }
}

/// Filter chain recoloring a monochrome image to `color`.
#[wasm_bindgen(js_name = "colorToFilter")]
pub fn color_to_filter_js(color: &str) -> String {
    color_to_filter(color)
}
