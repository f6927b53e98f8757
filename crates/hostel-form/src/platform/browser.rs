//! DOM adapters and page wiring.
//!
//! `DomSelect` and `DomRegion` wrap the elements found by id, `mount` binds a
//! toggler to them and `mount_on_dom_ready` defers that until the document has
//! been parsed. Mounted togglers live for the rest of the page in `MOUNTED`,
//! at most one per config.
//!
//! A page overrides the element ids either by calling the exported
//! `mountHostelForm(json)` or with a `data-hostel-form` attribute on `<html>`.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DocumentReadyState, EventTarget, HtmlElement, HtmlSelectElement};
use zoon::{eprintln, println};

use crate::config::ToggleConfig;
use crate::error::{ToggleError, ToggleResult};
use crate::toggle::{
    AuxiliaryRegion, ChangeHandler, DisplayState, Mounted, SelectionControl, VisibilityToggler,
};

pub type DomToggler = Mounted<DomSelect, DomRegion>;

/// Attribute on the root element holding a JSON `ToggleConfig`.
pub const CONFIG_ATTRIBUTE: &str = "data-hostel-form";

thread_local! {
    static MOUNTED: RefCell<Vec<(ToggleConfig, DomToggler)>> = RefCell::new(Vec::new());
}

impl From<ToggleError> for JsValue {
    fn from(error: ToggleError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

fn dom_error(id: &str, error: JsValue) -> ToggleError {
    ToggleError::Dom {
        id: id.to_owned(),
        message: error.as_string().unwrap_or_else(|| format!("{error:?}")),
    }
}

// ---------------------------------------------------------------------------
// Selection control
// ---------------------------------------------------------------------------

pub struct DomSelect {
    element: HtmlSelectElement,
}

impl DomSelect {
    pub fn new(element: HtmlSelectElement) -> Self {
        Self { element }
    }

    /// `None` when there is no element with `id` or it is not a `<select>`.
    pub fn find(document: &Document, id: &str) -> Option<Self> {
        document
            .get_element_by_id(id)?
            .dyn_into::<HtmlSelectElement>()
            .ok()
            .map(Self::new)
    }
}

impl SelectionControl for DomSelect {
    type Subscription = ChangeListener;

    fn value(&self) -> String {
        self.element.value()
    }

    fn subscribe(&self, mut handler: ChangeHandler) -> ToggleResult<ChangeListener> {
        let select_id = self.element.id();
        // An `Err` returned to JS is thrown there as an exception.
        let closure = Closure::<dyn FnMut() -> Result<(), JsValue>>::new(move || {
            handler().map_err(|error| {
                eprintln!("[hostel-form] change on #{select_id} failed: {error}");
                JsValue::from(error)
            })
        });
        self.element
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .map_err(|error| dom_error(&self.element.id(), error))?;
        Ok(ChangeListener {
            target: self.element.clone(),
            closure,
        })
    }
}

/// Registered `change` listener, removed again on drop.
pub struct ChangeListener {
    target: HtmlSelectElement,
    closure: Closure<dyn FnMut() -> Result<(), JsValue>>,
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        if let Err(error) = self
            .target
            .remove_event_listener_with_callback("change", self.closure.as_ref().unchecked_ref())
        {
            eprintln!(
                "[hostel-form] detaching change listener from #{} failed: {error:?}",
                self.target.id()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Auxiliary region
// ---------------------------------------------------------------------------

/// Region looked up by id. A missing element only surfaces on the first write.
pub struct DomRegion {
    id: String,
    element: Option<HtmlElement>,
}

impl DomRegion {
    pub fn find(document: &Document, id: &str) -> Self {
        Self {
            id: id.to_owned(),
            element: document
                .get_element_by_id(id)
                .and_then(|element| element.dyn_into::<HtmlElement>().ok()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl AuxiliaryRegion for DomRegion {
    fn set_display_state(&self, state: DisplayState) -> ToggleResult<()> {
        let Some(element) = &self.element else {
            return Err(ToggleError::MissingRegion {
                id: self.id.clone(),
            });
        };
        element
            .style()
            .set_property("display", state.css_display())
            .map_err(|error| dom_error(&self.id, error))
    }
}

// ---------------------------------------------------------------------------
// Page wiring
// ---------------------------------------------------------------------------

/// Binds a toggler to the elements named in `config`.
///
/// Returns `Ok(None)` when the page has no such select element.
pub fn mount(document: &Document, config: &ToggleConfig) -> ToggleResult<Option<DomToggler>> {
    let control = DomSelect::find(document, &config.select_id);
    let region = DomRegion::find(document, &config.region_id);
    let Some(mounted) = VisibilityToggler::mount(control, region)? else {
        if document.get_element_by_id(&config.select_id).is_some() {
            println!(
                "[hostel-form] #{} is not a <select>, toggler inactive",
                config.select_id
            );
        } else {
            println!("[hostel-form] no #{} on this page, toggler inactive", config.select_id);
        }
        return Ok(None);
    };
    println!(
        "[hostel-form] #{} bound to #{}",
        config.region_id, config.select_id
    );
    Ok(Some(mounted))
}

/// Config from the `data-hostel-form` attribute of `<html>`, default when absent.
pub fn page_config(document: &Document) -> ToggleResult<ToggleConfig> {
    match document
        .document_element()
        .and_then(|root| root.get_attribute(CONFIG_ATTRIBUTE))
    {
        Some(json) => ToggleConfig::from_json(&json),
        None => Ok(ToggleConfig::default()),
    }
}

fn current_document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))
}

fn mount_for_page(document: &Document, config: ToggleConfig) -> Result<(), JsValue> {
    match mount(document, &config) {
        Ok(Some(mounted)) => {
            MOUNTED.with(|togglers| {
                let mut togglers = togglers.borrow_mut();
                // Remounting the same config replaces the earlier listener.
                togglers.retain(|(mounted_config, _)| *mounted_config != config);
                togglers.push((config, mounted));
            });
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(error) => {
            eprintln!("[hostel-form] setup failed: {error}");
            Err(error.into())
        }
    }
}

/// Mounts immediately unless `ready_state` is `Loading`, in which case the
/// mount runs once on the first `DOMContentLoaded` dispatched at `target`.
pub fn mount_when_ready(
    document: &Document,
    ready_state: DocumentReadyState,
    target: &EventTarget,
    config: ToggleConfig,
) -> Result<(), JsValue> {
    if ready_state != DocumentReadyState::Loading {
        return mount_for_page(document, config);
    }

    let callback = Closure::once_into_js({
        let document = document.clone();
        move || -> Result<(), JsValue> { mount_for_page(&document, config) }
    });
    target.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
}

/// Mounts now if the document is parsed, otherwise on `DOMContentLoaded`.
pub fn mount_on_dom_ready(config: ToggleConfig) -> Result<(), JsValue> {
    let document = current_document()?;
    mount_when_ready(&document, document.ready_state(), &document, config)
}

/// Like `mount_on_dom_ready`, with ids taken from the page's `data-hostel-form`.
pub fn mount_page_on_dom_ready() -> Result<(), JsValue> {
    let document = current_document()?;
    let config = page_config(&document).inspect_err(|error| {
        eprintln!("[hostel-form] {CONFIG_ATTRIBUTE}: {error}");
    })?;
    mount_on_dom_ready(config)
}

/// JS entry point taking a partial JSON config, e.g. `mountHostelForm('{"selectId":"roomSelect"}')`.
#[wasm_bindgen(js_name = mountHostelForm)]
pub fn mount_with_config(config: &str) -> Result<(), JsValue> {
    let config = ToggleConfig::from_json(config).inspect_err(|error| {
        eprintln!("[hostel-form] {error}");
    })?;
    mount_on_dom_ready(config)
}

/// Number of togglers kept alive by the `mount_*_on_dom_ready` entry points.
pub fn mounted_count() -> usize {
    MOUNTED.with(|togglers| togglers.borrow().len())
}

/// Drops every toggler mounted through `mount_on_dom_ready`, detaching their listeners.
pub fn unmount_all() {
    MOUNTED.with(|togglers| togglers.borrow_mut().clear());
}
