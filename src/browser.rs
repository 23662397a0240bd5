//! Browser binding: the bridge over the live DOM, `localStorage` and `fetch`.
//!
//! `start` runs when the wasm module is instantiated. It registers one
//! `submit` listener per configured form; each listener suppresses navigation
//! synchronously (a spawned task would run after the event has been
//! dispatched) and then drives the shared bridge on the local executor.

use crate::{
    bridge::{FormBridge, FormKind},
    config::BridgeConfig,
    errors::BridgeError,
    page::{Page, SubmitIntent},
    storage::DurableStorage,
    transport::{HttpResponse, Transport},
};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, AbortController, Document, Event, HtmlElement, HtmlInputElement};

type DomBridge = FormBridge<DomPage, LocalStorage, FetchTransport>;

/// Page backed by the document the script runs in.
pub struct DomPage {
    document: Document,
}

impl DomPage {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Page for DomPage {
    fn input_value(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(|input| input.value())
    }

    fn set_inner_text(&self, id: &str, text: &str) -> Result<(), BridgeError> {
        let element = self
            .document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| BridgeError::MissingElement(id.to_string()))?;
        element.set_inner_text(text);
        Ok(())
    }
}

struct DomSubmit(Event);

impl SubmitIntent for DomSubmit {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

/// `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// # Errors
    /// Returns `BridgeError::Storage` if there is no window or storage is disabled.
    pub fn open() -> Result<Self, BridgeError> {
        let storage = web_sys::window()
            .ok_or_else(|| BridgeError::Storage("window is not available".to_string()))?
            .local_storage()
            .map_err(|err| storage_error("localStorage is not accessible", &err))?
            .ok_or_else(|| BridgeError::Storage("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl DurableStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, BridgeError> {
        self.storage
            .get_item(key)
            .map_err(|err| storage_error("failed to read localStorage", &err))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BridgeError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| storage_error("failed to write localStorage", &err))
    }

    fn remove_item(&self, key: &str) -> Result<(), BridgeError> {
        self.storage
            .remove_item(key)
            .map_err(|err| storage_error("failed to write localStorage", &err))
    }
}

fn storage_error(context: &str, err: &JsValue) -> BridgeError {
    BridgeError::Storage(format!("{context}: {err:?}"))
}

/// `fetch` with an abort timer so a stalled backend cannot hang the form.
pub struct FetchTransport {
    timeout_ms: u32,
}

impl FetchTransport {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX),
        }
    }
}

impl Transport for FetchTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, BridgeError> {
        let controller = AbortController::new()
            .map_err(|_| BridgeError::Config("Failed to initialize request timeout.".to_string()))?;
        let signal = controller.signal();
        let timeout_controller = controller.clone();
        let _timeout = Timeout::new(self.timeout_ms, move || timeout_controller.abort());

        let request = Request::post(url)
            .header("Content-Type", "application/json")
            .abort_signal(Some(&signal))
            .body(body)
            .map_err(|err| BridgeError::Serialization(format!("Failed to build request: {err}")))?;
        let response = request.send().await.map_err(map_request_error)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

fn map_request_error(err: gloo_net::Error) -> BridgeError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        BridgeError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        BridgeError::Network(format!("Unable to reach the server: {message}"))
    }
}

/// Writes a failed submission to the browser console. No tracing subscriber
/// is installed in the page, so this is where markup errors surface.
fn report_error(form: FormKind, err: &BridgeError) {
    console::error_1(&JsValue::from_str(&form.error_report(err)));
}

/// Module entry point: attaches the bridge to both forms.
///
/// # Errors
/// Fails if the document, `localStorage` or one of the configured forms is missing.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let config = BridgeConfig::load();
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("document is not available"))?;
    let storage = LocalStorage::open().map_err(|err| JsValue::from_str(&err.to_string()))?;
    let transport = FetchTransport::new(config.timeout);

    let bridge = Rc::new(FormBridge::new(
        config,
        DomPage::new(document.clone()),
        storage,
        transport,
    ));

    for form in [FormKind::Signup, FormKind::Login] {
        attach(&document, &bridge, form)?;
    }

    Ok(())
}

fn attach(document: &Document, bridge: &Rc<DomBridge>, form: FormKind) -> Result<(), JsValue> {
    let form_id = &bridge.config().form_ids(form).form_id;
    let element = document
        .get_element_by_id(form_id)
        .ok_or_else(|| JsValue::from_str(&format!("form #{form_id} not found")))?;

    let bridge = Rc::clone(bridge);
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let event = DomSubmit(event);
        event.prevent_default();

        let bridge = Rc::clone(&bridge);
        spawn_local(async move {
            match bridge.handle_submit(form, &event).await {
                Ok(outcome) => debug!(%form, ?outcome, "submission finished"),
                Err(err) => report_error(form, &err),
            }
        });
    });

    element.add_event_listener_with_callback("submit", listener.as_ref().unchecked_ref())?;
    // listeners live as long as the page
    listener.forget();

    Ok(())
}

