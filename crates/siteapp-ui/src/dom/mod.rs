//! Page bindings and JavaScript exports.
//!
//! # Design
//! - One `Page` per document, created by `install` or lazily with defaults.
//! - The page handle is cloned out of thread-local storage before use so
//!   callbacks that start new wrapped requests never hit a held borrow.

mod controls;
mod indicator;
mod modal;
mod options;
mod scroll;
mod timer;
mod transport;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::UiSettings;
use crate::core::indicator::IndicatorController;
use crate::core::modal::ErrorModal;
use crate::core::request::RequestWrapper;
use crate::error::UiError;
use crate::telemetry::{LoggingConfig, init_logging};

use self::indicator::DomIndicator;
use self::modal::DomModal;
use self::timer::TimeoutScheduler;
use self::transport::BrowserTransport;

struct Page {
    settings: Rc<UiSettings>,
    modal: Rc<DomModal>,
    wrapper: RequestWrapper<BrowserTransport>,
}

impl Page {
    fn new(settings: UiSettings) -> Self {
        let settings = Rc::new(settings);
        let indicator = Rc::new(IndicatorController::new(
            Rc::new(DomIndicator::new(
                settings.indicator_selector.clone(),
                settings.indicator_message_selector.clone(),
            )),
            settings.loading_message.clone(),
        ));
        let modal = Rc::new(DomModal::new(settings.modal_selector.clone()));
        let wrapper = RequestWrapper::new(
            BrowserTransport,
            Rc::new(TimeoutScheduler),
            indicator,
            modal.clone(),
            Rc::clone(&settings),
        );
        Self {
            settings,
            modal,
            wrapper,
        }
    }
}

thread_local! {
    static PAGE: RefCell<Option<Rc<Page>>> = const { RefCell::new(None) };
}

fn page() -> Rc<Page> {
    PAGE.with(|slot| {
        Rc::clone(
            slot.borrow_mut()
                .get_or_insert_with(|| Rc::new(Page::new(UiSettings::default()))),
        )
    })
}

fn js_error(err: &UiError) -> JsValue {
    let detail = match err {
        UiError::Config(source) => format!("{source:?}"),
        UiError::InvalidOptions { detail }
        | UiError::Js { detail }
        | UiError::Logging { detail } => detail.clone(),
    };
    js_sys::Error::new(&format!("{err}: {detail}")).into()
}

/// Install page settings from an optional JSON document and set up logging.
///
/// Requests already in flight keep the previous settings.
///
/// # Errors
///
/// Throws when the settings document is malformed or fails validation.
#[wasm_bindgen]
pub fn install(settings_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        console::warn!(js_error(&err));
    }
    let settings = match settings_json {
        Some(raw) => UiSettings::from_json(&raw)
            .map_err(UiError::from)
            .map_err(|err| js_error(&err))?,
        None => UiSettings::default(),
    };
    tracing::info!(show_delay_ms = settings.show_delay_ms, "request helpers installed");
    PAGE.with(|slot| *slot.borrow_mut() = Some(Rc::new(Page::new(settings))));
    Ok(())
}

/// Issue a request with the loading indicator, control locking, and error
/// display applied.
///
/// Returns `false` so it can be returned straight from an inline `onclick`.
///
/// # Errors
///
/// Throws when the options object is malformed; nothing is dispatched then.
#[wasm_bindgen]
pub fn ajax_with_indicator(options: JsValue) -> Result<bool, JsValue> {
    let descriptor = options::descriptor_from_js(&options).map_err(|err| js_error(&err))?;
    let page = page();
    Ok(page.wrapper.wrap_request(descriptor).handler_result())
}

/// Show `text` in the error modal under `title`.
#[wasm_bindgen]
pub fn show_modal_error(title: &str, text: &str) {
    page().modal.show_text(title, text);
}

/// Smoothly scroll so `element` sits just below the top of the viewport.
#[wasm_bindgen]
pub fn smooth_scroll_to(element: &Element) {
    let offset = page().settings.scroll_offset;
    scroll::smooth_scroll_to(element, offset);
}
