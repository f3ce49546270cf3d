//! Loading indicator element.

use gloo::console;
use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::core::ports::LoadingIndicator;

/// Indicator located by selector on every update, so late-rendered markup works.
pub(crate) struct DomIndicator {
    selector: String,
    message_selector: String,
}

impl DomIndicator {
    pub(crate) const fn new(selector: String, message_selector: String) -> Self {
        Self {
            selector,
            message_selector,
        }
    }

    fn element(&self) -> Option<HtmlElement> {
        let found = document()
            .query_selector(&self.selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        if found.is_none() {
            console::warn!(format!("loading indicator {} not found", self.selector));
        }
        found
    }
}

impl LoadingIndicator for DomIndicator {
    fn show(&self, message: &str) {
        self.set_message(message);
        if let Some(element) = self.element() {
            element.set_hidden(false);
            let _ = element.style().set_property("display", "block");
        }
    }

    fn set_message(&self, message: &str) {
        let Some(element) = self.element() else {
            return;
        };
        if let Ok(Some(node)) = element.query_selector(&self.message_selector) {
            node.set_text_content(Some(message));
        }
    }

    fn hide(&self) {
        if let Some(element) = self.element() {
            let _ = element.style().set_property("display", "none");
        }
    }
}
