//! Error modal element with an `alert` fallback.

use gloo::console;
use gloo::dialogs::alert;
use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlDialogElement, HtmlIFrameElement};

use crate::core::modal::{ErrorModal, FRAME_STYLE, ModalBody};

const TITLE_SELECTOR: &str = ".modal-title";
const BODY_SELECTOR: &str = ".modal-body";
const OPEN_CLASS: &str = "modal-open";

pub(crate) struct DomModal {
    selector: String,
}

impl DomModal {
    pub(crate) const fn new(selector: String) -> Self {
        Self { selector }
    }

    fn render(modal: &Element, title: &str, body: &ModalBody) -> Result<(), wasm_bindgen::JsValue> {
        if let Some(node) = modal.query_selector(TITLE_SELECTOR)? {
            node.set_text_content(Some(title));
        }
        let Some(container) = modal.query_selector(BODY_SELECTOR)? else {
            return Err("modal body not found".into());
        };
        match body {
            ModalBody::Text(text) => container.set_text_content(Some(text)),
            ModalBody::Frame { document: source } => {
                let frame = document()
                    .create_element("iframe")?
                    .dyn_into::<HtmlIFrameElement>()?;
                frame.set_attribute("style", FRAME_STYLE)?;
                frame.set_srcdoc(source);
                container.set_text_content(None);
                container.append_child(&frame)?;
            }
        }

        if let Some(dialog) = modal.dyn_ref::<HtmlDialogElement>() {
            if !dialog.open() {
                dialog.show_modal()?;
            }
        } else {
            modal.class_list().add_1(OPEN_CLASS)?;
        }
        Ok(())
    }
}

impl ErrorModal for DomModal {
    fn show(&self, title: &str, body: ModalBody) {
        let modal = document().query_selector(&self.selector).ok().flatten();
        let rendered = modal.as_ref().map(|modal| Self::render(modal, title, &body));
        if let Some(Ok(())) = rendered {
            return;
        }
        if let Some(Err(err)) = rendered {
            console::error!("error modal render failed", err);
        }
        match body {
            ModalBody::Text(text) => alert(&text),
            ModalBody::Frame { document } => {
                console::error!(document);
                alert(title);
            }
        }
    }
}
