//! Form controls resolved from request options.

use gloo::utils::document;
use js_sys::Array;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::core::ports::Control;
use crate::error::UiError;

pub(crate) struct DomControl(Element);

impl Control for DomControl {
    fn set_disabled(&self, disabled: bool) {
        let _ = if disabled {
            self.0.set_attribute("disabled", "")
        } else {
            self.0.remove_attribute("disabled")
        };
    }
}

/// Accepts a selector string, a single element, or any array-like of elements
/// (arrays, `NodeList`s, jQuery collections).
pub(crate) fn resolve(value: &JsValue) -> Result<Vec<Rc<dyn Control>>, UiError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    if let Some(selector) = value.as_string() {
        let nodes = document()
            .query_selector_all(&selector)
            .map_err(|err| UiError::Js {
                detail: format!("{err:?}"),
            })?;
        return Ok((0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(wrap)
            .collect());
    }
    if let Some(element) = value.dyn_ref::<Element>() {
        return Ok(vec![wrap(element.clone())]);
    }
    Ok(Array::from(value)
        .iter()
        .filter_map(|item| item.dyn_into::<Element>().ok())
        .map(wrap)
        .collect())
}

fn wrap(element: Element) -> Rc<dyn Control> {
    Rc::new(DomControl(element))
}
