//! Conversion of JavaScript request options into a [`RequestDescriptor`].
//!
//! Recognised keys: `url`, `type`/`method`, `data`, `controls`,
//! `keep_indicator_forever`, `success`, `error`, `complete`.

use gloo::console;
use js_sys::{Function, JSON, Object, Reflect};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::FormData;

use crate::core::request::{Method, Payload, RequestDescriptor};
use crate::core::response::TransportFailure;
use crate::dom::controls;
use crate::error::UiError;
use crate::telemetry::log_callback_failure;

fn field(options: &JsValue, key: &str) -> JsValue {
    Reflect::get(options, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn invalid(detail: impl Into<String>) -> UiError {
    UiError::InvalidOptions {
        detail: detail.into(),
    }
}

pub(crate) fn descriptor_from_js(
    options: &JsValue,
) -> Result<RequestDescriptor<FormData>, UiError> {
    if !options.is_object() {
        return Err(invalid("options must be an object"));
    }
    let url = field(options, "url")
        .as_string()
        .ok_or_else(|| invalid("`url` must be a string"))?;
    let method = method(options)?;

    let mut descriptor =
        RequestDescriptor::new(method, url).with_data(payload(&field(options, "data"))?);
    descriptor.controls = controls::resolve(&field(options, "controls"))?;
    descriptor.keep_indicator_forever = field(options, "keep_indicator_forever").is_truthy();

    if let Some(success) = function(options, "success")? {
        descriptor = descriptor.on_success(move |body| {
            report("success", success.call1(&JsValue::NULL, &to_js(&body)));
        });
    }
    if let Some(error) = function(options, "error")? {
        descriptor = descriptor.on_error(move |text, failure| {
            let text = JsValue::from_str(text);
            report("error", error.call2(&JsValue::NULL, &text, &failure_to_js(failure)));
        });
    }
    if let Some(complete) = function(options, "complete")? {
        descriptor = descriptor.on_complete(move || {
            report("complete", complete.call0(&JsValue::NULL));
        });
    }
    Ok(descriptor)
}

fn report(callback: &str, result: Result<JsValue, JsValue>) {
    if let Some(err) = log_callback_failure(callback, result) {
        console::error!(format!("{callback} callback threw"), err);
    }
}

fn method(options: &JsValue) -> Result<Method, UiError> {
    let raw = [field(options, "type"), field(options, "method")]
        .into_iter()
        .find_map(|value| value.as_string());
    match raw {
        None => Ok(Method::Get),
        Some(raw) => {
            Method::parse(&raw).ok_or_else(|| invalid(format!("unsupported method {raw}")))
        }
    }
}

fn function(options: &JsValue, key: &str) -> Result<Option<Function>, UiError> {
    let value = field(options, key);
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<Function>()
        .map(Some)
        .map_err(|_| invalid(format!("`{key}` must be a function")))
}

fn payload(data: &JsValue) -> Result<Payload<FormData>, UiError> {
    if data.is_undefined() || data.is_null() {
        return Ok(Payload::Empty);
    }
    if let Some(form) = data.dyn_ref::<FormData>() {
        return Ok(Payload::Multipart(form.clone()));
    }
    let Some(object) = data.dyn_ref::<Object>() else {
        return Err(invalid("`data` must be an object or FormData"));
    };
    let fields = Object::entries(object)
        .iter()
        .filter_map(|entry| {
            let pair = entry.dyn_into::<js_sys::Array>().ok()?;
            let key = pair.get(0).as_string()?;
            Some((key, scalar_text(&pair.get(1))))
        })
        .collect();
    Ok(Payload::Fields(fields))
}

fn scalar_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(number) = value.as_f64() {
        return number.to_string();
    }
    if let Some(flag) = value.as_bool() {
        return flag.to_string();
    }
    if value.is_undefined() || value.is_null() {
        return String::new();
    }
    JSON::stringify(value)
        .ok()
        .and_then(|text| text.as_string())
        .unwrap_or_default()
}

fn to_js(body: &Value) -> JsValue {
    JSON::parse(&body.to_string()).unwrap_or(JsValue::NULL)
}

fn failure_to_js(failure: &TransportFailure) -> JsValue {
    let object = Object::new();
    let headers = Object::new();
    for (name, value) in &failure.headers {
        let _ = Reflect::set(
            &headers,
            &JsValue::from_str(&name.to_ascii_lowercase()),
            &JsValue::from_str(value),
        );
    }
    let entries: [(&str, JsValue); 4] = [
        ("status", JsValue::from(failure.status)),
        ("responseText", JsValue::from_str(&failure.text)),
        ("headers", headers.into()),
        (
            "reason",
            failure
                .reason
                .as_deref()
                .map_or(JsValue::NULL, JsValue::from_str),
        ),
    ];
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), &value);
    }
    object.into()
}
