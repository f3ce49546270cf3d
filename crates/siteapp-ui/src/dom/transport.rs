//! Browser transport.
//!
//! # Design
//! - Plain requests go through `gloo-net` (fetch).
//! - Multipart uploads use `XMLHttpRequest`, the only browser API that reports
//!   upload progress; the `FormData` is sent untouched so the browser writes the
//!   boundary and content type.

use gloo_net::http::{Method as HttpMethod, Request};
use js_sys::Promise;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{FormData, ProgressEvent, XmlHttpRequest};

use crate::core::indicator::UploadProgress;
use crate::core::ports::{DetachOnDrop, ProgressObserver, Settle, Transport};
use crate::core::request::{Method, Payload, PreparedRequest};
use crate::core::response::{TransportFailure, decode_body, parse_header_block};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

pub(crate) struct BrowserTransport;

impl Transport for BrowserTransport {
    type Upload = FormData;

    fn dispatch(
        &self,
        request: PreparedRequest<FormData>,
        progress: Option<ProgressObserver>,
        settle: Settle,
    ) {
        spawn_local(async move {
            let outcome = match &request.payload {
                Payload::Multipart(form) => {
                    send_multipart(request.method, &request.url, form, progress).await
                }
                Payload::Empty | Payload::Fields(_) => send_fetch(&request).await,
            };
            settle(outcome);
        });
    }
}

const fn http_method(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
        Method::Put => HttpMethod::PUT,
        Method::Patch => HttpMethod::PATCH,
        Method::Delete => HttpMethod::DELETE,
    }
}

async fn send_fetch(request: &PreparedRequest<FormData>) -> Result<Value, TransportFailure> {
    let (url, body) = request.encoded_target();
    let mut builder = Request::new(&url)
        .method(http_method(request.method))
        .header("X-Requested-With", "XMLHttpRequest");
    if let Some(body) = body {
        builder = builder.header("Content-Type", FORM_CONTENT_TYPE).body(body);
    }

    let response = builder
        .send()
        .await
        .map_err(|err| TransportFailure::network(err.to_string()))?;
    let status = response.status();
    let headers: Vec<(String, String)> = response.headers().entries().collect();
    let text = response
        .text()
        .await
        .map_err(|err| TransportFailure::network(err.to_string()))?;

    if response.ok() {
        Ok(decode_body(&text))
    } else {
        Err(TransportFailure {
            status,
            headers,
            text,
            reason: Some(response.status_text()),
        })
    }
}

async fn send_multipart(
    method: Method,
    url: &str,
    form: &FormData,
    progress: Option<ProgressObserver>,
) -> Result<Value, TransportFailure> {
    let js_failure = |err: wasm_bindgen::JsValue| TransportFailure::network(format!("{err:?}"));

    let xhr = XmlHttpRequest::new().map_err(js_failure)?;
    xhr.open_with_async(method.as_str(), url, true).map_err(js_failure)?;
    xhr.set_request_header("X-Requested-With", "XMLHttpRequest").map_err(js_failure)?;

    let on_progress = progress.map(|observer| {
        Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            observer(UploadProgress {
                loaded: whole_bytes(event.loaded()),
                total: event.length_computable().then(|| whole_bytes(event.total())),
            });
        })
    });
    let detach_progress = match &on_progress {
        Some(callback) => {
            let upload = xhr.upload().map_err(js_failure)?;
            upload.set_onprogress(Some(callback.as_ref().unchecked_ref()));
            Some(DetachOnDrop::new(move || upload.set_onprogress(None)))
        }
        None => None,
    };

    let finished = Promise::new(&mut |resolve, _reject| {
        xhr.set_onloadend(Some(&resolve));
    });
    xhr.send_with_opt_form_data(Some(form)).map_err(js_failure)?;
    let _ = JsFuture::from(finished).await;
    xhr.set_onloadend(None);
    drop(detach_progress);
    drop(on_progress);

    let status = xhr.status().map_err(js_failure)?;
    let text = xhr.response_text().ok().flatten().unwrap_or_default();
    if status == 0 {
        return Err(TransportFailure::network("upload aborted or connection failed"));
    }
    if (200..300).contains(&status) {
        return Ok(decode_body(&text));
    }
    let headers = xhr
        .get_all_response_headers()
        .map(|raw| parse_header_block(&raw))
        .unwrap_or_default();
    Err(TransportFailure {
        status,
        headers,
        text,
        reason: xhr.status_text().ok(),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_bytes(value: f64) -> u64 {
    value.max(0.0) as u64
}
