//! Request wrapper: loading indicator, control locking, and error surfacing.
//!
//! # Design
//! - A wrapped request moves `pending -> settled`; settlement re-enables the
//!   controls, releases the indicator, runs `complete`, then exactly one of the
//!   success path, the modal, or the caller's error callback.
//! - Multipart bodies are forced to `POST`, sent raw so the browser picks the
//!   boundary, and report upload progress into the indicator.
//! - The wrapper never issues retries or cancels a dispatched request.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::UiSettings;
use crate::core::indicator::{IndicatorController, UploadProgress};
use crate::core::modal::{ErrorModal, ModalBody};
use crate::core::ports::{Control, ProgressObserver, Scheduler, Transport};
use crate::core::response::{BodyStatus, TransportFailure};

/// Only failures with this status render their HTML body in the modal frame.
const SERVER_ERROR_STATUS: u16 = 500;

/// Invoked with the decoded body of a successful response.
pub type SuccessCallback = Box<dyn FnOnce(Value)>;
/// Invoked with the raw response text and the failure for transport errors.
pub type ErrorCallback = Box<dyn FnOnce(&str, &TransportFailure)>;
/// Invoked first on every settlement.
pub type CompleteCallback = Box<dyn FnOnce()>;

/// HTTP method for a wrapped request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// `GET`.
    #[default]
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
}

impl Method {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Parse a case-insensitive method name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Payload<U> {
    /// No body or query parameters.
    #[default]
    Empty,
    /// Key/value pairs, url-encoded by the transport.
    Fields(Vec<(String, String)>),
    /// Multipart form (file upload) passed to the transport untouched.
    Multipart(U),
}

impl<U> Payload<U> {
    /// Whether this is a multipart upload.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// How the transport should encode the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Serialize fields as `application/x-www-form-urlencoded` (query string for `GET`).
    UrlEncoded,
    /// Send the payload as-is and let it pick its own content type.
    Raw,
}

/// Request as handed to the [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest<U> {
    /// Effective method.
    pub method: Method,
    /// Target URL.
    pub url: String,
    /// Payload to send.
    pub payload: Payload<U>,
    /// Payload encoding.
    pub encoding: BodyEncoding,
}

impl<U> PreparedRequest<U> {
    /// Apply the multipart rules to a caller's method, URL, and payload.
    #[must_use]
    pub fn new(method: Method, url: String, payload: Payload<U>) -> Self {
        if payload.is_multipart() {
            Self {
                method: Method::Post,
                url,
                payload,
                encoding: BodyEncoding::Raw,
            }
        } else {
            Self {
                method,
                url,
                payload,
                encoding: BodyEncoding::UrlEncoded,
            }
        }
    }
}

impl<U> PreparedRequest<U> {
    /// Url-encoded fields split into the request URL (for `GET`) or a body.
    ///
    /// Multipart and empty payloads leave the URL untouched and yield no encoded body.
    #[must_use]
    pub fn encoded_target(&self) -> (String, Option<String>) {
        let Payload::Fields(fields) = &self.payload else {
            return (self.url.clone(), None);
        };
        let encoded = encode_fields(fields);
        if self.method != Method::Get {
            return (self.url.clone(), Some(encoded));
        }
        if encoded.is_empty() {
            return (self.url.clone(), None);
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        (format!("{}{separator}{encoded}", self.url), None)
    }
}

/// Encode key/value pairs as `application/x-www-form-urlencoded`.
#[must_use]
pub fn encode_fields(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key).replace("%20", "+"),
                urlencoding::encode(value).replace("%20", "+")
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Result a UI event handler should propagate after wrapping a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultAction {
    /// Let the browser perform its default action.
    Allow,
    /// Suppress the default action (link navigation, form submission).
    Suppress,
}

impl DefaultAction {
    /// Value an inline event handler returns for this action.
    #[must_use]
    pub const fn handler_result(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Configuration for one wrapped request.
pub struct RequestDescriptor<U> {
    /// Target URL.
    pub url: String,
    /// Requested method; multipart payloads always use `POST`.
    pub method: Method,
    /// Payload.
    pub data: Payload<U>,
    /// Controls disabled while the request is pending.
    pub controls: Vec<Rc<dyn Control>>,
    /// Leave the indicator up after a successful final settlement.
    pub keep_indicator_forever: bool,
    /// Success callback.
    pub success: Option<SuccessCallback>,
    /// Transport error callback; replaces the built-in error display.
    pub error: Option<ErrorCallback>,
    /// Completion callback, run before the outcome-specific handling.
    pub complete: Option<CompleteCallback>,
}

impl<U> RequestDescriptor<U> {
    /// Descriptor for `method url` with no payload or callbacks.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            data: Payload::Empty,
            controls: Vec::new(),
            keep_indicator_forever: false,
            success: None,
            error: None,
            complete: None,
        }
    }

    /// `GET` descriptor.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// `POST` descriptor.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_data(mut self, data: Payload<U>) -> Self {
        self.data = data;
        self
    }

    /// Add a control to lock while pending.
    #[must_use]
    pub fn with_control(mut self, control: Rc<dyn Control>) -> Self {
        self.controls.push(control);
        self
    }

    /// Keep the indicator visible after success (caller navigates away).
    #[must_use]
    pub const fn keep_indicator_forever(mut self) -> Self {
        self.keep_indicator_forever = true;
        self
    }

    /// Set the success callback.
    #[must_use]
    pub fn on_success(mut self, callback: impl FnOnce(Value) + 'static) -> Self {
        self.success = Some(Box::new(callback));
        self
    }

    /// Set the transport error callback.
    #[must_use]
    pub fn on_error(mut self, callback: impl FnOnce(&str, &TransportFailure) + 'static) -> Self {
        self.error = Some(Box::new(callback));
        self
    }

    /// Set the completion callback.
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.complete = Some(Box::new(callback));
        self
    }
}

impl<U> fmt::Debug for RequestDescriptor<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("multipart", &self.data.is_multipart())
            .field("controls", &self.controls.len())
            .field("keep_indicator_forever", &self.keep_indicator_forever)
            .finish_non_exhaustive()
    }
}

/// Issues requests with the shared indicator and error handling applied.
pub struct RequestWrapper<T> {
    transport: T,
    scheduler: Rc<dyn Scheduler>,
    indicator: Rc<IndicatorController>,
    modal: Rc<dyn ErrorModal>,
    settings: Rc<UiSettings>,
}

impl<T: Transport> RequestWrapper<T> {
    /// Assemble a wrapper from its collaborators.
    pub fn new(
        transport: T,
        scheduler: Rc<dyn Scheduler>,
        indicator: Rc<IndicatorController>,
        modal: Rc<dyn ErrorModal>,
        settings: Rc<UiSettings>,
    ) -> Self {
        Self {
            transport,
            scheduler,
            indicator,
            modal,
            settings,
        }
    }

    /// Shared indicator controller.
    #[must_use]
    pub fn indicator(&self) -> &Rc<IndicatorController> {
        &self.indicator
    }

    /// Dispatch `descriptor` and return immediately.
    ///
    /// Controls are disabled before dispatch; the indicator appears only if a
    /// request from this busy period is still outstanding after the configured delay.
    pub fn wrap_request(&self, descriptor: RequestDescriptor<T::Upload>) -> DefaultAction {
        let RequestDescriptor {
            url,
            method,
            data,
            controls,
            keep_indicator_forever,
            success,
            error,
            complete,
        } = descriptor;

        let request = PreparedRequest::new(method, url, data);
        let progress = request.payload.is_multipart().then(|| {
            let indicator = Rc::clone(&self.indicator);
            Box::new(move |progress: UploadProgress| indicator.report_progress(progress))
                as ProgressObserver
        });

        let ticket = self.indicator.begin();
        let indicator = Rc::clone(&self.indicator);
        self.scheduler.schedule(
            self.settings.show_delay(),
            Box::new(move || {
                indicator.show_if_pending(ticket);
            }),
        );

        for control in &controls {
            control.set_disabled(true);
        }

        debug!(
            method = %request.method,
            url = %request.url,
            multipart = request.payload.is_multipart(),
            "dispatching wrapped request"
        );

        let settlement = Settlement {
            indicator: Rc::clone(&self.indicator),
            modal: Rc::clone(&self.modal),
            settings: Rc::clone(&self.settings),
            controls,
            keep_indicator_forever,
            success,
            error,
            complete,
        };
        self.transport.dispatch(
            request,
            progress,
            Box::new(move |outcome| settlement.settle(outcome)),
        );

        DefaultAction::Suppress
    }
}

struct Settlement {
    indicator: Rc<IndicatorController>,
    modal: Rc<dyn ErrorModal>,
    settings: Rc<UiSettings>,
    controls: Vec<Rc<dyn Control>>,
    keep_indicator_forever: bool,
    success: Option<SuccessCallback>,
    error: Option<ErrorCallback>,
    complete: Option<CompleteCallback>,
}

impl Settlement {
    fn settle(self, outcome: Result<Value, TransportFailure>) {
        match outcome {
            Ok(body) => self.on_response(body),
            Err(failure) => self.on_failure(&failure),
        }
    }

    fn on_response(mut self, body: Value) {
        let app_error = match BodyStatus::of(&body) {
            BodyStatus::Error(message) => Some(message.map(str::to_string)),
            BodyStatus::Ok => None,
        };
        self.release(app_error.is_none() && self.keep_indicator_forever);

        match app_error {
            Some(message) => {
                let text = message.unwrap_or_else(|| self.settings.generic_error_message.clone());
                warn!(server_message = %text, "request reported an application error");
                self.modal.show_text(&self.settings.error_title, &text);
            }
            None => {
                if let Some(success) = self.success.take() {
                    success(body);
                }
            }
        }
    }

    fn on_failure(mut self, failure: &TransportFailure) {
        self.release(false);
        info!(
            status = failure.status,
            reason = failure.reason.as_deref().unwrap_or_default(),
            "wrapped request failed"
        );

        if let Some(error) = self.error.take() {
            error(&failure.text, failure);
        } else if failure.status == SERVER_ERROR_STATUS && failure.is_html_document() {
            self.modal.show(
                &self.settings.error_title,
                ModalBody::Frame {
                    document: failure.text.clone(),
                },
            );
        } else {
            self.modal.show_text(&self.settings.error_title, &self.settings.generic_error_message);
        }
    }

    fn release(&mut self, keep_visible: bool) {
        self.indicator.end(keep_visible);
        for control in &self.controls {
            control.set_disabled(false);
        }
        if let Some(complete) = self.complete.take() {
            complete();
        }
    }
}
