//! In-memory collaborators for exercising the wrapper without a browser.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use serde_json::Value;

use crate::core::indicator::UploadProgress;
use crate::core::modal::{ErrorModal, ModalBody};
use crate::core::ports::{
    Control, LoadingIndicator, ProgressObserver, Scheduler, Settle, Transport,
};
use crate::core::request::{BodyEncoding, Method, PreparedRequest};
use crate::core::response::TransportFailure;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum IndicatorEvent {
    Show,
    Hide,
}

#[derive(Default)]
pub(crate) struct RecordingIndicator {
    events: RefCell<Vec<IndicatorEvent>>,
    message: RefCell<String>,
    visible: Cell<bool>,
}

impl RecordingIndicator {
    pub(crate) fn events(&self) -> Vec<IndicatorEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn message(&self) -> String {
        self.message.borrow().clone()
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub(crate) fn hide_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| **event == IndicatorEvent::Hide)
            .count()
    }
}

impl LoadingIndicator for RecordingIndicator {
    fn show(&self, message: &str) {
        *self.message.borrow_mut() = message.to_string();
        self.visible.set(true);
        self.events.borrow_mut().push(IndicatorEvent::Show);
    }

    fn set_message(&self, message: &str) {
        *self.message.borrow_mut() = message.to_string();
    }

    fn hide(&self) {
        self.visible.set(false);
        self.events.borrow_mut().push(IndicatorEvent::Hide);
    }
}

#[derive(Default)]
pub(crate) struct RecordingModal {
    shown: RefCell<Vec<(String, ModalBody)>>,
}

impl RecordingModal {
    pub(crate) fn shown(&self) -> Vec<(String, ModalBody)> {
        self.shown.borrow().clone()
    }
}

impl ErrorModal for RecordingModal {
    fn show(&self, title: &str, body: ModalBody) {
        self.shown.borrow_mut().push((title.to_string(), body));
    }
}

#[derive(Default)]
pub(crate) struct RecordingControl {
    history: RefCell<Vec<bool>>,
}

impl RecordingControl {
    pub(crate) fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }

    pub(crate) fn is_disabled(&self) -> bool {
        self.history.borrow().last().copied().unwrap_or(false)
    }
}

impl Control for RecordingControl {
    fn set_disabled(&self, disabled: bool) {
        self.history.borrow_mut().push(disabled);
    }
}

/// Virtual clock: tasks run only when the test advances time.
#[derive(Default)]
pub(crate) struct ManualScheduler {
    now: Cell<Duration>,
    tasks: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
    pub(crate) fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut tasks = self.tasks.borrow_mut();
                let due = tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, (at, _))| *at <= target)
                    .min_by_key(|(_, (at, _))| *at)
                    .map(|(index, _)| index);
                due.map(|index| tasks.remove(index))
            };
            match next {
                Some((at, task)) => {
                    self.now.set(at);
                    task();
                }
                None => break,
            }
        }
        self.now.set(target);
    }

    pub(crate) fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let at = self.now.get() + delay;
        self.tasks.borrow_mut().push((at, task));
    }
}

/// Stand-in for a browser `FormData`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FakeForm;

pub(crate) struct Dispatched {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) encoding: BodyEncoding,
    pub(crate) multipart: bool,
    progress: Option<ProgressObserver>,
    settle: Option<Settle>,
}

/// Transport whose requests stay pending until the test settles them.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: RefCell<Vec<Dispatched>>,
}

impl ScriptedTransport {
    pub(crate) fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub(crate) fn inspect<R>(&self, index: usize, f: impl FnOnce(&Dispatched) -> R) -> R {
        f(&self.requests.borrow()[index])
    }

    pub(crate) fn progress(&self, index: usize, progress: UploadProgress) {
        let requests = self.requests.borrow();
        if let Some(observer) = &requests[index].progress {
            observer(progress);
        }
    }

    pub(crate) fn respond(&self, index: usize, body: Value) {
        self.settle(index, Ok(body));
    }

    pub(crate) fn fail(&self, index: usize, failure: TransportFailure) {
        self.settle(index, Err(failure));
    }

    fn settle(&self, index: usize, outcome: Result<Value, TransportFailure>) {
        let settle = self.requests.borrow_mut()[index]
            .settle
            .take()
            .unwrap_or_else(|| panic!("request {index} already settled"));
        settle(outcome);
    }
}

impl Transport for &ScriptedTransport {
    type Upload = FakeForm;

    fn dispatch(
        &self,
        request: PreparedRequest<FakeForm>,
        progress: Option<ProgressObserver>,
        settle: Settle,
    ) {
        self.requests.borrow_mut().push(Dispatched {
            method: request.method,
            url: request.url,
            encoding: request.encoding,
            multipart: request.payload.is_multipart(),
            progress,
            settle: Some(settle),
        });
    }
}
