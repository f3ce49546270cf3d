//! Collaborator seams consumed by the request wrapper.
//!
//! # Design
//! - Everything runs on one event loop, so ports take `&self` and callbacks are
//!   plain boxed closures without `Send` bounds.
//! - The wasm bindings implement these against the DOM; tests use in-memory fakes.

use std::time::Duration;

use serde_json::Value;

use crate::core::indicator::UploadProgress;
use crate::core::request::PreparedRequest;
use crate::core::response::TransportFailure;

/// Page element that signals outstanding work.
pub trait LoadingIndicator {
    /// Make the indicator visible with the given message.
    fn show(&self, message: &str);
    /// Replace the message text without changing visibility.
    fn set_message(&self, message: &str);
    /// Hide the indicator, cancelling any in-progress reveal.
    fn hide(&self);
}

/// Form control that can be locked while a request is pending.
pub trait Control {
    /// Toggle the control's disabled state.
    fn set_disabled(&self, disabled: bool);
}

/// Deferred task runner (browser timers in production).
pub trait Scheduler {
    /// Run `task` once after `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Receives upload progress events for multipart bodies.
pub type ProgressObserver = Box<dyn Fn(UploadProgress)>;

/// Receives the single settlement of a dispatched request.
pub type Settle = Box<dyn FnOnce(Result<Value, TransportFailure>)>;

/// HTTP primitive the wrapper issues requests through.
pub trait Transport {
    /// Opaque multipart form handle (a browser `FormData` in production).
    type Upload;

    /// Issue `request`, reporting upload progress to `progress` when present and
    /// invoking `settle` exactly once with the outcome.
    fn dispatch(
        &self,
        request: PreparedRequest<Self::Upload>,
        progress: Option<ProgressObserver>,
        settle: Settle,
    );
}

/// Runs a detach action when dropped, so browser handlers are removed on every
/// exit path before the closures they point at are freed.
pub struct DetachOnDrop<F: FnOnce()> {
    detach: Option<F>,
}

impl<F: FnOnce()> DetachOnDrop<F> {
    /// Arm `detach` to run on drop.
    pub const fn new(detach: F) -> Self {
        Self {
            detach: Some(detach),
        }
    }
}

impl<F: FnOnce()> Drop for DetachOnDrop<F> {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DetachOnDrop;
    use std::cell::Cell;

    fn send(attached: &Cell<bool>, fail: bool) -> Result<(), &'static str> {
        attached.set(true);
        let _detach = DetachOnDrop::new(|| attached.set(false));
        if fail {
            return Err("send rejected");
        }
        assert!(attached.get());
        Ok(())
    }

    #[test]
    fn handler_is_detached_on_early_return() {
        let attached = Cell::new(false);
        assert_eq!(send(&attached, true), Err("send rejected"));
        assert!(!attached.get());
    }

    #[test]
    fn handler_is_detached_after_completion() {
        let attached = Cell::new(false);
        assert_eq!(send(&attached, false), Ok(()));
        assert!(!attached.get());
    }
}
