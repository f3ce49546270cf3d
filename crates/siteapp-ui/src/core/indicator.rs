//! Shared loading-indicator lifecycle for concurrent wrapped requests.
//!
//! # Design
//! - One counter for every wrapped request on the page; the indicator is hidden
//!   only when it drains to zero.
//! - Reveals are delayed by the caller's scheduler. Each drain bumps an epoch so
//!   a reveal scheduled before the drain never fires for a later request.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::core::ports::LoadingIndicator;

/// Byte counts reported while a multipart body uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes sent so far.
    pub loaded: u64,
    /// Total body size, when the transport can compute it.
    pub total: Option<u64>,
}

impl UploadProgress {
    /// Rounded completion percentage, or `None` when the total is unknown.
    #[must_use]
    pub fn percent(self) -> Option<u64> {
        let total = self.total.filter(|total| *total > 0)?;
        let total = u128::from(total);
        let rounded = (u128::from(self.loaded) * 200 + total) / (2 * total);
        u64::try_from(rounded).ok()
    }
}

/// Proof that a reveal was scheduled during a particular busy period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShowTicket(u64);

/// What happened to the indicator when a request settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drain {
    /// Other wrapped requests are still outstanding.
    Pending(usize),
    /// Counter reached zero and the indicator was hidden.
    Hidden,
    /// Counter reached zero but the indicator was left as-is for a navigation.
    KeptVisible,
}

#[derive(Clone, Copy, Debug, Default)]
struct Counter {
    in_flight: usize,
    epoch: u64,
}

/// Owner of the in-flight counter and the indicator element.
pub struct IndicatorController {
    indicator: Rc<dyn LoadingIndicator>,
    loading_message: String,
    counter: Cell<Counter>,
}

impl IndicatorController {
    /// Build a controller around `indicator` using `loading_message` as the reset text.
    pub fn new(indicator: Rc<dyn LoadingIndicator>, loading_message: impl Into<String>) -> Self {
        Self {
            indicator,
            loading_message: loading_message.into(),
            counter: Cell::new(Counter::default()),
        }
    }

    /// Number of wrapped requests that have not settled yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.counter.get().in_flight
    }

    /// Register a new outstanding request.
    pub fn begin(&self) -> ShowTicket {
        let mut counter = self.counter.get();
        counter.in_flight += 1;
        self.counter.set(counter);
        debug!(in_flight = counter.in_flight, "wrapped request started");
        ShowTicket(counter.epoch)
    }

    /// Reveal the indicator if the busy period that issued `ticket` is still running.
    ///
    /// Returns whether the indicator was shown.
    pub fn show_if_pending(&self, ticket: ShowTicket) -> bool {
        let counter = self.counter.get();
        if counter.in_flight == 0 || counter.epoch != ticket.0 {
            return false;
        }
        self.indicator.show(&self.loading_message);
        true
    }

    /// Record a settled request.
    ///
    /// `keep_visible` applies only when this settlement drains the counter.
    pub fn end(&self, keep_visible: bool) -> Drain {
        let mut counter = self.counter.get();
        if counter.in_flight == 0 {
            warn!("wrapped request settled with no outstanding requests");
        }
        counter.in_flight = counter.in_flight.saturating_sub(1);
        if counter.in_flight > 0 {
            self.counter.set(counter);
            return Drain::Pending(counter.in_flight);
        }

        counter.epoch = counter.epoch.wrapping_add(1);
        self.counter.set(counter);
        if keep_visible {
            debug!("keeping loading indicator for navigation");
            return Drain::KeptVisible;
        }
        self.indicator.hide();
        Drain::Hidden
    }

    /// Reflect upload progress in the indicator message.
    pub fn report_progress(&self, progress: UploadProgress) {
        if let Some(percent) = progress.percent() {
            self.indicator.set_message(&format!("{} {percent}%", self.loading_message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{IndicatorEvent, RecordingIndicator};

    fn controller() -> (Rc<RecordingIndicator>, IndicatorController) {
        let indicator = Rc::new(RecordingIndicator::default());
        let controller = IndicatorController::new(indicator.clone(), "Loading...");
        (indicator, controller)
    }

    #[test]
    fn percent_rounds_and_requires_total() {
        let half = UploadProgress {
            loaded: 1,
            total: Some(2),
        };
        assert_eq!(half.percent(), Some(50));
        let third = UploadProgress {
            loaded: 2,
            total: Some(3),
        };
        assert_eq!(third.percent(), Some(67));
        let unknown = UploadProgress {
            loaded: 10,
            total: None,
        };
        assert_eq!(unknown.percent(), None);
        let empty = UploadProgress {
            loaded: 0,
            total: Some(0),
        };
        assert_eq!(empty.percent(), None);
    }

    #[test]
    fn hides_once_after_last_request() {
        let (indicator, controller) = controller();
        controller.begin();
        controller.begin();
        controller.begin();
        assert_eq!(controller.end(false), Drain::Pending(2));
        assert_eq!(controller.end(false), Drain::Pending(1));
        assert!(indicator.events().is_empty());
        assert_eq!(controller.end(false), Drain::Hidden);
        assert_eq!(indicator.events(), vec![IndicatorEvent::Hide]);
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn keep_visible_skips_hide_on_drain() {
        let (indicator, controller) = controller();
        let ticket = controller.begin();
        assert!(controller.show_if_pending(ticket));
        assert_eq!(controller.end(true), Drain::KeptVisible);
        assert!(indicator.is_visible());
    }

    #[test]
    fn stale_ticket_does_not_reveal_for_next_request() {
        let (indicator, controller) = controller();
        let stale = controller.begin();
        controller.end(false);
        let fresh = controller.begin();
        assert!(!controller.show_if_pending(stale));
        assert!(!indicator.is_visible());
        assert!(controller.show_if_pending(fresh));
        assert_eq!(indicator.message(), "Loading...");
    }

    #[test]
    fn underflow_is_clamped() {
        let (_indicator, controller) = controller();
        assert_eq!(controller.end(false), Drain::Hidden);
        assert_eq!(controller.in_flight(), 0);
        controller.begin();
        assert_eq!(controller.in_flight(), 1);
    }

    #[test]
    fn progress_updates_message_only() {
        let (indicator, controller) = controller();
        controller.report_progress(UploadProgress {
            loaded: 25,
            total: Some(100),
        });
        assert_eq!(indicator.message(), "Loading... 25%");
        assert!(!indicator.is_visible());
        controller.report_progress(UploadProgress {
            loaded: 30,
            total: None,
        });
        assert_eq!(indicator.message(), "Loading... 25%");
    }
}
