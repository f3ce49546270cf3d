//! Browser timer scheduler.

use std::time::Duration;

use gloo::timers::callback::Timeout;

use crate::core::ports::Scheduler;

pub(crate) struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}
