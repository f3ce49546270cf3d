//! Smooth scrolling.

use gloo::utils::window;
use web_sys::{Element, ScrollBehavior, ScrollToOptions};

use crate::core::scroll::scroll_destination;

/// Animate the window so `element` sits `offset` pixels below the viewport top.
pub(crate) fn smooth_scroll_to(element: &Element, offset: f64) {
    let window = window();
    let current = window.scroll_y().unwrap_or(0.0);
    let top = element.get_bounding_client_rect().top();

    let options = ScrollToOptions::new();
    options.set_top(scroll_destination(top, current, offset));
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}
