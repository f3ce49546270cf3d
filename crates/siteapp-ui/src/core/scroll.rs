//! Smooth-scroll target computation.

/// Distance kept between the viewport top and the scrolled-to element.
pub const DEFAULT_SCROLL_OFFSET: f64 = 50.0;

/// Document scroll position that places an element `offset` units below the
/// viewport top, clamped to the document start.
///
/// `element_top` is the element's top edge relative to the viewport and
/// `current_scroll` the document's current vertical scroll position.
#[must_use]
pub fn scroll_destination(element_top: f64, current_scroll: f64, offset: f64) -> f64 {
    (current_scroll + element_top - offset).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_leaves_offset_above_element() {
        let destination = scroll_destination(300.0, 0.0, DEFAULT_SCROLL_OFFSET);
        assert!((destination - 250.0).abs() < f64::EPSILON);
        assert!((scroll_destination(-100.0, 1_000.0, 50.0) - 850.0).abs() < f64::EPSILON);
    }

    #[test]
    fn destination_never_goes_above_document_start() {
        assert!(scroll_destination(20.0, 0.0, 50.0).abs() < f64::EPSILON);
        assert!(scroll_destination(-500.0, 100.0, 50.0).abs() < f64::EPSILON);
    }
}
