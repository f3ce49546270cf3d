//! Error modal contract.

/// Inline style applied to frames that render server error pages.
pub const FRAME_STYLE: &str = "width: 100%; height: 60vh;";

/// Content placed in the error modal body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalBody {
    /// Plain text, escaped by the renderer.
    Text(String),
    /// Full HTML document rendered inside an embedded frame.
    Frame {
        /// Document source written into the frame.
        document: String,
    },
}

/// Page dialog used to surface request errors.
pub trait ErrorModal {
    /// Display `body` under `title`.
    fn show(&self, title: &str, body: ModalBody);

    /// Display a plain-text message.
    fn show_text(&self, title: &str, text: &str) {
        self.show(title, ModalBody::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::RecordingModal;

    #[test]
    fn show_text_wraps_plain_body() {
        let modal = RecordingModal::default();
        modal.show_text("Error", "Nope.");
        assert_eq!(
            modal.shown(),
            vec![("Error".to_string(), ModalBody::Text("Nope.".to_string()))]
        );
    }
}
