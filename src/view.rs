//! Presentation seam
//!
//! The controller never touches a screen directly. Everything the player
//! should see is expressed as an [`UpdateMessage`] and handed to a [`View`],
//! which may render it natively, forward it over a bridge as JSON, or simply
//! record it.

use serde::Serialize;
use serde_with::{DurationMilliSeconds, serde_as};
use web_time::Duration;

use super::UpdateMessage;

/// Which of the three screens is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreenKind {
    /// Player entry form
    Setup,
    /// A round is being played
    Playing,
    /// Final standings
    GameOver,
}

/// How prominently a notice should be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Neutral information
    Info,
    /// Something went wrong but the game can continue
    Warning,
}

/// A transient message shown for a limited time
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Text to display
    pub text: String,
    /// Display style
    pub severity: Severity,
    /// How long the notice stays visible
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub duration: Duration,
}

impl Notice {
    /// Creates an informational notice
    pub fn info(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
            duration,
        }
    }

    /// Creates a warning notice
    pub fn warning(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Warning,
            duration,
        }
    }
}

/// Trait for delivering display updates to whatever renders the game
///
/// Implementations must be cheap to call; they are invoked while the game
/// state is locked and must not call back into the controller.
pub trait View: Send + Sync {
    /// Delivers a single update
    ///
    /// # Arguments
    ///
    /// * `message` - The update to display
    fn send(&self, message: &UpdateMessage);
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// View that keeps every update it receives
    #[derive(Debug, Default)]
    pub(crate) struct RecordingView {
        messages: Mutex<Vec<UpdateMessage>>,
    }

    impl RecordingView {
        /// Removes and returns the recorded updates
        pub(crate) fn take(&self) -> Vec<UpdateMessage> {
            std::mem::take(&mut *self.messages.lock())
        }
    }

    impl View for RecordingView {
        fn send(&self, message: &UpdateMessage) {
            self.messages.lock().push(message.clone());
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::testing::RecordingView;
    use super::*;

    #[test]
    fn test_notice_serializes_duration_as_millis() {
        let notice = Notice::warning("Photo failed to load", Duration::from_millis(3000));
        let json = serde_json::to_string(&notice).unwrap();
        assert!(json.contains(r#""duration":3000"#));
        assert!(json.contains("Warning"));
    }

    #[test]
    fn test_recording_view() {
        let view = RecordingView::default();
        view.send(&UpdateMessage::Busy(true));
        view.send(&UpdateMessage::Screen(ScreenKind::Setup));

        let messages = view.take();
        assert_eq!(messages.len(), 2);
        assert!(view.take().is_empty());
    }
}
