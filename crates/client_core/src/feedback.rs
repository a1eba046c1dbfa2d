use std::time::Duration;

use shared::domain::Mode;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::media::MediaTarget;

/// Everything the controller wants the page to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Short overlay centred on a video.
    Feedback {
        target: String,
        text: String,
        display_for: Duration,
    },
    /// Page-level toast.
    Notification {
        message: String,
        is_error: bool,
        display_for: Duration,
    },
    SessionStateChanged {
        active: bool,
    },
    ModeChanged(Mode),
    TargetSelected {
        index: usize,
        label: String,
    },
}

impl ControllerEvent {
    pub fn status_indicator_text(active: bool) -> &'static str {
        if active {
            "System Status: Active"
        } else {
            "System Status: Inactive"
        }
    }
}

/// Fans transient feedback out to subscribers. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct FeedbackPresenter {
    events: broadcast::Sender<ControllerEvent>,
    feedback_duration: Duration,
    notification_duration: Duration,
}

impl FeedbackPresenter {
    pub fn new(feedback_duration: Duration, notification_duration: Duration) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            events,
            feedback_duration,
            notification_duration,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn command_feedback(&self, target: &dyn MediaTarget, text: &str) {
        let label = target.label();
        info!(target_label = %label, feedback = text, "feedback");
        self.emit(ControllerEvent::Feedback {
            target: label,
            text: text.to_string(),
            display_for: self.feedback_duration,
        });
    }

    pub fn notify(&self, message: impl Into<String>, is_error: bool) {
        let message = message.into();
        if is_error {
            warn!(%message, "notification");
        } else {
            info!(%message, "notification");
        }
        self.emit(ControllerEvent::Notification {
            message,
            is_error,
            display_for: self.notification_duration,
        });
    }

    pub fn emit(&self, event: ControllerEvent) {
        // No subscribers is fine: nobody is rendering.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SimulatedVideo;

    #[test]
    fn feedback_reaches_subscribers() {
        let presenter = FeedbackPresenter::new(Duration::from_millis(1500), Duration::from_secs(3));
        let mut rx = presenter.subscribe();
        let video = SimulatedVideo::new("a.mp4", 10.0);

        presenter.command_feedback(&video, "Play");

        assert_eq!(
            rx.try_recv().expect("event"),
            ControllerEvent::Feedback {
                target: "a.mp4".into(),
                text: "Play".into(),
                display_for: Duration::from_millis(1500),
            }
        );
    }

    #[test]
    fn emitting_without_subscribers_is_silent() {
        let presenter = FeedbackPresenter::new(Duration::from_millis(1500), Duration::from_secs(3));
        presenter.notify("nobody listening", true);
    }
}
