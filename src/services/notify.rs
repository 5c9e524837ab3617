//! Detection alerts for defenders

use crate::core::error::{IntelError, Result};
use crate::core::types::PlayerId;
use crate::espionage::result::MissionResult;
use crate::ui::render::render_detection_alert;

/// Delivers "you were spied on" alerts to defenders
pub trait Notifier {
    fn notify_detected(&mut self, result: &MissionResult) -> Result<()>;
}

/// An alert queued for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionAlert {
    pub recipient: PlayerId,
    pub message: String,
}

/// Keeps alerts in an outbox instead of sending them anywhere
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub outbox: Vec<DetectionAlert>,
    offline: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails
    pub fn offline() -> Self {
        Self {
            outbox: Vec::new(),
            offline: true,
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify_detected(&mut self, result: &MissionResult) -> Result<()> {
        if self.offline {
            return Err(IntelError::Notification(format!(
                "recipient {} unreachable",
                result.target().id
            )));
        }

        self.outbox.push(DetectionAlert {
            recipient: result.target().id,
            message: render_detection_alert(result),
        });
        Ok(())
    }
}
