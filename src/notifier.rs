//! Process-wide alert surface.
//!
//! There is exactly one alert slot. A [`Notifier`] is a cheap handle onto it that any
//! component may hold; the presentation layer subscribes once and renders whatever the
//! slot currently holds. Raising an alert while one is visible replaces its text.

use crate::model::Alert;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Notifier {
    slot: Arc<watch::Sender<Alert>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(Alert::default());
        Self {
            slot: Arc::new(slot),
        }
    }

    pub fn show(&self, text: impl Into<String>) {
        let text = text.into();
        info!(%text, "alert");
        self.slot.send_replace(Alert {
            visible: true,
            text: Some(text),
        });
    }

    /// Hide the alert. The last text is kept but not shown.
    pub fn dismiss(&self) {
        self.slot.send_if_modified(|alert| {
            let was_visible = alert.visible;
            alert.visible = false;
            was_visible
        });
    }

    pub fn current(&self) -> Alert {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Alert> {
        self.slot.subscribe()
    }
}
