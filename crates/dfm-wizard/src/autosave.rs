//! Periodic autosave
//!
//! A tokio task ticks on a fixed interval, locks the page controller and
//! calls its timer hook. The first tick fires one full period after start.
//! Events produced by the hook are forwarded on a channel; the task ends
//! when the receiver is dropped or the handle is aborted.

use crate::controller::PageController;
use dfm_form::FormEvent;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle of a running autosave task
#[derive(Debug)]
pub struct Autosave {
    handle: JoinHandle<()>,
}

impl Autosave {
    /// Start autosaving `controller` every `period`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<C>(
        controller: Arc<Mutex<C>>,
        period: Duration,
        events: UnboundedSender<FormEvent>,
    ) -> Self
    where
        C: PageController + ?Sized + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let mut produced = Vec::new();
                {
                    let mut page = controller.lock();
                    tracing::debug!(page = %page.page(), "autosave tick");
                    page.on_timer(&mut produced);
                }
                for event in produced {
                    if events.send(event).is_err() {
                        tracing::debug!("autosave receiver gone, stopping");
                        return;
                    }
                }
            }
        });
        Self { handle }
    }

    /// Stop the task
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the task has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
