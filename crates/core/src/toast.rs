use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastState {
    pub message: String,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct Slot {
    state: ToastState,
    generation: u64,
}

/// Transient message with a fixed auto-hide delay.
///
/// Each `notify` restarts the delay: a pending hide only applies if no newer
/// message arrived after it was scheduled. Scheduled hides are never cancelled.
#[derive(Debug, Clone)]
pub struct ToastNotifier {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

impl ToastNotifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    /// Shows `message` immediately. Must be called inside a Tokio runtime.
    pub fn notify(&self, message: impl Into<String>) {
        let deadline = Instant::now() + self.duration;
        let generation = {
            let mut slot = lock(&self.slot);
            slot.state = ToastState {
                message: message.into(),
                visible: true,
            };
            slot.generation += 1;
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            sleep_until(deadline).await;
            let mut slot = lock(&slot);
            if slot.generation == generation {
                slot.state = ToastState::default();
                debug!("toast hidden");
            }
        });
    }

    pub fn state(&self) -> ToastState {
        lock(&self.slot).state.clone()
    }

    pub fn is_visible(&self) -> bool {
        lock(&self.slot).state.visible
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
