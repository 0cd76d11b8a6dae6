use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::notification::model::{Toast, ToastKind};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

struct Entry {
    toast: Toast,
    expiry: Option<JoinHandle<()>>,
}

struct Shared {
    entries: Mutex<Vec<Entry>>,
    counter: AtomicU64,
    sender: watch::Sender<Vec<Toast>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, entries: &[Entry]) {
        self.sender
            .send_replace(entries.iter().map(|entry| entry.toast.clone()).collect());
    }

    /// Timer path; a toast already closed by hand is left alone.
    fn expire(&self, id: u64) {
        let mut entries = self.lock();
        if let Some(position) = entries.iter().position(|entry| entry.toast.id == id) {
            entries.remove(position);
            self.publish(&entries);
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let entries = self.entries.get_mut().unwrap_or_else(PoisonError::into_inner);
        for entry in entries.drain(..) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
    }
}

/// Ordered queue of toasts, each removed by its own timer or by `close`,
/// whichever comes first.
///
/// Clones share the same queue. Timers need a Tokio runtime; a toast opened
/// outside one stays until closed.
#[derive(Clone)]
pub struct NotificationQueue {
    shared: Arc<Shared>,
    default_duration: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl NotificationQueue {
    pub fn new(default_duration: Duration) -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(Vec::new()),
                counter: AtomicU64::new(0),
                sender,
            }),
            default_duration,
        }
    }

    pub fn open(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.open_for(kind, message, self.default_duration)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.open(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.open(ToastKind::Error, message)
    }

    /// Appends a toast and schedules its removal after `duration`.
    pub fn open_for(&self, kind: ToastKind, message: impl Into<String>, duration: Duration) -> u64 {
        let id = self.shared.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };

        let mut entries = self.shared.lock();
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let expiry = Handle::try_current().ok().map(|runtime| {
            runtime.spawn(async move {
                tokio::time::sleep(duration).await;
                if let Some(shared) = weak.upgrade() {
                    shared.expire(id);
                }
            })
        });
        entries.push(Entry { toast, expiry });
        self.shared.publish(&entries);
        id
    }

    /// Cancels the toast's timer, then removes it. Unknown ids are ignored.
    pub fn close(&self, id: u64) {
        let mut entries = self.shared.lock();
        let Some(position) = entries.iter().position(|entry| entry.toast.id == id) else {
            return;
        };
        if let Some(expiry) = entries[position].expiry.take() {
            expiry.abort();
        }
        entries.remove(position);
        self.shared.publish(&entries);
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.shared
            .lock()
            .iter()
            .map(|entry| entry.toast.clone())
            .collect()
    }

    /// Live view of the toast sequence, updated on every open and removal.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.shared.sender.subscribe()
    }
}
