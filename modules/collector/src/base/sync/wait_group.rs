use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Completion barrier for a group of workers.
///
/// Each call to [`WaitGroup::worker`] registers one worker; the returned guard
/// deregisters it when dropped, including when the owning task unwinds.
/// [`WaitGroup::wait`] resolves once no registered worker remains.
pub(crate) struct WaitGroup {
    counter: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl WaitGroup {
    pub fn new() -> Self {
        WaitGroup {
            counter: Arc::new(AtomicUsize::new(0)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn worker(&self) -> WaitGroupWorker {
        WaitGroupWorker::new(self.counter.clone(), self.notify.clone())
    }

    #[allow(unused)]
    pub fn pending(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }

    pub async fn wait(&self) {
        while self.counter.load(Ordering::SeqCst) > 0 {
            self.notify.notified().await;
        }
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct WaitGroupWorker {
    counter: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl WaitGroupWorker {
    fn new(counter: Arc<AtomicUsize>, notify: Arc<Notify>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter, notify }
    }
}

impl Drop for WaitGroupWorker {
    fn drop(&mut self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notify.notify_one();
        }
    }
}
