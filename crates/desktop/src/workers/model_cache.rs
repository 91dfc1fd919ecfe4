use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use rollcall_core::detection::infrastructure::model_resolver;
use rollcall_core::shared::constants::{YOLO_MODEL_NAME, YOLO_MODEL_URL};

type Resolved = Option<Result<PathBuf, String>>;

/// Resolves the face detection model in the background at startup, so a
/// capture started later finds it ready or waits for the download.
pub struct ModelCache {
    result: Mutex<Resolved>,
    ready: Condvar,
    progress: Mutex<(u64, u64)>,
}

impl ModelCache {
    /// Create a new `ModelCache` and begin resolving the model in the background.
    pub fn new() -> Arc<Self> {
        let cache = Arc::new(Self::unresolved());
        let resolving = cache.clone();
        thread::spawn(move || resolving.resolve());
        cache
    }

    pub(crate) fn unresolved() -> Self {
        Self {
            result: Mutex::new(None),
            ready: Condvar::new(),
            progress: Mutex::new((0, 0)),
        }
    }

    fn resolve(self: Arc<Self>) {
        log::info!("Resolving model: {YOLO_MODEL_NAME}");
        let reporter = self.clone();
        let result = model_resolver::resolve(
            YOLO_MODEL_NAME,
            YOLO_MODEL_URL,
            None,
            Some(Box::new(move |downloaded, total| {
                *lock(&reporter.progress) = (downloaded, total);
            })),
        );
        if let Err(e) = &result {
            log::error!("Face detection model unavailable: {e}");
        }
        self.finish(result.map_err(|e| e.to_string()));
    }

    fn finish(&self, result: Result<PathBuf, String>) {
        *lock(&self.result) = Some(result);
        self.ready.notify_all();
    }

    /// Wait for the model path. Calls `on_progress(downloaded, total)`
    /// while a download is in progress. Returns early if `cancelled` is set.
    pub fn wait_for_model(
        &self,
        on_progress: &dyn Fn(u64, u64),
        cancelled: &AtomicBool,
    ) -> Result<PathBuf, String> {
        let mut guard = lock(&self.result);
        loop {
            if cancelled.load(Ordering::Relaxed) {
                return Err("Cancelled".into());
            }
            if let Some(ref result) = *guard {
                return result.clone();
            }
            if let Ok(progress) = self.progress.try_lock() {
                let (dl, total) = *progress;
                if dl > 0 {
                    on_progress(dl, total);
                }
            }
            guard = self
                .ready
                .wait_timeout(guard, Duration::from_millis(100))
                .map(|(g, _)| g)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
impl ModelCache {
    /// A cache that already holds `result`, without touching the network.
    pub fn resolved(result: Result<PathBuf, String>) -> Arc<Self> {
        let cache = Self::unresolved();
        cache.finish(result);
        Arc::new(cache)
    }
}
