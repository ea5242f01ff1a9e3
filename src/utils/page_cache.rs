use moka::future::Cache;
use std::time::Duration;

pub const ATTENDANCE_PAGE: &str = "/attendance";

/// Cache of fully rendered HTML pages, keyed by path. Held in actix app
/// data rather than a process-wide static so each server instance owns
/// its own copy.
#[derive(Clone)]
pub struct PageCache {
    inner: Cache<&'static str, String>,
}

impl PageCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(16) // a handful of pages at most
                .time_to_live(Duration::from_secs(ttl_secs))
                .build(),
        }
    }

    pub async fn get(&self, path: &'static str) -> Option<String> {
        self.inner.get(path).await
    }

    pub async fn put(&self, path: &'static str, html: String) {
        self.inner.insert(path, html).await;
    }

    pub async fn invalidate(&self, path: &'static str) {
        self.inner.invalidate(&path).await;
    }
}
