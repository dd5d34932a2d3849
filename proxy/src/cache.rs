//! Edge cache for GET responses.
//!
//! Keyed by the full request URL. Entries expire after the TTL they were
//! stored with; when the cache is full the oldest entry is evicted. Writers
//! racing on one key are last-writer-wins, which is harmless because the
//! cached content is the same within its TTL window.

use axum::body::Bytes;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// A stored upstream response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: String,
    pub cache_control: String,
    pub body: Bytes,
}

struct Entry {
    response: CachedResponse,
    expires_at: Instant,
}

struct Inner {
    entries: HashMap<String, Entry>,
    order: VecDeque<String>,
}

pub struct EdgeCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl EdgeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
        }
    }

    /// Fresh entry for `key`, if any. Expired entries are dropped on access.
    pub async fn get(&self, key: &str) -> Option<CachedResponse> {
        let mut inner = self.inner.lock().await;
        let expired = match inner.entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                return Some(entry.response.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
        }
        None
    }

    pub async fn put(&self, key: &str, response: CachedResponse, ttl: Duration) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock().await;
        let entry = Entry {
            response,
            expires_at: Instant::now() + ttl,
        };
        if inner.entries.insert(key.to_string(), entry).is_some() {
            return;
        }
        inner.order.push_back(key.to_string());
        while inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.entries.remove(&evicted);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
