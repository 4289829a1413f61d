use std::collections::HashMap;

/// Identifies one notified item: the same media id under two channels is two keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub channel_id: String,
    pub media_id: String,
}

impl DedupKey {
    pub fn new(channel_id: &str, media_id: &str) -> Self {
        DedupKey {
            channel_id: channel_id.to_string(),
            media_id: media_id.to_string(),
        }
    }
}

/// Keys that already produced a notification, with the item's publish time.
///
/// Grows for the lifetime of the process; nothing is ever removed.
#[derive(Debug, Default)]
pub struct DedupTracker {
    seen: HashMap<DedupKey, String>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.seen.contains_key(key)
    }

    /// Records `key`; returns `false` if it was already present.
    pub fn record(&mut self, key: DedupKey, published_at: &str) -> bool {
        if self.seen.contains_key(&key) {
            return false;
        }
        self.seen.insert(key, published_at.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
