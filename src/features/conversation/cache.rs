//! Fixed-capacity LRU store of channel conversations

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use super::history::Conversation;

/// Conversation state keyed by channel id, least recently used entry evicted first.
///
/// Contents live only in memory and are lost on restart. The lock is never held
/// across an `.await`.
pub struct ConversationCache {
    entries: Mutex<LruCache<String, Conversation>>,
}

impl ConversationCache {
    /// Create a cache holding at most `capacity` channels (a zero capacity is raised to one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        ConversationCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Copy of the channel's conversation; counts as a use for eviction order
    pub fn get(&self, channel_id: &str) -> Option<Conversation> {
        self.lock().get(channel_id).cloned()
    }

    /// Store the channel's conversation, marking it most recently used
    pub fn set(&self, channel_id: &str, conversation: Conversation) {
        if let Some((evicted, _)) = self.lock().push(channel_id.to_string(), conversation) {
            if evicted != channel_id {
                log::debug!("Conversation cache full, evicted channel {evicted}");
            }
        }
    }

    pub fn channel_count(&self) -> usize {
        self.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Conversation>> {
        // A poisoned lock only means another handler panicked mid-update; the map itself is intact
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
