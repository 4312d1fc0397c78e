use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared modification counter of a sample buffer.
///
/// Clones observe the same counter, so a delayed task can hold one and compare it with the value
/// captured when it was scheduled.
#[derive(Debug, Clone, Default)]
pub struct VersionStamp(Arc<AtomicU64>);

impl VersionStamp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Advance the counter, returning the new version.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Sample text paired with a grammar, plus its version stamp.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    text: String,
    version: VersionStamp,
}

impl SampleBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: VersionStamp::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> u64 {
        self.version.current()
    }

    pub fn stamp(&self) -> VersionStamp {
        self.version.clone()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.version.bump();
    }
}

/// One sample buffer per grammar document.
#[derive(Debug)]
pub struct SampleRegistry<K> {
    buffers: HashMap<K, SampleBuffer>,
}

impl<K: Eq + Hash> SampleRegistry<K> {
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
        }
    }

    /// The buffer for `key`, created empty on first use.
    pub fn attach(&mut self, key: K) -> &mut SampleBuffer {
        self.buffers.entry(key).or_default()
    }

    pub fn get(&self, key: &K) -> Option<&SampleBuffer> {
        self.buffers.get(key)
    }

    /// Replace the sample text for `key`, attaching a buffer if needed.
    pub fn update(&mut self, key: K, text: impl Into<String>) -> &SampleBuffer {
        let buffer = self.attach(key);
        buffer.set_text(text);
        buffer
    }

    /// Drop the buffer for `key`. Its stamp is bumped so pending work sees it as stale.
    pub fn release(&mut self, key: &K) -> Option<SampleBuffer> {
        let buffer = self.buffers.remove(key)?;
        buffer.version.bump();
        Some(buffer)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.buffers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl<K: Eq + Hash> Default for SampleRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_are_shared_between_clones() {
        let stamp = VersionStamp::new();
        let observer = stamp.clone();
        assert_eq!(observer.current(), 0);
        assert_eq!(stamp.bump(), 1);
        assert_eq!(observer.current(), 1);
    }

    #[test]
    fn updates_bump_the_version() {
        let mut buffer = SampleBuffer::new("a");
        let before = buffer.version();
        buffer.set_text("ab");
        assert_eq!(buffer.text(), "ab");
        assert!(buffer.version() > before);
    }

    #[test]
    fn registry_lifecycle() {
        let mut registry = SampleRegistry::new();
        assert!(registry.get(&"g").is_none());

        registry.attach("g");
        assert_eq!(registry.get(&"g").map(SampleBuffer::text), Some(""));

        let stamp = registry.update("g", "x y").stamp();
        let version = stamp.current();
        assert_eq!(registry.len(), 1);

        let released = registry.release(&"g").expect("buffer was attached");
        assert_eq!(released.text(), "x y");
        assert!(stamp.current() > version);
        assert!(registry.is_empty());
        assert!(registry.release(&"g").is_none());
    }
}
