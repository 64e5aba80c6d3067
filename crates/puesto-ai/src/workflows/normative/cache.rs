use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use tracing::debug;

use super::index::{NormativeFragment, NormativeIndex};

/// Memoizes built indexes by the content hash of their corpus.
///
/// Callers own the cache and hand it to whatever needs an index; nothing is
/// kept in process-global state.
#[derive(Debug, Default)]
pub struct NormativeIndexCache {
    indexes: Mutex<HashMap<[u8; 32], Arc<NormativeIndex>>>,
}

impl NormativeIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn corpus_key(fragments: &[NormativeFragment]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for fragment in fragments {
            hasher.update(fragment.id.as_bytes());
            hasher.update([0u8]);
            hasher.update(fragment.source.as_bytes());
            hasher.update([0u8]);
            hasher.update(fragment.text.as_bytes());
            hasher.update([0xffu8]);
        }
        hasher.finalize().into()
    }

    pub fn get_or_build(&self, fragments: &[NormativeFragment]) -> Arc<NormativeIndex> {
        let key = Self::corpus_key(fragments);
        let mut guard = self
            .indexes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(index) = guard.get(&key) {
            debug!(fragments = fragments.len(), "normative index cache hit");
            return Arc::clone(index);
        }

        debug!(fragments = fragments.len(), "building normative index");
        let index = Arc::new(NormativeIndex::build(fragments.iter().cloned()));
        guard.insert(key, Arc::clone(&index));
        index
    }

    pub fn len(&self) -> usize {
        self.indexes
            .lock()
            .map(|guard| guard.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.indexes.lock() {
            guard.clear();
        }
    }
}
