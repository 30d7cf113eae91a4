use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use uuid::Uuid;

use crate::infrastructure::index::vector_index::{VectorIndex, VectorIndexError};

const INDEX_FILE: &str = "index.json";
const TMP_FILE: &str = "index.json.tmp";

/// Disk-persisted per-project vector indices.
///
/// Layout: `{root}/{project_id}/index.json`, fully reconstructable from the
/// path alone. Writes go through a temp file and a rename so a half-written
/// index is never loadable. Loaded indices sit in a bounded LRU cache that is
/// invalidated whenever a project's index is rebuilt.
pub struct VectorIndexStore {
    root: PathBuf,
    cache: Mutex<LruCache<Uuid, Arc<VectorIndex>>>,
}

impl VectorIndexStore {
    pub fn new(root: PathBuf, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            root,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn index_dir(&self, project_id: Uuid) -> PathBuf {
        self.root.join(project_id.to_string())
    }

    fn index_file(&self, project_id: Uuid) -> PathBuf {
        self.index_dir(project_id).join(INDEX_FILE)
    }

    /// Write the index for a project, replacing any previous one at the same
    /// location, and drop the stale cache entry.
    pub fn persist(&self, project_id: Uuid, index: &VectorIndex) -> Result<(), VectorIndexError> {
        let dir = self.index_dir(project_id);
        std::fs::create_dir_all(&dir)
            .map_err(|e| VectorIndexError::Storage(format!("create {}: {}", dir.display(), e)))?;

        let json = serde_json::to_string(index)
            .map_err(|e| VectorIndexError::Storage(format!("serialize index: {}", e)))?;

        let tmp = dir.join(TMP_FILE);
        let target = dir.join(INDEX_FILE);
        std::fs::write(&tmp, json)
            .map_err(|e| VectorIndexError::Storage(format!("write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &target).map_err(|e| {
            VectorIndexError::Storage(format!("rename into {}: {}", target.display(), e))
        })?;

        self.invalidate(project_id);
        Ok(())
    }

    /// Load a project's index, via the cache when warm. Absent and corrupt
    /// files both surface as `IndexNotFound`; the caller degrades to a
    /// retrieval-free context.
    pub fn load(&self, project_id: Uuid) -> Result<Arc<VectorIndex>, VectorIndexError> {
        if let Some(index) = self.cache_get(project_id) {
            return Ok(index);
        }

        let index = Arc::new(read_index(&self.index_file(project_id))?);
        self.cache_put(project_id, index.clone());
        Ok(index)
    }

    pub fn invalidate(&self, project_id: Uuid) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.pop(&project_id);
    }

    fn cache_get(&self, project_id: Uuid) -> Option<Arc<VectorIndex>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(&project_id).cloned()
    }

    fn cache_put(&self, project_id: Uuid, index: Arc<VectorIndex>) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(project_id, index);
    }
}

fn read_index(path: &Path) -> Result<VectorIndex, VectorIndexError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| VectorIndexError::IndexNotFound(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| VectorIndexError::IndexNotFound(format!("{}: corrupt index: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DocumentChunk;

    fn sample_index() -> VectorIndex {
        let chunks = vec![
            DocumentChunk::new("background section".to_string(), 0),
            DocumentChunk::new("methodology section".to_string(), 1),
            DocumentChunk::new("results section".to_string(), 2),
        ];
        let embeddings = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        VectorIndex::build(&chunks, embeddings).unwrap()
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorIndexStore::new(dir.path().to_path_buf(), 4);
        let project_id = Uuid::new_v4();
        let index = sample_index();

        store.persist(project_id, &index).unwrap();
        let loaded = store.load(project_id).unwrap();

        let query = [0.0, 1.0, 0.0];
        let before = index.query(&query, 3);
        let after = loaded.query(&query, 3);
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.text, b.text);
            assert!((a.score - b.score).abs() < 1e-6);
        }
    }

    #[test]
    fn test_load_missing_is_index_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorIndexStore::new(dir.path().to_path_buf(), 4);
        let result = store.load(Uuid::new_v4());
        assert!(matches!(result, Err(VectorIndexError::IndexNotFound(_))));
    }

    #[test]
    fn test_load_corrupt_is_index_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorIndexStore::new(dir.path().to_path_buf(), 4);
        let project_id = Uuid::new_v4();

        let index_dir = store.index_dir(project_id);
        std::fs::create_dir_all(&index_dir).unwrap();
        std::fs::write(index_dir.join(INDEX_FILE), "{ not json").unwrap();

        let result = store.load(project_id);
        assert!(matches!(result, Err(VectorIndexError::IndexNotFound(_))));
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorIndexStore::new(dir.path().to_path_buf(), 4);
        let project_id = Uuid::new_v4();

        store.persist(project_id, &sample_index()).unwrap();
        assert!(store.index_dir(project_id).join(INDEX_FILE).exists());
        assert!(!store.index_dir(project_id).join(TMP_FILE).exists());
    }

    #[test]
    fn test_rebuild_replaces_and_invalidates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorIndexStore::new(dir.path().to_path_buf(), 4);
        let project_id = Uuid::new_v4();

        store.persist(project_id, &sample_index()).unwrap();
        let first = store.load(project_id).unwrap();
        assert_eq!(first.len(), 3);

        let rebuilt = VectorIndex::build(
            &[DocumentChunk::new("only chunk".to_string(), 0)],
            vec![vec![1.0, 0.0]],
        )
        .unwrap();
        store.persist(project_id, &rebuilt).unwrap();

        let second = store.load(project_id).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second.dimension(), 2);
    }

    #[test]
    fn test_cache_serves_repeat_loads() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorIndexStore::new(dir.path().to_path_buf(), 4);
        let project_id = Uuid::new_v4();
        store.persist(project_id, &sample_index()).unwrap();

        let first = store.load(project_id).unwrap();
        // Remove the backing file; a cached load must still succeed.
        std::fs::remove_file(store.index_dir(project_id).join(INDEX_FILE)).unwrap();
        let second = store.load(project_id).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // After invalidation the store goes back to disk and fails.
        store.invalidate(project_id);
        assert!(matches!(
            store.load(project_id),
            Err(VectorIndexError::IndexNotFound(_))
        ));
    }
}
