#[cfg(test)]
mod tests {
    use crate::storage::{pick_storage, FileStorage, MemoryStorage};

    use convo_core::ports::StoragePort;
    use convo_core::store::ThreadStore;
    use convo_types::thread::Message;

    use std::rc::Rc;

    use futures::executor::block_on;

    // ─── MemoryStorage Tests ─────────────────────────────────

    #[test]
    fn test_memory_set_get_remove() {
        block_on(async {
            let storage = MemoryStorage::new();
            assert!(storage.get("k").await.unwrap().is_none());

            storage.set("k", "v1").await.unwrap();
            assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v1"));

            storage.set("k", "v2").await.unwrap();
            assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v2"));

            storage.remove("k").await.unwrap();
            assert!(storage.get("k").await.unwrap().is_none());
            // removing again is a no-op
            storage.remove("k").await.unwrap();
        });
    }

    #[test]
    fn test_memory_list_keys_and_exists() {
        block_on(async {
            let storage = MemoryStorage::new();
            storage.set("convo.threads", "[]").await.unwrap();
            storage.set("convo.activeThread", "t1").await.unwrap();
            storage.set("other", "x").await.unwrap();

            let mut keys = storage.list_keys("convo.").await.unwrap();
            keys.sort();
            assert_eq!(keys, vec!["convo.activeThread", "convo.threads"]);

            assert!(storage.exists("other").await.unwrap());
            assert!(!storage.exists("missing").await.unwrap());
            assert_eq!(storage.backend_name(), "memory");
        });
    }

    // ─── FileStorage Tests ───────────────────────────────────

    #[test]
    fn test_file_set_get_remove() {
        block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileStorage::open(dir.path()).unwrap();

            assert!(storage.get("k").await.unwrap().is_none());
            storage.set("k", "v1").await.unwrap();
            assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v1"));

            storage.set("k", "v2").await.unwrap();
            assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v2"));

            storage.remove("k").await.unwrap();
            assert!(storage.get("k").await.unwrap().is_none());
            storage.remove("k").await.unwrap();
        });
    }

    #[test]
    fn test_file_values_survive_reopen() {
        block_on(async {
            let dir = tempfile::tempdir().unwrap();
            {
                let storage = FileStorage::open(dir.path()).unwrap();
                storage.set("convo.threads", "[1,2,3]").await.unwrap();
            }
            let storage = FileStorage::open(dir.path()).unwrap();
            assert_eq!(
                storage.get("convo.threads").await.unwrap().as_deref(),
                Some("[1,2,3]")
            );
        });
    }

    #[test]
    fn test_file_set_leaves_no_temp_files() {
        block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileStorage::open(dir.path()).unwrap();
            storage.set("convo.threads", "[]").await.unwrap();
            storage.set("convo.threads", "[{}]").await.unwrap();

            let leftovers: Vec<_> = std::fs::read_dir(dir.path())
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
                .collect();
            assert!(leftovers.is_empty());
        });
    }

    #[test]
    fn test_file_list_keys() {
        block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileStorage::open(dir.path()).unwrap();
            storage.set("convo.threads", "[]").await.unwrap();
            storage.set("convo.activeThread", "t1").await.unwrap();
            storage.set("unrelated", "x").await.unwrap();

            let mut keys = storage.list_keys("convo.").await.unwrap();
            keys.sort();
            assert_eq!(keys, vec!["convo.activeThread", "convo.threads"]);
            assert_eq!(storage.backend_name(), "file");
        });
    }

    #[test]
    fn test_file_keys_are_sanitized() {
        block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileStorage::open(dir.path()).unwrap();
            storage.set("weird/../key", "v").await.unwrap();
            assert_eq!(
                storage.get("weird/../key").await.unwrap().as_deref(),
                Some("v")
            );
            // nothing escaped the root
            assert!(dir.path().join("weird_.._key.kv").exists());
        });
    }

    // ─── Backend Selection Tests ─────────────────────────────

    #[test]
    fn test_pick_storage_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = pick_storage(Some(dir.path().to_path_buf()));
        assert_eq!(storage.backend_name(), "file");
    }

    #[test]
    fn test_pick_storage_memory_when_no_root() {
        let storage = pick_storage(None);
        assert_eq!(storage.backend_name(), "memory");
    }

    #[test]
    fn test_pick_storage_falls_back_on_bad_root() {
        // a plain file cannot serve as a storage root
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let storage = pick_storage(Some(blocker.path().to_path_buf()));
        assert_eq!(storage.backend_name(), "memory");
    }

    // ─── Store-over-FileStorage Tests ────────────────────────

    #[test]
    fn test_thread_store_roundtrip_on_disk() {
        block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let thread_id = {
                let storage = Rc::new(FileStorage::open(dir.path()).unwrap());
                let store = ThreadStore::open(storage).await;
                let thread = store.create_thread(Some("on disk")).await.unwrap();
                store
                    .append_message(&thread.id, Message::user("on disk"))
                    .await
                    .unwrap();
                store
                    .append_message(&thread.id, Message::assistant("persisted"))
                    .await
                    .unwrap();
                store.select(&thread.id).await.unwrap();
                thread.id
            };

            let storage = Rc::new(FileStorage::open(dir.path()).unwrap());
            let store = ThreadStore::open(storage).await;
            let threads = store.list_threads();
            assert_eq!(threads.len(), 1);
            assert_eq!(threads[0].id, thread_id);
            assert_eq!(threads[0].messages.len(), 2);
            assert_eq!(threads[0].messages[1].content, "persisted");
            assert_eq!(store.active_id(), Some(thread_id));
        });
    }

    #[test]
    fn test_thread_store_recovers_from_corrupt_file() {
        block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let storage = FileStorage::open(dir.path()).unwrap();
            storage
                .set(convo_core::store::THREADS_KEY, "{ truncated snapsho")
                .await
                .unwrap();

            let store = ThreadStore::open(Rc::new(storage)).await;
            assert!(store.list_threads().is_empty());
        });
    }
}
