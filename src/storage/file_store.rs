//! Directory-tree entity store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::EntityStore;

/// Stores each entity as a file at `<root>/<entity>/<id>`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn entity_dir(&self, entity: &str) -> PathBuf {
        self.root.join(entity)
    }

    fn entity_file(&self, entity: &str, id: &str) -> PathBuf {
        self.entity_dir(entity).join(id)
    }
}

impl EntityStore for FileStore {
    fn create(&self, entity: &str) -> io::Result<String> {
        let dir = self.entity_dir(entity);
        fs::create_dir_all(&dir)?;

        let id = Uuid::new_v4().to_string();
        fs::File::create(dir.join(&id))?;
        Ok(id)
    }

    fn read(&self, entity: &str, id: &str) -> io::Result<String> {
        fs::read_to_string(self.entity_file(entity, id))
    }

    fn write(&self, entity: &str, id: &str, data: &str) -> io::Result<()> {
        let file = self.entity_file(entity, id);
        if !file.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such entity: {entity}/{id}"),
            ));
        }
        fs::write(file, data)
    }

    fn put(&self, entity: &str, id: &str, data: &str) -> io::Result<()> {
        let dir = self.entity_dir(entity);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(id), data)
    }

    fn delete(&self, entity: &str, id: &str) -> io::Result<()> {
        let file = self.entity_file(entity, id);
        if !file.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such entity: {entity}/{id}"),
            ));
        }
        fs::remove_file(file)
    }

    fn list(&self, entity: &str) -> io::Result<Vec<String>> {
        let dir = self.entity_dir(entity);
        let mut ids = Vec::new();
        for dir_entry in fs::read_dir(dir)? {
            let dir_entry = dir_entry?;
            if dir_entry.file_type()?.is_file() {
                ids.push(dir_entry.file_name().to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, entity: &str, id: &str) -> bool {
        self.entity_file(entity, id).exists()
    }

    fn data_root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_create_then_read_round_trip() {
        let (_dir, store) = store();
        let id = store.create("Shoes").unwrap();
        store.write("Shoes", &id, "{\"size\": 10}").unwrap();
        assert_eq!(store.read("Shoes", &id).unwrap(), "{\"size\": 10}");
    }

    #[test]
    fn test_write_to_missing_entity_fails() {
        let (_dir, store) = store();
        assert!(store.write("Shoes", "nope", "{}").is_err());
    }

    #[test]
    fn test_put_creates_then_overwrites() {
        let (_dir, store) = store();
        store.put("Shoes", "chosen-id", "{\"v\": 1}").unwrap();
        assert!(store.exists("Shoes", "chosen-id"));
        store.put("Shoes", "chosen-id", "{\"v\": 2}").unwrap();
        assert_eq!(store.read("Shoes", "chosen-id").unwrap(), "{\"v\": 2}");
        assert!(store.data_root().ends_with("data"));
    }

    #[test]
    fn test_delete_removes_entity() {
        let (_dir, store) = store();
        let id = store.create("Shoes").unwrap();
        assert!(store.exists("Shoes", &id));
        store.delete("Shoes", &id).unwrap();
        assert!(!store.exists("Shoes", &id));
        assert!(store.delete("Shoes", &id).is_err());
    }

    #[test]
    fn test_list_returns_all_ids() {
        let (_dir, store) = store();
        let a = store.create("Books").unwrap();
        let b = store.create("Books").unwrap();
        let ids = store.list("Books").unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }

    #[test]
    fn test_list_unknown_entity_fails() {
        let (_dir, store) = store();
        assert!(store.list("Nothing").is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let (_dir, store) = store();
        let a = store.create("X").unwrap();
        let b = store.create("X").unwrap();
        assert_ne!(a, b);
    }
}
