use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use super::FavoriteError;

pub fn flag_key(article_id: i64) -> String {
    format!("like_article_{article_id}")
}

/// Client-local "have I liked this" flags. Only the owning client writes them.
pub trait LikeFlagStore {
    fn load(&self, article_id: i64) -> Option<bool>;
    fn save(&mut self, article_id: i64, liked: bool) -> Result<(), FavoriteError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryFlagStore {
    flags: BTreeMap<String, bool>,
}

impl MemoryFlagStore {
    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

impl LikeFlagStore for MemoryFlagStore {
    fn load(&self, article_id: i64) -> Option<bool> {
        self.flags.get(&flag_key(article_id)).copied()
    }

    fn save(&mut self, article_id: i64, liked: bool) -> Result<(), FavoriteError> {
        self.flags.insert(flag_key(article_id), liked);
        Ok(())
    }
}

/// Flags kept in a JSON object on disk, so they outlive the process.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

impl FileFlagStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FavoriteError> {
        let path = path.as_ref().to_path_buf();
        let flags = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, flags })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LikeFlagStore for FileFlagStore {
    fn load(&self, article_id: i64) -> Option<bool> {
        self.flags.get(&flag_key(article_id)).copied()
    }

    fn save(&mut self, article_id: i64, liked: bool) -> Result<(), FavoriteError> {
        self.flags.insert(flag_key(article_id), liked);
        let contents = serde_json::to_vec_pretty(&self.flags)?;

        // write a sibling file and rename it over the old one, so a crash
        // never leaves a half written map behind
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&contents)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
