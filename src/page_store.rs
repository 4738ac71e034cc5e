use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Remembers the last page the reader was on between sessions.
pub trait PageStore {
    /// The stored page, if there is a usable one.
    fn load(&self) -> Option<u32>;
    fn save(&self, page: u32) -> Result<()>;

    /// The page to open at: the stored page, or `start_page` when nothing
    /// usable was stored. Page 0 counts as nothing stored.
    fn initial_page(&self, start_page: u32) -> u32 {
        self.load().filter(|p| *p > 0).unwrap_or(start_page)
    }
}

/// Keeps the page number as decimal text in a single file.
pub struct FilePageStore {
    path: PathBuf,
}

impl FilePageStore {
    pub fn new(path: &Path) -> Self {
        FilePageStore {
            path: path.to_path_buf(),
        }
    }
}

impl PageStore for FilePageStore {
    fn load(&self) -> Option<u32> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
    }

    fn save(&self, page: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory: {:?}", parent))?;
        }
        fs::write(&self.path, page.to_string())
            .with_context(|| format!("Failed to write page state: {:?}", self.path))
    }
}
