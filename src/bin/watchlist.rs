//! Client-side watchlist: a list of company ids saved as a JSON array.

use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_WATCHLIST_PATH: &str = "stock-watchlist.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    ids: Vec<u32>,
    path: Option<PathBuf>,
}

impl Watchlist {
    /// Load from `path`. A missing file is an empty watchlist.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let ids = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str::<Vec<u32>>(&raw)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            ids,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Add `id` if absent, remove it otherwise. Returns true when it is now watched.
    pub fn toggle(&mut self, id: u32) -> bool {
        if let Some(pos) = self.ids.iter().position(|&x| x == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Toggle `id` and persist. On a failed write the toggle is undone, so
    /// memory and file keep agreeing.
    pub fn toggle_and_save(&mut self, id: u32) -> io::Result<bool> {
        let watched = self.toggle(id);
        if let Err(e) = self.save() {
            self.toggle(id);
            return Err(e);
        }
        Ok(watched)
    }

    /// Write back to the file it was loaded from. No-op for an in-memory list.
    pub fn save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string(&self.ids)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut w = Watchlist::default();
        assert!(w.toggle(4));
        assert!(w.toggle(9));
        assert!(w.contains(4));
        assert!(!w.toggle(4));
        assert!(!w.contains(4));
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let w = Watchlist::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(w.len(), 0);
    }

    #[test]
    fn saved_ids_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");

        let mut w = Watchlist::load(&path).unwrap();
        w.toggle(1);
        w.toggle(7);
        w.save().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1,7]");
        let reloaded = Watchlist::load(&path).unwrap();
        assert!(reloaded.contains(1) && reloaded.contains(7));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Watchlist::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn failed_save_undoes_the_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        let mut w = Watchlist::load(&path).unwrap();
        assert!(w.toggle_and_save(2).unwrap());

        // The parent directory disappears, so the next write fails.
        drop(dir);
        assert!(w.toggle_and_save(5).is_err());
        assert!(!w.contains(5));
        assert!(w.toggle_and_save(2).is_err());
        assert!(w.contains(2));
        assert_eq!(w.len(), 1);
    }
}
