//! Output layout and annotation records.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use somark_core::Annotation;

use crate::capture::PageMeta;
use crate::manager::BrowserError;
use crate::scroll::capture_names;

/// `anno/`, `marked/`, `som/` and `raw/` under one save directory.
#[derive(Debug, Clone)]
pub struct SaveDirs {
    root: PathBuf,
}

impl SaveDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create all four output directories.
    pub fn create(&self) -> Result<(), BrowserError> {
        for dir in [self.anno_dir(), self.marked_dir(), self.som_dir(), self.raw_dir()] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn anno_dir(&self) -> PathBuf {
        self.root.join("anno")
    }

    pub fn marked_dir(&self) -> PathBuf {
        self.root.join("marked")
    }

    pub fn som_dir(&self) -> PathBuf {
        self.root.join("som")
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    pub fn anno(&self, name: &str) -> PathBuf {
        self.anno_dir().join(format!("{}.json", name))
    }

    pub fn marked(&self, name: &str) -> PathBuf {
        self.marked_dir().join(format!("{}.png", name))
    }

    pub fn som(&self, name: &str) -> PathBuf {
        self.som_dir().join(format!("{}.png", name))
    }

    pub fn raw(&self, name: &str) -> PathBuf {
        self.raw_dir().join(format!("{}.png", name))
    }

    /// Whether any capture of document `name` already has its record.
    pub fn is_completed(&self, name: &str) -> bool {
        capture_names(name).iter().any(|capture| self.anno(capture).exists())
    }

    /// Remove the screenshots of capture `name`. Missing files are fine.
    pub fn discard_images(&self, name: &str) -> Result<(), BrowserError> {
        for path in [self.marked(name), self.som(name), self.raw(name)] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Remove screenshots of every capture of document `name` that never got
    /// its annotation record.
    pub fn discard_unrecorded(&self, name: &str) -> Result<(), BrowserError> {
        for capture in capture_names(name) {
            if !self.anno(&capture).exists() {
                self.discard_images(&capture)?;
            }
        }
        Ok(())
    }
}

/// The JSON written for one capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    /// File name shared by the three screenshots.
    pub image: String,
    /// `[width, height]`.
    pub viewport: [u32; 2],
    pub elements: Vec<Annotation>,
}

impl DocumentRecord {
    pub fn new(meta: PageMeta, name: &str, viewport: (u32, u32), elements: Vec<Annotation>) -> Self {
        Self {
            url: meta.url,
            title: meta.title,
            description: meta.description,
            keywords: meta.keywords,
            image: format!("{}.png", name),
            viewport: [viewport.0, viewport.1],
            elements,
        }
    }
}

/// Write pretty JSON to `path` through a temporary sibling and a rename, so a
/// reader never sees a partial file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), BrowserError> {
    let json = serde_json::to_string_pretty(value)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BrowserError::ActionFailed(format!("Bad output path: {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(json.as_bytes())?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
