//! File batches for upload.
//!
//! A directory selection keeps its structure: every entry collected from a
//! directory carries a `/`-separated relative path that starts with the
//! directory's own name, e.g. `Sorghum_dataset/2024-05-01/P1/P1_frame8.tif`.

use std::fs;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::{ClientError, FailureKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub relative_path: Option<String>,
    pub content: Vec<u8>,
}

impl FileEntry {
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            relative_path: None,
            content: content.into(),
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    /// Reads a single file; its server-visible name is the base name.
    pub fn read(path: &Path) -> Result<Self, ClientError> {
        let content = fs::read(path).map_err(|err| io_error(path, err))?;
        Ok(Self::from_bytes(base_name(path), content))
    }

    /// Name the server sees: the relative path when present, else the base name.
    pub fn upload_name(&self) -> &str {
        match self.relative_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => &self.name,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("tif" | "tiff") => "image/tiff",
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("json") => "application/json",
            Some("csv") => "text/csv",
            _ => "application/octet-stream",
        }
    }
}

/// Collects every regular file below `root`, sorted by path.
pub fn collect_directory(root: &Path) -> Result<Vec<FileEntry>, ClientError> {
    if !root.is_dir() {
        return Err(ClientError::new(
            FailureKind::Io,
            format!("{} is not a directory", root.display()),
        ));
    }
    let root_name = directory_name(root)?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|err| ClientError::new(FailureKind::Io, err.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let below = path
            .strip_prefix(root)
            .map_err(|err| ClientError::new(FailureKind::Io, err.to_string()))?;
        let relative = std::iter::once(root_name.clone())
            .chain(below.components().filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            }))
            .collect::<Vec<_>>()
            .join("/");

        let content = fs::read(path).map_err(|err| io_error(path, err))?;
        entries.push(FileEntry::from_bytes(base_name(path), content).with_relative_path(relative));
    }
    Ok(entries)
}

fn directory_name(root: &Path) -> Result<String, ClientError> {
    if let Some(name) = root.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }
    // `.` or `..` have no file name of their own.
    let canonical = root.canonicalize().map_err(|err| io_error(root, err))?;
    Ok(canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default())
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn io_error(path: &Path, err: std::io::Error) -> ClientError {
    ClientError::new(FailureKind::Io, format!("{}: {err}", path.display()))
}
