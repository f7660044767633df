//! In-memory zip assembly for batch exports.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use layoutkit_core::RenderError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a zip archive in memory, keeping entries in insertion order.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
    entries: Vec<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Adds an entry and returns the name it was stored under. A name already
    /// in the archive gets a numeric suffix before its extension.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<String, RenderError> {
        let name = self.unique_name(name);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(name.as_str(), options)
            .map_err(archive_error)?;
        self.writer.write_all(bytes).map_err(archive_error)?;
        self.names.insert(name.clone());
        self.entries.push(name.clone());
        Ok(name)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the central directory and returns the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        let cursor = self.writer.finish().map_err(archive_error)?;
        Ok(cursor.into_inner())
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{ext}")),
            None => (name, String::new()),
        };
        (2..)
            .map(|n| format!("{stem}_{n}{ext}"))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn archive_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Archive {
        reason: err.to_string(),
    }
}
