//! Content loader - scans a source root and turns files into items

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;
use thiserror::Error;
use walkdir::WalkDir;

use super::frontmatter::{self, FrontMatterError, MetaParse};
use super::item::ContentItem;
use super::markdown::{BodyRender, RenderError};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Text encoding of content files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-8 with an optional BOM, stripped when present
    #[serde(rename = "utf-8-sig")]
    Utf8Sig,
}

impl Encoding {
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<&'a str, Utf8Error> {
        let bytes = match self {
            Encoding::Utf8 => bytes,
            Encoding::Utf8Sig => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
        };
        std::str::from_utf8(bytes)
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Utf8Sig
    }
}

/// Where one kind of content lives and how its files are interpreted
pub struct ContentSource {
    pub root: PathBuf,
    /// File name suffixes that mark content files, e.g. `.markdown`
    pub extensions: Vec<String>,
    pub encoding: Encoding,
    pub meta: Box<dyn MetaParse>,
    pub body: Box<dyn BodyRender>,
}

impl ContentSource {
    pub fn new(
        root: PathBuf,
        extensions: Vec<String>,
        encoding: Encoding,
        meta: Box<dyn MetaParse>,
        body: Box<dyn BodyRender>,
    ) -> Self {
        Self {
            root,
            extensions,
            encoding,
            meta,
            body,
        }
    }
}

/// A single file that failed to load; the rest of the batch is unaffected
#[derive(Debug, Error)]
#[error("{}: {kind}", .path.display())]
pub struct FileError {
    pub path: PathBuf,
    pub kind: FileErrorKind,
}

#[derive(Debug, Error)]
pub enum FileErrorKind {
    #[error("unreadable: {0}")]
    Read(#[source] io::Error),
    #[error("not valid UTF-8: {0}")]
    Decode(#[source] Utf8Error),
    #[error("{0}")]
    FrontMatter(#[source] FrontMatterError),
    #[error("{0}")]
    Render(#[source] RenderError),
    #[error("derived path {path:?} already taken by {}", .existing.display())]
    DuplicatePath { path: String, existing: PathBuf },
    #[error("date {value:?} is not a recognized date")]
    UnparseableDate { value: String },
}

/// Whole-batch failure; nothing was loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("content root {} is unavailable: {source}", .root.display())]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of scanning one source: loaded items plus per-file failures
#[derive(Debug)]
pub struct LoadOutcome {
    pub items: Vec<ContentItem>,
    pub errors: Vec<FileError>,
}

/// Loads content items from a [`ContentSource`]
pub struct ContentLoader<'a> {
    source: &'a ContentSource,
}

impl<'a> ContentLoader<'a> {
    pub fn new(source: &'a ContentSource) -> Self {
        Self { source }
    }

    /// Scan the source root and load every matching file.
    ///
    /// The walk is sorted by file name, so item order and duplicate
    /// resolution do not depend on directory iteration order. A file
    /// that fails to decode, parse, or render is recorded in the
    /// outcome and skipped.
    pub fn load(&self) -> Result<LoadOutcome, LoadError> {
        let root = &self.source.root;
        let meta = fs::metadata(root).map_err(|e| LoadError::RootUnavailable {
            root: root.clone(),
            source: e,
        })?;
        if !meta.is_dir() {
            return Err(LoadError::RootUnavailable {
                root: root.clone(),
                source: io::Error::other("not a directory"),
            });
        }

        let mut items = Vec::new();
        let mut errors = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            let Some(extension) = self.matched_extension(&name) else {
                continue;
            };

            let relative = path.strip_prefix(root).unwrap_or(path);
            let item_path = derive_path(relative, extension);

            if let Some(existing) = seen.get(&item_path) {
                errors.push(FileError {
                    path: path.to_path_buf(),
                    kind: FileErrorKind::DuplicatePath {
                        path: item_path,
                        existing: existing.clone(),
                    },
                });
                continue;
            }

            match self.load_file(path, item_path.clone()) {
                Ok(item) => {
                    seen.insert(item_path, path.to_path_buf());
                    items.push(item);
                }
                Err(kind) => {
                    errors.push(FileError {
                        path: path.to_path_buf(),
                        kind,
                    });
                }
            }
        }

        Ok(LoadOutcome { items, errors })
    }

    /// Load a single file into an item
    fn load_file(&self, path: &Path, item_path: String) -> Result<ContentItem, FileErrorKind> {
        let bytes = fs::read(path).map_err(FileErrorKind::Read)?;
        let text = self
            .source
            .encoding
            .decode(&bytes)
            .map_err(FileErrorKind::Decode)?;

        let (meta_block, body_block) = frontmatter::split(text).map_err(FileErrorKind::FrontMatter)?;
        let metadata = self
            .source
            .meta
            .parse(meta_block)
            .map_err(FileErrorKind::FrontMatter)?;
        let body = self
            .source
            .body
            .render(body_block)
            .map_err(FileErrorKind::Render)?;

        Ok(ContentItem {
            path: item_path,
            metadata,
            body,
            source: path.to_path_buf(),
        })
    }

    /// The configured extension this file name ends with, if any
    fn matched_extension(&self, name: &str) -> Option<&str> {
        self.source
            .extensions
            .iter()
            .find(|ext| name.ends_with(ext.as_str()))
            .map(|ext| ext.as_str())
    }
}

/// Derive an item path from a relative file path: slash separators,
/// matched extension stripped
fn derive_path(relative: &Path, extension: &str) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    joined
        .strip_suffix(extension)
        .map(|s| s.to_string())
        .unwrap_or(joined)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
