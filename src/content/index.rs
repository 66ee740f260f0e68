//! In-memory content index with atomically swapped snapshots

use arc_swap::ArcSwap;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

use super::item::{ContentItem, UNTAGGED};
use super::loader::{ContentLoader, ContentSource, FileError, FileErrorKind, LoadError};
use crate::helpers::date::parse_date_value;

/// Snapshot of all loaded pages
#[derive(Debug, Default)]
pub struct PageSet {
    pub pages: Vec<Arc<ContentItem>>,
    pub by_path: HashMap<String, Arc<ContentItem>>,
}

/// Snapshot of all loaded posts, date-descending
#[derive(Debug, Default)]
pub struct PostSet {
    pub posts: Vec<Arc<ContentItem>>,
    pub by_path: HashMap<String, Arc<ContentItem>>,
    /// Tag buckets in first-seen order; each bucket keeps the global
    /// post order
    pub by_tag: IndexMap<String, Vec<Arc<ContentItem>>>,
}

impl PostSet {
    pub fn with_tag(&self, tag: &str) -> Option<&[Arc<ContentItem>]> {
        self.by_tag.get(tag).map(|posts| posts.as_slice())
    }
}

/// Counters from one successful load of one content kind
#[derive(Debug)]
pub struct LoadStats {
    pub loaded: usize,
    pub errors: Vec<FileError>,
}

/// Outcome of reloading both content kinds; each kind fails or
/// succeeds on its own
#[derive(Debug)]
pub struct ReloadReport {
    pub pages: Result<LoadStats, LoadError>,
    pub posts: Result<LoadStats, LoadError>,
}

impl ReloadReport {
    pub fn is_ok(&self) -> bool {
        self.pages.is_ok() && self.posts.is_ok()
    }
}

/// Owns the content sources and the current snapshots.
///
/// Readers grab a snapshot and keep a consistent view for as long as
/// they hold it; a reload builds a complete replacement off to the
/// side and swaps it in with a single store. A failed reload leaves
/// the previous snapshot serving.
pub struct ContentIndex {
    page_source: ContentSource,
    post_source: ContentSource,
    pages: ArcSwap<PageSet>,
    posts: ArcSwap<PostSet>,
}

impl ContentIndex {
    /// Create an empty index over the two content sources
    pub fn new(page_source: ContentSource, post_source: ContentSource) -> Self {
        Self {
            page_source,
            post_source,
            pages: ArcSwap::from_pointee(PageSet::default()),
            posts: ArcSwap::from_pointee(PostSet::default()),
        }
    }

    /// Reload pages and swap the page snapshot
    pub fn load_pages(&self) -> Result<LoadStats, LoadError> {
        let outcome = ContentLoader::new(&self.page_source).load()?;

        let mut pages = Vec::with_capacity(outcome.items.len());
        let mut by_path = HashMap::with_capacity(outcome.items.len());
        for item in outcome.items {
            let item = Arc::new(item);
            by_path.insert(item.path.clone(), item.clone());
            pages.push(item);
        }

        let loaded = pages.len();
        self.pages.store(Arc::new(PageSet { pages, by_path }));
        Ok(LoadStats {
            loaded,
            errors: outcome.errors,
        })
    }

    /// Reload posts and swap the post snapshot.
    ///
    /// Posts without a `date` key are drafts and stay out of the
    /// snapshot; a `date` that does not parse is a recorded error.
    /// Posts are sorted date-descending (ties keep scan order) and
    /// then bucketed by tag, so every bucket is a subsequence of the
    /// full list. Posts with no tags land in the `untagged` bucket.
    pub fn load_posts(&self) -> Result<LoadStats, LoadError> {
        let outcome = ContentLoader::new(&self.post_source).load()?;
        let mut errors = outcome.errors;

        let mut dated: Vec<(NaiveDateTime, ContentItem)> = Vec::new();
        for item in outcome.items {
            match item.metadata.get("date") {
                None => {
                    tracing::debug!("Skipping undated post {:?}", item.source);
                }
                Some(value) => match parse_date_value(value) {
                    Some(date) => dated.push((date, item)),
                    None => errors.push(FileError {
                        path: item.source.clone(),
                        kind: FileErrorKind::UnparseableDate {
                            value: yaml_to_display(value),
                        },
                    }),
                },
            }
        }

        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let mut posts = Vec::with_capacity(dated.len());
        let mut by_path = HashMap::with_capacity(dated.len());
        let mut by_tag: IndexMap<String, Vec<Arc<ContentItem>>> = IndexMap::new();
        for (_, mut item) in dated {
            let tags = match item.metadata.tags() {
                Some(tags) if !tags.is_empty() => tags,
                _ => {
                    let tags = vec![UNTAGGED.to_string()];
                    item.metadata.set_tags(tags.clone());
                    tags
                }
            };
            let item = Arc::new(item);
            for tag in tags {
                by_tag.entry(tag).or_default().push(item.clone());
            }
            by_path.insert(item.path.clone(), item.clone());
            posts.push(item);
        }

        let loaded = posts.len();
        self.posts.store(Arc::new(PostSet {
            posts,
            by_path,
            by_tag,
        }));
        Ok(LoadStats { loaded, errors })
    }

    /// Reload both kinds; a failure in one does not stop the other
    pub fn load_all(&self) -> ReloadReport {
        ReloadReport {
            pages: self.load_pages(),
            posts: self.load_posts(),
        }
    }

    /// Current page snapshot
    pub fn pages(&self) -> Arc<PageSet> {
        self.pages.load_full()
    }

    /// Current post snapshot
    pub fn posts(&self) -> Arc<PostSet> {
        self.posts.load_full()
    }

    pub fn page_by_path(&self, path: &str) -> Option<Arc<ContentItem>> {
        self.pages.load().by_path.get(path).cloned()
    }

    pub fn post_by_path(&self, path: &str) -> Option<Arc<ContentItem>> {
        self.posts.load().by_path.get(path).cloned()
    }

    pub fn posts_with_tag(&self, tag: &str) -> Vec<Arc<ContentItem>> {
        self.posts
            .load()
            .by_tag
            .get(tag)
            .cloned()
            .unwrap_or_default()
    }

    /// All known tags, in bucket order
    pub fn tags(&self) -> Vec<String> {
        self.posts.load().by_tag.keys().cloned().collect()
    }
}

fn yaml_to_display(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim_end()
            .to_string(),
    }
}
