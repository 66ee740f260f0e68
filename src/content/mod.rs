//! Content module - items, loading, indexing, and pagination

mod frontmatter;
mod index;
mod item;
pub mod loader;
mod markdown;
mod pagination;

pub use frontmatter::{FrontMatterError, MetaParse, YamlMeta};
pub use index::{ContentIndex, LoadStats, PageSet, PostSet, ReloadReport};
pub use item::{ContentItem, Metadata, UNTAGGED};
pub use loader::{ContentLoader, ContentSource, Encoding, FileError, LoadError, LoadOutcome};
pub use markdown::{BodyRender, MarkdownRenderer, RawBody, RenderError};
pub use pagination::{Pagination, PaginationError};
