//! coldpress: a blog engine that serves or freezes front-matter content
//!
//! Pages and posts live as plain files with a metadata head and a
//! body. They are loaded into an in-memory index and either served by
//! a local development server that reloads before every request, or
//! frozen into a static file tree ready for any web host.

pub mod config;
pub mod content;
pub mod freeze;
pub mod helpers;
pub mod render;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentIndex, ContentSource, MarkdownRenderer, RawBody, YamlMeta};

/// A blog rooted in one directory
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Where page files live
    pub page_root: PathBuf,
    /// Where post files live
    pub post_root: PathBuf,
    /// Files served verbatim under /static
    pub static_dir: PathBuf,
    /// Freeze output directory
    pub freeze_dir: PathBuf,
}

impl Blog {
    /// Open a blog from a directory, reading blog.yml when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("blog.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let page_root = base_dir.join(&config.page_root);
        let post_root = base_dir.join(&config.post_root);
        let static_dir = base_dir.join(&config.static_dir);
        let freeze_dir = base_dir.join(&config.freeze_destination);

        Ok(Self {
            config,
            base_dir,
            page_root,
            post_root,
            static_dir,
            freeze_dir,
        })
    }

    /// Build an empty content index over this blog's sources.
    ///
    /// Page bodies pass through as-is; post bodies are rendered from
    /// markdown. Both kinds carry YAML metadata.
    pub fn index(&self) -> ContentIndex {
        let pages = ContentSource::new(
            self.page_root.clone(),
            self.config.page_extensions.clone(),
            self.config.page_encoding,
            Box::new(YamlMeta),
            Box::new(RawBody),
        );
        let posts = ContentSource::new(
            self.post_root.clone(),
            self.config.post_extensions.clone(),
            self.config.post_encoding,
            Box::new(YamlMeta),
            Box::new(MarkdownRenderer::new()),
        );
        ContentIndex::new(pages, posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_blog_resolves_directories_from_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("blog.yml"),
            "page_root: content/pages\npost_root: content/posts\nfreeze_destination: out\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.page_root, dir.path().join("content/pages"));
        assert_eq!(blog.post_root, dir.path().join("content/posts"));
        assert_eq!(blog.freeze_dir, dir.path().join("out"));
    }

    #[test]
    fn test_blog_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.page_root, dir.path().join("page"));
        assert_eq!(blog.post_root, dir.path().join("post"));
        assert_eq!(blog.config.port, 8000);
    }

    #[test]
    fn test_index_loads_both_kinds() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("page")).unwrap();
        fs::create_dir(dir.path().join("post")).unwrap();
        fs::write(
            dir.path().join("page/about.html"),
            "title: About\n\n<p>raw html stays</p>\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("post/hello.markdown"),
            "title: Hello\ndate: 2020-01-25\n\n# Heading\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let index = blog.index();
        let report = index.load_all();
        assert!(report.is_ok());

        let about = index.page_by_path("about").unwrap();
        assert!(about.body.contains("<p>raw html stays</p>"));

        let hello = index.post_by_path("hello").unwrap();
        assert!(hello.body.contains("<h1>Heading</h1>"));
    }
}
