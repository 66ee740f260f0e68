//! Route rendering - turns index snapshots into HTML pages

use anyhow::Result;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{ContentItem, Pagination, PostSet};
use crate::helpers::date::format_date;
use crate::templates::{ItemData, PagerData, SiteData, TagGroup, TemplateRenderer};

/// Renders every route of the site from content snapshots.
///
/// The same renderer backs the dev server and the freezer, so both
/// produce identical HTML for a given snapshot.
pub struct SiteRenderer {
    templates: TemplateRenderer,
    site: SiteData,
    per_page: usize,
}

impl SiteRenderer {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let templates = TemplateRenderer::new(&config.root)?;
        let site = SiteData {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
        };
        Ok(Self {
            templates,
            site,
            per_page: config.per_page,
        })
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    /// One page of the front listing; out-of-range pages render empty
    pub fn index(&self, posts: &PostSet, page: usize) -> Result<String> {
        let pagination = Pagination::new(&posts.posts, page, self.per_page)?;
        let items: Vec<ItemData> = pagination
            .items()
            .iter()
            .map(|post| item_data(post, true))
            .collect();

        let mut context = self.base_context();
        context.insert("posts", &items);
        context.insert(
            "pagination",
            &PagerData {
                current: pagination.page(),
                total: pagination.total_pages(),
                has_prev: pagination.has_prev(),
                has_next: pagination.has_next(),
                prev: page.saturating_sub(1),
                next: page + 1,
            },
        );
        self.templates.render("index.html", &context)
    }

    /// The archive of every tag, buckets in index order
    pub fn archive(&self, posts: &PostSet) -> Result<String> {
        let groups: Vec<TagGroup> = posts
            .by_tag
            .iter()
            .map(|(tag, posts)| TagGroup {
                tag: tag.clone(),
                posts: posts.iter().map(|post| item_data(post, false)).collect(),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("tag", &Option::<String>::None);
        context.insert("groups", &groups);
        self.templates.render("archive.html", &context)
    }

    /// The archive of one tag; `None` when the tag is unknown
    pub fn archive_tag(&self, posts: &PostSet, tag: &str) -> Result<Option<String>> {
        let Some(tagged) = posts.with_tag(tag) else {
            return Ok(None);
        };
        let items: Vec<ItemData> = tagged.iter().map(|post| item_data(post, false)).collect();

        let mut context = self.base_context();
        context.insert("tag", &Some(tag));
        context.insert("posts", &items);
        self.templates.render("archive.html", &context).map(Some)
    }

    pub fn page(&self, page: &ContentItem) -> Result<String> {
        let mut context = self.base_context();
        context.insert("page", &item_data(page, true));
        self.templates.render("page.html", &context)
    }

    pub fn post(&self, post: &ContentItem) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", &item_data(post, true));
        self.templates.render("post.html", &context)
    }
}

/// Shape an item for templates; listings skip the body
fn item_data(item: &ContentItem, with_body: bool) -> ItemData {
    let title = item
        .metadata
        .str("title")
        .map(|t| t.to_string())
        .unwrap_or_else(|| {
            item.path
                .rsplit('/')
                .next()
                .unwrap_or(&item.path)
                .to_string()
        });
    ItemData {
        path: item.path.clone(),
        title,
        date: item.metadata.date().map(|d| format_date(&d)),
        tags: item.metadata.tags().unwrap_or_default(),
        body: if with_body {
            item.body.clone()
        } else {
            String::new()
        },
    }
}

/// Pages the front listing splits into; at least one even when empty
pub fn index_page_count(posts: &PostSet, per_page: usize) -> Result<usize> {
    let pagination = Pagination::new(&posts.posts, 1, per_page)?;
    Ok(pagination.total_pages().max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Metadata, UNTAGGED};
    use indexmap::IndexMap;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn item(path: &str, yaml: &str, body: &str) -> Arc<ContentItem> {
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(yaml).unwrap();
        Arc::new(ContentItem {
            path: path.to_string(),
            metadata: Metadata::from(mapping),
            body: body.to_string(),
            source: PathBuf::from(format!("{path}.markdown")),
        })
    }

    fn post_set(posts: Vec<Arc<ContentItem>>) -> PostSet {
        let mut by_path = HashMap::new();
        let mut by_tag: IndexMap<String, Vec<Arc<ContentItem>>> = IndexMap::new();
        for post in &posts {
            by_path.insert(post.path.clone(), post.clone());
            for tag in post.metadata.tags().unwrap_or_default() {
                by_tag.entry(tag).or_default().push(post.clone());
            }
        }
        PostSet {
            posts,
            by_path,
            by_tag,
        }
    }

    fn renderer() -> SiteRenderer {
        let mut config = SiteConfig::default();
        config.title = "Test Blog".to_string();
        config.per_page = 2;
        SiteRenderer::new(&config).unwrap()
    }

    fn sample_posts() -> PostSet {
        post_set(vec![
            item(
                "hello",
                "title: Hello\ndate: 2020-02-01\ntags: [rust]",
                "<p>hi</p>",
            ),
            item(
                "2019/older",
                "title: Older\ndate: 2019-01-01\ntags: [rust, web]",
                "<p>old</p>",
            ),
            item("untitled", "date: 2018-01-01\ntags: [web]", "<p>u</p>"),
        ])
    }

    #[test]
    fn test_index_lists_posts_with_links() {
        let html = renderer().index(&sample_posts(), 1).unwrap();
        assert!(html.contains("Hello"));
        assert!(html.contains(r#"href="/post/hello/""#));
        assert!(html.contains("<p>hi</p>"));
        assert!(html.contains("2020-02-01"));
        // per_page is 2, so there is an older page
        assert!(html.contains(r#"href="/2/""#));
    }

    #[test]
    fn test_index_out_of_range_renders_empty() {
        let html = renderer().index(&sample_posts(), 99).unwrap();
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn test_index_title_falls_back_to_path_segment() {
        let html = renderer().index(&sample_posts(), 2).unwrap();
        assert!(html.contains(">untitled</a>"));
    }

    #[test]
    fn test_archive_groups_follow_bucket_order() {
        let html = renderer().archive(&sample_posts()).unwrap();
        let rust = html.find(r#"href="/archive/rust/""#).unwrap();
        let web = html.find(r#"href="/archive/web/""#).unwrap();
        assert!(rust < web);
    }

    #[test]
    fn test_archive_tag_known_and_unknown() {
        let r = renderer();
        let posts = sample_posts();
        let html = r.archive_tag(&posts, "web").unwrap().unwrap();
        assert!(html.contains("Older"));
        assert!(!html.contains(">Hello<"));
        assert!(r.archive_tag(&posts, "nope").unwrap().is_none());
    }

    #[test]
    fn test_page_and_post_render_bodies() {
        let r = renderer();
        let page = item("about", "title: About", "<p>about me</p>");
        let html = r.page(&page).unwrap();
        assert!(html.contains("About"));
        assert!(html.contains("<p>about me</p>"));

        let post = item("hello", "title: Hello\ndate: 2020-01-01", "<p>body</p>");
        let html = r.post(&post).unwrap();
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("2020-01-01"));
    }

    #[test]
    fn test_untagged_posts_render_default_tag_links() {
        let mut post = ContentItem {
            path: "plain".to_string(),
            metadata: Metadata::new(),
            body: String::new(),
            source: PathBuf::from("plain.markdown"),
        };
        post.metadata.set_tags(vec![UNTAGGED.to_string()]);
        let set = post_set(vec![Arc::new(post)]);
        let html = renderer().archive(&set).unwrap();
        assert!(html.contains(r#"href="/archive/untagged/""#));
    }

    #[test]
    fn test_index_page_count() {
        assert_eq!(index_page_count(&sample_posts(), 2).unwrap(), 2);
        assert_eq!(index_page_count(&post_set(Vec::new()), 10).unwrap(), 1);
    }

    #[test]
    fn test_zero_per_page_is_an_explicit_error() {
        let mut config = SiteConfig::default();
        config.per_page = 0;
        let r = SiteRenderer::new(&config).unwrap();
        assert!(r.index(&sample_posts(), 1).is_err());
    }
}
