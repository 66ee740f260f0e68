//! Built-in templates using the Tera template engine
//!
//! The whole theme is embedded in the binary; the site root is baked
//! into the URL functions at construction time.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::url;

/// Template renderer with the built-in theme loaded
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer whose URL functions resolve under `root`
    pub fn new(root: &str) -> Result<Self> {
        let mut tera = Tera::default();

        // The bodies are already rendered HTML, so no autoescaping
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("builtin/layout.html")),
            ("index.html", include_str!("builtin/index.html")),
            ("archive.html", include_str!("builtin/archive.html")),
            ("page.html", include_str!("builtin/page.html")),
            ("post.html", include_str!("builtin/post.html")),
        ])?;

        tera.register_function("url_index", url_index_fn(root.to_string()));
        tera.register_function("url_archive", url_archive_fn(root.to_string()));
        tera.register_function("url_page", url_item_fn("url_page", root.to_string(), url::url_page));
        tera.register_function("url_post", url_item_fn("url_post", root.to_string(), url::url_post));
        tera.register_function("url_static", url_static_fn(root.to_string()));

        Ok(Self { tera })
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera function: `url_index()` or `url_index(page=3)`
fn url_index_fn(root: String) -> impl tera::Function {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let page = match args.get("page") {
            Some(value) => value
                .as_u64()
                .ok_or_else(|| tera::Error::msg("url_index: `page` must be a number"))?
                as usize,
            None => 1,
        };
        Ok(tera::Value::String(url::url_index(&root, page)))
    }
}

/// Tera function: `url_archive()` or `url_archive(tag="rust")`
fn url_archive_fn(root: String) -> impl tera::Function {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let tag = match args.get("tag") {
            Some(value) => Some(
                value
                    .as_str()
                    .ok_or_else(|| tera::Error::msg("url_archive: `tag` must be a string"))?,
            ),
            None => None,
        };
        Ok(tera::Value::String(url::url_archive(&root, tag)))
    }
}

/// Tera function taking a `path` argument, e.g. `url_post(path="2020/hello")`
fn url_item_fn(
    name: &'static str,
    root: String,
    build: fn(&str, &str) -> String,
) -> impl tera::Function {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let path = args
            .get("path")
            .and_then(|value| value.as_str())
            .ok_or_else(|| tera::Error::msg(format!("{}: a `path` string is required", name)))?;
        Ok(tera::Value::String(build(&root, path)))
    }
}

/// Tera function: `url_static(file="style.css")`
fn url_static_fn(root: String) -> impl tera::Function {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let file = args
            .get("file")
            .and_then(|value| value.as_str())
            .ok_or_else(|| tera::Error::msg("url_static: a `file` string is required"))?;
        Ok(tera::Value::String(url::url_static(&root, file)))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
}

/// A page or post shaped for templates
#[derive(Debug, Clone, Serialize)]
pub struct ItemData {
    pub path: String,
    pub title: String,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagerData {
    pub current: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: usize,
    pub next: usize,
}

/// One tag's posts on the archive page
#[derive(Debug, Clone, Serialize)]
pub struct TagGroup {
    pub tag: String,
    pub posts: Vec<ItemData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_parse() {
        assert!(TemplateRenderer::new("/").is_ok());
    }

    #[test]
    fn test_url_functions_resolve_under_root() {
        let renderer = TemplateRenderer::new("/blog/").unwrap();
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: "T".to_string(),
                subtitle: String::new(),
                description: String::new(),
                author: String::new(),
            },
        );
        context.insert("posts", &Vec::<ItemData>::new());
        context.insert(
            "pagination",
            &PagerData {
                current: 1,
                total: 0,
                has_prev: false,
                has_next: false,
                prev: 0,
                next: 2,
            },
        );

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(r#"href="/blog/""#));
        assert!(html.contains(r#"href="/blog/archive/""#));
        assert!(html.contains("No posts yet."));
    }
}
