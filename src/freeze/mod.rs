//! Freezer - writes the whole site out as a static file tree
//!
//! Every route the dev server answers becomes `<route>/index.html`
//! under the destination, so any static file server reproduces the
//! same URLs.

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::render::{index_page_count, SiteRenderer};
use crate::Blog;

/// What a freeze run produced
#[derive(Debug)]
pub struct FreezeSummary {
    pub files: usize,
    pub elapsed: Duration,
}

/// Load all content and write the static tree.
///
/// A content root that cannot be read aborts the freeze; single bad
/// files are logged and left out, same as when serving.
pub fn freeze(blog: &Blog) -> Result<FreezeSummary> {
    let started = Instant::now();

    let index = blog.index();
    let report = index.load_all();
    let page_stats = report.pages.context("cannot freeze pages")?;
    let post_stats = report.posts.context("cannot freeze posts")?;
    for error in page_stats.errors.iter().chain(&post_stats.errors) {
        tracing::warn!("Skipped: {}", error);
    }

    let renderer = SiteRenderer::new(&blog.config)?;
    let destination = &blog.freeze_dir;

    if blog.config.freeze_clean && destination.exists() {
        fs::remove_dir_all(destination)
            .with_context(|| format!("failed to clean {:?}", destination))?;
    }
    fs::create_dir_all(destination)?;

    let pages = index.pages();
    let posts = index.posts();
    let mut files = 0;

    // Front listing, one file per pagination window
    let total = index_page_count(&posts, blog.config.per_page)?;
    for page in 1..=total {
        let html = renderer.index(&posts, page)?;
        let route = if page == 1 {
            String::new()
        } else {
            page.to_string()
        };
        write_route(destination, &route, &html)?;
        files += 1;
    }

    // Archives
    write_route(destination, "archive", &renderer.archive(&posts)?)?;
    files += 1;
    for tag in posts.by_tag.keys() {
        if !tag_fits_directory(tag) {
            tracing::warn!("Tag {:?} does not fit in a directory name, skipping", tag);
            continue;
        }
        if let Some(html) = renderer.archive_tag(&posts, tag)? {
            write_route(destination, &format!("archive/{}", tag), &html)?;
            files += 1;
        }
    }

    // Pages and posts
    for page in &pages.pages {
        let html = renderer.page(page)?;
        write_route(destination, &format!("page/{}", page.path), &html)?;
        files += 1;
    }
    for post in &posts.posts {
        let html = renderer.post(post)?;
        write_route(destination, &format!("post/{}", post.path), &html)?;
        files += 1;
    }

    // Static files, copied as-is
    if blog.static_dir.is_dir() {
        files += copy_static(&blog.static_dir, &destination.join("static"))?;
    }

    Ok(FreezeSummary {
        files,
        elapsed: started.elapsed(),
    })
}

/// Whether a tag can name its own directory under `archive/`.
///
/// Empty and dot tags resolve to the destination or archive root
/// and would overwrite pages already written there.
fn tag_fits_directory(tag: &str) -> bool {
    !tag.is_empty() && tag != "." && tag != ".." && !tag.contains('/') && !tag.contains('\\')
}

/// Write one route as `<destination>/<route>/index.html`
fn write_route(destination: &Path, route: &str, html: &str) -> Result<()> {
    let dir = if route.is_empty() {
        destination.to_path_buf()
    } else {
        destination.join(route)
    };
    fs::create_dir_all(&dir)?;
    let target = dir.join("index.html");
    fs::write(&target, html).with_context(|| format!("failed to write {:?}", target))?;
    tracing::debug!("Wrote {:?}", target);
    Ok(())
}

/// Copy the static directory into the destination tree
fn copy_static(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("failed to copy {:?}", entry.path()))?;
        copied += 1;
    }
    Ok(copied)
}
