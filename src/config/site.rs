//! Site configuration (blog.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::Encoding;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,

    // URL
    pub root: String,

    // Pages
    pub page_root: String,
    pub page_extensions: Vec<String>,
    pub page_encoding: Encoding,

    // Posts
    pub post_root: String,
    pub post_extensions: Vec<String>,
    pub post_encoding: Encoding,

    // Listing
    pub per_page: usize,

    // Static files
    pub static_dir: String,

    // Server
    pub host: String,
    pub port: u16,

    // Freezing
    pub freeze_destination: String,
    pub freeze_clean: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),

            root: "/".to_string(),

            page_root: "page".to_string(),
            page_extensions: vec![".html".to_string()],
            page_encoding: Encoding::Utf8Sig,

            post_root: "post".to_string(),
            post_extensions: vec![".markdown".to_string()],
            post_encoding: Encoding::Utf8Sig,

            per_page: 10,

            static_dir: "static".to_string(),

            host: "127.0.0.1".to_string(),
            port: 8000,

            freeze_destination: "build".to_string(),
            freeze_clean: true,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.page_root, "page");
        assert_eq!(config.page_extensions, vec![".html"]);
        assert_eq!(config.post_root, "post");
        assert_eq!(config.post_extensions, vec![".markdown"]);
        assert_eq!(config.per_page, 10);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.freeze_destination, "build");
        assert!(config.freeze_clean);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
per_page: 20
post_extensions: [".md", ".markdown"]
port: 9000
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.post_extensions, vec![".md", ".markdown"]);
        assert_eq!(config.port, 9000);
        // Unset keys keep their defaults
        assert_eq!(config.page_root, "page");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_parse_encoding_names() {
        let config: SiteConfig =
            serde_yaml::from_str("post_encoding: utf-8\npage_encoding: utf-8-sig\n").unwrap();
        assert_eq!(config.post_encoding, Encoding::Utf8);
        assert_eq!(config.page_encoding, Encoding::Utf8Sig);
    }
}
